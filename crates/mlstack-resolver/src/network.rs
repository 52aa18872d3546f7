use mlstack_domain::{FirewallAction, NetworkAccess, PublicNetworkAccess};

/// The single source of public exposure for every gated resource.
pub fn resolve_network_access(enabled: bool) -> NetworkAccess {
    if enabled {
        NetworkAccess {
            public_network_access: PublicNetworkAccess::Enabled,
            default_action: FirewallAction::Allow,
        }
    } else {
        NetworkAccess {
            public_network_access: PublicNetworkAccess::Disabled,
            default_action: FirewallAction::Deny,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_allows() {
        let access = resolve_network_access(true);
        assert_eq!(access.public_network_access, PublicNetworkAccess::Enabled);
        assert_eq!(access.default_action, FirewallAction::Allow);
    }

    #[test]
    fn disabled_denies() {
        let access = resolve_network_access(false);
        assert_eq!(access.public_network_access, PublicNetworkAccess::Disabled);
        assert_eq!(access.default_action, FirewallAction::Deny);
    }
}

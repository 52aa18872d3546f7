use mlstack_domain::{ResolveError, ServiceKind, Suffix};
use tracing::debug;

/// Derive the resource name for `service` from the prefix and suffix token.
///
/// | Service | Rule |
/// |---|---|
/// | storage account | `st` + first 20 of token, lowercased |
/// | container registry | `acr` + token without dashes, at most 50 |
/// | key vault | first 10 of prefix + `-kv-` + first 8 of token |
/// | log analytics | first 14 of prefix + `-law-` + first 6 of token |
/// | managed identity | first 14 of prefix + `-uai` |
/// | ml workspace | first 20 of prefix + `-mlw` |
///
/// The registry name needs no padding: the token is always
/// [`SUFFIX_LEN`](crate::SUFFIX_LEN) symbols, so `acr` + token clears the
/// 5-char minimum on its own.
pub fn derive_name(
    service: ServiceKind,
    prefix: &str,
    suffix: &Suffix,
) -> Result<String, ResolveError> {
    let token = suffix.as_str();
    let candidate = match service {
        ServiceKind::StorageAccount => format!("st{}", take(token, 20).to_ascii_lowercase()),
        ServiceKind::ContainerRegistry => {
            let stripped: String = token.chars().filter(|c| *c != '-').collect();
            take(&format!("acr{}", stripped), 50)
        }
        ServiceKind::KeyVault => format!("{}-kv-{}", take(prefix, 10), take(token, 8)),
        ServiceKind::LogAnalytics => format!("{}-law-{}", take(prefix, 14), take(token, 6)),
        ServiceKind::ManagedIdentity => format!("{}-uai", take(prefix, 14)),
        ServiceKind::MlWorkspace => format!("{}-mlw", take(prefix, 20)),
    };
    check_name(service, &candidate)?;
    debug!(service = %service, name = %candidate, "derived resource name");
    Ok(candidate)
}

/// Check a name against its service's length and charset rule.
pub fn check_name(service: ServiceKind, name: &str) -> Result<(), ResolveError> {
    let rule = service.name_rule();
    match rule.violation(name) {
        None => Ok(()),
        Some(broken) => Err(ResolveError::ConstraintViolation {
            service,
            name: name.to_string(),
            rule: format!("{} ({})", broken, rule),
        }),
    }
}

fn take(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

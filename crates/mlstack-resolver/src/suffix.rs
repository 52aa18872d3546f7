use mlstack_domain::{validate_name_prefix, ResolveError, ScopeId, Suffix};
use sha2::{Digest, Sha256};

/// Token length in symbols. Every name rule is sized against this constant.
pub const SUFFIX_LEN: usize = 13;

// 32 symbols, 5 bits each. Lowercase only so the token fits every charset.
const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Derive the uniqueness token for `name_prefix` deployed into `scope`.
///
/// Deterministic: the same scope and prefix always give the same token, so
/// re-running a deployment never renames its resources. Different scopes
/// land on unrelated tokens because the SHA-256 digest diffuses every input
/// bit. The prefix must pass [`validate_name_prefix`]; since it can never
/// contain `/`, the last separator in the hashed bytes always marks where
/// the scope ends.
pub fn derive_suffix(scope: &ScopeId, name_prefix: &str) -> Result<Suffix, ResolveError> {
    if scope.as_str().trim().is_empty() {
        return Err(ResolveError::out_of_range("scopeId", "must not be empty"));
    }
    validate_name_prefix(name_prefix)?;

    let mut hasher = Sha256::new();
    hasher.update(scope.as_str().as_bytes());
    hasher.update(b"/");
    hasher.update(name_prefix.as_bytes());
    let digest = hasher.finalize();

    let mut token = String::with_capacity(SUFFIX_LEN);
    let mut acc: u16 = 0;
    let mut bits: u32 = 0;
    for byte in digest.iter() {
        acc = (acc << 8) | u16::from(*byte);
        bits += 8;
        while bits >= 5 && token.len() < SUFFIX_LEN {
            bits -= 5;
            token.push(ALPHABET[((acc >> bits) & 0x1f) as usize] as char);
        }
        acc &= (1u16 << bits) - 1;
        if token.len() == SUFFIX_LEN {
            break;
        }
    }
    Ok(Suffix::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_token() {
        let scope = ScopeId::new("/subscriptions/abc/resourceGroups/rg-ml");
        let a = derive_suffix(&scope, "ml").unwrap();
        let b = derive_suffix(&scope, "ml").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn token_shape() {
        let token = derive_suffix(&ScopeId::new("abc123"), "ml").unwrap();
        assert_eq!(token.as_str().len(), SUFFIX_LEN);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn scope_changes_token() {
        let a = derive_suffix(&ScopeId::new("scope-a"), "ml").unwrap();
        let b = derive_suffix(&ScopeId::new("scope-b"), "ml").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn prefix_changes_token() {
        let scope = ScopeId::new("scope-a");
        assert_ne!(
            derive_suffix(&scope, "ml").unwrap(),
            derive_suffix(&scope, "mlx").unwrap()
        );
    }

    #[test]
    fn separator_prevents_concatenation_collisions() {
        let a = derive_suffix(&ScopeId::new("ab"), "cd").unwrap();
        let b = derive_suffix(&ScopeId::new("a"), "bcd").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn prefix_cannot_carry_scope_segments() {
        let scope = ScopeId::new("/subscriptions/1/resourceGroups");
        let err = derive_suffix(&scope, "rg/ml").unwrap_err();
        assert!(matches!(err, ResolveError::InputOutOfRange { ref field, .. } if field == "namePrefix"));

        let a = derive_suffix(&ScopeId::new("/subscriptions/1/resourceGroups/rg"), "ml").unwrap();
        let b = derive_suffix(&ScopeId::new("/subscriptions/1/resourceGroups/rg/ml"), "ml").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn out_of_range_prefix_rejected() {
        let scope = ScopeId::new("abc123");
        for bad in ["", "m", "abcdefghijklm", "ml-x"] {
            let err = derive_suffix(&scope, bad).unwrap_err();
            assert!(
                matches!(err, ResolveError::InputOutOfRange { ref field, .. } if field == "namePrefix"),
                "prefix {:?} gave {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn empty_scope_rejected() {
        let err = derive_suffix(&ScopeId::new("  "), "ml").unwrap_err();
        assert!(matches!(err, ResolveError::InputOutOfRange { ref field, .. } if field == "scopeId"));
    }
}

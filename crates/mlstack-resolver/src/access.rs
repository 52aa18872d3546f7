use mlstack_domain::{AccessPermissions, EncryptionBinding, KeyAccessGrant, KeyPermission, ResolveError};
use uuid::Uuid;

/// The only key operations the workspace identity may perform.
pub const KEY_PERMISSIONS: [KeyPermission; 3] = [
    KeyPermission::Get,
    KeyPermission::WrapKey,
    KeyPermission::UnwrapKey,
];

/// Build the vault access policy entry for the managed identity.
///
/// Grants exactly [`KEY_PERMISSIONS`]. Secrets and certificates stay empty.
pub fn build_key_access_grant(identity_principal_id: &str) -> Result<KeyAccessGrant, ResolveError> {
    let object_id = parse_guid("identityPrincipalId", identity_principal_id)?;
    Ok(KeyAccessGrant {
        object_id,
        permissions: AccessPermissions {
            keys: KEY_PERMISSIONS.to_vec(),
            secrets: Vec::new(),
            certificates: Vec::new(),
        },
    })
}

/// Compose the customer-managed key reference and bind it to the identity
/// that wraps and unwraps with it.
///
/// The key identifier carries no version segment, so consumers follow key
/// rotation without a redeploy.
pub fn build_encryption_binding(
    vault_uri: &str,
    key_name: &str,
    identity_id: &str,
) -> Result<EncryptionBinding, ResolveError> {
    let vault = vault_uri.trim().trim_end_matches('/');
    let host = vault.strip_prefix("https://").unwrap_or("");
    if host.is_empty() || host.contains('/') {
        return Err(ResolveError::out_of_range(
            "keyVaultUri",
            format!("'{}' is not an https:// vault URI", vault_uri),
        ));
    }

    if key_name.is_empty() || !key_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ResolveError::out_of_range(
            "keyName",
            format!("'{}' must be non-empty letters, digits and dashes", key_name),
        ));
    }

    let identity = identity_id.trim();
    if !identity.starts_with('/')
        || !identity
            .to_ascii_lowercase()
            .contains("/providers/microsoft.managedidentity/userassignedidentities/")
    {
        return Err(ResolveError::out_of_range(
            "identityResourceId",
            format!("'{}' is not a user-assigned identity resource id", identity_id),
        ));
    }

    Ok(EncryptionBinding {
        key_vault_uri: vault.to_string(),
        key_name: key_name.to_string(),
        key_identifier: format!("{}/keys/{}", vault, key_name),
        identity_resource_id: identity.to_string(),
    })
}

pub(crate) fn parse_guid(field: &str, value: &str) -> Result<String, ResolveError> {
    Uuid::parse_str(value.trim())
        .map(|id| id.hyphenated().to_string())
        .map_err(|e| ResolveError::out_of_range(field, format!("'{}' is not a GUID: {}", value, e)))
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw YAML representation of a deployment inputs file.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawInputs {
    pub location: String,
    pub name_prefix: String,
    #[serde(default = "default_public_network_access")]
    pub public_network_access_enabled: bool,
    /// Signed so that negative values reach range validation instead of
    /// failing as a type error.
    #[serde(default = "default_retention_days")]
    pub log_analytics_retention_days: i64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub enable_diagnostics: bool,
}

fn default_public_network_access() -> bool {
    true
}

fn default_retention_days() -> i64 {
    mlstack_domain::DEFAULT_RETENTION_DAYS as i64
}

/// Raw YAML representation of properties read back from created resources.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawRuntime {
    pub tenant_id: Option<String>,
    pub identity_principal_id: Option<String>,
    pub identity_resource_id: Option<String>,
    pub key_vault_uri: Option<String>,
    pub workspace_resource_id: Option<String>,
}

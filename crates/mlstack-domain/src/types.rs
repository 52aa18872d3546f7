use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ResolveError;

// ── Input bounds ──────────────────────────────────────────────────────────────

pub const NAME_PREFIX_MIN_LEN: usize = 2;
pub const NAME_PREFIX_MAX_LEN: usize = 12;
pub const RETENTION_DAYS_MIN: u32 = 7;
pub const RETENTION_DAYS_MAX: u32 = 730;
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

// ── Identifiers ──────────────────────────────────────────────────────────────

/// Stable handle for the deployment target, used to salt the suffix token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub String);

impl ScopeId {
    pub fn new(s: impl Into<String>) -> Self {
        ScopeId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic uniqueness token derived from a scope and a name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suffix(pub String);

impl Suffix {
    pub fn new(s: impl Into<String>) -> Self {
        Suffix(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Suffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Services and naming rules ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    StorageAccount,
    ContainerRegistry,
    KeyVault,
    LogAnalytics,
    ManagedIdentity,
    MlWorkspace,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::StorageAccount,
        ServiceKind::ContainerRegistry,
        ServiceKind::KeyVault,
        ServiceKind::LogAnalytics,
        ServiceKind::ManagedIdentity,
        ServiceKind::MlWorkspace,
    ];

    /// Length and charset limits the service enforces on resource names.
    pub fn name_rule(&self) -> NameRule {
        match self {
            ServiceKind::StorageAccount => NameRule::new(3, 24, Charset::LowerAlnum),
            ServiceKind::ContainerRegistry => NameRule::new(5, 50, Charset::Alnum),
            ServiceKind::KeyVault => NameRule::new(3, 24, Charset::AlnumDash),
            ServiceKind::LogAnalytics => NameRule::new(4, 63, Charset::AlnumDash),
            ServiceKind::ManagedIdentity => NameRule::new(3, 128, Charset::AlnumDash),
            ServiceKind::MlWorkspace => NameRule::new(3, 33, Charset::AlnumDash),
        }
    }

    /// Whether the resource exposes a public network access toggle.
    pub fn is_network_gated(&self) -> bool {
        !matches!(self, ServiceKind::ManagedIdentity)
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceKind::StorageAccount => write!(f, "storage account"),
            ServiceKind::ContainerRegistry => write!(f, "container registry"),
            ServiceKind::KeyVault => write!(f, "key vault"),
            ServiceKind::LogAnalytics => write!(f, "log analytics workspace"),
            ServiceKind::ManagedIdentity => write!(f, "managed identity"),
            ServiceKind::MlWorkspace => write!(f, "ml workspace"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// `[a-z0-9]`
    LowerAlnum,
    /// `[A-Za-z0-9]`
    Alnum,
    /// `[A-Za-z0-9-]`
    AlnumDash,
}

impl Charset {
    pub fn allows(&self, c: char) -> bool {
        match self {
            Charset::LowerAlnum => c.is_ascii_lowercase() || c.is_ascii_digit(),
            Charset::Alnum => c.is_ascii_alphanumeric(),
            Charset::AlnumDash => c.is_ascii_alphanumeric() || c == '-',
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Charset::LowerAlnum => write!(f, "lowercase letters and digits"),
            Charset::Alnum => write!(f, "letters and digits"),
            Charset::AlnumDash => write!(f, "letters, digits and dashes"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRule {
    pub min_len: usize,
    pub max_len: usize,
    pub charset: Charset,
}

impl NameRule {
    pub const fn new(min_len: usize, max_len: usize, charset: Charset) -> Self {
        Self { min_len, max_len, charset }
    }

    /// Returns the first broken clause of the rule, or `None` if `name` passes.
    pub fn violation(&self, name: &str) -> Option<String> {
        let len = name.chars().count();
        if len == 0 {
            return Some("name is empty".to_string());
        }
        if len < self.min_len || len > self.max_len {
            return Some(format!(
                "length {} outside {}-{}",
                len, self.min_len, self.max_len
            ));
        }
        if let Some(bad) = name.chars().find(|c| !self.charset.allows(*c)) {
            return Some(format!("character '{}' not in {}", bad, self.charset));
        }
        None
    }
}

impl std::fmt::Display for NameRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} chars, {}", self.min_len, self.max_len, self.charset)
    }
}

// ── Network access ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicNetworkAccess {
    Enabled,
    Disabled,
}

impl std::fmt::Display for PublicNetworkAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublicNetworkAccess::Enabled => write!(f, "Enabled"),
            PublicNetworkAccess::Disabled => write!(f, "Disabled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirewallAction {
    Allow,
    Deny,
}

impl std::fmt::Display for FirewallAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FirewallAction::Allow => write!(f, "Allow"),
            FirewallAction::Deny => write!(f, "Deny"),
        }
    }
}

/// The public exposure of a resource. Only ever produced by
/// `resolve_network_access`, then copied into every gated bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAccess {
    pub public_network_access: PublicNetworkAccess,
    pub default_action: FirewallAction,
}

// ── Inputs ────────────────────────────────────────────────────────────────────

/// User inputs for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInputs {
    /// Region for all resources.
    pub location: String,
    /// Seed for every derived name.
    pub name_prefix: String,
    pub public_network_access_enabled: bool,
    pub log_analytics_retention_days: u32,
    pub tags: BTreeMap<String, String>,
    pub enable_diagnostics: bool,
}

impl DeploymentInputs {
    /// Inputs with every optional field at its default.
    pub fn new(location: impl Into<String>, name_prefix: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            name_prefix: name_prefix.into(),
            public_network_access_enabled: true,
            log_analytics_retention_days: DEFAULT_RETENTION_DAYS,
            tags: BTreeMap::new(),
            enable_diagnostics: false,
        }
    }

    /// Check every input against its declared bound.
    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.location.is_empty() {
            return Err(ResolveError::out_of_range("location", "must not be empty"));
        }
        if !self
            .location
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(ResolveError::out_of_range(
                "location",
                format!(
                    "'{}' is not a region code (lowercase letters and digits)",
                    self.location
                ),
            ));
        }

        validate_name_prefix(&self.name_prefix)?;

        if !(RETENTION_DAYS_MIN..=RETENTION_DAYS_MAX).contains(&self.log_analytics_retention_days) {
            return Err(ResolveError::out_of_range(
                "logAnalyticsRetentionDays",
                format!(
                    "{} outside {}-{}",
                    self.log_analytics_retention_days, RETENTION_DAYS_MIN, RETENTION_DAYS_MAX
                ),
            ));
        }
        Ok(())
    }
}

/// Check a name prefix: 2-12 ASCII letters or digits. No separators, so a
/// prefix can never absorb part of the scope when both are hashed together.
pub fn validate_name_prefix(prefix: &str) -> Result<(), ResolveError> {
    let prefix_len = prefix.chars().count();
    if !(NAME_PREFIX_MIN_LEN..=NAME_PREFIX_MAX_LEN).contains(&prefix_len) {
        return Err(ResolveError::out_of_range(
            "namePrefix",
            format!(
                "length {} outside {}-{}",
                prefix_len, NAME_PREFIX_MIN_LEN, NAME_PREFIX_MAX_LEN
            ),
        ));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ResolveError::out_of_range(
            "namePrefix",
            format!("'{}' must contain only letters and digits", prefix),
        ));
    }
    Ok(())
}

/// Properties read back from resources the provisioning engine has already
/// created. Each is absent until the owning resource exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeProperties {
    pub tenant_id: Option<String>,
    pub identity_principal_id: Option<String>,
    pub identity_resource_id: Option<String>,
    pub key_vault_uri: Option<String>,
    pub workspace_resource_id: Option<String>,
}

// ── Resource bundles ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedIdentitySpec {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalyticsSpec {
    pub name: String,
    pub sku: String,
    pub retention_days: u32,
    pub network: NetworkAccess,
}

/// Customer-managed key held in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySpec {
    pub name: String,
    pub kty: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultSpec {
    pub name: String,
    pub sku: String,
    pub soft_delete_retention_days: u32,
    pub purge_protection: bool,
    pub rbac_authorization: bool,
    pub network: NetworkAccess,
    pub key: KeySpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountSpec {
    pub name: String,
    pub sku: String,
    pub kind: String,
    pub https_only: bool,
    pub min_tls: String,
    pub allow_blob_public_access: bool,
    pub network: NetworkAccess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRegistrySpec {
    pub name: String,
    pub sku: String,
    pub admin_user_enabled: bool,
    pub network: NetworkAccess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSpec {
    pub name: String,
    /// High business impact: reduces diagnostic data the service collects.
    pub hbi_workspace: bool,
    pub network: NetworkAccess,
}

/// Diagnostic setting that ships workspace logs and metrics to Log Analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticBinding {
    pub name: String,
    pub target: ServiceKind,
    pub target_name: String,
    pub destination_workspace: String,
    pub log_category_groups: Vec<String>,
    pub metric_categories: Vec<String>,
}

/// Every name and property bundle derived from the inputs, before any
/// resource exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlan {
    pub location: String,
    pub tags: BTreeMap<String, String>,
    pub suffix: Suffix,
    pub network: NetworkAccess,
    pub identity: ManagedIdentitySpec,
    pub log_analytics: LogAnalyticsSpec,
    pub key_vault: KeyVaultSpec,
    pub storage: StorageAccountSpec,
    pub registry: ContainerRegistrySpec,
    pub workspace: WorkspaceSpec,
    pub diagnostics: Option<DiagnosticBinding>,
}

impl ResolvedPlan {
    /// Derived name for a service.
    pub fn name_of(&self, service: ServiceKind) -> &str {
        match service {
            ServiceKind::StorageAccount => &self.storage.name,
            ServiceKind::ContainerRegistry => &self.registry.name,
            ServiceKind::KeyVault => &self.key_vault.name,
            ServiceKind::LogAnalytics => &self.log_analytics.name,
            ServiceKind::ManagedIdentity => &self.identity.name,
            ServiceKind::MlWorkspace => &self.workspace.name,
        }
    }

    /// Network access of each publicly reachable resource.
    pub fn network_exposure(&self) -> Vec<(ServiceKind, NetworkAccess)> {
        vec![
            (ServiceKind::StorageAccount, self.storage.network),
            (ServiceKind::ContainerRegistry, self.registry.network),
            (ServiceKind::KeyVault, self.key_vault.network),
            (ServiceKind::LogAnalytics, self.log_analytics.network),
            (ServiceKind::MlWorkspace, self.workspace.network),
        ]
    }
}

// ── Runtime-bound bundles ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPermission {
    Get,
    WrapKey,
    UnwrapKey,
}

/// Permission sets of a vault access policy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPermissions {
    pub keys: Vec<KeyPermission>,
    pub secrets: Vec<String>,
    pub certificates: Vec<String>,
}

/// Vault access policy entry for the managed identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAccessGrant {
    pub object_id: String,
    pub permissions: AccessPermissions,
}

/// Customer-managed key reference bound to the identity that wraps and
/// unwraps with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionBinding {
    pub key_vault_uri: String,
    pub key_name: String,
    /// Versionless key URI, so rotation needs no consumer redeploy.
    pub key_identifier: String,
    pub identity_resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundPlan {
    pub plan: ResolvedPlan,
    pub tenant_id: String,
    pub key_access_grant: KeyAccessGrant,
    pub encryption: EncryptionBinding,
}

/// Final values handed back once the resources exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOutputs {
    pub workspace_name: String,
    pub workspace_id: String,
    pub key_vault_name: String,
    pub storage_account_name: String,
    pub container_registry_name: String,
}

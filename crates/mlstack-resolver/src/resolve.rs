use mlstack_domain::{
    BoundPlan, ContainerRegistrySpec, DeploymentInputs, DeploymentOutputs, DiagnosticBinding,
    KeySpec, KeyVaultSpec, LogAnalyticsSpec, ManagedIdentitySpec, ResolveError, ResolvedPlan,
    RuntimeProperties, ScopeId, ServiceKind, StorageAccountSpec, WorkspaceSpec,
};
use tracing::{debug, info};

use crate::access::{build_encryption_binding, build_key_access_grant, parse_guid};
use crate::naming::derive_name;
use crate::network::resolve_network_access;
use crate::suffix::derive_suffix;

pub const KEY_NAME: &str = "cmk";
pub const KEY_TYPE: &str = "RSA";
pub const KEY_SIZE: u32 = 2048;
pub const KEY_VAULT_SOFT_DELETE_DAYS: u32 = 90;

/// Turn validated inputs into every resource name and property bundle.
///
/// Pure: no I/O, no ambient state. `scope` salts the suffix token and must
/// be stable for the deployment target.
pub fn resolve(inputs: &DeploymentInputs, scope: &ScopeId) -> Result<ResolvedPlan, ResolveError> {
    inputs.validate()?;

    let prefix = inputs.name_prefix.as_str();
    let suffix = derive_suffix(scope, prefix)?;
    let network = resolve_network_access(inputs.public_network_access_enabled);

    let identity = ManagedIdentitySpec {
        name: derive_name(ServiceKind::ManagedIdentity, prefix, &suffix)?,
    };

    let log_analytics = LogAnalyticsSpec {
        name: derive_name(ServiceKind::LogAnalytics, prefix, &suffix)?,
        sku: "PerGB2018".to_string(),
        retention_days: inputs.log_analytics_retention_days,
        network,
    };

    let key_vault = KeyVaultSpec {
        name: derive_name(ServiceKind::KeyVault, prefix, &suffix)?,
        sku: "standard".to_string(),
        soft_delete_retention_days: KEY_VAULT_SOFT_DELETE_DAYS,
        // Required before a vault key can serve as a customer-managed key.
        purge_protection: true,
        rbac_authorization: false,
        network,
        key: KeySpec {
            name: KEY_NAME.to_string(),
            kty: KEY_TYPE.to_string(),
            size: KEY_SIZE,
        },
    };

    let storage = StorageAccountSpec {
        name: derive_name(ServiceKind::StorageAccount, prefix, &suffix)?,
        sku: "Standard_LRS".to_string(),
        kind: "StorageV2".to_string(),
        https_only: true,
        min_tls: "TLS1_2".to_string(),
        allow_blob_public_access: false,
        network,
    };

    // Premium is the only registry tier that can disable public access.
    let registry = ContainerRegistrySpec {
        name: derive_name(ServiceKind::ContainerRegistry, prefix, &suffix)?,
        sku: "Premium".to_string(),
        admin_user_enabled: false,
        network,
    };

    let workspace = WorkspaceSpec {
        name: derive_name(ServiceKind::MlWorkspace, prefix, &suffix)?,
        hbi_workspace: true,
        network,
    };

    let diagnostics = inputs.enable_diagnostics.then(|| DiagnosticBinding {
        name: format!("{}-diag", workspace.name),
        target: ServiceKind::MlWorkspace,
        target_name: workspace.name.clone(),
        destination_workspace: log_analytics.name.clone(),
        log_category_groups: vec!["allLogs".to_string()],
        metric_categories: vec!["AllMetrics".to_string()],
    });

    info!(
        scope = %scope,
        suffix = %suffix,
        public_network_access = %network.public_network_access,
        diagnostics = diagnostics.is_some(),
        "resolved deployment plan"
    );

    Ok(ResolvedPlan {
        location: inputs.location.clone(),
        tags: inputs.tags.clone(),
        suffix,
        network,
        identity,
        log_analytics,
        key_vault,
        storage,
        registry,
        workspace,
        diagnostics,
    })
}

/// Attach the bundles that need properties of already-created resources:
/// the vault access grant and the workspace encryption binding.
pub fn bind(plan: &ResolvedPlan, props: &RuntimeProperties) -> Result<BoundPlan, ResolveError> {
    let tenant_id = require(props.tenant_id.as_deref(), "key vault", "tenantId")?;
    let tenant_id = parse_guid("tenantId", tenant_id)?;

    let principal_id = require(
        props.identity_principal_id.as_deref(),
        "key access policy",
        "identityPrincipalId",
    )?;
    let key_access_grant = build_key_access_grant(principal_id)?;

    let vault_uri = require(props.key_vault_uri.as_deref(), "workspace encryption", "keyVaultUri")?;
    let identity_id = require(
        props.identity_resource_id.as_deref(),
        "workspace encryption",
        "identityResourceId",
    )?;
    let encryption = build_encryption_binding(vault_uri, &plan.key_vault.key.name, identity_id)?;

    debug!(
        object_id = %key_access_grant.object_id,
        key = %encryption.key_identifier,
        "bound runtime properties"
    );

    Ok(BoundPlan {
        plan: plan.clone(),
        tenant_id,
        key_access_grant,
        encryption,
    })
}

/// Read-only projection handed back once the resources exist.
pub fn outputs(plan: &ResolvedPlan, props: &RuntimeProperties) -> Result<DeploymentOutputs, ResolveError> {
    let workspace_id = require(
        props.workspace_resource_id.as_deref(),
        "ml workspace",
        "workspaceResourceId",
    )?;
    Ok(DeploymentOutputs {
        workspace_name: plan.workspace.name.clone(),
        workspace_id: workspace_id.to_string(),
        key_vault_name: plan.key_vault.name.clone(),
        storage_account_name: plan.storage.name.clone(),
        container_registry_name: plan.registry.name.clone(),
    })
}

fn require<'a>(value: Option<&'a str>, resource: &str, property: &str) -> Result<&'a str, ResolveError> {
    value.ok_or_else(|| ResolveError::missing(resource, property))
}

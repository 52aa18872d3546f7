use std::path::Path;

use mlstack_domain::{DeploymentInputs, ResolveError, RuntimeProperties, RETENTION_DAYS_MAX, RETENTION_DAYS_MIN};
use tracing::debug;

use crate::error::ConfigError;
use crate::raw::{RawInputs, RawRuntime};

/// Read and validate a deployment inputs file. Values are checked exactly as
/// written; a padded `location` or `namePrefix` is rejected, not trimmed.
///
/// ```yaml
/// location: eastus2
/// namePrefix: ml
/// publicNetworkAccessEnabled: false   # default true
/// logAnalyticsRetentionDays: 90       # default 30
/// enableDiagnostics: true             # default false
/// tags:
///   env: dev
/// ```
pub fn load_inputs(path: &Path) -> Result<DeploymentInputs, ConfigError> {
    let content = read(path)?;
    debug!("Loading deployment inputs from {}", path.display());
    parse_inputs(&content, &path.display().to_string())
}

/// Parse inputs from YAML text. `origin` names the source in errors.
pub fn parse_inputs(content: &str, origin: &str) -> Result<DeploymentInputs, ConfigError> {
    let raw: RawInputs = serde_yaml::from_str(content).map_err(|e| ConfigError::YamlParse {
        path: origin.to_string(),
        source: e,
    })?;
    let inputs = convert_inputs(raw).map_err(|e| ConfigError::Invalid {
        path: origin.to_string(),
        source: e,
    })?;
    inputs.validate().map_err(|e| ConfigError::Invalid {
        path: origin.to_string(),
        source: e,
    })?;
    Ok(inputs)
}

/// Read a runtime properties file.
pub fn load_runtime(path: &Path) -> Result<RuntimeProperties, ConfigError> {
    let content = read(path)?;
    debug!("Loading runtime properties from {}", path.display());
    parse_runtime(&content, &path.display().to_string())
}

/// Parse runtime properties from YAML text. An empty document yields no
/// properties.
pub fn parse_runtime(content: &str, origin: &str) -> Result<RuntimeProperties, ConfigError> {
    let raw: Option<RawRuntime> =
        serde_yaml::from_str(content).map_err(|e| ConfigError::YamlParse {
            path: origin.to_string(),
            source: e,
        })?;
    let raw = raw.unwrap_or_default();
    Ok(RuntimeProperties {
        tenant_id: non_blank(raw.tenant_id),
        identity_principal_id: non_blank(raw.identity_principal_id),
        identity_resource_id: non_blank(raw.identity_resource_id),
        key_vault_uri: non_blank(raw.key_vault_uri),
        workspace_resource_id: non_blank(raw.workspace_resource_id),
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn convert_inputs(raw: RawInputs) -> Result<DeploymentInputs, ResolveError> {
    let retention = u32::try_from(raw.log_analytics_retention_days).map_err(|_| {
        ResolveError::out_of_range(
            "logAnalyticsRetentionDays",
            format!(
                "{} outside {}-{}",
                raw.log_analytics_retention_days, RETENTION_DAYS_MIN, RETENTION_DAYS_MAX
            ),
        )
    })?;

    Ok(DeploymentInputs {
        location: raw.location,
        name_prefix: raw.name_prefix,
        public_network_access_enabled: raw.public_network_access_enabled,
        log_analytics_retention_days: retention,
        tags: raw.tags,
        enable_diagnostics: raw.enable_diagnostics,
    })
}

// Engines sometimes emit "" for properties that are not yet known.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let inputs = parse_inputs("location: eastus\nnamePrefix: ml\n", "test").unwrap();
        assert!(inputs.public_network_access_enabled);
        assert!(!inputs.enable_diagnostics);
        assert_eq!(inputs.log_analytics_retention_days, 30);
        assert!(inputs.tags.is_empty());
    }

    #[test]
    fn negative_retention_is_out_of_range() {
        let err = parse_inputs(
            "location: eastus\nnamePrefix: ml\nlogAnalyticsRetentionDays: -1\n",
            "test",
        )
        .unwrap_err();
        assert!(
            matches!(
                &err,
                ConfigError::Invalid { source: ResolveError::InputOutOfRange { field, .. }, .. }
                    if field == "logAnalyticsRetentionDays"
            ),
            "{:?}",
            err
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let err = parse_inputs("location: eastus\nnamePrefix: ml\nsku: basic\n", "test").unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse { .. }));
    }

    #[test]
    fn missing_prefix_rejected() {
        let err = parse_inputs("location: eastus\n", "test").unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse { .. }));
    }

    #[test]
    fn padded_values_rejected() {
        let cases = [
            ("location: eastus\nnamePrefix: \" ml \"\n", "namePrefix"),
            ("location: \" eastus\"\nnamePrefix: ml\n", "location"),
        ];
        for (yaml, expected) in cases {
            let err = parse_inputs(yaml, "test").unwrap_err();
            assert!(
                matches!(
                    &err,
                    ConfigError::Invalid { source: ResolveError::InputOutOfRange { field, .. }, .. }
                        if field == expected
                ),
                "{:?}",
                err
            );
        }
    }

    #[test]
    fn empty_runtime_document_has_no_properties() {
        assert_eq!(parse_runtime("", "test").unwrap(), RuntimeProperties::default());
    }

    #[test]
    fn blank_runtime_values_are_absent() {
        let props = parse_runtime("tenantId: \"\"\nkeyVaultUri: \"  \"\n", "test").unwrap();
        assert!(props.tenant_id.is_none());
        assert!(props.key_vault_uri.is_none());
    }
}

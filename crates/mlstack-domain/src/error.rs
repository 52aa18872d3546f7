use thiserror::Error;

use crate::types::ServiceKind;

/// Every failure the resolver can raise. All are local and raised before any
/// provisioning call is made; none are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A user input fails its declared bound before derivation starts.
    #[error("input '{field}' out of range: {rule}")]
    InputOutOfRange { field: String, rule: String },

    /// A derived name breaks its service's naming rule. This is a bug in the
    /// derivation rule, not a user error.
    #[error("derived {service} name '{name}' violates naming rule: {rule}")]
    ConstraintViolation {
        service: ServiceKind,
        name: String,
        rule: String,
    },

    /// A derivation step needs a runtime property of an already-created
    /// resource that has not been produced yet.
    #[error("{resource} requires runtime property '{property}', which has not been produced")]
    MissingDependency { resource: String, property: String },
}

impl ResolveError {
    pub fn out_of_range(field: impl Into<String>, rule: impl Into<String>) -> Self {
        ResolveError::InputOutOfRange {
            field: field.into(),
            rule: rule.into(),
        }
    }

    pub fn missing(resource: impl Into<String>, property: impl Into<String>) -> Self {
        ResolveError::MissingDependency {
            resource: resource.into(),
            property: property.into(),
        }
    }
}

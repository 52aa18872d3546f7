use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("dependency edge references unknown node '{0}'")]
    UnknownNode(String),

    #[error("cycle detected in provisioning dependency graph")]
    CycleDetected,
}

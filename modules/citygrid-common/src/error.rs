use thiserror::Error;

use crate::types::{ExternalId, NodeKind};

#[derive(Error, Debug)]
pub enum CityGridError {
    #[error("{kind} {id} not found in current snapshot")]
    NotFound { kind: NodeKind, id: ExternalId },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Graph source error: {0}")]
    GraphSource(String),

    #[error("Spatial store error: {0}")]
    SpatialStore(String),

    #[error("Rebuild conflict: another rebuild is in progress")]
    RebuildConflict,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

//! Error types for the circuit model and its persistence boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    #[error("unknown pin '{pin}' on component '{component}'")]
    UnknownPin { component: String, pin: String },

    #[error("unknown wire: {0}")]
    UnknownWire(String),

    #[error("invalid pin path '{0}', expected 'componentId/pinId'")]
    InvalidPinPath(String),

    #[error("unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("cannot connect wire '{wire}' to pin '{pin}': {reason}")]
    InvalidConnection {
        wire: String,
        pin: String,
        reason: String,
    },

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("component '{0}' is not a toggle source")]
    NotToggleable(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CircuitError {
    /// True for every failure to resolve an id or a `componentId/pinId` path.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            CircuitError::UnknownComponent(_)
                | CircuitError::UnknownPin { .. }
                | CircuitError::UnknownWire(_)
                | CircuitError::InvalidPinPath(_)
        )
    }

    pub fn is_invalid_connection(&self) -> bool {
        matches!(self, CircuitError::InvalidConnection { .. })
    }

    pub(crate) fn invalid_connection(
        wire: impl Into<String>,
        pin: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        CircuitError::InvalidConnection {
            wire: wire.into(),
            pin: pin.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CircuitError>;

use thiserror::Error;

/// Errors raised by layers, networks and the training driver.
#[derive(Error, Debug)]
pub enum NnError {
    /// A vector or matrix did not have the dimensions the operation expects.
    #[error("invalid shape in {context}: expected {expected}, got {actual}")]
    InvalidShape {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An operation was called out of the forward → backward → update order.
    #[error("invalid sequence: {operation} on layer {layer} while {phase}")]
    InvalidSequence {
        layer: usize,
        operation: &'static str,
        phase: &'static str,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;

/// Returns `InvalidShape` unless `actual == expected`.
pub(crate) fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NnError::InvalidShape { context, expected, actual });
    }
    Ok(())
}

//! Error types for state construction, gate application and measurement.

use thiserror::Error;

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, QcError>;

/// Errors raised by the simulator.
///
/// Every error is fatal to the operation that produced it; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcError {
    /// Gate tensor does not have even rank, or its input and output halves disagree.
    #[error("malformed gate: {reason}")]
    MalformedGate { reason: String },

    /// A gate slot and the state axis it is bound to have different dimensions.
    #[error("dimension mismatch on axis {axis}: gate expects {expected}, state has {actual}")]
    DimensionMismatch {
        axis: usize,
        expected: usize,
        actual: usize,
    },

    /// Number of axes passed does not match the gate's arity.
    #[error("gate acts on {expected} axes but {actual} were given")]
    ArityMismatch { expected: usize, actual: usize },

    /// Axis index is past the last axis of the state.
    #[error("axis {axis} is out of range for a {num_axes}-axis state")]
    AxisOutOfRange { axis: usize, num_axes: usize },

    /// The same axis was named twice in one gate application.
    #[error("axis {axis} is listed more than once")]
    DuplicateAxis { axis: usize },

    /// Outcome index is not a valid level of the axis.
    #[error("outcome {outcome} is out of range for axis {axis} of dimension {dim}")]
    OutcomeOutOfRange {
        axis: usize,
        outcome: usize,
        dim: usize,
    },

    /// Collapse was forced onto an outcome with zero probability.
    #[error("invalid measurement: outcome {outcome} on axis {axis} has probability {probability}")]
    InvalidMeasurement {
        axis: usize,
        outcome: usize,
        probability: f64,
    },

    /// `value` is not an exact power of `base`.
    #[error("invalid dimensions: {value} is not a power of {base}")]
    InvalidDimsForLog { value: usize, base: usize },

    /// Register description is unusable (no axes, or an axis of dimension < 2).
    #[error("invalid register: {reason}")]
    InvalidRegister { reason: String },

    /// Coordinate tuple does not address a basis state of the register.
    #[error("invalid basis state: {reason}")]
    InvalidBasisState { reason: String },

    /// Oracle truth table is inconsistent.
    #[error("invalid oracle: {reason}")]
    InvalidOracle { reason: String },

    /// Two parallel argument lists have different lengths.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Matrix has no unitary eigenbasis, so a fractional power is undefined here.
    #[error("matrix is not diagonalizable by a unitary change of basis")]
    NotDiagonalizable,

    /// Matrix has no inverse.
    #[error("matrix is singular")]
    SingularMatrix,

    /// A numeric argument is outside the range the routine accepts.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    /// The two-qubit synthesis hit one of its degenerate inputs.
    #[error("state synthesis is degenerate: {reason}")]
    DegenerateSynthesis { reason: String },

    /// Array reshaping failed.
    #[error("shape error: {0}")]
    Shape(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl QcError {
    /// Create a malformed-gate error.
    pub fn malformed_gate(reason: impl Into<String>) -> Self {
        Self::MalformedGate {
            reason: reason.into(),
        }
    }

    /// Create an invalid-register error.
    pub fn invalid_register(reason: impl Into<String>) -> Self {
        Self::InvalidRegister {
            reason: reason.into(),
        }
    }

    /// Create an invalid-basis-state error.
    pub fn invalid_basis_state(reason: impl Into<String>) -> Self {
        Self::InvalidBasisState {
            reason: reason.into(),
        }
    }

    /// Create an invalid-oracle error.
    pub fn invalid_oracle(reason: impl Into<String>) -> Self {
        Self::InvalidOracle {
            reason: reason.into(),
        }
    }

    /// Create an invalid-parameter error.
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create a degenerate-synthesis error.
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateSynthesis {
            reason: reason.into(),
        }
    }
}

impl From<ndarray::ShapeError> for QcError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err.to_string())
    }
}

impl From<serde_json::Error> for QcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

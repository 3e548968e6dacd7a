pub mod error;
pub mod config;
pub mod index;
pub mod linalg;
pub mod basis;
pub mod state;
pub mod gate;
pub mod catalog;
pub mod apply;
pub mod measure;
pub mod computer;
pub mod algorithms;
pub mod display;
pub mod synthesis;

pub use error::{QcError, Result};
pub use config::{SimConfig, DEFAULT_TOLERANCE};
pub use state::State;
pub use gate::{verify_gate, Gate};
pub use apply::apply_gate;
pub use computer::{Axes, QuantumComputer, Register};
pub use display::{whatis, DisplayConfig};

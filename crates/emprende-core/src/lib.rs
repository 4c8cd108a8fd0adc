pub mod error;
pub mod forms;
pub mod time_value;
pub mod types;

#[cfg(feature = "credit")]
pub mod credit;

#[cfg(feature = "viability")]
pub mod viability;

#[cfg(feature = "sales")]
pub mod sales;

#[cfg(feature = "history")]
pub mod history;

pub use error::{Constraint, EmprendeError};
pub use types::*;

/// Standard result type for all emprende operations
pub type EmprendeResult<T> = Result<T, EmprendeError>;

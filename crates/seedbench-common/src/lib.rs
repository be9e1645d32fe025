//! Common types and errors shared by SeedBench components.

pub mod error;
pub mod types;

pub use error::{AppError, AppResult};
pub use types::*;

//! Applicant profile auditing: per-field validation with annotated
//! verdicts, remote economic validation over a framed TCP protocol, and
//! deterministic risk weighting of the asserted values.

pub mod config;
pub mod downstream;
pub mod error;
pub mod profile;
pub mod remote;
pub mod telemetry;

pub use error::AppError;

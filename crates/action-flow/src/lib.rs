//! Step execution - replays recorded action plans against a page
//!
//! Provides:
//! - `StepExecutor`: ordered, strictly sequential execution of a plan with
//!   runtime parameter substitution and `${KEY}` environment resolution
//! - Text verification with bounded polling
//! - Relative and absolute date resolution for date pickers
//! - Per-action reports recording which locator strategy matched

pub mod dates;
pub mod errors;
pub mod executor;
pub mod params;
pub mod types;

pub use dates::*;
pub use errors::*;
pub use executor::*;
pub use params::*;
pub use types::*;

//! Locator & self-heal - multi-strategy element resolution
//!
//! This crate turns a recorded `ElementDescriptor` into a live element handle:
//! - exact strategies first: recorded XPath, then `#id`, then visible text
//! - fingerprint healing when all of them miss: label, role + name, proximity
//! - a last-resort handle on the recorded XPath when nothing matches
//! - a trace of every probe for diagnostics

pub mod errors;
pub mod healer;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use errors::*;
pub use healer::*;
pub use resolver::*;
pub use strategies::*;
pub use types::*;

//! Action primitives - the browser session seam used by step execution
//!
//! This crate provides:
//! - `BrowserPage` / `ElementHandle` traits that every backend implements
//! - `Selector`, the backend-neutral way of asking for an element
//! - `SmartWaitStrategy` with per-action timeout classes and page readiness
//! - A scripted in-memory page (`stub` feature) and a Chromium backend
//!   (`chromium` feature)

pub mod errors;
mod page;
pub mod types;
mod waiting;

#[cfg(feature = "chromium")]
pub mod chromium;
#[cfg(any(test, feature = "stub"))]
pub mod stub;

pub use errors::*;
pub use page::*;
pub use types::*;
pub use waiting::*;

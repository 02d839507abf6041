pub mod builtin;
pub mod registry;

pub use builtin::{default_registry, LocationFromSuggestion, SelectCountry};
pub use registry::{CustomStepRegistry, ManualMatch, ManualStep, StepContext};

//! pangolin-pilot-core: configuration model and wizard logic
//!
//! Everything the wizard knows that is not rendering lives here: the
//! service catalog, the configuration record, the per-category selection
//! maps, and the step navigator.

pub mod catalog;
pub mod config;
pub mod selection;
pub mod steps;

pub use catalog::{MediaServerOption, ServiceCategory, ServiceEntry};
pub use config::{ServiceField, ServiceSettings, StackConfig};
pub use selection::Selections;
pub use steps::{SetupStep, StepCursor};

pub mod controller;
pub mod diagnostics;
pub mod inference;
pub mod membership;
pub mod report;
pub mod rule;
pub mod table;
pub mod variable;

pub use controller::{Command, Controller, ControllerConfig, Evaluation, Sample, Turn};
pub use inference::{DegeneratePolicy, InferenceError};
pub use table::Variant;

//! Shared utilities for the dataflow evaluation engine.
mod errors;
mod id;
mod measure_time;

pub mod math;

pub use errors::{Error, ErrorKind, EvalResult};
pub use id::{GetName, Id};
pub use measure_time::measure_time;

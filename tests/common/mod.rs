pub mod harness;
pub mod tracing;

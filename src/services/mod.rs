//! Process-level services for the demo host
//!
//! Logging setup, log file locations and terminal mode management. None of
//! these are needed to embed the control in another application.

#[cfg(feature = "runtime")]
pub mod log_dirs;
#[cfg(feature = "runtime")]
pub mod terminal_modes;
#[cfg(feature = "runtime")]
pub mod tracing_setup;

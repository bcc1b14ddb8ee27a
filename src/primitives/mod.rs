//! Low-level primitives and utilities

pub mod display_width;

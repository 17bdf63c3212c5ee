//! SQL support
//!
//! Currently only statement profiling.

pub mod profiler;

pub use profiler::{PreparedStatement, Profile, Profiler};

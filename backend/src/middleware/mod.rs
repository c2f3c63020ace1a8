//! Request middleware.
//!
//! Purpose: request lifecycle concerns that wrap every handler, currently
//! trace-id correlation.

pub mod trace;

pub use trace::Trace;

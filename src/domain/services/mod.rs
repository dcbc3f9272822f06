//! Domain services
//!
//! Pure business logic that operates on domain entities.

mod verdict_interpreter;

pub use verdict_interpreter::{normalize_flag, VerdictInterpreter};

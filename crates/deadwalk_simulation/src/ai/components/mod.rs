//! AI components (target model, state machine driver, senses).

pub mod machine;
pub mod senses;
pub mod target;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod machine_tests;

// Re-export all components
pub use machine::*;
pub use senses::*;
pub use target::*;

//! AI systems (FixedUpdate, порядок задаёт AiSet)

pub mod animation;
pub mod locomotion;
pub mod sense;
pub mod think;

// Re-export all systems
pub use animation::*;
pub use locomotion::*;
pub use sense::*;
pub use think::*;

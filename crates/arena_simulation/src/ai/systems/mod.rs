//! AI systems (target acquisition + pursuit)

pub mod pursuit;
pub mod targeting;

// Re-export all systems
pub use pursuit::*;
pub use targeting::*;

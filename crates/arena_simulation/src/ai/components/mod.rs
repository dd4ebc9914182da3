//! AI components

pub mod chase;


pub use chase::*;

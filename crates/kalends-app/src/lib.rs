//! Command-line agenda viewer built on the `kalends-recur` engine.

pub mod agenda;
pub mod cli;
pub mod error;
pub mod render;

//! Shared configuration and error types for the Kalends workspace.

pub mod config;
pub mod error;

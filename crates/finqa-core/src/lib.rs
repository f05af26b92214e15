//! Shared types, traits, configuration and corpus handling for the finqa
//! workspace.

pub mod config;
pub mod corpus;
pub mod error;
pub mod traits;
pub mod types;

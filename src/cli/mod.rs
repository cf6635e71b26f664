// file: src/cli/mod.rs
// version: 0.3.0
// guid: 0f6b83d4-a2c7-4e19-b5d0-37c8e41f9a62

//! Command line interface for the onboard environment helper

pub mod args;
pub mod commands;

pub use args::Cli;

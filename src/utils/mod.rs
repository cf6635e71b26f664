// file: src/utils/mod.rs
// version: 0.3.0
// guid: b6f41d92-0c7e-4a35-9d86-2e51c8a0f7b3

//! Utility modules for host system operations

pub mod system;

pub use system::SystemUtils;

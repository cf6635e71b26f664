// file: src/lib.rs
// version: 0.3.0
// guid: 9a4f2c81-3b6d-4e05-8f17-c2d90ab3e654

//! # Onboard Environment Helper
//!
//! Command-line helper around `docker build`, `pull`, `run`, `exec` and `stop`
//! with the project defaults for the drone onboard simulation container
//! (ROS, PX4 SITL, sensor drivers, ML inference libraries): bind mounts,
//! network defaults, image tags and an optional Alibaba ACR registry mirror.
//!
//! The helper composes one external `docker` invocation per command and relays
//! its exit status; it does not track container state beyond what `docker`
//! itself reports.

pub mod cli;
pub mod config;
pub mod container;
pub mod docker;
pub mod error;
pub mod logging;
pub mod resources;
pub mod utils;

pub use error::{OnboardError, Result};

/// Version information for the helper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

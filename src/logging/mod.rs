// file: src/logging/mod.rs
// version: 0.3.0
// guid: d5b07f31-98c2-4ad6-a1e4-3f62b8c5d470

//! Logging module for the onboard environment helper

pub mod logger;

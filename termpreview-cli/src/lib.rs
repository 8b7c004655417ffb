// ABOUTME: Library exports for the termpreview CLI modules for testing and external use
// ABOUTME: Makes internal modules available to integration tests and benchmarks

pub mod cli_output;
pub mod commands;
pub mod config;
pub mod conversion;

//! Command implementations for the movies CLI

pub mod serve;

pub use serve::run_serve;

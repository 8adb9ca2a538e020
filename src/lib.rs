pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod encoder;
pub mod error;
pub mod history;
pub mod keystore;
pub mod progress;
pub mod prompt;
pub mod render;
pub mod report;

pub use error::FinLensError;

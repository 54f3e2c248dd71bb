pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod narrative;
pub mod review;
pub mod workflow;

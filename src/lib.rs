pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod parser;
pub mod record;
pub mod stats;

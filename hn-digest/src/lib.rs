pub mod cli;
pub mod fetch;
pub mod hn;
pub mod http;
pub mod llm;
pub mod load_config;
pub mod upload;

pub use cli::{run, Cli, Commands};

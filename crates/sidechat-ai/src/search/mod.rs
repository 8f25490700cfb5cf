//! Custom Search JSON API client used as the web-search tool.

mod client;
mod config;

pub use client::SearchClient;
pub use config::SearchConfig;

use std::path::PathBuf;

use clap::Parser;

/// Sidechat: a terminal chat with Gemini and web search.
#[derive(Parser, Debug)]
#[command(name = "sidechat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. "sidechat=debug").
    #[arg(long)]
    pub log_level: Option<String>,

    /// Session key the conversation is stored under.
    #[arg(short = 's', long)]
    pub session: Option<String>,

    /// Keep the conversation in memory only.
    #[arg(long)]
    pub no_persist: bool,

    /// Response language code (en, vi).
    #[arg(short = 'l', long)]
    pub lang: Option<String>,

    /// Send one prompt, print the answer and exit.
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

use clap::Parser;

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "netshelf", about = "Load and print a remote content catalog")]
pub struct Cli {
    /// Catalog feed URL
    #[arg(short = 'c', long)]
    pub catalog: String,

    /// Bearer token for catalogs that require authentication.
    /// WARNING: passing via --token is visible in process listings.
    /// Prefer the NETSHELF_TOKEN environment variable instead.
    #[arg(short = 't', long, env = "NETSHELF_TOKEN")]
    pub token: Option<String>,

    /// Skip the pre-flight session check even when a token is configured
    #[arg(long)]
    pub no_auth_check: bool,

    /// Resume a previously interrupted load instead of starting fresh
    #[arg(long)]
    pub resume: bool,

    /// After loading the root, also load each sub-catalog one level down
    #[arg(short = 'r', long)]
    pub recurse: bool,

    /// Entries requested per page
    #[arg(long, default_value_t = 50)]
    pub page_size: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Re-run a failed load up to this many times, resuming where possible
    #[arg(long, default_value_t = 0)]
    pub max_reloads: u32,

    /// Base delay in seconds between reload attempts
    #[arg(long, default_value_t = 5)]
    pub reload_delay: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

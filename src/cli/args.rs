use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "recount",
    version,
    about = "Re-count live upvotes and comments for a Reddit data export"
)]
pub struct Cli {
    /// TOML config file (default: ./recount.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch live counts for posts and comments and print the top rankings
    Run(RunArgs),
    /// List every CSV in the archive with its columns and a sample
    Inspect(InspectArgs),
    /// Offline activity summary: posts/comments per month and per community
    Stats(StatsArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Export archive (default: basic.archive_path)
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Rows per ranking (default: report.top_n)
    #[arg(long)]
    pub top: Option<usize>,

    /// Only enrich the first N rows of each table
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only keep posts/comments dated in this year
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub skip_posts: bool,

    #[arg(long)]
    pub skip_comments: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Export archive (default: basic.archive_path)
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Sample rows printed per entry
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
}

#[derive(clap::Args, Debug, Clone)]
pub struct StatsArgs {
    /// Export archive (default: basic.archive_path)
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Communities with fewer items are grouped under "Other"
    #[arg(long, default_value_t = 3)]
    pub min_count: usize,

    /// Only count posts/comments dated in this year
    #[arg(long)]
    pub year: Option<i32>,
}

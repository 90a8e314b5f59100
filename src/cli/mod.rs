pub mod args;
pub mod commands;

pub use args::{Cli, Command, InspectArgs, RunArgs, StatsArgs};
pub use commands::{COMMUNITY_METADATA_NOTE, KindReport, dispatch, inspect, run, summarize};

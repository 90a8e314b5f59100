pub mod archive;
pub mod cli;
pub mod config;
pub mod content;
pub mod enrich;
pub mod error;
pub mod fetcher;
pub mod report;
pub mod stats;
pub mod table;
pub mod utils;

pub use content::ContentKind;
pub use error::RecountError;
pub use fetcher::{FetchResult, Fetcher};
pub use table::{Cell, Table};

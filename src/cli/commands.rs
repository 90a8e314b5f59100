use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::args::{Cli, Command, InspectArgs, RunArgs, StatsArgs};
use crate::archive::{self, EntryInspection};
use crate::config::Config;
use crate::content::{COMMENT_VOTES_CSV, ContentKind, POST_VOTES_CSV};
use crate::enrich::{EnrichSummary, Progress, enrich};
use crate::error::RecountError;
use crate::fetcher::{Fetcher, StatsSource};
use crate::report;
use crate::stats::{self, Bucket};
use crate::table::Table;

const PROGRESS_LOG_EVERY: usize = 10;
const RULE_WIDTH: usize = 50;
pub const COMMUNITY_METADATA_NOTE: &str =
    "Note: community metadata (subscribers, titles) needs live lookups and is not shown.";

pub async fn dispatch(cli: Cli, cfg: &Config) -> Result<(), RecountError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.cmd {
        Command::Run(args) => {
            let fetcher = Fetcher::from_config(&cfg.fetch)?;
            run(&args, cfg, &fetcher, &mut out).await?;
        }
        Command::Inspect(args) => inspect(&args, cfg, &mut out)?,
        Command::Stats(args) => summarize(&args, cfg, &mut out)?,
    }
    Ok(())
}

fn archive_path<'a>(explicit: Option<&'a PathBuf>, cfg: &'a Config) -> &'a Path {
    explicit.unwrap_or(&cfg.basic.archive_path).as_path()
}

/// Per-kind outcome of a `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindReport {
    pub kind: ContentKind,
    pub summary: EnrichSummary,
    pub ranking: Table,
}

/// Loads the export, enriches posts then comments, and prints the rankings.
pub async fn run<S, W>(
    args: &RunArgs,
    cfg: &Config,
    source: &S,
    out: &mut W,
) -> Result<Vec<KindReport>, RecountError>
where
    S: StatsSource + ?Sized,
    W: Write,
{
    let path = archive_path(args.archive.as_ref(), cfg);
    let kinds: Vec<ContentKind> = [ContentKind::Post, ContentKind::Comment]
        .into_iter()
        .filter(|kind| match kind {
            ContentKind::Post => !args.skip_posts,
            ContentKind::Comment => !args.skip_comments,
        })
        .collect();
    let targets: Vec<&str> = kinds.iter().map(|k| k.csv_name()).collect();

    let mut tables = archive::load_tables(path, &targets);
    let top = args.top.unwrap_or(cfg.report.top_n);
    let mut reports = Vec::new();

    for kind in kinds {
        let Some(mut table) = tables.remove(kind.csv_name()) else {
            writeln!(out, "\n[WARN] {} not found.", kind.csv_name())?;
            continue;
        };

        if let Some(year) = args.year {
            let removed = stats::retain_year(&mut table, year);
            info!(%kind, year, removed, kept = table.len(), "Applied year filter");
        }

        writeln!(out, "\n{}", "-".repeat(RULE_WIDTH))?;
        writeln!(out, "{} PREVIEW (raw rows)", heading(kind))?;
        write!(
            out,
            "{}",
            report::render(&table.head(cfg.report.preview_rows), cfg.report.max_cell_width)
        )?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

        if let Some(limit) = args.limit {
            table.truncate(limit);
        }

        let summary = enrich(&mut table, kind, source, |p| log_progress(kind, p)).await;
        let ranking = report::ranking(&table, kind, top, &cfg.report);

        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "TOP {top} {} (by live upvotes)", heading(kind))?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        write!(out, "{}", report::render(&ranking, cfg.report.max_cell_width))?;

        reports.push(KindReport {
            kind,
            summary,
            ranking,
        });
    }

    writeln!(out, "\nDone.")?;
    Ok(reports)
}

fn heading(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Post => "POSTS",
        ContentKind::Comment => "COMMENTS",
    }
}

fn log_progress(kind: ContentKind, progress: Progress) {
    if progress.processed % PROGRESS_LOG_EVERY == 0 || progress.processed == progress.total {
        info!(
            %kind,
            processed = progress.processed,
            total = progress.total,
            "Enrichment progress"
        );
    }
}

/// Prints every CSV entry in the archive with its size, columns and a sample.
pub fn inspect<W: Write>(args: &InspectArgs, cfg: &Config, out: &mut W) -> Result<(), RecountError> {
    let path = archive_path(args.archive.as_ref(), cfg);
    let entries = match archive::inspect_archive(path, args.rows) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Archive could not be inspected");
            writeln!(out, "Archive {} could not be read: {e}", path.display())?;
            return Ok(());
        }
    };

    writeln!(out, "Archive: {}", path.display())?;
    writeln!(out, "Found {} CSV entries.", entries.len())?;
    for entry in &entries {
        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "ENTRY: {}", entry.name())?;
        match entry {
            EntryInspection::Loaded {
                rows,
                columns,
                sample,
                ..
            } => {
                writeln!(out, "   Rows: {rows} | Columns: {}", columns.len())?;
                writeln!(out, "   Column names: {}", columns.join(", "))?;
                writeln!(out, "\n   Sample (first {}):", sample.len())?;
                write!(out, "{}", report::render(sample, cfg.report.max_cell_width))?;
            }
            EntryInspection::Failed { error, .. } => {
                writeln!(out, "   Could not read CSV: {error}")?;
            }
        }
    }
    Ok(())
}

/// Prints posts/comments per month and items per community, without network access.
pub fn summarize<W: Write>(args: &StatsArgs, cfg: &Config, out: &mut W) -> Result<(), RecountError> {
    let path = archive_path(args.archive.as_ref(), cfg);
    let posts_csv = ContentKind::Post.csv_name();
    let comments_csv = ContentKind::Comment.csv_name();
    let mut tables = archive::load_tables(
        path,
        &[posts_csv, comments_csv, POST_VOTES_CSV, COMMENT_VOTES_CSV],
    );

    if let Some(year) = args.year {
        for name in [posts_csv, comments_csv] {
            if let Some(table) = tables.get_mut(name) {
                let removed = stats::retain_year(table, year);
                info!(entry = name, year, removed, "Applied year filter");
            }
        }
    }

    let dated: Vec<&Table> = [posts_csv, comments_csv]
        .iter()
        .filter_map(|name| tables.get(*name))
        .collect();
    let all: Vec<&Table> = tables.values().collect();

    writeln!(out, "ACTIVITY BY MONTH (posts + comments)")?;
    write_buckets(out, &stats::monthly_activity(&dated))?;

    writeln!(out, "\nACTIVITY BY COMMUNITY (posts, comments, upvotes)")?;
    let breakdown = stats::subreddit_breakdown(&all, args.min_count);
    if breakdown.is_empty() {
        writeln!(out, "   (no rows)")?;
    }
    write_buckets(out, &breakdown)?;
    writeln!(out, "\n{COMMUNITY_METADATA_NOTE}")?;
    Ok(())
}

fn write_buckets<W: Write>(out: &mut W, buckets: &[Bucket]) -> Result<(), RecountError> {
    let width = buckets
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);
    for bucket in buckets {
        writeln!(out, "   {:<width$}  {:>6}", bucket.label, bucket.value)?;
    }
    Ok(())
}

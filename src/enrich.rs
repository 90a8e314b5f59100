use tracing::info;

use crate::content::{ContentKind, PERMALINK, REAL_COMMENTS, REAL_UPS};
use crate::fetcher::{FetchResult, StatsSource};
use crate::table::{Cell, Table};

/// Rows processed so far out of the table size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub rows: usize,
    pub fetched: usize,
    pub without_permalink: usize,
}

/// Adds live counts to every row of `table`, in row order, one lookup at a time.
///
/// Rows without a permalink get zero counts and no lookup. Post tables gain
/// `real_ups` and `real_comments`; comment tables gain `real_ups` only.
/// `on_progress` fires once per row.
pub async fn enrich<S, F>(
    table: &mut Table,
    kind: ContentKind,
    source: &S,
    mut on_progress: F,
) -> EnrichSummary
where
    S: StatsSource + ?Sized,
    F: FnMut(Progress),
{
    let total = table.len();
    info!(%kind, rows = total, "Starting enrichment");

    let mut summary = EnrichSummary {
        rows: total,
        ..EnrichSummary::default()
    };
    let mut real_ups = Vec::with_capacity(total);
    let mut real_comments = Vec::with_capacity(total);

    for row in 0..total {
        let counts = match table.text(row, PERMALINK) {
            Some(permalink) => {
                summary.fetched += 1;
                source.fetch_counts(permalink, kind).await
            }
            None => {
                summary.without_permalink += 1;
                FetchResult::default()
            }
        };
        real_ups.push(Cell::Int(counts.score));
        real_comments.push(Cell::Int(counts.reply_count));

        on_progress(Progress {
            processed: row + 1,
            total,
        });
    }

    table.set_column(REAL_UPS, real_ups);
    if kind == ContentKind::Post {
        table.set_column(REAL_COMMENTS, real_comments);
    }

    info!(
        %kind,
        rows = summary.rows,
        fetched = summary.fetched,
        without_permalink = summary.without_permalink,
        "Enrichment finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{collections::HashMap, sync::Mutex};

    #[derive(Default)]
    struct FakeSource {
        counts: HashMap<String, FetchResult>,
        calls: Mutex<Vec<(String, ContentKind)>>,
    }

    #[async_trait]
    impl StatsSource for FakeSource {
        async fn fetch_counts(&self, permalink: &str, kind: ContentKind) -> FetchResult {
            self.calls
                .lock()
                .unwrap()
                .push((permalink.to_string(), kind));
            self.counts.get(permalink).copied().unwrap_or_default()
        }
    }

    fn posts() -> Table {
        Table::from_csv_reader(
            "id,permalink,title\n\
             p1,https://r.test/p1/,One\n\
             p2,,Two\n\
             p3,https://r.test/p3/,Three\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_gain_both_columns_in_row_order() {
        let mut source = FakeSource::default();
        source.counts.insert(
            "https://r.test/p1/".to_string(),
            FetchResult {
                score: 42,
                reply_count: 7,
            },
        );
        source.counts.insert(
            "https://r.test/p3/".to_string(),
            FetchResult {
                score: 5,
                reply_count: 1,
            },
        );

        let mut table = posts();
        let summary = enrich(&mut table, ContentKind::Post, &source, |_| {}).await;

        assert_eq!(
            summary,
            EnrichSummary {
                rows: 3,
                fetched: 2,
                without_permalink: 1
            }
        );
        let ups: Vec<_> = (0..3).map(|i| table.cell(i, REAL_UPS).cloned()).collect();
        assert_eq!(
            ups,
            [Some(Cell::Int(42)), Some(Cell::Int(0)), Some(Cell::Int(5))]
        );
        assert_eq!(table.cell(1, REAL_COMMENTS), Some(&Cell::Int(0)));
        assert_eq!(table.cell(2, REAL_COMMENTS), Some(&Cell::Int(1)));
        assert_eq!(table.text(0, "id"), Some("p1"));
    }

    #[tokio::test]
    async fn missing_permalink_never_reaches_source() {
        let source = FakeSource::default();
        let mut table = Table::from_csv_reader("id,permalink\nc1,\nc2,\n".as_bytes()).unwrap();

        enrich(&mut table, ContentKind::Post, &source, |_| {}).await;

        assert!(source.calls.lock().unwrap().is_empty());
        assert_eq!(table.cell(0, REAL_UPS), Some(&Cell::Int(0)));
        assert_eq!(table.cell(1, REAL_COMMENTS), Some(&Cell::Int(0)));
    }

    #[tokio::test]
    async fn table_without_permalink_column_still_gets_zero_counts() {
        let source = FakeSource::default();
        let mut table = Table::from_csv_reader("id,body\nc1,hello\n".as_bytes()).unwrap();

        enrich(&mut table, ContentKind::Comment, &source, |_| {}).await;

        assert!(source.calls.lock().unwrap().is_empty());
        assert_eq!(table.cell(0, REAL_UPS), Some(&Cell::Int(0)));
    }

    #[tokio::test]
    async fn comments_gain_only_score_column() {
        let source = FakeSource::default();
        let mut table =
            Table::from_csv_reader("id,permalink,body\nc1,https://r.test/c1/,hi\n".as_bytes())
                .unwrap();

        enrich(&mut table, ContentKind::Comment, &source, |_| {}).await;

        assert!(table.has_column(REAL_UPS));
        assert!(!table.has_column(REAL_COMMENTS));
        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            [("https://r.test/c1/".to_string(), ContentKind::Comment)]
        );
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_complete() {
        let source = FakeSource::default();
        let mut table = posts();
        let mut seen = Vec::new();

        enrich(&mut table, ContentKind::Post, &source, |p| seen.push(p)).await;

        assert_eq!(
            seen,
            (1..=3)
                .map(|processed| Progress {
                    processed,
                    total: 3
                })
                .collect::<Vec<_>>()
        );
    }
}

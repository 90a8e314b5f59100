//! Offline activity summaries over the export tables (no network).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use crate::content::{DATE, DIRECTION, PERMALINK, SUBREDDIT};
use crate::table::Table;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const UNKNOWN_COMMUNITY: &str = "Unknown";
pub const OTHER_BUCKET: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub value: usize,
}

impl Bucket {
    fn new(label: impl Into<String>, value: usize) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Parses the export timestamp (`2025-10-14 12:52:21 UTC`), RFC 3339, or a bare date.
pub fn parse_export_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let without_zone = raw.strip_suffix("UTC").map_or(raw, str::trim_end);

    NaiveDateTime::parse_from_str(without_zone, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(without_zone, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn row_date(table: &Table, row: usize) -> Option<NaiveDateTime> {
    table.text(row, DATE).and_then(parse_export_date)
}

/// Twelve `Jan..Dec` buckets counting rows with a parseable `date`.
pub fn monthly_activity(tables: &[&Table]) -> Vec<Bucket> {
    let mut counts = [0usize; 12];
    for table in tables {
        for row in 0..table.len() {
            if let Some(date) = row_date(table, row) {
                counts[date.month0() as usize] += 1;
            }
        }
    }
    MONTHS
        .iter()
        .zip(counts)
        .map(|(label, value)| Bucket::new(*label, value))
        .collect()
}

/// Community name in `/r/<name>/`, if the permalink has one.
pub fn subreddit_from_permalink(permalink: &str) -> Option<&str> {
    let (_, rest) = permalink.split_once("/r/")?;
    let (name, _) = rest.split_once('/')?;
    (!name.is_empty()).then_some(name)
}

/// `subreddit` column, else the permalink's community, else [`UNKNOWN_COMMUNITY`].
pub fn community_of(table: &Table, row: usize) -> String {
    table
        .text(row, SUBREDDIT)
        .or_else(|| {
            table
                .text(row, PERMALINK)
                .and_then(subreddit_from_permalink)
        })
        .unwrap_or(UNKNOWN_COMMUNITY)
        .to_string()
}

/// Counts rows per community across `tables`.
///
/// Vote rows with a `direction` other than `up` are skipped. Communities with
/// fewer than `min_count` rows fold into a trailing [`OTHER_BUCKET`]; the rest
/// are ordered by count, descending, first-seen order on ties.
pub fn subreddit_breakdown(tables: &[&Table], min_count: usize) -> Vec<Bucket> {
    let mut order: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for table in tables {
        for row in 0..table.len() {
            if table.text(row, DIRECTION).is_some_and(|d| d != "up") {
                continue;
            }
            let community = community_of(table, row);
            match index.get(&community) {
                Some(&i) => order[i].value += 1,
                None => {
                    index.insert(community.clone(), order.len());
                    order.push(Bucket::new(community, 1));
                }
            }
        }
    }

    let (mut kept, folded): (Vec<Bucket>, Vec<Bucket>) =
        order.into_iter().partition(|b| b.value >= min_count);
    kept.sort_by(|a, b| b.value.cmp(&a.value));

    let others: usize = folded.iter().map(|b| b.value).sum();
    if others > 0 {
        kept.push(Bucket::new(OTHER_BUCKET, others));
    }
    kept
}

/// Keeps rows dated within `year`. Rows without a parseable date are dropped.
/// Returns the number of rows removed.
pub fn retain_year(table: &mut Table, year: i32) -> usize {
    let before = table.len();
    table.retain_rows(|t, row| row_date(t, row).is_some_and(|d| d.year() == year));
    before - table.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_csv_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn parses_export_and_iso_dates() {
        let export = parse_export_date("2025-10-14 12:52:21 UTC").unwrap();
        assert_eq!((export.year(), export.month(), export.day()), (2025, 10, 14));

        let rfc = parse_export_date("2024-02-29T23:00:00-03:00").unwrap();
        assert_eq!((rfc.month(), rfc.day()), (3, 1));

        assert!(parse_export_date("2023-07-01").is_some());
        assert!(parse_export_date("yesterday").is_none());
    }

    #[test]
    fn monthly_activity_counts_dated_rows_only() {
        let posts = table("id,date\np1,2025-01-05 10:00:00 UTC\np2,\np3,2025-03-01 00:00:00 UTC\n");
        let comments = table("id,date\nc1,2024-01-20 08:00:00 UTC\n");

        let months = monthly_activity(&[&posts, &comments]);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0], Bucket::new("Jan", 2));
        assert_eq!(months[2], Bucket::new("Mar", 1));
        assert_eq!(months.iter().map(|b| b.value).sum::<usize>(), 3);
    }

    #[test]
    fn subreddit_from_permalink_requires_trailing_segment() {
        assert_eq!(
            subreddit_from_permalink("https://www.reddit.com/r/futebol/comments/x/"),
            Some("futebol")
        );
        assert_eq!(subreddit_from_permalink("https://www.reddit.com/r/futebol"), None);
        assert_eq!(subreddit_from_permalink("https://example.com/u/someone/"), None);
    }

    #[test]
    fn breakdown_folds_small_communities_and_skips_downvotes() {
        let posts = table(
            "subreddit,permalink\n\
             rust,\n\
             rust,\n\
             ,https://www.reddit.com/r/rust/comments/a/\n\
             golang,\n\
             ,\n",
        );
        let votes = table(
            "permalink,direction\n\
             https://www.reddit.com/r/golang/comments/b/,up\n\
             https://www.reddit.com/r/golang/comments/c/,up\n\
             https://www.reddit.com/r/golang/comments/d/,down\n",
        );

        let breakdown = subreddit_breakdown(&[&posts, &votes], 3);

        assert_eq!(
            breakdown,
            [
                Bucket::new("rust", 3),
                Bucket::new("golang", 3),
                Bucket::new(OTHER_BUCKET, 1),
            ]
        );
    }

    #[test]
    fn retain_year_drops_other_years_and_undated_rows() {
        let mut posts = table(
            "id,date\n\
             p1,2025-06-01 12:00:00 UTC\n\
             p2,2024-12-31 23:59:59 UTC\n\
             p3,\n\
             p4,2025-01-01 00:00:00 UTC\n",
        );

        let removed = retain_year(&mut posts, 2025);

        assert_eq!(removed, 2);
        assert_eq!(posts.text(0, "id"), Some("p1"));
        assert_eq!(posts.text(1, "id"), Some("p4"));
    }
}

use crate::config::ReportConfig;
use crate::content::{BODY, BODY_PREVIEW, ContentKind, REAL_UPS};
use crate::table::{Cell, Table};

/// Sorts by `sort_column` descending, keeps `n` rows and projects onto the
/// `display_columns` that exist in `table`.
///
/// The sort is stable: equal scores keep their original relative order.
pub fn top_n(table: &Table, n: usize, sort_column: &str, display_columns: &[&str]) -> Table {
    leading_rows(table, n, sort_column).select(display_columns)
}

fn leading_rows(table: &Table, n: usize, sort_column: &str) -> Table {
    let mut ranked = table.clone();
    ranked.sort_desc_by(sort_column);
    ranked.truncate(n);
    ranked
}

/// Adds `target` holding the first `chars` characters of `source` plus `...`.
///
/// Does nothing when `source` is absent.
pub fn add_preview_column(table: &mut Table, source: &str, target: &str, chars: usize) {
    let Some(values) = table.column_values(source) else {
        return;
    };
    let previews = values
        .into_iter()
        .map(|cell| {
            let text: String = cell.to_string().chars().take(chars).collect();
            Cell::Text(format!("{text}..."))
        })
        .collect();
    table.set_column(target, previews);
}

/// Top-N ranking by `real_ups` for an enriched table, using the columns shown for `kind`.
pub fn ranking(table: &Table, kind: ContentKind, n: usize, cfg: &ReportConfig) -> Table {
    let mut ranked = leading_rows(table, n, REAL_UPS);
    if kind == ContentKind::Comment {
        add_preview_column(&mut ranked, BODY, BODY_PREVIEW, cfg.body_preview_chars);
    }
    ranked.select(kind.display_columns())
}

/// Renders `table` as aligned plain text with a header line.
pub fn render(table: &Table, max_cell_width: usize) -> String {
    if table.columns().is_empty() {
        return "(no columns to display)\n".to_string();
    }

    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| fit(&c.to_string(), max_cell_width))
                .collect()
        })
        .collect();
    let headers: Vec<String> = table
        .columns()
        .iter()
        .map(|h| fit(h, max_cell_width))
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let numeric: Vec<bool> = (0..headers.len())
        .map(|i| {
            !table.is_empty()
                && table
                    .rows()
                    .iter()
                    .all(|row| matches!(row[i], Cell::Int(_)))
        })
        .collect();

    let mut out = String::new();
    write_line(&mut out, &headers, &widths, &numeric);
    for row in &rows {
        write_line(&mut out, row, &widths, &numeric);
    }
    if table.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize], numeric: &[bool]) {
    let line = cells
        .iter()
        .zip(widths)
        .zip(numeric)
        .map(|((cell, width), right)| {
            if *right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fit(text: &str, max_width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if max_width == 0 || flat.chars().count() <= max_width {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{REAL_COMMENTS, SUBREDDIT, TITLE};

    fn scored(scores: &[u64]) -> Table {
        let mut table = Table::new(["row", SUBREDDIT, REAL_UPS]);
        for (i, score) in scores.iter().enumerate() {
            table.push_row(vec![
                Cell::Text(format!("row{}", i + 1)),
                Cell::text("rust"),
                Cell::Int(*score),
            ]);
        }
        table
    }

    #[test]
    fn top_n_breaks_ties_by_original_order() {
        let table = scored(&[3, 9, 1, 9, 5]);
        let top = top_n(&table, 2, REAL_UPS, &["row", REAL_UPS]);

        assert_eq!(top.len(), 2);
        assert_eq!(top.text(0, "row"), Some("row2"));
        assert_eq!(top.text(1, "row"), Some("row4"));
        assert_eq!(top.cell(0, REAL_UPS), Some(&Cell::Int(9)));
        assert_eq!(top.cell(1, REAL_UPS), Some(&Cell::Int(9)));
    }

    #[test]
    fn top_n_omits_unknown_display_columns() {
        let table = scored(&[1, 2]);
        let top = top_n(&table, 5, REAL_UPS, &[SUBREDDIT, TITLE, REAL_UPS, REAL_COMMENTS]);

        assert_eq!(top.columns(), [SUBREDDIT, REAL_UPS]);
        assert_eq!(top.len(), 2);
        assert_eq!(top.cell(0, REAL_UPS), Some(&Cell::Int(2)));
    }

    #[test]
    fn comment_ranking_adds_body_preview() {
        let mut table = Table::new([SUBREDDIT, BODY, REAL_UPS]);
        table.push_row(vec![
            Cell::text("rust"),
            Cell::text("short"),
            Cell::Int(1),
        ]);
        table.push_row(vec![
            Cell::text("golang"),
            Cell::text("a".repeat(50)),
            Cell::Int(8),
        ]);

        let ranked = ranking(&table, ContentKind::Comment, 5, &ReportConfig::default());

        assert_eq!(ranked.columns(), [SUBREDDIT, BODY_PREVIEW, REAL_UPS]);
        assert_eq!(ranked.text(0, SUBREDDIT), Some("golang"));
        assert_eq!(
            ranked.text(0, BODY_PREVIEW),
            Some(format!("{}...", "a".repeat(40)).as_str())
        );
        assert_eq!(ranked.text(1, BODY_PREVIEW), Some("short..."));
    }

    #[test]
    fn render_aligns_columns() {
        let table = scored(&[12, 3]);
        let text = render(&table.select(&["row", REAL_UPS]), 60);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "row   real_ups");
        assert_eq!(lines[1], "row1        12");
        assert_eq!(lines[2], "row2         3");
    }

    #[test]
    fn render_trims_padding_and_terminates_lines() {
        let mut table = Table::new(["name", "note"]);
        table.push_row(vec![Cell::text("a"), Cell::Null]);
        table.push_row(vec![Cell::text("longer"), Cell::text("x")]);

        let text = render(&table, 60);

        assert_eq!(text, "name    note\na       NaN\nlonger  x\n");
    }

    #[test]
    fn render_truncates_wide_cells() {
        let mut table = Table::new(["body"]);
        table.push_row(vec![Cell::text("line one\nline two is long")]);
        let text = render(&table, 10);
        assert!(text.lines().nth(1).is_some_and(|l| l == "line one …"));
    }
}

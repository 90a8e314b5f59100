use csv::{ByteRecord, ReaderBuilder, Trim};
use std::{cmp::Ordering, fmt, io::Read};

/// A single table value. Empty CSV fields load as [`Cell::Null`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Null,
    Text(String),
    Int(u64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Null
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            Cell::Null | Cell::Int(_) => None,
        }
    }

    /// Numeric view used for ordering. Text is parsed leniently (`"12"`, `"12.0"`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Cell::Int(n) => Some(*n as f64),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            Cell::Null => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NaN"),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Descending order on the numeric view; missing/non-numeric values go last.
pub(crate) fn cmp_desc(a: &Cell, b: &Cell) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Header plus rows, loaded from one CSV entry.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Reads a headed CSV stream. Short rows are padded with nulls, long rows cut.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        let mut table = Table {
            columns,
            rows: Vec::new(),
        };

        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            let row = record
                .iter()
                .map(|field| Cell::text(String::from_utf8_lossy(field)))
                .collect();
            table.push_row(row);
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Non-empty text value of `column` in `row`.
    pub fn text(&self, row: usize, column: &str) -> Option<&str> {
        self.cell(row, column)?.as_str()
    }

    pub fn column_values(&self, column: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    /// Adds `column`, or overwrites it when it already exists.
    ///
    /// `values` is aligned with the current rows; missing trailing values are null.
    pub fn set_column(&mut self, column: &str, values: Vec<Cell>) {
        let idx = if let Some(idx) = self.column_index(column) {
            idx
        } else {
            self.columns.push(column.to_string());
            for row in &mut self.rows {
                row.push(Cell::Null);
            }
            self.columns.len() - 1
        };

        let mut values = values.into_iter();
        for row in &mut self.rows {
            row[idx] = values.next().unwrap_or_default();
        }
    }

    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// Keeps rows for which `keep(table, row_index)` holds, preserving order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Table, usize) -> bool,
    {
        let kept: Vec<bool> = (0..self.rows.len()).map(|i| keep(self, i)).collect();
        let mut flags = kept.into_iter();
        self.rows.retain(|_| flags.next().unwrap_or(false));
    }

    /// Stable descending sort on `column`. Unknown columns leave the order untouched.
    pub fn sort_desc_by(&mut self, column: &str) {
        if let Some(idx) = self.column_index(column) {
            self.rows.sort_by(|a, b| cmp_desc(&a[idx], &b[idx]));
        }
    }

    /// Projects onto the requested columns that exist, in request order.
    pub fn select(&self, wanted: &[&str]) -> Table {
        let picked: Vec<(usize, &str)> = wanted
            .iter()
            .filter_map(|name| self.column_index(name).map(|idx| (idx, *name)))
            .collect();

        Table {
            columns: picked.iter().map(|(_, name)| (*name).to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picked.iter().map(|(idx, _)| row[*idx].clone()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "id,permalink,subreddit,title\n\
        a1,https://www.reddit.com/r/rust/comments/a1/x/,rust,First\n\
        a2,,rust,No link\n\
        a3,https://www.reddit.com/r/golang/comments/a3/y/\n";

    #[test]
    fn csv_loads_with_nulls_and_padding() {
        let table = Table::from_csv_reader(CSV.as_bytes()).expect("valid csv");

        assert_eq!(table.columns(), ["id", "permalink", "subreddit", "title"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.text(0, "subreddit"), Some("rust"));
        assert!(table.cell(1, "permalink").is_some_and(Cell::is_null));
        assert!(table.cell(2, "title").is_some_and(Cell::is_null));
        assert_eq!(table.text(2, "missing_column"), None);
    }

    #[test]
    fn set_column_appends_then_replaces() {
        let mut table = Table::from_csv_reader(CSV.as_bytes()).expect("valid csv");
        table.set_column("real_ups", vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)]);
        assert_eq!(table.columns().last().map(String::as_str), Some("real_ups"));
        assert_eq!(table.cell(2, "real_ups"), Some(&Cell::Int(3)));

        table.set_column("real_ups", vec![Cell::Int(9)]);
        assert_eq!(table.columns().len(), 5);
        assert_eq!(table.cell(0, "real_ups"), Some(&Cell::Int(9)));
        assert_eq!(table.cell(1, "real_ups"), Some(&Cell::Null));
    }

    #[test]
    fn sort_is_stable_and_puts_missing_last() {
        let mut table = Table::new(["name", "score"]);
        for (name, score) in [("a", "3"), ("b", ""), ("c", "9"), ("d", "x"), ("e", "9")] {
            table.push_row(vec![Cell::text(name), Cell::text(score)]);
        }
        table.sort_desc_by("score");

        let names: Vec<_> = (0..table.len()).map(|i| table.text(i, "name")).collect();
        assert_eq!(
            names,
            [Some("c"), Some("e"), Some("a"), Some("b"), Some("d")]
        );
    }

    #[test]
    fn select_skips_unknown_columns_in_request_order() {
        let table = Table::from_csv_reader(CSV.as_bytes()).expect("valid csv");
        let projected = table.select(&["title", "real_ups", "subreddit"]);

        assert_eq!(projected.columns(), ["title", "subreddit"]);
        assert_eq!(projected.text(0, "title"), Some("First"));
        assert_eq!(projected.len(), 3);
    }

    #[test]
    fn retain_rows_preserves_order() {
        let mut table = Table::from_csv_reader(CSV.as_bytes()).expect("valid csv");
        table.retain_rows(|t, i| t.text(i, "permalink").is_some());
        assert_eq!(table.len(), 2);
        assert_eq!(table.text(0, "id"), Some("a1"));
        assert_eq!(table.text(1, "id"), Some("a3"));
    }
}

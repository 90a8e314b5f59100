use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use tracing::{error, info, warn};
use zip::ZipArchive;

use crate::error::RecountError;
use crate::table::Table;

/// Tables decoded from an export archive, keyed by target entry name.
pub type ArchiveTables = BTreeMap<String, Table>;

/// Loads the `targets` entries of the zip archive at `path` as CSV tables.
///
/// Entries match when their file name (last path component) equals the
/// target exactly, at any depth; the first match in archive order wins.
/// Missing or undecodable entries are skipped with a warning. An archive
/// that cannot be opened yields an empty map.
pub fn load_tables(path: &Path, targets: &[&str]) -> ArchiveTables {
    match open_archive(path) {
        Ok(mut archive) => load_from_archive(&mut archive, targets),
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "Failed to open export archive; no tables loaded"
            );
            ArchiveTables::new()
        }
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, RecountError> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

pub(crate) fn load_from_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    targets: &[&str],
) -> ArchiveTables {
    let entries = match entry_names(archive) {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "Failed to list archive entries; no tables loaded");
            return ArchiveTables::new();
        }
    };

    let mut tables = ArchiveTables::new();
    for target in targets {
        let Some((index, name)) = entries
            .iter()
            .find(|(_, name)| file_name(name) == *target)
        else {
            warn!(entry = %target, "Entry not found in archive");
            continue;
        };

        info!(entry = %name, "Reading entry");
        match read_table(archive, *index) {
            Ok(table) => {
                info!(entry = %name, rows = table.len(), "Entry loaded");
                tables.insert((*target).to_string(), table);
            }
            Err(e) => {
                warn!(entry = %name, error = %e, "Entry could not be decoded as CSV; skipping");
            }
        }
    }
    tables
}

/// File entries as `(index, full name)`, directories excluded, archive order.
fn entry_names<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<(usize, String)>, RecountError> {
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if !entry.is_dir() {
            names.push((index, entry.name().to_string()));
        }
    }
    Ok(names)
}

fn read_table<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
) -> Result<Table, RecountError> {
    let entry = archive.by_index(index)?;
    Ok(Table::from_csv_reader(entry)?)
}

fn file_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

/// Outcome of auditing one `.csv` entry.
#[derive(Debug, Clone)]
pub enum EntryInspection {
    Loaded {
        name: String,
        rows: usize,
        columns: Vec<String>,
        sample: Table,
    },
    Failed {
        name: String,
        error: String,
    },
}

impl EntryInspection {
    pub fn name(&self) -> &str {
        match self {
            EntryInspection::Loaded { name, .. } | EntryInspection::Failed { name, .. } => name,
        }
    }
}

/// Audits every entry ending in `.csv` (any case): size, header and a sample.
///
/// A broken entry is reported in place and does not stop the audit.
pub fn inspect_archive(
    path: &Path,
    sample_rows: usize,
) -> Result<Vec<EntryInspection>, RecountError> {
    let mut archive = open_archive(path)?;
    let csv_entries: Vec<(usize, String)> = entry_names(&mut archive)?
        .into_iter()
        .filter(|(_, name)| name.to_ascii_lowercase().ends_with(".csv"))
        .collect();

    info!(path = %path.display(), csv_entries = csv_entries.len(), "Inspecting archive");

    Ok(csv_entries
        .into_iter()
        .map(|(index, name)| match read_table(&mut archive, index) {
            Ok(table) => EntryInspection::Loaded {
                name,
                rows: table.len(),
                columns: table.columns().to_vec(),
                sample: table.head(sample_rows),
            },
            Err(e) => EntryInspection::Failed {
                name,
                error: e.to_string(),
            },
        })
        .collect())
}

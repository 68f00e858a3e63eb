//! Edge file loading.
//!
//! The edge file is CSV with a header row, `#` comment lines, and rows of
//! `station_a,station_b,distance_km`. Rows with the wrong number of fields
//! are passed through so the snapshot builder can report them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

/// Errors that prevent the edge file from being read at all.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened
    #[error("cannot open edge file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream is unreadable (I/O failure or invalid UTF-8)
    #[error("cannot read edge data: {0}")]
    Csv(#[from] csv::Error),
}

/// Read raw edge rows from any reader.
///
/// Each row is returned as its trimmed text fields.
pub fn read_edges<R: Read>(reader: R) -> Result<Vec<Vec<String>>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(rows = rows.len(), "read edge rows");
    Ok(rows)
}

/// Read raw edge rows from a file.
pub fn load_edges(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_edges(file)
}

//! Parser for the movie metadata CSV.
//!
//! The file is the TMDB-derived `movies_metadata.csv`: two dozen columns, of
//! which the catalog only needs five, selected by header name:
//! `id, title, overview, vote_count, vote_average`.
//!
//! Field rules:
//! - empty `overview` / `title` become `""`
//! - empty `vote_count` means "unknown" and fails the vote threshold
//! - empty `vote_average` becomes `0.0`
//! - a non-empty number that doesn't parse is a hard error

use crate::error::{DataLoadError, Result};
use crate::types::Movie;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 5] = ["id", "title", "overview", "vote_count", "vote_average"];

/// Column positions of the required fields within a header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    id: usize,
    title: usize,
    overview: usize,
    vote_count: usize,
    vote_average: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord, file: &str) -> Result<Self> {
        let mut positions = [0usize; 5];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    file: file.to_string(),
                    column: column.to_string(),
                })?;
        }
        let [id, title, overview, vote_count, vote_average] = positions;
        Ok(Self {
            id,
            title,
            overview,
            vote_count,
            vote_average,
        })
    }
}

/// Parse the catalog file and keep rows with at least `min_votes` votes.
pub fn parse_catalog(path: &Path, min_votes: f64) -> Result<Vec<Movie>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_catalog_reader(file, &name, min_votes)
}

/// Parse catalog CSV from any reader.
///
/// `source_name` only shows up in error messages.
pub fn parse_catalog_reader<R: Read>(
    reader: R,
    source_name: &str,
    min_votes: f64,
) -> Result<Vec<Movie>> {
    let csv_error = |source: csv::Error| DataLoadError::Csv {
        file: source_name.to_string(),
        source,
    };

    // Ragged rows exist in the wild; missing trailing fields read as empty
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(reader.headers().map_err(csv_error)?, source_name)?;
    let mut movies = Vec::new();

    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line_no = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let vote_count = parse_number(field(columns.vote_count), "vote_count", source_name, line_no)?;
        // Unknown vote counts never pass the threshold
        let Some(vote_count) = vote_count.filter(|&count| count >= min_votes) else {
            continue;
        };

        let vote_average =
            parse_number(field(columns.vote_average), "vote_average", source_name, line_no)?
                .unwrap_or(0.0);

        movies.push(Movie {
            id: field(columns.id).trim().to_string(),
            title: field(columns.title).to_string(),
            overview: field(columns.overview).to_string(),
            vote_count,
            vote_average,
        });
    }

    Ok(movies)
}

/// Parse an optional floating point field
///
/// Example: "" -> Ok(None)
///          "123.0" -> Ok(Some(123.0))
///          "abc" -> Err(ParseError)
fn parse_number(raw: &str, field: &str, file: &str, line: u64) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason: format!("Invalid {}: '{}' ({})", field, raw, e),
        })
}

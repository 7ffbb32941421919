use crate::error::{ApiError, Result};
use crate::models::BookRecord;
use csv::ReaderBuilder;
use log::info;
use std::fs::File;
use std::path::Path;

/// Column names the catalog file must carry in its header row.
const REQUIRED_COLUMNS: [&str; 4] = ["title", "author", "description", "coverImg"];

/// In-memory book catalog, loaded once at startup and read-only afterwards.
///
/// Records are addressed by 0-based row position, which is also the id the
/// vector index stores in its match metadata. Reordering the catalog file
/// without rebuilding the index silently breaks that join.
#[derive(Debug)]
pub struct CatalogStore {
    records: Vec<BookRecord>,
}

impl CatalogStore {
    /// Parse the catalog CSV into row-indexed records.
    ///
    /// Fails if the file is missing, malformed, or lacks any of the required
    /// columns. Callers treat this as fatal at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| ApiError::CatalogLoad(format!("{}: {}", path.display(), e)))?;

        let mut rdr = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = rdr
            .headers()
            .map_err(|e| ApiError::CatalogLoad(format!("unreadable header row: {}", e)))?
            .clone();

        let mut columns = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| {
                    ApiError::CatalogLoad(format!("missing required column `{}`", name))
                })?;
        }
        let [title_col, author_col, description_col, cover_col] = columns;

        let mut records = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result
                .map_err(|e| ApiError::CatalogLoad(format!("bad record at row {}: {}", row, e)))?;

            let field = |col: usize| record.get(col).unwrap_or_default().to_string();
            records.push(BookRecord {
                id: row,
                title: field(title_col),
                author: field(author_col),
                description: field(description_col),
                cover_image_url: field(cover_col),
            });
        }

        info!("Loaded {} catalog rows from {}", records.len(), path.display());
        Ok(Self { records })
    }

    /// Look up the record at a row position.
    pub fn get(&self, id: i64) -> Result<&BookRecord> {
        if id < 0 || id as usize >= self.records.len() {
            return Err(ApiError::RowOutOfRange {
                id,
                rows: self.records.len(),
            });
        }
        Ok(&self.records[id as usize])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in row order.
    pub fn iter(&self) -> impl Iterator<Item = &BookRecord> {
        self.records.iter()
    }
}

use crate::store::fold_username;
use crate::{Error, Result};
use ahash::AHashMap;
use std::path::Path;
use tracing::info;

/// Handle -> human display name table, loaded from the celebrity listing
/// CSV. The file carries a `twitter` column for the handle and a `name`
/// column for the display name; any other columns are ignored.
pub struct DisplayNames {
    names: AHashMap<String, String>,
}

impl DisplayNames {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::DataLoad(format!("{}: {e}", path.display())))?;

        let headers = reader
            .headers()
            .map_err(|e| Error::DataLoad(format!("{}: {e}", path.display())))?;
        let handle_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("twitter"))
            .ok_or_else(|| {
                Error::DataLoad(format!("{}: missing 'twitter' column", path.display()))
            })?;
        let name_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("name"))
            .ok_or_else(|| Error::DataLoad(format!("{}: missing 'name' column", path.display())))?;

        let mut names = AHashMap::new();
        for row in reader.records() {
            let row = row.map_err(|e| Error::DataLoad(format!("{}: {e}", path.display())))?;
            let handle = row.get(handle_col).unwrap_or("").trim();
            let name = row.get(name_col).unwrap_or("").trim();
            if handle.is_empty() || name.is_empty() {
                continue;
            }
            // Last occurrence wins; the listing is informational only.
            names.insert(fold_username(handle), name.to_string());
        }

        info!(entries = names.len(), path = %path.display(), "display name listing loaded");
        Ok(Self { names })
    }

    /// Empty table for deployments without a listing file.
    pub fn empty() -> Self {
        Self {
            names: AHashMap::new(),
        }
    }

    pub fn get(&self, handle: &str) -> Option<&str> {
        self.names.get(&fold_username(handle)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

use crate::{Error, Result, Vector};
use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::info;

/// Case-folding applied to every username before lookup or comparison.
/// All lookup paths must go through this one function.
#[inline]
pub fn fold_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// One precomputed user embedding: a username and its mean-pooled vector.
#[derive(Debug, Clone)]
pub struct UserEmbedding {
    pub username: String,
    pub vector: Vector,
}

/// In-memory table of precomputed user embeddings, loaded once from a CSV
/// file with header `username,v1,...,vD` and read-only afterwards.
#[derive(Debug)]
pub struct EmbeddingStore {
    records: Vec<UserEmbedding>,
    index: AHashMap<String, usize>,
    dim: usize,
}

impl EmbeddingStore {
    /// Load the store from its CSV file.
    ///
    /// Rejects a missing or malformed file, rows whose vector arity differs
    /// from the header, non-finite components, case-insensitive duplicate
    /// usernames, and an empty table.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::DataLoad(format!("{}: {e}", path.display())))?;

        let headers = reader
            .headers()
            .map_err(|e| Error::DataLoad(format!("{}: {e}", path.display())))?;
        if headers.len() < 2 {
            return Err(Error::DataLoad(format!(
                "{}: header must be username,v1..vD",
                path.display()
            )));
        }
        let dim = headers.len() - 1;

        let mut records = Vec::new();
        let mut index: AHashMap<String, usize> = AHashMap::new();

        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(|e| Error::DataLoad(format!("{}: {e}", path.display())))?;
            if row.len() != dim + 1 {
                return Err(Error::DataLoad(format!(
                    "{}: row {} has {} columns, expected {}",
                    path.display(),
                    line + 2,
                    row.len(),
                    dim + 1
                )));
            }

            let username = row[0].trim().to_string();
            let mut components = Vec::with_capacity(dim);
            for field in row.iter().skip(1) {
                let value: f32 = field.trim().parse().map_err(|_| {
                    Error::DataLoad(format!(
                        "{}: row {} ({username}): bad component '{field}'",
                        path.display(),
                        line + 2
                    ))
                })?;
                components.push(value);
            }

            let vector = Vector::new(components);
            if !vector.is_finite() {
                return Err(Error::DataLoad(format!(
                    "{}: row {} ({username}): non-finite component",
                    path.display(),
                    line + 2
                )));
            }

            let key = fold_username(&username);
            if index.contains_key(&key) {
                return Err(Error::DataLoad(format!(
                    "{}: duplicate username '{username}' (case-insensitive)",
                    path.display()
                )));
            }
            index.insert(key, records.len());
            records.push(UserEmbedding { username, vector });
        }

        if records.is_empty() {
            return Err(Error::DataLoad(format!(
                "{}: store contains no users",
                path.display()
            )));
        }

        info!(
            users = records.len(),
            dim,
            path = %path.display(),
            "embedding store loaded"
        );
        Ok(Self {
            records,
            index,
            dim,
        })
    }

    /// Case-insensitive lookup of a stored user.
    pub fn lookup(&self, username: &str) -> Option<&UserEmbedding> {
        self.index
            .get(&fold_username(username))
            .map(|&i| &self.records[i])
    }

    pub fn contains(&self, username: &str) -> bool {
        self.index.contains_key(&fold_username(username))
    }

    /// Draw `n` distinct records, deterministic for a given seed and store
    /// state.
    pub fn sample(&self, n: usize, seed: u64) -> Result<Vec<&UserEmbedding>> {
        if n > self.records.len() {
            return Err(Error::InsufficientData {
                requested: n,
                available: self.records.len(),
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = rand::seq::index::sample(&mut rng, self.records.len(), n);
        Ok(picked.iter().map(|i| &self.records[i]).collect())
    }

    /// Iterate all records in file order. Restartable.
    pub fn iter(&self) -> impl Iterator<Item = &UserEmbedding> {
        self.records.iter()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

use celebmatch_core::{aggregate, SentenceEncoder, TextCleaner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no post files found under {0}")]
    NoInput(String),

    #[error("no user could be embedded")]
    NothingEmbedded,
}

/// Outcome of an offline store build.
#[derive(Debug)]
pub struct PrepareSummary {
    pub processed: usize,
    pub failed: Vec<String>,
}

/// Offline preparation: per-user post CSVs -> one embedding table.
///
/// Walks a directory of `<username>.csv` files (each with a `tweet` column),
/// runs every user's posts through clean + encode + mean-pool, and appends
/// `username,v1..vD` rows to the output file. A user that fails to embed is
/// recorded and skipped; the build carries on.
pub struct StoreBuilder {
    cleaner: Arc<dyn TextCleaner>,
    encoder: Arc<dyn SentenceEncoder>,
}

impl StoreBuilder {
    pub fn new(cleaner: Arc<dyn TextCleaner>, encoder: Arc<dyn SentenceEncoder>) -> Self {
        Self { cleaner, encoder }
    }

    pub async fn build<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        posts_dir: P,
        out_path: Q,
    ) -> Result<PrepareSummary, PrepareError> {
        let posts_dir = posts_dir.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(posts_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(PrepareError::NoInput(posts_dir.display().to_string()));
        }

        let mut writer: Option<csv::Writer<std::fs::File>> = None;
        let mut processed = 0usize;
        let mut failed = Vec::new();

        for path in &files {
            let Some(username) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let posts = match read_posts(path) {
                Ok(posts) => posts,
                Err(e) => {
                    warn!(username, error = %e, "skipping unreadable post file");
                    failed.push(username.to_string());
                    continue;
                }
            };

            let vector = match aggregate(
                self.cleaner.as_ref(),
                self.encoder.as_ref(),
                username,
                &posts,
            )
            .await
            {
                Ok(vector) => vector,
                Err(e) => {
                    warn!(username, error = %e, "skipping user");
                    failed.push(username.to_string());
                    continue;
                }
            };

            // Header dimension comes from the first successful embedding.
            if writer.is_none() {
                let mut header = Vec::with_capacity(vector.dim() + 1);
                header.push("username".to_string());
                header.extend((1..=vector.dim()).map(|i| format!("v{i}")));
                let mut w = csv::Writer::from_path(out_path.as_ref())?;
                w.write_record(&header)?;
                writer = Some(w);
            }

            if let Some(out) = writer.as_mut() {
                let mut row = Vec::with_capacity(vector.dim() + 1);
                row.push(username.to_string());
                row.extend(vector.as_slice().iter().map(|x| x.to_string()));
                out.write_record(&row)?;
            }

            processed += 1;
            info!(username, count = processed, "user embedded");
        }

        match writer {
            Some(mut w) => w.flush()?,
            None => return Err(PrepareError::NothingEmbedded),
        }

        if !failed.is_empty() {
            warn!(failed = failed.len(), "some users could not be embedded");
        }
        Ok(PrepareSummary { processed, failed })
    }
}

/// Read the `tweet` column of one per-user post file.
fn read_posts(path: &Path) -> Result<Vec<String>, PrepareError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?;
    let tweet_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("tweet"))
        .unwrap_or(0);

    let mut posts = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(text) = row.get(tweet_col) {
            if !text.trim().is_empty() {
                posts.push(text.to_string());
            }
        }
    }
    Ok(posts)
}

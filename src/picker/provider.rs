use std::path::PathBuf;

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use tokio::io::AsyncReadExt;

use crate::picker::source::Source;

/// Supplies the capture sources for one picker session.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Fetch the current sources, in display order.
    async fn sources(&self) -> Result<Vec<Source>>;
}

/// Reads a JSON array of sources from a file, or from stdin for `-`.
///
/// This lets any capture backend enumerate sources on its own terms and hand
/// them over, e.g. `capture-backend list --json | sharepick pick --sources -`.
pub struct FileSourceProvider {
    path: PathBuf,
}

impl FileSourceProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn reads_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

#[async_trait]
impl SourceProvider for FileSourceProvider {
    async fn sources(&self) -> Result<Vec<Source>> {
        let content = if self.reads_stdin() {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .wrap_err("Failed to read sources from stdin")?;
            content
        } else {
            tokio::fs::read_to_string(&self.path)
                .await
                .wrap_err_with(|| format!("Failed to read sources from {}", self.path.display()))?
        };

        let sources: Vec<Source> =
            serde_json::from_str(&content).wrap_err("Source list is not valid JSON")?;
        check_unique_ids(&sources)?;
        tracing::debug!("Loaded {} sources", sources.len());
        Ok(sources)
    }
}

/// Source ids identify the selection, so a duplicate makes the list unusable.
fn check_unique_ids(sources: &[Source]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for source in sources {
        if !seen.insert(source.id.as_str()) {
            return Err(eyre!("Duplicate source id {:?}", source.id));
        }
    }
    Ok(())
}

/// File-backed playtree document store
///
/// One JSON blob per playtree, `<id>.json`, under a base directory.
use crate::error::{Result, ServerError};
use playtree_core::types::Summary;
use playtree_core::PlaytreeDoc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    base_path: PathBuf,
}

impl DocumentStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create the store directory if missing
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Path of a document, after checking the id cannot escape the store
    fn document_path(&self, id: &str) -> Result<PathBuf> {
        let well_formed = !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !well_formed {
            return Err(ServerError::BadRequest(format!(
                "invalid playtree id \"{id}\""
            )));
        }
        Ok(self.base_path.join(format!("{id}.json")))
    }

    /// Summaries of every stored playtree, ordered by id
    pub async fn list(&self) -> Result<Vec<Summary>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match read_document(&path).await {
                Ok(doc) => summaries.push(doc.summary),
                Err(err) => warn!("skipping unreadable playtree at {}: {err}", path.display()),
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    pub async fn get(&self, id: &str) -> Result<PlaytreeDoc> {
        let path = self.document_path(id)?;
        match read_document(&path).await {
            Err(ServerError::Io(err)) if err.kind() == ErrorKind::NotFound => Err(
                ServerError::NotFound(format!("playtree \"{id}\" does not exist")),
            ),
            other => other,
        }
    }

    /// Store a new document; its id must not be taken yet
    pub async fn create(&self, doc: &PlaytreeDoc) -> Result<()> {
        let id = &doc.summary.id;
        let path = self.document_path(id)?;
        if fs::try_exists(&path).await? {
            return Err(ServerError::Conflict(format!(
                "playtree \"{id}\" already exists"
            )));
        }
        write_document(&path, doc).await
    }

    /// Replace an existing document
    pub async fn update(&self, id: &str, doc: &PlaytreeDoc) -> Result<()> {
        let path = self.document_path(id)?;
        if !fs::try_exists(&path).await? {
            return Err(ServerError::NotFound(format!(
                "playtree \"{id}\" does not exist"
            )));
        }
        write_document(&path, doc).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = self.document_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ServerError::NotFound(format!(
                "playtree \"{id}\" does not exist"
            ))),
            Err(err) => Err(err.into()),
        }
    }
}

async fn read_document(path: &Path) -> Result<PlaytreeDoc> {
    let bytes = fs::read(path).await?;
    Ok(PlaytreeDoc::from_slice(&bytes)?)
}

async fn write_document(path: &Path, doc: &PlaytreeDoc) -> Result<()> {
    let json =
        serde_json::to_vec_pretty(doc).map_err(|err| ServerError::Internal(err.to_string()))?;
    fs::write(path, json).await?;
    Ok(())
}

//! Implements SessionStorePort using a JSON file.
//!
//! The file holds one record under a fixed key: `{ "sntf_user": <identity or null> }`.

use crate::domain::{DomainError, Identity};
use crate::ports::SessionStorePort;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Key under which the signed-in identity is stored.
pub const SESSION_KEY: &str = "sntf_user";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionData {
    #[serde(rename = "sntf_user", default)]
    user: Option<Identity>,
}

/// JSON file-based session storage.
pub struct SessionJson {
    path: PathBuf,
}

impl SessionJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic save using write-replace:
    /// 1. Write to temp file
    /// 2. sync_all() to flush to disk
    /// 3. Rename over the target path
    async fn write(&self, data: &SessionData) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(data).map_err(|e| DomainError::Session(e.to_string()))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| DomainError::Session(format!("create session dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Session(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Session(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Session(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Session(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStorePort for SessionJson {
    /// Missing or unreadable files mean nobody is signed in.
    async fn load(&self) -> Result<Option<Identity>, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(_) => return Ok(None),
        };
        match serde_json::from_str::<SessionData>(&raw) {
            Ok(data) => Ok(data.user),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    async fn save(&self, identity: &Identity) -> Result<(), DomainError> {
        self.write(&SessionData {
            user: Some(identity.clone()),
        })
        .await?;
        debug!(path = %self.path.display(), user_id = %identity.id, "session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Session(format!("remove session file: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use chrono::{DateTime, Utc};

    fn who() -> Identity {
        Identity {
            id: "1".into(),
            email: "voyageur@example.com".into(),
            name: "Ahmed Bouhadjar".into(),
            role: Role::Traveler,
            phone: Some("+213 555 123 456".into()),
            created_at: "2024-01-10T08:00:00Z".parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[tokio::test]
    async fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionJson::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.load().await.unwrap(), None);

        let me = who();
        store.save(&me).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(me));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[SESSION_KEY]["role"], "traveler");
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        // clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = SessionJson::new(&path);
        assert_eq!(store.load().await.unwrap(), None);
    }
}

use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const MY_LIST_FILE: &str = "my_list.json";
const RESUME_FILE: &str = "resume.json";

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "IO error: {}", e),
            SessionError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Io(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err)
    }
}

/// Per-user browsing state: the "my list" favorites and the last viewed
/// index of each album. Stored as two flat JSON files, rewritten on every
/// change.
#[derive(Debug)]
pub struct SessionState {
    dir: PathBuf,
    favorites: Vec<String>,
    resume: BTreeMap<String, usize>,
}

impl SessionState {
    pub async fn open_default() -> Result<Self, SessionError> {
        let dir = dirs::data_dir()
            .or_else(dirs::cache_dir)
            .ok_or_else(|| {
                SessionError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not find data directory",
                ))
            })?
            .join("photosflix");
        Self::load(dir).await
    }

    pub async fn load(dir: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        let favorites: Vec<String> = read_entry(&dir.join(MY_LIST_FILE)).await?;
        let resume = read_entry(&dir.join(RESUME_FILE)).await?;
        tracing::debug!(favorites = favorites.len(), "Session state loaded");

        Ok(Self {
            dir,
            favorites,
            resume,
        })
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, album_id: &str) -> bool {
        self.favorites.iter().any(|id| id == album_id)
    }

    /// Adds or removes `album_id` from the list. Returns whether it is now
    /// a favorite.
    pub async fn toggle_favorite(&mut self, album_id: &str) -> Result<bool, SessionError> {
        let now_favorite = if let Some(pos) = self.favorites.iter().position(|id| id == album_id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(album_id.to_string());
            true
        };

        write_entry(&self.dir.join(MY_LIST_FILE), &self.favorites).await?;
        Ok(now_favorite)
    }

    pub fn resume_index(&self, album_id: &str) -> Option<usize> {
        self.resume.get(album_id).copied()
    }

    pub async fn set_resume(&mut self, album_id: &str, index: usize) -> Result<(), SessionError> {
        self.resume.insert(album_id.to_string(), index);
        write_entry(&self.dir.join(RESUME_FILE), &self.resume).await
    }
}

async fn read_entry<T>(path: &Path) -> Result<T, SessionError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let data = fs::read_to_string(path).await?;
    match serde_json::from_str(&data) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
            Ok(T::default())
        }
    }
}

async fn write_entry<T: Serialize>(path: &Path, value: &T) -> Result<(), SessionError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = SessionState::load(dir.path()).await.unwrap();

        assert!(state.favorites().is_empty());
        assert_eq!(state.resume_index("leonie"), None);
    }

    #[tokio::test]
    async fn test_toggle_favorite_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SessionState::load(dir.path()).await.unwrap();

        assert!(state.toggle_favorite("leonie").await.unwrap());
        assert!(state.toggle_favorite("sport").await.unwrap());
        assert!(!state.toggle_favorite("leonie").await.unwrap());
        assert!(state.is_favorite("sport"));

        let reloaded = SessionState::load(dir.path()).await.unwrap();
        assert_eq!(reloaded.favorites(), &["sport".to_string()]);
    }

    #[tokio::test]
    async fn test_resume_positions_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SessionState::load(dir.path()).await.unwrap();

        state.set_resume("leonie", 12).await.unwrap();
        state.set_resume("leonie", 13).await.unwrap();
        state.set_resume("misc", 2).await.unwrap();

        let reloaded = SessionState::load(dir.path()).await.unwrap();
        assert_eq!(reloaded.resume_index("leonie"), Some(13));
        assert_eq!(reloaded.resume_index("misc"), Some(2));
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MY_LIST_FILE), "{not json").unwrap();

        let state = SessionState::load(dir.path()).await.unwrap();
        assert!(state.favorites().is_empty());
    }
}

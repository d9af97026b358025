//! High score storage backends
//!
//! One integer is stored under the `highScore` key:
//! - `LocalStorageStore` in the browser (plain decimal string)
//! - `JsonFileStore` on native (`{"highScore": n}`)
//! - `MemoryStore` for tests and headless runs

/// Storage key shared by every backend
pub const HIGH_SCORE_KEY: &str = "highScore";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Browser storage call rejected (quota, privacy mode)
    #[error("storage call failed: {0}")]
    Storage(String),
    #[error("stored high score is invalid: {0}")]
    Parse(#[from] serde_json::Error),
    /// Backend not reachable on this platform (no window, storage disabled)
    #[error("storage unavailable")]
    Unavailable,
}

/// Where the best score lives between sessions
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<u64>, StoreError>;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
    /// Number of successful saves
    pub writes: usize,
}

impl MemoryStore {
    pub fn with_value(value: u64) -> Self {
        Self {
            value: Some(value),
            writes: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.value = Some(score);
        self.writes += 1;
        Ok(())
    }
}

/// Parse a stored value: a bare integer or a JSON number
pub fn parse_score(raw: &str) -> Result<u64, StoreError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u64>() {
        Ok(v) => Ok(v),
        Err(_) => Ok(serde_json::from_str::<u64>(trimmed)?),
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ScoreFile {
    #[serde(rename = "highScore")]
    high_score: u64,
}

/// JSON file on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let file: ScoreFile = serde_json::from_str(&json)?;
        Ok(Some(file.high_score))
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&ScoreFile { high_score: score })?;
        // tmp → save, same as a backup rotation without the backup
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("High score written to {}", self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage (wasm only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        let raw = Self::storage()?
            .get_item(HIGH_SCORE_KEY)
            .map_err(|e| StoreError::Storage(format!("{e:?}")))?;
        raw.as_deref().map(parse_score).transpose()
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(HIGH_SCORE_KEY, &score.to_string())
            .map_err(|e| StoreError::Storage(format!("{e:?}")))
    }
}

/// Store used by the host on this platform
#[cfg(target_arch = "wasm32")]
pub fn platform_store() -> LocalStorageStore {
    LocalStorageStore
}

/// Store used by the host on this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_store() -> JsonFileStore {
    JsonFileStore::new(format!("{HIGH_SCORE_KEY}.json"))
}

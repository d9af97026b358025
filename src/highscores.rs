//! Best score tracking
//!
//! Only the single best score survives between sessions. It is read once
//! when a session starts and written back once, at game over, if beaten.

use serde::{Deserialize, Serialize};

use crate::persistence::{ScoreStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// A score beats the record only if strictly greater (zero never does)
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Adopt `score` if it beats the record. Returns true when it did.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    pub fn try_load(store: &impl ScoreStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.load()?.unwrap_or(0)))
    }

    /// Load the stored record, starting fresh if storage is missing or broken
    pub fn load(store: &impl ScoreStore) -> Self {
        match Self::try_load(store) {
            Ok(high) => {
                log::info!("Loaded high score {}", high.best);
                high
            }
            Err(err) => {
                log::warn!("High score unavailable ({err}), starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl ScoreStore) -> Result<(), StoreError> {
        store.save(self.best)?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<Option<u64>, StoreError> {
            Err(StoreError::Storage("quota exceeded".into()))
        }

        fn save(&mut self, _score: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_qualifies() {
        let high = HighScore::new(500);
        assert!(!high.qualifies(0));
        assert!(!high.qualifies(500));
        assert!(high.qualifies(600));
        assert!(!HighScore::default().qualifies(0));
        assert!(HighScore::default().qualifies(100));
    }

    #[test]
    fn test_record() {
        let mut high = HighScore::new(300);
        assert!(!high.record(200));
        assert_eq!(high.best, 300);
        assert!(high.record(400));
        assert_eq!(high.best, 400);
    }

    #[test]
    fn test_load_and_save() {
        let mut store = MemoryStore::with_value(700);
        let mut high = HighScore::load(&store);
        assert_eq!(high.best, 700);

        high.record(800);
        high.save(&mut store).unwrap();
        assert_eq!(store.value, Some(800));
    }

    #[test]
    fn test_load_falls_back() {
        assert_eq!(HighScore::load(&MemoryStore::default()), HighScore::default());
        assert_eq!(HighScore::load(&BrokenStore), HighScore::default());
        assert!(HighScore::new(5).save(&mut BrokenStore).is_err());
    }
}

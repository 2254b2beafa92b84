//! Best score tracking
//!
//! Wraps a `ScoreStore` so the rest of the game only sees a number. Storage
//! failures are logged and otherwise ignored: losing the best score is not
//! worth interrupting a run for.

use crate::persistence::{MemoryStore, ScoreStore};

/// Best final score across sessions
pub struct BestScore {
    best: f64,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for BestScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestScore").field("best", &self.best).finish()
    }
}

impl Default for BestScore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl BestScore {
    /// Restore the stored best from `store`
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.load_best() {
            Ok(Some(best)) if best.is_finite() && best > 0.0 => {
                log::info!("Restored best score {}", best.floor());
                best
            }
            Ok(_) => 0.0,
            Err(e) => {
                log::warn!("Could not load best score: {}", e);
                0.0
            }
        };
        Self { best, store }
    }

    /// Not persisted anywhere
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn get(&self) -> f64 {
        self.best
    }

    /// Whether `score` would replace the current best
    pub fn qualifies(&self, score: f64) -> bool {
        score > 0.0 && score > self.best
    }

    /// Record a final score. Returns true (and persists) when it is a new best.
    pub fn submit(&mut self, score: f64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.save_best(score) {
            log::warn!("Could not save best score: {}", e);
        }
        true
    }
}

/// Score as shown to the player
pub fn format_score(score: f64) -> String {
    format!("{}", score.max(0.0).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::StoreError;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load_best(&self) -> Result<Option<f64>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn save_best(&mut self, _score: f64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_restores_stored_best() {
        let best = BestScore::new(Box::new(MemoryStore::with_best(640.0)));
        assert_eq!(best.get(), 640.0);
        assert!(!best.qualifies(640.0));
        assert!(best.qualifies(640.5));
    }

    #[test]
    fn test_submit_only_improvements() {
        let mut best = BestScore::in_memory();
        assert!(!best.submit(0.0));
        assert!(best.submit(120.0));
        assert!(!best.submit(80.0));
        assert_eq!(best.get(), 120.0);
    }

    #[test]
    fn test_broken_store_degrades() {
        let mut best = BestScore::new(Box::new(BrokenStore));
        assert_eq!(best.get(), 0.0);
        assert!(best.submit(50.0));
        assert_eq!(best.get(), 50.0);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(812.75), "812");
        assert_eq!(format_score(-3.0), "0");
    }
}

use std::path::Path;

use tracing::{debug, info};

use bnote_core::constants::SESSION_SERIES_MAX_LEN;
use bnote_core::error::BnoteError;
use bnote_core::{SessionSamplePoint, TimestampMillis};

use crate::series;

/// Metrics with a persisted session series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalShares,
    /// Token price in the chain's native coin.
    PriceRatio,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::TotalShares, Metric::PriceRatio];

    pub fn key(&self) -> &'static str {
        match self {
            Self::TotalShares => "total_shares",
            Self::PriceRatio => "price_ratio",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// Session series database backed by sled.
///
/// One tree, `series`: metric key bytes → bincode(Vec<SessionSamplePoint>).
pub struct SeriesStore {
    _db: sled::Db,
    series: sled::Tree,
    max_len: usize,
}

fn storage(e: sled::Error) -> BnoteError {
    BnoteError::Storage(e.to_string())
}

impl SeriesStore {
    /// Open or create the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BnoteError> {
        Self::open_with_limit(path, SESSION_SERIES_MAX_LEN)
    }

    pub fn open_with_limit<P: AsRef<Path>>(path: P, max_len: usize) -> Result<Self, BnoteError> {
        let db = sled::open(path).map_err(storage)?;
        let series = db.open_tree("series").map_err(storage)?;
        Ok(Self { _db: db, series, max_len })
    }

    /// Stored series for `metric`, empty if nothing was recorded yet.
    pub fn load(&self, metric: Metric) -> Result<Vec<SessionSamplePoint>, BnoteError> {
        match self.series.get(metric.key().as_bytes()).map_err(storage)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| BnoteError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    pub fn save(&self, metric: Metric, points: &[SessionSamplePoint]) -> Result<(), BnoteError> {
        let bytes = bincode::serialize(points)
            .map_err(|e| BnoteError::Serialization(e.to_string()))?;
        self.series
            .insert(metric.key().as_bytes(), bytes)
            .map_err(storage)?;
        Ok(())
    }

    /// Load, append under the bound, and write back. Returns the new length.
    pub fn record(
        &self,
        metric: Metric,
        value: f64,
        now_ms: TimestampMillis,
    ) -> Result<usize, BnoteError> {
        let points = series::record(self.load(metric)?, value, now_ms, self.max_len);
        self.save(metric, &points)?;
        debug!(metric = metric.key(), value, len = points.len(), "recorded session sample");
        Ok(points.len())
    }

    pub fn clear(&self, metric: Metric) -> Result<(), BnoteError> {
        self.series.remove(metric.key().as_bytes()).map_err(storage)?;
        Ok(())
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), BnoteError> {
        let bytes = self.series.flush().map_err(storage)?;
        info!(bytes, "session store flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str, max_len: usize) -> (SeriesStore, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "bnote_session_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        let store = SeriesStore::open_with_limit(&path, max_len).unwrap();
        (store, path)
    }

    #[test]
    fn empty_metric_loads_empty() {
        let (store, path) = temp_store("empty", 200);
        assert!(store.load(Metric::TotalShares).unwrap().is_empty());
        drop(store);
        let _ = std::fs::remove_dir_all(path);
    }

    #[test]
    fn metrics_are_independent_and_bounded() {
        let (store, path) = temp_store("bounded", 5);
        for i in 0..8 {
            store.record(Metric::TotalShares, i as f64, i).unwrap();
        }
        store.record(Metric::PriceRatio, 0.5, 100).unwrap();

        let shares = store.load(Metric::TotalShares).unwrap();
        let ts: Vec<i64> = shares.iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![3, 4, 5, 6, 7]);
        assert_eq!(store.load(Metric::PriceRatio).unwrap().len(), 1);

        store.clear(Metric::PriceRatio).unwrap();
        assert!(store.load(Metric::PriceRatio).unwrap().is_empty());
        drop(store);
        let _ = std::fs::remove_dir_all(path);
    }

    #[test]
    fn survives_reopen() {
        let (store, path) = temp_store("reopen", 200);
        store.record(Metric::PriceRatio, 1.25, 42).unwrap();
        store.flush().unwrap();
        drop(store);

        let store = SeriesStore::open(&path).unwrap();
        let points = store.load(Metric::PriceRatio).unwrap();
        assert_eq!(points, vec![SessionSamplePoint { timestamp: 42, value: 1.25 }]);
        drop(store);
        let _ = std::fs::remove_dir_all(path);
    }

    #[test]
    fn metric_keys_round_trip() {
        for m in Metric::ALL {
            assert_eq!(Metric::from_key(m.key()), Some(m));
        }
        assert_eq!(Metric::from_key("nope"), None);
    }
}

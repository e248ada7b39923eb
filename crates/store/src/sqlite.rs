//! SQLite-backed candle store.
//!
//! Timestamps are stored as RFC 3339 text in UTC, so lexicographic
//! `ORDER BY` is chronological. Upserts use `ON CONFLICT ... DO
//! UPDATE` on the natural keys.

use std::path::Path;

use fx_core::{Candle, CandleStore, Error, PredictionRecord, Result};
use rusqlite::{params, Connection};
use tracing::debug;

/// A `CandleStore` backed by a single SQLite database.
pub struct SqliteCandleStore {
    conn: Connection,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS fx_candles_1m (
    pair_name   TEXT NOT NULL,
    event_time  TEXT NOT NULL,
    open_price  REAL NOT NULL,
    high_price  REAL NOT NULL,
    low_price   REAL NOT NULL,
    close_price REAL NOT NULL,
    volume      INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (pair_name, event_time)
);
CREATE TABLE IF NOT EXISTS ai_predictions (
    pair_name   TEXT NOT NULL,
    target_time TEXT NOT NULL,
    direction   TEXT NOT NULL,
    confidence  REAL NOT NULL,
    PRIMARY KEY (pair_name, target_time)
);
";

fn db_err(e: rusqlite::Error) -> Error {
    Error::storage(e.to_string())
}

impl SqliteCandleStore {
    /// Open (and if needed initialize) a database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;
        debug!(path = %path.as_ref().display(), "opened candle store");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        Ok(Self { conn })
    }

    fn fetch(&self, pair_name: &str, limit: Option<usize>) -> Result<Vec<Candle>> {
        // Newest-first with LIMIT, then reversed to ascending, so the
        // limit trims the oldest rows.
        let sql = match limit {
            Some(_) => {
                "SELECT pair_name, event_time, open_price, high_price, low_price, \
                 close_price, volume FROM fx_candles_1m WHERE pair_name = ?1 \
                 ORDER BY event_time DESC LIMIT ?2"
            }
            None => {
                "SELECT pair_name, event_time, open_price, high_price, low_price, \
                 close_price, volume FROM fx_candles_1m WHERE pair_name = ?1 \
                 ORDER BY event_time DESC"
            }
        };
        let mut stmt = self.conn.prepare(sql).map_err(db_err)?;

        let map_row = |row: &rusqlite::Row<'_>| {
            Ok(Candle {
                pair_name: row.get(0)?,
                event_time: row.get(1)?,
                open_price: row.get(2)?,
                high_price: row.get(3)?,
                low_price: row.get(4)?,
                close_price: row.get(5)?,
                volume: row.get(6)?,
            })
        };
        let rows = match limit {
            Some(limit) => stmt
                .query_map(params![pair_name, limit as i64], map_row)
                .map_err(db_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(db_err)?,
            None => stmt
                .query_map(params![pair_name], map_row)
                .map_err(db_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(db_err)?,
        };

        let mut candles = rows;
        candles.reverse();
        Ok(candles)
    }

    /// All stored predictions for a pair, ascending by `target_time`.
    pub fn fetch_predictions(&self, pair_name: &str) -> Result<Vec<PredictionRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT pair_name, target_time, direction, confidence \
                 FROM ai_predictions WHERE pair_name = ?1 ORDER BY target_time ASC",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![pair_name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            })
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;

        rows.into_iter()
            .map(|(pair_name, target_time, direction, confidence)| {
                Ok(PredictionRecord {
                    pair_name,
                    target_time,
                    direction: fx_core::Direction::parse(&direction)?,
                    confidence,
                })
            })
            .collect()
    }
}

impl CandleStore for SqliteCandleStore {
    fn fetch_recent(&self, pair_name: &str, limit: usize) -> Result<Vec<Candle>> {
        self.fetch(pair_name, Some(limit))
    }

    fn fetch_all(&self, pair_name: &str) -> Result<Vec<Candle>> {
        self.fetch(pair_name, None)
    }

    fn upsert_candles(&mut self, candles: &[Candle]) -> Result<usize> {
        for candle in candles {
            candle.validate()?;
        }

        let tx = self.conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO fx_candles_1m \
                     (pair_name, event_time, open_price, high_price, low_price, close_price, volume) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
                     ON CONFLICT (pair_name, event_time) DO UPDATE SET \
                     open_price = excluded.open_price, high_price = excluded.high_price, \
                     low_price = excluded.low_price, close_price = excluded.close_price, \
                     volume = excluded.volume",
                )
                .map_err(db_err)?;
            for candle in candles {
                stmt.execute(params![
                    candle.pair_name,
                    candle.event_time,
                    candle.open_price,
                    candle.high_price,
                    candle.low_price,
                    candle.close_price,
                    candle.volume,
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        debug!(rows = candles.len(), "upserted candles");
        Ok(candles.len())
    }

    fn save_predictions(&mut self, records: &[PredictionRecord]) -> Result<usize> {
        let tx = self.conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO ai_predictions (pair_name, target_time, direction, confidence) \
                     VALUES (?1, ?2, ?3, ?4) \
                     ON CONFLICT (pair_name, target_time) DO UPDATE SET \
                     direction = excluded.direction, confidence = excluded.confidence",
                )
                .map_err(db_err)?;
            for record in records {
                stmt.execute(params![
                    record.pair_name,
                    record.target_time,
                    record.direction.as_str(),
                    record.confidence,
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        debug!(rows = records.len(), "saved predictions");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fx_core::Direction;

    fn candle(minute: i64, close: f64) -> Candle {
        Candle {
            pair_name: "USDJPY".to_string(),
            event_time: Utc.timestamp_opt(minute * 60, 0).unwrap(),
            open_price: close,
            high_price: close + 0.1,
            low_price: close - 0.1,
            close_price: close,
            volume: 5,
        }
    }

    fn prediction(minute: i64, direction: Direction, confidence: f64) -> PredictionRecord {
        PredictionRecord {
            pair_name: "USDJPY".to_string(),
            target_time: Utc.timestamp_opt(minute * 60, 0).unwrap(),
            direction,
            confidence,
        }
    }

    #[test]
    fn test_round_trip_ascending() {
        let mut store = SqliteCandleStore::open_in_memory().unwrap();
        store
            .upsert_candles(&[candle(1, 150.1), candle(0, 150.0), candle(2, 150.2)])
            .unwrap();

        let all = store.fetch_all("USDJPY").unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].event_time < w[1].event_time));
        assert_eq!(all[0], candle(0, 150.0));
    }

    #[test]
    fn test_fetch_recent_trims_oldest() {
        let mut store = SqliteCandleStore::open_in_memory().unwrap();
        let candles: Vec<Candle> = (0..10).map(|i| candle(i, 150.0 + i as f64)).collect();
        store.upsert_candles(&candles).unwrap();

        let recent = store.fetch_recent("USDJPY", 4).unwrap();
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[0].event_time, candles[6].event_time);
        assert_eq!(recent[3].event_time, candles[9].event_time);
    }

    #[test]
    fn test_candle_upsert_replaces() {
        let mut store = SqliteCandleStore::open_in_memory().unwrap();
        store.upsert_candles(&[candle(0, 150.0)]).unwrap();
        store.upsert_candles(&[candle(0, 152.0)]).unwrap();

        let all = store.fetch_all("USDJPY").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].close_price, 152.0);
    }

    #[test]
    fn test_prediction_upsert_second_wins() {
        let mut store = SqliteCandleStore::open_in_memory().unwrap();
        store
            .save_predictions(&[prediction(0, Direction::Up, 61.0)])
            .unwrap();
        store
            .save_predictions(&[prediction(0, Direction::Down, 58.0)])
            .unwrap();

        let stored = store.fetch_predictions("USDJPY").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].direction, Direction::Down);
        assert_eq!(stored[0].confidence, 58.0);
    }

    #[test]
    fn test_invalid_candle_rejected_before_write() {
        let mut store = SqliteCandleStore::open_in_memory().unwrap();
        let mut bad = candle(0, 150.0);
        bad.high_price = bad.low_price - 1.0;
        assert!(store.upsert_candles(&[candle(1, 150.0), bad]).is_err());
        assert!(store.fetch_all("USDJPY").unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candles.db");

        {
            let mut store = SqliteCandleStore::open(&path).unwrap();
            store.upsert_candles(&[candle(0, 150.0)]).unwrap();
        }
        let store = SqliteCandleStore::open(&path).unwrap();
        assert_eq!(store.fetch_all("USDJPY").unwrap().len(), 1);
    }
}

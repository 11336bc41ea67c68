//! Save records: per-room best times, personal bests, settings.
//!
//! The whole record is one JSON blob under [`SAVE_KEY`]. Loading migrates old
//! blobs forward and deep-merges them over current defaults, so fields added
//! since the save was written keep their default values. [`Records`] never
//! lets a storage failure reach gameplay: failures are logged and the
//! in-memory record stays authoritative.

pub mod migration;
pub mod store;

pub use migration::{migrate_save, MigrationError, CURRENT_SAVE_VERSION};
pub use store::{FileStore, MemoryStore, SaveStore};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::constants::SAVE_KEY;
use crate::error::PersistenceError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomTime {
    pub best: f32,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformerRecords {
    pub room_times: BTreeMap<String, RoomTime>,
    /// Keyed by mode, e.g. `speedrun_8`
    pub personal_bests: BTreeMap<String, f32>,
    /// Highest classic run reached
    pub best_run: u32,
}

/// Typing-game records, kept so a shared save round-trips intact
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingRecords {
    pub verse_times: BTreeMap<String, Value>,
    pub personal_bests: BTreeMap<String, Value>,
    pub highest_verse: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub audio_enabled: bool,
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            master_volume: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub platformer: PlatformerRecords,
    pub typing: TypingRecords,
    pub settings: Settings,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: CURRENT_SAVE_VERSION,
            platformer: PlatformerRecords::default(),
            typing: TypingRecords::default(),
            settings: Settings::default(),
        }
    }
}

impl SaveData {
    /// Parse a blob: migrate, merge over defaults, deserialize
    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        let loaded: Value = serde_json::from_str(text)?;
        let migrated = migrate_save(loaded).map_err(PersistenceError::Migration)?;
        let mut merged = serde_json::to_value(SaveData::default())?;
        deep_merge(&mut merged, migrated.data);
        Ok(serde_json::from_value(merged)?)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Merge `source` into `target`. Objects merge key by key, anything else
/// replaces the target value. Nulls in `source` leave the target untouched.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None if !value.is_null() => {
                        target.insert(key, value);
                    }
                    None => {}
                }
            }
        }
        (_, Value::Null) => {}
        (target, source) => *target = source,
    }
}

/// Save record bound to a store
#[derive(Debug)]
pub struct Records {
    data: SaveData,
    store: Box<dyn SaveStore>,
}

impl Records {
    /// Records with defaults; call [`Records::load`] to read the store
    pub fn new(store: Box<dyn SaveStore>) -> Self {
        Self {
            data: SaveData::default(),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn try_load(&mut self) -> Result<bool, PersistenceError> {
        match self.store.read(SAVE_KEY)? {
            Some(text) => {
                self.data = SaveData::from_json(&text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Load from the store, keeping defaults on any failure
    pub fn load(&mut self) -> &SaveData {
        match self.try_load() {
            Ok(true) => info!(rooms = self.data.platformer.room_times.len(), "save loaded"),
            Ok(false) => info!("no save found, using defaults"),
            Err(e) => warn!(error = %e, "failed to load save data"),
        }
        &self.data
    }

    pub fn try_save(&mut self) -> Result<(), PersistenceError> {
        let text = self.data.to_json()?;
        self.store.write(SAVE_KEY, &text)
    }

    /// Persist, logging instead of failing
    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            warn!(error = %e, "failed to save data");
        }
    }

    /// Drop the stored blob and reset to defaults
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(SAVE_KEY) {
            warn!(error = %e, "failed to clear save data");
        }
        self.data = SaveData::default();
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SaveData {
        &mut self.data
    }

    pub fn room_time(&self, room_id: &str) -> Option<RoomTime> {
        self.data.platformer.room_times.get(room_id).copied()
    }

    /// Record a completed room: count the attempt, keep the minimum
    pub fn record_room_time(&mut self, room_id: &str, split: f32) -> RoomTime {
        let entry = self
            .data
            .platformer
            .room_times
            .entry(room_id.to_string())
            .and_modify(|t| {
                t.attempts += 1;
                if split < t.best {
                    t.best = split;
                }
            })
            .or_insert(RoomTime {
                best: split,
                attempts: 1,
            });
        *entry
    }

    pub fn personal_best(&self, key: &str) -> Option<f32> {
        self.data.platformer.personal_bests.get(key).copied()
    }

    /// Store `time` if it beats the current best; returns whether it did
    pub fn submit_personal_best(&mut self, key: &str, time: f32) -> bool {
        let is_new = self.personal_best(key).map_or(true, |pb| time < pb);
        if is_new {
            self.data.platformer.personal_bests.insert(key.to_string(), time);
        }
        is_new
    }

    pub fn best_run(&self) -> u32 {
        self.data.platformer.best_run
    }

    /// Raise the classic best run; returns whether it changed
    pub fn raise_best_run(&mut self, run: u32) -> bool {
        if run > self.data.platformer.best_run {
            self.data.platformer.best_run = run;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct BrokenStore;

    impl SaveStore for BrokenStore {
        fn read(&self, _: &str) -> Result<Option<String>, PersistenceError> {
            Err(std::io::Error::other("disk on fire").into())
        }
        fn write(&mut self, _: &str, _: &str) -> Result<(), PersistenceError> {
            Err(std::io::Error::other("disk on fire").into())
        }
        fn remove(&mut self, _: &str) -> Result<(), PersistenceError> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    #[test]
    fn test_default_shape() {
        let json = serde_json::to_value(SaveData::default()).unwrap();
        assert_eq!(json["version"], 2);
        assert_eq!(json["platformer"]["bestRun"], 0);
        assert_eq!(json["typing"]["highestVerse"], 0);
        assert_eq!(json["settings"]["audioEnabled"], true);
    }

    #[test]
    fn test_partial_save_keeps_new_defaults() {
        let text = json!({
            "version": 2,
            "platformer": { "bestRun": 4 }
        })
        .to_string();
        let data = SaveData::from_json(&text).unwrap();
        assert_eq!(data.platformer.best_run, 4);
        assert!(data.platformer.room_times.is_empty());
        assert_eq!(data.settings, Settings::default());
    }

    #[test]
    fn test_v1_save_migrates() {
        let text = json!({ "platformer": { "roomTimes": { "azure": 7.25 } } }).to_string();
        let data = SaveData::from_json(&text).unwrap();
        assert_eq!(
            data.platformer.room_times["azure"],
            RoomTime {
                best: 7.25,
                attempts: 1
            }
        );
        assert_eq!(data.version, CURRENT_SAVE_VERSION);
    }

    #[test]
    fn test_deep_merge_rules() {
        let mut target = json!({ "a": { "x": 1, "y": 2 }, "b": [1], "c": 3 });
        deep_merge(
            &mut target,
            json!({ "a": { "y": 5, "z": 6 }, "b": [2, 3], "c": null, "d": true }),
        );
        assert_eq!(
            target,
            json!({ "a": { "x": 1, "y": 5, "z": 6 }, "b": [2, 3], "c": 3, "d": true })
        );
    }

    #[test]
    fn test_record_room_time_keeps_min() {
        let mut records = Records::in_memory();
        records.record_room_time("azure", 9.0);
        records.record_room_time("azure", 7.5);
        let t = records.record_room_time("azure", 8.0);
        assert_eq!(t, RoomTime { best: 7.5, attempts: 3 });
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut records = Records::in_memory();
        records.record_room_time("coral", 11.0);
        records.submit_personal_best("speedrun_8", 95.5);
        records.raise_best_run(3);
        records.save();

        let text = records.store.read(SAVE_KEY).unwrap().unwrap();
        let mut reloaded = Records::new(Box::new(MemoryStore::with_entry(SAVE_KEY, &text)));
        reloaded.load();
        assert_eq!(reloaded.data(), records.data());
    }

    #[test]
    fn test_personal_best_only_improves() {
        let mut records = Records::in_memory();
        assert!(records.submit_personal_best("speedrun_8", 100.0));
        assert!(!records.submit_personal_best("speedrun_8", 120.0));
        assert!(records.submit_personal_best("speedrun_8", 90.0));
        assert_eq!(records.personal_best("speedrun_8"), Some(90.0));
    }

    #[test]
    fn test_broken_store_is_swallowed() {
        let mut records = Records::new(Box::new(BrokenStore));
        records.load();
        assert_eq!(records.data(), &SaveData::default());
        records.record_room_time("azure", 5.0);
        records.save();
        records.clear();
        assert!(records.try_save().is_err());
    }

    #[test]
    fn test_corrupt_blob_keeps_defaults() {
        let mut records = Records::new(Box::new(MemoryStore::with_entry(SAVE_KEY, "{{nope")));
        records.load();
        assert_eq!(records.data(), &SaveData::default());
        assert!(matches!(records.try_load(), Err(PersistenceError::Json(_))));
    }
}

//! Versioned save migration.
//!
//! Each save carries a `version`. Older saves are walked forward one step at
//! a time until they reach [`CURRENT_SAVE_VERSION`]; nothing is dropped on the
//! way. Saves from a newer build are refused rather than downgraded.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Current save format version
pub const CURRENT_SAVE_VERSION: u32 = 2;

/// Oldest version that can still be migrated. Saves without a version field
/// predate versioning and are treated as this.
pub const MIN_SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MigrationError {
    /// Save version is newer than this build understands
    FutureVersion {
        save_version: u32,
        max_supported: u32,
    },
    TooOldVersion {
        save_version: u32,
        min_supported: u32,
    },
    InvalidFormat {
        detail: String,
    },
    MigrationStepFailed {
        from_version: u32,
        detail: String,
    },
}

/// Save data brought up to the current version
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub data: Value,
    pub original_version: u32,
    pub steps_applied: Vec<String>,
}

/// Read the version of a parsed save
pub fn save_version(data: &Value) -> Result<u32, MigrationError> {
    match data.get("version") {
        None => Ok(MIN_SUPPORTED_VERSION),
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| MigrationError::InvalidFormat {
                detail: format!("invalid version field: {v}"),
            }),
    }
}

/// Migrate a parsed save to [`CURRENT_SAVE_VERSION`]
pub fn migrate_save(mut data: Value) -> Result<Migrated, MigrationError> {
    if !data.is_object() {
        return Err(MigrationError::InvalidFormat {
            detail: "save data is not an object".to_string(),
        });
    }

    let version = save_version(&data)?;
    if version > CURRENT_SAVE_VERSION {
        return Err(MigrationError::FutureVersion {
            save_version: version,
            max_supported: CURRENT_SAVE_VERSION,
        });
    }
    if version < MIN_SUPPORTED_VERSION {
        return Err(MigrationError::TooOldVersion {
            save_version: version,
            min_supported: MIN_SUPPORTED_VERSION,
        });
    }

    let mut current = version;
    let mut steps = Vec::new();
    while current < CURRENT_SAVE_VERSION {
        let description = apply_migration_step(&mut data, current).map_err(|detail| {
            MigrationError::MigrationStepFailed {
                from_version: current,
                detail,
            }
        })?;
        steps.push(description);
        current += 1;
        data["version"] = json!(current);
    }

    Ok(Migrated {
        data,
        original_version: version,
        steps_applied: steps,
    })
}

/// Parse and migrate a save blob
pub fn migrate_save_str(json_str: &str) -> Result<Migrated, MigrationError> {
    let data: Value = serde_json::from_str(json_str).map_err(|e| MigrationError::InvalidFormat {
        detail: e.to_string(),
    })?;
    migrate_save(data)
}

fn apply_migration_step(data: &mut Value, from_version: u32) -> Result<String, String> {
    match from_version {
        1 => migrate_v1_to_v2(data),
        _ => Err(format!("no migration path from version {from_version}")),
    }
}

/// v1 → v2: room times were bare best-time numbers, now `{best, attempts}`
fn migrate_v1_to_v2(data: &mut Value) -> Result<String, String> {
    let obj = data.as_object_mut().ok_or("save data is not an object")?;

    let Some(platformer) = obj.get_mut("platformer") else {
        return Ok("v1→v2: no platformer records".to_string());
    };
    let Some(room_times) = platformer
        .as_object_mut()
        .and_then(|p| p.get_mut("roomTimes"))
        .and_then(Value::as_object_mut)
    else {
        return Ok("v1→v2: no room times".to_string());
    };

    let mut converted = 0;
    for (room, entry) in room_times.iter_mut() {
        if entry.is_object() {
            continue;
        }
        let best = entry
            .as_f64()
            .ok_or_else(|| format!("room time for `{room}` is not a number"))?;
        *entry = json!({ "best": best, "attempts": 1 });
        converted += 1;
    }

    Ok(format!("v1→v2: converted {converted} room times to records"))
}

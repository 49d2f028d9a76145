//! The persisted session record and its JSON file storage.
//!
//! Only progress is saved: bullets, enemies and drops are not, so a resumed
//! session starts the saved round on an empty battlefield.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::shop::UpgradeCounts;
use crate::weapon::WeaponKind;

pub const SAVE_VERSION: &str = "1.0";
pub const SAVE_FILE_NAME: &str = "player_progress.json";

/// Permanent player stats. Any field may be missing from an older file;
/// restore fills it from the configured player.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSnapshot {
    pub hp: Option<i32>,
    pub max_hp: Option<i32>,
    pub speed: Option<f32>,
    pub damage: Option<i32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default = "default_weapons")]
    pub weapons: Vec<Option<WeaponKind>>,
    #[serde(default)]
    pub active_weapon_index: usize,
    #[serde(default)]
    pub coins: u32,
}

fn default_weapons() -> Vec<Option<WeaponKind>> {
    vec![Some(WeaponKind::Pistol), None, None]
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldProgress {
    pub current_world_index: usize,
    pub rounds_completed: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundState {
    pub current_round: u32,
    pub enemies_per_round: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            current_round: 1,
            enemies_per_round: 5,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStats {
    pub kills: u32,
    /// Seconds of active play.
    pub playtime: f64,
}

/// Everything needed to resume a session.
///
/// `world_number`, `round_number`, `player` and `inventory` are required;
/// a record missing any of them is rejected as corrupt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// 1-based.
    pub world_number: u32,
    pub round_number: u32,
    pub player: PlayerSnapshot,
    pub inventory: InventorySnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_progress: Option<WorldProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_state: Option<RoundState>,
    #[serde(default)]
    pub stats: SessionStats,
    #[serde(default)]
    pub upgrades: UpgradeCounts,
}

/// On-disk form: the record plus storage metadata.
#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    #[serde(flatten)]
    state: SaveState,
    #[serde(default)]
    save_version: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Light summary for the main menu.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveInfo {
    pub world_number: u32,
    pub round_number: u32,
    pub timestamp: Option<String>,
    pub kills: u32,
    pub playtime: f64,
}

/// JSON save file in a directory of the caller's choosing.
#[derive(Clone, Debug)]
pub struct SaveManager {
    save_file: PathBuf,
}

impl SaveManager {
    /// The directory is created lazily on the first save.
    pub fn new(save_directory: impl AsRef<Path>) -> Self {
        Self {
            save_file: save_directory.as_ref().join(SAVE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.save_file
    }

    pub fn has_save(&self) -> bool {
        self.save_file.is_file()
    }

    /// Write `state` with a version tag and timestamp.
    ///
    /// The record is written to a temporary sibling and renamed into place,
    /// so on failure the previous save is still intact.
    pub fn save_game(&self, state: &SaveState) -> Result<(), SaveError> {
        if let Some(dir) = self.save_file.parent() {
            fs::create_dir_all(dir)?;
        }

        let file = SaveFile {
            state: state.clone(),
            save_version: Some(SAVE_VERSION.to_string()),
            timestamp: Some(chrono::Local::now().to_rfc3339()),
        };
        let json = serde_json::to_string_pretty(&file).map_err(SaveError::Serialize)?;

        let tmp = self.save_file.with_extension("json.tmp");
        let written = fs::File::create(&tmp).and_then(|mut f| {
            f.write_all(json.as_bytes())?;
            f.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&tmp, &self.save_file)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::info!(
            "Saved world {} round {} to {}",
            state.world_number,
            state.round_number,
            self.save_file.display()
        );
        Ok(())
    }

    /// `Ok(None)` when there is no save; `Err(Corrupt)` when the file does
    /// not hold a complete record.
    pub fn load_game(&self) -> Result<Option<SaveState>, SaveError> {
        if !self.has_save() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.save_file)?;
        let file: SaveFile =
            serde_json::from_str(&text).map_err(|e| SaveError::Corrupt(e.to_string()))?;
        tracing::info!(
            "Loaded save: world {} round {}",
            file.state.world_number,
            file.state.round_number
        );
        Ok(Some(file.state))
    }

    /// Removing a save that does not exist is not an error.
    pub fn delete_save(&self) -> Result<(), SaveError> {
        match fs::remove_file(&self.save_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_info(&self) -> Option<SaveInfo> {
        let text = fs::read_to_string(&self.save_file).ok()?;
        let file: SaveFile = serde_json::from_str(&text).ok()?;
        Some(SaveInfo {
            world_number: file.state.world_number,
            round_number: file.state.round_number,
            timestamp: file.timestamp,
            kills: file.state.stats.kills,
            playtime: file.state.stats.playtime,
        })
    }
}

use super::format::{team_from_json, team_to_json, TeamDocument};
use crate::error::{CoreError, EntityKind, Result};
use crate::models::Team;
use chrono::{DateTime, Utc};
use std::fs::{self, remove_file, rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const SAVE_EXTENSION: &str = "json";

/// Write a team document atomically: temp file, fsync, rename.
pub fn save_team_to_path(path: &Path, team: &Team) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let data = team_to_json(team)?;
    let temp_path = path.with_extension("tmp");

    let written = write_synced(&temp_path, data.as_bytes()).and_then(|()| rename(&temp_path, path));
    if let Err(e) = written {
        if temp_path.exists() {
            if let Err(cleanup) = remove_file(&temp_path) {
                log::warn!("Failed to remove temp file {:?}: {}", temp_path, cleanup);
            }
        }
        return Err(e.into());
    }

    log::debug!("Saved team '{}' ({} bytes) to {:?}", team.name, data.len(), path);
    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_all()
}

pub fn load_team_from_path(path: &Path) -> Result<Team> {
    if !path.exists() {
        return Err(CoreError::not_found(EntityKind::Team, path.display().to_string()));
    }

    let data = fs::read_to_string(path)?;
    let team = team_from_json(&data)?;

    log::debug!("Loaded team '{}' from {:?}", team.name, path);
    Ok(team)
}

/// Named save slots in one directory, one JSON document per team.
#[derive(Debug, Clone)]
pub struct SaveManager {
    dir: PathBuf,
}

impl SaveManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self, slot: &str, team: &Team) -> Result<PathBuf> {
        let path = self.slot_path(slot)?;
        save_team_to_path(&path, team)?;
        log::info!("Team '{}' saved to slot '{}'", team.name, slot);
        Ok(path)
    }

    pub fn load(&self, slot: &str) -> Result<Team> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Err(CoreError::not_found(EntityKind::Team, format!("slot '{}'", slot)));
        }
        let team = load_team_from_path(&path)?;
        log::info!("Team '{}' loaded from slot '{}'", team.name, slot);
        Ok(team)
    }

    pub fn slot_exists(&self, slot: &str) -> bool {
        self.slot_path(slot).map(|path| path.exists()).unwrap_or(false)
    }

    pub fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            remove_file(&path)?;
            log::info!("Deleted save slot '{}'", slot);
        }
        Ok(())
    }

    /// Every readable slot, most recent first. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<SaveSlotInfo>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            let Some(slot) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let document = match fs::read_to_string(&path)
                .map_err(CoreError::from)
                .and_then(|data| serde_json::from_str::<TeamDocument>(&data).map_err(CoreError::from))
            {
                Ok(document) => document,
                Err(e) => {
                    log::warn!("Skipping unreadable save {:?}: {}", path, e);
                    continue;
                }
            };

            slots.push(SaveSlotInfo {
                slot: slot.to_string(),
                team_name: document.name,
                saved_at: document.saved_at,
                version: document.version,
                player_count: document.players.len(),
            });
        }

        slots.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.slot.cmp(&b.slot)));
        Ok(slots)
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        Self::validate_slot(slot)?;
        Ok(self.dir.join(format!("{}.{}", slot, SAVE_EXTENSION)))
    }

    // Slot names become file names: keep them to a safe alphabet.
    fn validate_slot(slot: &str) -> Result<()> {
        let valid = !slot.is_empty()
            && slot.len() <= 64
            && slot.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CoreError::InvalidState(format!("invalid save slot name '{}'", slot)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SaveSlotInfo {
    pub slot: String,
    pub team_name: String,
    pub saved_at: DateTime<Utc>,
    pub version: u32,
    pub player_count: usize,
}

impl SaveSlotInfo {
    pub fn get_display_text(&self) -> String {
        format!(
            "{}: {} ({} players, saved {})",
            self.slot,
            self.team_name,
            self.player_count,
            self.saved_at.to_rfc3339()
        )
    }
}

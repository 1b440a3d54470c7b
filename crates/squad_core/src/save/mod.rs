// Save/Load System for teams
// Pretty JSON documents with versioning and atomic writes

pub mod format;
pub mod manager;

pub use format::{team_from_json, team_to_json, TeamDocument};
pub use manager::{load_team_from_path, save_team_to_path, SaveManager, SaveSlotInfo};

pub const TEAM_DOCUMENT_VERSION: u32 = 1;

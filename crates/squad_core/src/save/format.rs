use super::TEAM_DOCUMENT_VERSION;
use crate::error::{CoreError, Result};
use crate::models::{Formation, Player, Team, TeamRecord, STARTING_ELEVEN_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// On-disk form of a [`Team`].
///
/// The starting eleven is stored as indices into `players`, so a document
/// can be written by hand without inventing player ids.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamDocument {
    /// Format version for compatibility checks
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,

    pub name: String,

    #[serde(default)]
    pub formation: Formation,

    pub players: Vec<Player>,

    #[serde(default)]
    pub starting_eleven: Vec<usize>,

    #[serde(default)]
    pub bench: Vec<usize>,

    #[serde(default)]
    pub record: TeamRecord,
}

fn default_version() -> u32 {
    TEAM_DOCUMENT_VERSION
}

impl TeamDocument {
    pub fn from_team(team: &Team) -> Self {
        let index_of = |id: &Uuid| team.players.iter().position(|p| p.id == *id);

        Self {
            version: TEAM_DOCUMENT_VERSION,
            saved_at: Utc::now(),
            name: team.name.clone(),
            formation: team.formation,
            players: team.players.clone(),
            starting_eleven: team.starting_eleven.iter().filter_map(index_of).collect(),
            bench: team.bench.iter().filter_map(index_of).collect(),
            record: team.record,
        }
    }

    /// Rebuild the team, rejecting anything a valid [`Team`] could not hold.
    pub fn into_team(self) -> Result<Team> {
        if self.version > TEAM_DOCUMENT_VERSION {
            return Err(CoreError::VersionMismatch {
                found: self.version,
                expected: TEAM_DOCUMENT_VERSION,
            });
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::Deserialization("team name must not be empty".to_string()));
        }

        let mut ids = HashSet::with_capacity(self.players.len());
        for (index, player) in self.players.iter().enumerate() {
            player
                .validate()
                .map_err(|e| CoreError::Deserialization(format!("player #{}: {}", index, e)))?;
            if !ids.insert(player.id) {
                return Err(CoreError::Deserialization(format!(
                    "player #{} repeats id {}",
                    index, player.id
                )));
            }
        }

        // Saved as-is: a lineup may be short or hold a player injured since selection.
        if self.starting_eleven.len() > STARTING_ELEVEN_SIZE {
            return Err(CoreError::Deserialization(format!(
                "starting_eleven lists {} players",
                self.starting_eleven.len()
            )));
        }
        let starting_eleven =
            resolve_indices(&self.players, &self.starting_eleven, "starting_eleven")?;
        let bench = resolve_indices(&self.players, &self.bench, "bench")?;

        let mut team = Team::new(self.name);
        team.formation = self.formation;
        team.record = self.record;
        team.players = self.players;
        team.starting_eleven = starting_eleven;
        team.bench = bench;
        Ok(team)
    }
}

fn resolve_indices(players: &[Player], indices: &[usize], field: &str) -> Result<Vec<Uuid>> {
    let mut seen = HashSet::with_capacity(indices.len());
    let mut ids = Vec::with_capacity(indices.len());
    for &index in indices {
        let player = players.get(index).ok_or_else(|| {
            CoreError::Deserialization(format!(
                "{} index {} out of range ({} players)",
                field,
                index,
                players.len()
            ))
        })?;
        if !seen.insert(index) {
            return Err(CoreError::Deserialization(format!("{} repeats index {}", field, index)));
        }
        ids.push(player.id);
    }
    Ok(ids)
}

pub fn team_to_json(team: &Team) -> Result<String> {
    serde_json::to_string_pretty(&TeamDocument::from_team(team))
        .map_err(|e| CoreError::InvalidState(format!("failed to serialize team: {}", e)))
}

pub fn team_from_json(json: &str) -> Result<Team> {
    let document: TeamDocument = serde_json::from_str(json)?;
    document.into_team()
}

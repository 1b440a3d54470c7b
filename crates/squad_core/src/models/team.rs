use super::player::{Player, Position};
use crate::error::{CoreError, EntityKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub const STARTING_ELEVEN_SIZE: usize = 11;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Formation {
    #[default]
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "3-5-2")]
    F352,
}

impl Formation {
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "4-4-2" => Ok(Formation::F442),
            "4-3-3" => Ok(Formation::F433),
            "3-5-2" => Ok(Formation::F352),
            other => Err(CoreError::UnsupportedFormation(other.to_string())),
        }
    }

    pub fn get_positions(&self) -> (u8, u8, u8) {
        // Returns (defenders, midfielders, forwards)
        match self {
            Formation::F442 => (4, 4, 2),
            Formation::F433 => (4, 3, 3),
            Formation::F352 => (3, 5, 2),
        }
    }

    /// Canonical formation code string (e.g., "4-3-3").
    pub fn code(&self) -> &'static str {
        match self {
            Formation::F442 => "4-4-2",
            Formation::F433 => "4-3-3",
            Formation::F352 => "3-5-2",
        }
    }
}

/// Season record. Points are derived, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TeamRecord {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
}

impl TeamRecord {
    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_scored as i64 - self.goals_conceded as i64
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    pub formation: Formation,
    pub(crate) players: Vec<Player>,
    pub(crate) starting_eleven: Vec<Uuid>,
    pub(crate) bench: Vec<Uuid>,
    pub record: TeamRecord,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            formation: Formation::default(),
            players: Vec::new(),
            starting_eleven: Vec::new(),
            bench: Vec::new(),
            record: TeamRecord::default(),
        }
    }

    // ========== Roster ==========

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_ids(&self) -> Vec<Uuid> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: Uuid) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn add_player(&mut self, player: Player) -> Result<()> {
        if self.contains(player.id) {
            return Err(CoreError::duplicate(EntityKind::Player, player.name));
        }
        check_can_join(&player)?;
        self.players.push(player);
        Ok(())
    }

    /// Remove a player from the roster, the starting eleven and the bench.
    pub fn remove_player(&mut self, id: Uuid) -> Result<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Player, id.to_string()))?;
        self.starting_eleven.retain(|starter| *starter != id);
        self.bench.retain(|benched| *benched != id);
        Ok(self.players.remove(index))
    }

    pub fn swap_players(&mut self, player_out: Uuid, player_in: Player) -> Result<Player> {
        if !self.contains(player_out) {
            return Err(CoreError::not_found(EntityKind::Player, player_out.to_string()));
        }
        if self.contains(player_in.id) {
            return Err(CoreError::duplicate(EntityKind::Player, player_in.name));
        }
        // Nothing may fail after the outgoing player is removed.
        check_can_join(&player_in)?;
        let removed = self.remove_player(player_out)?;
        self.add_player(player_in)?;
        Ok(removed)
    }

    pub fn set_formation(&mut self, code: &str) -> Result<()> {
        self.formation = Formation::from_code(code)?;
        Ok(())
    }

    // ========== Lineup ==========

    /// Pick the starting eleven: exactly 11 distinct, available roster members.
    pub fn assign_starting_eleven(&mut self, ids: &[Uuid]) -> Result<()> {
        if ids.len() != STARTING_ELEVEN_SIZE {
            return Err(CoreError::InvalidLineup(format!(
                "starting eleven must contain {} players, got {}",
                STARTING_ELEVEN_SIZE,
                ids.len()
            )));
        }

        let mut seen = HashSet::with_capacity(STARTING_ELEVEN_SIZE);
        for id in ids {
            if !seen.insert(*id) {
                return Err(CoreError::InvalidLineup(format!("player {} listed twice", id)));
            }
            let player = self.player(*id).ok_or_else(|| {
                CoreError::InvalidLineup(format!("player {} is not in {}", id, self.name))
            })?;
            if !player.is_available() {
                return Err(CoreError::InvalidLineup(format!(
                    "{} is not available for selection",
                    player.name
                )));
            }
        }

        self.starting_eleven = ids.to_vec();
        self.bench.retain(|benched| !seen.contains(benched));
        Ok(())
    }

    /// Pick the 11 highest-rated available players, regardless of position.
    /// Ties keep roster order.
    pub fn select_best_eleven(&mut self) -> Result<()> {
        let mut available: Vec<&Player> =
            self.players.iter().filter(|p| p.is_available()).collect();
        if available.len() < STARTING_ELEVEN_SIZE {
            return Err(CoreError::InvalidLineup(format!(
                "{} has only {} available players",
                self.name,
                available.len()
            )));
        }
        available.sort_by(|a, b| b.rating.cmp(&a.rating));
        let ids: Vec<Uuid> = available.iter().take(STARTING_ELEVEN_SIZE).map(|p| p.id).collect();

        self.assign_starting_eleven(&ids)?;
        log::info!("{}: picked a new starting eleven", self.name);
        Ok(())
    }

    pub fn starting_eleven(&self) -> &[Uuid] {
        &self.starting_eleven
    }

    pub fn bench(&self) -> &[Uuid] {
        &self.bench
    }

    pub fn has_starting_eleven(&self) -> bool {
        self.starting_eleven.len() == STARTING_ELEVEN_SIZE
    }

    /// Starters in lineup order.
    pub fn starters(&self) -> Result<Vec<&Player>> {
        if !self.has_starting_eleven() {
            return Err(CoreError::InvalidLineup(format!(
                "{} has no complete starting eleven ({} of {})",
                self.name,
                self.starting_eleven.len(),
                STARTING_ELEVEN_SIZE
            )));
        }
        self.starting_eleven
            .iter()
            .map(|id| {
                self.player(*id).ok_or_else(|| {
                    CoreError::InvalidLineup(format!("starter {} left {}", id, self.name))
                })
            })
            .collect()
    }

    /// A lineup that can take the field: 11 present starters, none unavailable.
    pub fn validate_lineup(&self) -> Result<()> {
        for player in self.starters()? {
            if !player.is_available() {
                return Err(CoreError::InvalidLineup(format!(
                    "{} of {} is not available",
                    player.name, self.name
                )));
            }
        }
        Ok(())
    }

    /// Apply `f` to every starter in lineup order.
    pub(crate) fn for_each_starter_mut(&mut self, mut f: impl FnMut(&mut Player)) {
        for id in &self.starting_eleven {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == *id) {
                f(player);
            }
        }
    }

    /// Move injured starters to the bench. Returns how many were moved.
    pub fn bench_injured_players(&mut self) -> usize {
        let injured: Vec<Uuid> = self
            .starting_eleven
            .iter()
            .copied()
            .filter(|id| self.player(*id).is_some_and(|p| p.is_injured()))
            .collect();
        self.starting_eleven.retain(|id| !injured.contains(id));
        self.bench.extend(injured.iter().copied());
        injured.len()
    }

    // ========== Ratings ==========

    /// Mean rating of the starting eleven.
    pub fn average_rating(&self) -> Result<f32> {
        let starters = self.starters()?;
        let sum: u32 = starters.iter().map(|p| p.rating as u32).sum();
        Ok(sum as f32 / STARTING_ELEVEN_SIZE as f32)
    }

    /// Mean rating of the whole roster, 0 when empty.
    pub fn squad_average_rating(&self) -> f32 {
        if self.players.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.players.iter().map(|p| p.rating as u32).sum();
        sum as f32 / self.players.len() as f32
    }

    /// Starting eleven average when one is set, roster average otherwise.
    pub fn strength(&self) -> f32 {
        self.average_rating().unwrap_or_else(|_| self.squad_average_rating())
    }

    pub fn average_age(&self) -> f32 {
        if self.players.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.players.iter().map(|p| p.age as u32).sum();
        sum as f32 / self.players.len() as f32
    }

    // ========== Results ==========

    pub fn record_result(&mut self, goals_for: u32, goals_against: u32) {
        self.record.goals_scored += goals_for;
        self.record.goals_conceded += goals_against;

        if goals_for > goals_against {
            self.record.wins += 1;
        } else if goals_for < goals_against {
            self.record.losses += 1;
        } else {
            self.record.draws += 1;
        }
    }

    pub fn points(&self) -> u32 {
        self.record.points()
    }

    pub fn goal_difference(&self) -> i64 {
        self.record.goal_difference()
    }

    /// One match of recovery for every injured player. Returns players who became fit.
    pub fn advance_recovery(&mut self) -> usize {
        self.players
            .iter_mut()
            .filter(|p| p.is_injured())
            .map(|p| p.advance_recovery())
            .filter(|fit| *fit)
            .count()
    }

    // ========== Queries ==========

    pub fn injured_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_injured()).collect()
    }

    pub fn players_by_position(&self, position: Position) -> Vec<&Player> {
        self.players.iter().filter(|p| p.position == position).collect()
    }

    pub fn loaned_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_on_loan()).collect()
    }

    /// Highest rated player; the first listed wins ties.
    pub fn best_player(&self) -> Option<&Player> {
        first_max_by_key(&self.players, |p| p.rating as u32)
    }

    pub fn top_scorer(&self) -> Option<&Player> {
        first_max_by_key(&self.players, |p| p.goals)
    }

    pub fn top_assistant(&self) -> Option<&Player> {
        first_max_by_key(&self.players, |p| p.assists)
    }

    pub fn most_active_player(&self) -> Option<&Player> {
        first_max_by_key(&self.players, |p| p.matches_played)
    }
}

fn check_can_join(player: &Player) -> Result<()> {
    if player.retired {
        return Err(CoreError::InvalidState(format!(
            "cannot add retired player {}",
            player.name
        )));
    }
    Ok(())
}

// Iterator::max_by_key returns the last maximum; roster order decides ties here.
fn first_max_by_key(players: &[Player], key: impl Fn(&Player) -> u32) -> Option<&Player> {
    let mut best: Option<&Player> = None;
    for player in players {
        match best {
            Some(current) if key(player) <= key(current) => {}
            _ => best = Some(player),
        }
    }
    best
}

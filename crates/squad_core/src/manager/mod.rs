//! Team manager: match simulation, training, transfers and persistence for one team.

pub mod match_sim;

#[cfg(test)]
mod tests;

use crate::config::MatchConfig;
use crate::error::{CoreError, EntityKind, Result};
use crate::models::{MatchResult, Player, Team};
use crate::save;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use uuid::Uuid;

pub const DEFAULT_BUDGET: u32 = 100;
pub const MAX_SQUAD_SIZE: usize = 25;

/// Manages one team it does not own. The team outlives the manager.
#[derive(Debug)]
pub struct Manager<'a> {
    team: &'a mut Team,
    /// Transfer budget in millions
    pub budget: u32,
    pub config: MatchConfig,
}

impl<'a> Manager<'a> {
    pub fn new(team: &'a mut Team) -> Self {
        Self::with_config(team, MatchConfig::default())
    }

    pub fn with_config(team: &'a mut Team, config: MatchConfig) -> Self {
        Self { team, budget: DEFAULT_BUDGET, config }
    }

    pub fn team(&self) -> &Team {
        &*self.team
    }

    pub fn team_mut(&mut self) -> &mut Team {
        &mut *self.team
    }

    // ========== Matches ==========

    /// Simulate a match against `opponent` with the managed team at home.
    ///
    /// Fails with `InvalidLineup` before drawing anything if either side
    /// cannot field a complete, available eleven. Starters hurt in the
    /// match are marked injured on both sides.
    pub fn simulate_match<R: Rng + ?Sized>(
        &mut self,
        opponent: &mut Team,
        rng: &mut R,
    ) -> Result<MatchResult> {
        match_sim::simulate(self.team, opponent, &self.config, rng)
    }

    /// [`Manager::simulate_match`] with a ChaCha8 stream seeded from `seed`.
    pub fn simulate_match_seeded(&mut self, opponent: &mut Team, seed: u64) -> Result<MatchResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.simulate_match(opponent, &mut rng)
    }

    // ========== Squad care ==========

    /// Train every player who is not injured.
    pub fn train_team(&mut self) {
        for player in self.team.players.iter_mut() {
            player.train();
        }
    }

    pub fn rest_team(&mut self) {
        for player in self.team.players.iter_mut() {
            player.rest();
        }
    }

    pub fn bench_injured_players(&mut self) -> usize {
        let benched = self.team.bench_injured_players();
        if benched > 0 {
            log::info!("{}: benched {} injured starters", self.team.name, benched);
        }
        benched
    }

    // ========== Transfers ==========

    pub fn buy_player(&mut self, player: Player, price: u32) -> Result<()> {
        if self.team.contains(player.id) {
            return Err(CoreError::duplicate(EntityKind::Player, player.name));
        }
        if self.team.len() >= MAX_SQUAD_SIZE {
            return Err(CoreError::SquadFull { max: MAX_SQUAD_SIZE });
        }
        if price > self.budget {
            return Err(CoreError::InsufficientBudget { price, budget: self.budget });
        }

        let name = player.name.clone();
        self.team.add_player(player)?;
        self.budget -= price;
        log::info!("{} bought {} for {}M ({}M left)", self.team.name, name, price, self.budget);
        Ok(())
    }

    pub fn sell_player(&mut self, id: Uuid, price: u32) -> Result<Player> {
        let player = self.team.remove_player(id)?;
        self.budget = self.budget.saturating_add(price);
        log::info!("{} sold {} for {}M", self.team.name, player.name, price);
        Ok(player)
    }

    // ========== Persistence ==========

    pub fn save_team(&self, path: &Path) -> Result<()> {
        save::save_team_to_path(path, &*self.team)
    }

    /// Load a team from disk. The managed team is left untouched.
    pub fn load_team(&self, path: &Path) -> Result<Team> {
        save::load_team_from_path(path)
    }
}

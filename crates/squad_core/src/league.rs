//! League table: teams keyed by unique name, standings and match folding.

use crate::config::MatchConfig;
use crate::error::{CoreError, EntityKind, Result};
use crate::manager::match_sim;
use crate::models::{MatchResult, Team};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// What the table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    /// Points, then goal difference, then name.
    #[default]
    Points,
    /// Team strength, then name.
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
}

#[derive(Debug, Clone, Default)]
pub struct League {
    pub name: String,
    teams: BTreeMap<String, Team>,
}

impl League {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), teams: BTreeMap::new() }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn add_team(&mut self, team: Team) -> Result<()> {
        if self.teams.contains_key(&team.name) {
            return Err(CoreError::duplicate(EntityKind::Team, team.name));
        }
        self.teams.insert(team.name.clone(), team);
        Ok(())
    }

    pub fn remove_team(&mut self, name: &str) -> Result<Team> {
        self.teams.remove(name).ok_or_else(|| CoreError::not_found(EntityKind::Team, name))
    }

    /// Swap `old_name` for `new_team`. The new name must not clash with another team.
    pub fn replace_team(&mut self, old_name: &str, new_team: Team) -> Result<Team> {
        if !self.teams.contains_key(old_name) {
            return Err(CoreError::not_found(EntityKind::Team, old_name));
        }
        if new_team.name != old_name && self.teams.contains_key(&new_team.name) {
            return Err(CoreError::duplicate(EntityKind::Team, new_team.name));
        }
        let old = self.remove_team(old_name)?;
        self.teams.insert(new_team.name.clone(), new_team);
        Ok(old)
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.get(name)
    }

    /// Mutable access to a team. The team's `name` is its key in the league:
    /// rename through [`League::rename_team`], never by assigning `name` here.
    pub fn team_mut(&mut self, name: &str) -> Option<&mut Team> {
        self.teams.get_mut(name)
    }

    pub fn rename_team(&mut self, old_name: &str, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        if new_name == old_name {
            return Ok(());
        }
        if self.teams.contains_key(&new_name) {
            return Err(CoreError::duplicate(EntityKind::Team, new_name));
        }
        let mut team = self.remove_team(old_name)?;
        team.name = new_name;
        self.teams.insert(team.name.clone(), team);
        Ok(())
    }

    pub fn has_team(&self, name: &str) -> bool {
        self.teams.contains_key(name)
    }

    pub fn team_stats(&self, name: &str) -> Result<TeamStats> {
        let team = self.team(name).ok_or_else(|| CoreError::not_found(EntityKind::Team, name))?;
        Ok(TeamStats {
            points: team.points(),
            wins: team.record.wins,
            draws: team.record.draws,
            losses: team.record.losses,
            goals_scored: team.record.goals_scored,
            goals_conceded: team.record.goals_conceded,
        })
    }

    // ========== Rankings ==========

    /// All teams, best first.
    pub fn standings(&self, metric: RankingMetric) -> Vec<&Team> {
        let mut table: Vec<&Team> = self.teams.values().collect();
        table.sort_by(|a, b| compare(a, b, metric));
        table
    }

    /// The `n` best teams, best first.
    pub fn top_teams(&self, n: usize, metric: RankingMetric) -> Vec<&Team> {
        self.standings(metric).into_iter().take(n).collect()
    }

    /// The `n` worst teams, worst first.
    pub fn bottom_teams(&self, n: usize, metric: RankingMetric) -> Vec<&Team> {
        self.standings(metric).into_iter().rev().take(n).collect()
    }

    // ========== Matches ==========

    /// Fold a simulated match into both teams' records.
    pub fn record_result(&mut self, result: &MatchResult) -> Result<()> {
        if result.home_team == result.away_team {
            return Err(CoreError::InvalidState(format!(
                "{} cannot play itself",
                result.home_team
            )));
        }
        for name in [&result.home_team, &result.away_team] {
            if !self.teams.contains_key(name.as_str()) {
                return Err(CoreError::not_found(EntityKind::Team, name.as_str()));
            }
        }

        let home_score = result.home_score as u32;
        let away_score = result.away_score as u32;
        if let Some(home) = self.teams.get_mut(&result.home_team) {
            home.record_result(home_score, away_score);
        }
        if let Some(away) = self.teams.get_mut(&result.away_team) {
            away.record_result(away_score, home_score);
        }
        Ok(())
    }

    /// Simulate `home` against `away` and record the result.
    pub fn play_match<R: Rng + ?Sized>(
        &mut self,
        home: &str,
        away: &str,
        config: &MatchConfig,
        rng: &mut R,
    ) -> Result<MatchResult> {
        if home == away {
            return Err(CoreError::InvalidState(format!("{} cannot play itself", home)));
        }
        if !self.teams.contains_key(away) {
            return Err(CoreError::not_found(EntityKind::Team, away));
        }

        // Take the home side out so both teams can be borrowed mutably.
        let mut home_team = self.remove_team(home)?;
        let simulated = match self.teams.get_mut(away) {
            Some(away_team) => match_sim::simulate(&mut home_team, away_team, config, rng),
            None => Err(CoreError::not_found(EntityKind::Team, away)),
        };
        self.teams.insert(home.to_string(), home_team);

        let result = simulated?;
        self.record_result(&result)?;
        Ok(result)
    }

    /// Every pair of teams meets once; the name that sorts first plays at home.
    ///
    /// Before each fixture both sides get one match of injury recovery, and a
    /// side whose eleven is no longer available picks its best available
    /// players. A fixture where a side cannot field eleven is skipped with a
    /// warning. The config is checked up front, so an error leaves every
    /// record untouched.
    pub fn play_round_robin<R: Rng + ?Sized>(
        &mut self,
        config: &MatchConfig,
        rng: &mut R,
    ) -> Result<Vec<MatchResult>> {
        config.validate()?;

        let names: Vec<String> = self.teams.keys().cloned().collect();
        let mut results = Vec::with_capacity(names.len() * names.len().saturating_sub(1) / 2);
        let mut skipped = 0;

        for (i, home) in names.iter().enumerate() {
            for away in &names[i + 1..] {
                let home_ready = self.prepare_for_fixture(home);
                let away_ready = self.prepare_for_fixture(away);
                if !(home_ready && away_ready) {
                    log::warn!("{}: {} vs {} skipped, no eleven available", self.name, home, away);
                    skipped += 1;
                    continue;
                }
                results.push(self.play_match(home, away, config, rng)?);
            }
        }

        log::info!("{}: played {} matches, skipped {}", self.name, results.len(), skipped);
        Ok(results)
    }

    /// One match of recovery, then a fresh eleven if needed. False when the
    /// team cannot field a lineup.
    fn prepare_for_fixture(&mut self, name: &str) -> bool {
        let Some(team) = self.teams.get_mut(name) else {
            return false;
        };
        team.advance_recovery();
        team.validate_lineup().is_ok() || team.select_best_eleven().is_ok()
    }
}

fn compare(a: &Team, b: &Team, metric: RankingMetric) -> Ordering {
    let primary = match metric {
        RankingMetric::Points => b
            .points()
            .cmp(&a.points())
            .then_with(|| b.goal_difference().cmp(&a.goal_difference())),
        RankingMetric::Rating => b.strength().total_cmp(&a.strength()),
    };
    primary.then_with(|| a.name.cmp(&b.name))
}

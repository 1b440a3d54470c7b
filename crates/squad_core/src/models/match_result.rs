//! Match Result Data Structures
//!
//! Output of [`crate::manager::Manager::simulate_match`]. A result is ephemeral:
//! it is folded into league standings by the caller and never persisted.
//!
//! Scores and outcome are always told from the managed (home) side.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn from_scores(home_score: u8, away_score: u8) -> Self {
        match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// The same match seen from the opponent.
    pub fn reversed(&self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

/// A player hurt during the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryReport {
    pub player_id: Uuid,
    pub player_name: String,
    pub side: Side,
    pub matches_out: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u8,
    pub away_score: u8,
    pub outcome: Outcome,
    pub injuries: Vec<InjuryReport>,

    /// Starting eleven average ratings that drove the simulation.
    pub home_strength: f32,
    pub away_strength: f32,
    /// Poisson means the scores were drawn from.
    pub home_expected_goals: f64,
    pub away_expected_goals: f64,
}

impl MatchResult {
    pub fn is_draw(&self) -> bool {
        self.outcome == Outcome::Draw
    }

    pub fn total_goals(&self) -> u32 {
        self.home_score as u32 + self.away_score as u32
    }

    pub fn winner(&self) -> Option<&str> {
        match self.outcome {
            Outcome::Win => Some(&self.home_team),
            Outcome::Loss => Some(&self.away_team),
            Outcome::Draw => None,
        }
    }

    pub fn injuries_for(&self, side: Side) -> impl Iterator<Item = &InjuryReport> {
        self.injuries.iter().filter(move |injury| injury.side == side)
    }

    /// Headline in the form "Barcelona wins 2-1!" or "Draw 1-1!".
    pub fn summary(&self) -> String {
        match self.outcome {
            Outcome::Win => {
                format!("{} wins {}-{}!", self.home_team, self.home_score, self.away_score)
            }
            Outcome::Loss => {
                format!("{} wins {}-{}!", self.away_team, self.away_score, self.home_score)
            }
            Outcome::Draw => format!("Draw {}-{}!", self.home_score, self.away_score),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} - {} {}",
            self.home_team, self.home_score, self.away_score, self.away_team
        )
    }
}

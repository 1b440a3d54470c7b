use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const MIN_AGE: u8 = 15;
pub const MAX_AGE: u8 = 50;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 100;
pub const MAX_STAMINA: u8 = 100;
pub const MAX_MORALE: u8 = 100;

const TRAINING_RATING_GAIN: u8 = 1;
const TRAINING_STAMINA_COST: u8 = 10;
const REST_STAMINA_GAIN: u8 = 20;
const EXHAUSTION_THRESHOLD: u8 = 30;
const VETERAN_AGE: u8 = 30;
const RETIREMENT_AGE: u8 = 40;
const DEFAULT_CONTRACT_YEARS: u8 = 3;
const DEFAULT_MORALE: u8 = 70;
/// Matches out for an injury without a known duration.
pub const DEFAULT_INJURY_MATCHES: u8 = 3;

/// Player data for squad management and match simulation.
///
/// Identity is the `id`, not the name: two players called "Silva" are
/// different roster entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub position: Position,
    pub age: u8,
    pub rating: u8,

    #[serde(default = "default_stamina")]
    pub stamina: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injury: Option<Injury>,
    #[serde(default)]
    pub is_captain: bool,

    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub matches_played: u32,

    #[serde(default)]
    pub yellow_cards: u8,
    #[serde(default)]
    pub red_cards: u8,
    #[serde(default)]
    pub suspended: bool,

    #[serde(default = "default_contract_years")]
    pub contract_years_left: u8,
    #[serde(default = "default_morale")]
    pub morale: u8,
    #[serde(default)]
    pub retired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan: Option<Loan>,
}

fn default_stamina() -> u8 {
    MAX_STAMINA
}

fn default_contract_years() -> u8 {
    DEFAULT_CONTRACT_YEARS
}

fn default_morale() -> u8 {
    DEFAULT_MORALE
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::Goalkeeper)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An injury keeps a player out for a number of matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Injury {
    pub matches_remaining: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Loan {
    pub club: String,
    pub matches_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Yellow,
    Red,
}

/// Rating tier returned by [`Player::evaluate_performance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PerformanceTier {
    Poor,
    Average,
    Good,
    Excellent,
    WorldClass,
}

impl PerformanceTier {
    pub fn from_rating(rating: u8) -> Self {
        match rating {
            85..=u8::MAX => PerformanceTier::WorldClass,
            75..=84 => PerformanceTier::Excellent,
            65..=74 => PerformanceTier::Good,
            50..=64 => PerformanceTier::Average,
            _ => PerformanceTier::Poor,
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            PerformanceTier::Poor => "Poor",
            PerformanceTier::Average => "Average",
            PerformanceTier::Good => "Good",
            PerformanceTier::Excellent => "Excellent",
            PerformanceTier::WorldClass => "World Class",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoraleStatus {
    VeryLow,
    Low,
    Average,
    Good,
    Excellent,
}

impl MoraleStatus {
    pub fn from_morale(morale: u8) -> Self {
        match morale {
            80..=u8::MAX => MoraleStatus::Excellent,
            60..=79 => MoraleStatus::Good,
            40..=59 => MoraleStatus::Average,
            20..=39 => MoraleStatus::Low,
            _ => MoraleStatus::VeryLow,
        }
    }
}

impl Player {
    /// Create a validated player with fresh stamina and a three year contract.
    pub fn new(name: impl Into<String>, position: Position, age: u8, rating: u8) -> Result<Self> {
        let player = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position,
            age,
            rating,
            stamina: MAX_STAMINA,
            injury: None,
            is_captain: false,
            goals: 0,
            assists: 0,
            matches_played: 0,
            yellow_cards: 0,
            red_cards: 0,
            suspended: false,
            contract_years_left: DEFAULT_CONTRACT_YEARS,
            morale: DEFAULT_MORALE,
            retired: false,
            loan: None,
        };
        player.validate()?;
        Ok(player)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidPlayer("name must not be empty".to_string()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(CoreError::InvalidPlayer(format!(
                "age {} outside {}..={}",
                self.age, MIN_AGE, MAX_AGE
            )));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(CoreError::InvalidPlayer(format!(
                "rating {} outside {}..={}",
                self.rating, MIN_RATING, MAX_RATING
            )));
        }
        if self.stamina > MAX_STAMINA || self.morale > MAX_MORALE {
            return Err(CoreError::InvalidPlayer(format!(
                "stamina {} / morale {} above 100",
                self.stamina, self.morale
            )));
        }
        Ok(())
    }

    // ========== Training & fitness ==========

    /// Training session: small rating gain for a stamina cost. Injured players sit it out.
    pub fn train(&mut self) {
        if self.is_injured() {
            return;
        }
        self.rating = self.rating.saturating_add(TRAINING_RATING_GAIN).min(MAX_RATING);
        self.stamina = self.stamina.saturating_sub(TRAINING_STAMINA_COST);
    }

    /// Recover stamina. An injured player also gets one match closer to fitness.
    pub fn rest(&mut self) {
        self.stamina = self.stamina.saturating_add(REST_STAMINA_GAIN).min(MAX_STAMINA);
        self.advance_recovery();
    }

    pub fn is_exhausted(&self) -> bool {
        self.stamina < EXHAUSTION_THRESHOLD
    }

    pub fn evaluate_performance(&self) -> PerformanceTier {
        PerformanceTier::from_rating(self.rating)
    }

    // ========== Injuries ==========

    pub fn is_injured(&self) -> bool {
        self.injury.is_some()
    }

    pub fn injure(&mut self) {
        self.injure_for(DEFAULT_INJURY_MATCHES);
    }

    /// Mark the player injured for `matches` matches (at least one).
    /// A longer existing injury is kept.
    pub fn injure_for(&mut self, matches: u8) {
        let matches = matches.max(1);
        let remaining = match self.injury {
            Some(current) => current.matches_remaining.max(matches),
            None => matches,
        };
        self.injury = Some(Injury { matches_remaining: remaining });
    }

    pub fn recover_from_injury(&mut self) -> Result<()> {
        if self.injury.take().is_none() {
            return Err(CoreError::InvalidState(format!("{} is not injured", self.name)));
        }
        Ok(())
    }

    /// One match of recovery. Returns true when the player became fit.
    pub fn advance_recovery(&mut self) -> bool {
        let Some(injury) = self.injury.as_mut() else {
            return false;
        };
        injury.matches_remaining = injury.matches_remaining.saturating_sub(1);
        if injury.matches_remaining == 0 {
            self.injury = None;
            return true;
        }
        false
    }

    /// Can be picked for a match.
    pub fn is_available(&self) -> bool {
        !self.is_injured() && !self.suspended && !self.retired && self.loan.is_none()
    }

    // ========== Career ==========

    /// One year older, up to `MAX_AGE`. Veterans lose a rating point per birthday.
    pub fn age_up(&mut self) {
        self.age = self.age.saturating_add(1).min(MAX_AGE);
        if self.age > VETERAN_AGE {
            self.rating = self.rating.saturating_sub(1).max(MIN_RATING);
        }
    }

    pub fn change_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn promote_to_captain(&mut self) {
        self.is_captain = true;
    }

    pub fn demote_from_captain(&mut self) {
        self.is_captain = false;
    }

    pub fn record_match(&mut self, goals: u32, assists: u32) {
        self.goals += goals;
        self.assists += assists;
        self.matches_played += 1;
    }

    /// Two yellows make a red; any red suspends.
    pub fn receive_card(&mut self, card: Card) {
        match card {
            Card::Yellow => {
                self.yellow_cards += 1;
                if self.yellow_cards == 2 {
                    self.red_cards += 1;
                    self.yellow_cards = 0;
                    self.suspended = true;
                }
            }
            Card::Red => {
                self.red_cards += 1;
                self.suspended = true;
            }
        }
    }

    pub fn reset_cards(&mut self) {
        self.yellow_cards = 0;
        self.red_cards = 0;
        self.suspended = false;
    }

    pub fn renew_contract(&mut self, years: u8) -> Result<()> {
        if years == 0 {
            return Err(CoreError::InvalidState(
                "contract must be for at least 1 year".to_string(),
            ));
        }
        self.contract_years_left = years;
        Ok(())
    }

    pub fn is_contract_expiring(&self) -> bool {
        self.contract_years_left <= 1
    }

    pub fn decrement_contract(&mut self) {
        self.contract_years_left = self.contract_years_left.saturating_sub(1);
    }

    pub fn change_morale(&mut self, delta: i16) {
        let morale = (self.morale as i16).saturating_add(delta).clamp(0, MAX_MORALE as i16);
        self.morale = morale as u8;
    }

    pub fn morale_status(&self) -> MoraleStatus {
        MoraleStatus::from_morale(self.morale)
    }

    /// Retire automatically at 40. Returns the new retired flag.
    pub fn check_retirement(&mut self) -> bool {
        if self.age >= RETIREMENT_AGE {
            self.retired = true;
        }
        self.retired
    }

    // ========== Loans ==========

    pub fn is_on_loan(&self) -> bool {
        self.loan.is_some()
    }

    pub fn loan_to(&mut self, club: impl Into<String>, matches: u32) -> Result<()> {
        if self.loan.is_some() {
            return Err(CoreError::InvalidState(format!("{} is already on loan", self.name)));
        }
        if matches == 0 {
            return Err(CoreError::InvalidState("loan duration must be positive".to_string()));
        }
        self.loan = Some(Loan { club: club.into(), matches_remaining: matches });
        Ok(())
    }

    pub fn return_from_loan(&mut self) -> Result<()> {
        if self.loan.take().is_none() {
            return Err(CoreError::InvalidState(format!("{} is not on loan", self.name)));
        }
        Ok(())
    }

    /// Count down a loan by one match; the player returns when it expires.
    pub fn reduce_loan_duration(&mut self) {
        let expired = match self.loan.as_mut() {
            Some(loan) => {
                loan.matches_remaining = loan.matches_remaining.saturating_sub(1);
                loan.matches_remaining == 0
            }
            None => false,
        };
        if expired {
            self.loan = None;
        }
    }

    /// Market value in millions from rating, youth and goals.
    pub fn market_value(&self) -> f64 {
        let base = self.rating as f64 * 0.4;
        let age_bonus = VETERAN_AGE.saturating_sub(self.age) as f64 * 0.3;
        let goal_bonus = self.goals as f64 * 0.1;
        ((base + age_bonus + goal_bonus) * 100.0).round() / 100.0
    }
}

//! # squad_core - Football Squad Management Simulator
//!
//! Players, teams, a league table and a manager who plays seeded,
//! rating-driven matches.
//!
//! ## Features
//! - Roster and starting-eleven management with checked invariants
//! - Poisson match simulation from starting-eleven average ratings
//! - Reproducible results (same seed = same match)
//! - League standings by points or rating
//! - JSON save/load for teams
//!
//! ```rust
//! use squad_core::{League, Manager, Player, Position, RankingMetric, Team};
//!
//! fn squad(name: &str, rating: u8) -> Team {
//!     let mut team = Team::new(name);
//!     for i in 0..11 {
//!         let player = Player::new(format!("{name} {i}"), Position::Midfielder, 25, rating).unwrap();
//!         team.add_player(player).unwrap();
//!     }
//!     let ids = team.player_ids();
//!     team.assign_starting_eleven(&ids).unwrap();
//!     team
//! }
//!
//! let mut home = squad("Barcelona", 85);
//! let mut away = squad("Getafe", 65);
//!
//! let result = Manager::new(&mut home).simulate_match_seeded(&mut away, 42).unwrap();
//!
//! let mut league = League::new("La Liga");
//! league.add_team(home).unwrap();
//! league.add_team(away).unwrap();
//! league.record_result(&result).unwrap();
//! assert_eq!(league.standings(RankingMetric::Points).len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod league;
pub mod manager;
pub mod models;
pub mod save;

pub use config::MatchConfig;
pub use error::{CoreError, EntityKind, Result};
pub use league::{League, RankingMetric, TeamStats};
pub use manager::Manager;
pub use models::{
    Card, Formation, InjuryReport, MatchResult, Outcome, PerformanceTier, Player, Position, Side,
    Team, TeamRecord,
};
pub use save::{load_team_from_path, save_team_to_path, SaveManager};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod match_result;
pub mod player;
pub mod team;

pub use match_result::{InjuryReport, MatchResult, Outcome, Side};
pub use player::{Card, Injury, Loan, MoraleStatus, PerformanceTier, Player, Position};
pub use team::{Formation, Team, TeamRecord, STARTING_ELEVEN_SIZE};

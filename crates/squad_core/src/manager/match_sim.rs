//! Rating-based match simulation.
//!
//! Each side's strength is its starting-eleven average rating. Strengths are
//! turned into a share of the expected goals with a power curve:
//!
//! ```text
//! share_home = h^k / (h^k + a^k)
//! λ_home     = max(avg_total_goals * share_home, min_expected_goals)
//! ```
//!
//! Goals are Poisson draws around λ, so low scores dominate and a weaker
//! side still scores now and then. The larger `k`, the rarer the upset.
//!
//! Draw order from the RNG is fixed (home goals, away goals, then one injury
//! roll per starter, home first) so a seed always replays the same match.

use crate::config::MatchConfig;
use crate::error::{CoreError, Result};
use crate::models::{InjuryReport, MatchResult, Outcome, Player, Side, Team};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Expected goals for a side of strength `own` facing `other`.
pub fn expected_goals(own: f64, other: f64, config: &MatchConfig) -> f64 {
    let own = own.max(0.0);
    let other = other.max(0.0);

    // h^k / (h^k + a^k) written as 1 / (1 + (a/h)^k): no overflow for large k.
    let share = if own == 0.0 && other == 0.0 {
        0.5
    } else {
        1.0 / (1.0 + (other / own).powf(config.strength_exponent))
    };
    (config.avg_total_goals * share).max(config.min_expected_goals)
}

/// Poisson-distributed goals, capped at `max_goals`.
pub fn sample_goals<R: Rng + ?Sized>(expected: f64, max_goals: u8, rng: &mut R) -> Result<u8> {
    let poisson = Poisson::new(expected)
        .map_err(|e| CoreError::InvalidConfig(format!("expected goals {}: {}", expected, e)))?;
    let goals: f64 = poisson.sample(rng);
    Ok(goals.min(max_goals as f64) as u8)
}

/// Injury probability for one starter in one match.
pub fn injury_probability(player: &Player, config: &MatchConfig) -> f64 {
    let chance = if player.is_exhausted() {
        config.injury_chance * config.exhausted_injury_multiplier
    } else {
        config.injury_chance
    };
    chance.clamp(0.0, 1.0)
}

/// Play `home` against `away`. Both lineups are checked before any random draw;
/// the only mutation is marking injured starters.
pub fn simulate<R: Rng + ?Sized>(
    home: &mut Team,
    away: &mut Team,
    config: &MatchConfig,
    rng: &mut R,
) -> Result<MatchResult> {
    config.validate()?;
    home.validate_lineup()?;
    away.validate_lineup()?;

    let home_strength = home.average_rating()?;
    let away_strength = away.average_rating()?;

    let home_expected = expected_goals(home_strength as f64, away_strength as f64, config);
    let away_expected = expected_goals(away_strength as f64, home_strength as f64, config);

    let home_score = sample_goals(home_expected, config.max_goals, rng)?;
    let away_score = sample_goals(away_expected, config.max_goals, rng)?;
    let outcome = Outcome::from_scores(home_score, away_score);

    let mut injuries = roll_injuries(home, Side::Home, config, rng);
    injuries.extend(roll_injuries(away, Side::Away, config, rng));

    log::debug!(
        "{} {}-{} {} (strength {:.1} vs {:.1}, xG {:.2} vs {:.2}, {} injured)",
        home.name,
        home_score,
        away_score,
        away.name,
        home_strength,
        away_strength,
        home_expected,
        away_expected,
        injuries.len()
    );

    Ok(MatchResult {
        home_team: home.name.clone(),
        away_team: away.name.clone(),
        home_score,
        away_score,
        outcome,
        injuries,
        home_strength,
        away_strength,
        home_expected_goals: home_expected,
        away_expected_goals: away_expected,
    })
}

fn roll_injuries<R: Rng + ?Sized>(
    team: &mut Team,
    side: Side,
    config: &MatchConfig,
    rng: &mut R,
) -> Vec<InjuryReport> {
    let mut reports = Vec::new();
    team.for_each_starter_mut(|player| {
        let chance = injury_probability(player, config);
        if chance > 0.0 && rng.gen_bool(chance) {
            let matches_out = rng.gen_range(config.injury_matches_min..=config.injury_matches_max);
            player.injure_for(matches_out);
            reports.push(InjuryReport {
                player_id: player.id,
                player_name: player.name.clone(),
                side,
                matches_out,
            });
        }
    });
    reports
}

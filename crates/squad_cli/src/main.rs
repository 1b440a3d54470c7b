//! Squad CLI
//!
//! Generate team files, check them, and play matches or a league between them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use squad_core::{
    load_team_from_path, save_team_to_path, League, Manager, MatchConfig, Outcome, Player,
    Position, RankingMetric, Team,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "squad")]
#[command(about = "Football squad management and match simulation", long_about = None)]
struct Cli {
    /// Match config JSON (falls back to SQUAD_MATCH_CONFIG_PATH, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random 18-player squad with a 4-4-2 starting eleven
    Generate {
        /// Team name
        #[arg(long)]
        name: String,

        /// Mean player rating
        #[arg(long, default_value_t = 70)]
        rating: u8,

        /// Maximum distance of a rating from the mean
        #[arg(long, default_value_t = 8)]
        spread: u8,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output JSON file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Load a team file and check its lineup
    Validate {
        /// Team JSON file path
        #[arg(long)]
        team: PathBuf,
    },

    /// Simulate matches between two teams (the home team is managed)
    Simulate {
        /// Home team JSON file path
        #[arg(long)]
        home: PathBuf,

        /// Away team JSON file path
        #[arg(long)]
        away: PathBuf,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of matches; injuries heal between runs
        #[arg(long, default_value_t = 1)]
        runs: u32,
    },

    /// Play a single round-robin between team files and print the table
    League {
        /// League name
        #[arg(long, default_value = "League")]
        name: String,

        /// Team JSON file paths
        #[arg(long, num_args = 2.., required = true)]
        teams: Vec<PathBuf>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Rank by average rating instead of points
        #[arg(long)]
        by_rating: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { name, rating, spread, seed, out } => {
            let seed = resolve_seed(seed);
            let team = generate_team(&name, rating, spread, seed)?;
            save_team_to_path(&out, &team)
                .with_context(|| format!("failed to write {}", out.display()))?;

            println!("✅ Generated {} (seed {})", team.name, seed);
            println!("   Players:        {}", team.len());
            println!("   Starting XI:    {:.1}", team.average_rating()?);
            println!("   Output:         {}", out.display());
        }

        Commands::Validate { team } => {
            let team = load_team(&team)?;
            print_team(&team);
            team.validate_lineup().context("lineup is not ready for a match")?;
            println!("\n✅ {} is ready to play", team.name);
        }

        Commands::Simulate { home, away, seed, runs } => {
            let config = load_config(cli.config.as_deref())?;
            let seed = resolve_seed(seed);
            let mut home = load_team(&home)?;
            let mut away = load_team(&away)?;
            simulate(&mut home, &mut away, config, seed, runs)?;
        }

        Commands::League { name, teams, seed, by_rating } => {
            let config = load_config(cli.config.as_deref())?;
            let seed = resolve_seed(seed);
            let metric = if by_rating { RankingMetric::Rating } else { RankingMetric::Points };

            let mut league = League::new(name);
            for path in &teams {
                league.add_team(load_team(path)?)?;
            }

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            println!("⚽ {} - {} teams (seed {})\n", league.name, league.len(), seed);
            for result in league.play_round_robin(&config, &mut rng)? {
                println!("   {}", result);
            }
            print_table(&league, metric);
        }
    }

    Ok(())
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

fn load_config(path: Option<&Path>) -> Result<MatchConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Ok(MatchConfig::from_json(&json)?)
        }
        None => Ok(MatchConfig::from_env()?),
    }
}

fn load_team(path: &Path) -> Result<Team> {
    load_team_from_path(path).with_context(|| format!("failed to load team {}", path.display()))
}

/// 2 GK, 6 DF, 6 MF, 4 FW; the eleven is 1-4-4-2 taken in roster order.
fn generate_team(name: &str, rating: u8, spread: u8, seed: u64) -> Result<Team> {
    const SHAPE: [(Position, usize, usize); 4] = [
        (Position::Goalkeeper, 2, 1),
        (Position::Defender, 6, 4),
        (Position::Midfielder, 6, 4),
        (Position::Forward, 4, 2),
    ];

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let low = rating.saturating_sub(spread).max(1);
    let high = rating.saturating_add(spread).min(100);

    let mut team = Team::new(name);
    let mut starters = Vec::new();
    for (position, count, starting) in SHAPE {
        for n in 0..count {
            let player = Player::new(
                format!("{} {}{}", name, position.code(), n + 1),
                position,
                rng.gen_range(18..=34),
                rng.gen_range(low..=high),
            )?;
            if n < starting {
                starters.push(player.id);
            }
            team.add_player(player)?;
        }
    }
    team.assign_starting_eleven(&starters)?;
    Ok(team)
}

fn simulate(home: &mut Team, away: &mut Team, config: MatchConfig, seed: u64, runs: u32) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut manager = Manager::with_config(home, config);
    let (mut wins, mut draws, mut losses) = (0u32, 0u32, 0u32);

    println!("⚽ {} vs {} (seed {})\n", manager.team().name, away.name, seed);
    for run in 0..runs {
        let result = manager.simulate_match(away, &mut rng)?;
        match result.outcome {
            Outcome::Win => wins += 1,
            Outcome::Draw => draws += 1,
            Outcome::Loss => losses += 1,
        }

        if runs == 1 {
            println!("   {}", result.summary());
            println!(
                "   Strength:  {:.1} vs {:.1}",
                result.home_strength, result.away_strength
            );
            println!(
                "   xG:        {:.2} vs {:.2}",
                result.home_expected_goals, result.away_expected_goals
            );
            for injury in &result.injuries {
                println!("   🚑 {} out for {} matches", injury.player_name, injury.matches_out);
            }
        } else {
            log::debug!("run {}: {}", run + 1, result);
            // Fresh squads for the next run.
            heal(manager.team_mut());
            heal(away);
        }
    }

    if runs > 1 {
        let total = runs as f64;
        println!("   Wins:   {} ({:.1}%)", wins, wins as f64 / total * 100.0);
        println!("   Draws:  {} ({:.1}%)", draws, draws as f64 / total * 100.0);
        println!("   Losses: {} ({:.1}%)", losses, losses as f64 / total * 100.0);
    }
    Ok(())
}

fn heal(team: &mut Team) {
    for id in team.player_ids() {
        if let Some(player) = team.player_mut(id) {
            player.injury = None;
        }
    }
}

fn print_team(team: &Team) {
    println!("📋 {} ({})", team.name, team.formation.code());
    println!("   Players:        {}", team.len());
    println!("   Squad rating:   {:.1}", team.squad_average_rating());
    match team.average_rating() {
        Ok(rating) => println!("   Starting XI:    {:.1}", rating),
        Err(_) => println!("   Starting XI:    not set"),
    }
    println!("   Injured:        {}", team.injured_players().len());
    println!("   Points:         {}", team.points());
}

fn print_table(league: &League, metric: RankingMetric) {
    println!("\n🏆 Standings");
    println!(
        "   {:<3} {:<24} {:>3} {:>3} {:>3} {:>4} {:>4} {:>6}",
        "#", "Team", "W", "D", "L", "GD", "Pts", "Rating"
    );
    for (position, team) in league.standings(metric).iter().enumerate() {
        println!(
            "   {:<3} {:<24} {:>3} {:>3} {:>3} {:>4} {:>4} {:>6.1}",
            position + 1,
            team.name,
            team.record.wins,
            team.record.draws,
            team.record.losses,
            team.goal_difference(),
            team.points(),
            team.strength()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_team_is_ready_and_reproducible() {
        let team = generate_team("Generated", 70, 8, 42).unwrap();
        assert_eq!(team.len(), 18);
        assert!(team.validate_lineup().is_ok());
        assert!(team.players().iter().all(|p| (62..=78).contains(&p.rating)));

        let again = generate_team("Generated", 70, 8, 42).unwrap();
        let ratings = |t: &Team| t.players().iter().map(|p| p.rating).collect::<Vec<_>>();
        assert_eq!(ratings(&team), ratings(&again));
    }

    #[test]
    fn test_generate_clamps_rating_bounds() {
        let team = generate_team("Edge", 98, 10, 1).unwrap();
        assert!(team.players().iter().all(|p| p.rating <= 100));
    }

    #[test]
    fn test_generated_file_loads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("team.json");
        let team = generate_team("Disk", 65, 5, 3).unwrap();
        save_team_to_path(&path, &team).unwrap();

        assert_eq!(load_team(&path).unwrap(), team);
    }

    #[test]
    fn test_simulate_many_runs() {
        let mut home = generate_team("Home", 80, 5, 10).unwrap();
        let mut away = generate_team("Away", 60, 5, 11).unwrap();
        let config = MatchConfig { injury_chance: 0.5, ..MatchConfig::default() };
        assert!(simulate(&mut home, &mut away, config, 5, 20).is_ok());
    }

    #[test]
    fn test_season_of_generated_teams_survives_injuries() {
        let mut league = League::new("Test League");
        for (i, rating) in [80u8, 72, 66, 60].into_iter().enumerate() {
            let team = generate_team(&format!("Club {}", i), rating, 5, i as u64).unwrap();
            league.add_team(team).unwrap();
        }
        let config = MatchConfig { injury_chance: 0.1, ..MatchConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let results = league.play_round_robin(&config, &mut rng).unwrap();
        assert_eq!(results.len(), 6);
        let played: u32 = league.teams().map(|t| t.record.matches_played()).sum();
        assert_eq!(played, 12);
    }

    #[test]
    fn test_heal_clears_injuries() {
        let mut team = generate_team("Clinic", 70, 8, 4).unwrap();
        for id in team.player_ids().into_iter().take(5) {
            team.player_mut(id).unwrap().injure_for(3);
        }
        heal(&mut team);
        assert!(team.injured_players().is_empty());
        assert!(team.validate_lineup().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"avg_total_goals": 3.5}"#).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().avg_total_goals, 3.5);

        std::fs::write(&path, r#"{"injury_chance": 7}"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}

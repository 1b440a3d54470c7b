//! Integration tests for the manager and match simulation

use super::*;
use crate::models::{Outcome, Position, Side, STARTING_ELEVEN_SIZE};
use proptest::prelude::*;
use tempfile::TempDir;

fn lineup_team(name: &str, rating: u8) -> Team {
    lineup_team_with(name, &[rating; STARTING_ELEVEN_SIZE])
}

fn lineup_team_with(name: &str, ratings: &[u8]) -> Team {
    let mut team = Team::new(name);
    for (i, rating) in ratings.iter().enumerate() {
        let position = match i {
            0 => Position::Goalkeeper,
            1..=4 => Position::Defender,
            5..=8 => Position::Midfielder,
            _ => Position::Forward,
        };
        team.add_player(Player::new(format!("{} {}", name, i), position, 25, *rating).unwrap())
            .unwrap();
    }
    let ids: Vec<Uuid> = team.player_ids().into_iter().take(STARTING_ELEVEN_SIZE).collect();
    team.assign_starting_eleven(&ids).unwrap();
    team
}

#[test]
fn test_simulate_match_basic() {
    let mut home = lineup_team("FC Barcelona", 80);
    let mut away = lineup_team("Getafe CF", 60);
    let mut manager = Manager::new(&mut home);

    let result = manager.simulate_match_seeded(&mut away, 42).unwrap();

    assert_eq!(result.home_team, "FC Barcelona");
    assert_eq!(result.away_team, "Getafe CF");
    assert_eq!(result.outcome, Outcome::from_scores(result.home_score, result.away_score));
    assert_eq!(result.home_strength, 80.0);
    assert_eq!(result.away_strength, 60.0);
    assert!(result.home_expected_goals > result.away_expected_goals);
}

#[test]
fn test_same_seed_same_result() {
    let run = |seed: u64| {
        let mut home = lineup_team("Atletico", 75);
        let mut away = lineup_team("Betis", 72);
        let config = MatchConfig { injury_chance: 0.2, ..MatchConfig::default() };
        let mut manager = Manager::with_config(&mut home, config);
        manager.simulate_match_seeded(&mut away, seed).unwrap()
    };

    let first = run(7);
    let second = run(7);
    assert_eq!(first.home_score, second.home_score);
    assert_eq!(first.away_score, second.away_score);
    assert_eq!(first.injuries.len(), second.injuries.len());
    for (a, b) in first.injuries.iter().zip(&second.injuries) {
        assert_eq!((a.side, &a.player_name, a.matches_out), (b.side, &b.player_name, b.matches_out));
    }
}

#[test]
fn test_stronger_side_wins_majority() {
    let mut strong = lineup_team("Real Madrid", 90);
    let mut weak = lineup_team("Elche CF", 50);
    let mut manager = Manager::with_config(&mut strong, MatchConfig::no_injuries());
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let mut wins = 0;
    for _ in 0..1000 {
        if manager.simulate_match(&mut weak, &mut rng).unwrap().outcome == Outcome::Win {
            wins += 1;
        }
    }
    assert!(wins > 500, "strong side won only {} of 1000", wins);
}

#[test]
fn test_weaker_side_loses_majority_from_home() {
    let mut weak = lineup_team("Elche CF", 50);
    let mut strong = lineup_team("Real Madrid", 90);
    let mut manager = Manager::with_config(&mut weak, MatchConfig::no_injuries());
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let losses = (0..1000)
        .filter(|_| manager.simulate_match(&mut strong, &mut rng).unwrap().outcome == Outcome::Loss)
        .count();
    assert!(losses > 500, "weak side lost only {} of 1000", losses);
}

#[test]
fn test_equal_sides_produce_every_outcome() {
    let mut home = lineup_team("Sevilla", 70);
    let mut away = lineup_team("Betis", 70);
    let mut manager = Manager::with_config(&mut home, MatchConfig::no_injuries());
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let (mut wins, mut draws, mut losses) = (0, 0, 0);
    for _ in 0..1000 {
        match manager.simulate_match(&mut away, &mut rng).unwrap().outcome {
            Outcome::Win => wins += 1,
            Outcome::Draw => draws += 1,
            Outcome::Loss => losses += 1,
        }
    }
    assert!(wins > 200 && losses > 200 && draws > 100, "{}/{}/{}", wins, draws, losses);
    // Symmetric expectations: neither side should dominate.
    assert!((wins as i32 - losses as i32).abs() < 120, "wins {} losses {}", wins, losses);
}

#[test]
fn test_incomplete_lineup_fails_without_side_effects() {
    let mut incomplete = Team::new("Valencia CF");
    for i in 0..9 {
        incomplete
            .add_player(Player::new(format!("Valencia {}", i), Position::Midfielder, 24, 80).unwrap())
            .unwrap();
    }
    let mut opponent = lineup_team("FC Barcelona", 70);
    let before = opponent.clone();

    let config = MatchConfig { injury_chance: 1.0, ..MatchConfig::default() };
    let mut manager = Manager::with_config(&mut incomplete, config);
    let err = manager.simulate_match_seeded(&mut opponent, 1).unwrap_err();

    assert!(matches!(err, CoreError::InvalidLineup(_)));
    assert_eq!(opponent, before);
}

#[test]
fn test_opponent_without_lineup_fails() {
    let mut home = lineup_team("FC Barcelona", 70);
    let mut away = Team::new("Nobody");
    let mut manager = Manager::new(&mut home);
    assert!(matches!(
        manager.simulate_match_seeded(&mut away, 3),
        Err(CoreError::InvalidLineup(_))
    ));
}

#[test]
fn test_injured_starter_blocks_match() {
    let mut home = lineup_team("FC Barcelona", 70);
    let mut away = lineup_team("Girona", 70);
    let starter = home.starting_eleven()[5];
    home.player_mut(starter).unwrap().injure();

    let mut manager = Manager::new(&mut home);
    assert!(matches!(
        manager.simulate_match_seeded(&mut away, 3),
        Err(CoreError::InvalidLineup(_))
    ));

    assert_eq!(manager.bench_injured_players(), 1);
    assert_eq!(manager.team().starting_eleven().len(), 10);
}

#[test]
fn test_certain_injuries_mark_every_starter() {
    let mut home = lineup_team("FC Barcelona", 70);
    let mut away = lineup_team("Girona", 70);
    let config = MatchConfig {
        injury_chance: 1.0,
        injury_matches_min: 2,
        injury_matches_max: 2,
        ..MatchConfig::default()
    };
    let mut manager = Manager::with_config(&mut home, config);

    let result = manager.simulate_match_seeded(&mut away, 11).unwrap();

    assert_eq!(result.injuries.len(), 2 * STARTING_ELEVEN_SIZE);
    assert_eq!(result.injuries_for(Side::Home).count(), STARTING_ELEVEN_SIZE);
    assert!(result.injuries.iter().all(|injury| injury.matches_out == 2));
    assert_eq!(manager.team().injured_players().len(), STARTING_ELEVEN_SIZE);
    assert_eq!(away.injured_players().len(), STARTING_ELEVEN_SIZE);

    // Everyone is out now, so the rematch cannot be played.
    assert!(manager.simulate_match_seeded(&mut away, 12).is_err());
}

#[test]
fn test_no_injuries_config_never_injures() {
    let mut home = lineup_team("FC Barcelona", 70);
    let mut away = lineup_team("Girona", 70);
    for player in home.players.iter_mut() {
        player.stamina = 0;
    }
    let mut manager = Manager::with_config(&mut home, MatchConfig::no_injuries());
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    for _ in 0..200 {
        assert!(manager.simulate_match(&mut away, &mut rng).unwrap().injuries.is_empty());
    }
}

#[test]
fn test_simulation_does_not_touch_records() {
    let mut home = lineup_team("FC Barcelona", 70);
    let mut away = lineup_team("Girona", 70);
    let mut manager = Manager::with_config(&mut home, MatchConfig::no_injuries());
    manager.simulate_match_seeded(&mut away, 4).unwrap();

    assert_eq!(manager.team().points(), 0);
    assert_eq!(away.record.matches_played(), 0);
}

#[test]
fn test_train_team_skips_injured() {
    let mut team = lineup_team("FC Barcelona", 70);
    let injured = team.player_ids()[0];
    team.player_mut(injured).unwrap().injure();

    let mut manager = Manager::new(&mut team);
    manager.train_team();

    for player in manager.team().players() {
        let expected = if player.id == injured { 70 } else { 71 };
        assert_eq!(player.rating, expected, "{}", player.name);
    }
}

#[test]
fn test_rest_team() {
    let mut team = lineup_team("FC Barcelona", 70);
    for player in team.players.iter_mut() {
        player.stamina = 40;
    }
    let mut manager = Manager::new(&mut team);
    manager.rest_team();
    assert!(manager.team().players().iter().all(|p| p.stamina == 60));
}

#[test]
fn test_buy_and_sell_player() {
    let mut team = lineup_team("FC Barcelona", 70);
    let mut manager = Manager::new(&mut team);

    let signing = Player::new("Olmo", Position::Midfielder, 26, 84).unwrap();
    let id = signing.id;
    manager.buy_player(signing.clone(), 60).unwrap();
    assert_eq!(manager.budget, 40);
    assert_eq!(manager.team().len(), 12);

    assert!(matches!(manager.buy_player(signing, 1), Err(CoreError::Duplicate { .. })));

    let pricey = Player::new("Haaland", Position::Forward, 24, 91).unwrap();
    assert!(matches!(
        manager.buy_player(pricey, 180),
        Err(CoreError::InsufficientBudget { price: 180, budget: 40 })
    ));

    let sold = manager.sell_player(id, 55).unwrap();
    assert_eq!(sold.name, "Olmo");
    assert_eq!(manager.budget, 95);
    assert!(matches!(manager.sell_player(id, 55), Err(CoreError::NotFound { .. })));
}

#[test]
fn test_buy_player_squad_full() {
    let mut team = Team::new("Crowded");
    for i in 0..MAX_SQUAD_SIZE {
        team.add_player(Player::new(format!("P{}", i), Position::Defender, 25, 60).unwrap()).unwrap();
    }
    let mut manager = Manager::new(&mut team);
    let extra = Player::new("Extra", Position::Defender, 25, 60).unwrap();
    assert!(matches!(manager.buy_player(extra, 0), Err(CoreError::SquadFull { max: MAX_SQUAD_SIZE })));
}

#[test]
fn test_save_and_load_team() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test_team_data.json");
    let mut team = lineup_team("FC Barcelona", 77);
    let manager = Manager::new(&mut team);

    manager.save_team(&path).unwrap();
    let loaded = manager.load_team(&path).unwrap();

    assert_eq!(loaded.name, "FC Barcelona");
    assert_eq!(loaded.len(), 11);
    assert_eq!(&loaded, manager.team());
    assert!((loaded.average_rating().unwrap() - 77.0).abs() < 1e-6);
}

proptest! {
    #[test]
    fn prop_scores_consistent_with_outcome(
        home_ratings in prop::collection::vec(1u8..=100, STARTING_ELEVEN_SIZE),
        away_ratings in prop::collection::vec(1u8..=100, STARTING_ELEVEN_SIZE),
        seed in any::<u64>(),
    ) {
        let mut home = lineup_team_with("Home", &home_ratings);
        let mut away = lineup_team_with("Away", &away_ratings);
        let config = MatchConfig::default();
        let mut manager = Manager::with_config(&mut home, config.clone());

        let result = manager.simulate_match_seeded(&mut away, seed).unwrap();

        prop_assert!(result.home_score <= config.max_goals);
        prop_assert!(result.away_score <= config.max_goals);
        prop_assert_eq!(result.outcome == Outcome::Draw, result.home_score == result.away_score);
        prop_assert_eq!(result.outcome, Outcome::from_scores(result.home_score, result.away_score));
        prop_assert!(result.home_expected_goals >= config.min_expected_goals);
        prop_assert!(result.away_expected_goals >= config.min_expected_goals);
    }

    #[test]
    fn prop_stronger_side_expects_more_goals(
        weaker in 1u8..=99,
        gap in 1u8..=50,
    ) {
        let stronger = weaker.saturating_add(gap).min(100);
        prop_assume!(stronger > weaker);
        let config = MatchConfig::default();
        let strong_xg = match_sim::expected_goals(stronger as f64, weaker as f64, &config);
        let weak_xg = match_sim::expected_goals(weaker as f64, stronger as f64, &config);
        prop_assert!(strong_xg > weak_xg);
    }
}

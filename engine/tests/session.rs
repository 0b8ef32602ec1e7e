use forest_engine::leaderboard::{LeaderboardEntry, LeaderboardError};
use forest_engine::{
    BribeResult, Catalog, DeathCause, Dice, Direction, Ending, Enemy, EntryOutcome, FightResult,
    FleeResult, ForestMap, GameConfig, GameError, InMemoryLeaderboard, ItemOutcome, Leaderboard,
    LogCategory, MoveOutcome, Phase, PlayerIdentity, Position, ScoreRecord, Session, Tier,
    Treasure, TreasureEffect,
};

const START: Position = Position::new(2, 2);
const PRINCESS: Position = Position::new(0, 0);
const EAST: Position = Position::new(2, 3);
const NORTH_EAST: Position = Position::new(1, 3);

// Hidden-treasure index rolls over the five catalog entries.
const RING: f64 = 0.1;
const SWORD: f64 = 0.3;
const WINGS: f64 = 0.5;
const PILL: f64 = 0.7;
const ELIXIR: f64 = 0.9;
const NO_FIND: f64 = 0.99;

fn enemy(level: i64, captor: bool) -> Enemy {
    let catalog = Catalog::builtin().unwrap();
    let mut dice = Dice::from_seed(11);
    catalog.create_enemy(&mut dice, Tier::from_level(level), captor, 0.0)
}

fn with_treasure(mut e: Enemy, value: u32) -> Enemy {
    e.treasure = Some(Treasure {
        value,
        name: format!("{value} gold coins"),
        icon: "🪙".into(),
    });
    e
}

fn toad() -> Enemy {
    with_treasure(enemy(1, false), 10)
}

fn mouse(value: u32) -> Enemy {
    with_treasure(enemy(0, false), value)
}

/// 5x5 forest of toads with the captor on `princess`.
fn forest(start: Position, princess: Position) -> ForestMap {
    ForestMap::with_layout(5, start, princess, |p| {
        if p == princess {
            enemy(10, true)
        } else {
            toad()
        }
    })
}

fn place(map: &mut ForestMap, pos: Position, e: Enemy) {
    map.tile_mut(pos).unwrap().enemy = e;
}

fn play_with(config: GameConfig, map: ForestMap, rolls: Vec<f64>) -> Session {
    Session::from_map(
        config,
        Catalog::builtin().unwrap(),
        PlayerIdentity::new("Tester", Some("u-1".into())),
        map,
        Dice::from_scripted(rolls),
    )
}

fn play(map: ForestMap, rolls: Vec<f64>) -> Session {
    play_with(GameConfig::default(), map, rolls)
}

fn assert_score_invariant(session: &Session) {
    let player = session.player();
    let kills: u32 = player.kills.iter().map(|k| k.enemy.total_strength).sum();
    assert_eq!(session.score().score, player.gold + kills);
}

#[test]
fn starts_exploring_on_a_cleared_tile() {
    let session = play(forest(START, PRINCESS), vec![]);
    assert_eq!(session.phase(), Phase::Exploring);
    let tile = session.current_tile().unwrap();
    assert!(tile.cleared && tile.visited);
    assert_eq!(session.log().count(LogCategory::Intro), 2);
    assert_eq!(session.player().energy, 1000);
    assert_eq!(session.player().gold, 0);
    assert!(session.game_over().is_none());
}

#[test]
fn mouse_tile_is_looted() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(40));
    let mut session = play(map, vec![0.0, RING]);

    let outcome = session.move_player(Direction::East).unwrap();
    let MoveOutcome::Entered(EntryOutcome::Looted { treasure, hidden }) = outcome else {
        panic!("expected loot");
    };
    assert_eq!(treasure.map(|t| t.value), Some(40));
    assert_eq!(hidden.map(|h| h.effect), Some(TreasureEffect::InstantKill));

    assert_eq!(session.phase(), Phase::Exploring);
    assert_eq!(session.player().gold, 40);
    assert_eq!(session.player().kills.len(), 1);
    assert_eq!(session.player().inventory.len(), 1);
    let tile = session.current_tile().unwrap();
    assert!(tile.cleared && tile.enemy.defeated);
    assert_eq!(session.log().count(LogCategory::Mouse), 1);
    assert_eq!(session.log().count(LogCategory::HiddenTreasure), 1);
    assert_score_invariant(&session);
}

#[test]
fn cleared_tiles_are_free_to_cross() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(10));
    let mut session = play(map, vec![NO_FIND]);
    session.move_player(Direction::East).unwrap();
    let back = session.move_player(Direction::West).unwrap();
    assert_eq!(back, MoveOutcome::Entered(EntryOutcome::AlreadyCleared));
    assert_eq!(session.player().position, START);
    assert_eq!(session.phase(), Phase::Exploring);
}

#[test]
fn swamps_block_movement() {
    let mut map = forest(START, PRINCESS);
    map.tile_mut(Position::new(1, 2)).unwrap().is_swamp = true;
    let mut session = play(map, vec![]);

    assert_eq!(session.move_player(Direction::North).unwrap(), MoveOutcome::Blocked);
    assert_eq!(session.player().position, START);
    assert_eq!(session.phase(), Phase::Exploring);
    assert_eq!(session.log().last().unwrap().category, LogCategory::Info);
}

#[test]
fn leaving_without_the_princess_is_cowardly() {
    let mut session = play(forest(Position::new(0, 2), PRINCESS), vec![]);
    let MoveOutcome::LeftForest(over) = session.move_player(Direction::North).unwrap() else {
        panic!("expected to leave the forest");
    };
    assert_eq!(over.ending, Ending::Coward);
    assert_eq!(over.cause, None);
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.log().last().unwrap().category, LogCategory::Coward);

    assert_eq!(session.move_player(Direction::South), Err(GameError::GameOver));
    assert_eq!(session.fight(10).unwrap_err(), GameError::GameOver);
    assert_eq!(session.use_item(0).unwrap_err(), GameError::GameOver);

    let record = session.score_record().unwrap();
    assert_eq!(record.ending, Ending::Coward);
    assert_eq!(record.pseudonym, "Tester");
}

#[test]
fn rescue_then_escape_is_victory() {
    let start = Position::new(0, 1);
    let mut session = play(forest(start, PRINCESS), vec![0.0, NO_FIND]);

    let entered = session.move_player(Direction::West).unwrap();
    assert!(matches!(
        entered,
        MoveOutcome::Entered(EntryOutcome::Encounter { strength: 190, .. })
    ));
    assert_eq!(session.phase(), Phase::Encounter);
    assert!(session.active_enemy().unwrap().is_princess_captor);

    let report = session.fight(1000).unwrap();
    assert_eq!(report.spent, 1000);
    let FightResult::Won(victory) = report.result else {
        panic!("expected a win");
    };
    assert!(victory.rescued_princess);
    assert_eq!(victory.treasure_value, 0);
    assert!(session.player().has_princess);
    assert_eq!(session.player().energy, 0);
    assert_eq!(session.phase(), Phase::Exploring);
    assert!(session.active_enemy().is_none());

    let MoveOutcome::LeftForest(over) = session.move_player(Direction::West).unwrap() else {
        panic!("expected to leave the forest");
    };
    assert_eq!(over.ending, Ending::Victory);
    assert_eq!(over.summary.score, 190);
    assert_eq!(over.summary.title.to_string(), "Novice Adventurer");
    assert_score_invariant(&session);
}

#[test]
fn no_energy_means_death_without_a_roll() {
    let config = GameConfig { starting_energy: 100, ..GameConfig::default() };
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, enemy(10, false));
    let mut session = play_with(config, map, vec![0.5]);
    session.move_player(Direction::East).unwrap();

    let report = session.fight(100).unwrap();
    assert_eq!(report.spent, 100);
    assert_eq!(report.result, FightResult::Draw { energy_left: 0 });
    assert_eq!(session.phase(), Phase::Encounter);

    let report = session.fight(5).unwrap();
    assert_eq!(report.spent, 0);
    let FightResult::Died(over) = report.result else {
        panic!("expected death");
    };
    assert_eq!(over.cause, Some(DeathCause::Combat));
    assert_eq!(over.ending, Ending::DeathWithoutPrincess);
    assert_eq!(over.killed_by.as_deref(), Some(enemy(10, false).full_name.as_str()));
    assert_eq!(session.phase(), Phase::GameOver);
}

#[test]
fn losing_a_fight_while_carrying_the_princess() {
    let start = Position::new(0, 1);
    let mut session = play(forest(start, PRINCESS), vec![0.0, NO_FIND, 0.999]);
    session.move_player(Direction::West).unwrap();
    let report = session.fight(500).unwrap();
    assert!(matches!(report.result, FightResult::Won(_)));
    assert!(session.player().has_princess);

    let entered = session.move_player(Direction::South).unwrap();
    assert!(matches!(entered, MoveOutcome::Entered(EntryOutcome::Encounter { .. })));

    let report = session.fight(100).unwrap();
    assert_eq!(report.spent, 100);
    let FightResult::Died(over) = report.result else {
        panic!("expected death");
    };
    assert_eq!(over.ending, Ending::DeathWithPrincess);
    assert_eq!(over.cause, Some(DeathCause::Combat));
    assert_eq!(over.killed_by.as_deref(), Some(toad().full_name.as_str()));
    assert_eq!(session.player().energy, 400);
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.log().count(LogCategory::Death), 1);
    assert_score_invariant(&session);
}

#[test]
fn negative_energy_request_spends_one() {
    let mut session = play(forest(START, PRINCESS), vec![0.02]);
    session.move_player(Direction::East).unwrap();
    let report = session.fight(-5).unwrap();
    assert_eq!(report.spent, 1);
    assert_eq!(report.result, FightResult::Draw { energy_left: 999 });
    assert_eq!(session.player().energy, 999);
}

#[test]
fn input_phases_gate_actions() {
    let mut session = play(forest(START, PRINCESS), vec![]);
    assert_eq!(
        session.fight(10).unwrap_err(),
        GameError::ActionNotAllowed { phase: Phase::Exploring, action: forest_engine::Action::Fight }
    );
    assert!(session.begin_fight().is_err());

    session.move_player(Direction::East).unwrap();
    assert_eq!(session.begin_fight().unwrap(), Phase::FightInput);
    assert!(matches!(
        session.flee(),
        Err(GameError::ActionNotAllowed { phase: Phase::FightInput, .. })
    ));
    assert!(session.move_player(Direction::West).is_err());
    assert_eq!(session.cancel_input().unwrap(), Phase::Encounter);
    assert_eq!(session.begin_bribe().unwrap(), Phase::BribeInput);
    assert!(session.fight(10).is_err());
    assert_eq!(session.cancel_input().unwrap(), Phase::Encounter);
    assert!(session.begin_forced_fight().is_err());
}

#[test]
fn oversized_bribe_offers_all_gold() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(40));
    let mut session = play(map, vec![NO_FIND, 0.0]);
    session.move_player(Direction::East).unwrap();
    session.move_player(Direction::North).unwrap();
    assert_eq!(session.phase(), Phase::Encounter);

    let result = session.bribe(999_999).unwrap();
    assert_eq!(result, BribeResult::Accepted { offered: 40, rescued_princess: false });
    assert_eq!(session.player().gold, 0);
    assert_eq!(session.phase(), Phase::Exploring);
    let tile = session.map().tile(NORTH_EAST).unwrap();
    assert!(tile.cleared);
    assert!(!tile.enemy.defeated);
    assert_eq!(session.player().kills.len(), 1);
}

#[test]
fn refused_bribe_is_recovered_by_winning() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(100));
    let mut session = play(map, vec![NO_FIND, 0.9, 0.0, NO_FIND]);
    session.move_player(Direction::East).unwrap();
    session.move_player(Direction::North).unwrap();

    let result = session.bribe(100).unwrap();
    assert_eq!(result, BribeResult::Rejected { offered: 100, forfeited: 100 });
    assert_eq!(session.player().gold, 0);
    assert_eq!(session.bribe_lost_gold(), 100);
    assert_eq!(session.phase(), Phase::Encounter);

    let FightResult::Won(victory) = session.fight(50).unwrap().result else {
        panic!("expected a win");
    };
    assert_eq!(victory.recovered_gold, 100);
    assert_eq!(session.player().gold, 110);
    assert_eq!(session.bribe_lost_gold(), 0);
    assert_score_invariant(&session);
}

#[test]
fn insulting_bribe_forces_a_fight() {
    let mut session = play(forest(START, PRINCESS), vec![0.99, 0.5]);
    session.move_player(Direction::East).unwrap();

    let result = session.bribe(0).unwrap();
    assert_eq!(result, BribeResult::Insulted { offered: 0, forfeited: 0 });
    assert_eq!(session.phase(), Phase::ForcedFight);
    assert!(session.flee().is_err());
    assert!(session.bribe(1).is_err());
    assert_eq!(session.begin_forced_fight().unwrap(), Phase::ForcedFightInput);
    assert_eq!(session.cancel_input().unwrap(), Phase::ForcedFight);

    let report = session.fight(10).unwrap();
    assert!(matches!(report.result, FightResult::Draw { .. }));
    assert_eq!(session.phase(), Phase::Encounter);
}

#[test]
fn escaping_enters_a_neighbor() {
    let mut session = play(forest(START, PRINCESS), vec![0.0, 0.0]);
    session.move_player(Direction::East).unwrap();
    let result = session.flee().unwrap();
    let FleeResult::Escaped { direction, to, entry } = result else {
        panic!("expected escape");
    };
    assert_eq!(direction, Direction::North);
    assert_eq!(to, NORTH_EAST);
    assert!(matches!(entry, EntryOutcome::Encounter { .. }));
    assert_eq!(session.player().position, NORTH_EAST);
    assert_eq!(session.active_encounter(), Some(NORTH_EAST));
    assert_eq!(session.phase(), Phase::Encounter);
}

#[test]
fn flee_failures() {
    let mut caught = play(forest(START, PRINCESS), vec![0.5]);
    caught.move_player(Direction::East).unwrap();
    assert_eq!(caught.flee().unwrap(), FleeResult::Caught { cornered: false });
    assert_eq!(caught.phase(), Phase::Encounter);

    let mut forced = play(forest(START, PRINCESS), vec![0.8]);
    forced.move_player(Direction::East).unwrap();
    assert_eq!(forced.flee().unwrap(), FleeResult::ForcedFight);
    assert_eq!(forced.phase(), Phase::ForcedFight);

    let mut killed = play(forest(START, PRINCESS), vec![0.99]);
    killed.move_player(Direction::East).unwrap();
    let name = killed.active_enemy().unwrap().full_name.clone();
    let FleeResult::Killed(over) = killed.flee().unwrap() else {
        panic!("expected death");
    };
    assert_eq!(over.cause, Some(DeathCause::Flee));
    assert_eq!(over.killed_by, Some(name));
    assert_eq!(killed.log().last().unwrap().category, LogCategory::Death);
}

#[test]
fn teleport_then_cornered_flee() {
    let corner = Position::new(4, 4);
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(10));
    for swamp in [Position::new(3, 4), Position::new(4, 3)] {
        map.tile_mut(swamp).unwrap().is_swamp = true;
    }
    // 23 passable tiles, the corner is last
    let mut session = play(map, vec![0.0, WINGS, 0.99, 0.0]);
    session.move_player(Direction::East).unwrap();

    assert_eq!(session.use_item(0).unwrap(), ItemOutcome::Teleported { to: corner });
    assert_eq!(session.player().position, corner);
    assert_eq!(session.phase(), Phase::Exploring);
    assert!(session.player().inventory.is_empty());

    let entry = session.enter_current_tile().unwrap();
    assert!(matches!(entry, EntryOutcome::Encounter { .. }));
    assert_eq!(session.flee().unwrap(), FleeResult::Caught { cornered: true });
    assert_eq!(session.phase(), Phase::Encounter);
}

#[test]
fn items_that_need_an_enemy_are_kept() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(10));
    let mut session = play(map, vec![0.0, RING, NO_FIND]);
    session.move_player(Direction::East).unwrap();

    assert_eq!(session.use_item(0).unwrap(), ItemOutcome::Invalid);
    assert_eq!(session.player().inventory.len(), 1);
    assert_eq!(
        session.player().inventory.get(0).map(|t| t.effect),
        Some(TreasureEffect::InstantKill)
    );
    assert_eq!(session.log().last().unwrap().category, LogCategory::Error);
    assert_eq!(session.use_item(7).unwrap(), ItemOutcome::Invalid);

    session.move_player(Direction::North).unwrap();
    let ItemOutcome::Victory(victory) = session.use_item(0).unwrap() else {
        panic!("ring should kill");
    };
    assert_eq!(victory.treasure_value, 10);
    assert!(session.player().inventory.is_empty());
    assert_eq!(session.player().kills.len(), 2);
    assert_eq!(session.phase(), Phase::Exploring);
    assert!(session.map().tile(NORTH_EAST).unwrap().enemy.defeated);
}

#[test]
fn dragon_sword_is_wasted_on_a_toad() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(10));
    let mut session = play(map, vec![0.0, SWORD]);
    session.move_player(Direction::East).unwrap();
    session.move_player(Direction::North).unwrap();

    let outcome = session.use_item(0).unwrap();
    assert!(matches!(outcome, ItemOutcome::Wasted { ref item } if item.effect == TreasureEffect::DragonKill));
    assert!(session.player().inventory.is_empty());
    assert_eq!(session.phase(), Phase::Encounter);
}

#[test]
fn dragon_sword_frees_the_princess() {
    let start = Position::new(1, 0);
    let mut map = forest(start, PRINCESS);
    place(&mut map, Position::new(1, 1), mouse(10));
    let mut session = play(map, vec![0.0, SWORD, NO_FIND]);
    session.move_player(Direction::East).unwrap();
    session.move_player(Direction::West).unwrap();
    session.move_player(Direction::North).unwrap();
    assert!(session.active_enemy().unwrap().has_dragon());

    let ItemOutcome::Victory(victory) = session.use_item(0).unwrap() else {
        panic!("sword should kill the captor");
    };
    assert!(victory.rescued_princess);
    assert!(session.player().has_princess);
    assert_score_invariant(&session);
}

#[test]
fn explosive_pill_kills() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(10));
    let mut session = play(map, vec![0.0, PILL]);
    session.move_player(Direction::East).unwrap();

    let ItemOutcome::Died(over) = session.use_item(0).unwrap() else {
        panic!("expected death");
    };
    assert_eq!(over.cause, Some(DeathCause::Pill));
    assert_eq!(over.killed_by.as_deref(), Some("the forest"));
    assert_eq!(over.ending, Ending::DeathWithoutPrincess);
    assert_eq!(over.summary.score, 10);
}

#[test]
fn elixir_restores_starting_energy() {
    let mut map = forest(START, PRINCESS);
    place(&mut map, EAST, mouse(10));
    let mut session = play(map, vec![0.0, ELIXIR, 0.5]);
    session.move_player(Direction::East).unwrap();
    session.move_player(Direction::North).unwrap();
    session.fight(10).unwrap();
    assert_eq!(session.player().energy, 990);

    assert_eq!(
        session.use_item(0).unwrap(),
        ItemOutcome::Healed { before: 990, after: 1000 }
    );
    assert_eq!(session.phase(), Phase::Encounter);
}

struct Offline;

impl Leaderboard for Offline {
    fn submit(&mut self, _record: ScoreRecord) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::Unavailable("offline".into()))
    }

    fn entries(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(Vec::new())
    }
}

#[test]
fn scores_reach_the_leaderboard_once_finished() {
    let mut session = play(forest(Position::new(0, 2), PRINCESS), vec![]);
    let mut board = InMemoryLeaderboard::new();
    assert!(matches!(
        session.submit_score(&mut board),
        Err(LeaderboardError::NotFinished)
    ));

    session.move_player(Direction::North).unwrap();
    let record = session.submit_score(&mut board).unwrap();
    let entries = board.entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].record, record);
    assert_eq!(record.user_id.as_deref(), Some("u-1"));
}

#[test]
fn leaderboard_failure_keeps_the_ending() {
    let mut session = play(forest(Position::new(0, 2), PRINCESS), vec![]);
    session.move_player(Direction::North).unwrap();
    assert!(session.submit_score(&mut Offline).is_err());
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.game_over().unwrap().ending, Ending::Coward);
}

#[test]
fn snapshot_serializes() {
    let mut session = play(forest(START, PRINCESS), vec![]);
    session.move_player(Direction::East).unwrap();
    let json = serde_json::to_value(session.snapshot(1)).unwrap();
    assert_eq!(json["phase"], "encounter");
    assert_eq!(json["log"].as_array().unwrap().len(), 1);
    assert_eq!(json["enemy"]["tier"], 10);
    assert_eq!(json["player"]["energy"], 1000);
}

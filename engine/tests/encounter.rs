use forest_engine::config::{BribeModel, FightModel, FleeTable};
use forest_engine::encounter::{
    bribe_odds, fight_odds, resolve_bribe, resolve_fight, resolve_flee,
};
use forest_engine::{BribeOutcome, Dice, FightOutcome, FleeOutcome};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn even_fight_peaks_draws() {
    let o = fight_odds(&FightModel::default(), 100, 100);
    assert!(close(o.draw, 0.45));
    assert!(close(o.win, 0.275));
    assert!(close(o.lose, 0.275));
}

#[test]
fn double_energy_nearly_always_wins() {
    let o = fight_odds(&FightModel::default(), 200, 100);
    assert!(close(o.win, 0.97929), "{}", o.win);
    assert!(close(o.draw, 0.01411), "{}", o.draw);
    let o = fight_odds(&FightModel::default(), 500, 100);
    assert!(o.win > 0.9999);
}

#[test]
fn odds_table() {
    let model = FightModel::default();
    let table: Vec<String> = [25, 50, 75, 100, 125, 150, 200, 300]
        .into_iter()
        .map(|e| {
            let o = fight_odds(&model, e, 100);
            format!("{e:<4} win={:.4} draw={:.4} lose={:.4}", o.win, o.draw, o.lose)
        })
        .collect();
    insta::assert_snapshot!(table.join("\n"), @r"
    25   win=0.0215 draw=0.0642 lose=0.9143
    50   win=0.0615 draw=0.1893 lose=0.7492
    75   win=0.1420 draw=0.3624 lose=0.4956
    100  win=0.2750 draw=0.4500 lose=0.2750
    125  win=0.4956 draw=0.3624 lose=0.1420
    150  win=0.7492 draw=0.1893 lose=0.0615
    200  win=0.9793 draw=0.0141 lose=0.0066
    300  win=1.0000 draw=0.0000 lose=0.0000
    ");
}

#[test]
fn zero_strength_is_a_sure_win() {
    let mut dice = Dice::from_scripted(vec![0.999]);
    let outcome = resolve_fight(&mut dice, &FightModel::default(), 1, 0);
    assert_eq!(outcome, FightOutcome::Win);
    let o = fight_odds(&FightModel::default(), 0, 0);
    assert_eq!((o.win, o.draw, o.lose), (1.0, 0.0, 0.0));
}

#[test]
fn fight_roll_order_is_win_draw_lose() {
    let model = FightModel::default();
    let mut dice = Dice::from_scripted(vec![0.1, 0.5, 0.9]);
    assert_eq!(resolve_fight(&mut dice, &model, 100, 100), FightOutcome::Win);
    assert_eq!(resolve_fight(&mut dice, &model, 100, 100), FightOutcome::Draw);
    assert_eq!(resolve_fight(&mut dice, &model, 100, 100), FightOutcome::Lose);
}

#[test]
fn flee_table_order() {
    let table = FleeTable::default();
    let mut dice = Dice::from_scripted(vec![0.0, 0.5, 0.8, 0.97]);
    assert_eq!(resolve_flee(&mut dice, &table), FleeOutcome::Escape);
    assert_eq!(resolve_flee(&mut dice, &table), FleeOutcome::Caught);
    assert_eq!(resolve_flee(&mut dice, &table), FleeOutcome::ForcedFight);
    assert_eq!(resolve_flee(&mut dice, &table), FleeOutcome::Killed);
}

#[test]
fn flee_frequencies_match_table() {
    let table = FleeTable::default();
    let mut dice = Dice::from_seed(31337);
    let n = 20_000;
    let mut counts = [0u32; 4];
    for _ in 0..n {
        let idx = match resolve_flee(&mut dice, &table) {
            FleeOutcome::Escape => 0,
            FleeOutcome::Caught => 1,
            FleeOutcome::ForcedFight => 2,
            FleeOutcome::Killed => 3,
        };
        counts[idx] += 1;
    }
    for (count, expected) in counts.iter().zip([0.45, 0.30, 0.20, 0.05]) {
        let rate = *count as f64 / n as f64;
        assert!((rate - expected).abs() < 0.02, "rate {rate} vs {expected}");
    }
}

#[test]
fn bribe_curves() {
    let model = BribeModel::default();
    let zero = bribe_odds(&model, 0);
    assert!(close(zero.accept, 0.04505), "{}", zero.accept);
    assert!(close(zero.insult, 0.47198), "{}", zero.insult);

    let ten = bribe_odds(&model, 10);
    assert!(ten.insult > ten.accept);

    let big = bribe_odds(&model, 200);
    assert!(big.accept > 0.94);
    assert!(big.insult < 0.001);
    for o in [zero, ten, big] {
        assert!(o.reject >= 0.0 && o.reject <= 1.0);
    }
}

#[test]
fn bribe_roll_order_is_accept_reject_insult() {
    let model = BribeModel::default();
    let mut dice = Dice::from_scripted(vec![0.0, 0.5, 0.99]);
    assert_eq!(resolve_bribe(&mut dice, &model, 30), BribeOutcome::Accept);
    assert_eq!(resolve_bribe(&mut dice, &model, 30), BribeOutcome::Reject);
    assert_eq!(resolve_bribe(&mut dice, &model, 30), BribeOutcome::Insult);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn more_energy_wins_more(strength in 50u32..=200, a in 1u32..1200, b in 1u32..1200) {
        let cap = 6 * strength;
        let (lo, hi) = (a.min(b).min(cap), a.max(b).min(cap));
        prop_assume!(lo < hi);
        let model = FightModel::default();
        prop_assert!(fight_odds(&model, hi, strength).win > fight_odds(&model, lo, strength).win);
    }

    #[test]
    fn fight_odds_are_a_distribution(energy in 0u32..5000, strength in 1u32..=190) {
        let o = fight_odds(&FightModel::default(), energy, strength);
        prop_assert!(o.win >= 0.0 && o.draw >= 0.0 && o.lose >= -1e-12);
        prop_assert!((o.win + o.draw + o.lose - 1.0).abs() < 1e-9);
    }

    #[test]
    fn more_gold_persuades_more(a in 0u32..=500, b in 0u32..=500) {
        prop_assume!(a < b);
        let model = BribeModel::default();
        let (lo, hi) = (bribe_odds(&model, a), bribe_odds(&model, b));
        prop_assert!(hi.accept > lo.accept);
        prop_assert!(hi.insult < lo.insult);
    }
}

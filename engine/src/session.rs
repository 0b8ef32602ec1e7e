//! The Game Controller: one explicitly owned play-through. Every operation
//! checks the current phase, applies player intent through the encounter
//! resolver, mutates player and tile state, and appends to the narrative log.

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError, Enemy, HiddenTreasure, Treasure, TreasureEffect};
use crate::config::GameConfig;
use crate::encounter::{resolve_bribe, resolve_fight, resolve_flee};
use crate::error::GameError;
use crate::leaderboard::{Leaderboard, LeaderboardError, PlayerIdentity};
use crate::log::{LogCategory, LogEntry, NarrativeLog};
use crate::map::{Direction, ForestMap, Position, Tile};
use crate::phase::{Action, Phase};
use crate::player::Player;
use crate::score::{DeathCause, Ending, GameOver, ScoreRecord, ScoreSummary};
use crate::{BribeOutcome, Dice, FightOutcome, FleeOutcome};

const FOREST: &str = "the forest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EntryOutcome {
    AlreadyCleared,
    Looted {
        treasure: Option<Treasure>,
        hidden: Option<HiddenTreasure>,
    },
    Encounter {
        enemy: String,
        strength: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Blocked,
    Entered(EntryOutcome),
    LeftForest(GameOver),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Victory {
    pub enemy: String,
    pub treasure_value: u32,
    pub recovered_gold: u32,
    pub hidden: Option<HiddenTreasure>,
    pub rescued_princess: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FightResult {
    Won(Victory),
    Draw { energy_left: u32 },
    Died(GameOver),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FightReport {
    pub spent: u32,
    pub result: FightResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FleeResult {
    Escaped {
        direction: Direction,
        to: Position,
        entry: EntryOutcome,
    },
    /// `cornered` when the roll allowed escape but no passable neighbor exists.
    Caught { cornered: bool },
    ForcedFight,
    Killed(GameOver),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BribeResult {
    Accepted { offered: u32, rescued_princess: bool },
    Rejected { offered: u32, forfeited: u32 },
    Insulted { offered: u32, forfeited: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Nothing was consumed.
    Invalid,
    /// Consumed without effect.
    Wasted { item: HiddenTreasure },
    Victory(Victory),
    Teleported { to: Position },
    Healed { before: u32, after: u32 },
    Died(GameOver),
}

/// Read-only view for a rendering layer.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub phase: Phase,
    pub player: &'a Player,
    pub map: &'a ForestMap,
    pub enemy: Option<&'a Enemy>,
    pub bribe_lost_gold: u32,
    pub log: &'a [LogEntry],
    pub game_over: Option<&'a GameOver>,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    catalog: Catalog,
    identity: PlayerIdentity,
    dice: Dice,
    phase: Phase,
    player: Player,
    map: ForestMap,
    encounter: Option<Position>,
    bribe_lost_gold: u32,
    log: NarrativeLog,
    game_over: Option<GameOver>,
}

impl Session {
    /// Generates a forest with `dice` and starts exploring it.
    pub fn new(config: GameConfig, catalog: Catalog, identity: PlayerIdentity, mut dice: Dice) -> Self {
        let map = ForestMap::generate(&config, &catalog, &mut dice);
        Self::from_map(config, catalog, identity, map, dice)
    }

    /// Standard rules, English catalog, anonymous player.
    pub fn standard(seed: u64) -> Result<Self, CatalogError> {
        Ok(Self::new(
            GameConfig::default(),
            Catalog::builtin()?,
            PlayerIdentity::anonymous(),
            Dice::from_seed(seed),
        ))
    }

    /// Starts a session on an already generated forest.
    pub fn from_map(
        config: GameConfig,
        catalog: Catalog,
        identity: PlayerIdentity,
        mut map: ForestMap,
        dice: Dice,
    ) -> Self {
        let start = map.start();
        if let Some(tile) = map.tile_mut(start) {
            tile.visited = true;
            tile.cleared = true;
        }
        let mut log = NarrativeLog::default();
        log.push(
            LogCategory::Intro,
            "🌲 You step into a dark, mysterious forest. Dangerous creatures lurk in the shadows.",
        );
        log.push(
            LogCategory::Intro,
            "🧭 Explore in any direction. Your goal: find and rescue the princess.",
        );
        let player = Player::new(start, config.starting_energy);
        info!(?start, princess = ?map.princess(), pseudonym = identity.pseudonym(), "session started");
        Self {
            config,
            catalog,
            identity,
            dice,
            phase: Phase::Exploring,
            player,
            map,
            encounter: None,
            bribe_lost_gold: 0,
            log,
            game_over: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn map(&self) -> &ForestMap {
        &self.map
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn log(&self) -> &NarrativeLog {
        &self.log
    }

    pub fn bribe_lost_gold(&self) -> u32 {
        self.bribe_lost_gold
    }

    pub fn active_encounter(&self) -> Option<Position> {
        self.encounter
    }

    pub fn active_enemy(&self) -> Option<&Enemy> {
        self.encounter
            .and_then(|pos| self.map.tile(pos))
            .map(|tile| &tile.enemy)
    }

    pub fn current_tile(&self) -> Option<&Tile> {
        self.map.tile(self.player.position)
    }

    pub fn game_over(&self) -> Option<&GameOver> {
        self.game_over.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn score(&self) -> ScoreSummary {
        ScoreSummary::from_player(&self.player)
    }

    pub fn score_record(&self) -> Option<ScoreRecord> {
        self.game_over
            .as_ref()
            .map(|over| ScoreRecord::new(&over.summary, over.ending, &self.identity))
    }

    /// Hands the final record to `board`. The session is never touched, so
    /// a failed write leaves the computed ending intact.
    pub fn submit_score(&self, board: &mut dyn Leaderboard) -> Result<ScoreRecord, LeaderboardError> {
        let record = self.score_record().ok_or(LeaderboardError::NotFinished)?;
        board.submit(record.clone())?;
        Ok(record)
    }

    pub fn snapshot(&self, recent: usize) -> SessionSnapshot<'_> {
        SessionSnapshot {
            phase: self.phase,
            player: &self.player,
            map: &self.map,
            enemy: self.active_enemy(),
            bribe_lost_gold: self.bribe_lost_gold,
            log: self.log.recent(recent),
            game_over: self.game_over.as_ref(),
        }
    }

    /* ---------------- exploration ---------------- */

    pub fn move_player(&mut self, direction: Direction) -> Result<MoveOutcome, GameError> {
        self.guard(Action::Move)?;
        let Some(dest) = self.map.step(self.player.position, direction) else {
            return Ok(MoveOutcome::LeftForest(self.leave_forest()));
        };
        if self.map.is_swamp(dest) {
            self.log.push(
                LogCategory::Info,
                "🟤 A dense, impassable swamp blocks your way. You must find another route.",
            );
            return Ok(MoveOutcome::Blocked);
        }
        Ok(MoveOutcome::Entered(self.enter(dest)?))
    }

    /// Processes the tile the player stands on as a fresh entry. Used after
    /// a teleport, which relocates without entering.
    pub fn enter_current_tile(&mut self) -> Result<EntryOutcome, GameError> {
        self.guard(Action::EnterTile)?;
        self.enter(self.player.position)
    }

    pub fn begin_fight(&mut self) -> Result<Phase, GameError> {
        self.input_step(Action::BeginFight)
    }

    pub fn begin_bribe(&mut self) -> Result<Phase, GameError> {
        self.input_step(Action::BeginBribe)
    }

    pub fn begin_forced_fight(&mut self) -> Result<Phase, GameError> {
        self.input_step(Action::BeginForcedFight)
    }

    pub fn cancel_input(&mut self) -> Result<Phase, GameError> {
        self.input_step(Action::CancelInput)
    }

    /* ---------------- encounter actions ---------------- */

    /// Spends `requested` energy (clamped to `[1, energy]`) on the fight.
    /// With no energy left the hero dies without a roll.
    pub fn fight(&mut self, requested: i64) -> Result<FightReport, GameError> {
        self.guard(Action::Fight)?;
        let pos = self.encounter_position()?;
        let (name, strength) = {
            let enemy = &self.encounter_tile(pos)?.enemy;
            (enemy.full_name.clone(), enemy.total_strength)
        };

        if self.player.energy == 0 {
            self.log.push(
                LogCategory::CombatDraw,
                format!("⚔️ With no energy left to fight, {name} dispatches you without mercy."),
            );
            let over = self.die(DeathCause::Combat);
            return Ok(FightReport { spent: 0, result: FightResult::Died(over) });
        }

        let spent = self.player.spend_energy(requested);
        let result = match resolve_fight(&mut self.dice, &self.config.fight, spent, strength) {
            FightOutcome::Win => FightResult::Won(self.win_encounter(pos)?),
            FightOutcome::Draw => {
                self.log.push(
                    LogCategory::CombatDraw,
                    format!(
                        "⚔️ You pour {spent} energy into the fight against {name} (strength {strength}). \
                         The fight is even and neither side yields. The energy is lost; {} remains.",
                        self.player.energy
                    ),
                );
                self.phase = Phase::Encounter;
                FightResult::Draw { energy_left: self.player.energy }
            }
            FightOutcome::Lose => FightResult::Died(self.die(DeathCause::Combat)),
        };
        Ok(FightReport { spent, result })
    }

    pub fn flee(&mut self) -> Result<FleeResult, GameError> {
        self.guard(Action::Flee)?;
        let pos = self.encounter_position()?;
        let name = self.encounter_tile(pos)?.enemy.full_name.clone();

        let result = match resolve_flee(&mut self.dice, &self.config.flee) {
            FleeOutcome::Escape => {
                let neighbors = self.map.passable_neighbors(self.player.position);
                match self.dice.choose(&neighbors).copied() {
                    Some((direction, to)) => {
                        self.log.push(
                            LogCategory::FleeEscape,
                            format!("🏃 You escape from the {name}! You run {}.", direction.as_str()),
                        );
                        self.encounter = None;
                        self.bribe_lost_gold = 0;
                        self.phase = Phase::Exploring;
                        let entry = self.enter(to)?;
                        FleeResult::Escaped { direction, to, entry }
                    }
                    None => {
                        self.log.push(LogCategory::FleeCaught, "🏃 You try to run but there is nowhere to go.");
                        self.phase = Phase::Encounter;
                        FleeResult::Caught { cornered: true }
                    }
                }
            }
            FleeOutcome::Caught => {
                self.log.push(
                    LogCategory::FleeCaught,
                    format!("🏃 You try to run but {name} cuts you off. You must decide what to do."),
                );
                self.phase = Phase::Encounter;
                FleeResult::Caught { cornered: false }
            }
            FleeOutcome::ForcedFight => {
                self.log.push(
                    LogCategory::FleeForced,
                    format!("🏃 {name} grabs you by the neck as you turn to run! There is no escape: you must fight."),
                );
                self.phase = Phase::ForcedFight;
                FleeResult::ForcedFight
            }
            FleeOutcome::Killed => FleeResult::Killed(self.die(DeathCause::Flee)),
        };
        Ok(result)
    }

    /// Offers `requested` gold (clamped to `[0, gold]`). The gold is paid
    /// whatever the answer; refused offers are recovered only by winning.
    pub fn bribe(&mut self, requested: i64) -> Result<BribeResult, GameError> {
        self.guard(Action::Bribe)?;
        let pos = self.encounter_position()?;
        let (name, captor) = {
            let enemy = &self.encounter_tile(pos)?.enemy;
            (enemy.full_name.clone(), enemy.is_princess_captor)
        };

        let offered = self.player.spend_gold(requested);
        let result = match resolve_bribe(&mut self.dice, &self.config.bribe, offered) {
            BribeOutcome::Accept => {
                self.encounter_tile(pos)?.cleared = true;
                self.log.push(
                    LogCategory::BribeAccept,
                    format!("💰 You offer {offered} gold to {name}. The creature accepts and lets you pass in peace."),
                );
                let rescued_princess = captor && !self.player.has_princess;
                if captor {
                    self.player.has_princess = true;
                    self.log.push(
                        LogCategory::PrincessRescued,
                        "👸 The sorcerer releases the princess as part of the deal! Now get her out of the forest.",
                    );
                }
                self.encounter = None;
                self.bribe_lost_gold = 0;
                self.phase = Phase::Exploring;
                BribeResult::Accepted { offered, rescued_princess }
            }
            BribeOutcome::Reject => {
                self.bribe_lost_gold += offered;
                self.log.push(
                    LogCategory::BribeReject,
                    format!(
                        "💰 You offer {offered} gold to {name}. The creature pockets the coins but scorns your offer. \
                         \"Not enough,\" it growls. You must decide what to do."
                    ),
                );
                self.phase = Phase::Encounter;
                BribeResult::Rejected { offered, forfeited: self.bribe_lost_gold }
            }
            BribeOutcome::Insult => {
                self.bribe_lost_gold += offered;
                self.log.push(
                    LogCategory::BribeInsult,
                    format!(
                        "💰 You offer {offered} gold to {name}. The creature is insulted by such a miserable offer! \
                         It keeps your gold and forces you to fight."
                    ),
                );
                self.phase = Phase::ForcedFight;
                BribeResult::Insulted { offered, forfeited: self.bribe_lost_gold }
            }
        };
        Ok(result)
    }

    /// Consumes the inventory item at `index`. Items that need an enemy are
    /// put back untouched when there is none.
    pub fn use_item(&mut self, index: usize) -> Result<ItemOutcome, GameError> {
        self.guard(Action::UseItem)?;
        let Some(item) = self.player.inventory.take(index) else {
            return Ok(ItemOutcome::Invalid);
        };

        if item.effect.needs_encounter() && self.encounter.is_none() {
            self.log.push(
                LogCategory::Error,
                format!("There is no enemy to use the {} on.", item.name),
            );
            self.player.inventory.restore(index, item);
            return Ok(ItemOutcome::Invalid);
        }

        let outcome = match item.effect {
            TreasureEffect::InstantKill => {
                let pos = self.encounter_position()?;
                let name = self.encounter_tile(pos)?.enemy.full_name.clone();
                self.log.push(
                    LogCategory::ItemUse,
                    format!(
                        "{} You use the {}! A golden glow engulfs {name}. The creature crumbles to dust.",
                        item.icon, item.name
                    ),
                );
                ItemOutcome::Victory(self.win_encounter(pos)?)
            }
            TreasureEffect::DragonKill => {
                let pos = self.encounter_position()?;
                let (name, dragon) = {
                    let enemy = &self.encounter_tile(pos)?.enemy;
                    (enemy.full_name.clone(), enemy.has_dragon())
                };
                if dragon {
                    self.log.push(
                        LogCategory::ItemUse,
                        format!(
                            "{} You draw the {}! The blade burns with blue fire and {name} falls before its ancient power.",
                            item.icon, item.name
                        ),
                    );
                    ItemOutcome::Victory(self.win_encounter(pos)?)
                } else {
                    self.log.push(
                        LogCategory::ItemUse,
                        format!(
                            "{} You raise the {}, but {name} is no dragon. The blade stays dark and crumbles in your hands.",
                            item.icon, item.name
                        ),
                    );
                    ItemOutcome::Wasted { item }
                }
            }
            TreasureEffect::Teleport => {
                let spots = self.map.passable_positions();
                let to = self.dice.choose(&spots).copied().unwrap_or(self.player.position);
                self.log.push(
                    LogCategory::ItemUse,
                    format!(
                        "{} You use the {}! Dark wings lift you above the trees and you land somewhere else in the forest.",
                        item.icon, item.name
                    ),
                );
                self.encounter = None;
                self.bribe_lost_gold = 0;
                self.player.position = to;
                self.phase = Phase::Exploring;
                ItemOutcome::Teleported { to }
            }
            TreasureEffect::SelfDestruct => ItemOutcome::Died(self.die(DeathCause::Pill)),
            TreasureEffect::FullHeal => {
                let before = self.player.energy;
                self.player.energy = self.config.starting_energy;
                let after = self.player.energy;
                self.log.push(
                    LogCategory::ItemUse,
                    format!(
                        "{} You drink the {}! Warmth floods your body and your energy is fully restored ({before} → {after}).",
                        item.icon, item.name
                    ),
                );
                ItemOutcome::Healed { before, after }
            }
        };
        Ok(outcome)
    }

    /* ---------------- internals ---------------- */

    fn guard(&self, action: Action) -> Result<(), GameError> {
        if self.phase.is_terminal() {
            return Err(GameError::GameOver);
        }
        if !self.phase.permits(action) {
            return Err(GameError::ActionNotAllowed { phase: self.phase, action });
        }
        Ok(())
    }

    fn input_step(&mut self, action: Action) -> Result<Phase, GameError> {
        self.guard(action)?;
        let next = self
            .phase
            .input_transition(action)
            .ok_or(GameError::ActionNotAllowed { phase: self.phase, action })?;
        self.phase = next;
        Ok(next)
    }

    fn encounter_position(&self) -> Result<Position, GameError> {
        self.encounter.ok_or(GameError::NoEncounter(self.phase))
    }

    fn encounter_tile(&mut self, pos: Position) -> Result<&mut Tile, GameError> {
        let phase = self.phase;
        self.map.tile_mut(pos).ok_or(GameError::NoEncounter(phase))
    }

    fn enter(&mut self, pos: Position) -> Result<EntryOutcome, GameError> {
        let tile = self.map.tile_mut(pos).ok_or(GameError::OffMap(pos))?;
        self.player.position = pos;
        self.bribe_lost_gold = 0;
        self.encounter = None;
        tile.visited = true;
        debug!(?pos, cleared = tile.cleared, tier = ?tile.enemy.tier, "entered tile");

        if tile.cleared {
            self.phase = Phase::Exploring;
            self.log.push(LogCategory::Info, "This area is already cleared. You may move freely.");
            return Ok(EntryOutcome::AlreadyCleared);
        }

        if tile.enemy.tier.is_mouse() {
            return Ok(self.loot_mouse(pos));
        }

        let enemy = &tile.enemy;
        let mut message = match &enemy.treasure {
            Some(t) => format!(
                "A {} holds {}. Its strength is {}.",
                enemy.full_name, t.name, enemy.total_strength
            ),
            None => format!("A {} blocks your way. Its strength is {}.", enemy.full_name, enemy.total_strength),
        };
        if let Some(pet) = &enemy.pet {
            message.push_str(&format!(" Its pet is a {}.", pet.full_name));
        }
        if enemy.is_princess_captor {
            message.push_str(" It holds the princess captive!");
        }
        let outcome = EntryOutcome::Encounter {
            enemy: enemy.full_name.clone(),
            strength: enemy.total_strength,
        };
        self.log.push(LogCategory::Encounter, message);
        self.encounter = Some(pos);
        self.phase = Phase::Encounter;
        Ok(outcome)
    }

    /// Tier-0 tiles resolve as a riskless automatic win.
    fn loot_mouse(&mut self, pos: Position) -> EntryOutcome {
        let Some(tile) = self.map.tile_mut(pos) else {
            return EntryOutcome::AlreadyCleared;
        };
        let enemy = tile.enemy.clone();
        tile.cleared = true;
        tile.enemy.defeated = true;
        let value = self.player.record_kill(&enemy);

        let loot = match &enemy.treasure {
            Some(t) => format!("{} {}, {value} gold", t.icon, t.name),
            None => "nothing of value".to_string(),
        };
        self.log.push(
            LogCategory::Mouse,
            format!("🐭 You find a small, defenseless {}. You help yourself to its belongings ({loot}). Bully!", enemy.name),
        );
        let hidden = self.roll_hidden("Surprise! Among the mouse's belongings you find:");
        self.phase = Phase::Exploring;
        EntryOutcome::Looted { treasure: enemy.treasure, hidden }
    }

    /// Shared by fight wins and killing items.
    fn win_encounter(&mut self, pos: Position) -> Result<Victory, GameError> {
        let tile = self.encounter_tile(pos)?;
        let enemy = tile.enemy.clone();
        tile.cleared = true;
        tile.enemy.defeated = true;

        let treasure_value = self.player.record_kill(&enemy);
        let recovered_gold = std::mem::take(&mut self.bribe_lost_gold);
        self.player.gold += recovered_gold;

        let mut message = match &enemy.treasure {
            Some(t) => format!(
                "⚔️ Victory! You defeat {}. You take {} {} ({} gold).",
                enemy.full_name, t.icon, t.name, t.value
            ),
            None => format!("⚔️ Victory! You defeat {}.", enemy.full_name),
        };
        if recovered_gold > 0 {
            message.push_str(&format!(" You recover {recovered_gold} gold from failed bribes."));
        }
        self.log.push(LogCategory::CombatWin, message);

        let hidden = self.roll_hidden("🎁 Hidden treasure! Among the remains you find:");

        let rescued_princess = enemy.is_princess_captor && !self.player.has_princess;
        if enemy.is_princess_captor {
            self.player.has_princess = true;
            self.log.push(
                LogCategory::PrincessRescued,
                "👸 You rescued the princess! Now get her out of the forest: head for any edge of the map.",
            );
        }

        self.encounter = None;
        self.phase = Phase::Exploring;
        Ok(Victory {
            enemy: enemy.full_name,
            treasure_value,
            recovered_gold,
            hidden,
            rescued_princess,
        })
    }

    fn roll_hidden(&mut self, context: &str) -> Option<HiddenTreasure> {
        let found = self
            .catalog
            .roll_hidden_treasure(&mut self.dice, self.config.hidden_treasure_chance)?;
        self.player.inventory.push(found.clone());
        self.log.push(
            LogCategory::HiddenTreasure,
            format!("{context} {} {} - {}", found.icon, found.name, found.description),
        );
        Some(found)
    }

    fn leave_forest(&mut self) -> GameOver {
        if self.player.has_princess {
            self.log.push(
                LogCategory::Victory,
                "🏆 You walk out of the forest with the princess safe! The creatures you slew prove your \
                 valor and the riches you took are your reward. Victory!",
            );
            self.finish(Ending::Victory, None, None)
        } else {
            self.log.push(
                LogCategory::Coward,
                "🐔 You leave the forest without the princess. Coward! The sorcerer's dragon devours her \
                 and you are booed out of the kingdom.",
            );
            self.finish(Ending::Coward, None, None)
        }
    }

    fn die(&mut self, cause: DeathCause) -> GameOver {
        let killer = self.active_enemy().map(|e| e.full_name.clone());
        let mut message = match (cause, killer.as_deref()) {
            (DeathCause::Pill, _) => {
                "💊💥 You swallow the explosive pill. A deafening blast shakes the forest. Nothing is left of you."
                    .to_string()
            }
            (DeathCause::Flee, Some(name)) => format!("💀 You try to run but {name} catches you and kills you."),
            (DeathCause::Combat, Some(name)) => format!("💀 {name} defeats you in combat."),
            (_, None) => "💀 The forest claims you.".to_string(),
        };
        if self.player.has_princess {
            message.push_str(" The princess, who was with you, dies too.");
        } else {
            message.push_str(
                " The sorcerer, smiling wickedly, serves the princess to his dragon on a silver platter.",
            );
        }
        self.log.push(LogCategory::Death, message);
        let killed_by = killer.unwrap_or_else(|| FOREST.to_string());
        self.finish(Ending::death(self.player.has_princess), Some(cause), Some(killed_by))
    }

    fn finish(&mut self, ending: Ending, cause: Option<DeathCause>, killed_by: Option<String>) -> GameOver {
        self.phase = Phase::GameOver;
        let over = GameOver { ending, cause, killed_by, summary: self.score() };
        info!(%ending, ?cause, score = over.summary.score, title = %over.summary.title, "game over");
        self.game_over = Some(over.clone());
        over
    }
}

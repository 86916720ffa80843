//! Command surface of a match.
//!
//! [`Match`] owns the state and the dice and is the only way hosts mutate a
//! match. Each handler is gated on phase and turn, then delegates to the
//! rules modules. An accepted command appends its log line and, when its
//! [`TurnCost`] says so, passes the turn.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::error::Rejection;
use crate::game::{
    assert_invariants, attempt_move, build, buy_weapon, economy, seed_monsters, toggle_weapon,
    upgrade, BuildingKind, Coord, Dice, DuelOutcome, GameState, Level, MatchSetup, Monster,
    OwnedWeapon, ParsePlayerError, ParseWeaponError, Phase, PlayerId, SeededDice, WeaponId,
    WeaponInstanceId,
};

/// Whether an accepted command passes the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnCost {
    /// The other player moves next.
    AdvancesTurn,
    /// The same player keeps acting.
    Free,
}

/// What an accepted command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Token moved onto an open tile.
    Moved {
        /// New position.
        to: Coord,
    },
    /// Enemy tower hit.
    TowerAttacked {
        /// Owner of the tower.
        target: PlayerId,
        /// Damage dealt.
        damage: u32,
        /// Tower health afterwards.
        remaining: u32,
        /// Duel against the defender standing on the tower, if any.
        duel: Option<DuelOutcome>,
        /// Whether the tower fell.
        destroyed: bool,
    },
    /// Duel against the enemy token in the open.
    DuelResolved {
        /// Who won.
        outcome: DuelOutcome,
        /// Contested tile.
        at: Coord,
    },
    /// Monster killed and looted.
    MonsterSlain {
        /// The slain monster.
        monster: Monster,
        /// Gold gained.
        gold: u32,
        /// Coins gained.
        coins: u32,
        /// Permanent power gained.
        power: u32,
    },
    /// Monster won; attacker sent home.
    MonsterRepelled {
        /// The monster, still on its tile.
        monster: Monster,
        /// Gold actually lost.
        gold_lost: u32,
    },
    /// Structure built.
    Built {
        /// What was built.
        kind: BuildingKind,
        /// Where it was placed.
        at: Coord,
        /// Gold paid.
        cost: u32,
    },
    /// Tower or building levelled up.
    Upgraded {
        /// Upgraded tile.
        at: Coord,
        /// New level.
        level: Level,
        /// Coins paid.
        coins_spent: u32,
        /// Whether the target was the tower.
        tower: bool,
    },
    /// Weapon bought.
    WeaponBought {
        /// The new weapon.
        weapon: OwnedWeapon,
        /// Gold paid.
        cost: u32,
        /// Whether it went straight into a free slot.
        equipped: bool,
    },
    /// Weapon equipped.
    WeaponEquipped {
        /// The weapon.
        weapon: OwnedWeapon,
    },
    /// Weapon unequipped.
    WeaponUnequipped {
        /// The weapon.
        weapon: OwnedWeapon,
    },
    /// Turn passed explicitly.
    TurnEnded {
        /// Mine income credited.
        income: u32,
    },
    /// Admin resource adjustment.
    Granted {
        /// Recipient.
        target: PlayerId,
        /// Adjusted resource.
        resource: Resource,
        /// Signed amount.
        amount: i64,
    },
}

/// Result of an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Log line.
    pub message: String,
    /// Whether the turn passes.
    pub cost: TurnCost,
    /// What happened.
    pub event: Event,
}

impl Outcome {
    /// Outcome of a turn-consuming command.
    pub(crate) fn turn(event: Event, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cost: TurnCost::AdvancesTurn,
            event,
        }
    }

    /// Outcome of a free action.
    pub(crate) fn free(event: Event, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cost: TurnCost::Free,
            event,
        }
    }
}

/// Player resource adjustable by the admin grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    /// Base power.
    Power,
    /// Gold.
    Gold,
    /// Upgrade coins.
    Coins,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Power => write!(f, "power"),
            Resource::Gold => write!(f, "gold"),
            Resource::Coins => write!(f, "coins"),
        }
    }
}

/// A command as issued by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Step onto an adjacent tile.
    Move(Coord),
    /// Build next to the tower.
    Build(BuildingKind),
    /// Upgrade the tower or a building.
    Upgrade(Coord),
    /// Buy from the weapon catalog.
    BuyWeapon(WeaponId),
    /// Equip or unequip an owned weapon.
    ToggleWeapon(WeaponInstanceId),
    /// Pass the turn.
    EndTurn,
    /// Admin resource adjustment.
    Grant {
        /// Recipient.
        target: PlayerId,
        /// Adjusted resource.
        resource: Resource,
        /// Signed amount.
        amount: i64,
    },
}

/// Error parsing a [`Command`] from a script line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse command `{line}`: {reason}")]
pub struct ParseCommandError {
    line: String,
    reason: String,
}

impl ParseCommandError {
    fn new(line: &str, reason: impl Into<String>) -> Self {
        Self {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// Parses `move X Y`, `build mine|forge`, `upgrade X Y`, `buy w1..w8`,
    /// `toggle ID`, `end`, and `grant p1|p2 power|gold|coins N`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| ParseCommandError::new(line, reason);
        let words: Vec<&str> = line.split_whitespace().collect();

        let coord = |x: &str, y: &str| -> Result<Coord, ParseCommandError> {
            let x = x.parse().map_err(|_| err("bad x coordinate"))?;
            let y = y.parse().map_err(|_| err("bad y coordinate"))?;
            Ok(Coord::new(x, y))
        };

        match words.as_slice() {
            ["move", x, y] => Ok(Command::Move(coord(*x, *y)?)),
            ["upgrade", x, y] => Ok(Command::Upgrade(coord(*x, *y)?)),
            ["build", "mine"] => Ok(Command::Build(BuildingKind::GoldMine)),
            ["build", "forge"] => Ok(Command::Build(BuildingKind::Forge)),
            ["buy", weapon] => weapon
                .parse()
                .map(Command::BuyWeapon)
                .map_err(|e: ParseWeaponError| err(&e.to_string())),
            ["toggle", id] => id
                .trim_start_matches('#')
                .parse()
                .map(|n| Command::ToggleWeapon(WeaponInstanceId(n)))
                .map_err(|_| err("bad weapon id")),
            ["end"] => Ok(Command::EndTurn),
            ["grant", target, resource, amount] => {
                let target = target
                    .parse()
                    .map_err(|e: ParsePlayerError| err(&e.to_string()))?;
                let resource = match *resource {
                    "power" => Resource::Power,
                    "gold" => Resource::Gold,
                    "coins" => Resource::Coins,
                    _ => return Err(err("resource must be power, gold or coins")),
                };
                let amount = amount.parse().map_err(|_| err("bad amount"))?;
                Ok(Command::Grant {
                    target,
                    resource,
                    amount,
                })
            }
            _ => Err(err("unknown command")),
        }
    }
}

/// Host-facing result of [`Match::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Whether the command was accepted.
    pub accepted: bool,
    /// Whether the active player changed.
    pub turn_advanced: bool,
    /// Log line on acceptance, or the rejection reason.
    pub message: String,
}

impl From<&Result<Outcome, Rejection>> for Report {
    fn from(result: &Result<Outcome, Rejection>) -> Self {
        match result {
            Ok(outcome) => Self {
                accepted: true,
                turn_advanced: outcome.cost == TurnCost::AdvancesTurn,
                message: outcome.message.clone(),
            },
            Err(rejection) => Self {
                accepted: false,
                turn_advanced: false,
                message: rejection.to_string(),
            },
        }
    }
}

/// A match: state plus the dice that drive it.
#[derive(Debug, Clone)]
pub struct Match<D: Dice = SeededDice> {
    state: GameState,
    dice: D,
    config: MatchConfig,
}

impl Match<SeededDice> {
    /// Create an unstarted match with default seats, seeded from the config
    /// (or from entropy when it has no seed).
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let dice = config.seed.map_or_else(SeededDice::from_entropy, SeededDice::new);
        Self::with_dice(config, dice)
    }
}

impl<D: Dice> Match<D> {
    /// Create an unstarted match with the given dice.
    #[must_use]
    pub fn with_dice(config: MatchConfig, dice: D) -> Self {
        let state = GameState::new(
            MatchSetup::default_for(PlayerId::One),
            MatchSetup::default_for(PlayerId::Two),
            config.log_capacity,
        );
        Self {
            state,
            dice,
            config,
        }
    }

    /// Wrap an existing state, e.g. one loaded from JSON.
    #[must_use]
    pub const fn resume(state: GameState, config: MatchConfig, dice: D) -> Self {
        Self {
            state,
            dice,
            config,
        }
    }

    /// Name the seats, seed the monsters and hand player 1 the first turn.
    ///
    /// # Errors
    ///
    /// [`Rejection::AlreadyStarted`] unless the match is still unstarted.
    pub fn start(&mut self, p1: MatchSetup, p2: MatchSetup) -> Result<(), Rejection> {
        if self.state.phase != Phase::NotStarted {
            return Err(Rejection::AlreadyStarted);
        }
        self.begin(p1, p2);
        Ok(())
    }

    fn begin(&mut self, p1: MatchSetup, p2: MatchSetup) {
        for (id, setup) in [(PlayerId::One, p1), (PlayerId::Two, p2)] {
            let player = self.state.player_mut(id);
            player.name = setup.name;
            player.color = setup.color;
        }
        let spawned = seed_monsters(
            &mut self.state.board,
            &mut self.dice,
            self.config.initial_monsters,
            self.config.spawn_attempts,
        );

        self.state.phase = Phase::InProgress;
        self.state.active = PlayerId::One;
        let line = format!(
            "Game started! {} goes first.",
            self.state.player(PlayerId::One).name
        );
        tracing::info!(
            p1 = %self.state.player(PlayerId::One).name,
            p2 = %self.state.player(PlayerId::Two).name,
            monsters = spawned,
            "match started"
        );
        self.state.log.push(line);
        assert_invariants(&self.state);
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the match, keeping its state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Configuration the match was created with.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Move or attack one step.
    ///
    /// # Errors
    ///
    /// Gate failures, or the target is not adjacent or off the board.
    pub fn move_token(&mut self, player: PlayerId, target: Coord) -> Result<Outcome, Rejection> {
        self.run(player, |state, dice| attempt_move(state, dice, player, target))
    }

    /// Build a mine or forge next to the player's tower.
    ///
    /// # Errors
    ///
    /// Gate failures, ownership limits, gold, or no free placement tile.
    pub fn build(&mut self, player: PlayerId, kind: BuildingKind) -> Result<Outcome, Rejection> {
        self.run(player, |state, _| build(state, player, kind))
    }

    /// Upgrade the tower or a building at `at`.
    ///
    /// # Errors
    ///
    /// Gate failures, wrong target, max level, or not enough coins.
    pub fn upgrade(&mut self, player: PlayerId, at: Coord) -> Result<Outcome, Rejection> {
        self.run(player, |state, _| upgrade(state, player, at))
    }

    /// Buy a catalog weapon.
    ///
    /// # Errors
    ///
    /// Gate failures, forge tier, duplicate ownership, or gold.
    pub fn buy_weapon(&mut self, player: PlayerId, weapon: WeaponId) -> Result<Outcome, Rejection> {
        self.run(player, |state, _| buy_weapon(state, player, weapon))
    }

    /// Equip or unequip an owned weapon. Free.
    ///
    /// # Errors
    ///
    /// Gate failures, unknown instance, or all slots full.
    pub fn toggle_weapon(
        &mut self,
        player: PlayerId,
        weapon: WeaponInstanceId,
    ) -> Result<Outcome, Rejection> {
        self.run(player, |state, _| toggle_weapon(state, player, weapon))
    }

    /// Collect mine income and pass the turn.
    ///
    /// # Errors
    ///
    /// Gate failures only.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<Outcome, Rejection> {
        self.run(player, |state, _| economy::end_turn(state, player))
    }

    /// Admin grant. Free, and not tied to the active player.
    ///
    /// # Errors
    ///
    /// [`Rejection::NotStarted`] or [`Rejection::MatchOver`].
    pub fn grant(
        &mut self,
        target: PlayerId,
        resource: Resource,
        amount: i64,
    ) -> Result<Outcome, Rejection> {
        self.check_phase()?;
        let result = economy::grant(&mut self.state, target, resource, amount);
        self.settle(target, result)
    }

    /// Dispatch a command on behalf of `player` and summarize the result.
    pub fn apply(&mut self, player: PlayerId, command: Command) -> Report {
        let result = match command {
            Command::Move(target) => self.move_token(player, target),
            Command::Build(kind) => self.build(player, kind),
            Command::Upgrade(at) => self.upgrade(player, at),
            Command::BuyWeapon(weapon) => self.buy_weapon(player, weapon),
            Command::ToggleWeapon(weapon) => self.toggle_weapon(player, weapon),
            Command::EndTurn => self.end_turn(player),
            Command::Grant {
                target,
                resource,
                amount,
            } => self.grant(target, resource, amount),
        };
        Report::from(&result)
    }

    fn check_phase(&self) -> Result<(), Rejection> {
        match self.state.phase {
            Phase::NotStarted => Err(Rejection::NotStarted),
            Phase::Won(_) => Err(Rejection::MatchOver),
            Phase::InProgress => Ok(()),
        }
    }

    fn run(
        &mut self,
        player: PlayerId,
        op: impl FnOnce(&mut GameState, &mut D) -> Result<Outcome, Rejection>,
    ) -> Result<Outcome, Rejection> {
        self.check_phase()?;
        if player != self.state.active {
            return self.settle(player, Err(Rejection::NotYourTurn(player)));
        }
        let result = op(&mut self.state, &mut self.dice);
        self.settle(player, result)
    }

    fn settle(
        &mut self,
        player: PlayerId,
        result: Result<Outcome, Rejection>,
    ) -> Result<Outcome, Rejection> {
        match &result {
            Ok(outcome) => {
                self.state.log.push(outcome.message.clone());
                if outcome.cost == TurnCost::AdvancesTurn {
                    self.state.advance_turn();
                }
                tracing::debug!(%player, event = ?outcome.event, "command accepted");
                if let Some(winner) = self.state.winner() {
                    tracing::info!(%winner, "tower destroyed, match over");
                }
                assert_invariants(&self.state);
            }
            Err(rejection) => {
                if rejection.is_logged() {
                    self.state.log.push(rejection.to_string());
                }
                tracing::debug!(%player, %rejection, "command rejected");
            }
        }
        result
    }
}

/// Create and start a match in one step.
#[must_use]
pub fn start_match(p1: MatchSetup, p2: MatchSetup, config: MatchConfig) -> Match {
    let mut game = Match::new(config);
    game.begin(p1, p2);
    game
}

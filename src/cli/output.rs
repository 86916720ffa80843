//! Output formatting utilities for CLI.

use serde::Serialize;
use tower_siege::game::{Cell, MonsterKind};
use tower_siege::{Coord, GameState, Phase, PlayerId, Report, Tile};

/// Board glyph for a cell, ignoring player tokens.
fn cell_glyph(cell: &Cell) -> char {
    if let Some(monster) = &cell.monster {
        return match monster.kind {
            MonsterKind::Zombie => 'z',
            MonsterKind::Skeleton => 's',
            MonsterKind::Orc => 'o',
            MonsterKind::Dragon => 'D',
        };
    }
    match cell.tile {
        Tile::Empty => '.',
        Tile::Tower { .. } => 'T',
        Tile::Mine { .. } => 'M',
        Tile::Forge { .. } => 'F',
    }
}

/// Render the board as a character grid. Player tokens are `1` and `2`.
pub(super) fn format_board(state: &GameState) -> String {
    let board = &state.board;
    let mut output = String::new();
    for y in 0..board.height() {
        for x in 0..board.width() {
            let coord = Coord::new(x, y);
            let glyph = match state.player_at(coord) {
                Some(PlayerId::One) => '1',
                Some(PlayerId::Two) => '2',
                None => board.get(coord).map_or(' ', cell_glyph),
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}

/// Format a match as human-readable text.
pub(super) fn format_state_text(state: &GameState) -> String {
    let mut output = String::new();

    let status = match state.phase {
        Phase::NotStarted => "not started".to_string(),
        Phase::InProgress => format!("{} to move", state.active_player().name),
        Phase::Won(winner) => format!("won by {}", state.player(winner).name),
    };
    output.push_str(&format!("Match ({status})\n\n"));
    output.push_str(&format_board(state));
    output.push('\n');

    for player in &state.players {
        output.push_str(&format!(
            "  {} [{}] at {}: power {} (base {}), gold {}, coins {}, tower L{} {}hp\n",
            player.name,
            player.id,
            player.pos,
            player.total_power(),
            player.stats.power,
            player.stats.gold,
            player.stats.upgrade_coins,
            player.tower_level,
            player.tower_health,
        ));
        for weapon in &player.inventory {
            let mark = if player.is_equipped(weapon.instance) { '*' } else { ' ' };
            output.push_str(&format!(
                "    {mark} {} {} (+{})\n",
                weapon.instance,
                weapon.kind,
                weapon.kind.spec().power
            ));
        }
    }

    output.push_str("\nLog:\n");
    for line in state.log.iter() {
        output.push_str(&format!("  {line}\n"));
    }

    output
}

/// Format one script step as a text line.
pub(super) fn format_report(line_no: usize, player: PlayerId, command: &str, report: &Report) -> String {
    let verdict = match (report.accepted, report.turn_advanced) {
        (true, true) => "ok",
        (true, false) => "ok (free)",
        (false, _) => "rejected",
    };
    format!("{line_no:>3} {player}: {command} -> {verdict}: {}", report.message)
}

/// JSON-serializable script step.
#[derive(Debug, Serialize)]
pub(super) struct JsonStep {
    /// Script line number (1-based).
    pub(super) line: usize,
    /// Player who issued the command.
    pub(super) player: PlayerId,
    /// Command text.
    pub(super) command: String,
    /// Engine report.
    pub(super) report: Report,
}

/// JSON-serializable result of a script run.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayResult<'a> {
    /// Every step in order.
    pub(super) steps: Vec<JsonStep>,
    /// Final state.
    pub(super) state: &'a GameState,
}

/// Aggregated duel simulation results.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct OddsStats {
    /// Duels simulated.
    pub(super) trials: u64,
    /// Duels the attacker won.
    pub(super) attacker_wins: u64,
}

impl OddsStats {
    /// Merge another set of stats into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.trials += other.trials;
        self.attacker_wins += other.attacker_wins;
    }

    /// Observed attacker win rate.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.attacker_wins as f64 / self.trials as f64
        }
    }
}

/// Format duel odds as human-readable text.
pub(super) fn format_odds_text(attacker: u32, defender: u32, expected: f64, stats: &OddsStats) -> String {
    let observed = stats.win_rate();
    let mut output = String::new();
    output.push_str(&format!("Duel Odds: attacker {attacker} vs defender {defender}\n"));
    output.push_str("========================================\n");
    output.push_str(&format!("  Trials:   {}\n", stats.trials));
    output.push_str(&format!("  Expected: {expected:.4}\n"));
    output.push_str(&format!("  Observed: {observed:.4}\n"));
    output.push_str(&format!("  Error:    {:+.4}\n", observed - expected));
    output
}

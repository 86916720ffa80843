//! Script playback command implementation.

use super::output::{format_report, format_state_text, JsonPlayResult, JsonStep};
use super::{load_config, CliError, OutputFormat};
use std::fs;
use std::path::Path;
use tower_siege::{start_match, Command, MatchSetup, PlayerId};

/// Execute the play command.
///
/// Blank lines and lines starting with `#` are skipped. Each command is
/// issued by whoever is active at that point.
///
/// # Errors
///
/// Returns an error if the script cannot be read or a line does not parse.
pub(crate) fn execute(
    config: Option<&Path>,
    script: &Path,
    seed: Option<u64>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config, seed)?;
    let text = fs::read_to_string(script)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", script.display())))?;

    let mut commands = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = line
            .parse()
            .map_err(|e| CliError::new(format!("{}:{}: {e}", script.display(), idx + 1)))?;
        commands.push((idx + 1, line.to_string(), command));
    }

    let mut game = start_match(
        MatchSetup::default_for(PlayerId::One),
        MatchSetup::default_for(PlayerId::Two),
        config,
    );

    let mut steps = Vec::with_capacity(commands.len());
    for (line, text, command) in commands {
        let player = game.state().active;
        let report = game.apply(player, command);
        tracing::debug!(line, %player, accepted = report.accepted, "script step");
        steps.push(JsonStep {
            line,
            player,
            command: text,
            report,
        });
    }

    match format {
        OutputFormat::Text => {
            if !quiet {
                for step in &steps {
                    println!(
                        "{}",
                        format_report(step.line, step.player, &step.command, &step.report)
                    );
                }
                println!();
            }
            print!("{}", format_state_text(game.state()));
        }
        OutputFormat::Json => {
            let result = JsonPlayResult {
                steps: if quiet { Vec::new() } else { steps },
                state: game.state(),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

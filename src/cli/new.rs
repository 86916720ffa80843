//! New-match command implementation.

use super::output::format_state_text;
use super::{load_config, CliError, OutputFormat};
use std::path::Path;
use tower_siege::{start_match, MatchSetup, PlayerId};

/// Execute the new command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or output fails.
pub(crate) fn execute(
    config: Option<&Path>,
    seed: Option<u64>,
    p1: String,
    p2: String,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config, seed)?;

    let setup = |id: PlayerId, name: String| MatchSetup {
        name,
        ..MatchSetup::default_for(id)
    };
    let game = start_match(setup(PlayerId::One, p1), setup(PlayerId::Two, p2), config);

    match format {
        OutputFormat::Text => print!("{}", format_state_text(game.state())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(game.state())?),
    }

    Ok(())
}

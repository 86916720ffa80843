//! Duel odds simulation command implementation.

use super::output::{format_odds_text, OddsStats};
use super::CliError;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;
use tower_siege::game::{duel, win_probability, DuelOutcome, SeededDice};

/// Duels simulated per work item.
const CHUNK: u64 = 10_000;

/// Execute the odds command.
///
/// # Errors
///
/// Returns an error if the progress bar template is invalid.
pub(crate) fn execute(
    attacker: u32,
    defender: u32,
    trials: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(42)
    });

    let chunks = trials.div_ceil(CHUNK);
    let pb = if progress {
        let pb = ProgressBar::new(chunks);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each chunk gets its own dice so the result does not depend on scheduling
    let stats = (0..chunks)
        .into_par_iter()
        .fold(OddsStats::default, |mut local, chunk| {
            let mut dice = SeededDice::new(base_seed.wrapping_add(chunk));
            let n = CHUNK.min(trials - chunk * CHUNK);
            for _ in 0..n {
                if duel(&mut dice, attacker, defender) == DuelOutcome::AttackerWon {
                    local.attacker_wins += 1;
                }
            }
            local.trials += n;
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(OddsStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let expected = win_probability(attacker, defender);
    print!("{}", format_odds_text(attacker, defender, expected, &stats));
    println!("  Duration: {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

//! Search command implementation.

use super::output::{JsonSearchResult, format_search_text, format_trial};
use super::{CliError, OutputFormat, load_scenario};
use indicatif::{ProgressBar, ProgressStyle};
use skirmish::BattleConfig;
use skirmish::search::{SearchConfig, find_minimal_power_with};
use std::path::Path;
use std::time::Instant;

/// Execute the search command.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded, the range is invalid, or no
/// candidate power wins without losses.
pub(crate) fn execute(
    map: &Path,
    search: &SearchConfig,
    threads: Option<usize>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let scenario = load_scenario(map)?;
    search.validate()?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let candidates = u64::from((search.max_power - search.min_power).unsigned_abs()) + 1;
    let pb = if progress {
        let pb = ProgressBar::new(candidates);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} powers {msg}")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut trials = Vec::new();
    let answer = find_minimal_power_with(&scenario, &BattleConfig::default(), search, |trial| {
        if let Some(pb) = &pb {
            pb.inc(1);
            pb.set_message(format!("(last: {} won)", trial.result.winner));
        }
        trials.push(*trial);
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let answer = answer?;
    let duration = start.elapsed();

    match format {
        OutputFormat::Text => {
            for trial in &trials {
                println!("{}", format_trial(search.faction, trial));
            }
            println!();
            print!("{}", format_search_text(search.faction, &answer));
            println!();
            println!("Duration: {:.2}s ({} trials)", duration.as_secs_f64(), trials.len());
        }
        OutputFormat::Json => {
            let json_result = JsonSearchResult::from_trials(
                &map.display().to_string(),
                search.faction,
                &answer,
                trials,
            );
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
    }

    Ok(())
}

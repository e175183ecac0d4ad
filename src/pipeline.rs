use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::game_log::{assemble_games, AssemblyStats, FilterStats, MatchFilter, RecordClassifier};
use crate::sets::{check_reconcile_order, load_set_results, reconcile_sets, LoadStats, SetResult};
use crate::settings::PipelineSettings;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub assembly_stats: AssemblyStats,
    pub filter_stats: FilterStats,
    pub load_stats: LoadStats,
    pub unclaimed_games: usize,
    pub sets: Vec<SetResult>,
}

impl PipelineOutcome {
    pub fn incomplete_sets(&self) -> usize {
        self.sets.iter().filter(|set| !set.is_complete()).count()
    }
}

/// Log and results table in, reconciled sets out.
pub fn run_pipeline(
    log_bytes: impl AsRef<[u8]>,
    results_bytes: impl AsRef<[u8]>,
    settings: &PipelineSettings,
) -> PipelineOutcome {
    let classifier = RecordClassifier::from_settings(settings);
    let assembly = assemble_games(log_bytes, &classifier, settings.starting_stocks);
    let filtered = MatchFilter::from_settings(settings).apply(assembly.games);
    let load = load_set_results(results_bytes, settings);

    if let Err(violation) = check_reconcile_order(&filtered.games, &load.sets) {
        tracing::warn!(
            order_violation = %violation,
            "Games and sets are not in matching chronological order, attribution may be wrong"
        );
    }

    let reconciliation = reconcile_sets(filtered.games, load.sets);

    PipelineOutcome {
        assembly_stats: assembly.stats,
        filter_stats: filtered.stats,
        load_stats: load.stats,
        unclaimed_games: reconciliation.unclaimed_games,
        sets: reconciliation.sets,
    }
}

/// Reads both inputs in full before processing. Failing to read either is fatal;
/// undecodable lines inside them are not.
pub fn run_from_paths(
    log_path: &Path,
    results_path: &Path,
    settings: &PipelineSettings,
) -> Result<PipelineOutcome, PipelineError> {
    let log_bytes = read_input(log_path)?;
    let results_bytes = read_input(results_path)?;

    Ok(run_pipeline(&log_bytes, &results_bytes, settings))
}

fn read_input(path: &Path) -> Result<Vec<u8>, PipelineError> {
    std::fs::read(path).map_err(|source| PipelineError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

pub fn outcome_to_json(outcome: &PipelineOutcome) -> Result<String, PipelineError> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Writes the outcome as JSON through a temporary file in the same directory.
pub fn write_outcome(output_path: &Path, outcome: &PipelineOutcome) -> Result<(), PipelineError> {
    if let Some(parent_directory) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent_directory).map_err(|source| {
            PipelineError::WriteOutput {
                path: parent_directory.to_path_buf(),
                source,
            }
        })?;
    }

    let serialized = outcome_to_json(outcome)?;
    let temp_path = temporary_output_path(output_path);
    std::fs::write(&temp_path, serialized).map_err(|source| PipelineError::WriteOutput {
        path: temp_path.clone(),
        source,
    })?;

    if let Err(source) = std::fs::rename(&temp_path, output_path) {
        if let Err(cleanup_error) = std::fs::remove_file(&temp_path) {
            tracing::warn!(
                temp_path = %temp_path.display(),
                cleanup_error = %cleanup_error,
                "Failed to remove temporary output file"
            );
        }

        return Err(PipelineError::WriteOutput {
            path: output_path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

fn temporary_output_path(output_path: &Path) -> PathBuf {
    let Some(file_name) = output_path.file_name().and_then(|value| value.to_str()) else {
        return output_path.with_extension("json.tmp");
    };

    output_path.with_file_name(format!("{file_name}.tmp"))
}

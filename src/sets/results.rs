use chrono::{DateTime, FixedOffset};
use csv::StringRecord;
use serde::Serialize;

use super::model::SetResult;
use crate::error::RowError;
use crate::settings::PipelineSettings;

const SET_RESULT_FIELD_COUNT: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    pub total_rows: u64,
    pub loaded_sets: u64,
    pub skipped_rows: u64,
}

#[derive(Debug, Clone)]
pub struct SetResultLoad {
    pub sets: Vec<SetResult>,
    pub stats: LoadStats,
}

/// Parses the tab separated set results table, oldest set first.
///
/// Columns: unused, section id, round id, player one, player two, start time,
/// end time, winner. Bad rows are skipped with a warning.
/// Rows are decoded one at a time, so a row that is not valid UTF-8 is skipped
/// like any other bad row.
pub fn load_set_results(table_bytes: impl AsRef<[u8]>, settings: &PipelineSettings) -> SetResultLoad {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(table_bytes.as_ref());

    let mut sets = Vec::new();
    let mut stats = LoadStats::default();

    for (row_index, record_result) in reader.byte_records().enumerate() {
        let row_number = row_index as u64 + 1;
        let record = match record_result
            .map_err(RowError::from)
            .and_then(|byte_record| StringRecord::from_byte_record(byte_record).map_err(RowError::from))
        {
            Ok(record) => record,
            Err(error) => {
                stats.total_rows += 1;
                stats.skipped_rows += 1;
                tracing::warn!(row_number, row_error = %error, "Skipping set result row");
                continue;
            }
        };

        if is_blank_record(&record) {
            continue;
        }

        stats.total_rows += 1;
        match parse_set_row(&record, settings) {
            Ok(set) => {
                stats.loaded_sets += 1;
                sets.push(set);
            }
            Err(error) => {
                stats.skipped_rows += 1;
                tracing::warn!(
                    row_number = record
                        .position()
                        .map(|position| position.line())
                        .unwrap_or(row_number),
                    row_error = %error,
                    "Skipping set result row"
                );
            }
        }
    }

    tracing::info!(
        loaded_sets = stats.loaded_sets,
        skipped_rows = stats.skipped_rows,
        "Loaded set results"
    );

    SetResultLoad { sets, stats }
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

pub fn parse_set_row(
    record: &StringRecord,
    settings: &PipelineSettings,
) -> Result<SetResult, RowError> {
    if record.len() != SET_RESULT_FIELD_COUNT {
        return Err(RowError::FieldCount {
            expected: SET_RESULT_FIELD_COUNT,
            found: record.len(),
        });
    }

    let section_id = parse_id_field(&record[1], "section id")?;
    let round_id = parse_id_field(&record[2], "round id")?;
    let started_at = parse_time_field(&record[5], "start time")?;
    let ended_at = parse_time_field(&record[6], "end time")?;

    Ok(SetResult {
        section_id,
        round_id,
        player_one_name: record[3].trim().to_string(),
        player_two_name: record[4].trim().to_string(),
        started_at,
        ended_at,
        winner_name: record[7].trim().to_string(),
        wins_required: settings.required_wins(section_id),
        winner_side: None,
        games: Vec::new(),
    })
}

fn parse_id_field(value: &str, field: &'static str) -> Result<i64, RowError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| RowError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn parse_time_field(value: &str, field: &'static str) -> Result<DateTime<FixedOffset>, RowError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|source| RowError::InvalidTimestamp {
        field,
        value: value.to_string(),
        source,
    })
}

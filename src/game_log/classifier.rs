use chrono::{DateTime, FixedOffset};

use super::model::{MatchParameters, MatchSummary};
use crate::error::LineError;
use crate::settings::{PipelineSettings, DEFAULT_HELLO_THRESHOLD, DEFAULT_PARAMETERS_THRESHOLD};

const LOG_FIELD_DELIMITER: char = '|';
const MONOTONIC_CLOCK_MARKER: &str = " m=";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Hello,
    Parameters,
    Summary,
}

/// Decides which message shape a JSON payload carries.
pub trait PayloadClassifier {
    fn classify(&self, payload: &str) -> PayloadKind;
}

/// Classifies payloads by byte length. Parameters payloads have a small
/// fixed shape while summaries grow with every lost stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthThresholdClassifier {
    hello_threshold: usize,
    parameters_threshold: usize,
}

impl LengthThresholdClassifier {
    pub fn new(hello_threshold: usize, parameters_threshold: usize) -> Self {
        Self {
            hello_threshold,
            parameters_threshold,
        }
    }
}

impl Default for LengthThresholdClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_HELLO_THRESHOLD, DEFAULT_PARAMETERS_THRESHOLD)
    }
}

impl PayloadClassifier for LengthThresholdClassifier {
    fn classify(&self, payload: &str) -> PayloadKind {
        let length = payload.len();
        if length < self.hello_threshold {
            PayloadKind::Hello
        } else if length < self.parameters_threshold {
            PayloadKind::Parameters
        } else {
            PayloadKind::Summary
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Hello,
    Parameters(MatchParameters),
    Summary(MatchSummary),
}

#[derive(Debug, Clone)]
pub struct RecordClassifier<C = LengthThresholdClassifier> {
    payload_classifier: C,
    timestamp_format: String,
}

impl RecordClassifier<LengthThresholdClassifier> {
    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::with_payload_classifier(
            LengthThresholdClassifier::new(
                settings.hello_threshold,
                settings.parameters_threshold,
            ),
            &settings.log_timestamp_format,
        )
    }
}

impl<C: PayloadClassifier> RecordClassifier<C> {
    pub fn with_payload_classifier(payload_classifier: C, timestamp_format: &str) -> Self {
        Self {
            payload_classifier,
            timestamp_format: timestamp_format.to_string(),
        }
    }

    /// Parses one `<timestamp>|<json>` line. Blank lines yield `Ok(None)`.
    pub fn classify_line(&self, line: &str) -> Result<Option<LogRecord>, LineError> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let (raw_timestamp, payload) = split_log_line(line)?;
        let timestamp = parse_log_timestamp(raw_timestamp, &self.timestamp_format)?;

        let record = match self.payload_classifier.classify(payload) {
            PayloadKind::Hello => LogRecord::Hello,
            PayloadKind::Parameters => {
                let mut parameters = serde_json::from_str::<MatchParameters>(payload).map_err(
                    |source| LineError::InvalidPayload {
                        kind: PayloadKind::Parameters,
                        source,
                    },
                )?;
                parameters.timestamp = timestamp;
                LogRecord::Parameters(parameters)
            }
            PayloadKind::Summary => {
                let mut summary = serde_json::from_str::<MatchSummary>(payload).map_err(
                    |source| LineError::InvalidPayload {
                        kind: PayloadKind::Summary,
                        source,
                    },
                )?;
                summary.timestamp = timestamp;
                LogRecord::Summary(summary)
            }
        };

        Ok(Some(record))
    }
}

fn split_log_line(line: &str) -> Result<(&str, &str), LineError> {
    let (raw_timestamp, payload) = line
        .split_once(LOG_FIELD_DELIMITER)
        .ok_or(LineError::MissingDelimiter)?;

    Ok((raw_timestamp.trim(), payload))
}

/// Parses a log timestamp, dropping a trailing monotonic clock reading
/// (`... -0700 MST m=+12.345`) when present.
pub fn parse_log_timestamp(
    value: &str,
    format: &str,
) -> Result<DateTime<FixedOffset>, LineError> {
    let wall_clock = value
        .split_once(MONOTONIC_CLOCK_MARKER)
        .map(|(wall_clock, _)| wall_clock)
        .unwrap_or(value)
        .trim();

    DateTime::parse_from_str(wall_clock, format).map_err(|source| LineError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

use std::path::PathBuf;

use thiserror::Error;

use crate::game_log::PayloadKind;

/// Reasons a single log line is skipped.
#[derive(Error, Debug)]
pub enum LineError {
    #[error("line is not valid UTF-8: {source}")]
    InvalidEncoding {
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("line has no '|' separating timestamp and payload")]
    MissingDelimiter,

    #[error("invalid log timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to deserialize {kind:?} payload: {source}")]
    InvalidPayload {
        kind: PayloadKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a single set result row is skipped.
#[derive(Error, Debug)]
pub enum RowError {
    #[error("expected {expected} tab separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid {field} '{value}': {source}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("row is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] csv::FromUtf8Error),

    #[error("unreadable row: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fatal conditions for a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read input '{path}': {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize reconciled sets: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write output '{path}': {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A broken ordering precondition of the set reconciler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderViolation {
    #[error("game {index} finished before the game preceding it")]
    GamesOutOfOrder { index: usize },

    #[error("set {index} starts before the set preceding it")]
    SetsOutOfOrder { index: usize },
}

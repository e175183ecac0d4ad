use serde::Serialize;

use super::classifier::{LogRecord, PayloadClassifier, RecordClassifier};
use super::model::{Game, MatchParameters, MatchSummary};
use crate::error::LineError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyStats {
    pub total_lines: u64,
    pub hello_messages: u64,
    pub invalid_encodings: u64,
    pub malformed_lines: u64,
    pub invalid_timestamps: u64,
    pub invalid_payloads: u64,
    pub orphaned_summaries: u64,
    pub overwritten_parameters: u64,
    pub unfinished_parameters: u64,
    pub completed_games: u64,
}

#[derive(Debug, Clone)]
pub struct Assembly {
    pub games: Vec<Game>,
    pub stats: AssemblyStats,
}

/// Pairs each parameters record with the summary that follows it.
#[derive(Debug, Default)]
pub struct GameAssembler {
    pending_parameters: Option<MatchParameters>,
    games: Vec<Game>,
    stats: AssemblyStats,
    starting_stocks: u8,
}

impl GameAssembler {
    pub fn new(starting_stocks: u8) -> Self {
        Self {
            starting_stocks,
            ..Self::default()
        }
    }

    pub fn consume_line<C: PayloadClassifier>(
        &mut self,
        classifier: &RecordClassifier<C>,
        line: &str,
    ) {
        self.stats.total_lines += 1;
        let line_number = self.stats.total_lines;

        match classifier.classify_line(line) {
            Ok(Some(record)) => self.push_record(record, line_number),
            Ok(None) => {}
            Err(error) => self.record_line_error(&error, line_number),
        }
    }

    /// Decodes one raw log line before classifying it.
    pub fn consume_raw_line<C: PayloadClassifier>(
        &mut self,
        classifier: &RecordClassifier<C>,
        raw_line: &[u8],
    ) {
        match std::str::from_utf8(raw_line) {
            Ok(line) => self.consume_line(classifier, line),
            Err(source) => {
                self.stats.total_lines += 1;
                let line_number = self.stats.total_lines;
                self.record_line_error(&LineError::InvalidEncoding { source }, line_number);
            }
        }
    }

    pub fn push_record(&mut self, record: LogRecord, line_number: u64) {
        match record {
            LogRecord::Hello => self.stats.hello_messages += 1,
            LogRecord::Parameters(parameters) => self.start_game(parameters, line_number),
            LogRecord::Summary(summary) => self.finish_game(summary, line_number),
        }
    }

    fn start_game(&mut self, parameters: MatchParameters, line_number: u64) {
        if let Some(discarded) = self.pending_parameters.replace(parameters) {
            self.stats.overwritten_parameters += 1;
            tracing::warn!(
                line_number,
                discarded_timestamp = %discarded.timestamp,
                "Game parameters arrived before the previous game finished, discarding previous game"
            );
        }
    }

    fn finish_game(&mut self, summary: MatchSummary, line_number: u64) {
        let Some(parameters) = self.pending_parameters.take() else {
            self.stats.orphaned_summaries += 1;
            tracing::warn!(
                line_number,
                summary_timestamp = %summary.timestamp,
                "Game summary without preceding parameters, discarding"
            );
            return;
        };

        if summary.frames_missed > 0 {
            tracing::debug!(
                line_number,
                frames_missed = summary.frames_missed,
                "Game summary reports missed frames"
            );
        }

        let game = Game::new(parameters, summary);
        if !game.has_consistent_stock_counts(self.starting_stocks) {
            tracing::debug!(
                line_number,
                starting_stocks = self.starting_stocks,
                "Lost stock entries do not match remaining stocks"
            );
        }

        self.stats.completed_games += 1;
        self.games.push(game);
    }

    fn record_line_error(&mut self, error: &LineError, line_number: u64) {
        match error {
            LineError::InvalidEncoding { .. } => self.stats.invalid_encodings += 1,
            LineError::MissingDelimiter => self.stats.malformed_lines += 1,
            LineError::InvalidTimestamp { .. } => self.stats.invalid_timestamps += 1,
            LineError::InvalidPayload { .. } => self.stats.invalid_payloads += 1,
        }

        tracing::warn!(line_number, line_error = %error, "Skipping log line");
    }

    pub fn finish(mut self) -> Assembly {
        if self.pending_parameters.take().is_some() {
            self.stats.unfinished_parameters += 1;
        }

        Assembly {
            games: self.games,
            stats: self.stats,
        }
    }
}

/// Runs every line of a complete log through the classifier and assembler.
/// Lines are decoded one at a time so a corrupt line only loses itself.
pub fn assemble_games<C: PayloadClassifier>(
    log_bytes: impl AsRef<[u8]>,
    classifier: &RecordClassifier<C>,
    starting_stocks: u8,
) -> Assembly {
    let mut assembler = GameAssembler::new(starting_stocks);
    for raw_line in raw_log_lines(log_bytes.as_ref()) {
        assembler.consume_raw_line(classifier, raw_line);
    }

    let assembly = assembler.finish();
    tracing::info!(
        total_lines = assembly.stats.total_lines,
        completed_games = assembly.stats.completed_games,
        orphaned_summaries = assembly.stats.orphaned_summaries,
        overwritten_parameters = assembly.stats.overwritten_parameters,
        "Assembled games from log"
    );
    assembly
}

/// Splits on `\n`, dropping a trailing `\r`, with the same line count as
/// `str::lines`.
fn raw_log_lines(log_bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = log_bytes.strip_suffix(b"\n").unwrap_or(log_bytes);
    let mut raw_lines = body.split(|byte| *byte == b'\n');
    if log_bytes.is_empty() {
        raw_lines.next();
    }

    raw_lines.map(|raw_line| raw_line.strip_suffix(b"\r").unwrap_or(raw_line))
}

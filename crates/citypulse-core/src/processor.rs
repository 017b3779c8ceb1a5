//! Line-by-line NDJSON ingestion.
//!
//! The processor parses one line at a time, extracts a [`Record`] and folds it
//! into an [`AggregationStore`]. A line that fails to parse or extract is
//! counted as invalid and logged; it never stops the run and never touches
//! the store. Empty lines are skipped without being counted; a line holding
//! only whitespace is not empty and counts as invalid.

use std::io::BufRead;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::LineError;
use crate::extract::Record;
use crate::store::AggregationStore;

/// Number of characters of a rejected line echoed into the log.
const PREVIEW_CHARS: usize = 50;

/// Valid and invalid line counts of one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub valid: u64,
    pub invalid: u64,
}

impl ParseSummary {
    /// Number of non-empty lines seen.
    pub const fn total(&self) -> u64 {
        self.valid + self.invalid
    }
}

/// What happened to a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Empty,
    Accepted,
    Rejected,
}

/// Drives ingestion into a borrowed store.
#[derive(Debug)]
pub struct LineProcessor<'s> {
    store: &'s mut AggregationStore,
    summary: ParseSummary,
    line_number: u64,
}

impl<'s> LineProcessor<'s> {
    pub fn new(store: &'s mut AggregationStore) -> Self {
        Self {
            store,
            summary: ParseSummary::default(),
            line_number: 0,
        }
    }

    pub const fn summary(&self) -> ParseSummary {
        self.summary
    }

    /// Processes one line, without its terminator.
    pub fn process_line(&mut self, line: &str) -> LineOutcome {
        self.line_number += 1;

        if line.is_empty() {
            debug!(line = self.line_number, "skipping empty line");
            return LineOutcome::Empty;
        }

        match fold_line(self.store, line) {
            Ok(()) => {
                self.summary.valid += 1;
                LineOutcome::Accepted
            }
            Err(error) => {
                self.summary.invalid += 1;
                warn!(
                    line = self.line_number,
                    preview = %preview(line),
                    %error,
                    "skipping line"
                );
                LineOutcome::Rejected
            }
        }
    }

    /// Processes every line of an in-memory body.
    pub fn process_str(mut self, input: &str) -> ParseSummary {
        for line in input.lines() {
            self.process_line(line);
        }
        self.finish()
    }

    /// Processes a reader line by line without holding the whole input.
    ///
    /// A line that is not valid UTF-8 counts as invalid. Only a read failure
    /// aborts the pass.
    pub fn process_reader<R: BufRead>(mut self, mut reader: R) -> std::io::Result<ParseSummary> {
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            let line = trim_terminator(&buffer);
            match std::str::from_utf8(line) {
                Ok(text) => {
                    self.process_line(text);
                }
                Err(error) => {
                    self.line_number += 1;
                    self.summary.invalid += 1;
                    warn!(line = self.line_number, %error, "skipping line that is not UTF-8");
                }
            }
        }
        Ok(self.finish())
    }

    /// Logs the final counts and returns them.
    pub fn finish(self) -> ParseSummary {
        info!(
            valid = self.summary.valid,
            invalid = self.summary.invalid,
            "ingestion finished"
        );
        self.summary
    }
}

/// Ingests an in-memory NDJSON body into `store`.
pub fn ingest_str(store: &mut AggregationStore, input: &str) -> ParseSummary {
    LineProcessor::new(store).process_str(input)
}

fn fold_line(store: &mut AggregationStore, line: &str) -> Result<(), LineError> {
    let json: Value = serde_json::from_str(line)?;
    let record = Record::extract(&json)?;
    store.apply_record(&record);
    Ok(())
}

fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn preview(line: &str) -> String {
    let mut preview: String = line.chars().take(PREVIEW_CHARS).collect();
    if preview.len() < line.len() {
        preview.push_str("...");
    }
    preview
}

//! Move record encoding and decoding.
//!
//! A record is six space-separated tokens:
//! `S <fromRow> <fromCol> <type> <toRow> <toCol>` where `type` is `M`
//! for an advance and `B` for a strike.

use crate::action::{Move, MoveKind};
use crate::types::Position;
use derive_more::{Display, Error};
use tracing::instrument;

/// Number of tokens in a move record.
const RECORD_TOKENS: usize = 6;

/// Malformed move record, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Malformed move record '{}': {} at {}:{}", record, message, file, line)]
pub struct RecordError {
    /// The offending record.
    pub record: String,
    /// What was wrong with it.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RecordError {
    /// Creates a new record error with caller location tracking.
    #[track_caller]
    pub fn new(record: impl Into<String>, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            record: record.into(),
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Encodes a move as a log record.
pub fn encode(mv: &Move) -> String {
    let from = mv.from();
    let target = mv.target();
    format!(
        "S {} {} {} {} {}",
        from.row(),
        from.col(),
        mv.kind(),
        target.row(),
        target.col()
    )
}

/// Decodes a log record into a move.
#[instrument]
pub fn decode(record: &str) -> Result<Move, RecordError> {
    let tokens: Vec<&str> = record.split(' ').collect();
    if tokens.len() != RECORD_TOKENS {
        return Err(RecordError::new(
            record,
            format!("expected {} tokens, got {}", RECORD_TOKENS, tokens.len()),
        ));
    }
    if tokens[0] != "S" {
        return Err(RecordError::new(record, "record must start with 'S'"));
    }

    let kind = match tokens[3] {
        "M" => MoveKind::Advance,
        "B" => MoveKind::Strike,
        other => {
            return Err(RecordError::new(
                record,
                format!("unknown move type '{}'", other),
            ));
        }
    };

    let from = parse_position(record, tokens[1], tokens[2])?;
    let target = parse_position(record, tokens[4], tokens[5])?;
    Ok(Move::new(kind, from, target))
}

fn parse_position(record: &str, row: &str, col: &str) -> Result<Position, RecordError> {
    let parse = |token: &str| match token.as_bytes() {
        [digit @ b'0'..=b'9'] => Ok(i32::from(*digit - b'0')),
        _ => Err(RecordError::new(
            record,
            format!("'{}' is not a single digit", token),
        )),
    };
    let (row, col) = (parse(row)?, parse(col)?);
    Position::new(row, col).map_err(|e| RecordError::new(record, e.to_string()))
}

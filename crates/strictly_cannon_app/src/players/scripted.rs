//! Bot that answers from a fixed list of records.

use super::{BotClient, BotError, BotErrorKind, BotRequest};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Returns its records in order, one per request, without looking at the board.
///
/// Useful for demos and for exercising the orchestrator with known
/// (or deliberately bad) answers.
#[derive(Debug)]
pub struct ScriptedBot {
    name: String,
    records: Mutex<VecDeque<String>>,
}

impl ScriptedBot {
    /// Creates a bot that will answer with `records`.
    pub fn new<I, S>(name: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            records: Mutex::new(records.into_iter().map(Into::into).collect()),
        }
    }

    /// Records not yet handed out.
    pub fn remaining(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl BotClient for ScriptedBot {
    async fn fetch_move(&self, _request: BotRequest) -> Result<String, BotError> {
        let next = self
            .records
            .lock()
            .map_err(|_| BotError::new(BotErrorKind::Transport, "script lock poisoned"))?
            .pop_front();
        match next {
            Some(record) => {
                debug!(bot = %self.name, record = %record, "Scripted bot answering");
                Ok(record)
            }
            None => Err(BotError::new(BotErrorKind::Exhausted, "script exhausted")),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

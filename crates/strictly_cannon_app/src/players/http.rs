//! Remote bot reached over HTTP.

use super::{BotClient, BotError, BotErrorKind, BotRequest};
use serde::{Deserialize, Serialize};
use strictly_cannon::{Board, Side};
use tracing::{debug, error, info, instrument};

/// JSON body posted to a remote bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequestBody {
    /// Board as rows of cell codes.
    pub game_state: Board,
    /// True when Black is to move.
    pub is_black_turn: bool,
    /// Boards the bot must not produce.
    pub forbidden_states: Vec<Board>,
}

impl From<&BotRequest> for MoveRequestBody {
    fn from(request: &BotRequest) -> Self {
        Self {
            game_state: *request.board(),
            is_black_turn: *request.side() == Side::Black,
            forbidden_states: request.forbidden().clone(),
        }
    }
}

/// JSON body a remote bot answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponseBody {
    /// Move record.
    #[serde(rename = "move")]
    pub record: String,
}

/// Bot that POSTs the position to a URL and reads back a move record.
#[derive(Debug, Clone)]
pub struct HttpBotClient {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpBotClient {
    /// Creates a client for the bot at `url`.
    #[instrument(skip_all, fields(name = %name.as_ref(), url = %url.as_ref()))]
    pub fn new(name: impl AsRef<str>, url: impl AsRef<str>) -> Self {
        info!("Creating HTTP bot client");
        Self {
            name: name.as_ref().to_string(),
            url: url.as_ref().to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl BotClient for HttpBotClient {
    #[instrument(skip(self, request), fields(bot = %self.name, url = %self.url))]
    async fn fetch_move(&self, request: BotRequest) -> Result<String, BotError> {
        let body = MoveRequestBody::from(&request);
        debug!(forbidden = body.forbidden_states.len(), "Posting position to bot");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Bot request failed");
                BotError::new(BotErrorKind::Transport, format!("request failed: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read bot response");
            BotError::new(BotErrorKind::Transport, format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %text, "Bot returned error status");
            return Err(BotError::new(
                BotErrorKind::Transport,
                format!("bot answered {}: {}", status, text),
            ));
        }

        let reply: MoveResponseBody = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse bot response");
            BotError::new(BotErrorKind::BadResponse, format!("failed to parse response: {}", e))
        })?;

        info!(record = %reply.record, "Bot answered");
        Ok(reply.record)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

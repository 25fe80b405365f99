//! Built-in bot that needs no network.

use super::{BotClient, BotError, BotErrorKind, BotRequest};
use strictly_cannon::{RuleSet, encode, legal_moves, rules};
use tracing::debug;

/// Plays the first legal move that does not revisit a forbidden board.
///
/// Falls back to the first legal move when every successor is forbidden.
#[derive(Debug, Clone)]
pub struct LocalBot {
    name: String,
    rules: RuleSet,
}

impl LocalBot {
    /// Creates a new local bot.
    pub fn new(name: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

#[async_trait::async_trait]
impl BotClient for LocalBot {
    async fn fetch_move(&self, request: BotRequest) -> Result<String, BotError> {
        debug!(bot = %self.name, side = %request.side(), "Local bot choosing move");

        let moves = legal_moves(request.board(), *request.side(), &self.rules);
        let fresh = moves.iter().find(|mv| {
            rules::apply(request.board(), mv)
                .map(|next| !request.forbidden().contains(&next))
                .unwrap_or(false)
        });

        let chosen = fresh.or(moves.first()).ok_or_else(|| {
            BotError::new(BotErrorKind::Exhausted, "no legal moves available")
        })?;
        debug!(bot = %self.name, mv = %chosen, "Local bot chose move");
        Ok(encode(chosen))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_cannon::{Board, Side};

    #[tokio::test]
    async fn test_local_bot_picks_first_legal_move() {
        let rules = RuleSet::standard();
        let board = Board::initial();
        let bot = LocalBot::new("local", rules.clone());
        let record = bot
            .fetch_move(BotRequest::new(board, Side::Black, Vec::new()))
            .await
            .unwrap();
        let first = legal_moves(&board, Side::Black, &rules)[0];
        assert_eq!(record, encode(&first));
    }

    #[tokio::test]
    async fn test_local_bot_avoids_forbidden_successor() {
        let rules = RuleSet::standard();
        let board = Board::initial();
        let moves = legal_moves(&board, Side::Black, &rules);
        let first_successor = rules::apply(&board, &moves[0]).unwrap();

        let bot = LocalBot::new("local", rules.clone());
        let record = bot
            .fetch_move(BotRequest::new(board, Side::Black, vec![first_successor]))
            .await
            .unwrap();
        assert_ne!(record, encode(&moves[0]));
    }

    #[tokio::test]
    async fn test_local_bot_without_moves() {
        let bot = LocalBot::new("local", RuleSet::standard());
        let err = bot
            .fetch_move(BotRequest::new(Board::empty(), Side::White, Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, BotErrorKind::Exhausted);
    }
}

//! Guide overlay shown to the player after a selection.

use crate::action::{Move, MoveKind};
use crate::types::{NUM_COLUMNS, NUM_ROWS, Position};
use serde::{Deserialize, Serialize};

/// Marker on a single square of the guide overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Marker {
    /// Nothing available here.
    #[default]
    None,
    /// The selected soldier can move here.
    QuietMove,
    /// The selected soldier can capture here.
    Capture,
}

impl Marker {
    /// Marker that a move of `kind` needs on its target.
    pub fn for_kind(kind: MoveKind) -> Self {
        match kind {
            MoveKind::Advance => Marker::QuietMove,
            MoveKind::Strike => Marker::Capture,
        }
    }
}

/// Markers for every square plus the current selection.
///
/// Always derived from a board and a selection; never stored between games.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuideState {
    markers: [[Marker; NUM_COLUMNS as usize]; NUM_ROWS as usize],
    selected: Option<Position>,
}

impl GuideState {
    /// A guide with no markers and no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A guide with `selected` highlighted and no markers yet.
    pub fn selecting(selected: Position) -> Self {
        Self {
            selected: Some(selected),
            ..Self::default()
        }
    }

    /// Guide shown while a move is being animated: only its target is marked.
    pub fn for_move(mv: &Move) -> Self {
        let mut guide = Self::selecting(mv.from());
        guide.mark(mv.target(), Marker::for_kind(mv.kind()));
        guide
    }

    /// Marker at `pos`.
    pub fn marker(&self, pos: Position) -> Marker {
        self.markers[pos.row() as usize][pos.col() as usize]
    }

    /// Sets the marker at `pos`.
    pub fn mark(&mut self, pos: Position, marker: Marker) {
        self.markers[pos.row() as usize][pos.col() as usize] = marker;
    }

    /// Currently selected square.
    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// Squares carrying `marker`, row-major.
    pub fn positions_with(&self, marker: Marker) -> Vec<Position> {
        Position::all().filter(|&pos| self.marker(pos) == marker).collect()
    }

    /// True when no square is marked.
    pub fn has_targets(&self) -> bool {
        self.markers.iter().flatten().any(|&m| m != Marker::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guide_is_blank() {
        let guide = GuideState::new();
        assert!(!guide.has_targets());
        assert_eq!(guide.selected(), None);
    }

    #[test]
    fn test_guide_for_strike() {
        let from = Position::new(5, 0).unwrap();
        let target = Position::new(1, 0).unwrap();
        let guide = GuideState::for_move(&Move::Strike { from, target });
        assert_eq!(guide.selected(), Some(from));
        assert_eq!(guide.positions_with(Marker::Capture), vec![target]);
        assert!(guide.positions_with(Marker::QuietMove).is_empty());
    }
}

//! Shared fixtures for the integration tests.

/// A complete game that Black wins in fifteen plies.
///
/// Black slides its cannons up columns 0 and 2 and shoots the White
/// townhalls at (0, 0) and (0, 2). White only slides its own cannons down
/// columns 3, 5 and 7, out of the way.
pub const BLACK_WINS_LOG: [&str; 15] = [
    "S 7 0 M 4 0",
    "S 0 7 M 3 7",
    "S 6 0 M 3 0",
    "S 1 7 M 4 7",
    "S 5 0 M 2 0",
    "S 0 5 M 3 5",
    "S 4 0 B 0 0",
    "S 1 5 M 4 5",
    "S 7 2 M 4 2",
    "S 0 3 M 3 3",
    "S 6 2 M 3 2",
    "S 1 3 M 4 3",
    "S 5 2 M 2 2",
    "S 2 3 M 5 3",
    "S 4 2 B 0 2",
];

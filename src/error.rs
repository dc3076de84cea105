//! Error types for the optimizer.

use thiserror::Error;

use crate::types::Rect;

/// Result type alias for optimizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an optimization request before any placement happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A piece cannot fit the sheet in any permitted orientation.
    #[error("Piece {piece} is larger than the sheet dimensions {sheet}.")]
    InfeasiblePiece { piece: Rect, sheet: Rect },

    /// Malformed request: zero dimensions, zero quantities and the like.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infeasible_message_names_both_sizes() {
        let err = Error::InfeasiblePiece {
            piece: Rect::new(4, 1),
            sheet: Rect::new(3, 3),
        };
        assert_eq!(
            err.to_string(),
            "Piece 4x1 is larger than the sheet dimensions 3x3."
        );
    }
}

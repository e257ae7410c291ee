// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{debug, trace};

use super::material::{Color, Material, Piece};
use super::position::{Pos, Position};
use super::square::{Mask, Offset, Square, SquareError};
use super::Turn;

use Piece::*;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("There is no piece on {0}")]
    EmptySquare(Square),
    #[error("It is not {0}'s turn")]
    WrongTurn(Color),
    #[error("A {0} cannot move from {1} to {2}")]
    InvalidMove(Piece, Square, Square),
    #[error("The path from {0} to {1} is blocked")]
    Blocked(Square, Square),
    #[error("{0} holds a piece of the moving side")]
    OwnPiece(Square),
}
use MoveError::*;

/// Adjustable parts of the movement rules.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    /// Whether a piece may land on (and remove) a piece of its own color.
    pub allow_self_capture: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            allow_self_capture: true,
        }
    }
}

impl Rules {
    pub const STRICT: Self = Self {
        allow_self_capture: false,
    };
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = SquareError;

    /// Parses coordinate notation such as `e2e4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let from = s.get(0..2).ok_or(SquareError::TooShort)?;
        let to = s.get(2..).ok_or(SquareError::TooShort)?;
        Ok(Self::new(
            Square::try_from_string(from)?,
            Square::try_from_string(to)?,
        ))
    }
}

pub trait LegalMoves: Pos {
    fn rules(&self) -> Rules {
        Rules::default()
    }

    fn validate_move(&self, mv: Move) -> Result<(), MoveError> {
        let pos: &Position = self.as_ref();
        validate(pos, &self.rules(), mv)
    }

    #[inline]
    fn is_valid_move(&self, from: Square, to: Square) -> bool {
        self.validate_move(Move::new(from, to)).is_ok()
    }

    #[inline]
    fn is_path_clear(&self, from: Square, to: Square) -> bool {
        is_path_clear(self.as_ref(), from, to)
    }

    /// Every square the piece on `from` may move to right now.
    fn destinations(&self, from: Square) -> Mask {
        Mask::from_squares(Square::iter().filter(|to| self.is_valid_move(from, *to)))
    }
}

impl LegalMoves for Position {}

/// True when the piece on `from` may move to `to` under the default rules.
pub fn is_valid_move(position: &Position, from: Square, to: Square) -> bool {
    position.is_valid_move(from, to)
}

/// True when every square strictly between `from` and `to` is empty.
/// Only meaningful for squares on a shared rank, file or diagonal.
pub fn is_path_clear(position: &Position, from: Square, to: Square) -> bool {
    let offset = to - from;
    let step = offset.to_unit();
    (1..offset.steps()).all(|i| {
        let square = from + step.scale(i as isize);
        square.map_or(true, |sq| position.is_vacant(sq))
    })
}

/// Validates and applies a move under the default rules, flipping the turn
/// on success. Returns whether the move was made and the side now to move.
pub fn attempt_move(position: &mut Position, from: Square, to: Square) -> (bool, Color) {
    let success = play(position, &Rules::default(), Move::new(from, to)).is_ok();
    (success, position.turn())
}

/// Validates `mv` and, if legal, applies it and hands the turn over.
/// The position is untouched when an error is returned.
pub fn play(
    position: &mut Position,
    rules: &Rules,
    mv: Move,
) -> Result<Option<Material>, MoveError> {
    if let Err(err) = validate(position, rules, mv) {
        debug!(%mv, turn = %position.turn(), %err, "move rejected");
        return Err(err);
    }
    let captured = position.apply_move(mv.from, mv.to);
    position.toggle_turn();
    trace!(%mv, captured = ?captured, turn = %position.turn(), "move applied");
    Ok(captured)
}

fn validate(pos: &Position, rules: &Rules, mv: Move) -> Result<(), MoveError> {
    let Move { from, to } = mv;
    let material = pos.contents(from).ok_or(EmptySquare(from))?;
    let color = material.color();
    if color != pos.turn() {
        return Err(WrongTurn(color));
    }
    let offset = to - from;
    let piece = material.piece();
    match piece {
        Pawn => return validate_pawn(pos, rules, color, mv, offset),
        Rook if offset.is_straight() => {}
        Bishop if offset.is_diagonal() => {}
        Queen if offset.is_straight() || offset.is_diagonal() => {}
        Knight if is_knight_jump(offset) => {}
        King if offset.steps() == 1 => {}
        _ => return Err(InvalidMove(piece, from, to)),
    }
    if piece.is_slider() && !is_path_clear(pos, from, to) {
        return Err(Blocked(from, to));
    }
    check_destination(pos, rules, color, to)
}

fn validate_pawn(
    pos: &Position,
    rules: &Rules,
    color: Color,
    mv: Move,
    offset: Offset,
) -> Result<(), MoveError> {
    let forward = color.forward();
    let target = pos.contents(mv.to);
    if offset.cols == 0 && target.is_none() {
        let single = offset.rows == forward;
        // The skipped square is not inspected, only the destination.
        let double = offset.rows == 2 * forward && mv.from.row() == color.home_row();
        if single || double {
            return Ok(());
        }
    } else if offset.cols.abs() == 1 && offset.rows == forward && target.is_some() {
        return check_destination(pos, rules, color, mv.to);
    }
    Err(InvalidMove(Pawn, mv.from, mv.to))
}

fn check_destination(
    pos: &Position,
    rules: &Rules,
    color: Color,
    to: Square,
) -> Result<(), MoveError> {
    match pos.contents(to) {
        Some(m) if m.color() == color && !rules.allow_self_capture => Err(OwnPiece(to)),
        _ => Ok(()),
    }
}

#[inline]
fn is_knight_jump(offset: Offset) -> bool {
    matches!(
        (offset.rows.abs(), offset.cols.abs()),
        (1, 2) | (2, 1)
    )
}

#[cfg(test)]
mod tests {
    use crate::*;
    use Square::*;

    fn lone(square: Square, material: Material) -> Position {
        Position::empty(material.color()).set_contents(square, Some(material))
    }

    #[test]
    fn test_white_can_move_first() {
        let position = Position::default();
        assert!(!position.destinations(E2).is_empty());
    }
    #[test]
    fn test_black_cannot_move_first() {
        let position = Position::default();
        assert!(position.destinations(E7).is_empty());
        assert_eq!(
            position.validate_move(Move::new(E7, E5)),
            Err(MoveError::WrongTurn(Color::Black))
        );
    }
    #[test]
    fn test_empty_square() {
        let position = Position::default();
        assert_eq!(
            position.validate_move(Move::new(E4, E5)),
            Err(MoveError::EmptySquare(E4))
        );
    }
    #[test]
    fn test_zero_displacement_never_legal() {
        let position = Position::default();
        for square in [A1, B1, C1, D1, E1, E2] {
            assert!(!position.is_valid_move(square, square));
        }
        let position = lone(D4, Material::WQ);
        assert!(!position.is_valid_move(D4, D4));
    }
    #[test]
    fn test_white_pawn_advance() {
        let position = Position::default();
        let destinations = position.destinations(E2);
        assert_eq!(destinations.len(), 2);
        assert!(destinations.contains(E3));
        assert!(destinations.contains(E4));
    }
    #[test]
    fn test_black_pawn_advance() {
        let position = Position::default().set_turn(Color::Black);
        let destinations = position.destinations(E7);
        assert!(destinations.contains(E6));
        assert!(destinations.contains(E5));
        assert!(!destinations.contains(E8));
    }
    #[test]
    fn test_pawn_cannot_retreat() {
        let position = lone(E4, Material::WP);
        assert!(!position.is_valid_move(E4, E3));
        let position = lone(E5, Material::BP);
        assert!(!position.is_valid_move(E5, E6));
    }
    #[test]
    fn test_pawn_advance_blocked() {
        let position = Position::default().set_contents(E3, Some(Material::BB));
        assert!(!position.is_valid_move(E2, E3));
        let position = Position::default()
            .set_turn(Color::Black)
            .set_contents(E6, Some(Material::WB));
        assert!(!position.is_valid_move(E7, E6));
    }
    #[test]
    fn test_white_pawn_double_advance_from_home_row_only() {
        let position = lone(E2, Material::WP);
        assert!(position.is_valid_move(E2, E4));
        let position = lone(E3, Material::WP);
        assert!(!position.is_valid_move(E3, E5));
        assert!(position.is_valid_move(E3, E4));
    }
    #[test]
    fn test_pawn_double_advance_needs_empty_destination() {
        let position = Position::default().set_contents(E4, Some(Material::BB));
        assert!(position.is_valid_move(E2, E3));
        assert!(!position.is_valid_move(E2, E4));
    }
    #[test]
    fn test_pawn_double_advance_ignores_skipped_square() {
        let position = Position::default().set_contents(E3, Some(Material::BN));
        assert!(!position.is_valid_move(E2, E3));
        assert!(position.is_valid_move(E2, E4));
    }
    #[test]
    fn test_pawn_double_advance_not_diagonal() {
        let position = lone(E2, Material::WP).set_contents(F4, Some(Material::BN));
        assert!(!position.is_valid_move(E2, F4));
        assert!(!position.is_valid_move(E2, G4));
    }
    #[test]
    fn test_white_pawn_capture() {
        let position = Position::default()
            .set_contents(D3, Some(Material::BB))
            .set_contents(F3, Some(Material::WN));
        assert!(position.is_valid_move(E2, D3));
        // Either color may be taken by a pawn under the default rules.
        assert!(position.is_valid_move(E2, F3));
        assert!(!position.is_valid_move(E2, F4));
        assert!(!position.is_valid_move(C2, B3));
    }
    #[test]
    fn test_black_pawn_capture() {
        let position = Position::default()
            .set_turn(Color::Black)
            .set_contents(D6, Some(Material::WB));
        assert!(position.is_valid_move(E7, D6));
        assert!(position.is_valid_move(C7, D6));
        assert!(!position.is_valid_move(C7, B6));
    }
    #[test]
    fn test_pawn_does_not_capture_straight_ahead() {
        let position = lone(E4, Material::WP).set_contents(E5, Some(Material::BP));
        assert!(!position.is_valid_move(E4, E5));
    }
    #[test]
    fn test_rook_path_obstruction() {
        let position = lone(A1, Material::WR);
        assert!(position.is_valid_move(A1, H1));
        assert!(position.is_valid_move(A1, A8));
        assert!(!position.is_valid_move(A1, B2));
        for col in 1..7 {
            let blocked = position.clone().set_contents(Square::at(7, col), Some(Material::BP));
            assert_eq!(
                blocked.validate_move(Move::new(A1, H1)),
                Err(MoveError::Blocked(A1, H1))
            );
        }
    }
    #[test]
    fn test_rook_blocked_at_start() {
        let position = Position::default();
        assert!(position.destinations(A1).is_empty());
    }
    #[test]
    fn test_knight_offsets() {
        let position = Position::default();
        assert!(position.is_valid_move(B1, A3));
        assert!(position.is_valid_move(B1, C3));
        assert_eq!(
            position.validate_move(Move::new(B1, B3)),
            Err(MoveError::InvalidMove(Piece::Knight, B1, B3))
        );
        let destinations = position.destinations(G1);
        assert!(destinations.contains(F3));
        assert!(destinations.contains(H3));
    }
    #[test]
    fn test_knight_jumps_over_pieces() {
        let position = lone(D4, Material::WN);
        assert_eq!(position.destinations(D4).len(), 8);
    }
    #[test]
    fn test_bishop_destinations() {
        let position = Position::default()
            .set_contents(B2, None)
            .set_contents(D2, None);
        let destinations = position.destinations(C1);
        assert!(destinations.contains(B2));
        assert!(destinations.contains(A3));
        assert!(destinations.contains(D2));
        assert!(destinations.contains(H6));
        assert!(!destinations.contains(C2));
        assert!(!destinations.contains(C3));
    }
    #[test]
    fn test_bishop_blocked() {
        let position = lone(C1, Material::WB).set_contents(E3, Some(Material::BP));
        assert!(position.is_valid_move(C1, D2));
        assert!(position.is_valid_move(C1, E3));
        assert!(!position.is_valid_move(C1, F4));
    }
    #[test]
    fn test_queen_destinations() {
        let position = lone(D4, Material::WQ);
        assert_eq!(position.destinations(D4).len(), 27);
        assert!(!position.is_valid_move(D4, E6));
    }
    #[test]
    fn test_queen_blocked_at_start() {
        let position = Position::default();
        assert!(position.destinations(D1).is_empty());
    }
    #[test]
    fn test_king_single_step() {
        let position = Position::default().set_contents(D2, None).set_contents(E2, None);
        assert!(position.is_valid_move(E1, D2));
        assert!(position.is_valid_move(E1, E2));
        assert!(!position.is_valid_move(E1, E3));
        let position = lone(E4, Material::BK);
        assert_eq!(position.destinations(E4).len(), 8);
    }
    #[test]
    fn test_self_capture_allowed_by_default() {
        let position = Position::default();
        assert!(position.is_valid_move(E1, D1));
        assert!(position.is_valid_move(B1, D2));
        assert!(position.is_valid_move(A1, A2));
    }
    #[test]
    fn test_self_capture_rejected_when_strict() {
        struct Strict(Position);
        impl Turn for Strict {
            fn turn(&self) -> Color {
                self.0.turn()
            }
        }
        impl AsRef<Position> for Strict {
            fn as_ref(&self) -> &Position {
                &self.0
            }
        }
        impl Pos for Strict {}
        impl LegalMoves for Strict {
            fn rules(&self) -> Rules {
                Rules::STRICT
            }
        }
        let position = Strict(Position::default().set_contents(C3, Some(Material::WP)));
        assert_eq!(
            position.validate_move(Move::new(E1, D1)),
            Err(MoveError::OwnPiece(D1))
        );
        assert_eq!(
            position.validate_move(Move::new(B2, C3)),
            Err(MoveError::OwnPiece(C3))
        );
        assert!(position.destinations(D1).is_empty());
        assert!(position.is_valid_move(G1, F3));
    }
    #[test]
    fn test_path_clear_adjacent() {
        let position = Position::default();
        assert!(is_path_clear(&position, A1, A2));
        assert!(is_path_clear(&position, A1, B2));
        assert!(!is_path_clear(&position, A1, A3));
        assert!(is_path_clear(&position, A2, A6));
    }
    #[test]
    fn test_attempt_move_flips_turn() {
        let mut position = Position::default();
        assert_eq!(attempt_move(&mut position, E2, E4), (true, Color::Black));
        assert_eq!(attempt_move(&mut position, E4, E5), (false, Color::Black));
        assert_eq!(attempt_move(&mut position, D7, D5), (true, Color::White));
        assert_eq!(position.occupant_at(D5), Some(Material::BP));
    }
    #[test]
    fn test_play_reports_capture() {
        let mut position = Position::default().set_contents(D3, Some(Material::BN));
        let captured = play(&mut position, &Rules::default(), Move::new(E2, D3));
        assert_eq!(captured, Ok(Some(Material::BN)));
        assert_eq!(position.turn(), Color::Black);
    }
    #[test]
    fn test_play_leaves_position_on_error() {
        let mut position = Position::default();
        let before = position.clone();
        let result = play(&mut position, &Rules::default(), Move::new(D1, D5));
        assert_eq!(result, Err(MoveError::Blocked(D1, D5)));
        assert_eq!(position, before);
    }
    #[test]
    fn test_move_notation() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv, Move::new(E2, E4));
        assert_eq!(mv.to_string(), "e2e4");
        assert_eq!("e2".parse::<Move>(), Err(SquareError::TooShort));
        assert!("z2e4".parse::<Move>().is_err());
    }
    #[test]
    fn test_rules_deserialize_with_defaults() {
        let rules: Rules = serde_json::from_str("{}").unwrap();
        assert_eq!(rules, Rules::default());
        let rules: Rules = serde_json::from_str(r#"{"allow_self_capture":false}"#).unwrap();
        assert_eq!(rules, Rules::STRICT);
    }
}

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

//! Chess board with geometric move legality
//!
//! A _board_ holds the pieces and the side to move, decides whether
//! a piece may travel from one square to another, and applies the
//! moves that may. The following features are supported:
//!
//! [x] Movement rules for all six pieces
//! [x] Path obstruction for rooks, bishops and queens
//! [x] Pawn double advance from the home row
//! [x] Strict alternation of turns
//! [x] Optional ban on landing on your own pieces (see `Rules`)
//! [ ] Check, checkmate and stalemate
//! [ ] Castling, en passant and promotion
//! [ ] Move history and take backs
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square
//!   on an 8-by-8 board as a row and a column, each in `0..8`.
//!   Row 0 is Black's back rank and row 7 is White's. Squares are
//!   also named by file and rank (`A8` is row 0, column 0 and `H1`
//!   is row 7, column 7).
//!
//! * `Material` represents a piece of a specific color. A `Piece`
//!   has six variants: `King`, `Queen`, `Rook`, `Bishop`, `Knight`
//!   and `Pawn`. `Color` is either `White` or `Black`. The occupant
//!   of a square is an `Option<Material>`.
//!
//! * A `Position` holds the contents of each square and whose turn
//!   it is. `apply_move` moves a piece without checking anything and
//!   is the only way pieces change squares.
//!
//! * `LegalMoves` decides whether a move is legal for anything that
//!   wraps a position. A move is judged purely on how the piece
//!   moves: nothing looks at whether a king is left in check.
//!
//! * A `Game` owns a position and the `Rules` it is played under.
//!   `attempt_move` validates, applies and hands the turn over in a
//!   single step, or changes nothing at all. A `Selection` turns two
//!   clicks into one call to `attempt_move`.
//!

mod material;
mod moves;
mod play;
mod position;
mod square;

pub use material::*;
pub use moves::*;
pub use play::*;
pub use position::*;
pub use square::*;

pub trait Turn {
    fn turn(&self) -> Color;
}

/// The standard starting position with White to move.
pub fn new_board() -> Position {
    Position::new()
}

/// The occupant of `square`, if any.
pub fn occupant_at(position: &Position, square: Square) -> Option<Material> {
    position.occupant_at(square)
}

// Copyright 2026 Tobin Edwards
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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Not;
use strum::IntoEnumIterator;
use strum_macros::Display;
use strum_macros::EnumIter;

/// A piece of a specific color, i.e. the occupant of a square.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
}

impl Material {
    pub const WK: Self = Self::new(White, King);
    pub const WQ: Self = Self::new(White, Queen);
    pub const WR: Self = Self::new(White, Rook);
    pub const WB: Self = Self::new(White, Bishop);
    pub const WN: Self = Self::new(White, Knight);
    pub const WP: Self = Self::new(White, Pawn);

    pub const BK: Self = Self::new(Black, King);
    pub const BQ: Self = Self::new(Black, Queen);
    pub const BR: Self = Self::new(Black, Rook);
    pub const BB: Self = Self::new(Black, Bishop);
    pub const BN: Self = Self::new(Black, Knight);
    pub const BP: Self = Self::new(Black, Pawn);

    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        Self { color, piece }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Looks up a two letter code such as `wp` or `bk`.
    pub fn from_code(code: &str) -> Option<Self> {
        CODES.get(code).copied()
    }

    pub fn glyph(&self) -> char {
        const WHITE_GLYPHS: [char; 6] = ['♙', '♘', '♗', '♖', '♕', '♔'];
        const BLACK_GLYPHS: [char; 6] = ['♟', '♞', '♝', '♜', '♛', '♚'];
        match self.color {
            White => WHITE_GLYPHS[self.piece.to_index()],
            Black => BLACK_GLYPHS[self.piece.to_index()],
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.letter(), self.piece.letter())
    }
}

static CODES: Lazy<HashMap<String, Material>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for color in Color::iter() {
        for piece in Piece::iter() {
            let material = Material::new(color, piece);
            map.insert(material.to_string(), material);
        }
    }
    map
});

use Color::{Black, White};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Row delta of a single pawn advance. White moves toward row 0.
    #[inline]
    pub const fn forward(&self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }

    /// Row the pawns start on, the only row a double advance is allowed from.
    #[inline]
    pub const fn home_row(&self) -> usize {
        match self {
            White => 6,
            Black => 1,
        }
    }

    #[inline]
    pub const fn back_row(&self) -> usize {
        match self {
            White => 7,
            Black => 0,
        }
    }

    const fn letter(&self) -> char {
        match self {
            White => 'w',
            Black => 'b',
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
use Piece::{Bishop, King, Knight, Pawn, Queen, Rook};

impl Piece {
    /// Back rank layout from column 0 to column 7.
    pub const BACK_RANK: [Piece; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

    pub fn to_index(&self) -> usize {
        *self as usize
    }
    /// Rooks, bishops and queens, whose paths can be blocked.
    pub fn is_slider(&self) -> bool {
        matches!(*self, Rook | Bishop | Queen)
    }

    const fn letter(&self) -> char {
        match self {
            Pawn => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook => 'r',
            Queen => 'q',
            King => 'k',
        }
    }
}

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

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::material::{Color, Material, Piece};
use super::square::{Mask, Square};
use super::Turn;

use Color::*;

const EMPTY_CODE: &str = "..";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("Expecting 8 rows but found {0}")]
    RowCount(usize),
    #[error("Expecting 8 squares in row {row} but found {count}")]
    ColumnCount { row: usize, count: usize },
    #[error("Unknown piece code {code:?} at row {row}, column {col}")]
    UnknownCode { row: usize, col: usize, code: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Squares([Option<Material>; 64]);

impl Squares {
    fn empty() -> Self {
        Self([None; 64])
    }
}

impl Index<Square> for Squares {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Squares {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

impl Serialize for Squares {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(64))?;
        for occupant in self.0.iter() {
            seq.serialize_element(occupant)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Squares {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let occupants = Vec::<Option<Material>>::deserialize(deserializer)?;
        let len = occupants.len();
        let array: [Option<Material>; 64] = occupants
            .try_into()
            .map_err(|_| serde::de::Error::invalid_length(len, &"64 squares"))?;
        Ok(Self(array))
    }
}

/// The contents of every square plus the side to move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    squares: Squares,
    turn: Color,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard starting position with White to move.
    pub fn new() -> Self {
        let mut position = Self::empty(White);
        for color in Color::iter() {
            for (col, piece) in Piece::BACK_RANK.into_iter().enumerate() {
                position.squares[Square::at(color.back_row(), col)] =
                    Some(Material::new(color, piece));
                position.squares[Square::at(color.home_row(), col)] =
                    Some(Material::new(color, Piece::Pawn));
            }
        }
        position
    }

    pub fn empty(turn: Color) -> Self {
        Self {
            squares: Squares::empty(),
            turn,
        }
    }

    /// Parses a diagram of eight lines of two letter codes, row 0 first.
    pub fn parse(diagram: &str, turn: Color) -> Result<Self, PositionError> {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != 8 {
            return Err(PositionError::RowCount(rows.len()));
        }
        let mut position = Self::empty(turn);
        for (row, line) in rows.into_iter().enumerate() {
            let codes: Vec<&str> = line.split_whitespace().collect();
            if codes.len() != 8 {
                return Err(PositionError::ColumnCount {
                    row,
                    count: codes.len(),
                });
            }
            for (col, code) in codes.into_iter().enumerate() {
                if code == EMPTY_CODE {
                    continue;
                }
                let material = Material::from_code(code).ok_or_else(|| {
                    PositionError::UnknownCode {
                        row,
                        col,
                        code: code.to_string(),
                    }
                })?;
                position.squares[Square::at(row, col)] = Some(material);
            }
        }
        Ok(position)
    }

    pub fn set_contents(mut self, square: Square, value: Option<Material>) -> Self {
        self.squares[square] = value;
        self
    }

    pub fn set_turn(mut self, turn: Color) -> Self {
        self.turn = turn;
        self
    }

    #[inline]
    pub fn occupant_at(&self, square: Square) -> Option<Material> {
        self.squares[square]
    }

    /// Moves whatever stands on `from` to `to`, returning the occupant it
    /// replaced. No rules are checked and the turn is left alone.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Material> {
        let material = self.squares[from].take();
        std::mem::replace(&mut self.squares[to], material)
    }

    pub(super) fn toggle_turn(&mut self) {
        self.turn = !self.turn;
    }
}

impl Turn for Position {
    #[inline]
    fn turn(&self) -> Color {
        self.turn
    }
}

impl Index<Square> for Position {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl AsRef<Self> for Position {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl Pos for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in Square::iter() {
            match self.squares[square] {
                Some(material) => write!(f, "{}", material)?,
                None => write!(f, "{}", EMPTY_CODE)?,
            }
            if square.col() == 7 {
                writeln!(f)?;
            } else {
                write!(f, " ")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Position {
    type Err = PositionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, White)
    }
}

/// Read access shared by anything that wraps a position.
pub trait Pos: Turn + AsRef<Position> {
    #[inline]
    fn contents(&self, square: Square) -> Option<Material> {
        let pos: &Position = self.as_ref();
        pos.squares[square]
    }
    #[inline]
    fn is_vacant(&self, square: Square) -> bool {
        self.contents(square).is_none()
    }
    #[inline]
    fn is_occupied(&self, square: Square) -> bool {
        self.contents(square).is_some()
    }
    #[inline]
    fn is_ours(&self, square: Square) -> bool {
        matches!(self.contents(square), Some(m) if m.color() == self.turn())
    }
    fn occupied_by(&self, color: Color) -> Mask {
        Mask::from_squares(
            Square::iter().filter(|sq| matches!(self.contents(*sq), Some(m) if m.color() == color)),
        )
    }
}

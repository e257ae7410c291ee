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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use tracing::{debug, info};

use super::material::{Color, Material};
use super::moves::{self, LegalMoves, Move, Rules};
use super::position::{Pos, Position};
use super::square::Square;
use super::Turn;
use crate::game::GameId;

/// A single game: one position, the rules it is played under and the
/// side to move. All mutation goes through `attempt_move`/`submit_move`,
/// which take `&mut self`, so moves on one game are applied one at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    rules: Rules,
    position: Position,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    #[cfg(feature = "random")]
    pub fn new() -> Self {
        Self::with_id(GameId::random())
    }
    #[cfg(not(feature = "random"))]
    pub fn new() -> Self {
        Self::with_id(GameId::default())
    }

    pub fn with_id(id: GameId) -> Self {
        Self::from_position(id, Position::new(), Rules::default())
    }

    pub fn from_position(id: GameId, position: Position, rules: Rules) -> Self {
        info!(game = %id, turn = %position.turn(), ?rules, "game created");
        Self {
            id,
            rules,
            position,
        }
    }

    /// Builds a game from a text diagram, see `Position::parse`.
    pub fn from_diagram(id: GameId, diagram: &str, turn: Color, rules: Rules) -> Result<Self> {
        let position = Position::parse(diagram, turn)?;
        Ok(Self::from_position(id, position, rules))
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn occupant_at(&self, square: Square) -> Option<Material> {
        self.position.occupant_at(square)
    }

    /// Plays `from` -> `to` if it is legal. Returns `false` and leaves the
    /// game untouched otherwise.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> bool {
        self.submit_move(Move::new(from, to)).is_ok()
    }

    /// Plays `mv`, returning the captured occupant if any.
    pub fn submit_move(&mut self, mv: Move) -> Result<Option<Material>> {
        let captured = moves::play(&mut self.position, &self.rules, mv)?;
        debug!(game = %self.id, %mv, "move played");
        Ok(captured)
    }
}

impl Turn for Game {
    #[inline]
    fn turn(&self) -> Color {
        self.position.turn()
    }
}

impl AsRef<Position> for Game {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}

impl Index<Square> for Game {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        self.position.index(index)
    }
}

impl Pos for Game {}

impl LegalMoves for Game {
    fn rules(&self) -> Rules {
        self.rules
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// The clicked square is now selected.
    Selected(Square),
    /// The pending selection was moved to the clicked square.
    Moved(Move),
    /// Nothing is selected.
    Cleared,
}

/// Turns two consecutive square clicks into one move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection(Option<Square>);

impl Selection {
    pub fn new() -> Self {
        Self(None)
    }

    pub fn square(&self) -> Option<Square> {
        self.0
    }

    /// Squares the selected piece may move to, for highlighting.
    pub fn destinations<T: LegalMoves>(&self, board: &T) -> Vec<Square> {
        match self.0 {
            Some(from) => board.destinations(from).iter().collect(),
            None => Vec::new(),
        }
    }

    /// Handles a click on `square`. With a piece selected the click is a move
    /// attempt; if that fails the click starts a new selection instead.
    pub fn click(&mut self, game: &mut Game, square: Square) -> Click {
        if let Some(from) = self.0 {
            if game.attempt_move(from, square) {
                self.0 = None;
                return Click::Moved(Move::new(from, square));
            }
        }
        self.select(game, square)
    }

    fn select(&mut self, game: &Game, square: Square) -> Click {
        if game.is_occupied(square) {
            self.0 = Some(square);
            Click::Selected(square)
        } else {
            self.0 = None;
            Click::Cleared
        }
    }
}

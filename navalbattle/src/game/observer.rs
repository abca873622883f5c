// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::{game::Side, ships::Ship};

/// Receives notifications about battle events, for example to cue camera moves or
/// sounds. Every method defaults to doing nothing.
pub trait BattleObserver {
    /// The turn moved from one side to the other.
    fn turn_changed(&mut self, _from: Side, _to: Side) {}

    /// The last cell of `ship`, belonging to `owner`, was hit.
    fn ship_destroyed(&mut self, _owner: Side, _ship: &Ship) {}

    /// Every ship of the loser was destroyed.
    fn game_over(&mut self, _winner: Side) {}
}


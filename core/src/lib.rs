// Copyright 2016 The Grin Developers
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

//! Data model shared by the glint chain-logic core: hashes, slots and
//! epochs, headers, blocks and their binary encoding.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate serde_derive;

pub mod consensus;
pub mod difficulty;
pub mod hash;
pub mod header;
pub mod block;
pub mod ser;
pub mod slot;

pub use block::{Block, Undo};
pub use difficulty::Difficulty;
pub use hash::Hash;
pub use header::{BlockHeader, GenesisHeader, MainHeader};
pub use slot::{EpochIndex, EpochOrSlot, SlotId};

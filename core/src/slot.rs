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

//! Protocol time: epochs, slots within an epoch, and the tagged
//! `EpochOrSlot` union used to compare a slot against an epoch boundary
//! (spec.md §3). Both total-order via `flatten`.

use crate::consensus::SLOTS_PER_EPOCH;
use std::cmp::Ordering;

/// A monotonically increasing epoch number.
pub type EpochIndex = u64;

/// A slot identified by its epoch and its offset within that epoch.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SlotId {
	/// The epoch this slot belongs to.
	pub epoch: EpochIndex,
	/// Offset of this slot within its epoch, in `[0, slots_per_epoch)`.
	pub slot: u64,
}

impl SlotId {
	/// Builds a new `SlotId`.
	pub fn new(epoch: EpochIndex, slot: u64) -> SlotId {
		SlotId { epoch, slot }
	}

	/// Flattens this slot into a single total-ordered integer using the
	/// fixed `slots_per_epoch` constant.
	pub fn flatten(&self) -> u64 {
		self.epoch * SLOTS_PER_EPOCH + self.slot
	}
}

impl PartialOrd for SlotId {
	fn partial_cmp(&self, other: &SlotId) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for SlotId {
	fn cmp(&self, other: &SlotId) -> Ordering {
		self.flatten().cmp(&other.flatten())
	}
}

/// Either the genesis boundary of an epoch, or a regular slot. Totally
/// ordered and compatible with `SlotId::flatten`: the genesis of epoch `e`
/// sorts as if it were slot `e * slots_per_epoch`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EpochOrSlot {
	/// The genesis block of an epoch.
	Epoch(EpochIndex),
	/// A regular slot.
	Slot(SlotId),
}

impl EpochOrSlot {
	/// Flattens this value into the same total order `SlotId::flatten` uses.
	pub fn flatten(&self) -> u64 {
		match self {
			EpochOrSlot::Epoch(e) => e * SLOTS_PER_EPOCH,
			EpochOrSlot::Slot(s) => s.flatten(),
		}
	}
}

impl PartialOrd for EpochOrSlot {
	fn partial_cmp(&self, other: &EpochOrSlot) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for EpochOrSlot {
	fn cmp(&self, other: &EpochOrSlot) -> Ordering {
		self.flatten().cmp(&other.flatten())
	}
}

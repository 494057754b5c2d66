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

//! `BlockHeader`: a tagged union of a genesis header and a regular "main"
//! header (spec.md §3). The payload a main header's consensus proof carries
//! (VRF output, leader certificate, whatever the protocol defines) is kept
//! opaque here; only `HeaderVerify` (an external collaborator) inspects it.

use crate::difficulty::Difficulty;
use crate::hash::Hash;
use crate::ser::{self, Writeable, Writer};
use crate::slot::{EpochIndex, EpochOrSlot, SlotId};

/// Opaque consensus proof attached to a main header. Its internal structure
/// is validated by the `HeaderVerify` collaborator, never by this crate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConsensusProof(pub Vec<u8>);

/// The genesis header of an epoch: carries no consensus proof, since it is
/// derivable locally by every node rather than produced by a leader.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenesisHeader {
	/// The epoch this genesis header opens.
	pub epoch: EpochIndex,
	/// Hash of the last block of the previous epoch.
	pub previous: Hash,
	/// Cumulative difficulty carried by this header.
	pub difficulty: Difficulty,
}

/// A regular, slot-bound header produced by a leader.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MainHeader {
	/// The slot this header was produced for.
	pub slot: SlotId,
	/// Hash of the parent block.
	pub previous: Hash,
	/// Cumulative difficulty carried by this header.
	pub difficulty: Difficulty,
	/// Consensus proof backing this header's right to extend the chain at
	/// `slot`.
	pub proof: ConsensusProof,
}

/// A header is either the genesis of an epoch or a regular main header
/// (spec.md §3). `difficulty(h) = difficulty(parent(h)) + Δ(h)`, with
/// `Δ` fixed per variant (`Difficulty::genesis_delta`/`main_delta`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BlockHeader {
	/// Opens a new epoch.
	Genesis(GenesisHeader),
	/// A regular header.
	Main(MainHeader),
}

impl BlockHeader {
	/// Hash of this header's parent.
	pub fn previous(&self) -> Hash {
		match self {
			BlockHeader::Genesis(g) => g.previous,
			BlockHeader::Main(m) => m.previous,
		}
	}

	/// Cumulative difficulty carried by this header.
	pub fn difficulty(&self) -> Difficulty {
		match self {
			BlockHeader::Genesis(g) => g.difficulty,
			BlockHeader::Main(m) => m.difficulty,
		}
	}

	/// The slot or epoch-boundary identity of this header, used for total
	/// ordering via `EpochOrSlot::flatten`.
	pub fn epoch_or_slot(&self) -> EpochOrSlot {
		match self {
			BlockHeader::Genesis(g) => EpochOrSlot::Epoch(g.epoch),
			BlockHeader::Main(m) => EpochOrSlot::Slot(m.slot),
		}
	}

	/// True if this is a genesis header.
	pub fn is_genesis(&self) -> bool {
		matches!(self, BlockHeader::Genesis(_))
	}
}

impl Writeable for BlockHeader {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		match self {
			BlockHeader::Genesis(g) => {
				writer.write_u8(0)?;
				writer.write_u64(g.epoch)?;
				g.previous.write(writer)?;
				writer.write_u64(g.difficulty.to_num())
			}
			BlockHeader::Main(m) => {
				writer.write_u8(1)?;
				writer.write_u64(m.slot.epoch)?;
				writer.write_u64(m.slot.slot)?;
				m.previous.write(writer)?;
				writer.write_u64(m.difficulty.to_num())?;
				writer.write_bytes(&m.proof.0)
			}
		}
	}
}

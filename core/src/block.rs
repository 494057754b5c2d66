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

//! A `Block` is a header plus its payload. The payload (transactions and
//! shared-secret data) is validated by the `Txp`/`Ssc` collaborators and is
//! opaque to this crate (spec.md §3).

use crate::hash::Hash;
use crate::header::BlockHeader;

/// Opaque transaction payload; validated end-to-end by the `Txp`
/// collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TxPayload(pub Vec<u8>);

/// Opaque shared-secret-computation payload; validated end-to-end by the
/// `Ssc` collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SscPayload(pub Vec<u8>);

/// A header plus its payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Block {
	/// This block's header.
	pub header: BlockHeader,
	/// Opaque transaction data, owned end-to-end by `Txp`.
	pub transactions: TxPayload,
	/// Opaque shared-secret data, owned end-to-end by `Ssc`.
	pub ssc: SscPayload,
}

impl Block {
	/// Hash of this block's parent header.
	pub fn previous(&self) -> Hash {
		self.header.previous()
	}
}

/// Opaque reversal record produced by verification and consumed by
/// rollback, paired 1:1 with each applied block (spec.md §3). Its contents
/// are defined by whichever of `Txp`/`Ssc` produced them; the core never
/// interprets it, only threads it through apply/rollback.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Undo(pub Vec<u8>);

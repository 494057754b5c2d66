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

//! Opaque fixed-width digest used pervasively to identify headers and
//! blocks. The actual digest algorithm is an external collaborator (the
//! `Crypto` trait in `glint_chain`); this module only defines the shape of
//! the resulting value and how it orders, prints and serializes.

use std::fmt;

/// A 32-byte digest identifying a header or block. Equality and ordering are
/// plain byte-wise comparisons; construction is always the responsibility of
/// the `Crypto` collaborator, never of this type itself.
#[derive(
	Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct Hash([u8; 32]);

/// The hash of nothing in particular; used as a sentinel previous-hash for
/// genesis headers that have no real parent.
pub const ZERO_HASH: Hash = Hash([0u8; 32]);

impl Hash {
	/// Builds a `Hash` from a raw 32-byte array.
	pub fn from_bytes(bytes: [u8; 32]) -> Hash {
		Hash(bytes)
	}

	/// Borrows the underlying bytes.
	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}
}

impl fmt::Display for Hash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for b in self.0.iter() {
			write!(f, "{:02x}", b)?;
		}
		Ok(())
	}
}

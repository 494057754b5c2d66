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

//! Chain difficulty. Unlike a PoW chain, difficulty here is simply the
//! accumulation of a fixed per-header-variant constant `Δ` (spec.md §3):
//! zero for genesis headers, one for main headers. Kept as its own type
//! (rather than a bare `u64`) so it can't be confused with a height or a
//! slot number, and so comparisons read as difficulty comparisons at call
//! sites.

use std::fmt;
use std::ops::Add;

/// Cumulative difficulty of a header, monotonically non-decreasing along any
/// single chain.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Difficulty(u64);

impl Difficulty {
	/// The difficulty of the genesis header.
	pub fn zero() -> Difficulty {
		Difficulty(0)
	}

	/// Builds a `Difficulty` from a raw value.
	pub fn from_num(n: u64) -> Difficulty {
		Difficulty(n)
	}

	/// The per-variant increment `Δ` applied by a genesis header.
	pub fn genesis_delta() -> Difficulty {
		Difficulty(0)
	}

	/// The per-variant increment `Δ` applied by a main header.
	pub fn main_delta() -> Difficulty {
		Difficulty(1)
	}

	/// The raw numeric value.
	pub fn to_num(self) -> u64 {
		self.0
	}
}

impl fmt::Display for Difficulty {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Add for Difficulty {
	type Output = Difficulty;
	fn add(self, other: Difficulty) -> Difficulty {
		Difficulty(self.0 + other.0)
	}
}

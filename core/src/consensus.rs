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

//! Protocol-wide constants. As long as a consensus parameter is simple
//! enough to be a constant rather than a negotiated chain parameter, it is
//! kept here.

/// Number of slots in an epoch. Fixed for the lifetime of the chain
/// (spec.md §3: "a known, constant `slotsPerEpoch`").
pub const SLOTS_PER_EPOCH: u64 = 21600;

/// Default security parameter `k`: the maximum fork depth, in slots, the
/// node will accept (spec.md §3). Chain parameters that actually drive
/// `glint_chain` are passed explicitly via `ChainParams` rather than read
/// from this constant; it exists for tests and example wiring.
pub const DEFAULT_K: u32 = 2160;

// Copyright 2018 The Grin Developers
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

//! The collaborators the chain-logic core consumes (spec.md §6), and the
//! `CoreCtx` bundle that replaces the source's ambient `WorkMode` reader
//! context (design note in spec.md §9: "Ambient reader context").
//!
//! Each collaborator is a plain trait, consumed as `Arc<dyn Trait>` rather
//! than threaded through as a generic type parameter, mirroring
//! `grin_chain::types::ChainStore`/`ChainAdapter` being injected trait
//! objects rather than compile-time generics.

use async_trait::async_trait;
use glint_core::block::Block;
use glint_core::hash::Hash;
use glint_core::header::BlockHeader;
use glint_core::slot::SlotId;
use glint_core::Undo;
use std::sync::Arc;

use crate::error::Error;
use crate::semaphore::BlkSemaphore;

/// The persistent block store. Out of scope per spec.md §1; the chain core
/// only consumes this interface.
#[async_trait]
pub trait BlockDb: Send + Sync {
	/// Hash of the current main-chain tip.
	async fn get_tip(&self) -> Result<Hash, Error>;
	/// The block at the current tip.
	async fn get_tip_block(&self) -> Result<Block, Error>;
	/// Looks up a header by hash.
	async fn get_block_header(&self, hash: &Hash) -> Result<Option<BlockHeader>, Error>;
	/// Looks up a full block by hash.
	async fn get_block(&self, hash: &Hash) -> Result<Option<Block>, Error>;
	/// Whether `hash` is currently flagged as being on the main chain.
	async fn is_block_in_main_chain(&self, hash: &Hash) -> Result<bool, Error>;

	/// Opens a write batch. All of `set_block_in_main_chain`/`put_block`
	/// calls made against the returned handle, up to `commit_batch`, are
	/// applied atomically — this is the transactional boundary spec.md §4.4
	/// and §9 ("Atomicity of apply/rollback") requires.
	async fn begin_batch(&self) -> Result<Box<dyn WriteBatch>, Error>;
}

/// A transactional write handle opened by `BlockDb::begin_batch`.
#[async_trait]
pub trait WriteBatch: Send + Sync {
	/// Flags `hash` as being (or not being) on the main chain.
	async fn set_block_in_main_chain(&mut self, hash: &Hash, in_main: bool) -> Result<(), Error>;
	/// Persists `block` together with its `undo` record.
	async fn put_block(&mut self, undo: &Undo, in_main: bool, block: &Block) -> Result<(), Error>;
	/// Persists the new tip hash as part of this batch.
	async fn set_tip(&mut self, hash: &Hash) -> Result<(), Error>;
	/// Commits every write made against this batch atomically.
	async fn commit(self: Box<Self>) -> Result<(), Error>;
}

/// Reads the wall-clock-derived current slot.
#[async_trait]
pub trait Slotting: Send + Sync {
	/// The slot the node currently believes it is in.
	async fn get_current_slot(&self) -> SlotId;
}

/// Transaction-validation subsystem. Out of scope per spec.md §1.
#[async_trait]
pub trait Txp: Send + Sync {
	/// Verifies the transactions of `blocks` against current UTXO state,
	/// producing one `Undo` per block on success.
	async fn tx_verify_blocks(&self, blocks: &[Block]) -> Result<Vec<Undo>, String>;
	/// Folds the transactions of `blocks` forward (oldest-first).
	async fn tx_apply_blocks(&self, blocks: &[Block]) -> Result<(), Error>;
	/// Rolls the transactions of `pairs` back (newest-first).
	async fn tx_rollback_blocks(&self, pairs: &[(Block, Undo)]) -> Result<(), Error>;
}

/// Shared-secret-computation validation subsystem. Out of scope per
/// spec.md §1.
#[async_trait]
pub trait Ssc: Send + Sync {
	/// Verifies the SSC payload of `blocks` is internally consistent.
	async fn ssc_verify_blocks(&self, blocks: &[Block]) -> Result<(), String>;
	/// Folds the SSC state of `blocks` forward (oldest-first).
	async fn ssc_apply_blocks(&self, blocks: &[Block]) -> Result<(), Error>;
	/// Rolls the SSC state of `pairs` back (newest-first).
	async fn ssc_rollback(&self, pairs: &[(Block, Undo)]) -> Result<(), Error>;
}

/// Computes the hash identifying a header. Out of scope per spec.md §1
/// ("cryptographic primitives").
pub trait Crypto: Send + Sync {
	/// Hash of `header`.
	fn hash_header(&self, header: &BlockHeader) -> Hash;
}

/// Outcome of a header/chain structural verification (spec.md §6).
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
	/// The header(s) passed every structural check.
	Success,
	/// The header(s) failed one or more checks; each entry is one failure
	/// message, in the order the checks ran.
	Failure(Vec<String>),
}

impl VerifyOutcome {
	/// True if this outcome is `Success`.
	pub fn is_success(&self) -> bool {
		matches!(self, VerifyOutcome::Success)
	}
}

/// Structural verification of headers, independent of txp/ssc. Out of scope
/// per spec.md §1.
#[async_trait]
pub trait HeaderVerify: Send + Sync {
	/// Verifies a single header against its immediate parent, optionally
	/// enforcing consensus-proof checks.
	async fn verify_header(
		&self,
		parent: &BlockHeader,
		header: &BlockHeader,
		require_consensus: bool,
	) -> VerifyOutcome;

	/// Verifies a newest-first sequence of headers is internally
	/// consistent (linkage, slot ordering, difficulty growth, and
	/// consensus proofs when `require_consensus`).
	async fn verify_headers(&self, require_consensus: bool, headers: &[BlockHeader])
		-> VerifyOutcome;

	/// Verifies a structural chain of blocks given the optional current
	/// slot context (spec.md §4.3 step 2).
	async fn verify_block_chain(
		&self,
		blocks: &[Block],
		current_slot: Option<SlotId>,
	) -> VerifyOutcome;
}

/// Fixed chain parameters: the security parameter `k` and the epoch length.
/// Passed explicitly rather than read from a global, per spec.md §9's
/// `CoreCtx` design note.
#[derive(Debug, Clone, Copy)]
pub struct ChainParams {
	/// Maximum accepted fork depth, in slots.
	pub k: u32,
	/// Number of slots per epoch.
	pub slots_per_epoch: u64,
}

impl ChainParams {
	/// Chain parameters built from `glint_core::consensus`'s defaults.
	pub fn default_params() -> ChainParams {
		ChainParams {
			k: glint_core::consensus::DEFAULT_K,
			slots_per_epoch: glint_core::consensus::SLOTS_PER_EPOCH,
		}
	}
}

/// Bundle of every collaborator the chain core needs, plus the tip
/// semaphore. Passed as `&self` to every C1-C4 entry point, replacing the
/// source's ambient `WorkMode` reader context (spec.md §9).
pub struct CoreCtx {
	/// The persistent block store.
	pub db: Arc<dyn BlockDb>,
	/// The wall-clock slotting service.
	pub slotting: Arc<dyn Slotting>,
	/// The transaction-validation subsystem.
	pub txp: Arc<dyn Txp>,
	/// The shared-secret-computation subsystem.
	pub ssc: Arc<dyn Ssc>,
	/// The header hashing collaborator.
	pub crypto: Arc<dyn Crypto>,
	/// The structural header/chain verifier.
	pub header_verify: Arc<dyn HeaderVerify>,
	/// Fixed chain parameters (`k`, `slots_per_epoch`).
	pub params: ChainParams,
	/// The tip semaphore (C5).
	pub semaphore: BlkSemaphore,
}

impl CoreCtx {
	/// Builds a new `CoreCtx` wired to the given collaborators. `initial_tip`
	/// seeds the tip semaphore; it must match `db.get_tip()`.
	pub fn new(
		db: Arc<dyn BlockDb>,
		slotting: Arc<dyn Slotting>,
		txp: Arc<dyn Txp>,
		ssc: Arc<dyn Ssc>,
		crypto: Arc<dyn Crypto>,
		header_verify: Arc<dyn HeaderVerify>,
		params: ChainParams,
		initial_tip: Hash,
	) -> CoreCtx {
		CoreCtx {
			db,
			slotting,
			txp,
			ssc,
			crypto,
			header_verify,
			params,
			semaphore: BlkSemaphore::new(initial_tip),
		}
	}
}

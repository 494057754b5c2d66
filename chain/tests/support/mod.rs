//! Shared test doubles for the chain crate's integration tests: an
//! in-memory `BlockDb`, and trivial always-succeed `Txp`/`Ssc`/`Slotting`
//! collaborators, plus a `Crypto`/`HeaderVerify` pair that implements the
//! `difficulty(h) = difficulty(parent(h)) + delta(h)` invariant from
//! spec.md §3 for real so classifier/verifier tests exercise genuine
//! checks rather than rubber stamps.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use glint_chain::types::{BlockDb, Crypto, HeaderVerify, Slotting, Ssc, Txp, VerifyOutcome, WriteBatch};
use glint_chain::{ChainParams, CoreCtx, Error, ErrorKind};
use glint_core::hash::{Hash, ZERO_HASH};
use glint_core::header::{BlockHeader, GenesisHeader, MainHeader, ConsensusProof};
use glint_core::slot::SlotId;
use glint_core::{Block, Difficulty, SscPayload, TxPayload, Undo};
use glint_util::Mutex;

/// A deterministic, non-cryptographic stand-in for the `Crypto` hash
/// collaborator (out of scope per spec.md §1). Good enough to distinguish
/// headers in a test fixture; never meant to resist adversarial input.
pub fn simple_hash(header: &BlockHeader) -> Hash {
	let bytes = glint_core::ser::ser_vec(header).expect("header always serializes");
	let mut digest = [0u8; 32];
	for (i, b) in bytes.iter().enumerate() {
		digest[i % 32] ^= b.wrapping_add(i as u8);
	}
	Hash::from_bytes(digest)
}

/// Builds the genesis header of epoch 0.
pub fn genesis_header() -> BlockHeader {
	BlockHeader::Genesis(GenesisHeader {
		epoch: 0,
		previous: ZERO_HASH,
		difficulty: Difficulty::zero(),
	})
}

/// Builds a main header extending `parent`, at `slot`.
pub fn main_header(parent: &BlockHeader, slot: SlotId) -> BlockHeader {
	BlockHeader::Main(MainHeader {
		slot,
		previous: simple_hash(parent),
		difficulty: parent.difficulty() + Difficulty::main_delta(),
		proof: ConsensusProof(vec![]),
	})
}

/// Wraps `header` into an otherwise-empty block.
pub fn empty_block(header: BlockHeader) -> Block {
	Block {
		header,
		transactions: TxPayload::default(),
		ssc: SscPayload::default(),
	}
}

#[derive(Default)]
struct Inner {
	tip: Hash,
	headers: HashMap<Hash, BlockHeader>,
	blocks: HashMap<Hash, Block>,
	in_main: HashMap<Hash, bool>,
}

/// In-memory `BlockDb`, grounded on the role `MemBlockDb` plays across
/// these tests: enough of a store to drive the chain core, nothing more.
pub struct MemBlockDb {
	inner: Arc<Mutex<Inner>>,
}

impl MemBlockDb {
	/// An empty store.
	pub fn new() -> MemBlockDb {
		MemBlockDb {
			inner: Arc::new(Mutex::new(Inner::default())),
		}
	}

	/// Inserts `block` directly, bypassing `begin_batch`. Used to seed
	/// fixtures before a test exercises the chain core itself.
	pub fn seed(&self, block: Block, in_main: bool) -> Hash {
		let hash = simple_hash(&block.header);
		let mut inner = self.inner.lock();
		inner.headers.insert(hash, block.header.clone());
		inner.in_main.insert(hash, in_main);
		inner.blocks.insert(hash, block);
		hash
	}

	/// Directly sets the tip, bypassing the semaphore. Used to seed
	/// fixtures.
	pub fn seed_tip(&self, hash: Hash) {
		self.inner.lock().tip = hash;
	}
}

#[async_trait]
impl BlockDb for MemBlockDb {
	async fn get_tip(&self) -> Result<Hash, Error> {
		Ok(self.inner.lock().tip)
	}

	async fn get_tip_block(&self) -> Result<Block, Error> {
		let inner = self.inner.lock();
		inner
			.blocks
			.get(&inner.tip)
			.cloned()
			.ok_or_else(|| ErrorKind::NotFound(inner.tip).into())
	}

	async fn get_block_header(&self, hash: &Hash) -> Result<Option<BlockHeader>, Error> {
		Ok(self.inner.lock().headers.get(hash).cloned())
	}

	async fn get_block(&self, hash: &Hash) -> Result<Option<Block>, Error> {
		Ok(self.inner.lock().blocks.get(hash).cloned())
	}

	async fn is_block_in_main_chain(&self, hash: &Hash) -> Result<bool, Error> {
		Ok(*self.inner.lock().in_main.get(hash).unwrap_or(&false))
	}

	async fn begin_batch(&self) -> Result<Box<dyn WriteBatch>, Error> {
		Ok(Box::new(MemWriteBatch {
			inner: self.inner.clone(),
		}))
	}
}

struct MemWriteBatch {
	inner: Arc<Mutex<Inner>>,
}

#[async_trait]
impl WriteBatch for MemWriteBatch {
	async fn set_block_in_main_chain(&mut self, hash: &Hash, in_main: bool) -> Result<(), Error> {
		self.inner.lock().in_main.insert(*hash, in_main);
		Ok(())
	}

	async fn put_block(&mut self, _undo: &Undo, in_main: bool, block: &Block) -> Result<(), Error> {
		let hash = simple_hash(&block.header);
		let mut inner = self.inner.lock();
		inner.headers.insert(hash, block.header.clone());
		inner.blocks.insert(hash, block.clone());
		inner.in_main.insert(hash, in_main);
		Ok(())
	}

	async fn set_tip(&mut self, hash: &Hash) -> Result<(), Error> {
		self.inner.lock().tip = *hash;
		Ok(())
	}

	async fn commit(self: Box<Self>) -> Result<(), Error> {
		Ok(())
	}
}

/// A `Slotting` double whose current slot is set directly by the test.
pub struct FixedSlotting {
	slot: Mutex<SlotId>,
}

impl FixedSlotting {
	/// Builds a `FixedSlotting` starting at `slot`.
	pub fn new(slot: SlotId) -> FixedSlotting {
		FixedSlotting {
			slot: Mutex::new(slot),
		}
	}

	/// Advances (or rewinds) the current slot.
	pub fn set(&self, slot: SlotId) {
		*self.slot.lock() = slot;
	}
}

#[async_trait]
impl Slotting for FixedSlotting {
	async fn get_current_slot(&self) -> SlotId {
		*self.slot.lock()
	}
}

/// A `Txp` double that always succeeds, producing an empty `Undo` per
/// block.
pub struct AlwaysOkTxp;

#[async_trait]
impl Txp for AlwaysOkTxp {
	async fn tx_verify_blocks(&self, blocks: &[Block]) -> Result<Vec<Undo>, String> {
		Ok(blocks.iter().map(|_| Undo::default()).collect())
	}

	async fn tx_apply_blocks(&self, _blocks: &[Block]) -> Result<(), Error> {
		Ok(())
	}

	async fn tx_rollback_blocks(&self, _pairs: &[(Block, Undo)]) -> Result<(), Error> {
		Ok(())
	}
}

/// An `Ssc` double that always succeeds.
pub struct AlwaysOkSsc;

#[async_trait]
impl Ssc for AlwaysOkSsc {
	async fn ssc_verify_blocks(&self, _blocks: &[Block]) -> Result<(), String> {
		Ok(())
	}

	async fn ssc_apply_blocks(&self, _blocks: &[Block]) -> Result<(), Error> {
		Ok(())
	}

	async fn ssc_rollback(&self, _pairs: &[(Block, Undo)]) -> Result<(), Error> {
		Ok(())
	}
}

/// The `Crypto` double backing [`simple_hash`].
pub struct SimpleCrypto;

impl Crypto for SimpleCrypto {
	fn hash_header(&self, header: &BlockHeader) -> Hash {
		simple_hash(header)
	}
}

/// A `HeaderVerify` double that actually enforces the difficulty and
/// linkage invariants from spec.md §3, so classifier/verifier tests
/// exercise real checks.
pub struct SimpleHeaderVerify;

#[async_trait]
impl HeaderVerify for SimpleHeaderVerify {
	async fn verify_header(
		&self,
		parent: &BlockHeader,
		header: &BlockHeader,
		_require_consensus: bool,
	) -> VerifyOutcome {
		let delta = if header.is_genesis() {
			Difficulty::genesis_delta()
		} else {
			Difficulty::main_delta()
		};
		if header.difficulty() != parent.difficulty() + delta {
			return VerifyOutcome::Failure(vec!["difficulty does not follow parent".to_string()]);
		}
		VerifyOutcome::Success
	}

	async fn verify_headers(
		&self,
		_require_consensus: bool,
		headers: &[BlockHeader],
	) -> VerifyOutcome {
		for pair in headers.windows(2) {
			let (newer, older) = (&pair[0], &pair[1]);
			if newer.previous() != simple_hash(older) {
				return VerifyOutcome::Failure(vec!["header linkage mismatch".to_string()]);
			}
			let delta = if newer.is_genesis() {
				Difficulty::genesis_delta()
			} else {
				Difficulty::main_delta()
			};
			if newer.difficulty() != older.difficulty() + delta {
				return VerifyOutcome::Failure(vec!["difficulty does not follow parent".to_string()]);
			}
		}
		VerifyOutcome::Success
	}

	async fn verify_block_chain(
		&self,
		blocks: &[Block],
		_current_slot: Option<SlotId>,
	) -> VerifyOutcome {
		for pair in blocks.windows(2) {
			let (older, newer) = (&pair[0], &pair[1]);
			if newer.header.previous() != simple_hash(&older.header) {
				return VerifyOutcome::Failure(vec!["block chain linkage mismatch".to_string()]);
			}
		}
		VerifyOutcome::Success
	}
}

/// A fully wired `CoreCtx` plus the empty `MemBlockDb` and `FixedSlotting`
/// backing it, for tests that want to build their own fixture from
/// scratch.
pub fn new_ctx(k: u32, initial_tip: Hash) -> (CoreCtx, Arc<MemBlockDb>, Arc<FixedSlotting>) {
	let db = Arc::new(MemBlockDb::new());
	let slotting = Arc::new(FixedSlotting::new(SlotId::new(0, 0)));
	let ctx = CoreCtx::new(
		db.clone(),
		slotting.clone(),
		Arc::new(AlwaysOkTxp),
		Arc::new(AlwaysOkSsc),
		Arc::new(SimpleCrypto),
		Arc::new(SimpleHeaderVerify),
		ChainParams {
			k,
			slots_per_epoch: glint_core::consensus::SLOTS_PER_EPOCH,
		},
		initial_tip,
	);
	(ctx, db, slotting)
}

/// Builds a straight-line main chain of `len` blocks on top of genesis,
/// seeded directly into a fresh `MemBlockDb`, and a `CoreCtx` wired to it
/// with the tip at the chain's head. Slot numbers are `1..=len`. Returns
/// the ctx, the db, the slotting double, and the headers oldest-first
/// (genesis included).
pub fn build_straight_chain(
	len: u64,
	k: u32,
) -> (CoreCtx, Arc<MemBlockDb>, Arc<FixedSlotting>, Vec<BlockHeader>) {
	let (ctx, db, slotting) = new_ctx(k, ZERO_HASH);
	let genesis = genesis_header();
	let mut headers = vec![genesis.clone()];
	db.seed(empty_block(genesis.clone()), true);
	let mut tip_hash = simple_hash(&genesis);
	db.seed_tip(tip_hash);

	let mut previous = genesis;
	for i in 1..=len {
		let header = main_header(&previous, SlotId::new(0, i));
		tip_hash = db.seed(empty_block(header.clone()), true);
		headers.push(header.clone());
		previous = header;
	}
	db.seed_tip(tip_hash);

	(ctx, db, slotting, headers)
}

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

//! C1: chain queries (spec.md §4.1) — ancestor search against the main
//! chain, bounded header/block range loads, and the exponential locator.
//!
//! Every walk here is iterative and bounded by either a checkpoint, the
//! genesis sentinel hash, or `k`, per the "recursive in-memory chain walks"
//! design note (spec.md §9): none of these ever recurse.

use std::collections::HashSet;

use glint_core::hash::{Hash, ZERO_HASH};
use glint_core::header::BlockHeader;
use glint_core::Block;

use crate::error::{Error, ErrorKind};
use crate::types::CoreCtx;

/// `lcaWithMainChain` (spec.md §4.1.1).
///
/// `headers` is newest-first and nonempty. Returns the hash of the newest
/// element already on the main chain, or the parent of the oldest element
/// as a last resort, or `None` if even that parent is unknown locally.
pub async fn lca_with_main_chain(
	ctx: &CoreCtx,
	headers: &[BlockHeader],
) -> Result<Option<Hash>, Error> {
	assert!(!headers.is_empty(), "lca_with_main_chain requires a nonempty sequence");

	let mut candidates: Vec<Hash> = headers.iter().map(|h| ctx.crypto.hash_header(h)).collect();
	candidates.push(headers[headers.len() - 1].previous());

	for candidate in candidates {
		if ctx.db.is_block_in_main_chain(&candidate).await? {
			return Ok(Some(candidate));
		}
	}
	Ok(None)
}

/// `retrieveHeadersFromTo` (spec.md §4.1.2). Returns oldest-first headers
/// starting just above the newest checkpoint reached (exclusive) up to
/// `start_from` (inclusive), or to genesis if no checkpoint is ever
/// reached.
pub async fn retrieve_headers_from_to(
	ctx: &CoreCtx,
	checkpoints: &[Hash],
	start_from: Option<Hash>,
) -> Result<Vec<BlockHeader>, Error> {
	let mut checkpoint_slots = Vec::new();
	for checkpoint in checkpoints {
		if let Some(header) = ctx.db.get_block_header(checkpoint).await? {
			checkpoint_slots.push(header.epoch_or_slot());
		}
	}

	let start_header = match start_from {
		Some(hash) => ctx
			.db
			.get_block_header(&hash)
			.await?
			.ok_or_else(|| ErrorKind::NotFound(hash))?,
		None => ctx.db.get_tip_block().await?.header,
	};

	let mut accumulated = Vec::new();
	let mut current = start_header;
	let mut reached_checkpoint;
	loop {
		if checkpoint_slots.iter().any(|s| *s == current.epoch_or_slot()) {
			reached_checkpoint = true;
			break;
		}
		let previous = current.previous();
		accumulated.push(current);
		if previous == ZERO_HASH {
			reached_checkpoint = false;
			break;
		}
		current = ctx
			.db
			.get_block_header(&previous)
			.await?
			.ok_or_else(|| ErrorKind::NotFound(previous))?;
	}

	if reached_checkpoint {
		if let Some(last) = accumulated.last() {
			let checkpoint_hash = last.previous();
			if let Some(checkpoint_header) = ctx.db.get_block_header(&checkpoint_hash).await? {
				accumulated.push(checkpoint_header);
			}
		}
	}

	accumulated.reverse();
	Ok(accumulated)
}

/// `getHeadersOlderExp` (spec.md §4.1.3). Returns up to `k+2` hashes
/// sampled at depths `{0, 1, 2, 4, …, 2^n < k, k}`, newest-first, measured
/// from `upto` (or the current tip).
pub async fn get_headers_older_exp(ctx: &CoreCtx, upto: Option<Hash>) -> Result<Vec<Hash>, Error> {
	let k = u64::from(ctx.params.k);

	let mut depths = vec![0u64];
	let mut power = 1u64;
	while power < k {
		depths.push(power);
		power *= 2;
	}
	depths.push(k);
	let wanted: HashSet<u64> = depths.iter().copied().collect();
	let max_depth = *depths.last().unwrap();

	let start_hash = match upto {
		Some(hash) => hash,
		None => ctx.db.get_tip().await?,
	};
	let mut current_hash = start_hash;
	let mut current_header = ctx
		.db
		.get_block_header(&current_hash)
		.await?
		.ok_or_else(|| ErrorKind::NotFound(current_hash))?;

	let mut result = Vec::new();
	let mut depth = 0u64;
	loop {
		if wanted.contains(&depth) {
			result.push(current_hash);
		}
		if depth >= max_depth {
			break;
		}
		let previous = current_header.previous();
		if previous == ZERO_HASH {
			break;
		}
		current_header = match ctx.db.get_block_header(&previous).await? {
			Some(h) => h,
			None => break,
		};
		current_hash = previous;
		depth += 1;
	}
	Ok(result)
}

/// `getBlocksByHeaders` (spec.md §4.1.4). Returns `[newer, …, older]`
/// (newest-first) when both endpoints exist and `newer`'s height is at
/// least `older`'s; `None` otherwise.
pub async fn get_blocks_by_headers(
	ctx: &CoreCtx,
	older: Hash,
	newer: Hash,
) -> Result<Option<Vec<Block>>, Error> {
	let older_header = match ctx.db.get_block_header(&older).await? {
		Some(h) => h,
		None => return Ok(None),
	};
	let mut current = match ctx.db.get_block(&newer).await? {
		Some(b) => b,
		None => return Ok(None),
	};

	if current.header.epoch_or_slot() < older_header.epoch_or_slot() {
		return Ok(None);
	}

	let mut result = Vec::new();
	loop {
		let current_hash = ctx.crypto.hash_header(&current.header);
		let is_older = current_hash == older;
		result.push(current.clone());
		if is_older {
			return Ok(Some(result));
		}
		if !(current.header.epoch_or_slot() > older_header.epoch_or_slot()) {
			return Ok(None);
		}
		let previous = current.header.previous();
		current = match ctx.db.get_block(&previous).await? {
			Some(b) => b,
			None => return Ok(None),
		};
	}
}

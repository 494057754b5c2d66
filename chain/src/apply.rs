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

//! C4: atomic apply/rollback of a verified block sequence (spec.md §4.4).
//!
//! Both entry points assume their caller already verified the sequence and
//! is holding the tip semaphore (spec.md §4.4, "Precondition"); `lib.rs`'s
//! `apply_blocks_under_semaphore`/`rollback_blocks_under_semaphore` are the
//! only callers expected in practice.
//!
//! The store write (`BlockDb::begin_batch`/`WriteBatch::commit`) is the
//! transactional boundary spec.md §9 requires — every block-plus-undo
//! write and the tip update land in one batch. Txp/Ssc folding happens
//! after that batch commits, since `verify_blocks` already ran
//! `txVerifyBlocks`/`sscVerifyBlocks` against this exact sequence and a
//! failure here would mean a collaborator broke its own precondition; that
//! is treated as fatal and poisons the tip semaphore (spec.md §5,
//! "semaphore restore failure") rather than leaving an ambiguous tip.

use log::info;

use glint_core::Block;
use glint_core::Undo;

use crate::error::Error;
use crate::types::CoreCtx;

/// `applyBlocks` (spec.md §4.4). `pairs` is oldest-first.
pub async fn apply_blocks(ctx: &CoreCtx, pairs: &[(Block, Undo)]) -> Result<(), Error> {
	assert!(!pairs.is_empty(), "apply_blocks requires a nonempty sequence");

	let mut batch = ctx.db.begin_batch().await?;
	for (block, undo) in pairs {
		batch.put_block(undo, true, block).await?;
	}
	let new_tip = ctx.crypto.hash_header(&pairs[pairs.len() - 1].0.header);
	batch.set_tip(&new_tip).await?;
	batch.commit().await?;
	info!("applied {} block(s), new tip {}", pairs.len(), new_tip);

	let blocks: Vec<Block> = pairs.iter().map(|(b, _)| b.clone()).collect();
	if let Err(e) = ctx.txp.tx_apply_blocks(&blocks).await {
		ctx.semaphore
			.poison(format!("txp failed to apply an already-verified sequence: {}", e))
			.await;
		return Err(e);
	}
	if let Err(e) = ctx.ssc.ssc_apply_blocks(&blocks).await {
		ctx.semaphore
			.poison(format!("ssc failed to apply an already-verified sequence: {}", e))
			.await;
		return Err(e);
	}
	Ok(())
}

/// `rollbackBlocks` (spec.md §4.4). `pairs` is newest-first (head is the
/// current tip).
pub async fn rollback_blocks(ctx: &CoreCtx, pairs: &[(Block, Undo)]) -> Result<(), Error> {
	assert!(!pairs.is_empty(), "rollback_blocks requires a nonempty sequence");

	if let Err(e) = ctx.txp.tx_rollback_blocks(pairs).await {
		ctx.semaphore
			.poison(format!("txp failed to roll back an already-applied sequence: {}", e))
			.await;
		return Err(e);
	}

	let mut batch = ctx.db.begin_batch().await?;
	for (block, _undo) in pairs {
		let hash = ctx.crypto.hash_header(&block.header);
		batch.set_block_in_main_chain(&hash, false).await?;
	}
	let new_tip = pairs[pairs.len() - 1].0.previous();
	batch.set_tip(&new_tip).await?;
	batch.commit().await?;
	info!("rolled back {} block(s), new tip {}", pairs.len(), new_tip);

	if let Err(e) = ctx.ssc.ssc_rollback(pairs).await {
		ctx.semaphore
			.poison(format!("ssc failed to roll back an already-applied sequence: {}", e))
			.await;
		return Err(e);
	}
	Ok(())
}

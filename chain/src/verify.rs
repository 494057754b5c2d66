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

//! C3: the block verifier (spec.md §4.3) — cheap local checks first, then
//! SSC, then the UTXO-dependent transaction checks whose byproduct is the
//! `Undo` sequence apply/rollback need.

use glint_core::Block;
use glint_core::Undo;

use crate::error::{join_errors, Error};
use crate::types::{CoreCtx, VerifyOutcome};

/// `verifyBlocks` (spec.md §4.3). `blocks` is a nonempty oldest-first
/// sequence. On success, returns one `Undo` per block, in the same order.
pub async fn verify_blocks(ctx: &CoreCtx, blocks: &[Block]) -> Result<Vec<Undo>, Error> {
	assert!(!blocks.is_empty(), "verify_blocks requires a nonempty sequence");

	let current_slot = ctx.slotting.get_current_slot().await;

	let tip = ctx.db.get_tip().await?;
	if blocks[0].previous() != tip {
		return Err(join_errors(&[
			"oldest block does not extend the current tip".to_string()
		]));
	}

	match ctx
		.header_verify
		.verify_block_chain(blocks, Some(current_slot))
		.await
	{
		VerifyOutcome::Success => {}
		VerifyOutcome::Failure(messages) => return Err(join_errors(&messages)),
	}

	if let Err(message) = ctx.ssc.ssc_verify_blocks(blocks).await {
		return Err(join_errors(&[message]));
	}

	match ctx.txp.tx_verify_blocks(blocks).await {
		Ok(undos) => Ok(undos),
		Err(message) => Err(join_errors(&[message])),
	}
}

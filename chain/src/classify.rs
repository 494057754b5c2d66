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

//! C2: the header classifier (spec.md §4.2) — decides what an incoming
//! header or header sequence means relative to local chain state, without
//! touching persistent state.

use glint_core::hash::Hash;
use glint_core::header::BlockHeader;

use crate::error::{Error, ErrorKind};
use crate::queries::lca_with_main_chain;
use crate::types::{CoreCtx, VerifyOutcome};

/// Outcome of classifying a single incoming header (spec.md §4.2.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderClass {
	/// Extends the current tip.
	Continues,
	/// A valid continuation of a fork strictly more difficult than main.
	Alternative,
	/// Not an error: the header is locally irrelevant.
	Useless(String),
	/// The header is structurally wrong.
	Invalid(String),
}

/// Outcome of classifying a newest-first header sequence (spec.md §4.2.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadersClass {
	/// The sequence is a valid extension attaching at the returned header.
	Valid(BlockHeader),
	/// Not an error: the sequence is locally irrelevant.
	Useless(String),
	/// The sequence is structurally wrong.
	Invalid(String),
}

/// `classifyNewHeader` (spec.md §4.2.1).
pub async fn classify_new_header(ctx: &CoreCtx, header: &BlockHeader) -> Result<HeaderClass, Error> {
	if header.is_genesis() {
		return Ok(HeaderClass::Useless("genesis header is useless".to_string()));
	}

	let current_slot = ctx.slotting.get_current_slot().await;
	let header_slot = match header.epoch_or_slot() {
		glint_core::EpochOrSlot::Slot(s) => s,
		glint_core::EpochOrSlot::Epoch(_) => unreachable!("genesis headers handled above"),
	};
	if header_slot != current_slot {
		return Ok(HeaderClass::Useless("header is not for current slot".to_string()));
	}

	let tip_hash = ctx.db.get_tip().await?;
	let tip_block = ctx.db.get_tip_block().await?;

	if header.previous() == tip_hash {
		let outcome = ctx
			.header_verify
			.verify_header(&tip_block.header, header, true)
			.await;
		return Ok(match outcome {
			VerifyOutcome::Success => HeaderClass::Continues,
			VerifyOutcome::Failure(messages) => HeaderClass::Invalid(messages.join("; ")),
		});
	}

	if tip_block.header.difficulty() < header.difficulty() {
		return Ok(HeaderClass::Alternative);
	}

	Ok(HeaderClass::Useless(
		"header doesn't continue main chain and is not more difficult".to_string(),
	))
}

/// `classifyHeaders` (spec.md §4.2.2). `headers` is newest-first and
/// nonempty.
pub async fn classify_headers(ctx: &CoreCtx, headers: &[BlockHeader]) -> Result<HeadersClass, Error> {
	assert!(!headers.is_empty(), "classify_headers requires a nonempty sequence");

	let oldest = &headers[headers.len() - 1];
	let oldest_hash = ctx.crypto.hash_header(oldest);
	if ctx.db.get_block_header(&oldest_hash).await?.is_none() {
		return Ok(HeadersClass::Invalid(
			"Last block of the passed chain wasn't found locally".to_string(),
		));
	}

	for pair in headers.windows(2) {
		let (newer, older) = (&pair[0], &pair[1]);
		if newer.previous() != ctx.crypto.hash_header(older) {
			return Ok(HeadersClass::Invalid("Header chain is invalid".to_string()));
		}
	}
	match ctx.header_verify.verify_headers(true, headers).await {
		VerifyOutcome::Success => {}
		VerifyOutcome::Failure(_) => {
			return Ok(HeadersClass::Invalid("Header chain is invalid".to_string()));
		}
	}

	let lca = lca_with_main_chain(ctx, headers).await?.ok_or_else(|| {
		Error::from(ErrorKind::InvariantViolation(
			"no LCA found for a header chain whose last block is known locally".to_string(),
		))
	})?;
	let lca_header = ctx
		.db
		.get_block_header(&lca)
		.await?
		.ok_or_else(|| ErrorKind::NotFound(lca))?;

	let tip_header = ctx.db.get_tip_block().await?.header;
	let tip_depth = tip_header.epoch_or_slot().flatten() as i128;
	let lca_depth = lca_header.epoch_or_slot().flatten() as i128;
	let depth_diff = tip_depth - lca_depth;

	if depth_diff < 0 {
		return Err(ErrorKind::InvariantViolation(format!(
			"lca at depth {} is deeper than tip at depth {}",
			lca_depth, tip_depth
		))
		.into());
	}

	let k = i128::from(ctx.params.k);
	if depth_diff > k {
		return Ok(HeadersClass::Useless(format!(
			"Slot difference of (tip,lca) is {} which is more than k = {}",
			depth_diff, ctx.params.k
		)));
	}

	let tip_hash: Hash = ctx.crypto.hash_header(&tip_header);
	if lca == tip_hash {
		return Ok(HeadersClass::Valid(tip_header));
	}

	let lca_child = headers
		.iter()
		.find(|h| h.previous() == lca)
		.cloned()
		.ok_or_else(|| {
			ErrorKind::InvariantViolation(
				"no supplied header attaches at the resolved lca".to_string(),
			)
		})?;
	Ok(HeadersClass::Valid(lca_child))
}

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

//! Block-chain logic core: header classification, ancestor search, block
//! verification, and atomic apply/rollback of the tip, guarded by a
//! single-writer tip semaphore.
//!
//! The five components map onto five modules: [`queries`] (ancestor
//! search, range loads, the locator), [`classify`] (header classification),
//! [`verify`] (block-sequence verification), [`apply`] (apply/rollback),
//! and [`semaphore`] (tip mutual exclusion). [`types`] holds the
//! collaborator traits and the `CoreCtx` every entry point is driven
//! through.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate failure_derive;

pub mod apply;
pub mod classify;
pub mod error;
pub mod queries;
pub mod semaphore;
pub mod types;
pub mod verify;

pub use classify::{classify_headers, classify_new_header, HeaderClass, HeadersClass};
pub use error::{Error, ErrorKind};
pub use queries::{get_blocks_by_headers, get_headers_older_exp, lca_with_main_chain, retrieve_headers_from_to};
pub use semaphore::BlkSemaphore;
pub use types::{BlockDb, ChainParams, CoreCtx, Crypto, HeaderVerify, Slotting, Ssc, Txp, VerifyOutcome, WriteBatch};
pub use verify::verify_blocks;

use glint_core::{Block, Undo};

/// Runs [`apply::apply_blocks`] under the tip semaphore, satisfying its
/// precondition that the semaphore be held for the duration of the write
/// (spec.md §4.4, §4.5). This is the only sanctioned way to call
/// `apply_blocks` outside of tests.
pub async fn apply_blocks_under_semaphore(
	ctx: &CoreCtx,
	pairs: Vec<(Block, Undo)>,
) -> Result<(), Error> {
	ctx.semaphore
		.with_blk_semaphore(|_old_tip| async move {
			apply::apply_blocks(ctx, &pairs).await?;
			let new_tip = ctx.crypto.hash_header(&pairs[pairs.len() - 1].0.header);
			Ok(((), new_tip))
		})
		.await
}

/// Runs [`apply::rollback_blocks`] under the tip semaphore (spec.md §4.4,
/// §4.5).
pub async fn rollback_blocks_under_semaphore(
	ctx: &CoreCtx,
	pairs: Vec<(Block, Undo)>,
) -> Result<(), Error> {
	ctx.semaphore
		.with_blk_semaphore(|_old_tip| async move {
			apply::rollback_blocks(ctx, &pairs).await?;
			let new_tip = pairs[pairs.len() - 1].0.previous();
			Ok(((), new_tip))
		})
		.await
}

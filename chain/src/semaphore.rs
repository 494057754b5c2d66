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

//! C5: the tip semaphore (spec.md §4.5).
//!
//! `grin_chain::Chain` guards its notion of the current head with an
//! `Arc<Mutex<Tip>>` (`chain.rs`); `BlkSemaphore` generalizes that into the
//! take/put contract spec.md asks for, with restore-on-failure implemented
//! as a scope guard rather than left to call sites to remember.

use std::future::Future;

use glint_core::hash::Hash;
use tokio::sync::Mutex;

use crate::error::{Error, ErrorKind};

enum SemaphoreState {
	/// The semaphore is free; the chain's current tip is `Hash`.
	Available(Hash),
	/// A prior holder could not be restored to a consistent tip. Every
	/// subsequent `with_blk_semaphore` call fails until the process
	/// restarts and re-derives the tip from the store (spec.md §5,
	/// "semaphore restore failure").
	Poisoned(String),
}

/// Single-writer mutual exclusion around the chain tip.
pub struct BlkSemaphore {
	state: Mutex<SemaphoreState>,
}

impl BlkSemaphore {
	/// Builds a semaphore already holding `initial_tip`.
	pub fn new(initial_tip: Hash) -> BlkSemaphore {
		BlkSemaphore {
			state: Mutex::new(SemaphoreState::Available(initial_tip)),
		}
	}

	/// Runs `f` with exclusive access to the current tip.
	///
	/// `f` receives the tip hash held at the time of the call and must
	/// return the new tip hash alongside its result. If `f` returns `Err`,
	/// or panics, the semaphore is restored to the tip it held before the
	/// call — callers never observe a half-applied tip change.
	pub async fn with_blk_semaphore<F, Fut, T>(&self, f: F) -> Result<T, Error>
	where
		F: FnOnce(Hash) -> Fut,
		Fut: Future<Output = Result<(T, Hash), Error>>,
	{
		let mut slot = self.state.lock().await;
		let original = match &*slot {
			SemaphoreState::Available(hash) => *hash,
			SemaphoreState::Poisoned(reason) => {
				return Err(ErrorKind::SemaphorePoisoned(reason.clone()).into());
			}
		};

		let mut guard = TipGuard {
			slot: &mut slot,
			original,
			committed: false,
		};

		match f(original).await {
			Ok((result, new_tip)) => {
				guard.commit(new_tip);
				Ok(result)
			}
			Err(e) => {
				// `guard`'s Drop restores `original` before we return.
				drop(guard);
				Err(e)
			}
		}
	}

	/// The tip currently held by the semaphore, without taking it.
	pub async fn peek(&self) -> Result<Hash, Error> {
		match &*self.state.lock().await {
			SemaphoreState::Available(hash) => Ok(*hash),
			SemaphoreState::Poisoned(reason) => Err(ErrorKind::SemaphorePoisoned(reason.clone()).into()),
		}
	}

	/// Marks the semaphore poisoned: no further tip could be safely
	/// restored after a failure (spec.md §5). Used by the apply/rollback
	/// engine when a rollback itself fails mid-way, leaving the store in
	/// a state this process can no longer vouch for.
	pub async fn poison(&self, reason: String) {
		*self.state.lock().await = SemaphoreState::Poisoned(reason);
	}
}

struct TipGuard<'a> {
	slot: &'a mut SemaphoreState,
	original: Hash,
	committed: bool,
}

impl<'a> TipGuard<'a> {
	fn commit(&mut self, new_tip: Hash) {
		*self.slot = SemaphoreState::Available(new_tip);
		self.committed = true;
	}
}

impl<'a> Drop for TipGuard<'a> {
	fn drop(&mut self) {
		if !self.committed {
			*self.slot = SemaphoreState::Available(self.original);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hash(b: u8) -> Hash {
		Hash::from_bytes([b; 32])
	}

	#[tokio::test]
	async fn successful_call_advances_the_tip() {
		let sem = BlkSemaphore::new(hash(1));
		let result = sem
			.with_blk_semaphore(|_current| async move { Ok((42, hash(2))) })
			.await
			.unwrap();
		assert_eq!(result, 42);
		assert_eq!(sem.peek().await.unwrap(), hash(2));
	}

	#[tokio::test]
	async fn failed_call_restores_the_original_tip() {
		let sem = BlkSemaphore::new(hash(1));
		let err = sem
			.with_blk_semaphore(|_current| async move {
				Err::<((), Hash), Error>(ErrorKind::Store("boom".into()).into())
			})
			.await;
		assert!(err.is_err());
		assert_eq!(sem.peek().await.unwrap(), hash(1));
	}

	#[tokio::test]
	async fn poisoned_semaphore_rejects_further_calls() {
		let sem = BlkSemaphore::new(hash(1));
		sem.poison("rollback failed".to_string()).await;
		let err = sem
			.with_blk_semaphore(|current| async move { Ok(((), current)) })
			.await
			.unwrap_err();
		assert_eq!(
			format!("{}", err.kind()),
			"Tip semaphore restore failed: rollback failed"
		);
	}
}

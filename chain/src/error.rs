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

//! Error types for the chain-logic core.
//!
//! Rejection of a header/block as structurally invalid or as merely useless
//! (spec.md §5, "usefulness rejection is informational, not an error") is
//! carried through `HeaderClass`/`HeadersClass`/`VerifyOutcome`, not through
//! `Error`. `Error` is reserved for what spec.md §5 calls fatal conditions:
//! missing local data the caller promised was present, collaborator
//! failures, and invariant violations.

use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

use glint_core::hash::Hash;

/// Error definition for the chain-logic core.
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// Chain-logic error kinds (spec.md §5).
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// A hash the caller expected to already be present in the store was
	/// not found (spec.md §5, "missing local data").
	#[fail(display = "Block or header not found locally: {}", _0)]
	NotFound(Hash),
	/// `apply_blocks`/`rollback_blocks` was asked to act on a block whose
	/// parent is not the current tip.
	#[fail(display = "Block {} does not extend the current tip", _0)]
	TipMismatch(Hash),
	/// A structural invariant the chain core itself is responsible for
	/// maintaining was found violated (spec.md §5, "fatal invariant
	/// violations"). This should never happen in a correctly driven core;
	/// seeing it means the caller or the store broke a precondition.
	#[fail(display = "Invariant violated: {}", _0)]
	InvariantViolation(String),
	/// The tip semaphore could not be restored to its prior value after a
	/// failed operation (spec.md §5, "semaphore restore failure") — the
	/// semaphore is now poisoned and every subsequent `with_blk_semaphore`
	/// call will fail until the process is restarted.
	#[fail(display = "Tip semaphore restore failed: {}", _0)]
	SemaphorePoisoned(String),
	/// The underlying block store reported a failure.
	#[fail(display = "Store error: {}", _0)]
	Store(String),
	/// The underlying binary encoding failed.
	#[fail(display = "Serialization error: {}", _0)]
	Ser(String),
	/// One or more collaborator calls failed; each entry is one failure
	/// message, joined with `; ` by `join_errors` so the combined text is
	/// stable and can be asserted on in tests (spec.md §9, "Joined error
	/// text should be stable").
	#[fail(display = "{}", _0)]
	Joined(String),
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Error {
	/// The error's kind.
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}

	/// The error's cause, if any.
	pub fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	/// The error's backtrace, if any.
	pub fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}

impl From<glint_core::ser::Error> for Error {
	fn from(e: glint_core::ser::Error) -> Error {
		Error {
			inner: Context::new(ErrorKind::Ser(format!("{}", e))),
		}
	}
}

/// Joins a non-empty list of failure messages into the single stable,
/// semicolon-separated string spec.md §9 asks for, and wraps it as an
/// `ErrorKind::Joined`.
///
/// # Panics
///
/// Panics if `messages` is empty; callers only invoke this once they know
/// at least one stage produced a failure.
pub fn join_errors(messages: &[String]) -> Error {
	assert!(!messages.is_empty(), "join_errors called with no messages");
	ErrorKind::Joined(messages.join("; ")).into()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn join_errors_is_semicolon_separated_and_stable() {
		let err = join_errors(&["a failed".to_string(), "b failed".to_string()]);
		assert_eq!(format!("{}", err.kind()), "a failed; b failed");
	}
}

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

//! Errors the flow engine can raise: the `InvalidBlockStatus` family from
//! header/block validation, `MissingDeps` for blocks that arrived ahead of
//! their dependencies, and storage failures bubbled up from `chain`.

use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

use core::hash::Hash;

/// Why header or block validation rejected (or deferred) a candidate.
/// All variants are terminal for the offending block except `FutureBlock`,
/// which is retried once its timestamp becomes reachable.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum InvalidStatus {
	/// `ChainIndex::from(hash(header))` doesn't match the chain it was
	/// routed to.
	#[fail(display = "header does not belong to the expected group")]
	InvalidGroup,
	/// `blockDeps.len() != 2G-1`.
	#[fail(display = "expected {} block deps, got {}", expected, got)]
	InvalidDepsNum {
		/// `2G-1` for the running network.
		expected: usize,
		/// The number actually present.
		got: usize,
	},
	/// Deps are not unique, or a header depends on itself.
	#[fail(display = "block deps contain a duplicate or self-reference")]
	InvalidDeps,
	/// Timestamp regressed relative to the parent.
	#[fail(display = "timestamp is not monotone with respect to the parent")]
	InvalidTimestamp,
	/// Timestamp is further in the future than `max_clock_drift_millis`
	/// allows. Retryable: held in the not-yet queue until reachable.
	#[fail(display = "timestamp {} is too far in the future", _0)]
	FutureBlock(i64),
	/// `hash(header) >= target`.
	#[fail(display = "proof of work does not meet the target")]
	InvalidPoW,
	/// The header's claimed target doesn't match what the flow would
	/// compute for this parent.
	#[fail(display = "target does not match the expected retarget")]
	InvalidTarget,
	/// `transactions` is empty.
	#[fail(display = "block has no transactions")]
	EmptyTransactionList,
	/// The last transaction isn't shaped like a valid coinbase.
	#[fail(display = "invalid coinbase format")]
	InvalidCoinbaseFormat,
	/// The coinbase output doesn't pay the expected subsidy.
	#[fail(display = "coinbase reward {} does not match expected {}", got, expected)]
	InvalidCoinbaseReward {
		/// Reward the coinbase actually pays.
		got: u64,
		/// Reward `consensus::miner_reward(height)` expects.
		expected: u64,
	},
	/// The transactions' Merkle root doesn't match `header.tx_root_hash`.
	#[fail(display = "transaction root does not match header")]
	InvalidTxRoot,
	/// A non-coinbase transaction failed its own validation (signature,
	/// missing input, unbalanced sum, or VM execution).
	#[fail(display = "transaction invalid: {}", _0)]
	InvalidTx(String),
}

/// Top-level flow engine error: a validation rejection, a not-yet-reachable
/// dependency set, or a storage failure propagated from `chain`.
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// The kinds of failure `BlockFlow` operations can produce.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// Header or block validation rejected the candidate.
	#[fail(display = "invalid: {}", _0)]
	Invalid(InvalidStatus),
	/// One or more of the block's deps aren't locally present yet. The
	/// block should be cached and retried once they arrive.
	#[fail(display = "missing {} dependencies", _0.len())]
	MissingDeps(Vec<Hash>),
	/// The coinbase output's destination group couldn't be read, so no
	/// chain index could be derived for this block.
	#[fail(display = "block has no coinbase output to route by")]
	NoCoinbase,
	/// A lookup for a hash that isn't present on any of the `G^2` chains.
	#[fail(display = "hash not found on any chain: {}", _0)]
	HashNotFound(Hash),
	/// The underlying per-chain storage failed.
	#[fail(display = "storage error: {}", _0)]
	Storage(String),
	/// A `FetchRequest`'s `to_ts` came before its `from_ts`.
	#[fail(display = "`toTs` cannot be before `fromTs`")]
	FetchRangeInverted,
	/// A `FetchRequest`'s span exceeded `blockflow_fetch_max_age_millis`.
	#[fail(display = "interval cannot be greater than {} ms", _0)]
	FetchRangeTooWide(i64),
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Error {
	/// The error kind, cloned out of the backtrace context.
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}

	/// Shorthand for constructing an `Invalid` error.
	pub fn invalid(status: InvalidStatus) -> Error {
		ErrorKind::Invalid(status).into()
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

impl From<chain::Error> for Error {
	fn from(e: chain::Error) -> Error {
		ErrorKind::Storage(format!("{}", e)).into()
	}
}

impl Error {
	/// Backtrace captured at construction.
	pub fn backtrace(&self) -> Option<&Backtrace> {
		Some(self.inner.backtrace())
	}
}

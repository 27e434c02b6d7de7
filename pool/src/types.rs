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

//! Shared types for the mempool: the candidate a caller hands to
//! `add_new_tx`/`reorg`, the outcome it gets back, and the `UtxoView`
//! abstraction over whatever storage backs the canonical world state.

use core::transaction::{AssetOutputRef, Transaction};

/// A transaction paired with the fee it pays. The fee can only be known by
/// resolving its inputs against a world-state snapshot, so the pool never
/// computes it itself -- the caller (validation, or the reorg glue code)
/// derives it once and hands it in alongside the transaction.
#[derive(Debug, Clone)]
pub struct TxCandidate {
	/// The transaction itself.
	pub tx: Transaction,
	/// `input_sum - output_sum`, computed against the world state this
	/// transaction was validated against.
	pub fee: u64,
}

impl TxCandidate {
	/// Builds a candidate.
	pub fn new(tx: Transaction, fee: u64) -> TxCandidate {
		TxCandidate { tx, fee }
	}
}

/// The reason `add_new_tx` refused a transaction outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
	/// One of this transaction's inputs is already spent by another
	/// transaction in the shared pool.
	DoubleSpending,
	/// The destination pool is at capacity and this transaction doesn't
	/// out-bid the worst entry currently held.
	PoolFull,
}

/// The outcome of `add_new_tx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
	/// Accepted into the shared pool for its destination chain.
	AddedToSharedPool,
	/// Accepted into the pending pool: at least one input chains on an
	/// output still only available inside the pool (output-chaining).
	AddedToLocalPool,
	/// Already present, as either a shared-pool or pending-pool entry.
	AlreadyExists,
	/// Refused outright.
	Rejected(RejectReason),
}

/// A read-only view of the canonical (chain-confirmed) world state, as
/// needed by `collect_for_block`, `update_pending_pool` and
/// `get_relevant_utxos`. Implemented by the wiring layer over whatever
/// storage actually backs the running node; the pool crate has no
/// `store`/`chain` dependency of its own.
pub trait UtxoView {
	/// Whether `r` still resolves to a live, unspent output in the
	/// canonical chain state (as opposed to the mempool's own view).
	fn contains(&self, r: &AssetOutputRef) -> bool;
}

#[cfg(test)]
pub(crate) mod test_utxo_view {
	use super::UtxoView;
	use core::transaction::AssetOutputRef;
	use std::collections::HashSet;

	/// A trivial in-memory `UtxoView` double for unit tests, the mempool
	/// equivalent of the teacher's `DummyChain`.
	#[derive(Default)]
	pub struct DummyUtxoView {
		pub confirmed: HashSet<AssetOutputRef>,
	}

	impl UtxoView for DummyUtxoView {
		fn contains(&self, r: &AssetOutputRef) -> bool {
			self.confirmed.contains(r)
		}
	}
}

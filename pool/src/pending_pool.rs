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

//! `PendingPool`: transactions that chain on an output only available
//! inside the mempool itself (the producing transaction hasn't confirmed
//! in a block yet). Holds them until either their blocking output confirms
//! on-chain (promotion) or the transaction they depend on leaves the pool
//! without confirming (cascading removal).

use std::collections::HashMap;

use core::group::ChainIndex;
use core::hash::Hash;
use core::transaction::Transaction;

/// A transaction held in the pending pool, along with the destination
/// chain it would join once promoted.
#[derive(Debug, Clone)]
pub struct PendingEntry {
	/// The held transaction.
	pub tx: Transaction,
	/// The fee it was submitted with.
	pub fee: u64,
	/// Destination chain it should join on promotion.
	pub chain_index: ChainIndex,
}

/// The output-chaining holding area for one `MemPool`.
#[derive(Default)]
pub struct PendingPool {
	entries: HashMap<Hash, PendingEntry>,
}

impl PendingPool {
	/// Builds an empty pending pool.
	pub fn new() -> PendingPool {
		PendingPool::default()
	}

	/// Number of transactions held.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the pending pool holds no transactions.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Whether `tx_id` is held.
	pub fn contains(&self, tx_id: &Hash) -> bool {
		self.entries.contains_key(tx_id)
	}

	/// Inserts a transaction, replacing any prior entry with the same id.
	pub fn insert(&mut self, entry: PendingEntry) {
		self.entries.insert(entry.tx.tx_id(), entry);
	}

	/// Removes and returns `tx_id`'s entry, if present.
	pub fn remove(&mut self, tx_id: &Hash) -> Option<PendingEntry> {
		self.entries.remove(tx_id)
	}

	/// All held entries, by id.
	pub fn iter(&self) -> impl Iterator<Item = (&Hash, &PendingEntry)> {
		self.entries.iter()
	}

	/// Removes every entry spending `producer`'s outputs, the cascading
	/// step when `producer` is evicted or removed without confirming.
	/// Returns the removed transactions' ids.
	pub fn remove_dependents_of(&mut self, producer: &Transaction) -> Vec<Hash> {
		let refs: Vec<_> = (0..producer.all_outputs().count())
			.map(|i| producer.output_ref(i))
			.collect();
		let dependent_ids: Vec<Hash> = self
			.entries
			.iter()
			.filter(|(_, e)| e.tx.unsigned.inputs.iter().any(|input| refs.contains(input)))
			.map(|(id, _)| *id)
			.collect();
		for id in &dependent_ids {
			self.entries.remove(id);
		}
		dependent_ids
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::transaction::{AssetOutput, TransactionUnsigned};

	fn parent() -> Transaction {
		Transaction::coinbase(10, vec![1], 0)
	}

	fn child(input: core::transaction::AssetOutputRef) -> Transaction {
		Transaction {
			unsigned: TransactionUnsigned {
				inputs: vec![input],
				fixed_outputs: vec![AssetOutput {
					amount: 5,
					lockup_script: vec![2],
					to_group: 0,
				}],
			},
			input_signatures: vec![vec![]],
			generated_outputs: vec![],
			script_execution_ok: true,
		}
	}

	#[test]
	fn insert_then_remove_round_trips() {
		let mut pending = PendingPool::new();
		let tx = parent();
		let id = tx.tx_id();
		pending.insert(PendingEntry {
			tx,
			fee: 1,
			chain_index: ChainIndex::new(0, 0),
		});
		assert!(pending.contains(&id));
		pending.remove(&id);
		assert!(!pending.contains(&id));
	}

	#[test]
	fn cascading_removal_drops_dependents() {
		let mut pending = PendingPool::new();
		let p = parent();
		let r = p.output_ref(0);
		let c = child(r);
		let c_id = c.tx_id();
		pending.insert(PendingEntry {
			tx: c,
			fee: 1,
			chain_index: ChainIndex::new(0, 0),
		});
		let removed = pending.remove_dependents_of(&p);
		assert_eq!(removed, vec![c_id]);
		assert!(pending.is_empty());
	}
}

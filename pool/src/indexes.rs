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

//! `TxIndexes`: the output/input/address indexes shared by every `TxPool`
//! and the `PendingPool` owned by one `MemPool`. Only the shared pools
//! (not the pending pool) register here -- a pending transaction hasn't
//! been accepted as a spender of anything yet.

use std::collections::{HashMap, HashSet};

use core::hash::Hash;
use core::transaction::{AssetOutputRef, Transaction};

/// Shared double-spend and address bookkeeping across a `MemPool`'s `G`
/// `TxPool`s.
///
/// Invariant: for any ref `r`, `output_index` and `input_index` can never
/// both name it as unspent-and-spent at once in a way that breaks the
/// spec's core rule -- `r` is "unspent in pool" iff it's in `output_index`
/// and *not* in `input_index`.
#[derive(Default)]
pub struct TxIndexes {
	/// Output ref -> id of the in-pool tx that produced it.
	output_index: HashMap<AssetOutputRef, Hash>,
	/// Output ref -> id of the in-pool tx that spends it.
	input_index: HashMap<AssetOutputRef, Hash>,
	/// Lockup script bytes -> output refs locked to it, still registered
	/// in `output_index`.
	address_index: HashMap<Vec<u8>, HashSet<AssetOutputRef>>,
}

impl TxIndexes {
	/// Builds an empty index set.
	pub fn new() -> TxIndexes {
		TxIndexes::default()
	}

	/// Whether `r` is already claimed as an input by some in-pool tx.
	pub fn is_spent(&self, r: &AssetOutputRef) -> bool {
		self.input_index.contains_key(r)
	}

	/// Whether `r` is produced by an in-pool tx and not yet spent by
	/// another in-pool tx.
	pub fn is_unspent_in_pool(&self, r: &AssetOutputRef) -> bool {
		self.output_index.contains_key(r) && !self.input_index.contains_key(r)
	}

	/// The id of the in-pool tx that produced `r`, if any.
	pub fn producer_of(&self, r: &AssetOutputRef) -> Option<Hash> {
		self.output_index.get(r).cloned()
	}

	/// Registers a tx newly accepted into a shared pool: records its
	/// outputs as available and its inputs as spent.
	pub fn register(&mut self, tx: &Transaction) {
		let tx_id = tx.tx_id();
		for input in &tx.unsigned.inputs {
			self.input_index.insert(*input, tx_id);
		}
		for (i, output) in tx.all_outputs().enumerate() {
			let r = tx.output_ref(i);
			self.output_index.insert(r, tx_id);
			self.address_index
				.entry(output.lockup_script.clone())
				.or_insert_with(HashSet::new)
				.insert(r);
		}
	}

	/// Un-registers a tx leaving a shared pool, for any reason (evicted,
	/// collected into a block, or removed by reorg).
	pub fn unregister(&mut self, tx: &Transaction) {
		for input in &tx.unsigned.inputs {
			self.input_index.remove(input);
		}
		for (i, output) in tx.all_outputs().enumerate() {
			let r = tx.output_ref(i);
			self.output_index.remove(&r);
			if let Some(set) = self.address_index.get_mut(&output.lockup_script) {
				set.remove(&r);
				if set.is_empty() {
					self.address_index.remove(&output.lockup_script);
				}
			}
		}
	}

	/// Output refs registered in the pool, locked to `lockup_script`, that
	/// are still unspent in the pool.
	pub fn unspent_outputs_for(&self, lockup_script: &[u8]) -> Vec<AssetOutputRef> {
		self.address_index
			.get(lockup_script)
			.into_iter()
			.flat_map(|set| set.iter().cloned())
			.filter(|r| self.is_unspent_in_pool(r))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::transaction::AssetOutput;

	fn tx(amount: u64, script: Vec<u8>) -> Transaction {
		Transaction::coinbase(amount, script, 0)
	}

	fn spending_tx(input: AssetOutputRef, amount: u64) -> Transaction {
		Transaction {
			unsigned: core::transaction::TransactionUnsigned {
				inputs: vec![input],
				fixed_outputs: vec![AssetOutput {
					amount,
					lockup_script: vec![9],
					to_group: 0,
				}],
			},
			input_signatures: vec![vec![]],
			generated_outputs: vec![],
			script_execution_ok: true,
		}
	}

	#[test]
	fn register_then_unregister_round_trips() {
		let mut idx = TxIndexes::new();
		let t = tx(10, vec![1, 2, 3]);
		let r = t.output_ref(0);
		idx.register(&t);
		assert!(idx.is_unspent_in_pool(&r));
		assert!(!idx.is_spent(&r));
		idx.unregister(&t);
		assert!(!idx.is_unspent_in_pool(&r));
	}

	#[test]
	fn spending_a_registered_output_marks_it_spent() {
		let mut idx = TxIndexes::new();
		let parent = tx(10, vec![1]);
		let r = parent.output_ref(0);
		idx.register(&parent);

		let child = spending_tx(r, 5);
		idx.register(&child);
		assert!(idx.is_spent(&r));
		assert!(!idx.is_unspent_in_pool(&r));
	}

	#[test]
	fn address_index_tracks_unspent_refs_only() {
		let mut idx = TxIndexes::new();
		let t = tx(10, vec![7, 7]);
		let r = t.output_ref(0);
		idx.register(&t);
		assert_eq!(idx.unspent_outputs_for(&[7, 7]), vec![r]);

		let child = spending_tx(r, 5);
		idx.register(&child);
		assert!(idx.unspent_outputs_for(&[7, 7]).is_empty());
	}
}

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

//! `MemPool`: one group `g`'s view of pending transactions. Owns `G`
//! shared `TxPool`s (one per destination chain `(g, to)`), a `PendingPool`
//! for output-chained transactions, and the `TxIndexes` the two share.

use std::collections::HashSet;

use core::group::{ChainIndex, GroupIndex};
use core::hash::Hash;
use core::transaction::{AssetOutput, AssetOutputRef, Transaction};

use crate::indexes::TxIndexes;
use crate::pending_pool::{PendingEntry, PendingPool};
use crate::tx_pool::TxPool;
use crate::types::{AddOutcome, RejectReason, TxCandidate, UtxoView};

/// A weight estimate for ranking purposes: the transaction's bincode
/// encoding size. DoS-resistance only -- not a consensus-critical figure.
fn estimate_weight(tx: &Transaction) -> u64 {
	bincode::serialized_size(tx).unwrap_or(1).max(1)
}

/// The transaction pool for one group. Exclusively owns its `G`
/// `TxPool`s and `PendingPool`, matching the "each `MemPool` instance
/// exclusively owns" ownership rule from the data model.
pub struct MemPool {
	group: GroupIndex,
	num_groups: u32,
	tx_pool_capacity: usize,
	pools: Vec<TxPool>,
	pending: PendingPool,
	indexes: TxIndexes,
}

impl MemPool {
	/// Builds an empty mempool for group `group` over a `num_groups`-group
	/// network, with `tx_pool_capacity` entries per destination `TxPool`.
	pub fn new(group: GroupIndex, num_groups: u32, tx_pool_capacity: usize) -> MemPool {
		let pools = (0..num_groups).map(|_| TxPool::new(tx_pool_capacity)).collect();
		MemPool {
			group,
			num_groups,
			tx_pool_capacity,
			pools,
			pending: PendingPool::new(),
			indexes: TxIndexes::new(),
		}
	}

	/// The group this pool serves.
	pub fn group(&self) -> GroupIndex {
		self.group
	}

	/// The shared pool for destination chain `(self.group, to)`.
	pub fn pool(&self, to: GroupIndex) -> &TxPool {
		&self.pools[to as usize]
	}

	/// The pending (output-chaining) pool.
	pub fn pending(&self) -> &PendingPool {
		&self.pending
	}

	/// Total transactions held across every shared pool and the pending
	/// pool.
	pub fn len(&self) -> usize {
		self.pools.iter().map(TxPool::len).sum::<usize>() + self.pending.len()
	}

	fn assert_own_chain(&self, chain_index: ChainIndex) {
		assert_eq!(
			chain_index.from, self.group,
			"chain {:?} does not belong to mempool for group {}",
			chain_index, self.group
		);
	}

	/// Whether `tx_id` is held anywhere in this pool (shared or pending).
	pub fn contains(&self, tx_id: &Hash) -> bool {
		self.pools.iter().any(|p| p.contains(tx_id)) || self.pending.contains(tx_id)
	}

	/// Admits a transaction destined for `chain_index`. `chain_index.from`
	/// must be this pool's group.
	pub fn add_new_tx(&mut self, chain_index: ChainIndex, candidate: TxCandidate) -> AddOutcome {
		self.assert_own_chain(chain_index);
		let tx_id = candidate.tx.tx_id();
		if self.contains(&tx_id) {
			return AddOutcome::AlreadyExists;
		}

		for input in &candidate.tx.unsigned.inputs {
			if self.indexes.is_spent(input) {
				debug!("tx {} rejected: input already spent in pool", tx_id);
				return AddOutcome::Rejected(RejectReason::DoubleSpending);
			}
		}

		let chains_on_pool = candidate
			.tx
			.unsigned
			.inputs
			.iter()
			.any(|input| self.indexes.is_unspent_in_pool(input));

		if chains_on_pool {
			self.pending.insert(PendingEntry {
				tx: candidate.tx,
				fee: candidate.fee,
				chain_index,
			});
			return AddOutcome::AddedToLocalPool;
		}

		let weight = estimate_weight(&candidate.tx);
		let tx_for_index = candidate.tx.clone();
		let pool = &mut self.pools[chain_index.to as usize];
		match pool.insert(candidate.tx, candidate.fee, weight) {
			Ok(evicted) => {
				self.indexes.register(&tx_for_index);
				if let Some(evicted) = evicted {
					self.indexes.unregister(&evicted.tx);
					self.pending.remove_dependents_of(&evicted.tx);
				}
				AddOutcome::AddedToSharedPool
			}
			Err(()) => {
				warn!("tx {} rejected: pool for {:?} is full", tx_id, chain_index);
				AddOutcome::Rejected(RejectReason::PoolFull)
			}
		}
	}

	/// Pulls up to `max_n` highest-priority transactions for `chain_index`
	/// whose inputs are all still present in `world_state`, skipping any
	/// that would conflict with an input already claimed earlier in this
	/// same collection pass.
	pub fn collect_for_block(
		&self,
		chain_index: ChainIndex,
		max_n: usize,
		world_state: &dyn UtxoView,
	) -> Vec<Transaction> {
		self.assert_own_chain(chain_index);
		let mut claimed: HashSet<AssetOutputRef> = HashSet::new();
		let mut collected = Vec::new();
		for template in self.pools[chain_index.to as usize].iter_by_priority() {
			if collected.len() >= max_n {
				break;
			}
			let inputs = &template.tx.unsigned.inputs;
			let ok = inputs
				.iter()
				.all(|r| world_state.contains(r) && !claimed.contains(r));
			if !ok {
				continue;
			}
			for r in inputs {
				claimed.insert(*r);
			}
			collected.push(template.tx.clone());
		}
		collected
	}

	/// Removes a confirmed transaction from wherever it's held (shared
	/// pool or pending), cascading to any pending tx chained onto it.
	fn remove_confirmed(&mut self, tx: &Transaction) {
		let tx_id = tx.tx_id();
		if let Some(entry) = self.pending.remove(&tx_id) {
			let _ = entry;
			return;
		}
		for pool in self.pools.iter_mut() {
			if let Some(template) = pool.remove(&tx_id) {
				self.indexes.unregister(&template.tx);
				self.pending.remove_dependents_of(&template.tx);
				return;
			}
		}
	}

	/// Re-admits a transaction leaving the canonical chain (a reorg
	/// `to_remove` entry). Ignores coinbase transactions -- they never
	/// belong in the pool.
	fn readmit(&mut self, chain_index: ChainIndex, tx: Transaction, fee: u64) {
		if tx.unsigned.inputs.is_empty() {
			return;
		}
		self.add_new_tx(chain_index, TxCandidate::new(tx, fee));
	}

	/// Reconciles the pool against a set of per-destination-group reorgs:
	/// `to_remove[to]` are transactions that left the canonical chain for
	/// destination group `to` and should return to the pool; `to_add[to]`
	/// are transactions that just confirmed and should leave it. Adds are
	/// applied before removals, so a transaction appearing in both (e.g.
	/// re-included verbatim across a fork swap) nets to "stays removed"
	/// instead of spuriously double-spend-rejecting itself on the way
	/// back in.
	///
	/// Every reorg'd tx must carry the fee it was validated with; `fee_of`
	/// supplies it (the caller typically has it cached from when the tx
	/// was first validated into a block).
	pub fn reorg(
		&mut self,
		to_remove: &[Vec<Transaction>],
		to_add: &[Vec<Transaction>],
		fee_of: impl Fn(&Transaction) -> u64,
	) -> (Vec<Hash>, Vec<Hash>) {
		assert_eq!(to_remove.len(), self.num_groups as usize);
		assert_eq!(to_add.len(), self.num_groups as usize);

		let mut added = Vec::new();
		for (to, txs) in to_remove.iter().enumerate() {
			let chain_index = ChainIndex::new(self.group, to as u32);
			for tx in txs {
				if tx.unsigned.inputs.is_empty() {
					continue;
				}
				let fee = fee_of(tx);
				let id = tx.tx_id();
				self.readmit(chain_index, tx.clone(), fee);
				added.push(id);
			}
		}

		let mut removed = Vec::new();
		for txs in to_add.iter() {
			for tx in txs {
				if tx.unsigned.inputs.is_empty() {
					continue;
				}
				self.remove_confirmed(tx);
				removed.push(tx.tx_id());
			}
		}

		(removed, added)
	}

	/// Scans the pending pool for transactions whose inputs are now
	/// present in the canonical `world_state`, promoting them to their
	/// destination shared pool. A pending tx whose input was instead
	/// claimed by a conflicting shared-pool transaction is dropped rather
	/// than promoted. Returns the promoted transactions.
	pub fn update_pending_pool(&mut self, world_state: &dyn UtxoView) -> Vec<Transaction> {
		let ready_ids: Vec<Hash> = self
			.pending
			.iter()
			.filter(|(_, entry)| {
				entry
					.tx
					.unsigned
					.inputs
					.iter()
					.all(|r| world_state.contains(r) || self.indexes.is_unspent_in_pool(r))
			})
			.map(|(id, _)| *id)
			.collect();

		let mut promoted = Vec::new();
		for id in ready_ids {
			let entry = match self.pending.remove(&id) {
				Some(e) => e,
				None => continue,
			};
			let conflicted = entry
				.tx
				.unsigned
				.inputs
				.iter()
				.any(|r| self.indexes.is_spent(r));
			if conflicted {
				continue;
			}
			let chains_on_pool = entry
				.tx
				.unsigned
				.inputs
				.iter()
				.any(|r| self.indexes.is_unspent_in_pool(r));
			if chains_on_pool {
				// Still blocked on another pending-turned-shared tx; put
				// it back and wait for the next pass.
				self.pending.insert(entry);
				continue;
			}
			let weight = estimate_weight(&entry.tx);
			let pool = &mut self.pools[entry.chain_index.to as usize];
			if pool.insert(entry.tx.clone(), entry.fee, weight).is_ok() {
				self.indexes.register(&entry.tx);
				promoted.push(entry.tx);
			}
		}
		promoted
	}

	/// Unions chain-confirmed UTXOs for `lockup_script` (supplied by the
	/// caller as `confirmed`, already filtered to that script) with
	/// mempool-added outputs for the same script, excluding anything the
	/// mempool has marked spent.
	pub fn get_relevant_utxos(
		&self,
		lockup_script: &[u8],
		confirmed: Vec<(AssetOutputRef, AssetOutput)>,
	) -> Vec<(AssetOutputRef, AssetOutput)> {
		let mut utxos: Vec<(AssetOutputRef, AssetOutput)> = confirmed
			.into_iter()
			.filter(|(r, _)| !self.indexes.is_spent(r))
			.collect();

		for r in self.indexes.unspent_outputs_for(lockup_script) {
			if let Some(output) = self.output_by_ref(&r) {
				utxos.push((r, output));
			}
		}
		utxos
	}

	fn output_by_ref(&self, r: &AssetOutputRef) -> Option<AssetOutput> {
		let producer_id = self.indexes.producer_of(r)?;
		for pool in &self.pools {
			if let Some(template) = pool.iter_by_priority().find(|t| t.tx.tx_id() == producer_id) {
				return template
					.tx
					.all_outputs()
					.enumerate()
					.find(|(i, _)| template.tx.output_ref(*i) == *r)
					.map(|(_, o)| o.clone());
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::test_utxo_view::DummyUtxoView;
	use core::transaction::TransactionUnsigned;

	fn coinbase_like(script: u8, amount: u64) -> Transaction {
		Transaction::coinbase(amount, vec![script], 0)
	}

	fn spend(input: AssetOutputRef, script: u8, amount: u64) -> Transaction {
		Transaction {
			unsigned: TransactionUnsigned {
				inputs: vec![input],
				fixed_outputs: vec![AssetOutput {
					amount,
					lockup_script: vec![script],
					to_group: 0,
				}],
			},
			input_signatures: vec![vec![]],
			generated_outputs: vec![],
			script_execution_ok: true,
		}
	}

	#[test]
	fn double_spend_is_rejected() {
		let mut pool = MemPool::new(0, 2, 100);
		let confirmed_ref = AssetOutputRef::new(0, core::hash::blake2b_hash(b"utxo"));
		let first = spend(confirmed_ref, 1, 10);
		let second = spend(confirmed_ref, 2, 20);

		let idx = ChainIndex::new(0, 0);
		assert_eq!(
			pool.add_new_tx(idx, TxCandidate::new(first, 1)),
			AddOutcome::AddedToSharedPool
		);
		assert_eq!(
			pool.add_new_tx(idx, TxCandidate::new(second, 1)),
			AddOutcome::Rejected(RejectReason::DoubleSpending)
		);
	}

	#[test]
	fn chained_spend_goes_to_pending_then_promotes() {
		let mut pool = MemPool::new(0, 2, 100);
		let idx = ChainIndex::new(0, 0);
		let parent = coinbase_like(1, 100);
		let parent_ref = parent.output_ref(0);
		let parent_id = parent.tx_id();

		assert_eq!(
			pool.add_new_tx(idx, TxCandidate::new(parent, 0)),
			AddOutcome::AddedToSharedPool
		);

		let child = spend(parent_ref, 2, 50);
		let child_id = child.tx_id();
		assert_eq!(
			pool.add_new_tx(idx, TxCandidate::new(child, 1)),
			AddOutcome::AddedToLocalPool
		);
		assert!(pool.pending().contains(&child_id));

		// Parent confirms into a block: the pool forgets it via the normal
		// reorg.to_add path, world state now has its output, and the
		// pending child should promote.
		let mut to_add = vec![Vec::new(); 2];
		to_add[0] = vec![pool
			.pool(0)
			.iter_by_priority()
			.find(|t| t.tx.tx_id() == parent_id)
			.unwrap()
			.tx
			.clone()];
		pool.reorg(&vec![Vec::new(); 2], &to_add, |_| 0);

		let mut world = DummyUtxoView::default();
		world.confirmed.insert(parent_ref);
		let promoted = pool.update_pending_pool(&world);
		assert_eq!(promoted.len(), 1);
		assert_eq!(promoted[0].tx_id(), child_id);
		assert!(!pool.pending().contains(&child_id));
	}

	#[test]
	fn reorg_remove_then_readd_nets_to_removed() {
		let mut pool = MemPool::new(0, 2, 100);
		let idx = ChainIndex::new(0, 0);
		let tx = coinbase_like(1, 100);
		let tx_clone = tx.clone();
		pool.add_new_tx(idx, TxCandidate::new(tx, 5));
		assert!(pool.contains(&tx_clone.tx_id()));

		let mut to_remove = vec![Vec::new(); 2];
		to_remove[0] = vec![tx_clone.clone()];
		let mut to_add = vec![Vec::new(); 2];
		to_add[0] = vec![tx_clone.clone()];

		pool.reorg(&to_remove, &to_add, |_| 5);
		assert!(!pool.contains(&tx_clone.tx_id()));
	}

	#[test]
	fn collect_for_block_skips_unresolvable_inputs() {
		let mut pool = MemPool::new(0, 1, 100);
		let idx = ChainIndex::new(0, 0);
		let missing_ref = AssetOutputRef::new(0, core::hash::blake2b_hash(b"missing"));
		let tx = spend(missing_ref, 1, 10);
		pool.add_new_tx(idx, TxCandidate::new(tx, 1));

		let world = DummyUtxoView::default();
		let collected = pool.collect_for_block(idx, 10, &world);
		assert!(collected.is_empty());
	}
}

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

//! `TxPool`: a capacity-bounded ordered set of transactions for one
//! destination chain, ranked by descending fee-per-weight with arrival
//! order as the tiebreak.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use core::hash::{Hash, Hashed};
use core::transaction::Transaction;

/// One entry in a `TxPool`: the transaction plus the bookkeeping needed to
/// rank and evict it.
#[derive(Debug, Clone)]
pub struct TransactionTemplate {
	/// The pooled transaction.
	pub tx: Transaction,
	/// `input_sum - output_sum`, as supplied at insertion time.
	pub fee: u64,
	/// Byte-size estimate used as the weight half of the fee-rate ranking.
	pub weight: u64,
	/// Monotonic arrival counter, used to break exact fee-rate ties in
	/// favor of the transaction that arrived first.
	pub sequence: u64,
}

impl TransactionTemplate {
	fn tx_id(&self) -> Hash {
		self.tx.tx_id()
	}

	/// `fee / weight` compared without floating point, by cross-multiplying
	/// against another entry's fee and weight.
	fn priority_cmp(&self, other: &TransactionTemplate) -> Ordering {
		let lhs = self.fee as u128 * other.weight.max(1) as u128;
		let rhs = other.fee as u128 * self.weight.max(1) as u128;
		lhs.cmp(&rhs)
	}
}

/// Ordering key: higher fee-per-weight sorts first; ties broken by lower
/// arrival sequence (first-come priority among equal fee rates).
#[derive(Debug, Clone)]
struct PoolKey {
	entry: TransactionTemplate,
}

impl PartialEq for PoolKey {
	fn eq(&self, other: &Self) -> bool {
		self.entry.tx_id() == other.entry.tx_id()
	}
}
impl Eq for PoolKey {}

impl PartialOrd for PoolKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for PoolKey {
	fn cmp(&self, other: &Self) -> Ordering {
		// Descending priority: reverse the fee-rate comparison so a
		// `BTreeSet` iterates best-first.
		other
			.entry
			.priority_cmp(&self.entry)
			.then_with(|| self.entry.sequence.cmp(&other.entry.sequence))
			.then_with(|| self.entry.tx_id().cmp(&other.entry.tx_id()))
	}
}

/// A capacity-bounded, priority-ordered pool of transactions destined for
/// one chain.
pub struct TxPool {
	capacity: usize,
	ordered: BTreeSet<PoolKey>,
	by_id: HashMap<Hash, TransactionTemplate>,
	next_sequence: u64,
}

impl TxPool {
	/// Builds an empty pool with the given capacity.
	pub fn new(capacity: usize) -> TxPool {
		TxPool {
			capacity,
			ordered: BTreeSet::new(),
			by_id: HashMap::new(),
			next_sequence: 0,
		}
	}

	/// Number of transactions currently held.
	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	/// Whether the pool holds no transactions.
	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	/// Whether `tx_id` is held by this pool.
	pub fn contains(&self, tx_id: &Hash) -> bool {
		self.by_id.contains_key(tx_id)
	}

	/// Transactions in descending priority order.
	pub fn iter_by_priority(&self) -> impl Iterator<Item = &TransactionTemplate> {
		self.ordered.iter().map(|k| &k.entry)
	}

	/// Inserts `tx` with the given fee and byte-weight. If the pool is at
	/// capacity and `tx` doesn't out-rank the current worst entry, it's
	/// refused (the caller should surface `RejectReason::PoolFull`).
	/// Otherwise it's inserted, evicting the worst entry first if that
	/// was needed to make room; the evicted template (if any) is returned
	/// so the caller can retire its index entries and cascade the removal
	/// to any pending transaction chained onto it.
	pub fn insert(&mut self, tx: Transaction, fee: u64, weight: u64) -> Result<Option<TransactionTemplate>, ()> {
		let tx_id = tx.tx_id();
		let sequence = self.next_sequence;
		let candidate = TransactionTemplate {
			tx,
			fee,
			weight,
			sequence,
		};

		let mut evicted = None;
		if self.by_id.len() >= self.capacity {
			let worst = self.ordered.iter().next_back().expect("pool at capacity is non-empty");
			if worst.entry.priority_cmp(&candidate) != Ordering::Less {
				// Nothing in the pool ranks below the candidate.
				return Err(());
			}
			let worst_id = worst.entry.tx_id();
			let worst_key = PoolKey {
				entry: self.by_id.get(&worst_id).cloned().unwrap(),
			};
			self.ordered.remove(&worst_key);
			evicted = self.by_id.remove(&worst_id);
		}

		self.next_sequence += 1;
		self.by_id.insert(tx_id, candidate.clone());
		self.ordered.insert(PoolKey { entry: candidate });
		Ok(evicted)
	}

	/// Removes and returns `tx_id`'s entry, if present.
	pub fn remove(&mut self, tx_id: &Hash) -> Option<TransactionTemplate> {
		let entry = self.by_id.remove(tx_id)?;
		self.ordered.remove(&PoolKey { entry: entry.clone() });
		Some(entry)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::transaction::{AssetOutput, TransactionUnsigned};

	fn tx(seed: u8) -> Transaction {
		Transaction {
			unsigned: TransactionUnsigned {
				inputs: vec![],
				fixed_outputs: vec![AssetOutput {
					amount: 1,
					lockup_script: vec![seed],
					to_group: 0,
				}],
			},
			input_signatures: vec![],
			generated_outputs: vec![],
			script_execution_ok: true,
		}
	}

	#[test]
	fn iterates_highest_fee_rate_first() {
		let mut pool = TxPool::new(10);
		pool.insert(tx(1), 10, 100).unwrap();
		pool.insert(tx(2), 50, 100).unwrap();
		pool.insert(tx(3), 5, 100).unwrap();
		let order: Vec<u64> = pool.iter_by_priority().map(|e| e.fee).collect();
		assert_eq!(order, vec![50, 10, 5]);
	}

	#[test]
	fn ties_break_by_arrival_order() {
		let mut pool = TxPool::new(10);
		pool.insert(tx(1), 10, 100).unwrap();
		pool.insert(tx(2), 10, 100).unwrap();
		let ids: Vec<Hash> = pool.iter_by_priority().map(|e| e.tx.tx_id()).collect();
		assert_eq!(ids[0], tx(1).tx_id());
		assert_eq!(ids[1], tx(2).tx_id());
	}

	#[test]
	fn eviction_drops_the_worst_entry_on_overflow() {
		let mut pool = TxPool::new(2);
		pool.insert(tx(1), 10, 100).unwrap();
		pool.insert(tx(2), 20, 100).unwrap();
		let evicted = pool.insert(tx(3), 30, 100).unwrap();
		assert_eq!(evicted.unwrap().tx.tx_id(), tx(1).tx_id());
		assert_eq!(pool.len(), 2);
		assert!(!pool.contains(&tx(1).tx_id()));
	}

	#[test]
	fn full_pool_refuses_a_worse_candidate() {
		let mut pool = TxPool::new(1);
		pool.insert(tx(1), 50, 100).unwrap();
		assert!(pool.insert(tx(2), 1, 100).is_err());
		assert_eq!(pool.len(), 1);
	}
}

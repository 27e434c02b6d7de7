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

//! `BlockHashChain`: the bottom of the per-chain storage hierarchy. Keeps
//! only the hash/height/weight skeleton of one chain -- no header or block
//! bodies -- so sync and weight computation never need to touch full
//! bodies.

use std::collections::HashSet;
use std::sync::Arc;

use core::group::ChainIndex;
use core::hash::{Hash, ZERO_HASH};
use store::{ColumnFamily, KeyValueStore, WriteOp};

use crate::error::{Error, ErrorKind};
use crate::keys;
use crate::types::{AddStatus, BlockState, ChainState, HashDiff};
use crate::weight::Weight;

/// Per-chain hash index: height <-> hash, weight, tips, containment.
pub struct BlockHashChain<S: KeyValueStore> {
	store: Arc<S>,
	chain: ChainIndex,
}

impl<S: KeyValueStore> BlockHashChain<S> {
	/// Binds a hash chain to its chain index over a shared store. Multiple
	/// `BlockHashChain`s (one per `(from, to)` pair) can share the same
	/// underlying `store` safely since every key is chain-prefixed.
	pub fn new(store: Arc<S>, chain: ChainIndex) -> BlockHashChain<S> {
		BlockHashChain { store, chain }
	}

	/// The chain this instance indexes.
	pub fn chain_index(&self) -> ChainIndex {
		self.chain
	}

	/// Whether `h` is already recorded on this chain.
	pub fn contains(&self, h: &Hash) -> Result<bool, Error> {
		Ok(self
			.store
			.get_ser::<BlockState>(ColumnFamily::BlockState, &keys::block_state_key(self.chain, h))?
			.is_some())
	}

	fn block_state(&self, h: &Hash) -> Result<BlockState, Error> {
		self.store
			.get_ser::<BlockState>(ColumnFamily::BlockState, &keys::block_state_key(self.chain, h))?
			.ok_or_else(|| ErrorKind::KeyNotFound(*h).into())
	}

	fn chain_state(&self) -> Result<ChainState, Error> {
		Ok(self
			.store
			.get_ser::<ChainState>(ColumnFamily::ChainState, &keys::chain_state_key(self.chain))?
			.unwrap_or_default())
	}

	/// Height of `h` on this chain.
	pub fn height_of(&self, h: &Hash) -> Result<u32, Error> {
		Ok(self.block_state(h)?.height)
	}

	/// Weight of `h` on this chain.
	pub fn weight_of(&self, h: &Hash) -> Result<Weight, Error> {
		Ok(self.block_state(h)?.weight)
	}

	/// `weight_of`, panicking on failure. For call sites (test fixtures,
	/// genesis construction) where the hash is known to be present.
	pub fn weight_of_unsafe(&self, h: &Hash) -> Weight {
		self.weight_of(h).expect("hash known to be present")
	}

	/// Parent of `h` on this chain.
	pub fn parent_of(&self, h: &Hash) -> Result<Hash, Error> {
		Ok(self.block_state(h)?.parent)
	}

	/// Records `h` with its `parent`, `height` and `weight`. Updates the
	/// chain's tip set: `parent` is removed from tips (it now has a known
	/// child) and `h` is added. Idempotent: re-adding an existing hash is a
	/// no-op and returns `AlreadyExists`.
	pub fn add_hash(
		&self,
		h: Hash,
		parent: Hash,
		height: u32,
		weight: Weight,
	) -> Result<AddStatus, Error> {
		if self.contains(&h)? {
			return Ok(AddStatus::AlreadyExists);
		}

		let mut state = self.chain_state()?;
		state.tips.retain(|t| *t != parent);
		if !state.tips.contains(&h) {
			state.tips.push(h);
		}
		state.num_hashes += 1;

		let block_state = BlockState {
			height,
			parent,
			weight,
		};

		let mut height_hashes = self
			.store
			.get_ser::<Vec<Hash>>(ColumnFamily::HeightIndex, &keys::height_index_key(self.chain, height))?
			.unwrap_or_default();
		height_hashes.push(h);

		let writes = vec![
			WriteOp::Put {
				cf: ColumnFamily::BlockState,
				key: keys::block_state_key(self.chain, &h),
				value: bincode::serialize(&block_state)?,
			},
			WriteOp::Put {
				cf: ColumnFamily::HeightIndex,
				key: keys::height_index_key(self.chain, height),
				value: bincode::serialize(&height_hashes)?,
			},
			WriteOp::Put {
				cf: ColumnFamily::ChainState,
				key: keys::chain_state_key(self.chain),
				value: bincode::serialize(&state)?,
			},
		];
		self.store.batch(writes)?;
		Ok(AddStatus::Added)
	}

	/// `add_hash`, panicking on failure. For call sites (genesis
	/// construction, test fixtures) known not to fail.
	pub fn add_hash_unsafe(&self, h: Hash, parent: Hash, height: u32, weight: Weight) -> AddStatus {
		self.add_hash(h, parent, height, weight)
			.expect("add_hash known not to fail")
	}

	/// The tip with maximum weight; ties broken by the lexicographically
	/// smallest hash.
	pub fn get_best_tip(&self) -> Result<Hash, Error> {
		let tips = self.get_all_tips()?;
		let mut best: Option<(Weight, Hash)> = None;
		for tip in tips {
			let weight = self.weight_of(&tip)?;
			best = Some(match best {
				None => (weight, tip),
				Some((best_weight, best_hash)) => {
					if weight > best_weight || (weight == best_weight && tip < best_hash) {
						(weight, tip)
					} else {
						(best_weight, best_hash)
					}
				}
			});
		}
		best.map(|(_, h)| h)
			.ok_or_else(|| ErrorKind::KeyNotFound(ZERO_HASH).into())
	}

	/// All current tips.
	pub fn get_all_tips(&self) -> Result<Vec<Hash>, Error> {
		Ok(self.chain_state()?.tips)
	}

	/// BFS forward from `locator`, returning hashes in height-then-insertion
	/// order. Used to serve sync requests.
	pub fn get_hashes_after(&self, locator: &Hash) -> Result<Vec<Hash>, Error> {
		let start_height = self.height_of(locator)?;
		let mut result = Vec::new();
		let mut visited: HashSet<Hash> = HashSet::new();
		visited.insert(*locator);

		let tip_height = {
			let mut max_h = start_height;
			for t in self.get_all_tips()? {
				max_h = max_h.max(self.height_of(&t)?);
			}
			max_h
		};

		for height in (start_height + 1)..=tip_height {
			let hashes = self
				.store
				.get_ser::<Vec<Hash>>(ColumnFamily::HeightIndex, &keys::height_index_key(self.chain, height))?
				.unwrap_or_default();
			for h in hashes {
				if self.parent_of(&h).map(|p| visited.contains(&p)).unwrap_or(false) {
					visited.insert(h);
					result.push(h);
				}
			}
		}
		Ok(result)
	}

	/// Path from genesis to `h`, following parent pointers.
	pub fn get_block_hash_slice(&self, h: &Hash) -> Result<Vec<Hash>, Error> {
		let mut path = vec![*h];
		let mut cur = *h;
		loop {
			let parent = self.parent_of(&cur)?;
			if parent == ZERO_HASH {
				break;
			}
			path.push(parent);
			cur = parent;
		}
		path.reverse();
		Ok(path)
	}

	/// Walks both `new_tip` and `old_tip` back to their lowest common
	/// ancestor, returning the hashes to remove (old branch, tip-to-LCA,
	/// exclusive of the LCA) and to add (new branch, LCA-to-tip).
	pub fn cal_hash_diff(&self, new_tip: &Hash, old_tip: &Hash) -> Result<HashDiff, Error> {
		let mut a = *new_tip;
		let mut b = *old_tip;
		let mut height_a = self.height_of(&a)?;
		let mut height_b = self.height_of(&b)?;

		let mut to_add = Vec::new();
		let mut to_remove = Vec::new();

		while height_a > height_b {
			to_add.push(a);
			a = self.parent_of(&a)?;
			height_a -= 1;
		}
		while height_b > height_a {
			to_remove.push(b);
			b = self.parent_of(&b)?;
			height_b -= 1;
		}
		while a != b {
			to_add.push(a);
			to_remove.push(b);
			a = self.parent_of(&a)?;
			b = self.parent_of(&b)?;
		}

		to_add.reverse();
		Ok(HashDiff { to_remove, to_add })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use store::MemStore;

	fn hash(byte: u8) -> Hash {
		Hash::from_slice(&[byte; 32])
	}

	fn new_chain() -> BlockHashChain<MemStore> {
		BlockHashChain::new(Arc::new(MemStore::new()), ChainIndex::new(0, 0))
	}

	#[test]
	fn add_then_contains() {
		let chain = new_chain();
		let genesis = hash(0);
		chain
			.add_hash(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();
		assert!(chain.contains(&genesis).unwrap());
	}

	#[test]
	fn add_is_idempotent() {
		let chain = new_chain();
		let genesis = hash(0);
		let first = chain
			.add_hash(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();
		let second = chain
			.add_hash(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();
		assert_eq!(first, AddStatus::Added);
		assert_eq!(second, AddStatus::AlreadyExists);
		assert_eq!(chain.get_all_tips().unwrap(), vec![genesis]);
	}

	#[test]
	fn best_tip_picks_max_weight_then_smallest_hash() {
		let chain = new_chain();
		let genesis = hash(0);
		chain
			.add_hash(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();
		let a = hash(5);
		let b = hash(3);
		chain.add_hash(a, genesis, 1, Weight::from_u64(1)).unwrap();
		chain.add_hash(b, genesis, 1, Weight::from_u64(1)).unwrap();
		assert_eq!(chain.get_best_tip().unwrap(), b);

		let mut tips = chain.get_all_tips().unwrap();
		tips.sort();
		let mut expected = vec![a, b];
		expected.sort();
		assert_eq!(tips, expected);
	}

	#[test]
	fn hash_diff_is_empty_for_direct_ancestor() {
		let chain = new_chain();
		let genesis = hash(0);
		let child = hash(1);
		chain
			.add_hash(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();
		chain
			.add_hash(child, genesis, 1, Weight::from_u64(1))
			.unwrap();
		let diff = chain.cal_hash_diff(&child, &genesis).unwrap();
		assert!(diff.to_remove.is_empty());
		assert_eq!(diff.to_add, vec![child]);
	}

	#[test]
	fn hash_diff_across_a_fork() {
		let chain = new_chain();
		let genesis = hash(0);
		chain
			.add_hash(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();
		let left = hash(1);
		let right = hash(2);
		chain.add_hash(left, genesis, 1, Weight::from_u64(1)).unwrap();
		chain.add_hash(right, genesis, 1, Weight::from_u64(1)).unwrap();

		let diff = chain.cal_hash_diff(&right, &left).unwrap();
		assert_eq!(diff.to_remove, vec![left]);
		assert_eq!(diff.to_add, vec![right]);
	}
}

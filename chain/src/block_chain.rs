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

//! `BlockChain`: extends `BlockHeaderChain` with full block bodies, so a
//! chain diff can be resolved down to actual transactions instead of just
//! hashes.

use std::sync::Arc;

use core::block::{Block, BlockHeader};
use core::group::ChainIndex;
use core::hash::{Hash, Hashed};
use store::{ColumnFamily, KeyValueStore};

use crate::error::{Error, ErrorKind};
use crate::header_chain::BlockHeaderChain;
use crate::keys;
use crate::types::{AddStatus, ChainDiff};
use crate::weight::Weight;

/// Per-chain full-block index: header chain plus the block bodies.
pub struct BlockChain<S: KeyValueStore> {
	store: Arc<S>,
	headers: BlockHeaderChain<S>,
	chain: ChainIndex,
}

impl<S: KeyValueStore> BlockChain<S> {
	/// Binds a block chain to its chain index over a shared store.
	pub fn new(store: Arc<S>, chain: ChainIndex) -> BlockChain<S> {
		BlockChain {
			headers: BlockHeaderChain::new(store.clone(), chain),
			store,
			chain,
		}
	}

	/// The underlying header chain, for header-only callers.
	pub fn header_chain(&self) -> &BlockHeaderChain<S> {
		&self.headers
	}

	/// The chain this instance indexes.
	pub fn chain_index(&self) -> ChainIndex {
		self.chain
	}

	/// Whether `h` is already recorded on this chain.
	pub fn contains(&self, h: &Hash) -> Result<bool, Error> {
		self.headers.contains(h)
	}

	/// Fetches a block by hash.
	pub fn get_block(&self, h: &Hash) -> Result<Block, Error> {
		self.store
			.get_ser::<Block>(ColumnFamily::Blocks, &keys::block_key(self.chain, h))?
			.ok_or_else(|| ErrorKind::KeyNotFound(*h).into())
	}

	/// Fetches a header by hash.
	pub fn get_header(&self, h: &Hash) -> Result<BlockHeader, Error> {
		self.headers.get_header(h)
	}

	/// Weight of `h` on this chain.
	pub fn weight_of(&self, h: &Hash) -> Result<Weight, Error> {
		self.headers.weight_of(h)
	}

	/// Height of `h` on this chain.
	pub fn height_of(&self, h: &Hash) -> Result<u32, Error> {
		self.headers.height_of(h)
	}

	/// The tip with maximum weight; ties broken by the lexicographically
	/// smallest hash.
	pub fn get_best_tip(&self) -> Result<Hash, Error> {
		self.headers.get_best_tip()
	}

	/// All current tips.
	pub fn get_all_tips(&self) -> Result<Vec<Hash>, Error> {
		self.headers.get_all_tips()
	}

	/// Persists `block`'s body then delegates to the header chain's `add`
	/// for the header and hash-chain bookkeeping. Idempotent.
	pub fn add(
		&self,
		block: Block,
		parent: Hash,
		height: u32,
		weight: Weight,
	) -> Result<AddStatus, Error> {
		let h = block.hash();
		if self.headers.contains(&h)? {
			return Ok(AddStatus::AlreadyExists);
		}
		self.store.put(
			ColumnFamily::Blocks,
			&keys::block_key(self.chain, &h),
			bincode::serialize(&block)?,
		)?;
		self.headers
			.add(block.header, parent, height, weight)
	}

	/// Resolves the hash diff between `new_tip` and `old_tip` via the
	/// underlying hash chain, then loads the full block bodies for both
	/// sides.
	pub fn cal_block_diff(&self, new_tip: &Hash, old_tip: &Hash) -> Result<ChainDiff, Error> {
		let hash_diff = self
			.headers
			.hash_chain()
			.cal_hash_diff(new_tip, old_tip)?;
		let to_remove = hash_diff
			.to_remove
			.iter()
			.map(|h| self.get_block(h))
			.collect::<Result<Vec<_>, _>>()?;
		let to_add = hash_diff
			.to_add
			.iter()
			.map(|h| self.get_block(h))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(ChainDiff { to_remove, to_add })
	}

	/// BFS forward from `locator`, for sync.
	pub fn get_hashes_after(&self, locator: &Hash) -> Result<Vec<Hash>, Error> {
		self.headers.get_hashes_after(locator)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::hash::ZERO_HASH;
	use core::target::Target;
	use store::MemStore;

	fn block(deps: Vec<Hash>, nonce: u64) -> Block {
		Block {
			header: BlockHeader {
				block_deps: deps,
				tx_root_hash: ZERO_HASH,
				timestamp: 0,
				target: Target::max(),
				nonce,
			},
			transactions: vec![],
		}
	}

	#[test]
	fn add_then_fetch_body() {
		let store = Arc::new(MemStore::new());
		let chain = BlockChain::new(store, ChainIndex::new(0, 0));
		let genesis = block(vec![ZERO_HASH; 1], 1);
		let h = genesis.hash();
		chain
			.add(genesis.clone(), ZERO_HASH, 0, Weight::zero())
			.unwrap();
		let fetched = chain.get_block(&h).unwrap();
		assert_eq!(fetched.header.nonce, genesis.header.nonce);
	}

	#[test]
	fn diff_loads_bodies_across_a_fork() {
		let store = Arc::new(MemStore::new());
		let chain = BlockChain::new(store, ChainIndex::new(0, 0));
		let genesis = block(vec![ZERO_HASH; 1], 0);
		let gh = genesis.hash();
		chain
			.add(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();

		let left = block(vec![gh], 1);
		let right = block(vec![gh], 2);
		let lh = left.hash();
		let rh = right.hash();
		chain
			.add(left.clone(), gh, 1, Weight::from_u64(1))
			.unwrap();
		chain
			.add(right.clone(), gh, 1, Weight::from_u64(1))
			.unwrap();

		let diff = chain.cal_block_diff(&rh, &lh).unwrap();
		assert_eq!(diff.to_remove.len(), 1);
		assert_eq!(diff.to_remove[0].hash(), lh);
		assert_eq!(diff.to_add.len(), 1);
		assert_eq!(diff.to_add[0].hash(), rh);
	}
}

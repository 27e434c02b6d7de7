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

//! `BlockHeaderChain`: extends `BlockHashChain` with header bodies, so a
//! node can hold and serve headers for chains it doesn't fully store.

use std::sync::Arc;

use core::block::BlockHeader;
use core::group::ChainIndex;
use core::hash::{Hash, Hashed};
use store::{ColumnFamily, KeyValueStore, WriteOp};

use crate::error::{Error, ErrorKind};
use crate::hash_chain::BlockHashChain;
use crate::keys;
use crate::types::AddStatus;
use crate::weight::Weight;

/// Per-chain header index: everything `BlockHashChain` offers, plus the
/// header bodies themselves.
pub struct BlockHeaderChain<S: KeyValueStore> {
	store: Arc<S>,
	hashes: BlockHashChain<S>,
	chain: ChainIndex,
}

impl<S: KeyValueStore> BlockHeaderChain<S> {
	/// Binds a header chain to its chain index over a shared store.
	pub fn new(store: Arc<S>, chain: ChainIndex) -> BlockHeaderChain<S> {
		BlockHeaderChain {
			hashes: BlockHashChain::new(store.clone(), chain),
			store,
			chain,
		}
	}

	/// The underlying hash chain, for callers that only need the skeleton.
	pub fn hash_chain(&self) -> &BlockHashChain<S> {
		&self.hashes
	}

	/// The chain this instance indexes.
	pub fn chain_index(&self) -> ChainIndex {
		self.chain
	}

	/// Whether `h` is already recorded on this chain.
	pub fn contains(&self, h: &Hash) -> Result<bool, Error> {
		self.hashes.contains(h)
	}

	/// Fetches a header by hash.
	pub fn get_header(&self, h: &Hash) -> Result<BlockHeader, Error> {
		self.store
			.get_ser::<BlockHeader>(ColumnFamily::Headers, &keys::header_key(self.chain, h))?
			.ok_or_else(|| ErrorKind::KeyNotFound(*h).into())
	}

	/// Weight of `h` on this chain.
	pub fn weight_of(&self, h: &Hash) -> Result<Weight, Error> {
		self.hashes.weight_of(h)
	}

	/// Height of `h` on this chain.
	pub fn height_of(&self, h: &Hash) -> Result<u32, Error> {
		self.hashes.height_of(h)
	}

	/// The tip with maximum weight; ties broken by the lexicographically
	/// smallest hash.
	pub fn get_best_tip(&self) -> Result<Hash, Error> {
		self.hashes.get_best_tip()
	}

	/// All current tips.
	pub fn get_all_tips(&self) -> Result<Vec<Hash>, Error> {
		self.hashes.get_all_tips()
	}

	/// Persists `header` and records it in the hash chain with the given
	/// `parent`, `height` and `weight`. The caller resolves `parent` from
	/// `header.parent_hash(num_groups)` before calling, since only it knows
	/// the network's group count. Idempotent: re-adding an already-known
	/// header is a no-op that returns `AlreadyExists`.
	pub fn add(
		&self,
		header: BlockHeader,
		parent: Hash,
		height: u32,
		weight: Weight,
	) -> Result<AddStatus, Error> {
		let h = header.hash();
		if self.hashes.contains(&h)? {
			return Ok(AddStatus::AlreadyExists);
		}
		self.store.put(
			ColumnFamily::Headers,
			&keys::header_key(self.chain, &h),
			bincode::serialize(&header)?,
		)?;
		self.hashes.add_hash(h, parent, height, weight)
	}

	/// BFS forward from `locator`, for sync.
	pub fn get_hashes_after(&self, locator: &Hash) -> Result<Vec<Hash>, Error> {
		self.hashes.get_hashes_after(locator)
	}

	/// Path from genesis to `h`.
	pub fn get_block_hash_slice(&self, h: &Hash) -> Result<Vec<Hash>, Error> {
		self.hashes.get_block_hash_slice(h)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::hash::ZERO_HASH;
	use core::target::Target;
	use store::MemStore;

	fn header(deps: Vec<Hash>, nonce: u64) -> BlockHeader {
		BlockHeader {
			block_deps: deps,
			tx_root_hash: ZERO_HASH,
			timestamp: 0,
			target: Target::max(),
			nonce,
		}
	}

	#[test]
	fn add_persists_header_body() {
		let store = Arc::new(MemStore::new());
		let chain = BlockHeaderChain::new(store, ChainIndex::new(0, 0));
		let genesis = header(vec![ZERO_HASH; 1], 0);
		let h = genesis.hash();
		chain
			.add(genesis.clone(), ZERO_HASH, 0, Weight::zero())
			.unwrap();
		let fetched = chain.get_header(&h).unwrap();
		assert_eq!(fetched.nonce, genesis.nonce);
	}

	#[test]
	fn re_add_is_idempotent() {
		let store = Arc::new(MemStore::new());
		let chain = BlockHeaderChain::new(store, ChainIndex::new(0, 0));
		let genesis = header(vec![ZERO_HASH; 1], 7);
		let first = chain
			.add(genesis.clone(), ZERO_HASH, 0, Weight::zero())
			.unwrap();
		let second = chain
			.add(genesis, ZERO_HASH, 0, Weight::zero())
			.unwrap();
		assert_eq!(first, AddStatus::Added);
		assert_eq!(second, AddStatus::AlreadyExists);
	}
}

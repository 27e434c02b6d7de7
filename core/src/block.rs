// Copyright 2016 The Grin Developers
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

//! Block headers and blocks.

use crate::group::{ChainIndex, GroupIndex};
use crate::hash::{Hash, Hashed};
use crate::merkle::merkle_root;
use crate::target::Target;
use crate::transaction::Transaction;

/// A block header: the `2G-1` blockDeps, the transactions' Merkle root,
/// the claimed mining timestamp, the PoW target and the winning nonce.
///
/// `blockDeps` ordering is fixed: the first `G-1` entries are the best tip
/// of every *other* group at the time of mining (the inter-group deps); the
/// last `G` entries are the intra-group deps, one per chain `(from, *)`,
/// with `deps[G-1]` (the first intra-group entry) being this header's
/// direct parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
	/// The `2G-1` dependency hashes.
	pub block_deps: Vec<Hash>,
	/// Merkle root of the block's transactions.
	pub tx_root_hash: Hash,
	/// Mining timestamp, Unix epoch milliseconds.
	pub timestamp: i64,
	/// PoW target this header's hash must fall under.
	pub target: Target,
	/// The nonce found by the miner.
	pub nonce: u64,
}

impl Hashed for BlockHeader {
	fn bytes(&self) -> Vec<u8> {
		let mut buf = Vec::new();
		for dep in &self.block_deps {
			buf.extend_from_slice(dep.as_bytes());
		}
		buf.extend_from_slice(self.tx_root_hash.as_bytes());
		buf.extend_from_slice(&self.timestamp.to_be_bytes());
		buf.extend_from_slice(&self.target.to_bytes_be());
		buf.extend_from_slice(&self.nonce.to_be_bytes());
		buf
	}
}

impl BlockHeader {
	/// The group this header's hash routes to, given the network's group
	/// count. A header only ever determines `from`; the destination `to`
	/// group of the chain it lives on is fixed by the block body's
	/// coinbase output.
	pub fn group_from(&self, num_groups: u32) -> GroupIndex {
		ChainIndex::group_of(&self.hash(), num_groups)
	}

	/// The intra-group dependency hashes, one per chain `(from, *)`. These
	/// are the last `G` entries of `block_deps`.
	pub fn intra_group_deps<'a>(&'a self, num_groups: u32) -> &'a [Hash] {
		let start = self.block_deps.len() - num_groups as usize;
		&self.block_deps[start..]
	}

	/// The inter-group dependency hashes: one best tip per other group.
	/// These are the first `G-1` entries of `block_deps`.
	pub fn inter_group_deps(&self, num_groups: u32) -> &[Hash] {
		&self.block_deps[..(num_groups as usize - 1)]
	}

	/// This header's direct intra-group parent: the first entry of the
	/// intra-group deps slice, i.e. `block_deps[G-1]`.
	pub fn parent_hash(&self, num_groups: u32) -> Hash {
		self.intra_group_deps(num_groups)[0]
	}
}

/// A full block: a header plus its transactions. The last transaction is
/// always the coinbase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
	/// The block's header.
	pub header: BlockHeader,
	/// The block's transactions; the last one is the coinbase.
	pub transactions: Vec<Transaction>,
}

impl Block {
	/// The coinbase transaction, the last one in the list.
	pub fn coinbase(&self) -> Option<&Transaction> {
		self.transactions.last()
	}

	/// The chain this block belongs to: `from` comes from the header's
	/// hash, `to` from the coinbase output's destination group.
	pub fn chain_index(&self, num_groups: u32) -> Option<ChainIndex> {
		let from = self.header.group_from(num_groups);
		let to = self.coinbase()?.unsigned.fixed_outputs.first()?.to_group;
		Some(ChainIndex::new(from, to))
	}

	/// Non-coinbase transactions, in order.
	pub fn regular_transactions(&self) -> &[Transaction] {
		if self.transactions.is_empty() {
			&[]
		} else {
			&self.transactions[..self.transactions.len() - 1]
		}
	}

	/// Recomputes the Merkle root of `transactions`, for comparison against
	/// `header.tx_root_hash` during validation.
	pub fn compute_tx_root(&self) -> Hash {
		let ids: Vec<Hash> = self.transactions.iter().map(Hashed::hash).collect();
		merkle_root(&ids)
	}
}

impl Hashed for Block {
	fn bytes(&self) -> Vec<u8> {
		self.header.bytes()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hash::ZERO_HASH;

	fn sample_header(num_groups: u32) -> BlockHeader {
		BlockHeader {
			block_deps: vec![ZERO_HASH; crate::consensus::num_deps(num_groups)],
			tx_root_hash: ZERO_HASH,
			timestamp: 0,
			target: Target::max(),
			nonce: 0,
		}
	}

	#[test]
	fn deps_split_matches_2g_minus_1() {
		let h = sample_header(3);
		assert_eq!(h.inter_group_deps(3).len(), 2);
		assert_eq!(h.intra_group_deps(3).len(), 3);
	}

	#[test]
	fn block_hash_is_header_hash() {
		let h = sample_header(2);
		let b = Block {
			header: h.clone(),
			transactions: vec![],
		};
		assert_eq!(b.hash(), h.hash());
	}
}

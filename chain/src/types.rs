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

//! Shared types used across the per-chain storage hierarchy.

use core::Block;
use core::hash::Hash;

use crate::weight::Weight;

/// The outcome of an `add` to a `BlockHashChain`/`BlockHeaderChain`/
/// `BlockChain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStatus {
	/// Added for the first time.
	Added,
	/// Already present; the add was a no-op.
	AlreadyExists,
}

/// `chainState` column: the per-chain tip set and hash count, kept
/// together so a single read/write covers both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainState {
	/// All current tips (hashes with no recorded child), not just the best.
	pub tips: Vec<Hash>,
	/// Total number of hashes recorded on this chain.
	pub num_hashes: u32,
}

impl Default for ChainState {
	fn default() -> ChainState {
		ChainState {
			tips: Vec::new(),
			num_hashes: 0,
		}
	}
}

/// A hash's chain-local bookkeeping: its height, parent and weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
	/// Height on this chain, genesis is 0.
	pub height: u32,
	/// Parent hash (the chain's genesis is its own parent-less root, see
	/// `flow_core::hash::ZERO_HASH`).
	pub parent: Hash,
	/// Cumulative DAG weight at this hash.
	pub weight: Weight,
}

/// The result of diffing two tips down to their lowest common ancestor:
/// the blocks that leave the canonical chain and the ones that join it.
#[derive(Debug, Clone, Default)]
pub struct ChainDiff {
	/// Blocks to remove, in reverse-height (tip-to-LCA) order.
	pub to_remove: Vec<Block>,
	/// Blocks to add, in forward-height (LCA-to-tip) order.
	pub to_add: Vec<Block>,
}

/// Same as `ChainDiff` but carrying only hashes -- what `BlockHashChain`
/// can compute without loading bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashDiff {
	/// Hashes to remove, in reverse-height order.
	pub to_remove: Vec<Hash>,
	/// Hashes to add, in forward-height order.
	pub to_add: Vec<Hash>,
}

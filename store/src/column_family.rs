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

//! The fixed set of column families the flow engine persists into.

/// A logical partition of the key-value store. Every per-chain storage
/// keeps its keys prefixed by chain index within these families, so the
/// families themselves stay fixed regardless of `G`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColumnFamily {
	/// Full block bodies, keyed by hash.
	Blocks,
	/// Block headers, keyed by hash.
	Headers,
	/// Per-hash chain bookkeeping: height, weight.
	BlockState,
	/// Height to hash-set index, used for fork lookups.
	HeightIndex,
	/// Per-chain state: tips, hash count.
	ChainState,
	/// World-state trie nodes.
	Trie,
	/// Flattened world-state entries (UTXOs, contract state).
	WorldState,
	/// Node-wide metadata: initialization flag, database version.
	NodeState,
}

impl ColumnFamily {
	/// All column families, in a stable order -- used when opening the
	/// RocksDB backend to make sure every family exists.
	pub const ALL: [ColumnFamily; 8] = [
		ColumnFamily::Blocks,
		ColumnFamily::Headers,
		ColumnFamily::BlockState,
		ColumnFamily::HeightIndex,
		ColumnFamily::ChainState,
		ColumnFamily::Trie,
		ColumnFamily::WorldState,
		ColumnFamily::NodeState,
	];

	/// The RocksDB column family name.
	pub fn name(self) -> &'static str {
		match self {
			ColumnFamily::Blocks => "blocks",
			ColumnFamily::Headers => "headers",
			ColumnFamily::BlockState => "block-state",
			ColumnFamily::HeightIndex => "height-index",
			ColumnFamily::ChainState => "chain-state",
			ColumnFamily::Trie => "trie",
			ColumnFamily::WorldState => "world-state",
			ColumnFamily::NodeState => "node-state",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_are_unique() {
		let mut names: Vec<&str> = ColumnFamily::ALL.iter().map(|cf| cf.name()).collect();
		let before = names.len();
		names.sort();
		names.dedup();
		assert_eq!(names.len(), before);
	}
}

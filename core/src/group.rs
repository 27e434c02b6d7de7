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

//! Group and chain indexing for the `G x G` sharded DAG. A node's universe
//! is partitioned into `G` groups; every ordered pair of groups `(from, to)`
//! identifies one of the `G^2` per-group chains.

use crate::hash::Hash;

/// A group identifier, in `[0, G)`.
pub type GroupIndex = u32;

/// Identifies one of the `G^2` chains by the group a block's hash routes to
/// (`from`) and the group its outputs are routed to (`to`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainIndex {
	/// The group this chain's blocks belong to.
	pub from: GroupIndex,
	/// The group this chain's outputs route to.
	pub to: GroupIndex,
}

impl ChainIndex {
	/// Builds a chain index.
	pub fn new(from: GroupIndex, to: GroupIndex) -> ChainIndex {
		ChainIndex { from, to }
	}

	/// The group a hash belongs to: `hash mod num_groups`, read from the
	/// hash's most significant bytes so it's stable regardless of endianness
	/// assumptions elsewhere.
	pub fn group_of(hash: &Hash, num_groups: u32) -> GroupIndex {
		let n = u32::from(hash.as_bytes()[0]) << 24
			| u32::from(hash.as_bytes()[1]) << 16
			| u32::from(hash.as_bytes()[2]) << 8
			| u32::from(hash.as_bytes()[3]);
		n % num_groups
	}

	/// Whether this chain is one of the `G` intra-group chains `(from, from)`.
	pub fn is_intra_group(&self) -> bool {
		self.from == self.to
	}
}

/// Validated group/chain configuration: the number of groups `G` a running
/// node is sharded into. Kept separate from `flow_config::FlowConfig` so
/// core types can depend on it without a cycle back to the config crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
	/// Number of groups, `G`. Must be at least 1.
	pub num_groups: u32,
}

impl GroupConfig {
	/// Builds a `GroupConfig`, rejecting a zero group count.
	pub fn new(num_groups: u32) -> GroupConfig {
		assert!(num_groups > 0, "num_groups must be positive");
		GroupConfig { num_groups }
	}

	/// Total number of chains, `G^2`.
	pub fn num_chains(&self) -> usize {
		(self.num_groups as usize) * (self.num_groups as usize)
	}

	/// Number of blockDeps every header on this network must carry, `2G-1`.
	pub fn num_deps(&self) -> usize {
		crate::consensus::num_deps(self.num_groups)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intra_group_detection() {
		assert!(ChainIndex::new(1, 1).is_intra_group());
		assert!(!ChainIndex::new(1, 2).is_intra_group());
	}

	#[test]
	fn num_chains_is_g_squared() {
		let cfg = GroupConfig::new(3);
		assert_eq!(cfg.num_chains(), 9);
		assert_eq!(cfg.num_deps(), 5);
	}
}

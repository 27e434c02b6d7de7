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

//! Key encoding shared by every per-chain storage layer. All `G^2` chains
//! share the same handful of column families, so every key is prefixed by
//! its chain index to keep ownership of the keyspace exclusive per chain.

use core::group::ChainIndex;
use core::hash::Hash;

const SEP: u8 = b':';

/// Prefixes `suffix` with the chain index, so distinct chains never
/// collide within a shared column family.
fn prefixed(chain: ChainIndex, suffix: &[u8]) -> Vec<u8> {
	let mut key = Vec::with_capacity(suffix.len() + 6);
	key.extend_from_slice(&chain.from.to_be_bytes());
	key.extend_from_slice(&chain.to.to_be_bytes());
	key.push(SEP);
	key.extend_from_slice(suffix);
	key
}

/// Key for `hashToHeight[h]` / `hashToWeight[h]` / parent pointer, stored
/// together in the `block-state` column as one `BlockState` record.
pub fn block_state_key(chain: ChainIndex, hash: &Hash) -> Vec<u8> {
	prefixed(chain, hash.as_bytes())
}

/// Key for `heightToHashes[k]`.
pub fn height_index_key(chain: ChainIndex, height: u32) -> Vec<u8> {
	prefixed(chain, &height.to_be_bytes())
}

/// Key for the chain's `chainState` record (tips + hash count).
pub fn chain_state_key(chain: ChainIndex) -> Vec<u8> {
	prefixed(chain, b"state")
}

/// Key for a header body, in the `headers` column.
pub fn header_key(chain: ChainIndex, hash: &Hash) -> Vec<u8> {
	prefixed(chain, hash.as_bytes())
}

/// Key for a full block body, in the `blocks` column.
pub fn block_key(chain: ChainIndex, hash: &Hash) -> Vec<u8> {
	prefixed(chain, hash.as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn distinct_chains_produce_distinct_keys() {
		let h = Hash::from_slice(&[1u8; 32]);
		let a = block_state_key(ChainIndex::new(0, 0), &h);
		let b = block_state_key(ChainIndex::new(0, 1), &h);
		assert_ne!(a, b);
	}
}

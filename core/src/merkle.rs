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

//! A minimal binary Merkle tree over transaction ids, used for
//! `BlockHeader::tx_root_hash`. Not a persistent structure -- unlike a PMMR,
//! it's recomputed from the block body every time it's needed.

use crate::hash::{blake2b_hash, Hash};

/// Computes the Merkle root of a list of leaf hashes. An empty list roots
/// to the zero hash; a single leaf roots to itself; otherwise pairs are
/// hashed together bottom-up, duplicating the last leaf of an odd-length
/// level so every level above the leaves has even length.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
	if leaves.is_empty() {
		return crate::hash::ZERO_HASH;
	}
	let mut level: Vec<Hash> = leaves.to_vec();
	while level.len() > 1 {
		if level.len() % 2 == 1 {
			let last = *level.last().unwrap();
			level.push(last);
		}
		level = level
			.chunks(2)
			.map(|pair| hash_pair(&pair[0], &pair[1]))
			.collect();
	}
	level[0]
}

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
	let mut buf = Vec::with_capacity(64);
	buf.extend_from_slice(left.as_bytes());
	buf.extend_from_slice(right.as_bytes());
	blake2b_hash(&buf)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_roots_to_zero() {
		assert_eq!(merkle_root(&[]), crate::hash::ZERO_HASH);
	}

	#[test]
	fn single_leaf_roots_to_itself() {
		let h = blake2b_hash(b"tx");
		assert_eq!(merkle_root(&[h]), h);
	}

	#[test]
	fn odd_length_duplicates_last_leaf() {
		let a = blake2b_hash(b"a");
		let b = blake2b_hash(b"b");
		let c = blake2b_hash(b"c");
		let with_dup = merkle_root(&[a, b, c, c]);
		let odd = merkle_root(&[a, b, c]);
		assert_eq!(with_dup, odd);
	}

	#[test]
	fn order_sensitive() {
		let a = blake2b_hash(b"a");
		let b = blake2b_hash(b"b");
		assert_ne!(merkle_root(&[a, b]), merkle_root(&[b, a]));
	}
}

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

//! Primary hash function used throughout the protocol: a 32-byte digest
//! derived from a type's canonical byte encoding via blake2b.

use std::fmt;

use crate::bigint;
use blake2::blake2b::blake2b;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A hash uniquely identifying a header, block, transaction or output.
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Hash(pub [u8; 32]);

/// The all-zero hash, used as the parent pointer of a chain's genesis block.
pub const ZERO_HASH: Hash = Hash([0; 32]);

impl Hash {
	/// Builds a Hash from a 32-byte slice. Panics if the slice isn't 32 bytes
	/// long; callers that can't guarantee the length should check first.
	pub fn from_slice(s: &[u8]) -> Hash {
		let mut a = [0u8; 32];
		a.copy_from_slice(s);
		Hash(a)
	}

	/// Returns the hash as a byte slice.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Returns the hash as a big-endian integer, used for PoW comparison
	/// against a target.
	pub fn to_biguint(&self) -> bigint::BigUint {
		bigint::BigUint::from_bytes_be(&self.0)
	}
}

impl fmt::Debug for Hash {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self)
	}
}

impl fmt::Display for Hash {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for b in self.0.iter() {
			write!(f, "{:02x}", b)?;
		}
		Ok(())
	}
}

impl Serialize for Hash {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_bytes(&self.0)
	}
}

impl<'de> Deserialize<'de> for Hash {
	fn deserialize<D>(deserializer: D) -> Result<Hash, D::Error>
	where
		D: Deserializer<'de>,
	{
		let bytes = <Vec<u8>>::deserialize(deserializer)?;
		if bytes.len() != 32 {
			return Err(serde::de::Error::custom("hash must be 32 bytes"));
		}
		Ok(Hash::from_slice(&bytes))
	}
}

/// A type that can derive a canonical `Hash` from its byte encoding.
pub trait Hashed {
	/// Computes the hash of this object's canonical byte representation.
	fn hash(&self) -> Hash {
		blake2b_hash(&self.bytes())
	}

	/// Canonical byte representation used to derive the hash.
	fn bytes(&self) -> Vec<u8>;
}

/// Hashes an arbitrary byte slice with blake2b-256.
pub fn blake2b_hash(data: &[u8]) -> Hash {
	let result = blake2b(32, &[], data);
	Hash::from_slice(result.as_bytes())
}

impl Hashed for [u8] {
	fn bytes(&self) -> Vec<u8> {
		self.to_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_is_deterministic() {
		let a = blake2b_hash(b"flow");
		let b = blake2b_hash(b"flow");
		assert_eq!(a, b);
	}

	#[test]
	fn different_input_different_hash() {
		let a = blake2b_hash(b"flow-a");
		let b = blake2b_hash(b"flow-b");
		assert_ne!(a, b);
	}

	#[test]
	fn display_is_lowercase_hex() {
		let h = Hash::from_slice(&[0u8; 32]);
		assert_eq!(format!("{}", h), "0".repeat(64));
	}
}

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

//! The target a block header's hash must fall under to satisfy proof of
//! work, and the difficulty derived from it.

use std::cmp;
use std::fmt;

use bigint::BigUint;
use num_traits::Zero;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::consensus::{MAX_TARGET_ADJUSTMENT_FACTOR, MAX_TARGET_BYTES};
use crate::hash::Hash;

/// The maximum possible target: a header hash never needs to beat this to
/// be considered valid, so it's the lowest possible difficulty.
pub fn max_target() -> BigUint {
	BigUint::from_bytes_be(&MAX_TARGET_BYTES)
}

/// A PoW target: the per-chain threshold a header's hash (read as a
/// big-endian integer) must be strictly below.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target(BigUint);

impl Target {
	/// The easiest possible target (the maximum allowed value).
	pub fn max() -> Target {
		Target(max_target())
	}

	/// Builds a target from its big-endian byte representation.
	pub fn from_bytes_be(bytes: &[u8]) -> Target {
		Target(BigUint::from_bytes_be(bytes))
	}

	/// Big-endian byte representation of this target, 32 bytes wide.
	pub fn to_bytes_be(&self) -> Vec<u8> {
		let raw = self.0.to_bytes_be();
		let mut padded = vec![0u8; 32 - raw.len()];
		padded.extend_from_slice(&raw);
		padded
	}

	/// Whether `hash`, read as a big-endian integer, is strictly below this
	/// target -- the proof-of-work condition.
	pub fn is_met_by(&self, hash: &Hash) -> bool {
		hash.to_biguint() < self.0
	}

	/// Converts this target into a `Difficulty` (max_target / target).
	pub fn to_difficulty(&self) -> Difficulty {
		if self.0.is_zero() {
			return Difficulty::from_biguint(max_target());
		}
		Difficulty::from_biguint(max_target() / &self.0)
	}

	/// Computes the next target given the observed time span between two
	/// headers `span_secs` apart in height and the configured block time.
	/// Adjustment is clamped to at most a factor of `MAX_TARGET_ADJUSTMENT_FACTOR`
	/// in either direction and bounded above by the maximum target.
	pub fn adjust(&self, span_secs: u64, block_target_secs: u64) -> Target {
		let span_secs = cmp::max(span_secs, 1);
		let num = self.0.clone() * BigUint::from(span_secs);
		let denom = BigUint::from(block_target_secs);
		let mut next = num / denom;

		let max_allowed = &self.0 * BigUint::from(MAX_TARGET_ADJUSTMENT_FACTOR);
		let min_allowed = &self.0 / BigUint::from(MAX_TARGET_ADJUSTMENT_FACTOR);

		if next > max_allowed {
			next = max_allowed;
		}
		if next < min_allowed {
			next = min_allowed;
		}
		let ceiling = max_target();
		if next > ceiling {
			next = ceiling;
		}
		Target(next)
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Target {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.0.to_str_radix(10))
	}
}

impl<'de> Deserialize<'de> for Target {
	fn deserialize<D>(deserializer: D) -> Result<Target, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		let num = BigUint::parse_bytes(s.as_bytes(), 10)
			.ok_or_else(|| de::Error::custom("invalid target decimal string"))?;
		Ok(Target(num))
	}
}

/// The difficulty is the maximum target divided by the current target (or,
/// equivalently, by a header's hash). Higher difficulty means more expected
/// work to find a valid hash.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct Difficulty {
	num: BigUint,
}

impl Difficulty {
	/// The minimum difficulty, reached when the target equals the maximum.
	pub fn one() -> Difficulty {
		Difficulty {
			num: BigUint::from(1u32),
		}
	}

	/// Builds a difficulty directly from a `u64`.
	pub fn from_num(num: u64) -> Difficulty {
		Difficulty {
			num: BigUint::from(num),
		}
	}

	/// Builds a difficulty from a `BigUint`.
	pub fn from_biguint(num: BigUint) -> Difficulty {
		Difficulty { num }
	}

	/// Computes the difficulty implied by a header hash: `max_target / hash`.
	pub fn from_hash(h: &Hash) -> Difficulty {
		let h_num = h.to_biguint();
		if h_num.is_zero() {
			return Difficulty::from_biguint(max_target());
		}
		Difficulty {
			num: max_target() / h_num,
		}
	}

	/// Converts the difficulty back into the `BigUint` it wraps.
	pub fn into_biguint(self) -> BigUint {
		self.num
	}
}

impl fmt::Display for Difficulty {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.num)
	}
}

impl std::ops::Add<Difficulty> for Difficulty {
	type Output = Difficulty;
	fn add(self, other: Difficulty) -> Difficulty {
		Difficulty {
			num: self.num + other.num,
		}
	}
}

impl std::ops::Sub<Difficulty> for Difficulty {
	type Output = Difficulty;
	fn sub(self, other: Difficulty) -> Difficulty {
		Difficulty {
			num: if self.num > other.num {
				self.num - other.num
			} else {
				BigUint::zero()
			},
		}
	}
}

impl Serialize for Difficulty {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.num.to_str_radix(10))
	}
}

impl<'de> Deserialize<'de> for Difficulty {
	fn deserialize<D>(deserializer: D) -> Result<Difficulty, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		let num = BigUint::parse_bytes(s.as_bytes(), 10)
			.ok_or_else(|| de::Error::custom("invalid difficulty decimal string"))?;
		Ok(Difficulty { num })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn max_target_has_lowest_difficulty() {
		let t = Target::max();
		assert_eq!(t.to_difficulty(), Difficulty::one());
	}

	#[test]
	fn adjust_clamps_to_factor_of_four() {
		let t = Target::from_bytes_be(&[0x10; 32]);
		let much_slower = t.adjust(10_000, 10);
		let expected_max = Target(t.clone().0 * BigUint::from(MAX_TARGET_ADJUSTMENT_FACTOR));
		assert_eq!(much_slower, expected_max);

		let much_faster = t.adjust(1, 10_000);
		let expected_min = Target(t.0 / BigUint::from(MAX_TARGET_ADJUSTMENT_FACTOR));
		assert_eq!(much_faster, expected_min);
	}

	#[test]
	fn adjust_monotonicity() {
		let t = Target::from_bytes_be(&[0x10; 32]);
		let slower = t.adjust(20, 10);
		let faster = t.adjust(5, 10);
		assert!(slower >= t);
		assert!(faster <= t);
	}
}

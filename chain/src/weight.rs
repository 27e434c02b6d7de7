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

//! `Weight` is the DAG-aware cumulative work metric: single-chain work
//! extended across the `G^2` DAG by summing in cross-group ancestor
//! contributions at every block (see `flow_blockflow::weight`). Stored as
//! an arbitrary-precision integer since it only ever grows.

use std::fmt;
use std::ops::{Add, Sub};

use bigint::BigUint;
use num_traits::Zero;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use core::target::Difficulty;

/// A cumulative DAG weight. Ordered, and monotonically non-decreasing
/// along any path from genesis.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Weight(BigUint);

impl Weight {
	/// The zero weight, assigned to every chain's genesis block.
	pub fn zero() -> Weight {
		Weight(BigUint::zero())
	}

	/// Builds a weight from a `u64`.
	pub fn from_u64(n: u64) -> Weight {
		Weight(BigUint::from(n))
	}
}

impl From<Difficulty> for Weight {
	/// A single block's contribution to cumulative weight is the actual
	/// proof-of-work its target represents, not a flat per-block count --
	/// matching the glossary's "DAG-aware cumulative work metric".
	fn from(d: Difficulty) -> Weight {
		Weight(d.into_biguint())
	}
}

impl Add for Weight {
	type Output = Weight;
	fn add(self, other: Weight) -> Weight {
		Weight(self.0 + other.0)
	}
}

impl<'a> Add<&'a Weight> for Weight {
	type Output = Weight;
	fn add(self, other: &'a Weight) -> Weight {
		Weight(self.0 + &other.0)
	}
}

impl Sub for Weight {
	type Output = Weight;
	fn sub(self, other: Weight) -> Weight {
		if self.0 >= other.0 {
			Weight(self.0 - other.0)
		} else {
			Weight::zero()
		}
	}
}

impl fmt::Display for Weight {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Weight {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.0.to_str_radix(10))
	}
}

impl<'de> Deserialize<'de> for Weight {
	fn deserialize<D>(deserializer: D) -> Result<Weight, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		let num = BigUint::parse_bytes(s.as_bytes(), 10)
			.ok_or_else(|| de::Error::custom("invalid weight decimal string"))?;
		Ok(Weight(num))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ordering_matches_magnitude() {
		assert!(Weight::from_u64(1) < Weight::from_u64(2));
		assert!(Weight::zero() < Weight::from_u64(1));
	}

	#[test]
	fn sub_saturates_at_zero() {
		let result = Weight::from_u64(1) - Weight::from_u64(5);
		assert_eq!(result, Weight::zero());
	}
}

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

//! Rules required for the flow engine to reach agreement on the shape of
//! the DAG across the whole network. Some are simple parameters (block
//! reward), others short algorithms (the subsidy schedule). As long as
//! they're short enough to keep next to the constants they relate to, they
//! belong here rather than in `blockflow`.

/// The base block subsidy amount, before the halving schedule.
pub const BASE_REWARD: u64 = 1_000_000_000;

/// Number of blocks between reward halvings.
pub const HALVING_INTERVAL: u64 = 2_100_000;

/// Target time between blocks on a single chain, in seconds.
pub const BLOCK_TARGET_SECS: u64 = 15;

/// Maximum factor a target is allowed to change by from one block to the
/// next, in either direction.
pub const MAX_TARGET_ADJUSTMENT_FACTOR: u32 = 4;

/// The easiest possible target: every byte saturated but the topmost
/// nibble, so the maximum value is reachable without overflowing a 256-bit
/// unsigned integer used elsewhere for difficulty comparisons.
pub const MAX_TARGET_BYTES: [u8; 32] = [
	0x0f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
	0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

/// Maximum number of inputs or outputs a transaction may carry. DoS
/// protection only, not a consensus-critical economic parameter.
pub const MAX_IN_OUT_LEN: usize = 50_000;

/// Number of blockDeps every header must carry: `2 * G - 1`.
pub fn num_deps(num_groups: u32) -> usize {
	(2 * num_groups - 1) as usize
}

/// The block subsidy at a given chain height, halving every
/// `HALVING_INTERVAL` blocks until it reaches zero.
pub fn miner_reward(height: u64) -> u64 {
	let halvings = height / HALVING_INTERVAL;
	if halvings >= 64 {
		return 0;
	}
	BASE_REWARD >> halvings
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reward_halves_on_schedule() {
		assert_eq!(miner_reward(0), BASE_REWARD);
		assert_eq!(miner_reward(HALVING_INTERVAL - 1), BASE_REWARD);
		assert_eq!(miner_reward(HALVING_INTERVAL), BASE_REWARD / 2);
		assert_eq!(miner_reward(HALVING_INTERVAL * 2), BASE_REWARD / 4);
	}

	#[test]
	fn deps_count_matches_2g_minus_1() {
		assert_eq!(num_deps(1), 1);
		assert_eq!(num_deps(2), 3);
		assert_eq!(num_deps(4), 7);
	}
}

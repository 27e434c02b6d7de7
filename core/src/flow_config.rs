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

//! The consensus-relevant parameters every component of the flow engine
//! needs, bundled into one record passed by reference instead of read off
//! implicit globals.

use crate::consensus::{BLOCK_TARGET_SECS, MAX_TARGET_ADJUSTMENT_FACTOR};
use crate::target::Target;

/// Consensus and resource parameters shared by `blockflow`, `chain` and
/// `pool`. Constructed once at startup and handed around by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
	/// Number of groups, `G`. The DAG has `G^2` chains.
	pub num_groups: u32,
	/// Target time between blocks on a single chain, in seconds.
	pub block_target_secs: u64,
	/// Maximum clock drift a header's timestamp may have into the future
	/// before it's held as `FutureBlock` rather than rejected outright.
	pub max_clock_drift_millis: i64,
	/// Maximum factor the target may change by between consecutive blocks.
	pub max_target_adjustment_factor: u32,
	/// The easiest allowed target (lowest difficulty floor).
	pub max_mining_target: Target,
	/// Per-chain mempool capacity (`TxPool` entries).
	pub mempool_tx_pool_capacity: usize,
	/// Maximum number of headers/blocks returned in one sync batch.
	pub sync_depth_cap: u64,
	/// Upper bound, in milliseconds, on the `[fromTs, toTs]` span accepted
	/// by a fetch-by-time-range request.
	pub blockflow_fetch_max_age_millis: i64,
}

impl Default for FlowConfig {
	fn default() -> FlowConfig {
		FlowConfig {
			num_groups: 2,
			block_target_secs: BLOCK_TARGET_SECS,
			max_clock_drift_millis: 15_000,
			max_target_adjustment_factor: MAX_TARGET_ADJUSTMENT_FACTOR,
			max_mining_target: Target::max(),
			mempool_tx_pool_capacity: 10_000,
			sync_depth_cap: 2_000,
			blockflow_fetch_max_age_millis: 24 * 60 * 60 * 1000,
		}
	}
}

impl FlowConfig {
	/// Number of blockDeps every header on this network carries, `2G-1`.
	pub fn num_deps(&self) -> usize {
		crate::consensus::num_deps(self.num_groups)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_internally_consistent() {
		let cfg = FlowConfig::default();
		assert_eq!(cfg.num_deps(), 2 * cfg.num_groups as usize - 1);
	}
}

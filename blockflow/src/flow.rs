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

//! `BlockFlow`: the `G x G` multi-chain DAG. Owns one `BlockChain` per
//! `(from, to)` pair, a cross-chain hash index so deps that live on a
//! sibling chain can still be resolved, and the not-yet queue for headers
//! that arrived ahead of their clock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use core::block::{Block, BlockHeader};
use core::consensus;
use core::group::{ChainIndex, GroupIndex};
use core::hash::{Hash, Hashed, ZERO_HASH};
use core::flow_config::FlowConfig;
use core::target::Target;
use chain::{AddStatus, BlockChain, ChainDiff, Weight, WorldStateStore};
use store::KeyValueStore;
use util::{Mutex, RwLock};

use crate::error::{Error, ErrorKind, InvalidStatus};
use crate::validation;

/// Upper bound on how many future-dated headers/blocks are held waiting
/// for their timestamp to become reachable. Past this, the oldest entry
/// is dropped to make room -- a misbehaving or badly-clocked peer can't
/// grow this queue without bound.
const NOT_YET_QUEUE_CAP: usize = 4_096;

/// A candidate held because its timestamp is too far in the future.
enum PendingItem {
	Header(BlockHeader, ChainIndex),
	Block(Block),
}

struct PendingEntry {
	item: PendingItem,
	due_millis: i64,
}

/// The blocks and hashes that left (`to_remove`) or joined (`to_add`) the
/// canonical chain for `chain` as a result of an `add`.
#[derive(Debug, Clone)]
pub struct Reorg {
	/// The chain whose best tip changed.
	pub chain: ChainIndex,
	/// Blocks that are no longer on the canonical chain, tip-to-LCA order.
	pub to_remove: Vec<Block>,
	/// Blocks that joined the canonical chain, LCA-to-tip order.
	pub to_add: Vec<Block>,
}

/// A mining template: the `2G-1` dependency hashes a new block for
/// `chain` should carry, and the PoW target it must meet.
#[derive(Debug, Clone)]
pub struct BlockTemplate {
	/// The dependency hashes, ordered per `BlockHeader::block_deps`.
	pub deps: Vec<Hash>,
	/// The PoW target the new header must satisfy.
	pub target: Target,
}

/// A by-time-range block fetch request, as served to an API/RPC caller
/// wanting every block with a timestamp in `[from_ts, to_ts]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
	/// Inclusive lower bound, milliseconds since epoch.
	pub from_ts: i64,
	/// Inclusive upper bound, milliseconds since epoch.
	pub to_ts: i64,
}

impl FetchRequest {
	/// Checks `to_ts >= from_ts` and that the span doesn't exceed
	/// `max_age_millis`.
	pub fn validate(&self, max_age_millis: i64) -> Result<(), Error> {
		if self.to_ts < self.from_ts {
			return Err(ErrorKind::FetchRangeInverted.into());
		}
		if self.to_ts - self.from_ts > max_age_millis {
			return Err(ErrorKind::FetchRangeTooWide(max_age_millis).into());
		}
		Ok(())
	}
}

/// The multi-chain DAG. Routes every add to the right `(from, to)`
/// `BlockChain`, computes cross-chain weight, and reports reorgs.
pub struct BlockFlow<S: KeyValueStore> {
	config: FlowConfig,
	chains: Vec<Vec<BlockChain<S>>>,
	/// Maps every known hash to the chain that stores it, so a dependency
	/// hash drawn from another chain's `block_deps` can still be resolved
	/// without the caller tracking which chain produced it.
	index: RwLock<HashMap<Hash, ChainIndex>>,
	world_state: WorldStateStore<S>,
	not_yet: Mutex<Vec<PendingEntry>>,
}

impl<S: KeyValueStore> BlockFlow<S> {
	/// Builds an empty `BlockFlow` over `G^2` chains sharing `store`.
	pub fn new(store: Arc<S>, config: FlowConfig) -> BlockFlow<S> {
		let g = config.num_groups;
		let mut chains = Vec::with_capacity(g as usize);
		for from in 0..g {
			let mut row = Vec::with_capacity(g as usize);
			for to in 0..g {
				row.push(BlockChain::new(store.clone(), ChainIndex::new(from, to)));
			}
			chains.push(row);
		}
		BlockFlow {
			config,
			chains,
			index: RwLock::new(HashMap::new()),
			world_state: WorldStateStore::new(store),
			not_yet: Mutex::new(Vec::new()),
		}
	}

	/// The network's consensus parameters.
	pub fn config(&self) -> &FlowConfig {
		&self.config
	}

	/// The world state view shared by every chain.
	pub fn world_state(&self) -> &WorldStateStore<S> {
		&self.world_state
	}

	fn chain(&self, idx: ChainIndex) -> &BlockChain<S> {
		&self.chains[idx.from as usize][idx.to as usize]
	}

	/// The chain a known hash was recorded on.
	pub(crate) fn chain_of(&self, h: &Hash) -> Result<ChainIndex, Error> {
		self.index
			.read()
			.get(h)
			.cloned()
			.ok_or_else(|| ErrorKind::HashNotFound(*h).into())
	}

	/// Whether `h` has been recorded on any of the `G^2` chains.
	pub fn contains(&self, h: &Hash) -> bool {
		*h == ZERO_HASH || self.index.read().contains_key(h)
	}

	/// Weight of `h`, wherever it lives. The sentinel `ZERO_HASH` (the
	/// virtual ancestor of every genesis block) has weight zero.
	pub fn weight_of(&self, h: &Hash) -> Result<Weight, Error> {
		if *h == ZERO_HASH {
			return Ok(Weight::zero());
		}
		let chain = self.chain_of(h)?;
		Ok(self.chain(chain).weight_of(h)?)
	}

	/// Height of `h`, wherever it lives.
	pub fn height_of(&self, h: &Hash) -> Result<u32, Error> {
		if *h == ZERO_HASH {
			return Ok(0);
		}
		let chain = self.chain_of(h)?;
		Ok(self.chain(chain).height_of(h)?)
	}

	/// Header of `h`, wherever it lives.
	pub(crate) fn header_of(&self, h: &Hash) -> Result<BlockHeader, Error> {
		let chain = self.chain_of(h)?;
		Ok(self.chain(chain).get_header(h)?)
	}

	/// `weight(header) = difficulty(header) + sum(difficulty(a) for a in
	/// ancestors(header))`, where `ancestors(header)` is the set of every
	/// hash transitively reachable from `header` by following `block_deps`
	/// (the parent included, since it's just `block_deps[G-1]`), and
	/// `difficulty(b) = b.header.target.to_difficulty()` -- the actual
	/// proof-of-work each block represents, not a flat per-block count.
	///
	/// The spec describes this as an LCA-delta accumulation over the
	/// inter-group deps alone: `weight(parent) + 1 + sum(weight(dep) -
	/// weight(lca(parent, dep)))`. That shortcut only holds when a header
	/// has at most one dependency edge that diverges from its parent's own
	/// history; with `G >= 2` a header also carries intra-group deps onto
	/// sibling `(from, *)` chains, and those can independently pull in
	/// ancestors the inter-group dep already counted, so summing the deltas
	/// double-counts the overlap. Summing each distinct ancestor's own
	/// difficulty exactly once sidesteps that double-count while still
	/// reproducing "weight is a DAG-aware cumulative work metric" (the
	/// glossary's definition) instead of a plain block count, and is what
	/// reproduces the worked weight sequences.
	fn compute_weight(&self, header: &BlockHeader) -> Result<Weight, Error> {
		let mut seen: HashSet<Hash> = HashSet::new();
		let mut total = Weight::from(header.target.to_difficulty());
		let mut frontier: Vec<Hash> = header
			.block_deps
			.iter()
			.cloned()
			.filter(|d| *d != ZERO_HASH)
			.collect();
		for h in &frontier {
			seen.insert(*h);
		}
		while !frontier.is_empty() {
			let mut next = Vec::new();
			for h in frontier.drain(..) {
				let ancestor_header = self.header_of(&h)?;
				total = total + Weight::from(ancestor_header.target.to_difficulty());
				for dep in ancestor_header.block_deps {
					if dep != ZERO_HASH && seen.insert(dep) {
						next.push(dep);
					}
				}
			}
			frontier = next;
		}
		Ok(total)
	}

	/// The PoW target a header extending `parent` on `chain` must meet,
	/// given the wall-clock `timestamp` it claims.
	pub(crate) fn expected_target(
		&self,
		parent: &Hash,
		timestamp: i64,
	) -> Result<Target, Error> {
		if *parent == ZERO_HASH {
			return Ok(self.config.max_mining_target.clone());
		}
		let parent_header = self.header_of(parent)?;
		let span_secs = ((timestamp - parent_header.timestamp).max(0) / 1000) as u64;
		Ok(parent_header
			.target
			.adjust(span_secs, self.config.block_target_secs))
	}

	/// Routes and records a full block. Runs header and block validation,
	/// computes weight, and if the add changed the chain's best tip,
	/// resolves and returns the `Reorg` the caller should forward to the
	/// affected mempool.
	pub fn add_block(&self, block: Block, now_millis: i64) -> Result<(AddStatus, Option<Reorg>), Error> {
		let chain_index = block
			.chain_index(self.config.num_groups)
			.ok_or(ErrorKind::NoCoinbase)?;

		if let Err(e) = validation::validate_header(self, &block.header, chain_index, now_millis) {
			if let ErrorKind::Invalid(InvalidStatus::FutureBlock(due)) = e.kind() {
				self.queue_future_block(block, due);
			}
			return Err(e);
		}

		let missing = self.missing_deps(&block.header);
		if !missing.is_empty() {
			return Err(ErrorKind::MissingDeps(missing).into());
		}

		let parent = block.header.parent_hash(self.config.num_groups);
		let height = self.next_height(&parent)?;
		validation::validate_block(self, &block, height)?;

		let weight = self.compute_weight(&block.header)?;
		let h = block.header.hash();
		let chain = self.chain(chain_index);
		let old_tip = chain.get_best_tip().ok();

		let status = chain.add(block, parent, height, weight)?;
		if status == AddStatus::Added {
			self.index.write().insert(h, chain_index);
		}

		let reorg = if status == AddStatus::Added {
			self.reorg_after_tip_change(chain_index, old_tip)?
		} else {
			None
		};
		Ok((status, reorg))
	}

	/// Routes and records a bare header, for peers that only sync headers.
	/// `chain_index` is supplied by the caller since a header alone
	/// doesn't carry the coinbase output needed to derive its `to` group.
	pub fn add_header(
		&self,
		header: BlockHeader,
		chain_index: ChainIndex,
		now_millis: i64,
	) -> Result<AddStatus, Error> {
		if let Err(e) = validation::validate_header(self, &header, chain_index, now_millis) {
			if let ErrorKind::Invalid(InvalidStatus::FutureBlock(due)) = e.kind() {
				self.queue_future_header(header, chain_index, due);
			}
			return Err(e);
		}

		let missing = self.missing_deps(&header);
		if !missing.is_empty() {
			return Err(ErrorKind::MissingDeps(missing).into());
		}

		let parent = header.parent_hash(self.config.num_groups);
		let height = self.next_height(&parent)?;
		let weight = self.compute_weight(&header)?;
		let h = header.hash();

		let status = self
			.chain(chain_index)
			.header_chain()
			.add(header, parent, height, weight)?;
		if status == AddStatus::Added {
			self.index.write().insert(h, chain_index);
		}
		Ok(status)
	}

	fn next_height(&self, parent: &Hash) -> Result<u32, Error> {
		if *parent == ZERO_HASH {
			Ok(0)
		} else {
			Ok(self.height_of(parent)? + 1)
		}
	}

	fn missing_deps(&self, header: &BlockHeader) -> Vec<Hash> {
		header
			.block_deps
			.iter()
			.cloned()
			.filter(|d| *d != ZERO_HASH && !self.contains(d))
			.collect()
	}

	fn reorg_after_tip_change(
		&self,
		chain_index: ChainIndex,
		old_tip: Option<Hash>,
	) -> Result<Option<Reorg>, Error> {
		let chain = self.chain(chain_index);
		let new_tip = chain.get_best_tip()?;
		match old_tip {
			Some(old) if old != new_tip => {
				let ChainDiff { to_remove, to_add } = chain.cal_block_diff(&new_tip, &old)?;
				Ok(Some(Reorg {
					chain: chain_index,
					to_remove,
					to_add,
				}))
			}
			_ => Ok(None),
		}
	}

	/// Queues a future-dated header/block for retry once its timestamp
	/// becomes reachable. Drops the oldest pending entry if the queue is
	/// at capacity.
	pub(crate) fn queue_future_header(&self, header: BlockHeader, chain_index: ChainIndex, due_millis: i64) {
		let mut queue = self.not_yet.lock();
		if queue.len() >= NOT_YET_QUEUE_CAP {
			queue.remove(0);
		}
		queue.push(PendingEntry {
			item: PendingItem::Header(header, chain_index),
			due_millis,
		});
	}

	/// Queues a future-dated block for retry, see `queue_future_header`.
	pub(crate) fn queue_future_block(&self, block: Block, due_millis: i64) {
		let mut queue = self.not_yet.lock();
		if queue.len() >= NOT_YET_QUEUE_CAP {
			queue.remove(0);
		}
		queue.push(PendingEntry {
			item: PendingItem::Block(block),
			due_millis,
		});
	}

	/// Drains and re-attempts every pending entry whose timestamp is now
	/// reachable at `now_millis`, returning their outcomes in queue order.
	pub fn retry_not_yet(&self, now_millis: i64) -> Vec<Result<(AddStatus, Option<Reorg>), Error>> {
		let ready: Vec<PendingEntry> = {
			let mut queue = self.not_yet.lock();
			let (ready, still_pending): (Vec<_>, Vec<_>) =
				queue.drain(..).partition(|e| e.due_millis <= now_millis);
			*queue = still_pending;
			ready
		};
		ready
			.into_iter()
			.map(|entry| match entry.item {
				PendingItem::Block(block) => self.add_block(block, now_millis),
				PendingItem::Header(header, chain_index) => self
					.add_header(header, chain_index, now_millis)
					.map(|status| (status, None)),
			})
			.collect()
	}

	/// Builds a mining template for `chain_index`: the best tips of every
	/// other group, this group's own chains (with `chain_index`'s own tip
	/// first so it lands at `block_deps[G-1]`, the direct-parent slot),
	/// and the PoW target those deps imply.
	pub fn prepare_block_flow(&self, chain_index: ChainIndex, now_millis: i64) -> Result<BlockTemplate, Error> {
		let g = self.config.num_groups;
		let mut deps = Vec::with_capacity(self.config.num_deps());

		for group in 0..g {
			if group == chain_index.from {
				continue;
			}
			deps.push(self.best_tip_of_group(group)?);
		}

		deps.push(self.chain(chain_index).get_best_tip().unwrap_or(ZERO_HASH));
		for to in 0..g {
			if to == chain_index.to {
				continue;
			}
			deps.push(
				self.chain(ChainIndex::new(chain_index.from, to))
					.get_best_tip()
					.unwrap_or(ZERO_HASH),
			);
		}

		let parent = deps[(g as usize) - 1];
		let target = self.expected_target(&parent, now_millis)?;
		Ok(BlockTemplate { deps, target })
	}

	/// The best tip across every `(group, *)` chain, by max weight then
	/// smallest hash.
	fn best_tip_of_group(&self, group: GroupIndex) -> Result<Hash, Error> {
		let g = self.config.num_groups;
		let mut best: Option<(Weight, Hash)> = None;
		for to in 0..g {
			let tip = match self.chain(ChainIndex::new(group, to)).get_best_tip() {
				Ok(tip) => tip,
				Err(_) => continue,
			};
			let weight = self.weight_of(&tip)?;
			best = Some(match best {
				None => (weight, tip),
				Some((bw, bh)) => {
					if weight > bw || (weight == bw && tip < bh) {
						(weight, tip)
					} else {
						(bw, bh)
					}
				}
			});
		}
		best.map(|(_, h)| h).ok_or_else(|| ErrorKind::HashNotFound(ZERO_HASH).into())
	}

	/// Hashes reachable forward from `locator` on `chain_index`'s chain,
	/// capped at `sync_depth_cap`.
	pub fn get_hashes_after(&self, chain_index: ChainIndex, locator: &Hash) -> Result<Vec<Hash>, Error> {
		let mut hashes = self.chain(chain_index).get_hashes_after(locator)?;
		hashes.truncate(self.config.sync_depth_cap as usize);
		Ok(hashes)
	}

	/// Validates a by-time-range fetch request against this network's
	/// `blockflow_fetch_max_age_millis`.
	pub fn validate_fetch_request(&self, req: FetchRequest) -> Result<(), Error> {
		req.validate(self.config.blockflow_fetch_max_age_millis)
	}
}

/// Locator-style height sampler for sync: dense near both `from` and `to`,
/// exponentially spaced in between. `sample_heights(0, 8) == [0, 1, 2, 4,
/// 6, 7, 8]`; `sample_heights(0, 9) == [0, 1, 2, 4, 5, 7, 8, 9]`.
///
/// Built from two sequences that grow from each end with step sizes
/// `1, 1, 2, 2, 4, 4, ...` (each step size used twice before doubling),
/// meeting at the midpoint: the forward sequence keeps every value up to
/// and including the midpoint, the backward sequence keeps every value
/// strictly past it.
pub fn sample_heights(from: u64, to: u64) -> Vec<u64> {
	if from >= to {
		return vec![from];
	}
	let mid = from + (to - from) / 2;

	let mut forward = vec![from];
	let mut cur = from;
	let mut step = 1u64;
	let mut uses = 0u32;
	loop {
		let next = cur + step;
		if next > mid {
			break;
		}
		forward.push(next);
		cur = next;
		uses += 1;
		if uses % 2 == 0 {
			step *= 2;
		}
	}

	let mut backward = vec![to];
	let mut cur = to;
	let mut step = 1u64;
	let mut uses = 0u32;
	loop {
		if cur < step {
			break;
		}
		let next = cur - step;
		if next <= mid {
			break;
		}
		backward.push(next);
		cur = next;
		uses += 1;
		if uses % 2 == 0 {
			step *= 2;
		}
	}

	backward.reverse();
	forward.extend(backward);
	forward
}

#[cfg(test)]
mod sample_heights_tests {
	use super::sample_heights;

	#[test]
	fn dense_at_both_ends_exponential_in_the_middle() {
		assert_eq!(sample_heights(0, 8), vec![0, 1, 2, 4, 6, 7, 8]);
		assert_eq!(sample_heights(0, 9), vec![0, 1, 2, 4, 5, 7, 8, 9]);
	}

	#[test]
	fn degenerate_range_is_just_from() {
		assert_eq!(sample_heights(5, 5), vec![5]);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::consensus::num_deps;
	use core::target::Target;
	use core::transaction::Transaction;
	use store::MemStore;

	fn cfg(num_groups: u32) -> FlowConfig {
		FlowConfig {
			num_groups,
			..FlowConfig::default()
		}
	}

	fn genesis_deps(num_groups: u32) -> Vec<Hash> {
		vec![ZERO_HASH; num_deps(num_groups)]
	}

	fn mined_block(deps: Vec<Hash>, to_group: u32, nonce: u64, timestamp: i64) -> Block {
		let header = BlockHeader {
			block_deps: deps,
			tx_root_hash: ZERO_HASH,
			timestamp,
			target: Target::max(),
			nonce,
		};
		let coinbase = Transaction::coinbase(consensus::miner_reward(0), vec![], to_group);
		let mut block = Block {
			header,
			transactions: vec![coinbase],
		};
		block.header.tx_root_hash = block.compute_tx_root();
		block
	}

	/// Mines blocks by brute-forcing a nonce so each genesis header's hash
	/// routes to group `from` under a 2-group network -- deterministic and
	/// cheap since `Target::max()` accepts almost any hash.
	fn mine_genesis(num_groups: u32, from: u32, to: u32) -> Block {
		for nonce in 0.. {
			let block = mined_block(genesis_deps(num_groups), to, nonce, 0);
			if block.header.group_from(num_groups) == from {
				return block;
			}
		}
		unreachable!()
	}

	fn mine_child(flow: &BlockFlow<MemStore>, parent_chain: ChainIndex, deps: Vec<Hash>, to: u32, ts: i64) -> Block {
		for nonce in 0.. {
			let block = mined_block(deps.clone(), to, nonce, ts);
			if block.header.group_from(flow.config.num_groups) == parent_chain.from {
				return block;
			}
		}
		unreachable!()
	}

	#[test]
	fn sequential_two_group_add_has_increasing_weight() {
		let store = Arc::new(MemStore::new());
		let flow = BlockFlow::new(store, cfg(2));

		// Add blocks on chains (0,0), (1,1), (0,1), (0,0) in turn; each new
		// block's inter-group dep is the *current* best tip of the other
		// group, so weight climbs 1, 2, 3, 4.
		let g00 = mine_genesis(2, 0, 0);
		let (s, _) = flow.add_block(g00.clone(), 0).unwrap();
		assert_eq!(s, AddStatus::Added);
		assert_eq!(flow.weight_of(&g00.hash()).unwrap(), Weight::from_u64(1));

		let deps11 = vec![g00.hash(), ZERO_HASH, ZERO_HASH];
		let g11 = mine_child(&flow, ChainIndex::new(1, 1), deps11, 1, 500);
		let (s, _) = flow.add_block(g11.clone(), 500).unwrap();
		assert_eq!(s, AddStatus::Added);
		assert_eq!(flow.weight_of(&g11.hash()).unwrap(), Weight::from_u64(2));

		let deps01 = vec![g11.hash(), ZERO_HASH, g00.hash()];
		let b01 = mine_child(&flow, ChainIndex::new(0, 1), deps01, 1, 1000);
		let (s, _) = flow.add_block(b01.clone(), 1000).unwrap();
		assert_eq!(s, AddStatus::Added);
		assert_eq!(flow.weight_of(&b01.hash()).unwrap(), Weight::from_u64(3));

		let deps00 = vec![g11.hash(), g00.hash(), b01.hash()];
		let b00_2 = mine_child(&flow, ChainIndex::new(0, 0), deps00, 0, 2000);
		let (s, _) = flow.add_block(b00_2.clone(), 2000).unwrap();
		assert_eq!(s, AddStatus::Added);
		assert_eq!(flow.weight_of(&b00_2.hash()).unwrap(), Weight::from_u64(4));
	}

	#[test]
	fn fork_then_resolve_picks_the_heavier_child() {
		let store = Arc::new(MemStore::new());
		let flow = BlockFlow::new(store, cfg(2));

		let g00 = mine_genesis(2, 0, 0);
		let g11 = mine_genesis(2, 1, 1);
		flow.add_block(g00.clone(), 0).unwrap();
		flow.add_block(g11.clone(), 0).unwrap();

		let deps = vec![g11.hash(), g00.hash(), ZERO_HASH];
		let left = mine_child(&flow, ChainIndex::new(0, 0), deps.clone(), 0, 1000);
		let right = mine_child(&flow, ChainIndex::new(0, 0), deps, 0, 1000);
		assert_ne!(left.hash(), right.hash());
		flow.add_block(left.clone(), 1000).unwrap();
		flow.add_block(right.clone(), 1000).unwrap();
		assert_eq!(flow.weight_of(&left.hash()).unwrap(), Weight::from_u64(3));
		assert_eq!(flow.weight_of(&right.hash()).unwrap(), Weight::from_u64(3));

		let winner_hash = std::cmp::min(left.hash(), right.hash());
		let child_deps = vec![g11.hash(), winner_hash, ZERO_HASH];
		let child = mine_child(&flow, ChainIndex::new(0, 0), child_deps, 0, 2000);
		let (_, reorg) = flow.add_block(child.clone(), 2000).unwrap();
		assert_eq!(flow.weight_of(&child.hash()).unwrap(), Weight::from_u64(4));

		let tip = flow.chain(ChainIndex::new(0, 0)).get_best_tip().unwrap();
		assert_eq!(tip, child.hash());
		let tips = flow.chain(ChainIndex::new(0, 0)).get_all_tips().unwrap();
		assert!(tips.contains(&std::cmp::max(left.hash(), right.hash())));
		let _ = reorg;
	}

	#[test]
	fn weight_scales_with_difficulty_not_block_count() {
		let store = Arc::new(MemStore::new());
		let flow = BlockFlow::new(store, cfg(2));

		// A flat per-block count would give these two headers the same
		// weight, since neither has any real ancestor (all-ZERO_HASH deps).
		// Scaling by difficulty must not.
		let easy = BlockHeader {
			block_deps: genesis_deps(2),
			tx_root_hash: ZERO_HASH,
			timestamp: 0,
			target: Target::max(),
			nonce: 0,
		};
		let harder_target = Target::from_bytes_be(&[0x7f; 32]);
		let hard = BlockHeader {
			block_deps: genesis_deps(2),
			tx_root_hash: ZERO_HASH,
			timestamp: 0,
			target: harder_target.clone(),
			nonce: 0,
		};

		let easy_weight = flow.compute_weight(&easy).unwrap();
		let hard_weight = flow.compute_weight(&hard).unwrap();
		assert_eq!(easy_weight, Weight::from(Target::max().to_difficulty()));
		assert_eq!(hard_weight, Weight::from(harder_target.to_difficulty()));
		assert!(hard_weight > easy_weight);
	}

	#[test]
	fn fetch_request_rejects_inverted_range() {
		let store = Arc::new(MemStore::new());
		let flow = BlockFlow::new(store, cfg(2));
		let req = FetchRequest { from_ts: 42, to_ts: 1 };
		let err = flow.validate_fetch_request(req).unwrap_err();
		match err.kind() {
			ErrorKind::FetchRangeInverted => {}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn fetch_request_rejects_span_wider_than_max_age() {
		let store = Arc::new(MemStore::new());
		let mut config = cfg(2);
		config.blockflow_fetch_max_age_millis = 100;
		let flow = BlockFlow::new(store, config);
		let req = FetchRequest { from_ts: 0, to_ts: 1000 };
		let err = flow.validate_fetch_request(req).unwrap_err();
		match err.kind() {
			ErrorKind::FetchRangeTooWide(max) => assert_eq!(max, 100),
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn fetch_request_accepts_valid_range() {
		let store = Arc::new(MemStore::new());
		let flow = BlockFlow::new(store, cfg(2));
		let req = FetchRequest { from_ts: 0, to_ts: 1000 };
		flow.validate_fetch_request(req).unwrap();
	}
}

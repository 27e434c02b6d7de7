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

//! Header and block validation, run before anything is handed to a
//! `BlockChain` for storage. Structural and PoW checks only -- `BlockFlow`
//! decides what happens to an invalid candidate.

use std::collections::HashSet;

use core::block::{Block, BlockHeader};
use core::consensus;
use core::group::{ChainIndex, GroupIndex};
use core::hash::{Hashed, ZERO_HASH};
use core::transaction::Transaction;
use store::KeyValueStore;

use crate::error::{Error, ErrorKind, InvalidStatus};
use crate::flow::BlockFlow;

/// Runs the structural, timestamp, PoW and target checks every header must
/// pass before its deps are even looked up. `chain_index` is the chain this
/// header is claimed to belong to.
pub fn validate_header<S: KeyValueStore>(
	flow: &BlockFlow<S>,
	header: &BlockHeader,
	chain_index: ChainIndex,
	now_millis: i64,
) -> Result<(), Error> {
	let g = flow.config().num_groups;

	let actual_from: GroupIndex = header.group_from(g);
	if actual_from != chain_index.from {
		return Err(Error::invalid(InvalidStatus::InvalidGroup));
	}

	let expected_deps = flow.config().num_deps();
	if header.block_deps.len() != expected_deps {
		return Err(Error::invalid(InvalidStatus::InvalidDepsNum {
			expected: expected_deps,
			got: header.block_deps.len(),
		}));
	}

	let hash = header.hash();
	let mut seen = HashSet::with_capacity(header.block_deps.len());
	for dep in &header.block_deps {
		if *dep == hash || (*dep != ZERO_HASH && !seen.insert(*dep)) {
			return Err(Error::invalid(InvalidStatus::InvalidDeps));
		}
	}

	let parent = header.parent_hash(g);
	if parent != ZERO_HASH {
		let parent_header = flow.header_of(&parent)?;
		if header.timestamp < parent_header.timestamp {
			return Err(Error::invalid(InvalidStatus::InvalidTimestamp));
		}
	}
	if header.timestamp > now_millis + flow.config().max_clock_drift_millis {
		return Err(Error::invalid(InvalidStatus::FutureBlock(header.timestamp)));
	}

	if !header.target.is_met_by(&hash) {
		return Err(Error::invalid(InvalidStatus::InvalidPoW));
	}

	let expected_target = flow.expected_target(&parent, header.timestamp)?;
	if header.target != expected_target {
		return Err(Error::invalid(InvalidStatus::InvalidTarget));
	}

	Ok(())
}

/// Runs the block-body checks, on top of `validate_header`: transaction
/// list shape, coinbase reward, tx-root and per-transaction validity.
pub fn validate_block<S: KeyValueStore>(
	flow: &BlockFlow<S>,
	block: &Block,
	height: u32,
) -> Result<(), Error> {
	if block.transactions.is_empty() {
		return Err(Error::invalid(InvalidStatus::EmptyTransactionList));
	}

	let coinbase = block.coinbase().expect("checked non-empty above");
	if !coinbase.is_coinbase_shaped() {
		return Err(Error::invalid(InvalidStatus::InvalidCoinbaseFormat));
	}
	if block.regular_transactions().iter().any(Transaction::is_coinbase_shaped) {
		return Err(Error::invalid(InvalidStatus::InvalidCoinbaseFormat));
	}
	let expected_reward = consensus::miner_reward(height as u64);
	let got_reward = coinbase.unsigned.fixed_outputs[0].amount;
	if got_reward != expected_reward {
		return Err(Error::invalid(InvalidStatus::InvalidCoinbaseReward {
			got: got_reward,
			expected: expected_reward,
		}));
	}

	if block.compute_tx_root() != block.header.tx_root_hash {
		return Err(Error::invalid(InvalidStatus::InvalidTxRoot));
	}

	let world_state = flow.world_state();
	for tx in block.regular_transactions() {
		validate_tx(tx, world_state)?;
	}

	Ok(())
}

/// Validates a single non-coinbase transaction: one signature per input,
/// every input still live in the world state, inputs covering outputs, and
/// successful script execution. Script execution itself happens upstream
/// through whatever `core::vm::Vm` implementation block assembly holds;
/// `tx.script_execution_ok` records that outcome, and a failed script
/// invalidates the transaction (spec §4.4 point 11) just as a failed
/// signature check or an unbalanced sum would -- this pass reads the
/// recorded outcome rather than re-running the VM.
fn validate_tx<S: KeyValueStore>(
	tx: &Transaction,
	world_state: &chain::WorldStateStore<S>,
) -> Result<(), Error> {
	if tx.input_signatures.len() != tx.unsigned.inputs.len() {
		return Err(Error::invalid(InvalidStatus::InvalidTx(
			"input signature count does not match input count".to_string(),
		)));
	}

	if !tx.script_execution_ok {
		return Err(Error::invalid(InvalidStatus::InvalidTx(
			"script execution failed".to_string(),
		)));
	}

	let mut input_sum: u64 = 0;
	for input in &tx.unsigned.inputs {
		let output = world_state
			.get_output(input)?
			.ok_or_else(|| Error::invalid(InvalidStatus::InvalidTx(format!("missing input {}", input.key))))?;
		input_sum = input_sum.checked_add(output.amount).ok_or_else(|| {
			Error::invalid(InvalidStatus::InvalidTx("input sum overflow".to_string()))
		})?;
	}

	let output_sum: u64 = tx
		.unsigned
		.fixed_outputs
		.iter()
		.try_fold(0u64, |acc, out| acc.checked_add(out.amount))
		.ok_or_else(|| Error::invalid(InvalidStatus::InvalidTx("output sum overflow".to_string())))?;

	if input_sum < output_sum {
		return Err(Error::invalid(InvalidStatus::InvalidTx(format!(
			"inputs ({}) do not cover outputs ({})",
			input_sum, output_sum
		))));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::flow_config::FlowConfig;
	use core::target::Target;
	use core::transaction::{AssetOutput, TransactionUnsigned};
	use std::sync::Arc;
	use store::MemStore;

	fn flow_with(num_groups: u32) -> BlockFlow<MemStore> {
		let cfg = FlowConfig {
			num_groups,
			..FlowConfig::default()
		};
		BlockFlow::new(Arc::new(MemStore::new()), cfg)
	}

	fn genesis_header(num_groups: u32) -> BlockHeader {
		let target = Target::max();
		for nonce in 0.. {
			let header = BlockHeader {
				block_deps: vec![ZERO_HASH; consensus::num_deps(num_groups)],
				tx_root_hash: ZERO_HASH,
				timestamp: 0,
				target: target.clone(),
				nonce,
			};
			if target.is_met_by(&header.hash()) {
				return header;
			}
		}
		unreachable!()
	}

	fn chain_index_for(header: &BlockHeader, num_groups: u32, to: u32) -> ChainIndex {
		ChainIndex::new(header.group_from(num_groups), to)
	}

	#[test]
	fn rejects_wrong_deps_count() {
		let flow = flow_with(2);
		let mut header = genesis_header(2);
		header.block_deps.pop();
		let idx = chain_index_for(&header, 2, 0);
		let err = validate_header(&flow, &header, idx, 0).unwrap_err();
		match err.kind() {
			ErrorKind::Invalid(InvalidStatus::InvalidDepsNum { expected, got }) => {
				assert_eq!(expected, 3);
				assert_eq!(got, 2);
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn rejects_future_timestamp() {
		let flow = flow_with(2);
		let mut header = genesis_header(2);
		header.timestamp = 10_000_000;
		let idx = chain_index_for(&header, 2, 0);
		let err = validate_header(&flow, &header, idx, 0).unwrap_err();
		match err.kind() {
			ErrorKind::Invalid(InvalidStatus::FutureBlock(ts)) => assert_eq!(ts, 10_000_000),
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn rejects_duplicate_deps() {
		let flow = flow_with(2);
		let mut header = genesis_header(2);
		header.block_deps[0] = Hashed::hash(&b"dup"[..]);
		header.block_deps[1] = header.block_deps[0];
		let idx = chain_index_for(&header, 2, 0);
		let err = validate_header(&flow, &header, idx, 0).unwrap_err();
		match err.kind() {
			ErrorKind::Invalid(InvalidStatus::InvalidDeps) => {}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn accepts_well_formed_genesis_header() {
		let flow = flow_with(2);
		let header = genesis_header(2);
		let idx = chain_index_for(&header, 2, 0);
		validate_header(&flow, &header, idx, 0).unwrap();
	}

	#[test]
	fn rejects_coinbase_reward_mismatch() {
		let flow = flow_with(2);
		let header = genesis_header(2);
		let idx = chain_index_for(&header, 2, 0);
		let mut block = Block {
			header,
			transactions: vec![Transaction::coinbase(1, vec![], idx.to)],
		};
		block.header.tx_root_hash = block.compute_tx_root();
		let err = validate_block(&flow, &block, 0).unwrap_err();
		match err.kind() {
			ErrorKind::Invalid(InvalidStatus::InvalidCoinbaseReward { got, expected }) => {
				assert_eq!(got, 1);
				assert_eq!(expected, consensus::miner_reward(0));
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn rejects_unbalanced_regular_tx() {
		let flow = flow_with(2);
		let header = genesis_header(2);
		let idx = chain_index_for(&header, 2, 0);
		let coinbase = Transaction::coinbase(consensus::miner_reward(0), vec![], idx.to);
		let bad_tx = Transaction {
			unsigned: TransactionUnsigned {
				inputs: vec![],
				fixed_outputs: vec![AssetOutput {
					amount: 100,
					lockup_script: vec![],
					to_group: 0,
				}],
			},
			input_signatures: vec![],
			generated_outputs: vec![],
			script_execution_ok: true,
		};
		let mut block = Block {
			header,
			transactions: vec![bad_tx, coinbase],
		};
		block.header.tx_root_hash = block.compute_tx_root();
		let err = validate_block(&flow, &block, 0).unwrap_err();
		match err.kind() {
			ErrorKind::Invalid(InvalidStatus::InvalidTx(_)) => {}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn rejects_tx_with_failed_script_execution() {
		let flow = flow_with(2);
		let header = genesis_header(2);
		let idx = chain_index_for(&header, 2, 0);
		let coinbase = Transaction::coinbase(consensus::miner_reward(0), vec![], idx.to);
		let failed_tx = Transaction {
			unsigned: TransactionUnsigned {
				inputs: vec![],
				fixed_outputs: vec![],
			},
			input_signatures: vec![],
			generated_outputs: vec![],
			script_execution_ok: false,
		};
		let mut block = Block {
			header,
			transactions: vec![failed_tx, coinbase],
		};
		block.header.tx_root_hash = block.compute_tx_root();
		let err = validate_block(&flow, &block, 0).unwrap_err();
		match err.kind() {
			ErrorKind::Invalid(InvalidStatus::InvalidTx(msg)) => {
				assert!(msg.contains("script execution failed"));
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn rejects_a_second_coinbase_shaped_transaction() {
		let flow = flow_with(2);
		let header = genesis_header(2);
		let idx = chain_index_for(&header, 2, 0);
		let coinbase = Transaction::coinbase(consensus::miner_reward(0), vec![], idx.to);
		let second_coinbase = Transaction::coinbase(consensus::miner_reward(0), vec![1], idx.to);
		let mut block = Block {
			header,
			transactions: vec![second_coinbase, coinbase],
		};
		block.header.tx_root_hash = block.compute_tx_root();
		let err = validate_block(&flow, &block, 0).unwrap_err();
		match err.kind() {
			ErrorKind::Invalid(InvalidStatus::InvalidCoinbaseFormat) => {}
			other => panic!("unexpected error: {:?}", other),
		}
	}
}

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

//! Transactions, their inputs/outputs and the output references used to
//! index them in per-chain storage and the mempool.

use crate::group::GroupIndex;
use crate::hash::{blake2b_hash, Hash, Hashed};

/// A reference to an asset output, either spent as an input or produced as
/// a generated output. `hint` is a cheap, non-authoritative locality hint
/// (e.g. the output's height) used to prune lookups; equality and hashing
/// only ever consider `key`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssetOutputRef {
	/// Non-authoritative locality hint.
	pub hint: u32,
	/// The output's unique key.
	pub key: Hash,
}

impl AssetOutputRef {
	/// Builds a new reference.
	pub fn new(hint: u32, key: Hash) -> AssetOutputRef {
		AssetOutputRef { hint, key }
	}
}

impl PartialEq for AssetOutputRef {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for AssetOutputRef {}

impl std::hash::Hash for AssetOutputRef {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

/// A reference to a contract's output, identical shape to `AssetOutputRef`
/// but kept as a distinct type so the two can't be confused at call sites.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContractOutputRef {
	/// Non-authoritative locality hint.
	pub hint: u32,
	/// The output's unique key.
	pub key: Hash,
}

impl PartialEq for ContractOutputRef {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for ContractOutputRef {}

impl std::hash::Hash for ContractOutputRef {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

/// An asset output: an amount locked to a script, routed to a destination
/// group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetOutput {
	/// Amount carried by this output.
	pub amount: u64,
	/// The lockup script controlling who can spend this output.
	pub lockup_script: Vec<u8>,
	/// The group this output is addressed to; determines the chain a
	/// spending transaction's outputs will land on.
	pub to_group: GroupIndex,
}

/// The signable part of a transaction: its inputs and fixed outputs. The
/// transaction id is the hash of this structure, so signatures and
/// generated-output bookkeeping can't retroactively change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionUnsigned {
	/// Outputs this transaction spends.
	pub inputs: Vec<AssetOutputRef>,
	/// Outputs fixed at construction time (before script execution may
	/// generate more, e.g. contract call results).
	pub fixed_outputs: Vec<AssetOutput>,
}

impl Hashed for TransactionUnsigned {
	fn bytes(&self) -> Vec<u8> {
		let mut buf = Vec::new();
		for input in &self.inputs {
			buf.extend_from_slice(input.key.as_bytes());
		}
		for out in &self.fixed_outputs {
			buf.extend_from_slice(&out.amount.to_be_bytes());
			buf.extend_from_slice(&out.lockup_script);
			buf.extend_from_slice(&out.to_group.to_be_bytes());
		}
		buf
	}
}

/// A full transaction: the unsigned body plus input signatures and any
/// outputs generated during script execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
	/// The signed body.
	pub unsigned: TransactionUnsigned,
	/// One signature per input, in `unsigned.inputs` order.
	pub input_signatures: Vec<Vec<u8>>,
	/// Outputs produced by script execution, beyond `unsigned.fixed_outputs`.
	pub generated_outputs: Vec<AssetOutput>,
	/// Whether script execution for this transaction succeeded. A
	/// transaction with a failed script is rejected by per-tx validation
	/// rather than included with no generated outputs.
	pub script_execution_ok: bool,
}

impl Transaction {
	/// The transaction id: the hash of the unsigned body.
	pub fn tx_id(&self) -> Hash {
		self.unsigned.hash()
	}

	/// All outputs this transaction produces, fixed and generated.
	pub fn all_outputs(&self) -> impl Iterator<Item = &AssetOutput> {
		self.unsigned
			.fixed_outputs
			.iter()
			.chain(self.generated_outputs.iter())
	}

	/// Builds the coinbase transaction for a given miner reward. A coinbase
	/// has no inputs, no signatures and exactly one output.
	pub fn coinbase(reward: u64, lockup_script: Vec<u8>, to_group: GroupIndex) -> Transaction {
		Transaction {
			unsigned: TransactionUnsigned {
				inputs: vec![],
				fixed_outputs: vec![AssetOutput {
					amount: reward,
					lockup_script,
					to_group,
				}],
			},
			input_signatures: vec![],
			generated_outputs: vec![],
			script_execution_ok: true,
		}
	}

	/// Derives the canonical output reference for the `index`-th output of
	/// `all_outputs()` (fixed outputs first, then generated). Keyed by a
	/// hash of the transaction id and index so two transactions' outputs
	/// never collide; `hint` carries the index itself as a cheap locality
	/// hint, matching `AssetOutputRef`'s contract that only `key` is
	/// authoritative.
	pub fn output_ref(&self, index: usize) -> AssetOutputRef {
		let mut buf = self.tx_id().as_bytes().to_vec();
		buf.extend_from_slice(&(index as u32).to_be_bytes());
		AssetOutputRef::new(index as u32, blake2b_hash(&buf))
	}

	/// Whether this transaction is shaped like a valid coinbase: no inputs,
	/// no signatures, exactly one output.
	pub fn is_coinbase_shaped(&self) -> bool {
		self.unsigned.inputs.is_empty()
			&& self.input_signatures.is_empty()
			&& self.unsigned.fixed_outputs.len() == 1
			&& self.generated_outputs.is_empty()
	}
}

impl Hashed for Transaction {
	fn bytes(&self) -> Vec<u8> {
		self.unsigned.bytes()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hash::blake2b_hash;

	#[test]
	fn output_refs_equal_iff_key_matches() {
		let a = AssetOutputRef::new(1, blake2b_hash(b"a"));
		let b = AssetOutputRef::new(2, blake2b_hash(b"a"));
		let c = AssetOutputRef::new(1, blake2b_hash(b"c"));
		assert_eq!(a, b);
		assert_ne!(a, c);
	}

	#[test]
	fn tx_id_depends_only_on_unsigned_body() {
		let unsigned = TransactionUnsigned {
			inputs: vec![],
			fixed_outputs: vec![AssetOutput {
				amount: 10,
				lockup_script: vec![1, 2, 3],
				to_group: 0,
			}],
		};
		let tx1 = Transaction {
			unsigned: unsigned.clone(),
			input_signatures: vec![],
			generated_outputs: vec![],
			script_execution_ok: true,
		};
		let mut tx2 = tx1.clone();
		tx2.script_execution_ok = false;
		assert_eq!(tx1.tx_id(), tx2.tx_id());
	}

	#[test]
	fn coinbase_is_coinbase_shaped() {
		let cb = Transaction::coinbase(1_000_000_000, vec![9], 0);
		assert!(cb.is_coinbase_shaped());
	}

	#[test]
	fn output_refs_are_distinct_per_index_and_tx() {
		let a = Transaction::coinbase(10, vec![1], 0);
		let b = Transaction::coinbase(10, vec![2], 0);
		assert_ne!(a.output_ref(0), b.output_ref(0));
		let unsigned = TransactionUnsigned {
			inputs: vec![],
			fixed_outputs: vec![
				AssetOutput {
					amount: 1,
					lockup_script: vec![],
					to_group: 0,
				},
				AssetOutput {
					amount: 2,
					lockup_script: vec![],
					to_group: 0,
				},
			],
		};
		let tx = Transaction {
			unsigned,
			input_signatures: vec![],
			generated_outputs: vec![],
			script_execution_ok: true,
		};
		assert_ne!(tx.output_ref(0), tx.output_ref(1));
	}
}

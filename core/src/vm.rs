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

//! The embedded stateful VM is an external collaborator: the flow engine
//! calls into it to execute a transaction's script against a world-state
//! snapshot, but neither the opcode set nor gas accounting live here.

use std::collections::HashMap;

use failure::Fail;

use crate::transaction::{AssetOutput, AssetOutputRef, Transaction};

/// A read/write view of contract and asset state a transaction's script
/// executes against. The flow engine only needs to pass this through, not
/// interpret it.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
	/// Outputs known to be unspent, by reference.
	pub utxos: HashMap<AssetOutputRef, AssetOutput>,
}

/// The state changes produced by executing one transaction's script: the
/// outputs it consumes and the outputs (and any contract-state writes) it
/// produces. Opaque beyond that -- the VM owns the shape of contract state.
#[derive(Debug, Clone, Default)]
pub struct WorldStateDelta {
	/// References consumed by this execution.
	pub consumed: Vec<AssetOutputRef>,
	/// Outputs newly created by this execution.
	pub created: Vec<AssetOutput>,
}

/// Errors a VM execution can raise. The flow engine treats any of these as
/// "this transaction's script failed": the result is recorded in
/// `scriptExecutionOk`, and a transaction whose script failed is rejected
/// by per-tx validation (spec §4.4 point 11) rather than silently included.
#[derive(Debug, Fail)]
pub enum VmError {
	/// The script ran out of its gas budget.
	#[fail(display = "out of gas")]
	OutOfGas,
	/// The script hit a runtime fault (e.g. invalid opcode, stack underflow).
	#[fail(display = "runtime fault: {}", _0)]
	Runtime(String),
	/// A referenced input or contract wasn't present in the supplied world
	/// state.
	#[fail(display = "missing state: {}", _0)]
	MissingState(String),
}

/// The interface the flow engine calls into during per-tx validation and
/// block assembly. Implemented elsewhere by the actual interpreter; core
/// only needs the call shape.
pub trait Vm {
	/// Executes `tx`'s script against `world_state`, returning the
	/// resulting state delta or the failure that occurred.
	fn execute(
		&self,
		tx: &Transaction,
		world_state: &WorldState,
	) -> Result<WorldStateDelta, VmError>;
}

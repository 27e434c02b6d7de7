// Copyright 2017 The Grin Developers
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

//! The per-group transaction pool: `G` shared `TxPool`s keyed by
//! destination chain, a `PendingPool` for output-chained transactions
//! whose parent hasn't confirmed yet, and the `TxIndexes` the two share
//! for double-spend detection and address lookups.
//!
//! A `MemPool` never touches the key-value store directly -- it has no
//! `store`/`chain` dependency at all. World-state reads (`collect_for_block`,
//! `update_pending_pool`, `get_relevant_utxos`) go through the `UtxoView`
//! trait, which the wiring layer implements over whatever storage backs
//! the running node. This keeps the pool testable with a trivial in-memory
//! double, the same way the teacher's pool tests lean on a `DummyChain`.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

extern crate bincode;
#[macro_use]
extern crate failure_derive;
extern crate failure;
#[macro_use]
extern crate log;

extern crate flow_core as core;

pub mod error;
mod indexes;
mod mempool;
mod pending_pool;
mod tx_pool;
pub mod types;

pub use crate::error::{Error, ErrorKind};
pub use crate::indexes::TxIndexes;
pub use crate::mempool::MemPool;
pub use crate::pending_pool::PendingPool;
pub use crate::tx_pool::TxPool;
pub use crate::types::{AddOutcome, RejectReason, TxCandidate, UtxoView};

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

//! Per-chain storage: the `BlockHashChain` / `BlockHeaderChain` /
//! `BlockChain` hierarchy that backs each of the `G^2` chains `BlockFlow`
//! owns. Validates nothing itself -- callers (`blockflow`) decide what's
//! worth persisting.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

extern crate byteorder;
#[macro_use]
extern crate failure_derive;
extern crate failure;
#[macro_use]
extern crate lazy_static;
extern crate num_bigint as bigint;
extern crate num_traits;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate bincode;
#[macro_use]
extern crate log;

extern crate flow_core as core;
extern crate flow_store as store;
extern crate flow_util as util;

mod block_chain;
pub mod error;
mod hash_chain;
mod header_chain;
mod keys;
pub mod types;
mod weight;
mod world_state;

pub use crate::block_chain::BlockChain;
pub use crate::error::{Error, ErrorKind};
pub use crate::hash_chain::BlockHashChain;
pub use crate::header_chain::BlockHeaderChain;
pub use crate::types::{AddStatus, ChainDiff, HashDiff};
pub use crate::weight::Weight;
pub use crate::world_state::WorldStateStore;

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

//! Core data types for the flow engine: hashes, headers, blocks,
//! transactions, difficulty targets and the consensus constants shared by
//! every other crate in the workspace.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

extern crate blake2_rfc as blake2;
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
extern crate chrono;
#[macro_use]
extern crate log;

extern crate flow_util as util;

pub mod consensus;
pub mod flow_config;
pub mod group;
pub mod hash;
pub mod target;
pub mod transaction;
pub mod block;
pub mod merkle;
pub mod vm;

pub use crate::block::{Block, BlockHeader};
pub use crate::flow_config::FlowConfig;
pub use crate::group::{ChainIndex, GroupIndex};
pub use crate::hash::{Hash, Hashed};
pub use crate::target::Difficulty;
pub use crate::transaction::{AssetOutput, AssetOutputRef, Transaction, TransactionUnsigned};

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

//! The multi-chain DAG: `G^2` `BlockChain`s, header/block validation,
//! weight computation and reorg detection, and the not-yet queue for
//! candidates that outrun their dependencies or their clock.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate failure_derive;
extern crate failure;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

extern crate flow_chain as chain;
extern crate flow_core as core;
extern crate flow_store as store;
extern crate flow_util as util;

pub mod error;
mod flow;
mod validation;

pub use crate::error::{Error, ErrorKind, InvalidStatus};
pub use crate::flow::{sample_heights, BlockFlow, BlockTemplate, FetchRequest, Reorg};

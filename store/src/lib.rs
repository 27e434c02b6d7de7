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

//! Column-family key-value storage for the flow engine. Fixes the
//! `KeyValueStore` interface every per-chain and mempool component depends
//! on, and ships two implementations: an in-memory one for tests, and a
//! RocksDB-backed one for production.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate failure_derive;
extern crate failure;
extern crate rocksdb;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate bincode;

extern crate flow_util as util;

pub mod column_family;
pub mod error;
pub mod mem;
pub mod node_state;
pub mod rocks;
pub mod traits;

pub use crate::column_family::ColumnFamily;
pub use crate::error::{Error, ErrorKind};
pub use crate::mem::MemStore;
pub use crate::rocks::RocksStore;
pub use crate::traits::{KeyValueStore, WriteOp};

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

//! An in-memory `KeyValueStore`, used by every crate's unit tests so they
//! don't need a RocksDB instance on disk to exercise chain/pool logic.

use std::collections::HashMap;

use util::RwLock;

use crate::column_family::ColumnFamily;
use crate::error::Error;
use crate::traits::{KeyValueStore, WriteOp};

/// A `HashMap`-backed store, one map per column family, behind a single
/// `RwLock`. Not meant for production use: no persistence, no concurrent
/// writer throughput beyond a single lock.
#[derive(Default)]
pub struct MemStore {
	data: RwLock<HashMap<ColumnFamily, HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemStore {
	/// Builds an empty store.
	pub fn new() -> MemStore {
		MemStore {
			data: RwLock::new(HashMap::new()),
		}
	}
}

impl KeyValueStore for MemStore {
	fn get(&self, cf: ColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
		let data = self.data.read();
		Ok(data.get(&cf).and_then(|m| m.get(key)).cloned())
	}

	fn put(&self, cf: ColumnFamily, key: &[u8], value: Vec<u8>) -> Result<(), Error> {
		let mut data = self.data.write();
		data.entry(cf).or_insert_with(HashMap::new).insert(key.to_vec(), value);
		Ok(())
	}

	fn delete(&self, cf: ColumnFamily, key: &[u8]) -> Result<(), Error> {
		let mut data = self.data.write();
		if let Some(m) = data.get_mut(&cf) {
			m.remove(key);
		}
		Ok(())
	}

	fn batch(&self, writes: Vec<WriteOp>) -> Result<(), Error> {
		let mut data = self.data.write();
		for write in writes {
			match write {
				WriteOp::Put { cf, key, value } => {
					data.entry(cf).or_insert_with(HashMap::new).insert(key, value);
				}
				WriteOp::Delete { cf, key } => {
					if let Some(m) = data.get_mut(&cf) {
						m.remove(&key);
					}
				}
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn put_then_get_round_trips() {
		let store = MemStore::new();
		store.put(ColumnFamily::Blocks, b"k", b"v".to_vec()).unwrap();
		assert_eq!(
			store.get(ColumnFamily::Blocks, b"k").unwrap(),
			Some(b"v".to_vec())
		);
	}

	#[test]
	fn delete_removes_key() {
		let store = MemStore::new();
		store.put(ColumnFamily::Headers, b"k", b"v".to_vec()).unwrap();
		store.delete(ColumnFamily::Headers, b"k").unwrap();
		assert_eq!(store.get(ColumnFamily::Headers, b"k").unwrap(), None);
	}

	#[test]
	fn column_families_are_isolated() {
		let store = MemStore::new();
		store.put(ColumnFamily::Blocks, b"k", b"v1".to_vec()).unwrap();
		store.put(ColumnFamily::Headers, b"k", b"v2".to_vec()).unwrap();
		assert_eq!(
			store.get(ColumnFamily::Blocks, b"k").unwrap(),
			Some(b"v1".to_vec())
		);
		assert_eq!(
			store.get(ColumnFamily::Headers, b"k").unwrap(),
			Some(b"v2".to_vec())
		);
	}

	#[test]
	fn batch_applies_in_order() {
		let store = MemStore::new();
		store
			.batch(vec![
				WriteOp::Put {
					cf: ColumnFamily::Blocks,
					key: b"k".to_vec(),
					value: b"v1".to_vec(),
				},
				WriteOp::Put {
					cf: ColumnFamily::Blocks,
					key: b"k".to_vec(),
					value: b"v2".to_vec(),
				},
			])
			.unwrap();
		assert_eq!(
			store.get(ColumnFamily::Blocks, b"k").unwrap(),
			Some(b"v2".to_vec())
		);
	}

	#[test]
	fn ser_round_trip() {
		let store = MemStore::new();
		store.put_ser(ColumnFamily::ChainState, b"k", &42u32).unwrap();
		let v: Option<u32> = store.get_ser(ColumnFamily::ChainState, b"k").unwrap();
		assert_eq!(v, Some(42));
	}
}

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

//! RocksDB-backed `KeyValueStore`, using one real column family per
//! `ColumnFamily` variant rather than emulating them with key prefixes.

use rocksdb::{ColumnFamilyDescriptor, DBCompactionStyle, Options, WriteBatch, DB};

use crate::column_family::ColumnFamily;
use crate::error::{Error, ErrorKind};
use crate::node_state::{DatabaseVersion, NodeState, CURRENT_VERSION};
use crate::traits::{KeyValueStore, WriteOp};

/// A RocksDB-backed store opened with all of the flow engine's column
/// families present.
pub struct RocksStore {
	db: DB,
}

impl RocksStore {
	/// Opens (creating if missing) a RocksDB database at `path`, with every
	/// `ColumnFamily` created up front, and checks the stored database
	/// version for backward compatibility.
	pub fn open(path: &str) -> Result<RocksStore, Error> {
		let mut opts = Options::default();
		opts.create_if_missing(true);
		opts.create_missing_column_families(true);
		opts.set_compaction_style(DBCompactionStyle::Universal);
		opts.set_max_open_files(256);
		opts.set_use_fsync(false);

		let cf_descriptors: Vec<ColumnFamilyDescriptor> = ColumnFamily::ALL
			.iter()
			.map(|cf| ColumnFamilyDescriptor::new(cf.name(), Options::default()))
			.collect();

		let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
		let store = RocksStore { db };
		store.check_or_init_version()?;
		Ok(store)
	}

	fn cf_handle(&self, cf: ColumnFamily) -> Result<&rocksdb::ColumnFamily, Error> {
		self.db
			.cf_handle(cf.name())
			.ok_or_else(|| ErrorKind::Backend(format!("missing column family {}", cf.name())).into())
	}

	fn check_or_init_version(&self) -> Result<(), Error> {
		let state: Option<NodeState> = self.get_ser(ColumnFamily::NodeState, b"node-state")?;
		match state {
			None => {
				let fresh = NodeState {
					is_initialized: true,
					database_version: CURRENT_VERSION,
				};
				self.put_ser(ColumnFamily::NodeState, b"node-state", &fresh)
			}
			Some(existing) => {
				if existing.database_version.is_compatible_with(CURRENT_VERSION) {
					Ok(())
				} else {
					Err(ErrorKind::IncompatibleVersion(
						format!("{}", existing.database_version),
						format!("{}", CURRENT_VERSION),
					)
					.into())
				}
			}
		}
	}
}

impl KeyValueStore for RocksStore {
	fn get(&self, cf: ColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
		let handle = self.cf_handle(cf)?;
		Ok(self.db.get_cf(handle, key)?.map(|v| v.to_vec()))
	}

	fn put(&self, cf: ColumnFamily, key: &[u8], value: Vec<u8>) -> Result<(), Error> {
		let handle = self.cf_handle(cf)?;
		self.db.put_cf(handle, key, &value)?;
		Ok(())
	}

	fn delete(&self, cf: ColumnFamily, key: &[u8]) -> Result<(), Error> {
		let handle = self.cf_handle(cf)?;
		self.db.delete_cf(handle, key)?;
		Ok(())
	}

	fn exists(&self, cf: ColumnFamily, key: &[u8]) -> Result<bool, Error> {
		let handle = self.cf_handle(cf)?;
		Ok(self.db.get_cf(handle, key)?.is_some())
	}

	fn batch(&self, writes: Vec<WriteOp>) -> Result<(), Error> {
		let mut batch = WriteBatch::default();
		for write in writes {
			match write {
				WriteOp::Put { cf, key, value } => {
					let handle = self.cf_handle(cf)?;
					batch.put_cf(handle, &key, &value)?;
				}
				WriteOp::Delete { cf, key } => {
					let handle = self.cf_handle(cf)?;
					batch.delete_cf(handle, &key)?;
				}
			}
		}
		self.db.write(batch)?;
		Ok(())
	}
}

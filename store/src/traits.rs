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

//! The `KeyValueStore` interface every per-chain and mempool component
//! depends on. The actual storage engine is an external collaborator; this
//! crate only fixes the shape of the interface and ships two
//! implementations of it (`mem` for tests, `rocks` for production).

use crate::column_family::ColumnFamily;
use crate::error::Error;

/// One write in a batch: either a put or a delete against a column family.
#[derive(Debug, Clone)]
pub enum WriteOp {
	/// Write `value` at `key` in `cf`.
	Put {
		/// Target column family.
		cf: ColumnFamily,
		/// Key bytes.
		key: Vec<u8>,
		/// Value bytes.
		value: Vec<u8>,
	},
	/// Remove `key` from `cf`.
	Delete {
		/// Target column family.
		cf: ColumnFamily,
		/// Key bytes.
		key: Vec<u8>,
	},
}

/// A column-family key-value store. All four operations a chain or mempool
/// actor needs: `get`/`put`/`delete`/`exists`, plus an atomic `batch`.
pub trait KeyValueStore: Send + Sync {
	/// Reads the value at `key` in `cf`, if present.
	fn get(&self, cf: ColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, Error>;

	/// Writes `value` at `key` in `cf`.
	fn put(&self, cf: ColumnFamily, key: &[u8], value: Vec<u8>) -> Result<(), Error>;

	/// Removes `key` from `cf`.
	fn delete(&self, cf: ColumnFamily, key: &[u8]) -> Result<(), Error>;

	/// Whether `key` is present in `cf`.
	fn exists(&self, cf: ColumnFamily, key: &[u8]) -> Result<bool, Error> {
		Ok(self.get(cf, key)?.is_some())
	}

	/// Applies a list of writes atomically: either all commit or none do.
	fn batch(&self, writes: Vec<WriteOp>) -> Result<(), Error>;

	/// Reads and deserializes a bincode-encoded value at `key` in `cf`.
	fn get_ser<T: serde::de::DeserializeOwned>(
		&self,
		cf: ColumnFamily,
		key: &[u8],
	) -> Result<Option<T>, Error> {
		match self.get(cf, key)? {
			Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
			None => Ok(None),
		}
	}

	/// Serializes `value` with bincode and writes it at `key` in `cf`.
	fn put_ser<T: serde::Serialize>(
		&self,
		cf: ColumnFamily,
		key: &[u8],
		value: &T,
	) -> Result<(), Error> {
		let bytes = bincode::serialize(value)?;
		self.put(cf, key, bytes)
	}
}

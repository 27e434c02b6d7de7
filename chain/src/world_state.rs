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

//! Lightweight readonly-friendly view into the persisted world state (the
//! `world-state` column family): asset outputs keyed by their
//! `AssetOutputRef`. Validation reads through this to check an input still
//! exists; block application writes through it to retire spent outputs and
//! record new ones.

use std::sync::Arc;

use core::transaction::{AssetOutput, AssetOutputRef};
use core::vm::WorldStateDelta;
use store::{ColumnFamily, KeyValueStore};

use crate::error::Error;

/// A view into the world state backed by a shared key-value store.
pub struct WorldStateStore<S: KeyValueStore> {
	store: Arc<S>,
}

impl<S: KeyValueStore> WorldStateStore<S> {
	/// Wraps a store handle.
	pub fn new(store: Arc<S>) -> WorldStateStore<S> {
		WorldStateStore { store }
	}

	/// Looks up an output by reference. `None` means the output either
	/// never existed or has already been spent.
	pub fn get_output(&self, r: &AssetOutputRef) -> Result<Option<AssetOutput>, Error> {
		Ok(self
			.store
			.get_ser::<AssetOutput>(ColumnFamily::WorldState, r.key.as_bytes())?)
	}

	/// Whether an output reference still resolves to a live output.
	pub fn contains(&self, r: &AssetOutputRef) -> Result<bool, Error> {
		Ok(self.get_output(r)?.is_some())
	}

	/// Records a newly created output.
	pub fn put_output(&self, r: &AssetOutputRef, output: &AssetOutput) -> Result<(), Error> {
		self.store
			.put_ser(ColumnFamily::WorldState, r.key.as_bytes(), output)?;
		Ok(())
	}

	/// Removes a spent output.
	pub fn remove_output(&self, r: &AssetOutputRef) -> Result<(), Error> {
		self.store.delete(ColumnFamily::WorldState, r.key.as_bytes())?;
		Ok(())
	}

	/// Applies a VM execution delta: retires consumed refs, records created
	/// outputs under the given refs (caller derives one ref per created
	/// output, typically `(tx_id, index)`-derived).
	pub fn apply_delta(
		&self,
		delta: &WorldStateDelta,
		created_refs: &[AssetOutputRef],
	) -> Result<(), Error> {
		for consumed in &delta.consumed {
			self.remove_output(consumed)?;
		}
		for (r, output) in created_refs.iter().zip(delta.created.iter()) {
			self.put_output(r, output)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::hash::blake2b_hash;
	use store::MemStore;

	#[test]
	fn put_then_get_then_remove() {
		let store = Arc::new(MemStore::new());
		let view = WorldStateStore::new(store);
		let r = AssetOutputRef::new(0, blake2b_hash(b"out"));
		let out = AssetOutput {
			amount: 10,
			lockup_script: vec![],
			to_group: 0,
		};
		assert!(!view.contains(&r).unwrap());
		view.put_output(&r, &out).unwrap();
		assert!(view.contains(&r).unwrap());
		view.remove_output(&r).unwrap();
		assert!(!view.contains(&r).unwrap());
	}
}

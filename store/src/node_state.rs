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

//! Node-wide metadata stored in the `node-state` column family: whether the
//! database has been initialized, and the schema version it was written
//! with, checked for backward compatibility on every open.

use std::fmt;

/// A `{major, minor, patch}` database schema version.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseVersion {
	/// Incremented on breaking schema changes.
	pub major: u16,
	/// Incremented on backward-compatible additive schema changes.
	pub minor: u16,
	/// Incremented on bugfix-only changes with no schema impact.
	pub patch: u16,
}

impl DatabaseVersion {
	/// A database written with a version is compatible with a running
	/// version of the same major number. Minor/patch may differ in either
	/// direction: the schema only grows within a major version.
	pub fn is_compatible_with(&self, running: DatabaseVersion) -> bool {
		self.major == running.major
	}
}

impl fmt::Display for DatabaseVersion {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
	}
}

/// The schema version this build of the flow engine writes.
pub const CURRENT_VERSION: DatabaseVersion = DatabaseVersion {
	major: 0,
	minor: 1,
	patch: 0,
};

/// The full `node-state` record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
	/// Whether the database has completed its first-open initialization.
	pub is_initialized: bool,
	/// The schema version the database was last written with.
	pub database_version: DatabaseVersion,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_major_is_compatible() {
		let v1 = DatabaseVersion { major: 1, minor: 0, patch: 0 };
		let v2 = DatabaseVersion { major: 1, minor: 3, patch: 2 };
		assert!(v1.is_compatible_with(v2));
	}

	#[test]
	fn different_major_is_incompatible() {
		let v1 = DatabaseVersion { major: 1, minor: 0, patch: 0 };
		let v2 = DatabaseVersion { major: 2, minor: 0, patch: 0 };
		assert!(!v1.is_compatible_with(v2));
	}
}

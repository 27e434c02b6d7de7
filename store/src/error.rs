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

//! Error types for the storage layer.

use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

/// Storage error, wrapping an `ErrorKind` with a backtrace.
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// Storage error kinds.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// The requested key wasn't present in the column family.
	#[fail(display = "key not found")]
	NotFound,
	/// The underlying backend (RocksDB) returned an error.
	#[fail(display = "storage backend error: {}", _0)]
	Backend(String),
	/// A stored value couldn't be encoded or decoded.
	#[fail(display = "codec error: {}", _0)]
	Codec(String),
	/// The on-disk database version is incompatible with this binary.
	#[fail(
		display = "incompatible database version: stored {}, running {}",
		_0, _1
	)]
	IncompatibleVersion(String, String),
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Error {
	/// The error kind, cloned out of the backtrace context.
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}

impl From<rocksdb::Error> for Error {
	fn from(e: rocksdb::Error) -> Error {
		ErrorKind::Backend(e.to_string()).into()
	}
}

impl From<Box<bincode::ErrorKind>> for Error {
	fn from(e: Box<bincode::ErrorKind>) -> Error {
		ErrorKind::Codec(e.to_string()).into()
	}
}

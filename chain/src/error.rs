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

//! Error types for the per-chain storage crate.

use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

use core::hash::Hash;
use store;

/// Per-chain storage error, wrapping an `ErrorKind` with a backtrace.
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// Storage error definitions.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// The requested hash isn't present on this chain.
	#[fail(display = "hash not found: {}", _0)]
	KeyNotFound(Hash),
	/// The underlying key-value store failed.
	#[fail(display = "storage error: {}", _0)]
	Storage(String),
	/// A parent hash was referenced but isn't present on this chain.
	#[fail(display = "parent not found: {}", _0)]
	ParentNotFound(Hash),
	/// Re-adding a hash at a different height/weight than it already has.
	#[fail(display = "hash {} already recorded with different state", _0)]
	Inconsistent(Hash),
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

impl From<store::Error> for Error {
	fn from(e: store::Error) -> Error {
		ErrorKind::Storage(format!("{}", e)).into()
	}
}

impl From<Box<bincode::ErrorKind>> for Error {
	fn from(e: Box<bincode::ErrorKind>) -> Error {
		ErrorKind::Storage(e.to_string()).into()
	}
}

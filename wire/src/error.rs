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

//! Protocol-level errors: malformed frames, unknown tags, version
//! mismatches. Every variant here is fatal to the connection -- see
//! spec §7's "Protocol" error kind.

use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

/// Wraps an `ErrorKind` with a captured backtrace.
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// Kinds of protocol failure.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// The frame was truncated, had a bad length, or failed to decode.
	#[fail(display = "malformed message frame: {}", _0)]
	WrongFormat(String),
	/// The peer's declared protocol version isn't one we speak.
	#[fail(display = "unsupported protocol version {}", _0)]
	WrongVersion(u32),
	/// The tag byte didn't match any known `Payload` variant.
	#[fail(display = "unexpected message tag {}", _0)]
	UnexpectedMessage(u8),
	/// The magic number didn't match this network's.
	#[fail(display = "bad magic number {:#x}", _0)]
	BadMagic(u32),
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

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Error {
		ErrorKind::WrongFormat(format!("{}", e)).into()
	}
}

impl From<Box<bincode::ErrorKind>> for Error {
	fn from(e: Box<bincode::ErrorKind>) -> Error {
		ErrorKind::WrongFormat(e.to_string()).into()
	}
}

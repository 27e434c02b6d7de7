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

//! The wire protocol the flow engine exchanges with peers: a length-framed
//! `MessageHeader` plus a tagged `Payload` union (spec §6). This crate
//! fixes the message shapes and their encoding only -- the actual socket
//! handling, handshake state machine and peer bookkeeping are the P2P
//! transport's job and live outside the core (spec §1).

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate failure_derive;
extern crate bincode;
extern crate failure;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;

extern crate flow_core as core;

pub mod error;
pub mod message;
pub mod payload;
pub mod vlq;

pub use crate::error::{Error, ErrorKind};
pub use crate::message::{Message, MessageHeader, MAGIC, PROTOCOL_VERSION};
pub use crate::payload::{
	BrokerInfo, GetBlocks, GetHeaders, Hello, NewBlock, NewInv, Payload, Ping, Pong, SendBlocks, SendHeaders,
};

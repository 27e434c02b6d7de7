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

//! The wire `Payload` tagged union (spec §6) and the message bodies it
//! carries.

use core::block::{Block, BlockHeader};
use core::hash::Hash;

/// Handshake information a peer announces about itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerInfo {
	/// First group this broker is responsible for.
	pub group_from: u32,
	/// Last group (inclusive) this broker is responsible for.
	pub group_to: u32,
	/// Address the peer can be dialed back on, e.g. `"203.0.113.4:9973"`.
	pub address: String,
}

/// Tag 0: handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hello {
	/// Identifies the clique this peer belongs to.
	pub clique_id: Hash,
	/// The sender's broker assignment and dial-back address.
	pub broker_info: BrokerInfo,
}

/// Tag 1: keepalive probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ping {
	/// Echoed back verbatim in the matching `Pong`.
	pub nonce: u32,
	/// Sender's wall clock, Unix epoch milliseconds.
	pub ts: i64,
}

/// Tag 2: keepalive response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pong {
	/// The nonce from the `Ping` being answered.
	pub nonce: u32,
}

/// Tag 3: full blocks pushed or sent in answer to `GetBlocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendBlocks {
	/// The blocks, in the sender's preferred order (usually height order).
	pub blocks: Vec<Block>,
}

/// Tag 4: request for blocks following a locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetBlocks {
	/// Locator hashes the requester already has, most recent first.
	pub locators: Vec<Hash>,
}

/// Tag 5: headers pushed or sent in answer to `GetHeaders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendHeaders {
	/// The headers, in the sender's preferred order.
	pub headers: Vec<BlockHeader>,
}

/// Tag 6: request for headers following a locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetHeaders {
	/// Locator hashes the requester already has, most recent first.
	pub locators: Vec<Hash>,
}

/// Tag 7: unsolicited single-block announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlock {
	/// The newly mined or received block.
	pub block: Block,
}

/// Tag 8: unsolicited inventory announcement (hashes only, no bodies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInv {
	/// Hashes the sender has and the receiver may not.
	pub hashes: Vec<Hash>,
}

/// The tagged union of every message body the protocol carries. Tag
/// numbers are part of the wire format (spec §6's table) and must not be
/// renumbered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
	/// Tag 0.
	Hello(Hello),
	/// Tag 1.
	Ping(Ping),
	/// Tag 2.
	Pong(Pong),
	/// Tag 3.
	SendBlocks(SendBlocks),
	/// Tag 4.
	GetBlocks(GetBlocks),
	/// Tag 5.
	SendHeaders(SendHeaders),
	/// Tag 6.
	GetHeaders(GetHeaders),
	/// Tag 7.
	NewBlock(NewBlock),
	/// Tag 8.
	NewInv(NewInv),
}

impl Payload {
	/// The numeric tag byte this variant is framed with (spec §6).
	pub fn tag(&self) -> u8 {
		match self {
			Payload::Hello(_) => 0,
			Payload::Ping(_) => 1,
			Payload::Pong(_) => 2,
			Payload::SendBlocks(_) => 3,
			Payload::GetBlocks(_) => 4,
			Payload::SendHeaders(_) => 5,
			Payload::GetHeaders(_) => 6,
			Payload::NewBlock(_) => 7,
			Payload::NewInv(_) => 8,
		}
	}
}

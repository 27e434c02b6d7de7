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

//! Length-framed message encoding/decoding. A frame on the wire is
//! `[u32 BE frame_len][magic: u32 BE][version: u32 BE][tag: u8][body]`,
//! where `body` is the `Payload` variant named by `tag`, bincode-encoded
//! with big-endian integers. `frame_len` counts everything after itself.
//!
//! This module fixes the data shape from spec §6; actual socket I/O
//! (TCP framing, handshake state machine) is the P2P transport's job and
//! lives outside this crate.

use std::io::{Cursor, Read, Write};

use crate::error::{Error, ErrorKind};
use crate::payload::Payload;
use crate::vlq;

/// Magic number identifying this protocol. Distinct from any well-known
/// network's magic so a misdirected connection fails fast.
pub const MAGIC: u32 = 0x464c_4f57; // "FLOW"

/// The protocol version this build speaks.
pub const PROTOCOL_VERSION: u32 = 1;

/// The fixed-size part of every message: network identity and protocol
/// version, checked before the payload is even looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
	/// Network magic number.
	pub magic: u32,
	/// Protocol version of the sender.
	pub version: u32,
}

impl MessageHeader {
	/// A header for this build's magic and protocol version.
	pub fn current() -> MessageHeader {
		MessageHeader {
			magic: MAGIC,
			version: PROTOCOL_VERSION,
		}
	}

	fn write(&self, writer: &mut dyn Write) -> Result<(), Error> {
		writer.write_all(&self.magic.to_be_bytes())?;
		writer.write_all(&self.version.to_be_bytes())?;
		Ok(())
	}

	fn read(reader: &mut dyn Read) -> Result<MessageHeader, Error> {
		let mut magic_buf = [0u8; 4];
		reader.read_exact(&mut magic_buf)?;
		let magic = u32::from_be_bytes(magic_buf);

		let mut version_buf = [0u8; 4];
		reader.read_exact(&mut version_buf)?;
		let version = u32::from_be_bytes(version_buf);

		Ok(MessageHeader { magic, version })
	}

	/// Checks this header against the build's own magic and version,
	/// returning the protocol error the caller should disconnect on.
	pub fn validate(&self) -> Result<(), Error> {
		if self.magic != MAGIC {
			return Err(ErrorKind::BadMagic(self.magic).into());
		}
		if self.version != PROTOCOL_VERSION {
			return Err(ErrorKind::WrongVersion(self.version).into());
		}
		Ok(())
	}
}

/// A complete protocol message: header plus payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
	/// The fixed header.
	pub header: MessageHeader,
	/// The tagged payload body.
	pub payload: Payload,
}

impl Message {
	/// Wraps `payload` with this build's current header.
	pub fn new(payload: Payload) -> Message {
		Message {
			header: MessageHeader::current(),
			payload,
		}
	}

	/// Encodes this message into its on-wire byte representation,
	/// including the outer `u32` frame length.
	pub fn encode(&self) -> Result<Vec<u8>, Error> {
		let mut body = Vec::new();
		self.header.write(&mut body)?;
		body.write_all(&[self.payload.tag()])?;
		let payload_bytes = bincode::config().big_endian().serialize(&self.payload)?;
		vlq::write_bytes(&payload_bytes, &mut body)?;

		let mut framed = Vec::with_capacity(body.len() + 4);
		framed.write_all(&(body.len() as u32).to_be_bytes())?;
		framed.write_all(&body)?;
		Ok(framed)
	}

	/// Decodes a single message from `reader`, which must be positioned at
	/// the start of a frame (the `u32` length prefix). Does not validate
	/// the header against this build's own magic/version -- call
	/// `header.validate()` for that once decoded, so a caller can choose
	/// to log the mismatch before disconnecting.
	pub fn decode(reader: &mut dyn Read) -> Result<Message, Error> {
		let mut len_buf = [0u8; 4];
		reader.read_exact(&mut len_buf)?;
		let frame_len = u32::from_be_bytes(len_buf) as usize;

		let mut frame = vec![0u8; frame_len];
		reader.read_exact(&mut frame)?;
		let mut cursor = Cursor::new(&frame[..]);

		let header = MessageHeader::read(&mut cursor)?;

		let mut tag_buf = [0u8; 1];
		cursor.read_exact(&mut tag_buf)?;
		let tag = tag_buf[0];

		let payload_bytes = vlq::read_bytes(&mut cursor)?;
		let payload: Payload = bincode::config().big_endian().deserialize(&payload_bytes)?;

		if payload.tag() != tag {
			return Err(ErrorKind::UnexpectedMessage(tag).into());
		}
		trace!("wire: decoded tag {} ({} bytes)", tag, payload_bytes.len());

		Ok(Message { header, payload })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::payload::{BrokerInfo, GetBlocks, Hello, Ping, Pong};
	use core::block::{Block, BlockHeader};
	use core::consensus;
	use core::hash::{Hashed, ZERO_HASH};
	use core::target::Target;
	use core::transaction::Transaction;

	fn sample_header() -> BlockHeader {
		BlockHeader {
			block_deps: vec![ZERO_HASH; 3],
			tx_root_hash: ZERO_HASH,
			timestamp: 0,
			target: Target::max(),
			nonce: 0,
		}
	}

	fn sample_block() -> Block {
		let header = sample_header();
		let coinbase = Transaction::coinbase(consensus::miner_reward(0), vec![], 0);
		let mut block = Block {
			header,
			transactions: vec![coinbase],
		};
		block.header.tx_root_hash = block.compute_tx_root();
		block
	}

	#[test]
	fn round_trips_a_ping() {
		let msg = Message::new(Payload::Ping(Ping { nonce: 42, ts: 1_000 }));
		let bytes = msg.encode().unwrap();
		let mut cursor = Cursor::new(&bytes[..]);
		let decoded = Message::decode(&mut cursor).unwrap();
		assert_eq!(decoded, msg);
		decoded.header.validate().unwrap();
	}

	#[test]
	fn round_trips_every_payload_variant() {
		let h = Hashed::hash(&b"loc"[..]);
		let block = sample_block();
		let variants = vec![
			Payload::Hello(Hello {
				clique_id: h,
				broker_info: BrokerInfo {
					group_from: 0,
					group_to: 1,
					address: "203.0.113.4:9973".to_string(),
				},
			}),
			Payload::Ping(Ping { nonce: 1, ts: 0 }),
			Payload::Pong(Pong { nonce: 7 }),
			Payload::SendBlocks(crate::payload::SendBlocks {
				blocks: vec![block.clone()],
			}),
			Payload::GetBlocks(GetBlocks { locators: vec![h] }),
			Payload::SendHeaders(crate::payload::SendHeaders {
				headers: vec![sample_header()],
			}),
			Payload::GetHeaders(crate::payload::GetHeaders { locators: vec![h] }),
			Payload::NewBlock(crate::payload::NewBlock { block }),
			Payload::NewInv(crate::payload::NewInv { hashes: vec![h, h] }),
		];
		for payload in variants {
			let msg = Message::new(payload.clone());
			let bytes = msg.encode().unwrap();
			let mut cursor = Cursor::new(&bytes[..]);
			let decoded = Message::decode(&mut cursor).unwrap();
			assert_eq!(decoded.payload, payload);
		}
	}

	#[test]
	fn rejects_bad_magic() {
		let msg = Message::new(Payload::Ping(Ping { nonce: 1, ts: 0 }));
		let mut bytes = msg.encode().unwrap();
		// Corrupt the magic number (first byte after the 4-byte frame length).
		bytes[4] ^= 0xff;
		let mut cursor = Cursor::new(&bytes[..]);
		let decoded = Message::decode(&mut cursor).unwrap();
		match decoded.header.validate().unwrap_err().kind() {
			ErrorKind::BadMagic(_) => {}
			other => panic!("unexpected: {:?}", other),
		}
	}

	#[test]
	fn truncated_frame_is_wrong_format() {
		let msg = Message::new(Payload::Ping(Ping { nonce: 1, ts: 0 }));
		let bytes = msg.encode().unwrap();
		let mut cursor = Cursor::new(&bytes[..bytes.len() - 2]);
		assert!(Message::decode(&mut cursor).is_err());
	}
}

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

//! Variable length quantity encoding (LEB128-style, 1-5 bytes) used to
//! frame every length-prefixed byte string that crosses the wire.

use std::io::{self, Read, Write};

const MASK: u8 = 0b0111_1111;
const HIGH_BIT: u8 = 0b1000_0000;

/// Writes `value` as a VLQ, least-significant group first, continuation
/// bit set on every group but the last.
pub fn write(value: u64, writer: &mut dyn Write) -> io::Result<()> {
	let mut qty = value;
	loop {
		let mut byte = (qty & MASK as u64) as u8;
		qty >>= 7;
		if qty > 0 {
			byte |= HIGH_BIT;
		}
		writer.write_all(&[byte])?;
		if qty == 0 {
			break;
		}
	}
	Ok(())
}

/// Reads a VLQ-encoded `u64`. At most 5 groups are read (35 bits), enough
/// for any length this protocol ever frames; a longer run is a corrupt
/// stream.
pub fn read(reader: &mut dyn Read) -> io::Result<u64> {
	let mut value: u64 = 0;
	for i in 0..5 {
		let mut byte = [0u8; 1];
		reader.read_exact(&mut byte)?;
		let byte = byte[0];
		value |= ((byte & MASK) as u64) << (i * 7);
		if byte & HIGH_BIT == 0 {
			return Ok(value);
		}
	}
	Err(io::Error::new(io::ErrorKind::InvalidData, "vlq longer than 5 groups"))
}

/// Writes `bytes` as a VLQ-prefixed byte string: its length, then the
/// bytes themselves.
pub fn write_bytes(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
	write(bytes.len() as u64, writer)?;
	writer.write_all(bytes)
}

/// Reads a VLQ-prefixed byte string written by `write_bytes`.
pub fn read_bytes(reader: &mut dyn Read) -> io::Result<Vec<u8>> {
	let len = read(reader)? as usize;
	let mut buf = vec![0u8; len];
	reader.read_exact(&mut buf)?;
	Ok(buf)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_small_and_large_values() {
		for &v in &[0u64, 1, 127, 128, 65535, 65536, 1_000_000, u64::from(u32::max_value())] {
			let mut buf = Vec::new();
			write(v, &mut buf).unwrap();
			let mut cursor = &buf[..];
			assert_eq!(read(&mut cursor).unwrap(), v);
		}
	}

	#[test]
	fn matches_known_encoding() {
		// 1000 = 0b0000_0011_1110_1000 -> low 7 bits 0x68 with continuation,
		// next 7 bits 0x07.
		let mut buf = Vec::new();
		write(1000, &mut buf).unwrap();
		assert_eq!(buf, vec![0xe8, 0x07]);
	}

	#[test]
	fn byte_string_round_trip() {
		let data = b"the quick brown fox";
		let mut buf = Vec::new();
		write_bytes(data, &mut buf).unwrap();
		let mut cursor = &buf[..];
		assert_eq!(read_bytes(&mut cursor).unwrap(), data);
	}
}

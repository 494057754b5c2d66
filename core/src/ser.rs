// Copyright 2016 The Grin Developers
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

//! Binary stream serialization and deserialization for the types headers and
//! blocks are hashed over. A minimal subset of rustc_serialize customized
//! for our need; implement `Writeable`/`Readable` and use `ser_vec`/
//! `deserialize` on top of it.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use failure::Fail;
use std::io::{self, Read, Write};

/// Errors that can occur serializing or deserializing.
#[derive(Debug, Fail)]
pub enum Error {
	/// Wraps an io error produced when reading or writing.
	#[fail(display = "IO error: {}", _0)]
	IOErr(String),
	/// Data wasn't in a consumable format.
	#[fail(display = "corrupted data")]
	CorruptedData,
	/// Asked to read an unreasonably large chunk of data.
	#[fail(display = "read too large: {}", _0)]
	TooLargeReadErr(String),
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::IOErr(e.to_string())
	}
}

/// Max number of bytes we'll read in one fixed-length read, as a basic
/// guard against malformed length prefixes.
const MAX_FIXED_READ: usize = 1_000_000;

/// Writes binary data to an underlying sink.
pub trait Writer {
	/// Writes a u8.
	fn write_u8(&mut self, n: u8) -> Result<(), Error>;
	/// Writes a u32.
	fn write_u32(&mut self, n: u32) -> Result<(), Error>;
	/// Writes a u64.
	fn write_u64(&mut self, n: u64) -> Result<(), Error>;
	/// Writes a length-prefixed byte vector.
	fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

/// Reads binary data from an underlying source.
pub trait Reader {
	/// Reads a u8.
	fn read_u8(&mut self) -> Result<u8, Error>;
	/// Reads a u32.
	fn read_u32(&mut self) -> Result<u32, Error>;
	/// Reads a u64.
	fn read_u64(&mut self) -> Result<u64, Error>;
	/// Reads a length-prefixed byte vector.
	fn read_bytes(&mut self) -> Result<Vec<u8>, Error>;
}

/// A type that can serialize itself to a `Writer`.
pub trait Writeable {
	/// Writes this value out.
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error>;
}

/// A type that can be deserialized from a `Reader`.
pub trait Readable: Sized {
	/// Reads a value of this type.
	fn read<R: Reader>(reader: &mut R) -> Result<Self, Error>;
}

/// Serializes a `Writeable` into an in-memory byte vector. This is how
/// header/block hashes are computed: the collaborator hashes `ser_vec(h)`.
pub fn ser_vec<W: Writeable>(thing: &W) -> Result<Vec<u8>, Error> {
	let mut vec = Vec::new();
	{
		let mut writer = BinWriter { sink: &mut vec };
		thing.write(&mut writer)?;
	}
	Ok(vec)
}

/// Deserializes a `Readable` from any `std::io::Read` implementation.
pub fn deserialize<T: Readable>(source: &mut dyn Read) -> Result<T, Error> {
	let mut reader = BinReader { source };
	T::read(&mut reader)
}

struct BinWriter<'a> {
	sink: &'a mut dyn Write,
}

impl<'a> Writer for BinWriter<'a> {
	fn write_u8(&mut self, n: u8) -> Result<(), Error> {
		Ok(self.sink.write_u8(n)?)
	}
	fn write_u32(&mut self, n: u32) -> Result<(), Error> {
		Ok(self.sink.write_u32::<BigEndian>(n)?)
	}
	fn write_u64(&mut self, n: u64) -> Result<(), Error> {
		Ok(self.sink.write_u64::<BigEndian>(n)?)
	}
	fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
		self.write_u64(bytes.len() as u64)?;
		Ok(self.sink.write_all(bytes)?)
	}
}

struct BinReader<'a> {
	source: &'a mut dyn Read,
}

impl<'a> Reader for BinReader<'a> {
	fn read_u8(&mut self) -> Result<u8, Error> {
		Ok(self.source.read_u8()?)
	}
	fn read_u32(&mut self) -> Result<u32, Error> {
		Ok(self.source.read_u32::<BigEndian>()?)
	}
	fn read_u64(&mut self) -> Result<u64, Error> {
		Ok(self.source.read_u64::<BigEndian>()?)
	}
	fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
		let len = self.read_u64()? as usize;
		if len > MAX_FIXED_READ {
			return Err(Error::TooLargeReadErr(format!(
				"byte vector length too large: {}",
				len
			)));
		}
		let mut buf = vec![0u8; len];
		self.source.read_exact(&mut buf)?;
		Ok(buf)
	}
}

impl Writeable for crate::hash::Hash {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
		writer.write_bytes(self.as_bytes())
	}
}

impl Readable for crate::hash::Hash {
	fn read<R: Reader>(reader: &mut R) -> Result<Self, Error> {
		let bytes = reader.read_bytes()?;
		if bytes.len() != 32 {
			return Err(Error::CorruptedData);
		}
		let mut a = [0u8; 32];
		a.copy_from_slice(&bytes);
		Ok(crate::hash::Hash::from_bytes(a))
	}
}

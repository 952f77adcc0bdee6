//! Utilities for working with synchsafe integers and unsynchronized ID3v2 content
//!
//! Unsynchronization keeps tag bytes from ever looking like an MPEG frame sync
//! (`0xFF` followed by a byte with its top three bits set). Every `0xFF` that could be
//! misread is followed by an inserted `0x00`, which readers remove again.

use crate::error::Result;

use std::io::{Read, Write};

const BUFFER_SIZE: usize = 8 * 1024;

/// Whether `next` following a `0xFF` must be escaped
pub(crate) fn needs_escape(next: u8) -> bool {
	next == 0 || next & 0xE0 == 0xE0
}

/// Remove unsynchronization from a buffer
///
/// Every `0x00` immediately following a `0xFF` is dropped.
///
/// # Examples
///
/// ```rust
/// use tagwright::id3::v2::util::synchsafe::decode_unsync;
///
/// assert_eq!(decode_unsync(&[0xFF, 0x00, 0xE0, 0xFF, 0x1A]), vec![0xFF, 0xE0, 0xFF, 0x1A]);
/// ```
pub fn decode_unsync(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());

	let mut previous_ff = false;
	for &byte in content {
		if previous_ff && byte == 0 {
			previous_ff = false;
			continue;
		}

		out.push(byte);
		previous_ff = byte == 0xFF;
	}

	out
}

/// Apply unsynchronization to a buffer
///
/// A `0x00` is inserted after every `0xFF` followed by `0x00` or a byte `>= 0xE0`, and after a
/// trailing `0xFF`. This is the inverse of [`decode_unsync`].
///
/// # Examples
///
/// ```rust
/// use tagwright::id3::v2::util::synchsafe::{decode_unsync, encode_unsync};
///
/// let original = [0xFF, 0xE0, 0xFF, 0x1A, 0xFF];
/// let encoded = encode_unsync(&original);
///
/// assert_eq!(encoded, vec![0xFF, 0x00, 0xE0, 0xFF, 0x1A, 0xFF, 0x00]);
/// assert_eq!(decode_unsync(&encoded), original);
/// ```
pub fn encode_unsync(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len() + content.len() / 8);

	for (i, &byte) in content.iter().enumerate() {
		out.push(byte);

		if byte == 0xFF && content.get(i + 1).is_none_or(|next| needs_escape(*next)) {
			out.push(0);
		}
	}

	out
}

/// A reader for unsynchronized content
///
/// The escape byte after a `0xFF` is consumed together with the `0xFF`, so [`Self::consumed`]
/// always points at the start of the next decoded byte. This is what allows frame offsets to be
/// recorded while scanning and revisited later.
///
/// # Examples
///
/// ```rust
/// use std::io::{Cursor, Read};
/// use tagwright::id3::v2::util::synchsafe::UnsynchronizedStream;
///
/// fn main() -> tagwright::error::Result<()> {
/// // The content has two `0xFF 0x00` pairs, which will be removed
/// let content = [0xFF, 0x00, 0x1A, 0xFF, 0x00, 0x15];
///
/// let mut unsynchronized_reader = UnsynchronizedStream::new(Cursor::new(content));
///
/// let mut unsynchronized_content = Vec::new();
/// unsynchronized_reader.read_to_end(&mut unsynchronized_content)?;
///
/// // All null bytes following `0xFF` have been removed
/// assert_eq!(unsynchronized_content, [0xFF, 0x1A, 0xFF, 0x15]);
/// assert_eq!(unsynchronized_reader.consumed(), 6);
/// # Ok(()) }
/// ```
pub struct UnsynchronizedStream<R> {
	reader: R,
	// Same buffer size as `BufReader`
	buf: Box<[u8; BUFFER_SIZE]>,
	bytes_available: usize,
	pos: usize,
	consumed: u64,
}

impl<R> UnsynchronizedStream<R> {
	/// Create a new [`UnsynchronizedStream`]
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			buf: Box::new([0; BUFFER_SIZE]),
			bytes_available: 0,
			pos: 0,
			consumed: 0,
		}
	}

	/// The number of raw (still unsynchronized) bytes consumed so far
	pub fn consumed(&self) -> u64 {
		self.consumed
	}

	/// Extract the reader, discarding the [`UnsynchronizedStream`]
	///
	/// Any bytes buffered but not yet consumed are lost.
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl<R: Read> UnsynchronizedStream<R> {
	// Returns `false` once the reader is exhausted
	fn fill(&mut self) -> std::io::Result<bool> {
		if self.pos < self.bytes_available {
			return Ok(true);
		}

		self.bytes_available = self.reader.read(&mut self.buf[..])?;
		self.pos = 0;

		Ok(self.bytes_available > 0)
	}
}

impl<R: Read> Read for UnsynchronizedStream<R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let mut dest_pos = 0;
		while dest_pos < buf.len() {
			if !self.fill()? {
				break;
			}

			let current_byte = self.buf[self.pos];
			buf[dest_pos] = current_byte;
			dest_pos += 1;
			self.pos += 1;
			self.consumed += 1;

			// Swallow the escape immediately, so it never straddles two reads
			if current_byte == 0xFF && self.fill()? && self.buf[self.pos] == 0 {
				self.pos += 1;
				self.consumed += 1;
			}
		}

		Ok(dest_pos)
	}
}

/// A writer that applies unsynchronization
///
/// The escape state is carried across calls to [`Write::write`], so a `0xFF` ending one call and a
/// `0x00` starting the next are still escaped.
///
/// # Examples
///
/// ```rust
/// use std::io::Write;
/// use tagwright::id3::v2::util::synchsafe::UnsynchronizedWriter;
///
/// # fn main() -> std::io::Result<()> {
/// let mut writer = UnsynchronizedWriter::new(Vec::new());
/// writer.write_all(&[0x01, 0xFF])?;
/// writer.write_all(&[0xF0, 0x02])?;
///
/// assert_eq!(writer.finish()?, vec![0x01, 0xFF, 0x00, 0xF0, 0x02]);
/// # Ok(()) }
/// ```
pub struct UnsynchronizedWriter<W: Write> {
	writer: W,
	last_was_ff: bool,
	written: u64,
}

impl<W: Write> UnsynchronizedWriter<W> {
	/// Create a new [`UnsynchronizedWriter`]
	pub fn new(writer: W) -> Self {
		Self {
			writer,
			last_was_ff: false,
			written: 0,
		}
	}

	/// The number of bytes written to the inner writer, escapes included
	pub fn written(&self) -> u64 {
		self.written
	}

	/// Terminate the stream, escaping a trailing `0xFF`, and return the inner writer
	///
	/// # Errors
	///
	/// * Writing to the inner writer fails
	pub fn finish(mut self) -> std::io::Result<W> {
		if self.last_was_ff {
			self.writer.write_all(&[0])?;
			self.written += 1;
			self.last_was_ff = false;
		}

		Ok(self.writer)
	}
}

impl<W: Write> Write for UnsynchronizedWriter<W> {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		let mut escaped = Vec::with_capacity(buf.len() + 1);
		for &byte in buf {
			if self.last_was_ff && needs_escape(byte) {
				escaped.push(0);
			}

			escaped.push(byte);
			self.last_was_ff = byte == 0xFF;
		}

		self.writer.write_all(&escaped)?;
		self.written += escaped.len() as u64;

		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		self.writer.flush()
	}
}

/// An integer that can be converted to and from synchsafe variants
pub trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in 28 bits
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// // Maximum value we can represent in a synchsafe u32
	/// let unsynch_number = 0xFFF_FFFF_u32;
	/// let synch_number = unsynch_number.synch()?;
	///
	/// // Each byte should have 7 set bits and an MSB of 0
	/// assert_eq!(synch_number, 0b01111111_01111111_01111111_01111111_u32);
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Unsynchronise a synchsafe integer
	///
	/// The high bit of every byte is ignored.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// let unsynch_number = 0xFFF_FFFF_u32;
	/// let synch_number = unsynch_number.synch()?;
	///
	/// let re_unsynch_number = synch_number.unsynch();
	/// assert_eq!(re_unsynch_number, unsynch_number);
	/// # Ok(()) }
	/// ```
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		// 7 bits are available per byte
		const MAXIMUM_INTEGER: u32 = 0x0FFF_FFFF;

		if self > MAXIMUM_INTEGER {
			crate::macros::err!(TooMuchData);
		}

		let n = self;
		Ok((n & 0x7F)
			| ((n & (0x7F << 7)) << 1)
			| ((n & (0x7F << 14)) << 2)
			| ((n & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		let u = self;
		((u & 0x7F00_0000) >> 3) | ((u & 0x7F_0000) >> 2) | ((u & 0x7F00) >> 1) | (u & 0x7F)
	}
}

/// Decode a big endian synchsafe integer
pub fn decode_syncsafe(bytes: [u8; 4]) -> u32 {
	u32::from_be_bytes(bytes).unsynch()
}

/// Encode a big endian synchsafe integer
///
/// # Errors
///
/// `value` doesn't fit in 28 bits
pub fn encode_syncsafe(value: u32) -> Result<[u8; 4]> {
	Ok(value.synch()?.to_be_bytes())
}

use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;

use std::io::{Read, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

/// The size of an ID3v2 header or footer
pub const HEADER_SIZE: u32 = 10;

pub(crate) const HEADER_MAGIC: &[u8; 3] = b"ID3";
pub(crate) const FOOTER_MAGIC: &[u8; 3] = b"3DI";

/// The ID3v2 version
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// Get the version from its major version byte
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::Id3v2Version;
	///
	/// assert_eq!(Id3v2Version::from_major(3), Some(Id3v2Version::V3));
	/// assert_eq!(Id3v2Version::from_major(5), None);
	/// ```
	pub fn from_major(major: u8) -> Option<Self> {
		match major {
			2 => Some(Self::V2),
			3 => Some(Self::V3),
			4 => Some(Self::V4),
			_ => None,
		}
	}

	/// The major version byte
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// The length of a frame ID in this version
	pub fn frame_id_len(self) -> usize {
		match self {
			Self::V2 => 3,
			Self::V3 | Self::V4 => 4,
		}
	}

	/// The size of a frame header in this version
	pub fn frame_header_len(self) -> u32 {
		match self {
			Self::V2 => 6,
			Self::V3 | Self::V4 => 10,
		}
	}

	pub(crate) fn next(self) -> Option<Self> {
		match self {
			Self::V2 => Some(Self::V3),
			Self::V3 => Some(Self::V4),
			Self::V4 => None,
		}
	}

	pub(crate) fn previous(self) -> Option<Self> {
		match self {
			Self::V2 => None,
			Self::V3 => Some(Self::V2),
			Self::V4 => Some(Self::V3),
		}
	}
}

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	/// Whether or not the tag body is unsynchronised
	pub unsynchronisation: bool,
	/// Whether the tag was read with an extended header
	///
	/// Extended headers are never written.
	pub extended_header: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag includes a footer
	pub footer: bool,
	/// The extended header marked the tag as an update of an earlier tag (ID3v2.4 only)
	pub update: bool,
	/// The extended header carried a CRC-32
	pub crc: bool,
	/// The extended header carried tag restrictions (ID3v2.4 only)
	pub restrictions: bool,
}

impl Id3v2TagFlags {
	/// Parse the header flag byte for `version`
	///
	/// Extended header flags are filled in separately.
	pub fn from_byte(version: Id3v2Version, byte: u8) -> Self {
		let modern = version != Id3v2Version::V2;

		Self {
			unsynchronisation: byte & 0x80 == 0x80,
			extended_header: modern && byte & 0x40 == 0x40,
			experimental: modern && byte & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && byte & 0x10 == 0x10,
			..Self::default()
		}
	}

	/// Get the header byte representation of the flags for `version`
	///
	/// NOTE: The extended header bit is never set, as extended headers are not written
	pub fn as_byte(&self, version: Id3v2Version) -> u8 {
		let mut byte = 0;

		if self.unsynchronisation {
			byte |= 0x80;
		}

		if version == Id3v2Version::V2 {
			return byte;
		}

		if self.experimental {
			byte |= 0x20;
		}

		if version == Id3v2Version::V4 && self.footer {
			byte |= 0x10;
		}

		byte
	}
}

/// Which magic a [`RawHeader`] was found with
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum HeaderKind {
	Header,
	Footer,
}

/// The 10 bytes shared by headers and footers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawHeader {
	pub kind: HeaderKind,
	pub major: u8,
	pub revision: u8,
	pub flags: u8,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub size: u32,
}

impl RawHeader {
	/// Parse a header or footer, returning `None` if the bytes are not one
	///
	/// The magic must match, neither version byte may be `0xFF`, and the size bytes must all be
	/// below `0x80`.
	pub(crate) fn parse(bytes: &[u8; 10]) -> Option<Self> {
		let kind = match &bytes[..3] {
			magic if magic == HEADER_MAGIC => HeaderKind::Header,
			magic if magic == FOOTER_MAGIC => HeaderKind::Footer,
			_ => return None,
		};

		if bytes[3] == 0xFF || bytes[4] == 0xFF {
			return None;
		}

		if bytes[6..].iter().any(|b| *b >= 0x80) {
			return None;
		}

		Some(Self {
			kind,
			major: bytes[3],
			revision: bytes[4],
			flags: bytes[5],
			size: BigEndian::read_u32(&bytes[6..]).unsynch(),
		})
	}

	pub(crate) fn write_to<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		let magic = match self.kind {
			HeaderKind::Header => HEADER_MAGIC,
			HeaderKind::Footer => FOOTER_MAGIC,
		};

		writer.write_all(magic)?;
		writer.write_all(&[self.major, self.revision, self.flags])?;
		writer.write_u32::<BigEndian>(self.size.synch()?)?;

		Ok(())
	}
}

/// What an extended header contributed to the tag
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExtendedHeader {
	pub update: bool,
	pub crc: bool,
	pub restrictions: bool,
	/// The number of (decoded) bytes following the part already read
	pub remaining: u32,
}

impl ExtendedHeader {
	/// Read an extended header, not skipping the remaining bytes
	///
	/// For ID3v2.3, `reader` must already undo tag level unsynchronisation.
	pub(crate) fn parse<R>(reader: &mut R, version: Id3v2Version) -> Result<Self>
	where
		R: Read,
	{
		match version {
			// ID3v2.2 reserves the flag for compression, there is no extended header
			Id3v2Version::V2 => Ok(Self::default()),
			Id3v2Version::V3 => {
				// Size (excluding itself), 2 flag bytes, padding size
				let mut header = [0; 10];
				reader.read_exact(&mut header)?;

				let size = BigEndian::read_u32(&header[..4]);
				if size < 6 {
					return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into());
				}

				let crc = header[4] & 0x80 == 0x80;
				log::debug!("ID3v2.3 extended header: size: {size}, crc: {crc}");

				Ok(Self {
					crc,
					remaining: size - 6,
					..Self::default()
				})
			},
			Id3v2Version::V4 => {
				let size = reader.read_u32::<BigEndian>()?.unsynch();
				if size < 6 {
					return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into());
				}

				// Useless byte since there's only 1 byte for flags
				let _num_flag_bytes = reader.read_u8()?;
				let extended_flags = reader.read_u8()?;

				let header = Self {
					update: extended_flags & 0x40 == 0x40,
					crc: extended_flags & 0x20 == 0x20,
					restrictions: extended_flags & 0x10 == 0x10,
					remaining: size - 6,
				};

				log::debug!("ID3v2.4 extended header: size: {size}, {header:?}");
				Ok(header)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{ExtendedHeader, HeaderKind, Id3v2TagFlags, Id3v2Version, RawHeader};

	#[test_log::test]
	fn header_validity() {
		let header = RawHeader::parse(b"ID3\x03\x00\x00\x00\x00\x02\x01").unwrap();
		assert_eq!(header.kind, HeaderKind::Header);
		assert_eq!(header.major, 3);
		assert_eq!(header.size, 257);

		let footer = RawHeader::parse(b"3DI\x04\x00\x10\x00\x00\x00\x7F").unwrap();
		assert_eq!(footer.kind, HeaderKind::Footer);

		// Size bytes must be synchsafe
		assert!(RawHeader::parse(b"ID3\x03\x00\x00\x00\x00\x80\x00").is_none());
		// Versions may not be 0xFF
		assert!(RawHeader::parse(b"ID3\xFF\x00\x00\x00\x00\x00\x00").is_none());
		assert!(RawHeader::parse(b"ID3\x03\xFF\x00\x00\x00\x00\x00").is_none());
		assert!(RawHeader::parse(b"TAG\x03\x00\x00\x00\x00\x00\x00").is_none());
	}

	#[test_log::test]
	fn header_write() {
		let header = RawHeader {
			kind: HeaderKind::Footer,
			major: 4,
			revision: 0,
			flags: 0x10,
			size: 1000,
		};

		let mut out = Vec::new();
		header.write_to(&mut out).unwrap();

		assert_eq!(out, b"3DI\x04\x00\x10\x00\x00\x07\x68");
		assert_eq!(RawHeader::parse(&out.try_into().unwrap()), Some(header));
	}

	#[test_log::test]
	fn flag_bytes() {
		let flags = Id3v2TagFlags::from_byte(Id3v2Version::V4, 0xF0);
		assert!(flags.unsynchronisation && flags.extended_header);
		assert!(flags.experimental && flags.footer);

		// The extended header is dropped, the footer only exists in ID3v2.4
		assert_eq!(flags.as_byte(Id3v2Version::V4), 0xB0);
		assert_eq!(flags.as_byte(Id3v2Version::V3), 0xA0);
		assert_eq!(flags.as_byte(Id3v2Version::V2), 0x80);
	}

	#[test_log::test]
	fn extended_headers() {
		let mut v3 = &b"\x00\x00\x00\x0A\x80\x00\x00\x00\x00\x00"[..];
		let parsed = ExtendedHeader::parse(&mut v3, Id3v2Version::V3).unwrap();
		assert!(parsed.crc);
		assert_eq!(parsed.remaining, 4);

		let mut v4 = &b"\x00\x00\x00\x06\x01\x50"[..];
		let parsed = ExtendedHeader::parse(&mut v4, Id3v2Version::V4).unwrap();
		assert!(parsed.update && parsed.restrictions && !parsed.crc);
		assert_eq!(parsed.remaining, 0);

		let mut bad = &b"\x00\x00\x00\x02\x01\x00"[..];
		assert!(ExtendedHeader::parse(&mut bad, Id3v2Version::V4).is_err());
	}
}

use super::{Frame, FrameFlags, FrameId, Location, Payload};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::header::{ExtendedHeader, Id3v2Version};
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, UnsynchronizedStream, decode_unsync};
use crate::macros::{parse_mode_choice, try_vec};

use std::io::{Read, Seek, SeekFrom, Take};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

/// Where the frames of a tag are, and how they are stored
#[derive(Copy, Clone, Debug)]
pub(crate) struct BodyLayout {
	pub version: Id3v2Version,
	/// The offset of the first byte following the header
	pub start: u64,
	/// The declared tag size
	pub size: u32,
	/// Tag level unsynchronisation
	pub unsynchronised: bool,
	pub extended_header: bool,
	pub seekable: bool,
}

pub(crate) struct ScannedBody {
	pub frames: Vec<Frame>,
	pub extended_header: Option<ExtendedHeader>,
}

/// Read the extended header and every frame header of a tag body
///
/// `reader` must be positioned at [`BodyLayout::start`]. When the stream is seekable, frame payloads
/// are skipped and loaded on demand, otherwise they are read immediately.
pub(crate) fn read_body<R>(
	reader: &mut R,
	layout: BodyLayout,
	parse_options: ParseOptions,
) -> Result<ScannedBody>
where
	R: Read + Seek,
{
	let end = layout.start + u64::from(layout.size);

	// ID3v2.4 unsynchronises frames individually, the flag in the header only
	// says that every frame has been unsynchronised
	if layout.unsynchronised && layout.version != Id3v2Version::V4 {
		log::debug!("Reading an unsynchronised tag body");

		let mut source = UnsyncSource {
			stream: UnsynchronizedStream::new(reader.by_ref().take(u64::from(layout.size))),
			start: layout.start,
			end,
			seekable: layout.seekable,
		};

		return scan(&mut source, layout, parse_options);
	}

	let mut source = DirectSource {
		reader,
		pos: layout.start,
		end,
		seekable: layout.seekable,
	};

	scan(&mut source, layout, parse_options)
}

/// A tag body, as seen by the frame scanner
///
/// Reads produce decoded bytes, positions are always raw stream offsets.
trait FrameSource: Read {
	fn position(&self) -> u64;

	fn remaining(&self) -> u64;

	// Skip `len` decoded bytes
	fn skip(&mut self, len: u32) -> std::io::Result<()>;

	// Whether skipped payloads can be revisited later
	fn can_defer(&self) -> bool;
}

struct DirectSource<'a, R> {
	reader: &'a mut R,
	pos: u64,
	end: u64,
	seekable: bool,
}

impl<R: Read> Read for DirectSource<'_, R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let read = self.reader.read(buf)?;
		self.pos += read as u64;

		Ok(read)
	}
}

impl<R: Read + Seek> FrameSource for DirectSource<'_, R> {
	fn position(&self) -> u64 {
		self.pos
	}

	fn remaining(&self) -> u64 {
		self.end.saturating_sub(self.pos)
	}

	fn skip(&mut self, len: u32) -> std::io::Result<()> {
		if self.seekable {
			self.reader.seek(SeekFrom::Current(i64::from(len)))?;
			self.pos += u64::from(len);
			return Ok(());
		}

		skip_by_reading(self, len)
	}

	fn can_defer(&self) -> bool {
		self.seekable
	}
}

struct UnsyncSource<'a, R> {
	stream: UnsynchronizedStream<Take<&'a mut R>>,
	start: u64,
	end: u64,
	seekable: bool,
}

impl<R: Read> Read for UnsyncSource<'_, R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		self.stream.read(buf)
	}
}

impl<R: Read> FrameSource for UnsyncSource<'_, R> {
	fn position(&self) -> u64 {
		self.start + self.stream.consumed()
	}

	fn remaining(&self) -> u64 {
		self.end.saturating_sub(self.position())
	}

	fn skip(&mut self, len: u32) -> std::io::Result<()> {
		// Escapes can only be found by reading
		skip_by_reading(self, len)
	}

	fn can_defer(&self) -> bool {
		self.seekable
	}
}

fn skip_by_reading<S: Read>(source: &mut S, len: u32) -> std::io::Result<()> {
	let skipped = std::io::copy(&mut source.take(u64::from(len)), &mut std::io::sink())?;
	if skipped != u64::from(len) {
		return Err(std::io::ErrorKind::UnexpectedEof.into());
	}

	Ok(())
}

enum ScanStep {
	Frame(Frame),
	// The frame was dropped, but its end is known
	Skip,
	// Padding, or the end of the body
	End,
	OutOfBounds,
}

fn scan<S>(source: &mut S, layout: BodyLayout, parse_options: ParseOptions) -> Result<ScannedBody>
where
	S: FrameSource,
{
	let parsing_mode = parse_options.parsing_mode;

	let mut extended_header = None;
	if layout.extended_header {
		let header = ExtendedHeader::parse(source, layout.version)?;
		if u64::from(header.remaining) > source.remaining() {
			parse_mode_choice!(
				parsing_mode,
				STRICT: return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into()),
				DEFAULT: {
					log::warn!("Extended header is larger than the tag, ignoring all frames");
					return Ok(ScannedBody {
						frames: Vec::new(),
						extended_header: Some(header),
					});
				}
			);
		}

		source.skip(header.remaining)?;
		extended_header = Some(header);
	}

	let mut frames = Vec::new();
	loop {
		match read_frame(source, layout, parse_options)? {
			ScanStep::Frame(frame) => frames.push(frame),
			ScanStep::Skip => {},
			ScanStep::End => break,
			ScanStep::OutOfBounds => {
				if parsing_mode == ParsingMode::Strict {
					return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
				}

				log::warn!("Frame extends past the end of the tag, discarding it and stopping");
				break;
			},
		}
	}

	log::debug!("Found {} frames", frames.len());
	Ok(ScannedBody {
		frames,
		extended_header,
	})
}

// Read into `buf`, reporting a short read as `false`
fn fill<S: Read>(source: &mut S, buf: &mut [u8]) -> Result<bool> {
	match source.read_exact(buf) {
		Ok(()) => Ok(true),
		Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
		Err(e) => Err(e.into()),
	}
}

fn read_frame<S>(source: &mut S, layout: BodyLayout, parse_options: ParseOptions) -> Result<ScanStep>
where
	S: FrameSource,
{
	let version = layout.version;
	let header_len = version.frame_header_len() as usize;

	// Anything too small to be a frame header is padding
	if source.remaining() < header_len as u64 {
		return Ok(ScanStep::End);
	}

	let mut header = [0; 10];
	let header = &mut header[..header_len];
	if !fill(source, header)? {
		return Ok(ScanStep::End);
	}

	// Assume we just started reading padding
	if header[0] == 0 {
		return Ok(ScanStep::End);
	}

	let id_bytes = &header[..version.frame_id_len()];
	if !FrameId::is_valid_id(id_bytes) {
		if parse_options.parsing_mode == ParsingMode::Strict {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id_bytes.to_vec())).into());
		}

		log::warn!("Found an invalid frame ID ({id_bytes:x?}), stopping");
		return Ok(ScanStep::End);
	}

	let id = FrameId::from_raw(id_bytes);
	let (size, mut flags) = match version {
		Id3v2Version::V2 => (
			BigEndian::read_u24(&header[3..6]),
			FrameFlags::default(),
		),
		Id3v2Version::V3 => (
			BigEndian::read_u32(&header[4..8]),
			FrameFlags::parse(version, BigEndian::read_u16(&header[8..])),
		),
		Id3v2Version::V4 => (
			BigEndian::read_u32(&header[4..8]).unsynch(),
			FrameFlags::parse(version, BigEndian::read_u16(&header[8..])),
		),
	};

	log::trace!("Frame header: {id}, size: {size}, flags: {flags:?}");

	// The size is in decoded bytes, but decoding can only shrink the body
	if u64::from(size) > source.remaining() {
		return Ok(ScanStep::OutOfBounds);
	}

	let additions_len = flags.additions_len(version);
	if size < additions_len {
		if parse_options.parsing_mode == ParsingMode::Strict {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
		}

		log::warn!("Frame {id} is too small for its flags, discarding it");
		return match source.skip(size) {
			Ok(()) => Ok(ScanStep::Skip),
			Err(_) => Ok(ScanStep::OutOfBounds),
		};
	}

	if !read_additions(source, version, &mut flags)? {
		return Ok(ScanStep::OutOfBounds);
	}

	let payload_len = size - additions_len;
	let frame_unsynchronised = version == Id3v2Version::V4 && (flags.unsynchronisation || layout.unsynchronised);

	let payload = if frame_unsynchronised || !source.can_defer() {
		let mut content = try_vec![0; payload_len as usize, parse_options.allocation_limit];
		if !fill(source, &mut content)? {
			return Ok(ScanStep::OutOfBounds);
		}

		if frame_unsynchronised {
			flags.unsynchronisation = true;
			content = decode_unsync(&content);
		}

		Payload::Resident(content)
	} else {
		let offset = source.position();
		if source.skip(payload_len).is_err() {
			return Ok(ScanStep::OutOfBounds);
		}

		Payload::Deferred(Location {
			offset,
			stored_len: (source.position() - offset) as u32,
			unsynchronised: layout.unsynchronised,
		})
	};

	let size = match &payload {
		Payload::Resident(content) => content.len() as u32,
		Payload::Deferred(_) => payload_len,
	};

	Ok(ScanStep::Frame(Frame {
		id,
		flags,
		size,
		payload,
	}))
}

// The values stored between the header and the payload, returns `false` on a short read
fn read_additions<S>(source: &mut S, version: Id3v2Version, flags: &mut FrameFlags) -> Result<bool>
where
	S: FrameSource,
{
	let mut additions = [0; 6];
	let additions = &mut additions[..flags.additions_len(version) as usize];
	if !fill(source, additions)? {
		return Ok(false);
	}

	let mut additions = &additions[..];
	match version {
		Id3v2Version::V2 => {},
		Id3v2Version::V3 => {
			if flags.compression {
				flags.data_length_indicator = Some(additions.read_u32::<BigEndian>()?);
			}
			if let Some(method) = flags.encryption.as_mut() {
				*method = additions.read_u8()?;
			}
			if let Some(group) = flags.grouping_identity.as_mut() {
				*group = additions.read_u8()?;
			}
		},
		Id3v2Version::V4 => {
			if let Some(group) = flags.grouping_identity.as_mut() {
				*group = additions.read_u8()?;
			}
			if let Some(method) = flags.encryption.as_mut() {
				*method = additions.read_u8()?;
			}
			if flags.data_length_indicator.is_some() {
				flags.data_length_indicator = Some(additions.read_u32::<BigEndian>()?.unsynch());
			}
		},
	}

	Ok(true)
}

//! Serializing tags and committing them to files
//!
//! A tag is always serialized completely in memory before anything is written. It is then either
//! written over the old tag (when its placement and size didn't change), or the whole file is
//! rebuilt in a temporary file next to the original, which is renamed over it.

mod frame;
mod padding;

pub use padding::PaddingPolicy;

use frame::write_frame;

use crate::config::WriteOptions;
use crate::error::{Result, TagwrightError};
use crate::id3::v1::TRAILER_SIZE;
use crate::id3::v2::frame::{Frame, Location};
use crate::id3::v2::header::{HEADER_SIZE, HeaderKind, RawHeader};
use crate::id3::v2::util::synchsafe::{UnsynchronizedWriter, needs_escape};
use crate::id3::v2::{Id3v2TagFlags, Id3v2Version};
use crate::macros::err;
use crate::util::io::{FileLike, Length, SeekStreamLen, Truncate, copy_range};

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Everything about a tag that affects its serialized form, besides its frames
#[derive(Copy, Clone, Debug)]
pub(crate) struct TagSettings {
	pub version: Id3v2Version,
	pub flags: Id3v2TagFlags,
	pub padding: PaddingPolicy,
	/// Whether the tag is appended, and needs a footer
	pub appended: bool,
	/// The total size of the tag on disk, `0` if there is none
	pub old_size: u32,
}

pub(crate) struct SerializedTag {
	/// The complete tag, empty if there are no frames
	pub bytes: Vec<u8>,
	/// Where each frame's payload is, relative to the start of the tag
	///
	/// `None` for frames that were not written.
	pub locations: Vec<Option<Location>>,
}

/// Serialize `frames`, every one of which must be loaded
pub(crate) fn serialize(frames: &[Frame], settings: &TagSettings) -> Result<SerializedTag> {
	let version = settings.version;
	let tag_unsync = settings.flags.unsynchronisation;

	let mut body = Vec::new();
	let mut written = Vec::with_capacity(frames.len());
	for frame in frames {
		let Some(content) = frame.content() else {
			err!(InvalidArgument("Every frame must be loaded before writing"));
		};

		written.push(write_frame(&mut body, frame, content, version, tag_unsync)?);
	}

	// ID3v2.4 unsynchronises every frame on its own
	let body_unsync = tag_unsync && version != Id3v2Version::V4;

	let mut locations = Vec::with_capacity(written.len());
	let body = if body_unsync {
		let mut positions = written
			.iter()
			.flatten()
			.flat_map(|frame| [frame.payload.start, frame.payload.end])
			.collect::<Vec<_>>();
		map_to_unsynchronised(&body, &mut positions);

		let mut positions = positions.chunks_exact(2);
		for frame in &written {
			let location = frame.as_ref().and_then(|_| positions.next()).map(|span| {
				payload_location(span[0], span[1], true)
			});
			locations.push(location);
		}

		let mut writer = UnsynchronizedWriter::new(Vec::with_capacity(body.len() + body.len() / 8));
		writer.write_all(&body)?;
		writer.finish()?
	} else {
		for frame in &written {
			locations.push(frame.as_ref().map(|frame| {
				payload_location(frame.payload.start, frame.payload.end, frame.unsynchronised)
			}));
		}

		body
	};

	let Ok(frames_len) = u32::try_from(body.len()) else {
		err!(TooMuchData);
	};

	let total_size = padding::tag_size(
		frames_len,
		settings.old_size,
		settings.padding,
		settings.appended,
	);

	if total_size == 0 {
		log::debug!("No frames to write, the tag will be removed");
		return Ok(SerializedTag {
			bytes: Vec::new(),
			locations: vec![None; frames.len()],
		});
	}

	let footer_len = if settings.appended { HEADER_SIZE } else { 0 };
	let mut flags = settings.flags;
	flags.footer = settings.appended;

	let mut header = RawHeader {
		kind: HeaderKind::Header,
		major: version.major(),
		revision: 0,
		flags: flags.as_byte(version),
		size: total_size - HEADER_SIZE - footer_len,
	};

	log::debug!(
		"Serialized {} frames into {frames_len} bytes, total tag size {total_size}",
		frames.len()
	);

	let mut bytes = Vec::with_capacity(total_size as usize);
	header.write_to(&mut bytes)?;
	bytes.extend(body);
	bytes.resize((total_size - footer_len) as usize, 0);

	if settings.appended {
		header.kind = HeaderKind::Footer;
		header.write_to(&mut bytes)?;
	}

	Ok(SerializedTag { bytes, locations })
}

fn payload_location(start: usize, end: usize, unsynchronised: bool) -> Location {
	Location {
		offset: u64::from(HEADER_SIZE) + start as u64,
		stored_len: (end - start) as u32,
		unsynchronised,
	}
}

// Translate ascending positions of `plain` into positions of its unsynchronised form
//
// An escape byte directly before a position is counted, as readers consume escapes together with
// the 0xFF preceding them.
fn map_to_unsynchronised(plain: &[u8], positions: &mut [usize]) {
	let mut escapes = 0;
	let mut next = 1;
	for position in positions {
		while next <= *position {
			if plain[next - 1] == 0xFF && plain.get(next).is_none_or(|byte| needs_escape(*byte)) {
				escapes += 1;
			}

			next += 1;
		}

		*position += escapes;
	}
}

/// The tag currently on disk
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExistingTag {
	/// The offset of the tag header
	pub offset: u64,
	/// The total size, header and footer included
	pub size: u64,
	pub appended: bool,
	/// Whether the file ends with a legacy trailer
	pub trailer: bool,
}

/// A serialized tag, and where it needs to go
pub(crate) struct Commit<'a> {
	pub existing: ExistingTag,
	pub tag: &'a [u8],
	/// The legacy trailer to write, `None` removes an existing one
	pub trailer: Option<[u8; TRAILER_SIZE]>,
	pub appended: bool,
}

impl Commit<'_> {
	/// Whether the tag can be written over the existing one
	///
	/// The placement can't change, and a prepended tag must keep its exact size.
	pub(crate) fn fits_in_place(&self) -> bool {
		self.existing.appended == self.appended
			&& (self.appended || self.tag.len() as u64 == self.existing.size)
	}

	/// Write over the existing tag, returning the new tag offset
	///
	/// NOTE: This is not atomic. A failure part way through leaves a damaged file behind.
	pub(crate) fn write_in_place<F>(&self, file: &mut F) -> Result<u64>
	where
		F: FileLike,
		TagwrightError: From<<F as Truncate>::Error>,
		TagwrightError: From<<F as Length>::Error>,
	{
		log::debug!("Writing {} byte tag in place", self.tag.len());

		file.seek(SeekFrom::Start(self.existing.offset))?;
		file.write_all(self.tag)?;

		if self.appended {
			// Whatever followed the old tag is replaced
			if let Some(trailer) = &self.trailer {
				file.write_all(trailer)?;
			}

			let end = file.stream_position()?;
			file.truncate(end)?;
			return Ok(self.existing.offset);
		}

		let len = file.len()?;
		match (&self.trailer, self.existing.trailer) {
			(Some(trailer), exists) => {
				let position = if exists {
					len.saturating_sub(TRAILER_SIZE as u64)
				} else {
					len
				};

				file.seek(SeekFrom::Start(position))?;
				file.write_all(trailer)?;
			},
			(None, true) => file.truncate(len.saturating_sub(TRAILER_SIZE as u64))?,
			(None, false) => {},
		}

		Ok(self.existing.offset)
	}

	/// Write the whole file with the new tag to `writer`, returning the new tag offset
	///
	/// `reader` is the original file.
	pub(crate) fn rewrite<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<u64>
	where
		R: Read + Seek,
		W: Write,
	{
		let file_len = reader.stream_len_hack()?;
		let trailer_len = if self.existing.trailer {
			TRAILER_SIZE as u64
		} else {
			0
		};

		// Everything that isn't a tag
		let (content_start, content_end) = if self.existing.appended {
			(0, self.existing.offset)
		} else {
			(
				self.existing.offset + self.existing.size,
				file_len.saturating_sub(trailer_len),
			)
		};
		let content_len = content_end.saturating_sub(content_start);

		log::debug!(
			"Rewriting file, {content_len} bytes of content, {} byte tag ({})",
			self.tag.len(),
			if self.appended { "appended" } else { "prepended" }
		);

		let offset = if self.appended {
			copy_range(reader, writer, content_start, content_len)?;
			writer.write_all(self.tag)?;
			content_len
		} else {
			writer.write_all(self.tag)?;
			copy_range(reader, writer, content_start, content_len)?;
			0
		};

		if let Some(trailer) = &self.trailer {
			writer.write_all(trailer)?;
		}

		writer.flush()?;
		Ok(offset)
	}

	/// Rebuild the file at `path` through a temporary file, returning the new tag offset
	///
	/// `file` is replaced with a handle to the new file, at the same position.
	pub(crate) fn replace_file(
		&self,
		file: &mut File,
		path: &Path,
		reopen: &std::fs::OpenOptions,
		write_options: WriteOptions,
	) -> Result<u64> {
		let position = file.stream_position()?;

		let directory = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};

		let mut temp = tempfile::Builder::new()
			.prefix(".tagwright")
			.tempfile_in(directory)?;
		log::debug!("Rebuilding {} in {}", path.display(), temp.path().display());

		if write_options.preserve_permissions {
			temp.as_file()
				.set_permissions(file.metadata()?.permissions())?;
		}

		let offset = {
			let mut writer = std::io::BufWriter::new(temp.as_file_mut());
			let offset = self.rewrite(file, &mut writer)?;
			writer.flush()?;
			offset
		};

		match temp.persist(path) {
			Ok(_) => {
				*file = reopen.open(path)?;
			},
			Err(e) if e.error.kind() == std::io::ErrorKind::CrossesDevices => {
				log::warn!("Unable to rename across devices, copying over the original file");

				let mut temp = e.file.reopen()?;
				file.rewind()?;
				let len = std::io::copy(&mut temp, file)?;
				file.set_len(len)?;
			},
			Err(e) => return Err(e.into()),
		}

		file.seek(SeekFrom::Start(position))?;
		Ok(offset)
	}
}

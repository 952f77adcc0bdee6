mod accessors;
mod frames;
#[cfg(test)]
mod tests;

use super::convert::convert;
use super::frame::read::{BodyLayout, read_body};
use super::frame::{Frame, Location};
use super::header::{HEADER_SIZE, HeaderKind, RawHeader};
use super::write::{Commit, ExistingTag, PaddingPolicy, TagSettings, serialize};
use super::{Id3v2TagFlags, Id3v2Version};
use crate::config::{OpenMode, ParseOptions, ParsingMode, WriteOptions};
use crate::error::{ErrorKind, Result, TagwrightError};
use crate::id3::v1::{LegacyTrailer, TRAILER_SIZE};
use crate::macros::err;
use crate::util::io::{SeekStreamLen, read_fill};

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// What the tag discovery found
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Discovery {
	/// Nothing has been read yet
	Unread,
	Present,
	Absent,
	/// A tag with a major version we can't read, reported until it is discarded
	Unsupported { major: u8, revision: u8 },
}

/// An ID3v2 tag, bound to the stream it was read from
///
/// Nothing is read until the tag is first queried. Frame headers are scanned on that first query,
/// while frame payloads stay on disk until they are needed (if the stream is seekable).
///
/// Every change is made in memory, the stream is only touched by [`Id3Tag::write`].
///
/// # Examples
///
/// ```rust,no_run
/// use tagwright::config::{OpenMode, WriteOptions};
/// use tagwright::id3::v2::Id3Tag;
/// use tagwright::TextEncoding;
///
/// # fn main() -> tagwright::error::Result<()> {
/// let mut tag = Id3Tag::open("song.mp3", OpenMode::ReadWrite)?;
///
/// if tag.title()?.is_none() {
/// 	tag.set_title("Foo title", TextEncoding::Latin1)?;
/// }
///
/// tag.write(WriteOptions::default())?;
/// # Ok(()) }
/// ```
pub struct Id3Tag<F = File> {
	stream: F,
	path: Option<PathBuf>,
	mode: OpenMode,
	parse_options: ParseOptions,
	seekable: bool,
	discovery: Discovery,

	version: Id3v2Version,
	revision: u8,
	flags: Id3v2TagFlags,
	/// The declared size of the tag on disk (excluding the header and footer)
	size: u32,
	existing: ExistingTag,

	append: bool,
	padding: PaddingPolicy,

	frames: Vec<Frame>,
	trailer: LegacyTrailer,
}

impl<F> std::fmt::Debug for Id3Tag<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Id3Tag")
			.field("path", &self.path)
			.field("mode", &self.mode)
			.field("seekable", &self.seekable)
			.field("discovery", &self.discovery)
			.field("version", &self.version)
			.field("flags", &self.flags)
			.field("size", &self.size)
			.field("frames", &self.frames.len())
			.finish_non_exhaustive()
	}
}

impl Id3Tag<File> {
	/// Open the file at `path`
	///
	/// See [`Id3Tag::open_with_options`].
	///
	/// # Errors
	///
	/// The file could not be opened
	pub fn open<P>(path: P, mode: OpenMode) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		Self::open_with_options(path, mode, ParseOptions::new())
	}

	/// Open the file at `path` with the provided [`ParseOptions`]
	///
	/// [`OpenMode::ReadWrite`] creates the file if it doesn't exist. A file without a tag gets an
	/// empty ID3v2.3 tag.
	///
	/// # Errors
	///
	/// The file could not be opened
	pub fn open_with_options<P>(path: P, mode: OpenMode, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		log::debug!("Opening {} ({mode:?})", path.display());

		let file = mode.open_options().open(path)?;

		let mut tag = Self::new(file, mode, parse_options);
		tag.path = Some(path.to_path_buf());

		Ok(tag)
	}

	/// Commit the tag to the file
	///
	/// The whole tag is serialized first. If the tag keeps its placement and size (or is
	/// appended), it is written over the old one. Otherwise, the file is rebuilt in a temporary
	/// file in the same directory, which then replaces the original.
	///
	/// ID3v2.2 tags are converted to ID3v2.3 before writing.
	///
	/// NOTE: Writing in place is not atomic, an I/O error part way through can leave a damaged
	/// file behind. Use [`WriteOptions::allow_in_place`] to always go through a temporary file.
	///
	/// # Errors
	///
	/// * The file was opened with [`OpenMode::ReadOnly`] ([`ErrorKind::ReadOnly`](crate::error::ErrorKind::ReadOnly))
	/// * The file is not seekable ([`ErrorKind::NotSeekable`](crate::error::ErrorKind::NotSeekable))
	/// * A frame payload could not be loaded
	/// * The tag is too large
	/// * [`std::io::Error`]
	pub fn write(&mut self, write_options: WriteOptions) -> Result<()> {
		if !self.mode.is_writable() {
			err!(ReadOnly);
		}

		let Some(path) = self.path.clone() else {
			err!(NoPath);
		};

		self.discover()?;
		if !self.seekable {
			err!(NotSeekable);
		}

		if self.version == Id3v2Version::V2 {
			log::debug!("ID3v2.2 tags can't be written, converting to ID3v2.3");
			self.set_version(Id3v2Version::V3)?;
		}

		self.load_frames()?;

		let mut flags = self.flags;
		flags.extended_header = false;
		flags.update = false;
		flags.crc = false;
		flags.restrictions = false;

		let settings = TagSettings {
			version: self.version,
			flags,
			padding: self.padding,
			appended: self.append,
			old_size: u32::try_from(self.existing.size).unwrap_or(0),
		};

		let serialized = serialize(&self.frames, &settings)?;
		let trailer = self.trailer.is_requested().then(|| self.trailer.encode());

		let commit = Commit {
			existing: self.existing,
			tag: &serialized.bytes,
			trailer,
			appended: self.append,
		};

		let position = self.stream.stream_position()?;
		let offset = if write_options.allow_in_place && commit.fits_in_place() {
			let offset = commit.write_in_place(&mut self.stream)?;
			self.stream.seek(SeekFrom::Start(position))?;
			offset
		} else {
			log::debug!("The tag doesn't fit in place, rewriting the file");
			commit.replace_file(
				&mut self.stream,
				&path,
				&self.mode.open_options(),
				write_options,
			)?
		};

		let tag_len = serialized.bytes.len() as u64;
		self.existing = ExistingTag {
			offset,
			size: tag_len,
			appended: self.append,
			trailer: trailer.is_some(),
		};
		self.trailer.exists = trailer.is_some();

		let footer_len = if self.append { HEADER_SIZE } else { 0 };
		self.size = (tag_len as u32).saturating_sub(HEADER_SIZE + footer_len);
		self.flags = flags;
		self.flags.footer = self.append && tag_len > 0;
		self.discovery = if tag_len == 0 {
			Discovery::Absent
		} else {
			Discovery::Present
		};

		// Payloads are reloaded from their new locations when needed
		let mut locations = serialized.locations.into_iter();
		self.frames.retain_mut(|frame| match locations.next().flatten() {
			Some(location) => {
				frame.evict(Location {
					offset: offset + location.offset,
					..location
				});
				true
			},
			None => false,
		});

		Ok(())
	}
}

impl<F> Id3Tag<F>
where
	F: Read + Seek,
{
	/// Read a tag from any stream
	///
	/// The tag is read-only, [`Id3Tag::write`] is only available for files. A stream that fails
	/// to report its position is treated as unseekable, and its frames are read immediately.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::ParseOptions;
	/// use tagwright::id3::v2::Id3Tag;
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// let mut tag = Id3Tag::read_from(std::io::Cursor::new(Vec::new()), ParseOptions::new());
	///
	/// assert_eq!(tag.size()?, 0);
	/// assert_eq!(tag.frame_count()?, 0);
	/// # Ok(()) }
	/// ```
	pub fn read_from(stream: F, parse_options: ParseOptions) -> Self {
		Self::new(stream, OpenMode::ReadOnly, parse_options)
	}

	fn new(mut stream: F, mode: OpenMode, parse_options: ParseOptions) -> Self {
		let seekable = stream.stream_position().is_ok();
		if !seekable {
			log::debug!("Stream is not seekable, frames will be read immediately");
		}

		Self {
			stream,
			path: None,
			mode,
			parse_options,
			seekable,
			discovery: Discovery::Unread,
			version: Id3v2Version::V3,
			revision: 0,
			flags: Id3v2TagFlags::default(),
			size: 0,
			existing: ExistingTag::default(),
			append: false,
			padding: PaddingPolicy::default(),
			frames: Vec::new(),
			trailer: LegacyTrailer::new(),
		}
	}

	/// Find the tag and scan its frame headers, if that hasn't happened yet
	fn discover(&mut self) -> Result<()> {
		match self.discovery {
			Discovery::Unread => {},
			Discovery::Unsupported { major, revision } => {
				return Err(TagwrightError::new(ErrorKind::UnsupportedVersion { major, revision }));
			},
			Discovery::Present | Discovery::Absent => return Ok(()),
		}

		if self.seekable && self.stream.rewind().is_err() {
			log::debug!("Unable to seek to the start of the stream, treating it as unseekable");
			self.seekable = false;
		}

		let mut header = [0; HEADER_SIZE as usize];
		let mut found = None;
		if read_fill(&mut self.stream, &mut header)? == header.len() {
			found = RawHeader::parse(&header)
				.filter(|header| header.kind == HeaderKind::Header)
				.map(|header| (header, 0));
		}

		if self.seekable {
			self.read_trailer()?;

			if found.is_none() {
				found = self.find_footer()?;
			}
		}

		let Some((header, offset)) = found else {
			log::debug!("No ID3v2 tag found");
			self.discovery = Discovery::Absent;
			self.existing = ExistingTag {
				trailer: self.trailer.exists(),
				..ExistingTag::default()
			};
			return Ok(());
		};

		let appended = header.kind == HeaderKind::Footer;
		let Some(version) = Id3v2Version::from_major(header.major) else {
			if self.parse_options.parsing_mode == ParsingMode::Relaxed {
				log::warn!(
					"Ignoring tag with unsupported version 2.{}.{}",
					header.major,
					header.revision
				);

				self.discovery = Discovery::Absent;
				self.existing.trailer = self.trailer.exists();
				return Ok(());
			}

			self.discovery = Discovery::Unsupported {
				major: header.major,
				revision: header.revision,
			};
			return Err(TagwrightError::new(ErrorKind::UnsupportedVersion {
				major: header.major,
				revision: header.revision,
			}));
		};

		log::debug!(
			"Found ID3v2.{}.{} tag at {offset}, size: {}, {}",
			header.major,
			header.revision,
			header.size,
			if appended { "appended" } else { "prepended" }
		);

		let mut flags = Id3v2TagFlags::from_byte(version, header.flags);
		flags.footer |= appended;

		if self.seekable {
			self.stream
				.seek(SeekFrom::Start(offset + u64::from(HEADER_SIZE)))?;
		}

		let layout = BodyLayout {
			version,
			start: offset + u64::from(HEADER_SIZE),
			size: header.size,
			unsynchronised: flags.unsynchronisation,
			extended_header: flags.extended_header,
			seekable: self.seekable,
		};

		let scanned = read_body(&mut self.stream, layout, self.parse_options)?;
		if let Some(extended_header) = scanned.extended_header {
			flags.update = extended_header.update;
			flags.crc = extended_header.crc;
			flags.restrictions = extended_header.restrictions;
		}

		let footer_len = if flags.footer { HEADER_SIZE } else { 0 };

		self.version = version;
		self.revision = header.revision;
		self.flags = flags;
		self.size = header.size;
		self.append = appended;
		self.frames = scanned.frames;
		self.existing = ExistingTag {
			offset,
			size: u64::from(header.size + HEADER_SIZE + footer_len),
			appended,
			trailer: self.trailer.exists(),
		};
		self.discovery = Discovery::Present;

		Ok(())
	}

	fn read_trailer(&mut self) -> Result<()> {
		let len = self.stream.stream_len_hack()?;
		if len < TRAILER_SIZE as u64 {
			return Ok(());
		}

		let mut trailer = [0; TRAILER_SIZE];
		self.stream.seek(SeekFrom::Start(len - TRAILER_SIZE as u64))?;
		self.stream.read_exact(&mut trailer)?;

		if let Some(parsed) = LegacyTrailer::parse(&trailer) {
			log::debug!("Found a legacy trailer");
			self.trailer = parsed;
		}

		Ok(())
	}

	// An appended tag ends either right before the legacy trailer, or at the end of the stream
	fn find_footer(&mut self) -> Result<Option<(RawHeader, u64)>> {
		let mut end = self.stream.stream_len_hack()?;
		if self.trailer.exists() {
			end -= TRAILER_SIZE as u64;
		}

		let Some(footer_start) = end.checked_sub(u64::from(HEADER_SIZE)) else {
			return Ok(None);
		};

		let mut footer = [0; HEADER_SIZE as usize];
		self.stream.seek(SeekFrom::Start(footer_start))?;
		self.stream.read_exact(&mut footer)?;

		let Some(footer) = RawHeader::parse(&footer).filter(|footer| footer.kind == HeaderKind::Footer)
		else {
			return Ok(None);
		};

		let tag_len = u64::from(footer.size + 2 * HEADER_SIZE);
		let Some(offset) = end.checked_sub(tag_len) else {
			log::warn!("Found a footer for a tag larger than the file, ignoring it");
			return Ok(None);
		};

		log::debug!("Found an ID3v2 footer, the tag starts at {offset}");
		Ok(Some((footer, offset)))
	}

	// Bring every payload into memory
	fn load_frames(&mut self) -> Result<()> {
		for frame in &mut self.frames {
			frame.load(&mut self.stream, self.parse_options.allocation_limit)?;
		}

		Ok(())
	}

	/// The declared size of the tag, excluding the header and footer
	///
	/// This is the size of the tag on disk, changes to the frames are only reflected after a write.
	///
	/// # Errors
	///
	/// * The tag has an unsupported version ([`ErrorKind::UnsupportedVersion`](crate::error::ErrorKind::UnsupportedVersion)),
	///   see [`Id3Tag::discard_unsupported_tag`]
	/// * The tag could not be read
	pub fn size(&mut self) -> Result<u32> {
		self.discover()?;
		Ok(self.size)
	}

	/// The version and revision of the tag
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn version(&mut self) -> Result<(Id3v2Version, u8)> {
		self.discover()?;
		Ok((self.version, self.revision))
	}

	/// Whether the stream supports seeking
	pub fn is_seekable(&self) -> bool {
		self.seekable
	}

	/// Whether the tag is (or will be written) at the end of the file
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn is_appended(&mut self) -> Result<bool> {
		self.discover()?;
		Ok(self.append)
	}

	/// Whether the tag on disk has a footer
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn has_footer(&mut self) -> Result<bool> {
		self.discover()?;
		Ok(self.flags.footer)
	}

	/// Whether the tag is unsynchronised
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn is_unsynchronized(&mut self) -> Result<bool> {
		self.discover()?;
		Ok(self.flags.unsynchronisation)
	}

	/// The tag flags
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn flags(&mut self) -> Result<Id3v2TagFlags> {
		self.discover()?;
		Ok(self.flags)
	}

	/// The legacy trailer at the end of the file
	///
	/// If the file has no trailer, this is an empty one that will be written unless
	/// [`LegacyTrailer::set_requested`] says otherwise.
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn legacy_trailer(&mut self) -> Result<&LegacyTrailer> {
		self.discover()?;
		Ok(&self.trailer)
	}

	/// Mutable access to the legacy trailer
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn legacy_trailer_mut(&mut self) -> Result<&mut LegacyTrailer> {
		self.discover()?;
		Ok(&mut self.trailer)
	}

	/// Treat a tag with an unsupported version as if there were no tag
	///
	/// A following write leaves the old tag in place, as part of the audio.
	///
	/// Returns `false` if the tag was not unsupported.
	pub fn discard_unsupported_tag(&mut self) -> bool {
		if !matches!(self.discovery, Discovery::Unsupported { .. }) {
			return false;
		}

		log::debug!("Discarding tag with an unsupported version");
		self.discovery = Discovery::Absent;
		self.existing = ExistingTag {
			trailer: self.trailer.exists(),
			..ExistingTag::default()
		};

		true
	}

	/// Convert the tag to another version
	///
	/// Frames are renamed, rewritten or dropped as needed, moving through every version in
	/// between. Any frame that needs its payload converted is loaded first.
	///
	/// ID3v2.2 is only supported in memory, writing converts to ID3v2.3.
	///
	/// # Errors
	///
	/// * The tag is to be appended, which is only possible for ID3v2.4
	/// * A payload could not be loaded
	/// * A converter failed to allocate
	pub fn set_version(&mut self, version: Id3v2Version) -> Result<()> {
		self.discover()?;
		if version == self.version {
			return Ok(());
		}

		if self.append && version != Id3v2Version::V4 {
			err!(InvalidArgument("Only ID3v2.4 tags can be appended"));
		}

		self.load_frames()?;
		convert(&mut self.frames, self.version, version)?;

		log::debug!("Converted tag from {:?} to {version:?}", self.version);
		self.version = version;
		self.revision = 0;

		Ok(())
	}

	/// Whether to unsynchronise the tag when writing
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn set_unsync(&mut self, unsync: bool) -> Result<()> {
		self.discover()?;
		self.flags.unsynchronisation = unsync;
		Ok(())
	}

	/// Whether to write the tag at the end of the file
	///
	/// Appended tags need a footer, so appending converts the tag to ID3v2.4.
	///
	/// # Errors
	///
	/// See [`Id3Tag::set_version`]
	pub fn set_append(&mut self, append: bool) -> Result<()> {
		if append {
			self.set_version(Id3v2Version::V4)?;
		}

		self.discover()?;
		self.append = append;
		Ok(())
	}

	/// Set the [`PaddingPolicy`]
	pub fn set_padding(&mut self, padding: PaddingPolicy) {
		self.padding = padding;
	}

	/// The current [`PaddingPolicy`]
	pub fn padding(&self) -> PaddingPolicy {
		self.padding
	}

	/// Request a minimum total tag size
	///
	/// This is the same as `set_padding(PaddingPolicy::Minimum(size))`.
	pub fn set_size(&mut self, size: u32) {
		self.padding = PaddingPolicy::Minimum(size);
	}

	/// Remove every frame, and stop writing the legacy trailer
	///
	/// The tag is removed from the file on the next write.
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn strip(&mut self) -> Result<()> {
		self.discover()?;

		log::debug!("Stripping {} frames", self.frames.len());
		self.frames.clear();
		self.trailer.set_requested(false);

		Ok(())
	}

	/// Close the tag, discarding every change that wasn't written
	pub fn close(self) {
		log::trace!("Closing tag, {} frames discarded", self.frames.len());
	}

	/// Close the tag, returning the stream
	pub fn into_inner(self) -> F {
		self.stream
	}
}

//! The frame store of an [`Id3Tag`]
//!
//! Frames are kept in the order they are written in. Lookups are linear, tags rarely hold more
//! than a few dozen frames.

use super::Id3Tag;
use crate::error::Result;
use crate::id3::v2::frame::content::decoded_content;
use crate::id3::v2::{Frame, FrameFlag, FrameId};
use crate::macros::{err, id3v2_err};

use std::io::{Read, Seek};

impl<F> Id3Tag<F>
where
	F: Read + Seek,
{
	pub(super) fn checked_index(&mut self, index: usize) -> Result<usize> {
		self.discover()?;
		if index >= self.frames.len() {
			id3v2_err!(@BAIL NoSuchFrame(index));
		}

		Ok(index)
	}

	// IDs have to fit the current version, anything else is dropped on write
	fn frame_id_for_version(&self, id: &str) -> Result<FrameId> {
		let id = FrameId::new(id)?;
		if id.len() != self.version.frame_id_len() {
			id3v2_err!(@BAIL BadFrameId(id.as_bytes().to_vec()));
		}

		Ok(id)
	}

	/// The number of frames in the tag
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn frame_count(&mut self) -> Result<usize> {
		self.discover()?;
		Ok(self.frames.len())
	}

	/// Get the frame at `index`
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn frame(&mut self, index: usize) -> Result<Option<&Frame>> {
		self.discover()?;
		Ok(self.frames.get(index))
	}

	/// All frames, in order
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn frames(&mut self) -> Result<&[Frame]> {
		self.discover()?;
		Ok(&self.frames)
	}

	/// Get the first frame with the ID `id`
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn frame_by_id(&mut self, id: &str) -> Result<Option<&Frame>> {
		let index = self.frame_index(id)?;
		Ok(index.map(|index| &self.frames[index]))
	}

	/// Get the index of the first frame with the ID `id`
	///
	/// # Errors
	///
	/// See [`Id3Tag::size`]
	pub fn frame_index(&mut self, id: &str) -> Result<Option<usize>> {
		self.discover()?;
		Ok(self.frames.iter().position(|frame| frame.id == id))
	}

	/// Get the index of a frame with the ID `id`, creating an empty one if none exists
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `id` is not a valid frame ID for the tag version
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
	/// let index = tag.add_frame("TIT2")?;
	/// assert_eq!(tag.add_frame("TIT2")?, index);
	/// assert_eq!(tag.frame_count()?, 1);
	/// # Ok(()) }
	/// ```
	pub fn add_frame(&mut self, id: &str) -> Result<usize> {
		if let Some(index) = self.frame_index(id)? {
			return Ok(index);
		}

		self.push_frame(id)
	}

	/// Append an empty frame with the ID `id`, even if one already exists
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `id` is not a valid frame ID for the tag version
	pub fn push_frame(&mut self, id: &str) -> Result<usize> {
		self.push_frame_with(id, Vec::new())
	}

	// Append a frame with its final payload, the store is untouched on error
	pub(crate) fn push_frame_with(&mut self, id: &str, content: Vec<u8>) -> Result<usize> {
		self.discover()?;

		let id = self.frame_id_for_version(id)?;
		let frame = Frame::new(id, content)?;
		log::trace!("Adding frame {id}");

		self.frames.push(frame);
		Ok(self.frames.len() - 1)
	}

	/// Remove the frame at `index`
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `index` is out of bounds
	pub fn remove_frame(&mut self, index: usize) -> Result<Frame> {
		let index = self.checked_index(index)?;
		Ok(self.frames.remove(index))
	}

	/// Change the ID of the frame at `index`
	///
	/// The payload is kept as is.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `index` is out of bounds
	/// * `id` is longer than 4 characters, or has characters outside of `A-Z` and `0-9`
	pub fn set_frame_id(&mut self, index: usize, id: &str) -> Result<()> {
		let index = self.checked_index(index)?;
		self.frames[index].id = FrameId::new(id)?;

		Ok(())
	}

	/// The stored payload of the frame at `index`, loading it if necessary
	///
	/// For compressed frames, this is the compressed payload. See [`Id3Tag::frame_content`].
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `index` is out of bounds
	/// * The payload could not be read
	pub fn frame_raw(&mut self, index: usize) -> Result<&[u8]> {
		let index = self.checked_index(index)?;
		self.frames[index].load(&mut self.stream, self.parse_options.allocation_limit)
	}

	/// Replace the payload of the frame at `index`
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `index` is out of bounds
	/// * `content` is too large
	pub fn set_frame_raw(&mut self, index: usize, content: Vec<u8>) -> Result<()> {
		let index = self.checked_index(index)?;
		self.frames[index].set_content(content)
	}

	/// The payload of the frame at `index`, decompressed if necessary
	///
	/// # Errors
	///
	/// * See [`Id3Tag::frame_raw`]
	/// * The frame is encrypted
	/// * The frame is compressed, and decompression failed (or support is disabled)
	pub fn frame_content(&mut self, index: usize) -> Result<Vec<u8>> {
		let index = self.checked_index(index)?;
		let flags = self.frames[index].flags;
		let allocation_limit = self.parse_options.allocation_limit;

		let raw = self.frame_raw(index)?;
		decoded_content(raw, &flags, allocation_limit)
	}

	/// Check a flag of the frame at `index`
	///
	/// Flags that don't exist in the tag version are never set. ID3v2.2 has no frame flags.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `index` is out of bounds
	pub fn frame_flag(&mut self, index: usize, flag: FrameFlag) -> Result<bool> {
		let index = self.checked_index(index)?;
		Ok(flag.mask(self.version) != 0 && self.frames[index].flags.get(flag))
	}

	/// Set or clear a flag of the frame at `index`
	///
	/// Flags that don't exist in the tag version are ignored.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::size`]
	/// * `index` is out of bounds
	/// * `flag` is [`FrameFlag::Compressed`] or [`FrameFlag::Encrypted`], which would require
	///   changing the payload
	pub fn set_frame_flag(&mut self, index: usize, flag: FrameFlag, value: bool) -> Result<()> {
		let index = self.checked_index(index)?;

		if matches!(flag, FrameFlag::Compressed | FrameFlag::Encrypted) {
			err!(InvalidArgument(
				"Compression and encryption can't be toggled without changing the payload"
			));
		}

		if flag.mask(self.version) == 0 {
			log::debug!("Ignoring {flag:?}, it doesn't exist in {:?}", self.version);
			return Ok(());
		}

		self.frames[index].flags.set(flag, value);
		Ok(())
	}
}

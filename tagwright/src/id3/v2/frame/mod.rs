pub(super) mod content;
mod description;
pub(super) mod flags;
mod id;
pub(super) mod read;

pub use description::frame_description;
pub use flags::{FrameFlag, FrameFlags};
pub use id::FrameId;

use crate::error::{Result, TagwrightError};
use crate::id3::v2::util::synchsafe::decode_unsync;
use crate::macros::{err, try_vec};

use std::io::{Read, Seek, SeekFrom};

/// Where a frame payload lives in the underlying stream
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Location {
	/// The offset of the first payload byte (after any additions)
	pub offset: u64,
	/// The number of raw bytes the payload occupies, including unsynchronisation escapes
	pub stored_len: u32,
	/// Whether the stored bytes must be decoded after reading
	pub unsynchronised: bool,
}

/// The payload bytes of a frame
///
/// Payloads are only held in memory once they are needed. A deferred payload is reloaded from
/// its [`Location`] on first access, and resident payloads are evicted again after a write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Payload {
	Resident(Vec<u8>),
	Deferred(Location),
}

/// A single frame in an [`Id3Tag`](crate::id3::v2::Id3Tag)
///
/// The payload of a frame excludes the frame header, as well as any values that follow the header
/// due to its flags (see [`FrameFlags`]). Payloads are always held with unsynchronisation removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
	pub(crate) id: FrameId,
	pub(crate) flags: FrameFlags,
	pub(crate) size: u32,
	pub(crate) payload: Payload,
}

impl Frame {
	/// Create a new frame with resident content
	///
	/// # Errors
	///
	/// `content` is longer than [`u32::MAX`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::{Frame, FrameId};
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// let frame = Frame::new(FrameId::new("TIT2")?, b"\x00Title".to_vec())?;
	///
	/// assert_eq!(frame.size(), 6);
	/// assert_eq!(frame.content(), Some(&b"\x00Title"[..]));
	/// # Ok(()) }
	/// ```
	pub fn new(id: FrameId, content: Vec<u8>) -> Result<Self> {
		let mut frame = Self::empty(id);
		frame.set_content(content)?;

		Ok(frame)
	}

	pub(crate) fn empty(id: FrameId) -> Self {
		Self {
			id,
			flags: FrameFlags::default(),
			size: 0,
			payload: Payload::Resident(Vec::new()),
		}
	}

	/// The frame ID
	pub fn id(&self) -> FrameId {
		self.id
	}

	/// The frame flags
	pub fn flags(&self) -> &FrameFlags {
		&self.flags
	}

	/// The size of the payload
	pub fn size(&self) -> u32 {
		self.size
	}

	/// The payload, if it is currently held in memory
	///
	/// Use [`Id3Tag::frame_raw`](crate::id3::v2::Id3Tag::frame_raw) to load it when needed.
	pub fn content(&self) -> Option<&[u8]> {
		match &self.payload {
			Payload::Resident(content) => Some(content),
			Payload::Deferred(_) => None,
		}
	}

	/// Whether the payload is held in memory
	pub fn is_loaded(&self) -> bool {
		matches!(self.payload, Payload::Resident(_))
	}

	/// Replace the payload
	///
	/// # Errors
	///
	/// `content` is longer than [`u32::MAX`]
	pub fn set_content(&mut self, content: Vec<u8>) -> Result<()> {
		let Ok(size) = u32::try_from(content.len()) else {
			err!(TooMuchData);
		};

		self.size = size;
		self.payload = Payload::Resident(content);

		Ok(())
	}

	// Bring a deferred payload into memory
	pub(crate) fn load<R>(&mut self, reader: &mut R, allocation_limit: usize) -> Result<&[u8]>
	where
		R: Read + Seek,
	{
		if let Payload::Deferred(location) = self.payload {
			log::trace!(
				"Loading frame {} ({} bytes at {})",
				self.id,
				location.stored_len,
				location.offset
			);

			let mut raw = try_vec![0; location.stored_len as usize, allocation_limit];
			reader.seek(SeekFrom::Start(location.offset))?;
			reader.read_exact(&mut raw)?;

			let content = if location.unsynchronised {
				decode_unsync(&raw)
			} else {
				raw
			};

			if content.len() != self.size as usize {
				log::warn!(
					"Frame {} changed size on disk, expected {} bytes, found {}",
					self.id,
					self.size,
					content.len()
				);
			}

			self.set_content(content)?;
		}

		Ok(self.content().unwrap_or_default())
	}

	// Release the payload after it has been written to `location`
	pub(crate) fn evict(&mut self, location: Location) {
		self.payload = Payload::Deferred(location);
	}
}

impl TryFrom<(&str, Vec<u8>)> for Frame {
	type Error = TagwrightError;

	fn try_from((id, content): (&str, Vec<u8>)) -> std::result::Result<Self, Self::Error> {
		Self::new(FrameId::new(id)?, content)
	}
}

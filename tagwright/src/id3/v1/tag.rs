/// The legacy 128 byte trailer
///
/// Every field is independently optional. `None` is written as a zero-filled field.
///
/// A trailer is *requested* by default: writing a tag emits one unless
/// [`LegacyTrailer::set_requested`] (or [`Id3Tag::strip`](crate::id3::v2::Id3Tag::strip)) says otherwise.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct LegacyTrailer {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year, 4 bytes max
	pub year: Option<String>,
	/// A short comment
	///
	/// The number of bytes differs between versions, but not much.
	/// A V1 tag may have been read, which limits this field to 30 bytes.
	/// A V1.1 tag, however, only has 28 bytes available.
	///
	/// Tagwright will *always* write a V1.1 tag when a track number is present.
	pub comment: Option<String>,
	/// The track number, a value of `0` is never written
	pub track_number: Option<u8>,
	/// The track's genre index, see [`GENRES`](super::GENRES)
	pub genre: Option<u8>,
	pub(crate) exists: bool,
	pub(crate) requested: bool,
}

impl LegacyTrailer {
	/// Create a new empty, requested `LegacyTrailer`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v1::LegacyTrailer;
	///
	/// let trailer = LegacyTrailer::new();
	/// assert!(trailer.is_requested());
	/// assert!(!trailer.exists());
	/// ```
	pub fn new() -> Self {
		Self {
			requested: true,
			..Self::default()
		}
	}

	/// Whether the file had a trailer when it was last read or written
	pub fn exists(&self) -> bool {
		self.exists
	}

	/// Whether the next write emits a trailer
	pub fn is_requested(&self) -> bool {
		self.requested
	}

	/// Set whether the next write emits a trailer
	///
	/// Not requesting a trailer removes an existing one when the tag is written.
	pub fn set_requested(&mut self, requested: bool) {
		self.requested = requested;
	}

	/// Whether every field is unset
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}
}

/// Shorten `text` to at most `len` characters
pub(crate) fn truncate_field(text: &str, len: usize) -> String {
	text.chars().take(len).collect()
}

//! Typed access to frame payloads
//!
//! The simple accessors (title, artist, ...) pick the frame ID for the tag version, and fall back to
//! the legacy trailer when the tag has no such frame. Values set with [`TextEncoding::Latin1`] are
//! mirrored into the trailer.

use super::Id3Tag;
use crate::error::Result;
use crate::id3::v1::{GENRE_UNKNOWN, LegacyTrailer, genre_number, truncate_field};
use crate::id3::v2::items::text::{encoding_for_version, parse_text_frame, text_frame_bytes, verify_encoding};
use crate::id3::v2::items::{
	AttachedPicture, ChannelType, Comment, UNKNOWN_LANGUAGE, VolumeAdjustment, rva_identification,
};
use crate::id3::v2::Id3v2Version;
use crate::macros::err;
use crate::util::text::TextEncoding;

use std::ffi::OsString;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

// The ID of a frame in ID3v2.2, ID3v2.3, and ID3v2.4
type VersionedId = [&'static str; 3];

const GENRE_ID: VersionedId = ["TCO", "TCON", "TCON"];
const TRACK_ID: VersionedId = ["TRK", "TRCK", "TRCK"];
const COMMENT_ID: VersionedId = ["COM", "COMM", "COMM"];
const PICTURE_ID: VersionedId = ["PIC", "APIC", "APIC"];
const VOLUME_ADJUSTMENT_ID: VersionedId = ["XRV", "XRVA", "RVA2"];

fn id_for(version: Id3v2Version, ids: VersionedId) -> &'static str {
	match version {
		Id3v2Version::V2 => ids[0],
		Id3v2Version::V3 => ids[1],
		Id3v2Version::V4 => ids[2],
	}
}

// The number at the start of `text`, like C's `atoi`
fn leading_number(text: &str) -> i64 {
	let text = text.trim_start();
	let (negative, digits) = match text.as_bytes().first() {
		Some(b'-') => (true, &text[1..]),
		Some(b'+') => (false, &text[1..]),
		_ => (false, text),
	};

	let value = digits
		.bytes()
		.take_while(u8::is_ascii_digit)
		.fold(0_i64, |value, digit| {
			value.wrapping_mul(10).wrapping_add(i64::from(digit - b'0'))
		});

	if negative { value.wrapping_neg() } else { value }
}

// "13" or "(13)" refer to a genre by number, anything else is looked up by name
fn legacy_genre(text: &str) -> u8 {
	if text.starts_with(|c: char| c.is_ascii_digit()) {
		return (leading_number(text) & 0xFF) as u8;
	}

	let number = text
		.strip_prefix('(')
		.and_then(|rest| rest.split_once(')'))
		.map(|(number, _)| number)
		.filter(|number| !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()));

	if let Some(number) = number {
		return (leading_number(number) & 0xFF) as u8;
	}

	genre_number(text)
}

macro_rules! impl_accessor {
	($($name:ident => $ids:expr, $field:ident, $width:literal;)+) => {
		paste::paste! {
			$(
				#[doc = "Get the " $name ", falling back to the legacy trailer"]
				///
				/// # Errors
				///
				/// See [`Id3Tag::frame_text`]
				pub fn $name(&mut self) -> Result<Option<String>> {
					if let Some(text) = self.text_by_id(id_for(self.version, $ids))? {
						return Ok(Some(text));
					}

					Ok(self.trailer_fallback(|trailer| trailer.$field.clone()))
				}

				#[doc = "Set the " $name]
				///
				/// Latin-1 values are mirrored into the legacy trailer.
				///
				/// # Errors
				///
				/// See [`Id3Tag::set_text_frame`]
				pub fn [<set_ $name>](&mut self, text: &str, encoding: TextEncoding) -> Result<()> {
					self.set_text_frame(id_for(self.version, $ids), text, encoding)?;

					if encoding == TextEncoding::Latin1 {
						self.trailer.$field = Some(truncate_field(text, $width));
					}

					Ok(())
				}
			)+
		}
	}
}

impl<F> Id3Tag<F>
where
	F: Read + Seek,
{
	impl_accessor!(
		title  => ["TT2", "TIT2", "TIT2"], title,  30;
		artist => ["TP1", "TPE1", "TPE1"], artist, 30;
		album  => ["TAL", "TALB", "TALB"], album,  30;
		date   => ["TYE", "TYER", "TDRC"], year,   4;
	);

	fn text_by_id(&mut self, id: &str) -> Result<Option<String>> {
		match self.frame_index(id)? {
			Some(index) => self.frame_text(index),
			None => Ok(None),
		}
	}

	fn trailer_fallback<T>(&self, field: impl FnOnce(&LegacyTrailer) -> Option<T>) -> Option<T> {
		if !self.trailer.exists() {
			return None;
		}

		field(&self.trailer)
	}

	/// Get the genre, falling back to the legacy trailer
	///
	/// The legacy fallback is the genre number, if it is known.
	///
	/// # Errors
	///
	/// See [`Id3Tag::frame_text`]
	pub fn genre(&mut self) -> Result<Option<String>> {
		if let Some(text) = self.text_by_id(id_for(self.version, GENRE_ID))? {
			return Ok(Some(text));
		}

		Ok(self.trailer_fallback(|trailer| {
			trailer
				.genre
				.filter(|genre| *genre != GENRE_UNKNOWN)
				.map(|genre| genre.to_string())
		}))
	}

	/// Set the genre
	///
	/// For Latin-1 values, the legacy trailer genre is set from a number (`"13"` or `"(13)"`), or
	/// by looking up the name in [`GENRES`](crate::id3::v1::GENRES). Other encodings clear it.
	///
	/// # Errors
	///
	/// See [`Id3Tag::set_text_frame`]
	pub fn set_genre(&mut self, text: &str, encoding: TextEncoding) -> Result<()> {
		self.set_text_frame(id_for(self.version, GENRE_ID), text, encoding)?;

		let genre = if encoding == TextEncoding::Latin1 {
			legacy_genre(text)
		} else {
			GENRE_UNKNOWN
		};

		self.trailer.genre = (genre != GENRE_UNKNOWN).then_some(genre);
		Ok(())
	}

	/// Get the track number, falling back to the legacy trailer
	///
	/// # Errors
	///
	/// See [`Id3Tag::frame_text`]
	pub fn track(&mut self) -> Result<Option<String>> {
		if let Some(text) = self.text_by_id(id_for(self.version, TRACK_ID))? {
			return Ok(Some(text));
		}

		Ok(self.trailer_fallback(|trailer| {
			trailer
				.track_number
				.filter(|track| *track != 0)
				.map(|track| track.to_string())
		}))
	}

	/// Set the track number
	///
	/// The legacy trailer gets the leading number of `text`, modulo 256.
	///
	/// # Errors
	///
	/// See [`Id3Tag::set_text_frame`]
	pub fn set_track(&mut self, text: &str, encoding: TextEncoding) -> Result<()> {
		self.set_text_frame(id_for(self.version, TRACK_ID), text, encoding)?;

		let track = (leading_number(text) & 0xFF) as u8;
		self.trailer.track_number = (track != 0).then_some(track);
		Ok(())
	}

	/// The first string of the text frame at `index`
	///
	/// # Errors
	///
	/// * See [`Id3Tag::frame_content`]
	/// * The frame has an invalid encoding
	pub fn frame_text(&mut self, index: usize) -> Result<Option<String>> {
		let content = self.frame_content(index)?;
		Ok(parse_text_frame(&content)?.into_iter().next())
	}

	/// Every string of the text frame at `index`
	///
	/// ID3v2.4 allows multiple values per frame, separated by terminators.
	///
	/// # Errors
	///
	/// See [`Id3Tag::frame_text`]
	pub fn frame_text_fields(&mut self, index: usize) -> Result<Vec<String>> {
		let content = self.frame_content(index)?;
		parse_text_frame(&content)
	}

	/// The encoding of the text frame at `index`
	///
	/// # Errors
	///
	/// See [`Id3Tag::frame_text`]
	pub fn frame_encoding(&mut self, index: usize) -> Result<TextEncoding> {
		let content = self.frame_content(index)?;
		verify_encoding(&content)
	}

	/// Set the text frame `id` to a single string, creating it if needed
	///
	/// Encodings the tag version doesn't support are replaced with [`TextEncoding::UTF16`].
	///
	/// Returns the index of the frame.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::add_frame`]
	/// * `text` can't be represented in `encoding`
	pub fn set_text_frame(&mut self, id: &str, text: &str, encoding: TextEncoding) -> Result<usize> {
		let target = encoding_for_version(encoding, self.version);
		if target != encoding {
			log::warn!("{encoding:?} is not supported in {:?}, using {target:?}", self.version);
		}

		let content = text_frame_bytes(text, target, self.version)?;

		let Some(index) = self.frame_index(id)? else {
			return self.push_frame_with(id, content);
		};

		let frame = &mut self.frames[index];
		// The new payload is stored as is
		frame.flags.compression = false;
		frame.flags.encryption = None;

		frame.set_content(content)?;
		Ok(index)
	}

	// Comment frames that load and parse, with their index
	fn find_comment(
		&mut self,
		description: Option<&str>,
		language: Option<&[u8; 3]>,
	) -> Result<Option<(usize, Comment)>> {
		let id = id_for(self.version, COMMENT_ID);

		self.discover()?;
		for index in 0..self.frames.len() {
			if self.frames[index].id != id || self.frames[index].flags.is_opaque() {
				continue;
			}

			let Ok(comment) = Comment::parse(self.frame_raw(index)?) else {
				log::warn!("Skipping malformed comment frame at {index}");
				continue;
			};

			if comment.matches(description, language) {
				return Ok(Some((index, comment)));
			}
		}

		Ok(None)
	}

	/// Get a comment by description and language, falling back to the legacy trailer
	///
	/// `None` matches any description or language.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::frame_raw`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::ParseOptions;
	/// use tagwright::id3::v2::Id3Tag;
	/// use tagwright::TextEncoding;
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// let mut tag = Id3Tag::read_from(std::io::Cursor::new(Vec::new()), ParseOptions::new());
	///
	/// tag.set_comment("Some notes", Some("notes"), Some(b"eng"), TextEncoding::Latin1)?;
	///
	/// assert_eq!(tag.comment(None, None)?.as_deref(), Some("Some notes"));
	/// assert_eq!(tag.comment(Some("other"), None)?, None);
	/// # Ok(()) }
	/// ```
	pub fn comment(
		&mut self,
		description: Option<&str>,
		language: Option<&[u8; 3]>,
	) -> Result<Option<String>> {
		if let Some((_, comment)) = self.find_comment(description, language)? {
			return Ok(Some(comment.text));
		}

		Ok(self.trailer_fallback(|trailer| trailer.comment.clone()))
	}

	/// Set a comment
	///
	/// The first comment matching `description` and `language` is replaced (`None` matches
	/// anything). If there is none, a new comment is added, with an empty description and
	/// [`UNKNOWN_LANGUAGE`] unless given.
	///
	/// Latin-1 comments are mirrored into the legacy trailer.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::add_frame`]
	/// * The comment can't be represented in `encoding`
	pub fn set_comment(
		&mut self,
		text: &str,
		description: Option<&str>,
		language: Option<&[u8; 3]>,
		encoding: TextEncoding,
	) -> Result<()> {
		let encoding = encoding_for_version(encoding, self.version);

		let (index, existing) = match self.find_comment(description, language)? {
			Some((index, existing)) => (Some(index), Some(existing)),
			None => (None, None),
		};

		let comment = Comment {
			encoding,
			language: language
				.copied()
				.or(existing.as_ref().map(|existing| existing.language))
				.unwrap_or(UNKNOWN_LANGUAGE),
			description: description
				.map(str::to_owned)
				.or(existing.map(|existing| existing.description))
				.unwrap_or_default(),
			text: text.to_owned(),
		};

		let content = comment.as_bytes()?;
		match index {
			Some(index) => self.frames[index].set_content(content)?,
			None => {
				self.push_frame_with(id_for(self.version, COMMENT_ID), content)?;
			},
		}

		if encoding == TextEncoding::Latin1 {
			self.trailer.comment = Some(truncate_field(text, 30));
		}

		Ok(())
	}

	fn find_volume_adjustment(&mut self, identification: &str) -> Result<Option<usize>> {
		let id = id_for(self.version, VOLUME_ADJUSTMENT_ID);
		let identification = TextEncoding::Latin1.encode(identification, false, true)?;

		self.discover()?;
		for index in 0..self.frames.len() {
			if self.frames[index].id != id || self.frames[index].flags.is_opaque() {
				continue;
			}

			if rva_identification(self.frame_raw(index)?) == Some(&identification[..]) {
				return Ok(Some(index));
			}
		}

		Ok(None)
	}

	/// Get the volume adjustment for `channel`, in decibels
	///
	/// Returns `None` if there is no volume adjustment with the identification, or it has no
	/// field for the channel. [`ChannelType::Any`] gets the first field.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::frame_raw`]
	/// * The frame is malformed
	pub fn rva(&mut self, identification: &str, channel: ChannelType) -> Result<Option<f32>> {
		let Some(index) = self.find_volume_adjustment(identification)? else {
			return Ok(None);
		};

		let adjustment = VolumeAdjustment::parse(self.frame_raw(index)?)?;
		Ok(adjustment.channel(channel).map(|field| field.decibels()))
	}

	/// Set the volume adjustment for `channel`, in decibels
	///
	/// An existing field for the channel is replaced, along with its peak volume.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::rva`]
	/// * `channel` is [`ChannelType::Any`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::ParseOptions;
	/// use tagwright::id3::v2::{ChannelType, Id3Tag};
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// let mut tag = Id3Tag::read_from(std::io::Cursor::new(Vec::new()), ParseOptions::new());
	///
	/// tag.set_rva("normalize", ChannelType::MasterVolume, -6.0)?;
	/// assert_eq!(tag.rva("normalize", ChannelType::MasterVolume)?, Some(-6.0));
	/// # Ok(()) }
	/// ```
	pub fn set_rva(&mut self, identification: &str, channel: ChannelType, decibels: f32) -> Result<()> {
		let (index, mut adjustment) = match self.find_volume_adjustment(identification)? {
			Some(index) => (Some(index), VolumeAdjustment::parse(self.frame_raw(index)?)?),
			None => {
				let adjustment = VolumeAdjustment {
					identification: identification.to_owned(),
					channels: Vec::new(),
				};

				(None, adjustment)
			},
		};

		adjustment.set_channel(channel, decibels)?;
		let content = adjustment.as_bytes()?;

		match index {
			Some(index) => self.frames[index].set_content(content),
			None => self
				.push_frame_with(id_for(self.version, VOLUME_ADJUSTMENT_ID), content)
				.map(|_| ()),
		}
	}

	/// A view of the attached picture at `index`
	///
	/// # Errors
	///
	/// * See [`Id3Tag::frame_content`]
	/// * The frame is not an attached picture
	/// * The frame is malformed
	pub fn picture(&mut self, index: usize) -> Result<AttachedPicture> {
		let index = self.checked_index(index)?;
		if self.frames[index].id != id_for(self.version, PICTURE_ID) {
			err!(InvalidArgument("The frame is not an attached picture"));
		}

		let content = self.frame_content(index)?;
		AttachedPicture::parse(&content, self.version)
	}

	/// Write the image of the attached picture at `index` to `base.<ext>`
	///
	/// The extension comes from the image format or MIME type. Returns the path written to.
	///
	/// # Errors
	///
	/// * See [`Id3Tag::picture`]
	/// * [`std::io::Error`]
	pub fn save_image<P>(&mut self, index: usize, base: P) -> Result<PathBuf>
	where
		P: AsRef<Path>,
	{
		let picture = self.picture(index)?;

		let mut path = OsString::from(base.as_ref());
		path.push(".");
		path.push(picture.format.extension());

		let path = PathBuf::from(path);
		log::debug!("Saving {} byte image to {}", picture.data.len(), path.display());

		std::fs::write(&path, &picture.data)?;
		Ok(path)
	}
}

use super::text::verify_encoding;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::Id3v2Version;
use crate::id3::v2::util::mime::extension_for;
use crate::util::text::{TextEncoding, decode_text, latin1_decode, split_terminated};

/// How the data of an [`AttachedPicture`] is described
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PictureFormat {
	/// A 3 character image format, used in ID3v2.2 (ex. `"PNG"`)
	ImageFormat(String),
	/// A MIME type, used in ID3v2.3 and ID3v2.4 (ex. `"image/png"`)
	MimeType(String),
}

impl PictureFormat {
	/// The file extension matching this format
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::PictureFormat;
	///
	/// assert_eq!(PictureFormat::MimeType(String::from("image/jpeg")).extension(), "jpg");
	/// assert_eq!(PictureFormat::ImageFormat(String::from("PNG")).extension(), "png");
	/// ```
	pub fn extension(&self) -> String {
		match self {
			Self::ImageFormat(format) | Self::MimeType(format) => extension_for(format),
		}
	}
}

/// A view of an attached picture frame (`PIC`/`APIC`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedPicture {
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The image format or MIME type
	pub format: PictureFormat,
	/// The picture type, `0x03` being the front cover
	pub picture_type: u8,
	/// A description of the picture
	pub description: String,
	/// The image data
	pub data: Vec<u8>,
}

impl AttachedPicture {
	/// Read an [`AttachedPicture`] from a frame payload of `version`
	///
	/// # Errors
	///
	/// * The payload is too short
	/// * The encoding byte is invalid
	/// * The MIME type is not terminated
	pub fn parse(payload: &[u8], version: Id3v2Version) -> Result<Self> {
		let encoding = verify_encoding(payload)?;

		let (format, rest) = if version == Id3v2Version::V2 {
			if payload.len() < 4 {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
			}

			// Short formats are zero padded
			let format = &payload[1..4];
			let format_len = format.iter().position(|b| *b == 0).unwrap_or(format.len());

			(
				PictureFormat::ImageFormat(latin1_decode(&format[..format_len])),
				&payload[4..],
			)
		} else {
			let Some(end) = payload[1..].iter().position(|b| *b == 0) else {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadPictureFormat(
					String::from_utf8_lossy(&payload[1..]).into_owned(),
				))
				.into());
			};

			(
				PictureFormat::MimeType(latin1_decode(&payload[1..=end])),
				&payload[end + 2..],
			)
		};

		let Some((&picture_type, rest)) = rest.split_first() else {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
		};

		let (description, data) = split_terminated(rest, encoding);

		Ok(Self {
			encoding,
			format,
			picture_type,
			description: decode_text(description, encoding),
			data: data.to_vec(),
		})
	}

	/// The file name [`Id3Tag::save_image`](crate::id3::v2::Id3Tag::save_image) uses for `base`
	pub fn file_name(&self, base: &str) -> String {
		format!("{base}.{}", self.format.extension())
	}
}

//! Mapping between ID3v2.2 image formats and MIME types
//!
//! ID3v2.2 pictures describe their data with a 3 character image format (`"JPG"`, `"PNG"`), later
//! versions use a full MIME type (`"image/jpeg"`).

const IMAGE_SUBTYPES: &[(&str, &str)] = &[
	("jpg", "jpeg"),
	("tif", "tiff"),
	("xbm", "x-xbitmap"),
	("xpm", "x-xpixmap"),
	("xwd", "x-xwindowdump"),
	("ras", "x-cmu-raster"),
	("pnm", "x-portable-anymap"),
	("pbm", "x-portable-bitmap"),
	("pgm", "x-portable-graymap"),
	("rgb", "x-rgb"),
];

const IMAGE_PREFIX: &str = "image/";

/// Get the MIME type for an ID3v2.2 image format
///
/// The format is matched case-insensitively. Formats without a known MIME subtype are used as the
/// subtype directly.
///
/// # Examples
///
/// ```rust
/// use tagwright::id3::v2::util::mime::mime_type_for_format;
///
/// assert_eq!(mime_type_for_format("JPG"), "image/jpeg");
/// assert_eq!(mime_type_for_format("PNG"), "image/png");
/// ```
pub fn mime_type_for_format(format: &str) -> String {
	let format = format.to_ascii_lowercase();

	let subtype = IMAGE_SUBTYPES
		.iter()
		.find(|(image_format, _)| *image_format == format)
		.map_or(format.as_str(), |(_, subtype)| *subtype);

	format!("{IMAGE_PREFIX}{subtype}")
}

/// Get the ID3v2.2 image format for a MIME type
///
/// Returns `None` if `mime_type` is not an image type.
///
/// NOTE: Unknown subtypes are truncated to their first 3 characters, so this is lossy. For example,
///       both `image/webp` and `image/web` become `"web"`. Shorter subtypes are returned as is, and
///       are padded with zeros when stored in a frame.
///
/// # Examples
///
/// ```rust
/// use tagwright::id3::v2::util::mime::format_for_mime_type;
///
/// assert_eq!(format_for_mime_type("image/jpeg").as_deref(), Some("jpg"));
/// assert_eq!(format_for_mime_type("Image/PNG").as_deref(), Some("png"));
/// assert_eq!(format_for_mime_type("image/webp").as_deref(), Some("web"));
/// assert_eq!(format_for_mime_type("image/x").as_deref(), Some("x"));
/// assert_eq!(format_for_mime_type("text/plain"), None);
/// ```
pub fn format_for_mime_type(mime_type: &str) -> Option<String> {
	let mime_type = mime_type.to_ascii_lowercase();
	let subtype = mime_type.strip_prefix(IMAGE_PREFIX)?;

	if let Some((format, _)) = IMAGE_SUBTYPES.iter().find(|(_, known)| *known == subtype) {
		return Some((*format).to_string());
	}

	Some(subtype.chars().take(3).collect())
}

/// Get the file extension to use for a MIME type or image format
pub(crate) fn extension_for(format_or_mime: &str) -> String {
	let lower = format_or_mime.to_ascii_lowercase();
	match lower.split_once('/') {
		Some((_, subtype)) => match subtype {
			"jpeg" => String::from("jpg"),
			_ => subtype.to_string(),
		},
		None => lower,
	}
}

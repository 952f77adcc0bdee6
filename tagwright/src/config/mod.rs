//! Various configuration options to control Tagwright

mod parse_options;
mod write_options;

pub use parse_options::{ParseOptions, ParsingMode};
pub use write_options::WriteOptions;

/// How a tag's underlying file is opened
///
/// This only applies to [`Id3Tag::open`](crate::id3::v2::Id3Tag::open). Tags read from an
/// arbitrary stream are always read-only.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum OpenMode {
	/// The file must exist, and can never be written
	#[default]
	ReadOnly,
	/// The file is created if it does not exist, and is never truncated on open
	ReadWrite,
}

impl OpenMode {
	/// Whether this mode permits writing
	pub fn is_writable(self) -> bool {
		self == Self::ReadWrite
	}

	pub(crate) fn open_options(self) -> std::fs::OpenOptions {
		let mut options = std::fs::OpenOptions::new();
		options.read(true);

		if self == Self::ReadWrite {
			options.write(true).create(true).truncate(false);
		}

		options
	}
}

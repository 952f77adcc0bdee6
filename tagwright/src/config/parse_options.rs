/// The parsing strictness mode
///
/// # Examples
///
/// ```rust,no_run
/// use tagwright::config::{OpenMode, ParseOptions, ParsingMode};
/// use tagwright::id3::v2::Id3Tag;
///
/// # fn main() -> tagwright::error::Result<()> {
/// // We only want to read well-formed tags
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// let tag = Id3Tag::open_with_options("foo.mp3", OpenMode::ReadOnly, parsing_options)?;
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// ## Examples of behavior
	///
	/// * A frame extends past the end of the tag - The scan errors with
	///   [`Id3v2ErrorKind::BadFrameLength`](crate::error::Id3v2ErrorKind::BadFrameLength)
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// ## Examples of behavior
	///
	/// * A frame extends past the end of the tag - The frame is discarded and the scan stops
	/// * The tag has an unknown major version - Reported once as
	///   [`ErrorKind::UnsupportedVersion`](crate::error::ErrorKind::UnsupportedVersion)
	#[default]
	BestAttempt,
	/// Least eager to error, may produce partial output
	///
	/// ## Examples of behavior
	///
	/// * A frame extends past the end of the tag - The frame is discarded and the scan stops
	/// * The tag has an unknown major version - The file is treated as having no tag
	Relaxed,
}

/// Options to control how Tagwright reads a tag
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) allocation_limit: usize,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	allocation_limit: 16 * 1024 * 1024,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Default allocation limit for a single frame payload
	pub const DEFAULT_ALLOCATION_LIMIT: usize = 16 * 1024 * 1024;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			allocation_limit: Self::DEFAULT_ALLOCATION_LIMIT,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::{ParseOptions, ParsingMode};
	///
	/// // By default, `parsing_mode` is ParsingMode::BestAttempt. Here, we need absolute correctness.
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// The maximum number of bytes a single frame payload may allocate
	///
	/// Frames declaring a larger size cause [`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData)
	/// when their payload is loaded.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::ParseOptions;
	///
	/// // My files have enormous cover art
	/// let parsing_options = ParseOptions::new().allocation_limit(64 * 1024 * 1024);
	/// ```
	pub fn allocation_limit(&mut self, allocation_limit: usize) -> Self {
		self.allocation_limit = allocation_limit;
		*self
	}
}

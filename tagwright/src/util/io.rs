//! Various traits for reading and writing to file-like objects

use crate::error::{Result, TagwrightError};

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

// TODO: https://github.com/rust-lang/rust/issues/59359
pub(crate) trait SeekStreamLen: Seek {
	fn stream_len_hack(&mut self) -> Result<u64> {
		let current_pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		self.seek(SeekFrom::Start(current_pos))?;

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

/// Provides a method to truncate an object to the specified length
///
/// This is one component of the [`FileLike`] trait, which is used by the in-place commit path.
///
/// Take great care in implementing this for downstream types, as Tagwright will assume that the
/// container has the new length specified. If this assumption were to be broken, files **will** become corrupted.
pub trait Truncate {
	/// The error type of the truncation operation
	type Error: Into<TagwrightError>;

	/// Truncate a storage object to the specified length
	///
	/// # Errors
	///
	/// Errors depend on the object being truncated, which may not always be fallible.
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Truncate for Vec<u8> {
	type Error = std::convert::Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.truncate(new_len as usize);
		Ok(())
	}
}

impl<T> Truncate for Cursor<T>
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.get_mut().truncate(new_len)
	}
}

impl<T> Truncate for &mut T
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		(**self).truncate(new_len)
	}
}

/// Provides a method to get the length of a storage object
///
/// This is one component of the [`FileLike`] trait.
pub trait Length {
	/// The error type of the length operation
	type Error: Into<TagwrightError>;

	/// Get the length of a storage object
	///
	/// # Errors
	///
	/// Errors depend on the object being read, which may not always be fallible.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.metadata().map(|m| m.len())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

impl<T> Length for Cursor<T>
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.get_ref())
	}
}

impl<T> Length for &mut T
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

/// Provides a set of methods to read and write to a file-like object
///
/// This is a combination of the [`Read`], [`Write`], [`Seek`], [`Truncate`], and [`Length`] traits.
/// It is what the in-place commit path needs from its destination.
pub trait FileLike: Read + Write + Seek + Truncate + Length
where
	<Self as Truncate>::Error: Into<TagwrightError>,
	<Self as Length>::Error: Into<TagwrightError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Truncate + Length,
	<T as Truncate>::Error: Into<TagwrightError>,
	<T as Length>::Error: Into<TagwrightError>,
{
}

/// Read into `buf` until it is full or the reader is exhausted, returning the number of bytes read
pub(crate) fn read_fill<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize>
where
	R: Read + ?Sized,
{
	let mut filled = 0;
	while filled < buf.len() {
		match reader.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {},
			Err(e) => return Err(e.into()),
		}
	}

	Ok(filled)
}

/// Copy `len` bytes starting at `start` of `reader` into `writer`
pub(crate) fn copy_range<R, W>(reader: &mut R, writer: &mut W, start: u64, len: u64) -> Result<()>
where
	R: Read + Seek,
	W: Write,
{
	reader.seek(SeekFrom::Start(start))?;

	let copied = std::io::copy(&mut reader.take(len), writer)?;
	if copied != len {
		log::warn!("Expected to copy {len} bytes, stream ended after {copied}");
		return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
	}

	Ok(())
}

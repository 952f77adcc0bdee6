//! The legacy 128 byte trailer tag
//!
//! The trailer is only kept as a fallback for the simple accessors and as a mirror of
//! Latin-1 values written through them. It has no frames, every field has a fixed width:
//!
//! | Offset | Size | Field                                              |
//! |--------|------|----------------------------------------------------|
//! | 0      | 3    | `"TAG"`                                            |
//! | 3      | 30   | Title                                              |
//! | 33     | 30   | Artist                                             |
//! | 63     | 30   | Album                                              |
//! | 93     | 4    | Year                                               |
//! | 97     | 30   | Comment (28 bytes when a track number is present)  |
//! | 125    | 1    | `0` if a track number follows                      |
//! | 126    | 1    | Track number                                       |
//! | 127    | 1    | Genre index, see [`GENRES`]                        |

pub(crate) mod constants;
mod read;
mod tag;
mod write;

pub use constants::{GENRE_UNKNOWN, GENRES, TRAILER_SIZE};
pub use tag::LegacyTrailer;
pub(crate) use tag::truncate_field;

/// Get the name of a genre index
///
/// # Examples
///
/// ```rust
/// use tagwright::id3::v1::genre_name;
///
/// assert_eq!(genre_name(17), Some("Rock"));
/// assert_eq!(genre_name(255), None);
/// ```
pub fn genre_name(index: u8) -> Option<&'static str> {
	GENRES.get(usize::from(index)).copied()
}

/// Look up a genre index by its name, ignoring case
///
/// Returns [`GENRE_UNKNOWN`] if the name is not in the list.
///
/// # Examples
///
/// ```rust
/// use tagwright::id3::v1::{GENRE_UNKNOWN, genre_number};
///
/// assert_eq!(genre_number("lo-fi"), 71);
/// assert_eq!(genre_number("Not a genre"), GENRE_UNKNOWN);
/// ```
pub fn genre_number(name: &str) -> u8 {
	let name = name.trim();

	GENRES
		.iter()
		.position(|genre| genre.eq_ignore_ascii_case(name))
		.map_or(GENRE_UNKNOWN, |index| index as u8)
}

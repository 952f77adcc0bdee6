macro_rules! try_vec {
	($elem:expr; $size:expr, $limit:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size, $limit)? }};
}

// Shorthand for return Err(TagwrightError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(TagwrightError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(TagwrightError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::TagwrightError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::TagwrightError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for Id3v2Error::new(Id3v2ErrorKind::Foo)
//
// Usage:
// - id3v2_err!(Variant)             -> Id3v2Error::new(Id3v2ErrorKind::Variant)
// - id3v2_err!(Variant(Value))      -> Id3v2Error::new(Id3v2ErrorKind::Variant(Value))
//
// or bail:
//
// - id3v2_err!(@BAIL Variant)
// - id3v2_err!(@BAIL Variant(Value))
macro_rules! id3v2_err {
	(@BAIL $($rest:tt)+) => {
		return Err(Into::<crate::error::TagwrightError>::into(id3v2_err!($($rest)+)))
	};
	($variant:ident) => {
		crate::error::Id3v2Error::new(crate::error::Id3v2ErrorKind::$variant)
	};
	($variant:ident($value:expr)) => {
		crate::error::Id3v2Error::new(crate::error::Id3v2ErrorKind::$variant($value))
	};
}

// A macro for handling the different `ParsingMode`s
//
// NOTE: All fields are optional, if `STRICT` or `RELAXED` are missing, it will
// 		 fall through to `DEFAULT`.
//
// Usage:
//
// - parse_mode_choice!(
// 		ident_of_parsing_mode,
// 		STRICT: some_expr,
// 		RELAXED: some_expr,
// 		DEFAULT: some_expr,
// 	 )
macro_rules! parse_mode_choice {
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr,)?
		DEFAULT: $default:expr
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			#[allow(unreachable_patterns)]
			_ => { $default }
		}
	};
}

pub(crate) use {err, id3v2_err, parse_mode_choice, try_vec};

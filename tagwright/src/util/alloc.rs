use crate::error::Result;
use crate::macros::err;

/// Provides the `fallible_repeat` method on `Vec`
///
/// It is intended to be used in [`try_vec!`](crate::macros::try_vec).
trait VecFallibleRepeat<T>: Sized {
	fn fallible_repeat(self, element: T, expected_size: usize, limit: usize) -> Result<Self>
	where
		T: Clone;
}

impl<T> VecFallibleRepeat<T> for Vec<T> {
	fn fallible_repeat(mut self, element: T, expected_size: usize, limit: usize) -> Result<Self>
	where
		T: Clone,
	{
		if expected_size == 0 {
			return Ok(self);
		}

		if expected_size > limit {
			err!(TooMuchData);
		}

		self.try_reserve(expected_size)?;
		self.resize(expected_size, element);

		Ok(self)
	}
}

/// **DO NOT USE DIRECTLY**
///
/// Creates a `Vec` of the specified length, containing copies of `element`.
///
/// This should be used through [`try_vec!`](crate::macros::try_vec)
pub(crate) fn fallible_vec_from_element<T>(
	element: T,
	expected_size: usize,
	limit: usize,
) -> Result<Vec<T>>
where
	T: Clone,
{
	Vec::new().fallible_repeat(element, expected_size, limit)
}

/// Provides the `try_with_capacity` method on `Vec`
///
/// This can be used directly.
pub(crate) trait VecFallibleCapacity<T>: Sized {
	/// Same as `Vec::with_capacity`, but takes the allocation limit into account.
	///
	/// Named `try_with_capacity_stable` to avoid conflicts with the nightly `Vec::try_with_capacity`.
	fn try_with_capacity_stable(capacity: usize, limit: usize) -> Result<Self>;
}

impl<T> VecFallibleCapacity<T> for Vec<T> {
	fn try_with_capacity_stable(capacity: usize, limit: usize) -> Result<Self> {
		if capacity > limit {
			err!(TooMuchData);
		}

		let mut v = Vec::new();
		v.try_reserve(capacity)?;

		Ok(v)
	}
}

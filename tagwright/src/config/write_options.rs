/// Options to control how Tagwright commits a tag to its file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) allow_in_place: bool,
	pub(crate) preserve_permissions: bool,
}

impl WriteOptions {
	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			allow_in_place: true,
			preserve_permissions: true,
		}
	}

	/// Whether a tag that keeps its size and placement may be overwritten in place
	///
	/// The in-place path only touches the tag region (and the legacy trailer), which is far cheaper
	/// than copying the whole file. It is **not** crash-atomic: a failure partway through can leave
	/// the tag region half written. When disabled, every commit goes through a temporary file in the
	/// same directory that is renamed over the original.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::WriteOptions;
	///
	/// // Always use the temporary file + rename strategy
	/// let options = WriteOptions::new().allow_in_place(false);
	/// ```
	pub fn allow_in_place(mut self, allow_in_place: bool) -> Self {
		self.allow_in_place = allow_in_place;
		self
	}

	/// Whether the rewritten file keeps the permissions of the original
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::config::WriteOptions;
	///
	/// let options = WriteOptions::new().preserve_permissions(false);
	/// ```
	pub fn preserve_permissions(mut self, preserve_permissions: bool) -> Self {
		self.preserve_permissions = preserve_permissions;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	/// 	allow_in_place: true,
	/// 	preserve_permissions: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

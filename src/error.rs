//! Error types for dependency resolution

/// Result alias used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;

/// Errors surfaced by the resolution engine and the identifier container.
///
/// The engine never swallows or converts a factory error; it only guarantees
/// that the ambient context is restored around it. A failed resolution is not
/// cached or marked; the next call simply tries again from scratch.
#[derive(Debug, thiserror::Error)]
pub enum DiError {
	/// The ambient resolution context is unavailable.
	///
	/// The context cell is pre-seeded on first use, so this only fires when a
	/// resolution runs during thread teardown.
	#[error("no ambient resolution context is available on this thread")]
	OutOfContext,

	/// An error raised inside an injectable's factory, carried verbatim.
	#[error("factory failed: {0}")]
	Factory(String),

	/// Identifier-based lookup miss in a [`Container`](crate::Container).
	#[error("no injectable registered under identifier '{0}'")]
	NotFound(String),

	/// A registration exists under the identifier but holds a different type.
	#[error("injectable '{identifier}' is registered as {registered}, not {expected}")]
	TypeMismatch {
		/// Identifier the caller resolved
		identifier: String,
		/// Type the caller asked for
		expected: &'static str,
		/// Type the registration actually produces
		registered: &'static str,
	},
}

//! Capability trait for reading buffer content.

use std::borrow::Cow;

use vellum_proto::Changedtick;

/// Read access to a buffer's content, as seen by the update broker.
///
/// Implemented by the host editor's buffer entity. Lines are addressed
/// 1-based in the buffer's native numbering. A borrowed line is only valid
/// until the next buffer access or mutation; callers that need the text past
/// that point must copy first.
pub trait BufferRead {
	/// Whether the buffer's text is currently loaded in memory.
	fn is_loaded(&self) -> bool;

	/// Number of lines in the buffer.
	fn line_count(&self) -> u64;

	/// The contents of line `lnum`.
	///
	/// `lnum` is 1-based and must be within `1..=line_count()`. Embedded NULs
	/// appear as `'\n'`, the editor's internal marker.
	fn line(&self, lnum: u64) -> Cow<'_, str>;

	/// The buffer's current changedtick.
	fn changedtick(&self) -> Changedtick;
}

//! Identifier newtypes, line payloads, and the typed update event.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Handle identifying a buffer to RPC peers.
///
/// Minted by the editor core; the update broker treats it as opaque and only
/// echoes it in outgoing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BufferHandle(pub i64);

/// Unique identifier for an RPC channel (one connected peer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Monotonic per-buffer mutation counter, maintained by the editor core.
///
/// Increments on every mutation observable to subscribers. The update broker
/// never synthesizes or compares values; it only forwards the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Changedtick(pub u64);

/// One line of buffer text as it appears on the wire.
///
/// The editor's internal line storage reuses `'\n'` as an embedded-NUL
/// marker, but peers expect real NULs. Constructing a `LineText` copies the
/// raw text and rewrites every `'\n'` to `'\0'`, so a payload never contains
/// a newline byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineText(String);

impl LineText {
	/// Copies `raw` out of buffer storage, rewriting the NUL markers.
	#[must_use]
	pub fn from_raw(raw: &str) -> Self {
		Self(raw.replace('\n', "\0"))
	}

	/// The wire representation of the line.
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// An event in a buffer's update stream.
///
/// The wire method names and positional argument layouts are part of the
/// external contract; see [`UpdateEvent::method`] and
/// [`UpdateEvent::into_args`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateEvent {
	/// A channel attached to the buffer.
	Start {
		/// Buffer the channel attached to.
		buf: BufferHandle,
		/// Changedtick at the time of attachment.
		changedtick: Changedtick,
		/// Full buffer contents, or empty when no snapshot was requested.
		linedata: Vec<LineText>,
		/// Reserved continuation flag; always `false` on the wire today.
		more: bool,
	},
	/// A channel detached from the buffer.
	End {
		/// Buffer the channel detached from.
		buf: BufferHandle,
	},
	/// A contiguous line range was replaced.
	Update {
		/// Buffer the change happened in.
		buf: BufferHandle,
		/// Changedtick after the edit, or `None` when the caller replays a
		/// historical state and the tick must be suppressed.
		changedtick: Option<Changedtick>,
		/// First changed line, 0-based inclusive.
		firstline: i64,
		/// End of the removed range, 0-based exclusive.
		lastline: i64,
		/// Lines now occupying the range.
		linedata: Vec<LineText>,
	},
	/// The buffer's changedtick moved.
	Changedtick {
		/// Buffer whose tick moved.
		buf: BufferHandle,
		/// The new changedtick.
		changedtick: Changedtick,
	},
}

impl UpdateEvent {
	/// The wire notification name for this event.
	#[must_use]
	pub fn method(&self) -> &'static str {
		match self {
			Self::Start { .. } => "nvim_buf_updates_start",
			Self::End { .. } => "nvim_buf_updates_end",
			Self::Update { .. } => "nvim_buf_update",
			Self::Changedtick { .. } => "nvim_buf_changedtick",
		}
	}

	/// Lowers the event into its positional argument tuple.
	///
	/// Field order is part of the external contract and must not change.
	#[must_use]
	pub fn into_args(self) -> Vec<Value> {
		match self {
			Self::Start {
				buf,
				changedtick,
				linedata,
				more,
			} => vec![
				Value::from(buf),
				Value::from(changedtick),
				Value::lines(linedata),
				Value::Bool(more),
			],
			Self::End { buf } => vec![Value::from(buf)],
			Self::Update {
				buf,
				changedtick,
				firstline,
				lastline,
				linedata,
			} => vec![
				Value::from(buf),
				changedtick.map_or(Value::Nil, Value::from),
				Value::Int(firstline),
				Value::Int(lastline),
				Value::lines(linedata),
			],
			Self::Changedtick { buf, changedtick } => {
				vec![Value::from(buf), Value::from(changedtick)]
			}
		}
	}
}

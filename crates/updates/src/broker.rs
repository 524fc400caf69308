//! Per-buffer update broker: snapshot-then-delta streaming to RPC channels.
//!
//! # Purpose
//!
//! - Let RPC channels attach to a buffer and receive an initial snapshot
//!   followed by an ordered stream of line-change events until they detach,
//!   the buffer is unloaded, or the channel dies.
//! - Keep subscriber bookkeeping and event fan-out inside the edit path
//!   without destabilizing it: structural mutation is deferred while a
//!   fan-out iterates.
//!
//! # Mental model
//!
//! - One [`BufferUpdates`] lives inside each buffer entity; there is no
//!   process-wide registry, so its lifetime is bounded by the buffer's
//!   loaded-in-memory lifetime.
//! - Every entry point runs on the editor's main thread, serialized with the
//!   edit that produced it. The sink only enqueues; it never calls back in.
//! - Content is read through [`BufferRead`] at the moment an event is built,
//!   and every line is copied before the next buffer access.
//! - Line numbers are 1-based at the entry points; events report 0-based
//!   indices.
//!
//! # Invariants
//!
//! 1. A channel appears at most once in the subscriber set, and a fan-out
//!    hits each subscriber exactly once, in insertion order.
//!    - Enforced in: `SubscriberSet::insert`, `SubscriberSet::remove`
//!    - Tested by: `tests::publish::test_fanout_hits_each_subscriber_once_in_order`
//!    - Failure symptom: a peer receives the same edit twice and its mirror
//!      of the buffer diverges.
//! 2. A fresh attach emits exactly one start event, and that event precedes
//!    every later line-change event observed by the channel.
//!    - Enforced in: `BufferUpdates::attach`
//!    - Tested by: `tests::attach::test_reattach_is_idempotent`,
//!      `tests::publish::test_snapshot_precedes_line_changes`
//!    - Failure symptom: a peer applies deltas to a snapshot it never
//!      received, or receives the snapshot twice.
//! 3. An end event is emitted only when a removal actually occurred.
//!    - Enforced in: `BufferUpdates::detach`
//!    - Tested by: `tests::attach::test_detach_without_subscription_is_silent`
//!    - Failure symptom: a live subscription is spuriously told it ended.
//! 4. During a fan-out only the scratch dead-channel slot is written; the
//!    subscriber set mutates strictly after iteration completes.
//!    - Enforced in: `BufferUpdates::publish_lines`
//!    - Tested by: `tests::publish::test_dead_channel_reaped_after_fanout`
//!    - Failure symptom: the fan-out skips or repeats a subscriber while the
//!      list shifts under it.
//! 5. At most one dead channel is reaped per line fan-out, and the
//!    changedtick fan-out never reaps.
//!    - Enforced in: `BufferUpdates::publish_lines`, `BufferUpdates::publish_changedtick`
//!    - Tested by: `tests::publish::test_second_dead_channel_waits_for_next_fanout`,
//!      `tests::publish::test_changedtick_fanout_does_not_reap`
//!    - Failure symptom: end events interleave into in-flight fan-outs and
//!      peers observe detach-before-delta orderings.
//! 6. No emitted line payload contains a newline byte.
//!    - Enforced in: `LineText::from_raw`
//!    - Tested by: `tests::publish::test_embedded_nul_marker_rewritten`
//!    - Failure symptom: peers misframe lines at the embedded marker.

use vellum_proto::{BufferHandle, ChannelId, UpdateEvent};

use crate::buffer::BufferRead;
use crate::encode;
use crate::sink::EventSink;
use crate::subscribers::SubscriberSet;

/// Update broker state for a single buffer.
///
/// Embed one alongside the buffer's text storage and feed it the buffer's
/// post-edit state via [`BufferRead`]. Events leave through an [`EventSink`].
/// Start, end, and changedtick deliveries are best-effort; a failed
/// line-change delivery marks the channel dead and detaches it after the
/// fan-out.
#[derive(Debug)]
pub struct BufferUpdates {
	/// Handle under which events identify this buffer to peers.
	handle: BufferHandle,
	/// Channels attached to this buffer, in attach order.
	subscribers: SubscriberSet,
}

impl BufferUpdates {
	/// Creates the broker for the buffer identified by `handle`.
	#[must_use]
	pub fn new(handle: BufferHandle) -> Self {
		Self {
			handle,
			subscribers: SubscriberSet::new(),
		}
	}

	/// Whether any channel is watching this buffer.
	///
	/// The edit path checks this before doing per-edit encoding work.
	#[must_use]
	pub fn is_active(&self) -> bool {
		!self.subscribers.is_empty()
	}

	/// Number of attached channels.
	#[must_use]
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.len()
	}

	/// Attaches `channel` to this buffer.
	///
	/// Returns `false` when the buffer is not loaded; nothing is emitted and
	/// nothing changes. A channel that is already attached stays attached and
	/// nothing is re-sent. Otherwise the channel is appended and receives one
	/// start event: the full buffer contents when `send_buffer` is set, an
	/// empty line array when not.
	pub fn attach(
		&mut self,
		buf: &impl BufferRead,
		sink: &mut impl EventSink,
		channel: ChannelId,
		send_buffer: bool,
	) -> bool {
		if !buf.is_loaded() {
			return false;
		}
		if !self.subscribers.insert(channel) {
			return true;
		}

		let linedata = if send_buffer {
			encode::snapshot(buf)
		} else {
			Vec::new()
		};
		let event = UpdateEvent::Start {
			buf: self.handle,
			changedtick: buf.changedtick(),
			linedata,
			more: false,
		};
		// A channel that dies during attach is only noticed on the next
		// line fan-out.
		sink.send(channel, &event);
		true
	}

	/// Detaches `channel`, notifying it with an end event if it was attached.
	///
	/// Detaching a channel that is not attached is a silent no-op.
	pub fn detach(&mut self, sink: &mut impl EventSink, channel: ChannelId) {
		if self.subscribers.remove(channel) {
			sink.send(channel, &UpdateEvent::End { buf: self.handle });
		}
	}

	/// Detaches every channel, notifying each in attach order.
	///
	/// Called when the buffer is unloaded or the editor shuts down.
	pub fn detach_all(&mut self, sink: &mut impl EventSink) {
		for channel in self.subscribers.iter() {
			sink.send(channel, &UpdateEvent::End { buf: self.handle });
		}
		self.subscribers.clear();
	}

	/// Publishes a line-range replacement to every subscriber.
	///
	/// `firstline` is the 1-based line the change starts at; the event
	/// reports it 0-based, with the removed range ending at
	/// `firstline - 1 + num_removed` (exclusive) and the `num_added`
	/// replacement lines read back out of the buffer. `send_tick` carries the
	/// current changedtick; callers replaying a historical state pass `false`
	/// to send the nil sentinel instead.
	pub fn publish_lines(
		&mut self,
		buf: &impl BufferRead,
		sink: &mut impl EventSink,
		firstline: i64,
		num_added: i64,
		num_removed: i64,
		send_tick: bool,
	) {
		let event = UpdateEvent::Update {
			buf: self.handle,
			changedtick: send_tick.then(|| buf.changedtick()),
			firstline: firstline - 1,
			lastline: firstline - 1 + num_removed,
			linedata: encode::line_range(buf, firstline, num_added),
		};

		// The set must not change while the fan-out iterates; a failed send
		// only records the channel in the scratch slot.
		let mut dead = None;
		for channel in self.subscribers.iter() {
			if !sink.send(channel, &event) && dead.is_none() {
				dead = Some(channel);
			}
		}

		// One reap per fan-out; later failures are picked up by the next
		// one, and line changes are frequent.
		if let Some(channel) = dead {
			tracing::error!(
				channel = channel.0,
				"disabling buffer updates for dead channel"
			);
			self.detach(sink, channel);
		}
	}

	/// Publishes the buffer's current changedtick to every subscriber.
	///
	/// No dead-channel reaping here: this runs per keystroke, and a detach
	/// issued mid-stream would reorder end events against in-flight line
	/// fan-outs.
	pub fn publish_changedtick(&self, buf: &impl BufferRead, sink: &mut impl EventSink) {
		let event = UpdateEvent::Changedtick {
			buf: self.handle,
			changedtick: buf.changedtick(),
		};
		for channel in self.subscribers.iter() {
			sink.send(channel, &event);
		}
	}
}

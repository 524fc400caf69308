//! Event delivery seam between the broker and the RPC transport.

use std::collections::HashMap;

use tokio::sync::mpsc;
use vellum_proto::{ChannelId, UpdateEvent};

/// Outbound delivery of update events to RPC channels.
///
/// Implementations must enqueue for later transmission rather than call back
/// into the broker; the broker is not re-entrant. Returning `false` marks the
/// channel dead (closed or otherwise unreachable).
pub trait EventSink {
	/// Queues `event` for delivery to `channel`.
	///
	/// Returns `false` if the channel can no longer accept events.
	fn send(&mut self, channel: ChannelId, event: &UpdateEvent) -> bool;
}

/// Queue half of a registered channel.
pub type ChannelTx = mpsc::UnboundedSender<UpdateEvent>;

/// [`EventSink`] over the registered RPC channels of a running editor.
///
/// Each channel registers the sending half of an unbounded queue; the
/// transport drains the receiving half and lowers each event with
/// [`UpdateEvent::method`] and [`UpdateEvent::into_args`]. A send to an
/// unregistered or closed channel reports the channel dead.
#[derive(Debug, Default)]
pub struct ChannelRouter {
	channels: HashMap<ChannelId, ChannelTx>,
}

impl ChannelRouter {
	/// Creates an empty router.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the queue for `channel`, replacing any previous one.
	pub fn register(&mut self, channel: ChannelId, tx: ChannelTx) {
		self.channels.insert(channel, tx);
	}

	/// Drops the queue for `channel`.
	pub fn unregister(&mut self, channel: ChannelId) {
		self.channels.remove(&channel);
	}
}

impl EventSink for ChannelRouter {
	fn send(&mut self, channel: ChannelId, event: &UpdateEvent) -> bool {
		match self.channels.get(&channel) {
			Some(tx) => tx.send(event.clone()).is_ok(),
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use vellum_proto::BufferHandle;

	use super::*;

	#[tokio::test(flavor = "current_thread")]
	async fn test_send_to_registered_channel_queues_event() {
		let (tx, mut rx) = mpsc::unbounded_channel();
		let mut router = ChannelRouter::new();
		router.register(ChannelId(3), tx);

		let event = UpdateEvent::End {
			buf: BufferHandle(1),
		};
		assert!(router.send(ChannelId(3), &event));
		assert_eq!(rx.try_recv().ok(), Some(event));
	}

	#[tokio::test(flavor = "current_thread")]
	async fn test_send_to_closed_channel_reports_dead() {
		let (tx, rx) = mpsc::unbounded_channel();
		let mut router = ChannelRouter::new();
		router.register(ChannelId(3), tx);
		drop(rx);

		let event = UpdateEvent::End {
			buf: BufferHandle(1),
		};
		assert!(!router.send(ChannelId(3), &event));
	}

	#[tokio::test(flavor = "current_thread")]
	async fn test_send_to_unregistered_channel_reports_dead() {
		let mut router = ChannelRouter::new();
		let event = UpdateEvent::End {
			buf: BufferHandle(1),
		};
		assert!(!router.send(ChannelId(9), &event));
	}

	#[tokio::test(flavor = "current_thread")]
	async fn test_unregister_drops_the_queue() {
		let (tx, _rx) = mpsc::unbounded_channel();
		let mut router = ChannelRouter::new();
		router.register(ChannelId(3), tx);
		router.unregister(ChannelId(3));

		let event = UpdateEvent::End {
			buf: BufferHandle(1),
		};
		assert!(!router.send(ChannelId(3), &event));
	}
}

//! Ordered set of channels attached to one buffer.

use vellum_proto::ChannelId;

/// The channels currently subscribed to a buffer's update stream.
///
/// Insertion-ordered and duplicate-free. Fan-outs iterate in insertion
/// order; removing one channel preserves the relative order of the rest.
#[derive(Debug, Default)]
pub struct SubscriberSet {
	channels: Vec<ChannelId>,
}

impl SubscriberSet {
	/// Creates an empty set.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether `channel` is in the set.
	#[must_use]
	pub fn contains(&self, channel: ChannelId) -> bool {
		self.channels.contains(&channel)
	}

	/// Appends `channel` unless it is already present.
	///
	/// Returns `true` if the channel was inserted.
	pub fn insert(&mut self, channel: ChannelId) -> bool {
		if self.contains(channel) {
			return false;
		}
		self.channels.push(channel);
		true
	}

	/// Removes `channel`, keeping the remaining channels in order.
	///
	/// Returns `true` if a removal occurred.
	pub fn remove(&mut self, channel: ChannelId) -> bool {
		let before = self.channels.len();
		self.channels.retain(|&c| c != channel);
		let removed = before - self.channels.len();
		debug_assert!(
			removed <= 1,
			"channel {} subscribed more than once",
			channel.0
		);
		removed > 0
	}

	/// Iterates over the channels in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = ChannelId> + '_ {
		self.channels.iter().copied()
	}

	/// Removes every channel.
	pub fn clear(&mut self) {
		self.channels.clear();
	}

	/// Number of subscribed channels.
	#[must_use]
	pub fn len(&self) -> usize {
		self.channels.len()
	}

	/// Whether no channel is subscribed.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.channels.is_empty()
	}
}

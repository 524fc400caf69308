//! Test doubles shared by the broker tests.

use std::borrow::Cow;
use std::collections::HashSet;

use vellum_proto::{Changedtick, ChannelId, UpdateEvent};

use crate::buffer::BufferRead;
use crate::sink::EventSink;

/// In-memory buffer with 1-based line access.
pub struct TestBuffer {
	pub lines: Vec<String>,
	pub changedtick: u64,
	pub loaded: bool,
}

impl TestBuffer {
	pub fn new(lines: &[&str], changedtick: u64) -> Self {
		Self {
			lines: lines.iter().map(|s| s.to_string()).collect(),
			changedtick,
			loaded: true,
		}
	}

	pub fn unloaded() -> Self {
		Self {
			lines: Vec::new(),
			changedtick: 0,
			loaded: false,
		}
	}
}

impl BufferRead for TestBuffer {
	fn is_loaded(&self) -> bool {
		self.loaded
	}

	fn line_count(&self) -> u64 {
		self.lines.len() as u64
	}

	fn line(&self, lnum: u64) -> Cow<'_, str> {
		Cow::Borrowed(&self.lines[lnum as usize - 1])
	}

	fn changedtick(&self) -> Changedtick {
		Changedtick(self.changedtick)
	}
}

/// Sink that records every delivery and can be told to fail channels.
#[derive(Default)]
pub struct RecordingSink {
	pub sent: Vec<(ChannelId, UpdateEvent)>,
	failing: HashSet<ChannelId>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks `channel` as dead: deliveries are still recorded but report
	/// failure.
	pub fn fail_channel(&mut self, channel: ChannelId) {
		self.failing.insert(channel);
	}

	/// The wire methods of everything sent to `channel`, in order.
	pub fn methods_for(&self, channel: ChannelId) -> Vec<&'static str> {
		self.sent
			.iter()
			.filter(|(c, _)| *c == channel)
			.map(|(_, e)| e.method())
			.collect()
	}
}

impl EventSink for RecordingSink {
	fn send(&mut self, channel: ChannelId, event: &UpdateEvent) -> bool {
		self.sent.push((channel, event.clone()));
		!self.failing.contains(&channel)
	}
}

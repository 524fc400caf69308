//! Per-buffer change notifications for RPC clients.
//!
//! An RPC channel attaches to a buffer and receives an initial snapshot
//! followed by an ordered stream of line-change events until it detaches, the
//! buffer is unloaded, or the channel dies:
//! * [`BufferUpdates`]: per-buffer broker driving attach/detach and fan-out
//! * [`SubscriberSet`]: insertion-ordered set of attached channels
//! * [`BufferRead`] / [`EventSink`]: capability seams toward the buffer
//!   storage and the RPC transport
//! * [`ChannelRouter`]: queue-backed [`EventSink`] over registered channels

#![warn(missing_docs)]

pub mod broker;
pub mod buffer;
pub mod encode;
pub mod sink;
pub mod subscribers;

#[cfg(test)]
mod tests;

pub use broker::BufferUpdates;
pub use buffer::BufferRead;
pub use sink::{ChannelRouter, ChannelTx, EventSink};
pub use subscribers::SubscriberSet;

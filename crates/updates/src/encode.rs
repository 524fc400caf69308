//! Copies line ranges out of buffer storage into wire payloads.
//!
//! A borrowed line is only valid until the next buffer access, so every line
//! is copied into an owned [`LineText`] (which also rewrites the internal
//! `'\n'` NUL markers) before the next line is requested.

use vellum_proto::LineText;

use crate::buffer::BufferRead;

/// Copies the full buffer contents, one payload per line.
pub fn snapshot(buf: &impl BufferRead) -> Vec<LineText> {
	(1..=buf.line_count())
		.map(|lnum| LineText::from_raw(&buf.line(lnum)))
		.collect()
}

/// Copies the `num_added` lines now occupying the range that starts at the
/// 1-based `firstline`.
///
/// Non-positive `num_added` yields an empty array.
pub fn line_range(buf: &impl BufferRead, firstline: i64, num_added: i64) -> Vec<LineText> {
	if num_added <= 0 {
		return Vec::new();
	}
	(0..num_added)
		.map(|i| LineText::from_raw(&buf.line((firstline + i) as u64)))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::helpers::TestBuffer;

	#[test]
	fn test_snapshot_copies_every_line() {
		let buf = TestBuffer::new(&["alpha", "beta", "gamma"], 4);
		let lines = snapshot(&buf);
		assert_eq!(lines.len(), 3);
		assert_eq!(lines[0].as_str(), "alpha");
		assert_eq!(lines[2].as_str(), "gamma");
	}

	#[test]
	fn test_line_range_reads_back_replacement_lines() {
		let buf = TestBuffer::new(&["x", "y", "alpha"], 6);
		let lines = line_range(&buf, 1, 2);
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0].as_str(), "x");
		assert_eq!(lines[1].as_str(), "y");
	}

	#[test]
	fn test_line_range_empty_for_non_positive_count() {
		let buf = TestBuffer::new(&["alpha"], 1);
		assert!(line_range(&buf, 1, 0).is_empty());
		assert!(line_range(&buf, 1, -1).is_empty());
	}

	#[test]
	fn test_copies_rewrite_nul_markers() {
		let buf = TestBuffer::new(&["a\nb"], 1);
		let lines = snapshot(&buf);
		assert_eq!(lines[0].as_str(), "a\0b");
	}
}

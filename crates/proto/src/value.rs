//! Positional argument values for update notifications.

use serde::ser::{Serialize, Serializer};

use crate::types::{BufferHandle, Changedtick, LineText};

/// A single positional argument in an update notification.
///
/// Mirrors the value space of the msgpack-rpc wire: nil, booleans, integers,
/// strings, and arrays. Only the shapes the update stream actually emits are
/// modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// The null sentinel.
	Nil,
	/// A boolean.
	Bool(bool),
	/// A signed integer.
	Int(i64),
	/// A line payload.
	Str(LineText),
	/// A nested array.
	Array(Vec<Value>),
}

impl Value {
	/// Wraps a line array as a positional argument.
	#[must_use]
	pub fn lines(linedata: Vec<LineText>) -> Self {
		Self::Array(linedata.into_iter().map(Self::Str).collect())
	}
}

impl From<BufferHandle> for Value {
	fn from(buf: BufferHandle) -> Self {
		Self::Int(buf.0)
	}
}

impl From<Changedtick> for Value {
	fn from(tick: Changedtick) -> Self {
		// The wire integer space is signed 64-bit.
		Self::Int(tick.0 as i64)
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Nil => serializer.serialize_unit(),
			Self::Bool(b) => serializer.serialize_bool(*b),
			Self::Int(n) => serializer.serialize_i64(*n),
			Self::Str(line) => serializer.serialize_str(line.as_str()),
			Self::Array(items) => items.serialize(serializer),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lines_wraps_each_payload() {
		let value = Value::lines(vec![LineText::from_raw("x"), LineText::from_raw("y")]);
		assert_eq!(
			value,
			Value::Array(vec![
				Value::Str(LineText::from_raw("x")),
				Value::Str(LineText::from_raw("y")),
			]),
		);
	}

	#[test]
	fn test_msgpack_encoding_matches_wire_bytes() {
		// Args of a line-change notification with a suppressed tick and one
		// replacement line carrying an embedded NUL.
		let args = vec![
			Value::Int(7),
			Value::Nil,
			Value::Int(0),
			Value::Int(1),
			Value::lines(vec![LineText::from_raw("a\nb")]),
		];

		let bytes = rmp_serde::to_vec(&args).expect("encode args");
		assert_eq!(
			bytes,
			vec![0x95, 0x07, 0xc0, 0x00, 0x01, 0x91, 0xa3, b'a', 0x00, b'b'],
		);
	}

	#[test]
	fn test_msgpack_nil_and_bool() {
		assert_eq!(rmp_serde::to_vec(&Value::Nil).expect("encode"), vec![0xc0]);
		assert_eq!(
			rmp_serde::to_vec(&Value::Bool(false)).expect("encode"),
			vec![0xc2],
		);
	}
}

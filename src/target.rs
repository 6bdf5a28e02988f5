use crate::{error::Result, reserved, value::Listener};
use core::{fmt::Debug, hash::Hash};

/// The primitive operations of a rendering target.
///
/// Only node creation can fail. Implementations are expected to log (and otherwise ignore) failures of the other operations,
/// since a half-applied patch can't be rolled back either way.
pub trait Target {
	/// A handle to a node in the target tree.
	type Node: Clone + Eq + Hash + Debug;

	/// # Errors
	///
	/// Iff the target can't create an element with this tag name.
	fn create_element(&mut self, tag: &str) -> Result<Self::Node>;

	/// # Errors
	///
	/// Iff the target can't create a text node.
	fn create_text(&mut self, text: &str) -> Result<Self::Node>;

	/// # Errors
	///
	/// Iff the target can't create a comment (placeholder) node.
	fn create_comment(&mut self, data: &str) -> Result<Self::Node>;

	/// Creates a container-less grouping node. Appending it moves its children instead.
	///
	/// # Errors
	///
	/// Iff the target can't create a grouping node.
	fn create_fragment(&mut self) -> Result<Self::Node>;

	fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
	fn remove_attribute(&mut self, node: &Self::Node, name: &str);
	fn add_listener(&mut self, node: &Self::Node, event: &str, listener: &Listener, options: ListenerOptions);
	fn remove_listener(&mut self, node: &Self::Node, event: &str, listener: &Listener, options: ListenerOptions);
	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
	fn clear_children(&mut self, node: &Self::Node);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListenerOptions {
	pub capture: bool,
	pub once: bool,
	pub passive: bool,
}

impl ListenerOptions {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_capture(mut self, capture: bool) -> Self {
		self.capture = capture;
		self
	}
}

/// Parses an event property name into the event name and listener options.
///
/// `onClick` binds `click`, `onClickCapture` binds `click` with [`ListenerOptions::capture`] set.
#[must_use]
pub fn event_binding(key: &str) -> Option<(String, ListenerOptions)> {
	if !reserved::is_event_key(key) {
		return None;
	}
	let name = &key[reserved::EVENT_PREFIX.len()..];
	let (name, capture) = match name.strip_suffix(reserved::CAPTURE_SUFFIX) {
		Some(stripped) if !stripped.is_empty() => (stripped, true),
		_ => (name, false),
	};
	Some((name.to_ascii_lowercase(), ListenerOptions::new().with_capture(capture)))
}

//! An in-memory display tree with DOM-like semantics.
//!
//! Every mutation is recorded in a [journal](`MemoryTarget::journal`), which makes this target useful to observe exactly
//! what a render or update did.

use crate::{
	error::Result,
	target::{ListenerOptions, Target},
	value::Listener,
};
use core::{any::Any, fmt::Write as _};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Binding {
	pub event: String,
	pub listener: Listener,
	pub options: ListenerOptions,
}

#[derive(Debug, Clone)]
pub enum NodeData {
	Element {
		tag: String,
		attributes: Vec<(String, String)>,
		listeners: Vec<Binding>,
	},
	Text(String),
	Comment(String),
	Fragment,
}

/// A recorded mutation. Listeners are identified by [`Listener::id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
	CreateElement { node: NodeId, tag: String },
	CreateText { node: NodeId, text: String },
	CreateComment { node: NodeId, data: String },
	CreateFragment { node: NodeId },
	SetAttribute { node: NodeId, name: String, value: String },
	RemoveAttribute { node: NodeId, name: String },
	AddListener { node: NodeId, event: String, listener: usize, options: ListenerOptions },
	RemoveListener { node: NodeId, event: String, listener: usize, options: ListenerOptions },
	AppendChild { parent: NodeId, child: NodeId },
	ClearChildren { node: NodeId },
}

#[derive(Debug)]
struct Slot {
	data: NodeData,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct MemoryTarget {
	slots: Vec<Slot>,
	journal: Vec<Op>,
}

impl MemoryTarget {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached element to render into. This is not journaled.
	pub fn create_container(&mut self, tag: &str) -> NodeId {
		self.push(NodeData::Element {
			tag: tag.to_owned(),
			attributes: Vec::new(),
			listeners: Vec::new(),
		})
	}

	fn push(&mut self, data: NodeData) -> NodeId {
		self.slots.push(Slot {
			data,
			parent: None,
			children: Vec::new(),
		});
		NodeId(self.slots.len() - 1)
	}

	/// # Panics
	///
	/// Iff `node` wasn't created by this instance.
	fn slot(&self, node: NodeId) -> &Slot {
		&self.slots[node.0]
	}

	fn slot_mut(&mut self, node: NodeId) -> &mut Slot {
		&mut self.slots[node.0]
	}

	#[must_use]
	pub fn data(&self, node: NodeId) -> &NodeData {
		&self.slot(node).data
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		&self.slot(node).children
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.slot(node).parent
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		match self.data(node) {
			NodeData::Element { attributes, .. } => attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str()),
			_ => None,
		}
	}

	#[must_use]
	pub fn listeners(&self, node: NodeId) -> &[Binding] {
		match self.data(node) {
			NodeData::Element { listeners, .. } => listeners,
			_ => &[],
		}
	}

	#[must_use]
	pub fn journal(&self) -> &[Op] {
		&self.journal
	}

	pub fn take_journal(&mut self) -> Vec<Op> {
		core::mem::take(&mut self.journal)
	}

	/// Invokes the listeners for `event` on `node` in binding order. Returns how many were called.
	///
	/// There is no propagation.
	pub fn dispatch(&self, node: NodeId, event: &str, payload: &dyn Any) -> usize {
		let listeners: Vec<Listener> = self
			.listeners(node)
			.iter()
			.filter(|binding| binding.event == event)
			.map(|binding| binding.listener.clone())
			.collect();
		for listener in &listeners {
			listener.call(payload);
		}
		listeners.len()
	}

	/// The concatenated text of all descendant text nodes.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		match self.data(node) {
			NodeData::Text(text) => text.clone(),
			NodeData::Comment(_) => String::new(),
			NodeData::Element { .. } | NodeData::Fragment => self.children(node).iter().map(|&child| self.text_content(child)).collect(),
		}
	}

	/// Outer markup of `node`, with comments as `<!--…-->` and listeners omitted.
	#[must_use]
	pub fn markup(&self, node: NodeId) -> String {
		let mut out = String::new();
		self.write_markup(node, &mut out);
		out
	}

	fn write_markup(&self, node: NodeId, out: &mut String) {
		match self.data(node) {
			NodeData::Text(text) => out.push_str(text),
			NodeData::Comment(data) => {
				let _ = write!(out, "<!--{}-->", data);
			}
			NodeData::Fragment => {
				for &child in self.children(node) {
					self.write_markup(child, out);
				}
			}
			NodeData::Element { tag, attributes, .. } => {
				let _ = write!(out, "<{}", tag);
				for (name, value) in attributes {
					let _ = write!(out, " {}=\"{}\"", name, value);
				}
				out.push('>');
				for &child in self.children(node) {
					self.write_markup(child, out);
				}
				let _ = write!(out, "</{}>", tag);
			}
		}
	}

	fn detach(&mut self, child: NodeId) {
		if let Some(parent) = self.slot_mut(child).parent.take() {
			self.slot_mut(parent).children.retain(|&c| c != child);
		}
	}
}

impl Target for MemoryTarget {
	type Node = NodeId;

	fn create_element(&mut self, tag: &str) -> Result<NodeId> {
		let node = self.create_container(tag);
		self.journal.push(Op::CreateElement { node, tag: tag.to_owned() });
		Ok(node)
	}

	fn create_text(&mut self, text: &str) -> Result<NodeId> {
		let node = self.push(NodeData::Text(text.to_owned()));
		self.journal.push(Op::CreateText { node, text: text.to_owned() });
		Ok(node)
	}

	fn create_comment(&mut self, data: &str) -> Result<NodeId> {
		let node = self.push(NodeData::Comment(data.to_owned()));
		self.journal.push(Op::CreateComment { node, data: data.to_owned() });
		Ok(node)
	}

	fn create_fragment(&mut self) -> Result<NodeId> {
		let node = self.push(NodeData::Fragment);
		self.journal.push(Op::CreateFragment { node });
		Ok(node)
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
		match &mut self.slot_mut(*node).data {
			NodeData::Element { attributes, .. } => match attributes.iter_mut().find(|(n, _)| n == name) {
				Some((_, slot)) => *slot = value.to_owned(),
				None => attributes.push((name.to_owned(), value.to_owned())),
			},
			other => return error!("Can't set attribute {:?} on {:?}", name, other),
		}
		self.journal.push(Op::SetAttribute {
			node: *node,
			name: name.to_owned(),
			value: value.to_owned(),
		});
	}

	fn remove_attribute(&mut self, node: &NodeId, name: &str) {
		if let NodeData::Element { attributes, .. } = &mut self.slot_mut(*node).data {
			attributes.retain(|(n, _)| n != name);
		}
		self.journal.push(Op::RemoveAttribute { node: *node, name: name.to_owned() });
	}

	fn add_listener(&mut self, node: &NodeId, event: &str, listener: &Listener, options: ListenerOptions) {
		match &mut self.slot_mut(*node).data {
			NodeData::Element { listeners, .. } => {
				// Like the DOM, ignore exact duplicates.
				if !listeners
					.iter()
					.any(|b| b.event == event && b.listener.ptr_eq(listener) && b.options.capture == options.capture)
				{
					listeners.push(Binding {
						event: event.to_owned(),
						listener: listener.clone(),
						options,
					});
				}
			}
			other => return error!("Can't add {:?} listener to {:?}", event, other),
		}
		self.journal.push(Op::AddListener {
			node: *node,
			event: event.to_owned(),
			listener: listener.id(),
			options,
		});
	}

	fn remove_listener(&mut self, node: &NodeId, event: &str, listener: &Listener, options: ListenerOptions) {
		if let NodeData::Element { listeners, .. } = &mut self.slot_mut(*node).data {
			listeners.retain(|b| !(b.event == event && b.listener.ptr_eq(listener) && b.options.capture == options.capture));
		}
		self.journal.push(Op::RemoveListener {
			node: *node,
			event: event.to_owned(),
			listener: listener.id(),
			options,
		});
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
		let moved = if matches!(self.data(*child), NodeData::Fragment) {
			core::mem::take(&mut self.slot_mut(*child).children)
		} else {
			self.detach(*child);
			vec![*child]
		};
		for node in moved {
			self.slot_mut(node).parent = Some(*parent);
			self.slot_mut(*parent).children.push(node);
		}
		self.journal.push(Op::AppendChild { parent: *parent, child: *child });
	}

	fn clear_children(&mut self, node: &NodeId) {
		for child in core::mem::take(&mut self.slot_mut(*node).children) {
			self.slot_mut(child).parent = None;
		}
		self.journal.push(Op::ClearChildren { node: *node });
	}
}

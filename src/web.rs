//! A [`Target`] over a live browser [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).

use crate::{
	error::{Error, Result},
	listener_table::ListenerTable,
	target::{ListenerOptions, Target},
	value::Listener,
};
use core::{
	fmt::{self, Debug, Formatter},
	hash::{Hash, Hasher},
};
use js_sys::Function;
use tracing::{error, info, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};

/// A handle to a [`web_sys::Node`], identified by a per-[`WebTarget`] serial number.
#[derive(Clone)]
pub struct WebNode {
	id: u32,
	node: web_sys::Node,
}

impl WebNode {
	#[must_use]
	pub fn node(&self) -> &web_sys::Node {
		&self.node
	}
}

impl PartialEq for WebNode {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}
impl Eq for WebNode {}

impl Hash for WebNode {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state)
	}
}

impl Debug for WebNode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebNode").field("id", &self.id).field("node_name", &self.node.node_name()).finish()
	}
}

/// Renders into a browser DOM.
///
/// Each distinct [`Listener`] is wrapped into a single [`Closure`] shared by all of its bindings.
/// Closures are reference-counted per binding and freed by [`WebTarget::collect_listeners`] once unbound,
/// so call that after updates that may have removed listeners.
///
/// Dropping the [`WebTarget`] while listeners are still attached makes them throw into JavaScript when invoked.
pub struct WebTarget {
	document: web_sys::Document,
	next_id: u32,
	handler_handles: ListenerTable<Closure<dyn Fn(web_sys::Event)>>,
	event_listener_options_cache: [Option<web_sys::AddEventListenerOptions>; 8],
}

impl Debug for WebTarget {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebTarget")
			.field("next_id", &self.next_id)
			.field("handler_handles", &self.handler_handles)
			.finish_non_exhaustive()
	}
}

impl WebTarget {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			next_id: 0,
			handler_handles: ListenerTable::new(),
			event_listener_options_cache: [None, None, None, None, None, None, None, None],
		}
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	/// Wraps an existing node, e.g. to use it as render container.
	pub fn adopt(&mut self, node: impl Into<web_sys::Node>) -> WebNode {
		let id = self.next_id;
		self.next_id = self.next_id.wrapping_add(1);
		WebNode { id, node: node.into() }
	}

	/// Frees the closures of listeners that aren't bound anymore. Returns how many were freed.
	#[instrument]
	pub fn collect_listeners(&mut self) -> usize {
		let freed = self.handler_handles.collect();
		trace!("Freed {} event listener(s).", freed);
		info!("Event listener count/cached capacity: {}/{}", self.handler_handles.len(), self.handler_handles.capacity());
		freed
	}

	fn get_cached_add_event_listener_options(
		event_listener_options_cache: &mut [Option<web_sys::AddEventListenerOptions>; 8],
		options: ListenerOptions,
	) -> &web_sys::AddEventListenerOptions {
		let entry = &mut event_listener_options_cache[usize::from(options.capture) + usize::from(options.once) * 2 + usize::from(options.passive) * 4];
		entry.get_or_insert_with(|| {
			let mut web_options = web_sys::AddEventListenerOptions::new();
			web_options.capture(options.capture).once(options.once).passive(options.passive);
			web_options
		})
	}
}

impl Target for WebTarget {
	type Node = WebNode;

	fn create_element(&mut self, tag: &str) -> Result<WebNode> {
		let element = self
			.document
			.create_element(tag)
			.map_err(|error| Error::Target(format!("Failed to create element <{}>: {:?}", tag, error)))?;
		Ok(self.adopt(element))
	}

	fn create_text(&mut self, text: &str) -> Result<WebNode> {
		let text = self.document.create_text_node(text);
		Ok(self.adopt(text))
	}

	fn create_comment(&mut self, data: &str) -> Result<WebNode> {
		let comment = self.document.create_comment(data);
		Ok(self.adopt(comment))
	}

	fn create_fragment(&mut self) -> Result<WebNode> {
		let fragment = self.document.create_document_fragment();
		Ok(self.adopt(fragment))
	}

	fn set_attribute(&mut self, node: &WebNode, name: &str, value: &str) {
		match node.node.dyn_ref::<web_sys::Element>() {
			Some(element) => {
				if let Err(error) = element.set_attribute(name, value) {
					error!("Could not set attribute {:?}: {:?}", name, error)
				}
			}
			None => error!("Expected to set attribute {:?} on `web_sys::Element` but found {:?}", name, node),
		}
	}

	fn remove_attribute(&mut self, node: &WebNode, name: &str) {
		match node.node.dyn_ref::<web_sys::Element>() {
			Some(element) => {
				if let Err(error) = element.remove_attribute(name) {
					warn!("Could not remove attribute {:?}: {:?}", name, error)
				}
			}
			None => error!("Expected to remove attribute {:?} from `web_sys::Element` but found {:?}", name, node),
		}
	}

	fn add_listener(&mut self, node: &WebNode, event: &str, listener: &Listener, options: ListenerOptions) {
		let function: Function = match self.handler_handles.bind(listener, |listener| {
			let listener = listener.clone();
			Closure::wrap(Box::new(move |event: web_sys::Event| listener.call(&event)) as Box<dyn Fn(web_sys::Event)>)
		}) {
			Ok(closure) => closure.as_ref().unchecked_ref::<Function>().clone(),
			Err(_) => return error!("Too many (more than 65k) active bindings of the same `Listener`"),
		};

		let web_options = Self::get_cached_add_event_listener_options(&mut self.event_listener_options_cache, options);
		if let Err(error) = node
			.node
			.add_event_listener_with_callback_and_add_event_listener_options(event, &function, web_options)
		{
			error!("Failed to add event listener {:?}: {:?}", event, error)
		}
	}

	fn remove_listener(&mut self, node: &WebNode, event: &str, listener: &Listener, options: ListenerOptions) {
		let function: Function = match self.handler_handles.unbind(listener) {
			Ok(Some(closure)) => closure.as_ref().unchecked_ref::<Function>().clone(),
			Ok(None) => return error!("Tried to remove unknown event listener {:?} ({:?})", event, listener),
			Err(_) => return error!("Listener reference count underflow for {:?} ({:?})", event, listener),
		};

		if let Err(error) = node
			.node
			.remove_event_listener_with_callback_and_bool(event, &function, options.capture)
		{
			error!("Failed to remove event listener {:?} ({:?}): {:?}", event, options, error)
		}
	}

	fn append_child(&mut self, parent: &WebNode, child: &WebNode) {
		if let Err(error) = parent.node.append_child(&child.node) {
			error!("Failed to append {:?} to {:?}: {:?}", child, parent, error)
		}
	}

	fn clear_children(&mut self, node: &WebNode) {
		node.node.set_text_content(None)
	}
}

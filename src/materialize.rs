use crate::{
	error::Result,
	expand::Expanded,
	reconcile::{reconcile_props, unbind_listeners},
	target::Target,
	value::Props,
	Redacted,
};
use core::hash::Hash;
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::trace_span;

/// Non-owning associations between target nodes and the expanded vnodes that produced them, in both directions.
///
/// Vnodes are identified by their [`Rc`] allocation. Linked vnodes are kept alive by this table until unlinked.
#[derive(Debug)]
pub struct BackRefs<N: Eq + Hash> {
	vnodes: HashMap<N, Rc<Expanded>>,
	nodes: HashMap<usize, N>,
}

impl<N: Eq + Hash> Default for BackRefs<N> {
	fn default() -> Self {
		Self {
			vnodes: HashMap::new(),
			nodes: HashMap::new(),
		}
	}
}

fn identity(vnode: &Rc<Expanded>) -> usize {
	Rc::as_ptr(vnode) as usize
}

impl<N: Clone + Eq + Hash> BackRefs<N> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn link(&mut self, node: N, vnode: &Rc<Expanded>) {
		if let Some(replaced) = self.vnodes.insert(node.clone(), vnode.clone()) {
			self.nodes.remove(&identity(&replaced));
		}
		self.nodes.insert(identity(vnode), node);
	}

	/// Removes the links of `node` only.
	pub fn unlink(&mut self, node: &N) -> Option<Rc<Expanded>> {
		let vnode = self.vnodes.remove(node)?;
		self.nodes.remove(&identity(&vnode));
		Some(vnode)
	}

	/// Removes the links of `vnode` only, returning the node it was linked to.
	pub fn unlink_vnode(&mut self, vnode: &Rc<Expanded>) -> Option<N> {
		let node = self.nodes.remove(&identity(vnode))?;
		self.vnodes.remove(&node);
		Some(node)
	}

	#[must_use]
	pub fn vnode_of(&self, node: &N) -> Option<&Rc<Expanded>> {
		self.vnodes.get(node)
	}

	#[must_use]
	pub fn node_of(&self, vnode: &Rc<Expanded>) -> Option<&N> {
		self.nodes.get(&identity(vnode))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.vnodes.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.vnodes.is_empty()
	}
}

/// Creates the target subtree for `vnode` and links every created node to its vnode.
///
/// Fragment members are appended to the grouping node, so they end up in its parent once that is appended.
///
/// # Errors
///
/// Iff the target fails to create a node.
/// Everything created up to that point is [released](`release`) again and stays unattached.
pub fn materialize<T: Target + ?Sized>(target: &mut T, back_refs: &mut BackRefs<T::Node>, vnode: &Rc<Expanded>) -> Result<T::Node> {
	materialize_linked(target, back_refs, vnode).map_err(|error| {
		release(target, back_refs, vnode);
		error
	})
}

fn materialize_linked<T: Target + ?Sized>(target: &mut T, back_refs: &mut BackRefs<T::Node>, vnode: &Rc<Expanded>) -> Result<T::Node> {
	match &**vnode {
		Expanded::Empty(placeholder) => {
			let span = trace_span!("Creating placeholder", %placeholder);
			let _enter = span.enter();
			let node = target.create_comment(&placeholder.to_string())?;
			back_refs.link(node.clone(), vnode);
			Ok(node)
		}

		Expanded::Text(literal) => {
			let text = literal.to_string();
			let span = trace_span!("Creating text node", text = %Redacted(&text));
			let _enter = span.enter();
			let node = target.create_text(&text)?;
			back_refs.link(node.clone(), vnode);
			Ok(node)
		}

		Expanded::Fragment(members) => {
			let span = trace_span!("Creating fragment", "members.len()" = members.len());
			let _enter = span.enter();
			let group = target.create_fragment()?;
			back_refs.link(group.clone(), vnode);
			for member in members {
				let child = materialize_linked(target, back_refs, member)?;
				target.append_child(&group, &child);
			}
			Ok(group)
		}

		Expanded::Element(element) => {
			let span = trace_span!("Creating element", tag = &*element.tag, "children.len()" = element.children.len());
			let _enter = span.enter();
			let node = target.create_element(&element.tag)?;
			back_refs.link(node.clone(), vnode);
			reconcile_props(target, &node, &element.props, &Props::new());
			for child in &element.children {
				let child = materialize_linked(target, back_refs, child)?;
				target.append_child(&node, &child);
			}
			Ok(node)
		}
	}
}

/// Unbinds the listeners of `vnode`'s subtree and removes its back-references.
///
/// The target nodes themselves are left where they are. Vnodes that aren't linked (anymore) are skipped.
pub fn release<T: Target + ?Sized>(target: &mut T, back_refs: &mut BackRefs<T::Node>, vnode: &Rc<Expanded>) {
	if let Some(node) = back_refs.unlink_vnode(vnode) {
		if let Expanded::Element(element) = &**vnode {
			unbind_listeners(target, &node, &element.props);
		}
	}
	for child in vnode.children() {
		release(target, back_refs, child);
	}
}

use crate::{
	error::{Error, Result},
	expand::{expand, Expanded, ExpandedElement},
	key::compute_child_key_map,
	materialize::{materialize, release, BackRefs},
	reconcile::reconcile_props,
	target::Target,
	value::{same_value, Props, Value},
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument, trace, trace_span, warn};

/// What [`Renderer::update`] did to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// The root was patched in place. Its child list was left as is because it is empty or shallowly equal on both sides.
	Patched,
	/// All previous children were removed.
	Cleared,
	/// This many children were created where there were none before.
	Inserted(usize),
	/// The root couldn't be patched in place and was recreated.
	Replaced,
	/// Both the previous and the next child list are non-empty and differ.
	///
	/// Root properties were reconciled, but children are not diffed pairwise and were left untouched.
	ChildrenUnpatched,
}

struct Mount<N> {
	source: Value,
	root: N,
}

/// A render session: Owns the [`Target`] and the back-references of everything rendered into it.
///
/// # Correct Use
///
/// Calls must not interleave. Everything here is synchronous and runs to completion, but a listener that re-enters the
/// renderer while it is borrowed can't do so anyway.
pub struct Renderer<T: Target> {
	target: T,
	mounts: HashMap<T::Node, Mount<T::Node>>,
	back_refs: BackRefs<T::Node>,
}

impl<T: Target> Renderer<T> {
	#[must_use]
	pub fn new(target: T) -> Self {
		Self {
			target,
			mounts: HashMap::new(),
			back_refs: BackRefs::new(),
		}
	}

	pub fn target(&self) -> &T {
		&self.target
	}

	pub fn target_mut(&mut self) -> &mut T {
		&mut self.target
	}

	pub fn into_target(self) -> T {
		self.target
	}

	/// The expanded vnode that produced `node`, if it is still rendered.
	#[must_use]
	pub fn vnode_of(&self, node: &T::Node) -> Option<&Rc<Expanded>> {
		self.back_refs.vnode_of(node)
	}

	/// The target node produced by `vnode`, if it is still rendered.
	#[must_use]
	pub fn node_of(&self, vnode: &Rc<Expanded>) -> Option<&T::Node> {
		self.back_refs.node_of(vnode)
	}

	/// The rendered root vnode of `container`.
	#[must_use]
	pub fn root_vnode(&self, container: &T::Node) -> Option<&Rc<Expanded>> {
		let mount = self.mounts.get(container)?;
		self.back_refs.vnode_of(&mount.root)
	}

	#[must_use]
	pub fn back_refs(&self) -> &BackRefs<T::Node> {
		&self.back_refs
	}

	/// Clears `container`, then expands and materializes `vnode` into it.
	///
	/// `vnode` is kept as the container's source description and expanded again by each [`update`](`Renderer::update`).
	/// Use a [`Value::Thunk`] to have that re-expansion see new state.
	///
	/// # Errors
	///
	/// If expansion or node creation fails. The container is left empty in that case.
	#[instrument(skip(self, vnode))]
	pub fn render(&mut self, vnode: impl Into<Value>, container: &T::Node) -> Result<()> {
		if let Some(previous) = self.mounts.remove(container) {
			self.forget(&previous.root);
		}
		self.target.clear_children(container);

		let source = vnode.into();
		let expanded = expand(&source)?;
		let root = materialize(&mut self.target, &mut self.back_refs, &expanded)?;
		self.target.append_child(container, &root);
		debug!(kind = expanded.kind().name(), "Rendered.");

		self.mounts.insert(container.clone(), Mount { source, root });
		Ok(())
	}

	/// Re-expands the source description of `container` and patches the rendered tree to match.
	///
	/// The target is only mutated after the re-expansion succeeded.
	///
	/// # Errors
	///
	/// - [`Error::MissingRenderState`] if `container` wasn't [rendered](`Renderer::render`) into.
	/// - Any expansion error, with the target left untouched.
	/// - Node creation errors while inserting or replacing. Nothing is attached or recorded in that case.
	#[instrument(skip(self))]
	pub fn update(&mut self, container: &T::Node) -> Result<Outcome> {
		let (source, root) = match self.mounts.get(container) {
			Some(mount) => (mount.source.clone(), mount.root.clone()),
			None => return Err(missing_render_state(container)),
		};
		let prev = self.back_refs.vnode_of(&root).cloned().ok_or_else(|| missing_render_state(container))?;

		let next = expand(&source)?;

		let outcome = match (&*prev, &*next) {
			(Expanded::Element(p), Expanded::Element(n)) if p.tag == n.tag => {
				let span = trace_span!("Patching root element", tag = &*n.tag);
				let _enter = span.enter();
				reconcile_props(&mut self.target, &root, &n.props, &p.props);
				let outcome = self.patch_children(&root, &p.children, &n.children)?;
				let recorded = if retains_children(outcome) {
					Rc::new(Expanded::Element(ExpandedElement {
						tag: n.tag.clone(),
						props: n.props.clone(),
						children: p.children.clone(),
					}))
				} else {
					Rc::clone(&next)
				};
				self.back_refs.unlink(&root);
				self.back_refs.link(root, &recorded);
				outcome
			}

			(Expanded::Fragment(p), Expanded::Fragment(n)) => {
				let span = trace_span!("Patching root fragment");
				let _enter = span.enter();
				let outcome = self.patch_children(container, p, n)?;
				let recorded = if retains_children(outcome) { Rc::new(Expanded::Fragment(p.clone())) } else { Rc::clone(&next) };
				self.back_refs.unlink(&root);
				self.back_refs.link(root, &recorded);
				outcome
			}

			(p, n) if !differs(p, n) => {
				trace!("Root literal unchanged.");
				Outcome::Patched
			}

			_ => {
				let span = trace_span!("Replacing root", prev = prev.kind().name(), next = next.kind().name());
				let _enter = span.enter();
				let new_root = materialize(&mut self.target, &mut self.back_refs, &next)?;
				self.target.clear_children(container);
				release(&mut self.target, &mut self.back_refs, &prev);
				self.target.append_child(container, &new_root);
				if let Some(mount) = self.mounts.get_mut(container) {
					mount.root = new_root;
				}
				Outcome::Replaced
			}
		};

		debug!(?outcome, "Updated.");
		Ok(outcome)
	}

	/// Clears `container` and forgets its render state.
	///
	/// # Errors
	///
	/// [`Error::MissingRenderState`] if `container` wasn't rendered into.
	#[instrument(skip(self))]
	pub fn unmount(&mut self, container: &T::Node) -> Result<()> {
		let mount = self.mounts.remove(container).ok_or_else(|| missing_render_state(container))?;
		self.forget(&mount.root);
		self.target.clear_children(container);
		Ok(())
	}

	fn forget(&mut self, root: &T::Node) {
		if let Some(vnode) = self.back_refs.vnode_of(root).cloned() {
			release(&mut self.target, &mut self.back_refs, &vnode);
		}
	}

	fn patch_children(&mut self, parent: &T::Node, prev: &[Rc<Expanded>], next: &[Rc<Expanded>]) -> Result<Outcome> {
		match (prev.is_empty(), next.is_empty()) {
			(true, true) => Ok(Outcome::Patched),

			(false, true) => {
				trace!(count = prev.len(), "Clearing children");
				self.target.clear_children(parent);
				for child in prev {
					release(&mut self.target, &mut self.back_refs, child);
				}
				Ok(Outcome::Cleared)
			}

			(true, false) => {
				trace!(count = next.len(), "Inserting children");
				let mut nodes = Vec::with_capacity(next.len());
				for child in next {
					match materialize(&mut self.target, &mut self.back_refs, child) {
						Ok(node) => nodes.push(node),
						Err(error) => {
							for created in &next[..nodes.len()] {
								release(&mut self.target, &mut self.back_refs, created);
							}
							return Err(error);
						}
					}
				}
				for node in &nodes {
					self.target.append_child(parent, node);
				}
				Ok(Outcome::Inserted(nodes.len()))
			}

			(false, false) => {
				if !children_differ(prev, next) {
					return Ok(Outcome::Patched);
				}
				let prev_keys = compute_child_key_map(prev);
				let next_keys = compute_child_key_map(next);
				let retained = next_keys.keys().filter(|key| prev_keys.contains_key(*key)).count();
				warn!(
					prev_len = prev.len(),
					next_len = next.len(),
					retained_keys = retained,
					"Both child lists are non-empty. Pairwise child patching is not supported and keys are not used for reordering, so children were left as they were."
				);
				Ok(Outcome::ChildrenUnpatched)
			}
		}
	}
}

fn retains_children(outcome: Outcome) -> bool {
	matches!(outcome, Outcome::Patched | Outcome::ChildrenUnpatched)
}

fn missing_render_state<N: core::fmt::Debug>(container: &N) -> Error {
	Error::MissingRenderState {
		container: format!("{:?}", container),
	}
}

/// Whether `next` should update `prev`.
///
/// Literals differ iff their values differ. Structured nodes differ iff their tags differ or their props or children
/// differ [shallowly](`props_differ`).
#[must_use]
pub fn differs(prev: &Expanded, next: &Expanded) -> bool {
	match (prev, next) {
		(Expanded::Empty(a), Expanded::Empty(b)) => a != b,
		(Expanded::Text(a), Expanded::Text(b)) => a != b,
		(Expanded::Element(a), Expanded::Element(b)) => a.tag != b.tag || props_differ(&a.props, &b.props) || children_differ(&a.children, &b.children),
		(Expanded::Fragment(a), Expanded::Fragment(b)) => children_differ(a, b),
		_ => true,
	}
}

/// One level of key/[identity](`same_value`) comparison.
#[must_use]
pub fn props_differ(a: &Props, b: &Props) -> bool {
	a.len() != b.len() || a.iter().any(|(key, value)| b.get(key).map_or(true, |other| !same_value(value, other)))
}

/// Children are the same iff they are the same allocation or equal literals.
#[must_use]
pub fn children_differ(a: &[Rc<Expanded>], b: &[Rc<Expanded>]) -> bool {
	a.len() != b.len()
		|| a.iter().zip(b).any(|(a, b)| {
			!(Rc::ptr_eq(a, b)
				|| match (&**a, &**b) {
					(Expanded::Empty(x), Expanded::Empty(y)) => x == y,
					(Expanded::Text(x), Expanded::Text(y)) => x == y,
					_ => false,
				})
		})
}

use std::{cell::Cell, rc::Rc};
use vnode_dom::{
	create_element,
	memory::{NodeId, Op},
	props, Error, Listener, ListenerOptions, MemoryTarget, Outcome, Props, Renderer, Result, Target, Value,
};


/// A [`MemoryTarget`] that refuses to create elements with one tag.
#[derive(Default)]
struct Refusing {
	inner: MemoryTarget,
	refused: Option<&'static str>,
}

impl Target for Refusing {
	type Node = NodeId;

	fn create_element(&mut self, tag: &str) -> Result<NodeId> {
		if self.refused == Some(tag) {
			return Err(Error::Target(format!("<{}> refused", tag)));
		}
		self.inner.create_element(tag)
	}

	fn create_text(&mut self, text: &str) -> Result<NodeId> {
		self.inner.create_text(text)
	}

	fn create_comment(&mut self, data: &str) -> Result<NodeId> {
		self.inner.create_comment(data)
	}

	fn create_fragment(&mut self) -> Result<NodeId> {
		self.inner.create_fragment()
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
		self.inner.set_attribute(node, name, value)
	}

	fn remove_attribute(&mut self, node: &NodeId, name: &str) {
		self.inner.remove_attribute(node, name)
	}

	fn add_listener(&mut self, node: &NodeId, event: &str, listener: &Listener, options: ListenerOptions) {
		self.inner.add_listener(node, event, listener, options)
	}

	fn remove_listener(&mut self, node: &NodeId, event: &str, listener: &Listener, options: ListenerOptions) {
		self.inner.remove_listener(node, event, listener, options)
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
		self.inner.append_child(parent, child)
	}

	fn clear_children(&mut self, node: &NodeId) {
		self.inner.clear_children(node)
	}
}

fn setup() -> (Renderer<Refusing>, NodeId) {
	logging_::init();
	let mut target = Refusing::default();
	let container = target.inner.create_container("body");
	(Renderer::new(target), container)
}

fn bound_listeners(target: &Refusing) -> isize {
	target
		.inner
		.journal()
		.iter()
		.map(|op| match op {
			Op::AddListener { .. } => 1,
			Op::RemoveListener { .. } => -1,
			_ => 0,
		})
		.sum()
}

#[test]
fn failed_insert_attaches_nothing_and_can_be_retried() {
	let (mut renderer, container) = setup();
	let on_click = Listener::new(|_| ());
	let filled = Rc::new(Cell::new(false));
	let source = {
		let filled = filled.clone();
		Value::thunk(move || {
			let children = if filled.get() {
				vec![
					"a".into(),
					create_element("div", props! { "onClick" => on_click.clone() }, vec![create_element("bad", Props::new(), vec![])]),
				]
			} else {
				vec![]
			};
			create_element("ul", Props::new(), children)
		})
	};
	renderer.render(source, &container).unwrap();
	assert_eq!(renderer.back_refs().len(), 1);

	renderer.target_mut().refused = Some("bad");
	filled.set(true);
	assert!(matches!(renderer.update(&container), Err(Error::Target(_))));
	assert_eq!(renderer.target().inner.markup(container), "<body><ul></ul></body>");
	assert_eq!(renderer.back_refs().len(), 1);
	assert_eq!(bound_listeners(renderer.target()), 0);

	renderer.target_mut().refused = None;
	assert_eq!(renderer.update(&container).unwrap(), Outcome::Inserted(2));
	assert_eq!(renderer.target().inner.markup(container), "<body><ul>a<div><bad></bad></div></ul></body>");
	assert_eq!(renderer.back_refs().len(), 4);
	assert_eq!(bound_listeners(renderer.target()), 1);
}

#[test]
fn failed_replacement_keeps_the_old_root() {
	let (mut renderer, container) = setup();
	let replace = Rc::new(Cell::new(false));
	let source = {
		let replace = replace.clone();
		Value::thunk(move || create_element(if replace.get() { "bad" } else { "p" }, Props::new(), vec![]))
	};
	renderer.render(source, &container).unwrap();

	renderer.target_mut().refused = Some("bad");
	replace.set(true);
	assert!(matches!(renderer.update(&container), Err(Error::Target(_))));
	assert_eq!(renderer.target().inner.markup(container), "<body><p></p></body>");
	assert_eq!(renderer.back_refs().len(), 1);

	renderer.target_mut().refused = None;
	assert_eq!(renderer.update(&container).unwrap(), Outcome::Replaced);
	assert_eq!(renderer.target().inner.markup(container), "<body><bad></bad></body>");
}

#[test]
fn failed_render_releases_what_it_created() {
	let (mut renderer, container) = setup();
	renderer.target_mut().refused = Some("bad");

	let tree = create_element(
		"form",
		props! { "onSubmit" => Listener::new(|_| ()) },
		vec!["x".into(), create_element("bad", Props::new(), vec![])],
	);
	assert!(matches!(renderer.render(tree, &container), Err(Error::Target(_))));
	assert!(renderer.back_refs().is_empty());
	assert_eq!(bound_listeners(renderer.target()), 0);
	assert_eq!(renderer.target().inner.markup(container), "<body></body>");
}

use std::{cell::Cell, rc::Rc};
use vnode_dom::{
	create_element, expand, props, value::normalize_children, Component, ElementNode, Error, Expanded, Literal, Placeholder, Props, Thunk,
	Value,
};


fn contains_component(value: &Value) -> bool {
	match value {
		Value::Component(_) | Value::Thunk(_) => true,
		Value::Element(element) => element.children.iter().any(contains_component),
		Value::List(items) => items.iter().any(contains_component),
		_ => false,
	}
}

#[test]
fn component_returning_text_flattens_to_text() {
	logging_::init();
	let shout = Component::new("Shout", |_| "hi".into());
	let expanded = expand(&create_element(&shout, Props::new(), vec![])).unwrap();
	assert_eq!(*expanded, Expanded::Text(Literal::Str("hi".into())));
}

#[test]
fn expansion_is_idempotent_without_components() {
	logging_::init();
	let tree: Value = ElementNode {
		tag: "main".into(),
		props: props! { "id" => "root", "hidden" => false },
		children: vec![
			"text".into(),
			Value::Null,
			Value::Number(0.0),
			Value::from(vec![Value::from("a"), create_element("b", Props::new(), vec!["bold".into()])]),
			create_element("section", props! { "key" => 1 }, vec![]),
		],
	}
	.into();

	let once = expand(&tree).unwrap();
	let twice = expand(&once.to_value()).unwrap();
	assert_eq!(once, twice);

	match &*once {
		Expanded::Element(element) => {
			assert_eq!(element.children.len(), 5);
			assert_eq!(*element.children[1], Expanded::Empty(Placeholder::Null));
			assert_eq!(*element.children[2], Expanded::Text(Literal::Number(0.0)));
			assert!(matches!(&*element.children[3], Expanded::Fragment(members) if members.len() == 2));
		}
		other => panic!("expected element, got {:?}", other),
	}
}

#[test]
fn no_component_survives() {
	logging_::init();
	let item = Component::new("Item", |props| create_element("li", Props::new(), normalize_children(props.get("children"))));
	let list = Component::new("List", move |props| {
		let items = normalize_children(props.get("items"))
			.into_iter()
			.map(|label| create_element(&item, Props::new(), vec![label]))
			.collect::<Vec<_>>();
		create_element("ul", Props::new(), items)
	});

	let tree = create_element(
		"div",
		Props::new(),
		vec![create_element(&list, props! { "items" => vec![Value::from("one"), Value::from("two")] }, vec![])],
	);
	assert!(contains_component(&tree));

	let expanded = expand(&tree).unwrap();
	assert!(!contains_component(&expanded.to_value()));
	assert_eq!(
		vnode_dom::markup::render_to_string(&expanded.to_value()).unwrap(),
		"<div><ul><li>one</li><li>two</li></ul></div>"
	);
}

#[test]
fn resolved_props_use_defaults_and_own_children() {
	logging_::init();
	let seen = Rc::new(Cell::new(0));
	let card = {
		let seen = seen.clone();
		Component::new("Card", move |props| {
			seen.set(seen.get() + 1);
			assert_eq!(props.get("title"), Some(&Value::from("Override")));
			assert_eq!(props.get("tone"), Some(&Value::from("muted")));
			create_element("article", Props::new(), normalize_children(props.get("children")))
		})
		.with_default_props(props! { "title" => "Default", "tone" => "muted", "children" => "default child" })
	};

	let expanded = expand(&create_element(&card, props! { "title" => "Override" }, vec!["own child".into()])).unwrap();
	assert_eq!(seen.get(), 1);
	assert_eq!(expanded.children().len(), 1);
	assert_eq!(*expanded.children()[0], Expanded::Text(Literal::Str("own child".into())));
}

#[test]
fn thunks_are_invoked_on_each_expansion() {
	logging_::init();
	let count = Rc::new(Cell::new(0));
	let view = {
		let count = count.clone();
		Value::thunk(move || {
			count.set(count.get() + 1);
			create_element("span", Props::new(), vec![count.get().into()])
		})
	};

	assert_eq!(*expand(&view).unwrap().children()[0], Expanded::Text(Literal::Number(1.0)));
	assert_eq!(*expand(&view).unwrap().children()[0], Expanded::Text(Literal::Number(2.0)));
}

#[test]
fn component_failure_propagates() {
	logging_::init();
	let broken = Component::try_new("Broken", |_| Err("nope".into()));
	let tree = create_element("div", Props::new(), vec![create_element(&broken, Props::new(), vec![])]);

	match expand(&tree) {
		Err(Error::Component { name, source }) => {
			assert_eq!(name, "Broken");
			assert_eq!(source.to_string(), "nope");
		}
		other => panic!("expected component error, got {:?}", other),
	}

	let thunk = Value::Thunk(Thunk::new(|| Err("late".into())));
	assert!(matches!(expand(&thunk), Err(Error::Component { .. })));
}

#[test]
fn invalid_nodes_fail_fast() {
	logging_::init();
	let tree = create_element("button", Props::new(), vec![Value::listener(|_| ())]);
	assert!(matches!(expand(&tree), Err(Error::InvalidNode { found: "listener" })));
}

use vnode_dom::{child_key, compute_child_key_map, create_element, expand, props, Component, Props, Value};

#[test]
fn explicit_key_wins() {
	let child = create_element("li", props! { "key" => "first" }, vec![]);
	assert_eq!(child_key(&child, 3), "first");

	let numbered = create_element("li", props! { "key" => 12 }, vec![]);
	assert_eq!(child_key(&numbered, 0), "12");
}

#[test]
fn type_name_and_index() {
	let element = create_element("li", props! { "key" => Value::Null }, vec![]);
	assert_eq!(child_key(&element, 2), "li$$2");

	let component = create_element(Component::new("Row", |_| Value::Null), Props::new(), vec![]);
	assert_eq!(child_key(&component, 0), "Row$$0");
}

#[test]
fn category_and_index() {
	assert_eq!(child_key(&Value::from("a"), 1), "text1");
	assert_eq!(child_key(&Value::Null, 4), "empty4");
	assert_eq!(child_key(&Value::from(Vec::<Value>::new()), 0), "fragment0");
	assert_eq!(child_key(&Value::listener(|_| ()), 5), "listener5");
}

#[test]
fn key_map_over_expanded_children() {
	let tree = create_element(
		"ul",
		Props::new(),
		vec![
			create_element("li", props! { "key" => "a" }, vec![]),
			create_element("li", Props::new(), vec![]),
			"tail".into(),
		],
	);
	let expanded = expand(&tree).unwrap();
	let map = compute_child_key_map(expanded.children());

	let mut keys: Vec<_> = map.keys().cloned().collect();
	keys.sort();
	assert_eq!(keys, ["a", "li$$1", "text2"]);
	assert!(std::rc::Rc::ptr_eq(map["a"], &expanded.children()[0]));
}

#![cfg(target_arch = "wasm32")]

use std::{cell::Cell, rc::Rc, sync::Once};
use vnode_dom::{create_element, props, Listener, Outcome, Props, Renderer, Value, WebNode, WebTarget};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn setup() -> (Renderer<WebTarget>, WebNode, web_sys::Element) {
	static LOGGING: Once = Once::new();
	LOGGING.call_once(tracing_wasm::set_as_global_default);

	let document = window().unwrap().document().unwrap();
	let host = document.create_element("div").unwrap();
	document.body().unwrap().append_child(&host).unwrap();

	let mut target = WebTarget::new(document);
	let container = target.adopt(host.clone());
	(Renderer::new(target), container, host)
}

#[wasm_bindgen_test]
fn renders_element_tree() {
	let (mut renderer, container, host) = setup();
	renderer
		.render(
			create_element("p", props! { "class" => "lead" }, vec!["Hello ".into(), Value::Null, 2.into()]),
			&container,
		)
		.unwrap();

	assert_eq!(host.inner_html(), r#"<p class="lead">Hello <!--null-->2</p>"#);
	let p = host.first_child().unwrap();
	let vnode = renderer.root_vnode(&container).unwrap().clone();
	assert_eq!(renderer.node_of(&vnode).unwrap().node(), &p);
}

#[wasm_bindgen_test]
fn fragment_members_land_in_container() {
	let (mut renderer, container, host) = setup();
	renderer
		.render(Value::from(vec![Value::from("a"), create_element("hr", Props::new(), vec![])]), &container)
		.unwrap();
	assert_eq!(host.inner_html(), "a<hr>");
}

#[wasm_bindgen_test]
fn click_listener_fires_and_is_collected() {
	let (mut renderer, container, host) = setup();
	let clicks = Rc::new(Cell::new(0));
	let bound = Rc::new(Cell::new(true));
	let source = {
		let clicks = clicks.clone();
		let bound = bound.clone();
		let on_click = Listener::new(move |_| clicks.set(clicks.get() + 1));
		Value::thunk(move || {
			let props = if bound.get() { props! { "onClick" => on_click.clone() } } else { Props::new() };
			create_element("button", props, vec![])
		})
	};
	renderer.render(source, &container).unwrap();

	let button = host.first_element_child().unwrap().dyn_into::<HtmlElement>().unwrap();
	button.click();
	assert_eq!(clicks.get(), 1);

	assert_eq!(renderer.update(&container).unwrap(), Outcome::Patched);
	assert_eq!(renderer.target_mut().collect_listeners(), 0);
	button.click();
	assert_eq!(clicks.get(), 2);

	bound.set(false);
	assert_eq!(renderer.update(&container).unwrap(), Outcome::Patched);
	assert_eq!(renderer.target_mut().collect_listeners(), 1);
	button.click();
	assert_eq!(clicks.get(), 2);
}

#[wasm_bindgen_test]
fn unmounted_listeners_are_collected() {
	let (mut renderer, container, host) = setup();
	let on_click = Listener::new(|_| ());
	let tree = create_element(
		"ul",
		Props::new(),
		vec![
			create_element("button", props! { "onClick" => on_click.clone() }, vec![]),
			create_element("button", props! { "onClick" => on_click }, vec![]),
		],
	);
	renderer.render(tree, &container).unwrap();
	assert_eq!(renderer.target_mut().collect_listeners(), 0);

	renderer.unmount(&container).unwrap();
	assert_eq!(host.inner_html(), "");
	assert_eq!(renderer.target_mut().collect_listeners(), 1);
}

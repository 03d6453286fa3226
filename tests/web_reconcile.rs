#![cfg(target_arch = "wasm32")]

use tenfoot_dom::{
	reconcile,
	template::{Element, Node},
	tree::LiveTree,
	web::{DocumentFocus, WebTree},
	ReconcileOptions,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlBodyElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn setup() -> (WebTree, web_sys::Node) {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}

	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let container = document.create_element("div").unwrap();
	body.append_child(&container).unwrap();
	(WebTree::new(document), container.into())
}

fn template(content: Vec<Node>) -> Node {
	Element::new("div").children(content).into()
}

fn li(id: &str) -> Node {
	Element::new("li").attribute("id", id).attribute("tabindex", "0").text(id).into()
}

#[wasm_bindgen_test]
fn create_update_remove() {
	let (mut tree, container) = setup();

	let first = template(vec![Element::new("ul").attribute("class", "rail").child(li("web-a")).child(li("web-b")).into()]);
	reconcile(&first, &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());
	let document = tree.document().clone();
	let a = document.get_element_by_id("web-a").unwrap();
	assert_eq!(a.text_content().as_deref(), Some("web-a"));

	let second = template(vec![Element::new("ul").attribute("class", "rail wide").child(li("web-a")).into()]);
	reconcile(&second, &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());
	assert!(document.get_element_by_id("web-b").is_none());
	assert_eq!(document.get_element_by_id("web-a").unwrap(), a);
	assert_eq!(container.first_child().unwrap().dyn_into::<web_sys::Element>().unwrap().get_attribute("class").as_deref(), Some("rail wide"));

	reconcile(&template(vec![]), &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());
	assert!(container.first_child().is_none());
}

#[wasm_bindgen_test]
fn out_of_range_children_are_absent() {
	let (mut tree, container) = setup();
	reconcile(&template(vec![li("range-a")]), &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());

	assert_eq!(tree.child_count(&container), 1);
	assert!(tree.child_at(&container, 0).is_some());
	assert!(tree.child_at(&container, 1).is_none());
	assert!(tree.child_at(&container, usize::MAX).is_none());
}

#[wasm_bindgen_test]
fn focus_survives_move() {
	let (mut tree, container) = setup();
	reconcile(&template(vec![li("focus-a"), li("focus-b")]), &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());
	let b: HtmlElement = tree.document().get_element_by_id("focus-b").unwrap().dyn_into().unwrap();
	b.focus().unwrap();

	reconcile(&template(vec![li("focus-b"), li("focus-a")]), &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());

	let active = tree.document().active_element().unwrap();
	assert_eq!(active.id(), "focus-b");
	assert_eq!(container.first_child().unwrap().dyn_into::<web_sys::Element>().unwrap().id(), "focus-b");
}

#[wasm_bindgen_test]
fn typed_value_survives() {
	let (mut tree, container) = setup();
	reconcile(&template(vec![Element::new("input").attribute("id", "typed").attribute("value", "server").into()]), &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());
	let input: web_sys::HtmlInputElement = tree.document().get_element_by_id("typed").unwrap().dyn_into().unwrap();
	input.set_value("user");

	reconcile(&template(vec![Element::new("input").attribute("id", "typed").attribute("value", "update").into()]), &container, &mut tree, &mut DocumentFocus, ReconcileOptions::default());

	assert_eq!(input.value(), "user");
}

#[wasm_bindgen_test]
fn no_script() {
	let (mut tree, container) = setup();
	reconcile(
		&template(vec![Element::new("div").attribute("class", "x").child(Element::new("script").text("window.pwned = true")).into()]),
		&container,
		&mut tree,
		&mut DocumentFocus,
		ReconcileOptions::default(),
	);

	let container: web_sys::Element = container.dyn_into().unwrap();
	assert!(container.query_selector("script").unwrap().is_none());
}

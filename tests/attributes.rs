use tenfoot_dom::{
	attributes::{apply_default_attributes, property_kind, reconcile_attributes, PropertyKind},
	diff::clone_node,
	memory::{MemoryFocus, MemoryTree, NodeId},
	reconcile,
	template::{Element, Node},
	tree::{LiveTree, PropertyValue},
	ReconcileOptions,
};

use memory_fixture_::{body, init_logging, mount, snapshot};

fn only_child(tree: &MemoryTree, root: NodeId) -> NodeId {
	assert_eq!(tree.children(root).len(), 1);
	tree.children(root)[0]
}

#[test]
fn typed_input_value_survives() {
	let (mut tree, root) = mount(vec![Element::new("input").attribute("type", "text").attribute("value", "server").into()]);
	let input = only_child(&tree, root);
	tree.set_property(&input, "value", PropertyValue::Text("typed".to_owned())).unwrap();

	reconcile(&body(vec![Element::new("input").attribute("type", "search").attribute("value", "updated").into()]), &root, &mut tree, &mut MemoryFocus, ReconcileOptions::default());

	assert_eq!(tree.attribute(&input, "type").as_deref(), Some("search"));
	assert_eq!(tree.attribute(&input, "value").as_deref(), Some("server"));
	assert_eq!(tree.property(input, "value"), Some(&PropertyValue::Text("typed".to_owned())));
}

#[test]
fn delegated_form_state_needs_a_hook() {
	let (mut tree, root) = mount(vec![Element::new("input").attribute("value", "server").into()]);
	let input = only_child(&tree, root);
	tree.set_property(&input, "value", PropertyValue::Text("typed".to_owned())).unwrap();
	let template = body(vec![Element::new("input").attribute(":value", "update").into()]);

	reconcile(&template, &root, &mut tree, &mut MemoryFocus, ReconcileOptions::default());

	assert_eq!(tree.attribute(&input, "value").as_deref(), Some("server"));
	assert_eq!(tree.property(input, "value"), Some(&PropertyValue::Text("typed".to_owned())));

	let mut calls = Vec::new();
	let mut hook = |_: &mut MemoryTree, node: &NodeId, name: &str, value: &str| calls.push((*node, name.to_owned(), value.to_owned()));
	reconcile(&template, &root, &mut tree, &mut MemoryFocus, ReconcileOptions { hook: Some(&mut hook), ..ReconcileOptions::default() });

	assert_eq!(calls, vec![(input, "value".to_owned(), "update".to_owned())]);
	assert_eq!(tree.property(input, "value"), Some(&PropertyValue::Text("typed".to_owned())));
}

#[test]
fn form_state_is_not_removed_either() {
	let (mut tree, root) = mount(vec![Element::new("option").attribute("selected", "").attribute("label", "One").into()]);
	let option = only_child(&tree, root);

	reconcile(&body(vec![Element::new("option").into()]), &root, &mut tree, &mut MemoryFocus, ReconcileOptions::default());

	assert_eq!(tree.attribute_names(&option), vec!["selected".to_owned()]);
}

#[test]
fn fresh_controls_get_properties() {
	let (mut tree, root) = mount(vec![]);

	reconcile(
		&body(vec![
			Element::new("input").attribute("value", "initial").attribute("checked", "").into(),
			Element::new("textarea").attribute("value", "notes").into(),
		]),
		&root,
		&mut tree,
		&mut MemoryFocus,
		ReconcileOptions::default(),
	);

	let input = tree.children(root)[0];
	assert_eq!(tree.property(input, "value"), Some(&PropertyValue::Text("initial".to_owned())));
	assert_eq!(tree.property(input, "checked"), Some(&PropertyValue::Bool(true)));
	let textarea = tree.children(root)[1];
	assert_eq!(tree.property(textarea, "value"), Some(&PropertyValue::Text("notes".to_owned())));
}

#[test]
fn non_control_values_are_synchronized() {
	let (mut tree, root) = mount(vec![Element::new("button").attribute("value", "old").into()]);
	let button = only_child(&tree, root);

	reconcile(&body(vec![Element::new("button").attribute("value", "new").into()]), &root, &mut tree, &mut MemoryFocus, ReconcileOptions::default());

	assert_eq!(tree.attribute(&button, "value").as_deref(), Some("new"));
	assert_eq!(tree.property(button, "value"), Some(&PropertyValue::Text("new".to_owned())));
}

#[test]
fn falsy_booleans_are_removed() {
	let (mut tree, root) = mount(vec![Element::new("button").attribute("disabled", "").into()]);
	let button = only_child(&tree, root);

	reconcile(
		&body(vec![Element::new("button").attribute("disabled", "false").into(), Element::new("div").attribute("hidden", "null").into()]),
		&root,
		&mut tree,
		&mut MemoryFocus,
		ReconcileOptions::default(),
	);

	assert_eq!(tree.attribute(&button, "disabled"), None);
	let div = tree.children(root)[1];
	assert_eq!(tree.attribute(&div, "hidden"), None);
}

#[test]
fn falsy_literal_is_kept_on_ordinary_attributes() {
	let (mut tree, root) = mount(vec![]);

	reconcile(&body(vec![Element::new("div").attribute("data-visible", "false").into()]), &root, &mut tree, &mut MemoryFocus, ReconcileOptions::default());

	let div = only_child(&tree, root);
	assert_eq!(tree.attribute(&div, "data-visible").as_deref(), Some("false"));
}

#[test]
fn internal_attributes_are_never_rendered() {
	let (mut tree, root) = mount(vec![Element::new("div").into()]);
	let template = body(vec![
		Element::new("div").attribute("__key", "row-1").attribute("class", "row").into(),
		Element::new("span").attribute("__onclick", "select()").into(),
	]);

	reconcile(&template, &root, &mut tree, &mut MemoryFocus, ReconcileOptions::default());

	assert_eq!(
		snapshot(&tree, root),
		vec![Node::from(Element::new("div").attribute("class", "row")), Node::from(Element::new("span"))]
	);
}

#[test]
fn delegated_attributes_go_to_the_hook() {
	let (mut tree, root) = mount(vec![Element::new("button").attribute("id", "ok").into()]);
	let existing = only_child(&tree, root);
	let template = body(vec![
		Element::new("button").attribute("id", "ok").attribute(":onclick", "confirm").into(),
		Element::new("a").attribute(":href", "javascript:void(0)").attribute(":disabled", "false").into(),
	]);

	let mut calls = Vec::new();
	let mut hook = |_: &mut MemoryTree, node: &NodeId, name: &str, value: &str| calls.push((*node, name.to_owned(), value.to_owned()));
	reconcile(&template, &root, &mut tree, &mut MemoryFocus, ReconcileOptions { hook: Some(&mut hook), ..ReconcileOptions::default() });

	let link = tree.children(root)[1];
	assert_eq!(
		calls,
		vec![(existing, "onclick".to_owned(), "confirm".to_owned()), (link, "href".to_owned(), "javascript:void(0)".to_owned())]
	);
	assert_eq!(tree.attribute(&existing, "onclick"), None);
	assert!(tree.attribute_names(&link).is_empty());
}

#[test]
fn delegated_attributes_without_hook_are_written_if_safe() {
	let (mut tree, root) = mount(vec![]);

	reconcile(
		&body(vec![Element::new("div").attribute(":title", "Movies").attribute(":onclick", "play()").into()]),
		&root,
		&mut tree,
		&mut MemoryFocus,
		ReconcileOptions::default(),
	);

	let div = only_child(&tree, root);
	assert_eq!(tree.attribute_names(&div), vec!["title".to_owned()]);
}

#[test]
fn unsafe_attributes_are_dropped() {
	let (mut tree, root) = mount(vec![Element::new("a").attribute("href", "/home").into()]);
	let link = only_child(&tree, root);

	reconcile(
		&body(vec![
			Element::new("a").attribute("href", " Java\tScript:alert(1)").attribute("onfocus", "steal()").into(),
			Element::new("iframe").attribute("src", "data:text/html,<script>alert(1)</script>").into(),
		]),
		&root,
		&mut tree,
		&mut MemoryFocus,
		ReconcileOptions::default(),
	);

	assert_eq!(tree.attribute(&link, "href").as_deref(), Some("/home"));
	assert_eq!(tree.attribute(&link, "onfocus"), None);
	let iframe = tree.children(root)[1];
	assert_eq!(tree.attribute(&iframe, "src"), None);
}

#[test]
fn inline_handlers_can_be_allowed() {
	let (mut tree, root) = mount(vec![]);

	reconcile(
		&body(vec![Element::new("div").attribute("onclick", "play()").into()]),
		&root,
		&mut tree,
		&mut MemoryFocus,
		ReconcileOptions {
			allow_inline_handlers: true,
			..ReconcileOptions::default()
		},
	);

	let div = only_child(&tree, root);
	assert_eq!(tree.attribute(&div, "onclick").as_deref(), Some("play()"));
}

#[test]
fn direct_attribute_reconciliation() {
	init_logging();
	let mut tree = MemoryTree::new();
	let existing = tree.build(&Element::new("div").attribute("class", "a").attribute("tabindex", "0").into());

	reconcile_attributes(&Element::new("div").attribute("class", "b"), &mut tree, &existing, None, false);

	assert_eq!(tree.attribute_names(&existing), vec!["class".to_owned()]);
	assert_eq!(tree.attribute(&existing, "class").as_deref(), Some("b"));
}

#[test]
fn default_attributes_reach_descendants() {
	init_logging();
	let mut tree = MemoryTree::new();
	let template = Node::from(Element::new("ul").attribute("role", "list").child(Element::new("li").attribute("__index", "0").attribute("class", "first")));

	let clone = clone_node(&template, &mut tree).unwrap();
	assert!(tree.attribute_names(&clone).is_empty());
	apply_default_attributes(&template, &mut tree, &clone, None, false);

	assert_eq!(tree.attribute(&clone, "role").as_deref(), Some("list"));
	let li = tree.children(clone)[0];
	assert_eq!(tree.attribute_names(&li), vec!["class".to_owned()]);
}

#[test]
fn property_table() {
	assert_eq!(property_kind("INPUT", "checked"), Some(PropertyKind::Bool));
	assert_eq!(property_kind("select", "value"), Some(PropertyKind::Text));
	assert_eq!(property_kind("div", "value"), None);
	assert_eq!(property_kind("input", "placeholder"), None);
}

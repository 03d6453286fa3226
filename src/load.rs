//! Reads live trees back into [template](`crate::template`) form, e.g. to snapshot or hydrate rendered content.

use crate::{
	template::{Attribute, Element, Node},
	tree::{LiveTree, NodeKind},
};

pub fn load_child_nodes<T: LiveTree + ?Sized>(tree: &T, node: &T::Handle) -> Vec<Node> {
	(0..tree.child_count(node)).filter_map(|i| tree.child_at(node, i)).filter_map(|child| load_node(tree, &child)).collect()
}

/// Returns `None` for fragments and unrecognised node types.
pub fn load_node<T: LiveTree + ?Sized>(tree: &T, node: &T::Handle) -> Option<Node> {
	match tree.kind(node) {
		NodeKind::Element => load_element(tree, node).map(Node::Element),
		NodeKind::Text => Some(Node::Text(tree.text_content(node))),
		NodeKind::Comment => Some(Node::Comment(tree.text_content(node))),
		NodeKind::Fragment | NodeKind::Other => None,
	}
}

pub fn load_element<T: LiveTree + ?Sized>(tree: &T, element: &T::Handle) -> Option<Element> {
	Some(Element {
		name: tree.tag_name(element)?.into_owned(),
		attributes: load_attributes(tree, element),
		children: load_child_nodes(tree, element),
	})
}

pub fn load_attributes<T: LiveTree + ?Sized>(tree: &T, element: &T::Handle) -> Vec<Attribute> {
	tree.attribute_names(element)
		.into_iter()
		.filter_map(|name| {
			let value = tree.attribute(element, &name)?;
			Some(Attribute { name, value })
		})
		.collect()
}

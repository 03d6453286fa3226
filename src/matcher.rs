//! Identity heuristic deciding whether a template node may be reconciled into a live node in place.

use crate::{
	attributes::real_name,
	template::{Element, Node},
	tree::{LiveTree, NodeKind},
};

/// Elements whose identity includes their `src`.
pub const MEDIA_ELEMENTS: &[&str] = &["img", "video", "audio", "source", "iframe", "embed"];

#[must_use]
pub fn template_kind(node: &Node) -> NodeKind {
	match node {
		Node::Element(_) => NodeKind::Element,
		Node::Text(_) => NodeKind::Text,
		Node::Comment(_) => NodeKind::Comment,
	}
}

/// Looks up a discriminating attribute case-insensitively, including its delegated form.
fn discriminator<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
	element
		.attributes
		.iter()
		.find(|attribute| real_name(&attribute.name).0.eq_ignore_ascii_case(name))
		.map(|attribute| attribute.value.as_str())
}

fn is_media(name: &str) -> bool {
	MEDIA_ELEMENTS.iter().any(|media| media.eq_ignore_ascii_case(name))
}

/// Returns `true` if `template` and `existing` are *not* interchangeable.
///
/// Content is never compared. Apart from the node kind, each discriminator
/// (tag name, `id`, media `src`) only counts if both sides define it.
pub fn is_different_node<T: LiveTree + ?Sized>(template: &Node, tree: &T, existing: &T::Handle) -> bool {
	if template_kind(template) != tree.kind(existing) {
		return true;
	}

	let element = match template {
		Node::Element(element) => element,
		Node::Text(_) | Node::Comment(_) => return false,
	};
	let existing_name = match tree.tag_name(existing) {
		Some(name) => name,
		None => return false,
	};

	if !element.name.eq_ignore_ascii_case(&existing_name) {
		return true;
	}

	if let (Some(id), Some(existing_id)) = (discriminator(element, "id"), tree.attribute(existing, "id")) {
		if id != existing_id {
			return true;
		}
	}

	if is_media(&element.name) && is_media(&existing_name) {
		if let (Some(src), Some(existing_src)) = (discriminator(element, "src"), tree.attribute(existing, "src")) {
			if src != existing_src {
				return true;
			}
		}
	}

	false
}

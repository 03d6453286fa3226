//! [`LiveTree`] over the browser DOM.

use crate::tree::{FocusRegistry, LiveTree, NodeKind, PropertyValue};
use core::convert::TryFrom;
use std::borrow::Cow;
use wasm_bindgen::{JsCast, JsValue};

/// The DOM of one [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).
///
/// Handles are plain [`web_sys::Node`]s, so any element of the document can serve as reconciliation root.
#[derive(Debug, Clone)]
pub struct WebTree {
	document: web_sys::Document,
}

impl WebTree {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}

fn not_an_element(node: &web_sys::Node) -> JsValue {
	JsValue::from_str(&format!("Expected an element but found node type {}", node.node_type()))
}

impl LiveTree for WebTree {
	type Handle = web_sys::Node;
	type Error = JsValue;

	fn kind(&self, node: &web_sys::Node) -> NodeKind {
		match node.node_type() {
			web_sys::Node::ELEMENT_NODE => NodeKind::Element,
			web_sys::Node::TEXT_NODE => NodeKind::Text,
			web_sys::Node::COMMENT_NODE => NodeKind::Comment,
			web_sys::Node::DOCUMENT_FRAGMENT_NODE => NodeKind::Fragment,
			_ => NodeKind::Other,
		}
	}

	fn tag_name(&self, node: &web_sys::Node) -> Option<Cow<'_, str>> {
		// `local_name` rather than `tag_name`, since the latter is upper-cased for HTML elements.
		node.dyn_ref::<web_sys::Element>().map(|element| Cow::Owned(element.local_name()))
	}

	fn attribute(&self, node: &web_sys::Node, name: &str) -> Option<String> {
		node.dyn_ref::<web_sys::Element>()?.get_attribute(name)
	}

	fn attribute_names(&self, node: &web_sys::Node) -> Vec<String> {
		match node.dyn_ref::<web_sys::Element>() {
			Some(element) => element.get_attribute_names().iter().filter_map(|name| name.as_string()).collect(),
			None => Vec::new(),
		}
	}

	fn set_attribute(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<(), JsValue> {
		node.dyn_ref::<web_sys::Element>().ok_or_else(|| not_an_element(node))?.set_attribute(name, value)
	}

	fn remove_attribute(&mut self, node: &web_sys::Node, name: &str) -> Result<(), JsValue> {
		node.dyn_ref::<web_sys::Element>().ok_or_else(|| not_an_element(node))?.remove_attribute(name)
	}

	fn set_property(&mut self, node: &web_sys::Node, name: &str, value: PropertyValue) -> Result<(), JsValue> {
		let value = match value {
			PropertyValue::Text(text) => JsValue::from_str(&text),
			PropertyValue::Bool(flag) => JsValue::from_bool(flag),
		};
		if js_sys::Reflect::set(node, &JsValue::from_str(name), &value)? {
			Ok(())
		} else {
			Err(JsValue::from_str(&format!("Property {:?} is read-only", name)))
		}
	}

	fn child_count(&self, node: &web_sys::Node) -> usize {
		node.child_nodes().length() as usize
	}

	fn child_at(&self, node: &web_sys::Node, index: usize) -> Option<web_sys::Node> {
		node.child_nodes().get(u32::try_from(index).ok()?)
	}

	fn text_content(&self, node: &web_sys::Node) -> String {
		node.text_content().unwrap_or_default()
	}

	fn set_text_content(&mut self, node: &web_sys::Node, text: &str) -> Result<(), JsValue> {
		node.set_text_content(Some(text));
		Ok(())
	}

	fn create_element(&mut self, name: &str) -> Result<web_sys::Node, JsValue> {
		Ok(self.document.create_element(name)?.into())
	}

	fn create_text(&mut self, text: &str) -> web_sys::Node {
		self.document.create_text_node(text).into()
	}

	fn create_comment(&mut self, comment: &str) -> web_sys::Node {
		self.document.create_comment(comment).into()
	}

	fn create_fragment(&mut self) -> web_sys::Node {
		self.document.create_document_fragment().into()
	}

	fn insert_before(&mut self, parent: &web_sys::Node, node: &web_sys::Node, reference: Option<&web_sys::Node>) -> Result<(), JsValue> {
		parent.insert_before(node, reference).map(drop)
	}

	fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), JsValue> {
		parent.remove_child(child).map(drop)
	}

	fn clear_children(&mut self, node: &web_sys::Node) -> Result<(), JsValue> {
		while let Some(child) = node.last_child() {
			node.remove_child(&child)?;
		}
		Ok(())
	}
}

/// Focus as tracked by the document (***document.activeElement***).
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFocus;
impl FocusRegistry<WebTree> for DocumentFocus {
	fn focused(&self, tree: &WebTree) -> Option<web_sys::Node> {
		tree.document.active_element().map(Into::into)
	}

	fn focus(&mut self, _: &mut WebTree, node: &web_sys::Node) -> Result<(), JsValue> {
		match node.dyn_ref::<web_sys::HtmlElement>() {
			Some(element) => element.focus(),
			None => Err(not_an_element(node)),
		}
	}
}

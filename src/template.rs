//! The disposable desired-state tree that is rendered fresh for each pass.
//!
//! Templates are plain owned values. The reconciler only ever reads them.

use core::fmt::{self, Display, Formatter};

/// A single template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Element(Element),
	Text(String),
	Comment(String),
}

/// A template element: tag name, ordered attribute list and child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	pub name: String,
	pub attributes: Vec<Attribute>,
	pub children: Vec<Node>,
}

/// One entry of an [`Element`]'s attribute association list.
///
/// Names may carry the [`DELEGATED_PREFIX`](`crate::attributes::DELEGATED_PREFIX`)
/// or the [`INTERNAL_PREFIX`](`crate::attributes::INTERNAL_PREFIX`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: String,
	pub value: String,
}

impl Node {
	#[must_use]
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	#[must_use]
	pub fn comment(comment: impl Into<String>) -> Self {
		Self::Comment(comment.into())
	}

	#[must_use]
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(element) => Some(element),
			Node::Text(_) | Node::Comment(_) => None,
		}
	}

	/// Child nodes. Always empty for text and comments.
	#[must_use]
	pub fn children(&self) -> &[Node] {
		match self {
			Node::Element(element) => &element.children,
			Node::Text(_) | Node::Comment(_) => &[],
		}
	}

	/// Whether any child is an element, as opposed to only text and comments.
	#[must_use]
	pub fn has_element_children(&self) -> bool {
		self.children().iter().any(|child| matches!(child, Node::Element(_)))
	}

	/// Mirrors the DOM's ***textContent***: element text is the concatenated text of all descendant text nodes.
	#[must_use]
	pub fn text_content(&self) -> String {
		match self {
			Node::Element(element) => {
				let mut text = String::new();
				element.collect_text(&mut text);
				text
			}
			Node::Text(text) | Node::Comment(text) => text.clone(),
		}
	}
}

impl Element {
	#[must_use]
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			attributes: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Appends an attribute, replacing the value of an earlier one with the same name.
	#[must_use]
	pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let (name, value) = (name.into(), value.into());
		match self.attributes.iter_mut().find(|attribute| attribute.name == name) {
			Some(existing) => existing.value = value,
			None => self.attributes.push(Attribute { name, value }),
		}
		self
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
		self.children.extend(children);
		self
	}

	/// Shorthand for a single text child.
	#[must_use]
	pub fn text(self, text: impl Into<String>) -> Self {
		self.child(Node::Text(text.into()))
	}

	#[must_use]
	pub fn get_attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|attribute| attribute.name == name).map(|attribute| attribute.value.as_str())
	}

	/// A hyphenated tag name marks an opaque component boundary.
	/// Only the position of such an element is reconciled, never its attributes or content.
	#[must_use]
	pub fn is_component(&self) -> bool {
		is_component_name(&self.name)
	}

	fn collect_text(&self, text: &mut String) {
		for child in &self.children {
			match child {
				Node::Element(element) => element.collect_text(text),
				Node::Text(t) => text.push_str(t),
				Node::Comment(_) => (),
			}
		}
	}
}

#[must_use]
pub fn is_component_name(name: &str) -> bool {
	name.contains('-')
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Node::Text(text.to_owned())
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Node::Text(text)
	}
}

/// Serializes roughly as HTML, without escaping. Intended for diagnostics only.
impl Display for Node {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Node::Element(element) => {
				write!(f, "<{}", element.name)?;
				for Attribute { name, value } in &element.attributes {
					write!(f, " {}={:?}", name, value)?;
				}
				f.write_str(">")?;
				for child in &element.children {
					child.fmt(f)?;
				}
				write!(f, "</{}>", element.name)
			}
			Node::Text(text) => f.write_str(text),
			Node::Comment(comment) => write!(f, "<!--{}-->", comment),
		}
	}
}

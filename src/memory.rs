//! A headless [`LiveTree`], for off-screen rendering and native tests.
//!
//! Nodes live in an arena and are never freed, so a [`NodeId`] stays valid after its node is removed from the tree,
//! much like a detached DOM node stays valid while referenced.

use crate::{
	template,
	tree::{FocusRegistry, LiveTree, NodeKind, PropertyValue},
};
use hashbrown::HashMap;
use std::borrow::Cow;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
	#[error("{0:?} does not exist in this tree")]
	Stale(NodeId),
	#[error("{0:?} is not an element")]
	NotAnElement(NodeId),
	#[error("{child:?} is not a child of {parent:?}")]
	NotAChild { parent: NodeId, child: NodeId },
	#[error("cannot insert {node:?} into {parent:?}")]
	HierarchyRequest { parent: NodeId, node: NodeId },
}

#[derive(Debug, Clone)]
enum Data {
	Element { name: String, attributes: Vec<(String, String)> },
	Text(String),
	Comment(String),
	Fragment,
}

#[derive(Debug, Clone)]
struct Slot {
	data: Data,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	properties: HashMap<String, PropertyValue>,
}

/// An arena-backed DOM stand-in.
///
/// Relocating or detaching the focused node (or one of its ancestors) drops focus, as it does in browsers.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
	slots: Vec<Slot>,
	focused: Option<NodeId>,
	mutations: usize,
}

impl MemoryTree {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a detached copy of `node`, writing all attributes literally.
	///
	/// Unlike [`clone_node`](`crate::diff::clone_node`), nothing is filtered. Use this to seed a tree with existing content.
	pub fn build(&mut self, node: &template::Node) -> NodeId {
		let id = match node {
			template::Node::Text(text) => self.push(Data::Text(text.clone())),
			template::Node::Comment(comment) => self.push(Data::Comment(comment.clone())),
			template::Node::Element(element) => self.push(Data::Element {
				name: element.name.clone(),
				attributes: element.attributes.iter().map(|attribute| (attribute.name.clone(), attribute.value.clone())).collect(),
			}),
		};
		for child in node.children() {
			let child = self.build(child);
			self.slots[child.0].parent = Some(id);
			self.slots[id.0].children.push(child);
		}
		id
	}

	/// The number of mutations applied to the tree so far. Creating detached nodes doesn't count.
	#[must_use]
	pub fn mutation_count(&self) -> usize {
		self.mutations
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.slots.get(node.0).and_then(|slot| slot.parent)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.slots.get(node.0).map_or(&[], |slot| &slot.children)
	}

	#[must_use]
	pub fn property(&self, node: NodeId, name: &str) -> Option<&PropertyValue> {
		self.slots.get(node.0).and_then(|slot| slot.properties.get(name))
	}

	#[must_use]
	pub fn focused(&self) -> Option<NodeId> {
		self.focused
	}

	/// Focuses `node`, which must be an element.
	pub fn focus(&mut self, node: NodeId) -> Result<(), TreeError> {
		match self.slot(node)?.data {
			Data::Element { .. } => {
				self.focused = Some(node);
				self.mutations += 1;
				Ok(())
			}
			_ => Err(TreeError::NotAnElement(node)),
		}
	}

	/// Depth-first search for an element with the given `id` attribute.
	#[must_use]
	pub fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
		let mut stack = vec![root];
		while let Some(node) = stack.pop() {
			if self.attribute(&node, "id").as_deref() == Some(id) {
				return Some(node);
			}
			stack.extend(self.children(node).iter().rev());
		}
		None
	}

	/// All descendants of `root` (excluding `root`) whose tag name matches `name`, in document order.
	#[must_use]
	pub fn elements_by_tag_name(&self, root: NodeId, name: &str) -> Vec<NodeId> {
		let mut found = Vec::new();
		let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
		while let Some(node) = stack.pop() {
			if self.tag_name(&node).map_or(false, |tag| tag.eq_ignore_ascii_case(name)) {
				found.push(node);
			}
			stack.extend(self.children(node).iter().rev());
		}
		found
	}

	fn push(&mut self, data: Data) -> NodeId {
		self.slots.push(Slot {
			data,
			parent: None,
			children: Vec::new(),
			properties: HashMap::new(),
		});
		NodeId(self.slots.len() - 1)
	}

	fn slot(&self, node: NodeId) -> Result<&Slot, TreeError> {
		self.slots.get(node.0).ok_or(TreeError::Stale(node))
	}

	fn slot_mut(&mut self, node: NodeId) -> Result<&mut Slot, TreeError> {
		self.slots.get_mut(node.0).ok_or(TreeError::Stale(node))
	}

	fn attributes_mut(&mut self, node: NodeId) -> Result<&mut Vec<(String, String)>, TreeError> {
		match &mut self.slot_mut(node)?.data {
			Data::Element { attributes, .. } => Ok(attributes),
			_ => Err(TreeError::NotAnElement(node)),
		}
	}

	fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
		loop {
			if node == ancestor {
				return true;
			}
			match self.parent(node) {
				Some(parent) => node = parent,
				None => return false,
			}
		}
	}

	/// Unlinks `node` from its parent, dropping focus if it is inside.
	fn detach(&mut self, node: NodeId) {
		if let Some(focused) = self.focused {
			if self.is_inclusive_ancestor(node, focused) {
				trace!(?focused, "Detaching focused node. Focus is lost.");
				self.focused = None;
			}
		}
		if let Some(parent) = self.slots[node.0].parent.take() {
			self.slots[parent.0].children.retain(|&child| child != node);
		}
	}

	fn insert_one(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) -> Result<(), TreeError> {
		if self.is_inclusive_ancestor(node, parent) {
			return Err(TreeError::HierarchyRequest { parent, node });
		}
		self.detach(node);
		let index = match reference {
			Some(reference) => self.slots[parent.0]
				.children
				.iter()
				.position(|&child| child == reference)
				.ok_or(TreeError::NotAChild { parent, child: reference })?,
			None => self.slots[parent.0].children.len(),
		};
		self.slots[parent.0].children.insert(index, node);
		self.slots[node.0].parent = Some(parent);
		Ok(())
	}
}

impl LiveTree for MemoryTree {
	type Handle = NodeId;
	type Error = TreeError;

	fn kind(&self, node: &NodeId) -> NodeKind {
		match self.slots.get(node.0).map(|slot| &slot.data) {
			Some(Data::Element { .. }) => NodeKind::Element,
			Some(Data::Text(_)) => NodeKind::Text,
			Some(Data::Comment(_)) => NodeKind::Comment,
			Some(Data::Fragment) => NodeKind::Fragment,
			None => NodeKind::Other,
		}
	}

	fn tag_name(&self, node: &NodeId) -> Option<Cow<'_, str>> {
		match &self.slots.get(node.0)?.data {
			Data::Element { name, .. } => Some(Cow::Borrowed(name)),
			_ => None,
		}
	}

	fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
		match &self.slots.get(node.0)?.data {
			Data::Element { attributes, .. } => attributes.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, value)| value.clone()),
			_ => None,
		}
	}

	fn attribute_names(&self, node: &NodeId) -> Vec<String> {
		match self.slots.get(node.0).map(|slot| &slot.data) {
			Some(Data::Element { attributes, .. }) => attributes.iter().map(|(name, _)| name.clone()).collect(),
			_ => Vec::new(),
		}
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), TreeError> {
		let attributes = self.attributes_mut(*node)?;
		match attributes.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
			Some((_, existing)) => *existing = value.to_owned(),
			None => attributes.push((name.to_owned(), value.to_owned())),
		}
		self.mutations += 1;
		Ok(())
	}

	fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), TreeError> {
		let attributes = self.attributes_mut(*node)?;
		let before = attributes.len();
		attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
		if attributes.len() != before {
			self.mutations += 1;
		}
		Ok(())
	}

	fn set_property(&mut self, node: &NodeId, name: &str, value: PropertyValue) -> Result<(), TreeError> {
		self.slot_mut(*node)?.properties.insert(name.to_owned(), value);
		self.mutations += 1;
		Ok(())
	}

	fn child_count(&self, node: &NodeId) -> usize {
		self.children(*node).len()
	}

	fn child_at(&self, node: &NodeId, index: usize) -> Option<NodeId> {
		self.children(*node).get(index).copied()
	}

	fn text_content(&self, node: &NodeId) -> String {
		let slot = match self.slots.get(node.0) {
			Some(slot) => slot,
			None => return String::new(),
		};
		match &slot.data {
			Data::Text(text) | Data::Comment(text) => text.clone(),
			Data::Element { .. } | Data::Fragment => slot.children.iter().filter(|child| self.kind(child) != NodeKind::Comment).map(|child| self.text_content(child)).collect(),
		}
	}

	fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<(), TreeError> {
		match &mut self.slot_mut(*node)?.data {
			Data::Text(data) | Data::Comment(data) => {
				*data = text.to_owned();
				self.mutations += 1;
				Ok(())
			}
			Data::Element { .. } | Data::Fragment => {
				self.clear_children(node)?;
				if !text.is_empty() {
					let text = self.push(Data::Text(text.to_owned()));
					self.insert_one(*node, text, None)?;
				}
				self.mutations += 1;
				Ok(())
			}
		}
	}

	fn create_element(&mut self, name: &str) -> Result<NodeId, TreeError> {
		Ok(self.push(Data::Element {
			name: name.to_owned(),
			attributes: Vec::new(),
		}))
	}

	fn create_text(&mut self, text: &str) -> NodeId {
		self.push(Data::Text(text.to_owned()))
	}

	fn create_comment(&mut self, comment: &str) -> NodeId {
		self.push(Data::Comment(comment.to_owned()))
	}

	fn create_fragment(&mut self) -> NodeId {
		self.push(Data::Fragment)
	}

	fn insert_before(&mut self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) -> Result<(), TreeError> {
		let (parent, node, reference) = (*parent, *node, reference.copied());
		match self.slot(parent)?.data {
			Data::Element { .. } | Data::Fragment => (),
			Data::Text(_) | Data::Comment(_) => return Err(TreeError::HierarchyRequest { parent, node }),
		}
		if let Some(reference) = reference {
			if self.parent(reference) != Some(parent) {
				return Err(TreeError::NotAChild { parent, child: reference });
			}
		}

		match self.slot(node)?.data {
			Data::Fragment => {
				for child in core::mem::take(&mut self.slots[node.0].children) {
					self.slots[child.0].parent = None;
					self.insert_one(parent, child, reference)?;
				}
			}
			_ => {
				if reference == Some(node) {
					// Inserting a node before itself leaves it where it is.
					return Ok(());
				}
				self.insert_one(parent, node, reference)?;
			}
		}
		self.mutations += 1;
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), TreeError> {
		if self.parent(*child) != Some(*parent) {
			return Err(TreeError::NotAChild { parent: *parent, child: *child });
		}
		self.detach(*child);
		self.mutations += 1;
		Ok(())
	}

	fn clear_children(&mut self, node: &NodeId) -> Result<(), TreeError> {
		let children = self.slot(*node)?.children.clone();
		for child in &children {
			self.detach(*child);
		}
		if !children.is_empty() {
			self.mutations += 1;
		}
		Ok(())
	}
}

/// The [`FocusRegistry`] of a [`MemoryTree`], which tracks focus itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryFocus;
impl FocusRegistry<MemoryTree> for MemoryFocus {
	fn focused(&self, tree: &MemoryTree) -> Option<NodeId> {
		tree.focused()
	}

	fn focus(&mut self, tree: &mut MemoryTree, node: &NodeId) -> Result<(), TreeError> {
		tree.focus(*node)
	}
}

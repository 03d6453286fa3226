//! The seams between the reconciler and the tree it mutates.

use core::fmt::Debug;
use std::borrow::Cow;

/// Coarse node classification used for identity matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Element,
	Text,
	Comment,
	Fragment,
	Other,
}

/// A value written to a live (runtime) property rather than to a literal attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
	Text(String),
	Bool(bool),
}

/// A persistent, mutable tree that can be converged towards a [template](`crate::template`).
///
/// Implementations mirror a subset of the [***Node***](https://developer.mozilla.org/en-US/docs/Web/API/Node)
/// and [***Element***](https://developer.mozilla.org/en-US/docs/Web/API/Element) interfaces.
/// In particular, inserting a fragment moves its children instead of the fragment itself,
/// and inserting an attached node detaches it from its previous position first.
pub trait LiveTree {
	type Handle: Clone + PartialEq + Debug;
	type Error: Debug;

	fn kind(&self, node: &Self::Handle) -> NodeKind;

	/// `None` for anything that is not an element.
	fn tag_name(&self, node: &Self::Handle) -> Option<Cow<'_, str>>;

	fn attribute(&self, node: &Self::Handle, name: &str) -> Option<String>;
	fn attribute_names(&self, node: &Self::Handle) -> Vec<String>;
	fn set_attribute(&mut self, node: &Self::Handle, name: &str, value: &str) -> Result<(), Self::Error>;
	fn remove_attribute(&mut self, node: &Self::Handle, name: &str) -> Result<(), Self::Error>;

	/// Writes a runtime property, like ***HTMLInputElement.value***.
	fn set_property(&mut self, node: &Self::Handle, name: &str, value: PropertyValue) -> Result<(), Self::Error>;

	fn child_count(&self, node: &Self::Handle) -> usize;
	fn child_at(&self, node: &Self::Handle, index: usize) -> Option<Self::Handle>;

	fn text_content(&self, node: &Self::Handle) -> String;

	/// Replaces all children of an element with a single text node (or none, for empty `text`),
	/// or replaces the data of a text or comment node.
	fn set_text_content(&mut self, node: &Self::Handle, text: &str) -> Result<(), Self::Error>;

	fn create_element(&mut self, name: &str) -> Result<Self::Handle, Self::Error>;
	fn create_text(&mut self, text: &str) -> Self::Handle;
	fn create_comment(&mut self, comment: &str) -> Self::Handle;
	fn create_fragment(&mut self) -> Self::Handle;

	/// Inserts `node` before `reference`, or appends it if `reference` is `None`.
	fn insert_before(&mut self, parent: &Self::Handle, node: &Self::Handle, reference: Option<&Self::Handle>) -> Result<(), Self::Error>;

	fn remove_child(&mut self, parent: &Self::Handle, child: &Self::Handle) -> Result<(), Self::Error>;

	fn clear_children(&mut self, node: &Self::Handle) -> Result<(), Self::Error>;
}

/// Access to the single focused node of a tree.
///
/// Relocating a focused node drops its focus, so the reconciler consults this registry around each move.
pub trait FocusRegistry<T: LiveTree + ?Sized> {
	fn focused(&self, tree: &T) -> Option<T::Handle>;
	fn focus(&mut self, tree: &mut T, node: &T::Handle) -> Result<(), T::Error>;
}

/// A [`FocusRegistry`] for trees that never hold focus, e.g. when rendering off-screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFocus;
impl<T: LiveTree + ?Sized> FocusRegistry<T> for NoFocus {
	fn focused(&self, _: &T) -> Option<T::Handle> {
		None
	}

	fn focus(&mut self, _: &mut T, _: &T::Handle) -> Result<(), T::Error> {
		Ok(())
	}
}

/// Intercepts delegated attributes (those marked with [`DELEGATED_PREFIX`](`crate::attributes::DELEGATED_PREFIX`)),
/// typically to bind event listeners or two-way data bindings.
///
/// `name` is passed without the marker.
pub trait DelegationHook<T: LiveTree + ?Sized> {
	fn delegate(&mut self, tree: &mut T, node: &T::Handle, name: &str, value: &str);
}
impl<T, F> DelegationHook<T> for F
where
	T: LiveTree + ?Sized,
	F: FnMut(&mut T, &T::Handle, &str, &str),
{
	fn delegate(&mut self, tree: &mut T, node: &T::Handle, name: &str, value: &str) {
		self(tree, node, name, value)
	}
}

/// Shortens the trait object lifetime so the hook can be lent out repeatedly.
pub(crate) fn reborrow_hook<'a, T: LiveTree + ?Sized>(hook: &'a mut Option<&mut dyn DelegationHook<T>>) -> Option<&'a mut dyn DelegationHook<T>> {
	match hook {
		Some(hook) => Some(&mut **hook),
		None => None,
	}
}

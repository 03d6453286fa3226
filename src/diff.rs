use crate::{
	attributes::{apply_default_attributes, reconcile_attributes},
	matcher::is_different_node,
	sanitize::{contains_unsafe_subtree, is_script_element},
	template::Node,
	tree::{reborrow_hook, DelegationHook, FocusRegistry, LiveTree},
};
use core::fmt::{self, Debug, Formatter};
use tracing::{debug, error, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};

/// Per-[`Reconciler`] settings.
pub struct ReconcileOptions<'h, T: LiveTree + ?Sized> {
	/// Receives all [delegated](`crate::attributes::DELEGATED_PREFIX`) attributes, both on fresh clones and on later passes.
	///
	/// Without a hook, delegated attributes are treated like literal ones.
	pub hook: Option<&'h mut dyn DelegationHook<T>>,
	/// Whether literal inline event handlers (`on…`) may be written.
	pub allow_inline_handlers: bool,
	/// Nesting limit below which subtrees are left as they are.
	pub depth_limit: usize,
}
impl<'h, T: LiveTree + ?Sized> Default for ReconcileOptions<'h, T> {
	fn default() -> Self {
		Self {
			hook: None,
			allow_inline_handlers: false,
			depth_limit: 1024,
		}
	}
}
impl<'h, T: LiveTree + ?Sized> Debug for ReconcileOptions<'h, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReconcileOptions")
			.field("hook", &self.hook.as_ref().map(|_| "…"))
			.field("allow_inline_handlers", &self.allow_inline_handlers)
			.field("depth_limit", &self.depth_limit)
			.finish()
	}
}

/// Converges the child nodes of a live element towards those of a template, in place.
///
/// # Correct Use
///
/// Keep one [`Reconciler`] per live root and call [`Reconciler::reconcile`] once per render pass.
/// Calls against overlapping live subtrees must not be interleaved.
///
/// # Matching
///
/// Siblings are matched by position, using [`is_different_node`] as identity heuristic.
/// On mismatch, later siblings are searched for a match that is then moved into place.
/// Focus held by the moved node or one of its descendants is restored afterwards.
/// There is no backwards search, so a node that moved towards the end of its list is recreated instead.
///
/// # Script
///
/// Template subtrees that contain [script](`crate::sanitize::SCRIPT_ELEMENTS`) are never rendered.
/// A matching live node is moved into that position if necessary but left untouched otherwise,
/// and a non-matching occupant stays where it is unless a later sibling takes it over.
pub struct Reconciler<'h, T: LiveTree + ?Sized> {
	options: ReconcileOptions<'h, T>,
}
impl<'h, T: LiveTree + ?Sized> Default for Reconciler<'h, T> {
	fn default() -> Self {
		Self::new(ReconcileOptions::default())
	}
}
impl<'h, T: LiveTree + ?Sized> Debug for Reconciler<'h, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reconciler").field("options", &self.options).finish()
	}
}

impl<'h, T: LiveTree + ?Sized> Reconciler<'h, T> {
	#[must_use]
	pub fn new(options: ReconcileOptions<'h, T>) -> Self {
		Self { options }
	}

	#[must_use]
	pub fn options(&self) -> &ReconcileOptions<'h, T> {
		&self.options
	}

	/// Converges `existing`'s child nodes towards `template`'s.
	///
	/// The roots themselves are containers: Their own attributes are not touched.
	#[instrument(skip(self, template, tree, focus))]
	pub fn reconcile<F: FocusRegistry<T> + ?Sized>(&mut self, template: &Node, existing: &T::Handle, tree: &mut T, focus: &mut F) {
		if let Node::Element(element) = template {
			if is_script_element(&element.name) {
				return warn!("Refusing to reconcile towards a script root.");
			}
		}

		let depth_limit = self.options.depth_limit;
		let mut pass = Pass {
			tree,
			focus,
			options: &mut self.options,
			stats: Stats::default(),
		};
		pass.reconcile_children(template, existing, false, depth_limit);

		if STATIC_MAX_LEVEL >= Level::DEBUG {
			let Stats { created, moved, removed } = pass.stats;
			debug!(created, moved, removed, "Reconciled.");
		}
	}
}

/// Convenience function for a one-off [`Reconciler`] pass.
pub fn reconcile<T: LiveTree + ?Sized, F: FocusRegistry<T> + ?Sized>(template: &Node, existing: &T::Handle, tree: &mut T, focus: &mut F, options: ReconcileOptions<'_, T>) {
	Reconciler::new(options).reconcile(template, existing, tree, focus);
}

/// Recreates `template`'s node structure in `tree`, detached and without any attributes.
///
/// Attributes are added afterwards by [`apply_default_attributes`], which filters them.
pub fn clone_node<T: LiveTree + ?Sized>(template: &Node, tree: &mut T) -> Result<T::Handle, T::Error> {
	match template {
		Node::Text(text) => Ok(tree.create_text(text)),
		Node::Comment(comment) => Ok(tree.create_comment(comment)),
		Node::Element(element) => {
			let node = tree.create_element(&element.name)?;
			for child in &element.children {
				let child = clone_node(child, tree)?;
				tree.insert_before(&node, &child, None)?;
			}
			Ok(node)
		}
	}
}

#[derive(Debug, Default, Clone, Copy)]
struct Stats {
	created: usize,
	moved: usize,
	removed: usize,
}

struct Pass<'p, 'h, T: LiveTree + ?Sized, F: FocusRegistry<T> + ?Sized> {
	tree: &'p mut T,
	focus: &'p mut F,
	options: &'p mut ReconcileOptions<'h, T>,
	stats: Stats,
}

impl<'p, 'h, T: LiveTree + ?Sized, F: FocusRegistry<T> + ?Sized> Pass<'p, 'h, T, F> {
	/// `checked` means `template` is already known to be free of script.
	fn reconcile_children(&mut self, template: &Node, existing: &T::Handle, checked: bool, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		// Position in `existing`. Only diverges from the template index where script was skipped.
		let mut e = 0;
		let children = template.children();
		for (i, child) in children.iter().enumerate() {
			let span = trace_span!("Reconciling child", i, e);
			let _enter = span.enter();

			if !checked && contains_unsafe_subtree(child) {
				if self.keep_in_place_of_unsafe(child, &children[i + 1..], existing, e) {
					e += 1;
				}
				continue;
			}

			let occupant = match self.tree.child_at(existing, e) {
				Some(occupant) => occupant,
				None => {
					if self.insert_clone(child, existing, None).is_some() {
						e += 1;
					}
					continue;
				}
			};

			if is_different_node(child, self.tree, &occupant) {
				match self.lookahead(child, existing, e) {
					Some(found) => {
						if !self.relocate(existing, &found, &occupant) {
							continue;
						}
						self.reconcile_node(child, &found, depth_limit);
					}
					None => {
						// The mismatched occupant stays for now. A later sibling or the trim takes care of it.
						if self.insert_clone(child, existing, Some(&occupant)).is_none() {
							continue;
						}
					}
				}
			} else {
				self.reconcile_node(child, &occupant, depth_limit);
			}
			e += 1;
		}

		self.trim(existing, e);
	}

	/// Holds position `e` for an unsafe `template` child without rendering any of it.
	///
	/// A matching live node (at `e` or, via lookahead, moved there) is kept untouched, as is any other occupant
	/// unless one of the `later` template siblings can take it over.
	/// Returns whether position `e` is now taken.
	fn keep_in_place_of_unsafe(&mut self, template: &Node, later: &[Node], existing: &T::Handle, e: usize) -> bool {
		let occupant = match self.tree.child_at(existing, e) {
			Some(occupant) => occupant,
			None => {
				warn!("Template subtree contains script. Dropping it.");
				return false;
			}
		};

		if !is_different_node(template, self.tree, &occupant) {
			warn!("Template subtree contains script. Leaving the matching live node as is.");
			return true;
		}

		if let Some(found) = self.lookahead(template, existing, e) {
			warn!("Template subtree contains script. Moving the matching live node into place without updating it.");
			return self.relocate(existing, &found, &occupant);
		}

		if later.iter().any(|sibling| !is_different_node(sibling, &*self.tree, &occupant)) {
			warn!("Template subtree contains script. Dropping it and leaving the live node to a later sibling.");
			false
		} else {
			warn!("Template subtree contains script. Leaving the live node at its position as is.");
			true
		}
	}

	/// Finds the first sibling after `index` that `template` could be reconciled into.
	fn lookahead(&self, template: &Node, parent: &T::Handle, index: usize) -> Option<T::Handle> {
		let count = self.tree.child_count(parent);
		(index + 1..count)
			.filter_map(|j| self.tree.child_at(parent, j))
			.find(|candidate| !is_different_node(template, &*self.tree, candidate))
	}

	/// Moves `node` before `before`, restoring focus if the move dropped it.
	///
	/// This covers focus on `node` itself as well as on any of its descendants.
	fn relocate(&mut self, parent: &T::Handle, node: &T::Handle, before: &T::Handle) -> bool {
		let focused = self.focus.focused(self.tree);

		trace!(had_focus = focused.as_ref() == Some(node), "Moving matched sibling into place.");
		if let Err(error) = self.tree.insert_before(parent, node, Some(before)) {
			error!("Failed to move node: {:?}", error);
			return false;
		}
		self.stats.moved += 1;

		// Only the move happened in between, so any change of focus is due to it.
		if let Some(focused) = focused {
			if self.focus.focused(self.tree).as_ref() != Some(&focused) {
				match self.focus.focus(self.tree, &focused) {
					Ok(()) => trace!("Restored focus."),
					Err(error) => error!("Failed to restore focus after move: {:?}", error),
				}
			}
		}
		true
	}

	/// Clones `template` including its (filtered) attributes and inserts it before `reference`, or appends it.
	fn insert_clone(&mut self, template: &Node, parent: &T::Handle, reference: Option<&T::Handle>) -> Option<T::Handle> {
		let clone = match clone_node(template, self.tree) {
			Ok(clone) => clone,
			Err(error) => {
				error!("Failed to clone template node: {:?}", error);
				return None;
			}
		};
		apply_default_attributes(template, self.tree, &clone, reborrow_hook(&mut self.options.hook), self.options.allow_inline_handlers);

		if cfg!(feature = "dangerous-logging") {
			trace!(node = %template, "Inserting clone.");
		} else {
			trace!("Inserting clone.");
		}
		if let Err(error) = self.tree.insert_before(parent, &clone, reference) {
			error!("Failed to insert clone: {:?}", error);
			return None;
		}
		self.stats.created += 1;
		Some(clone)
	}

	fn reconcile_node(&mut self, template: &Node, occupant: &T::Handle, depth_limit: usize) {
		if let Node::Element(element) = template {
			if element.is_component() {
				return trace!(tag = element.name.as_str(), "Opaque component. Only its position is reconciled.");
			}
			reconcile_attributes(element, self.tree, occupant, reborrow_hook(&mut self.options.hook), self.options.allow_inline_handlers);
		}

		if !template.has_element_children() {
			let text = template.text_content();
			if self.tree.text_content(occupant) != text {
				trace!("Overwriting text content.");
				if let Err(error) = self.tree.set_text_content(occupant, &text) {
					error!("Failed to set text content: {:?}", error);
				}
			}
		}

		match (template.children().is_empty(), self.tree.child_count(occupant) == 0) {
			(true, true) => (),
			(true, false) => {
				trace!("Clearing children.");
				if let Err(error) = self.tree.clear_children(occupant) {
					error!("Failed to clear children: {:?}", error);
				}
			}
			(false, true) => {
				let fragment = self.tree.create_fragment();
				self.reconcile_children(template, &fragment, true, depth_limit - 1);
				if let Err(error) = self.tree.insert_before(occupant, &fragment, None) {
					error!("Failed to attach fragment: {:?}", error);
				}
			}
			(false, false) => self.reconcile_children(template, occupant, true, depth_limit - 1),
		}
	}

	/// Removes trailing children of `parent` from index `count` on.
	fn trim(&mut self, parent: &T::Handle, count: usize) {
		for j in (count..self.tree.child_count(parent)).rev() {
			let extra = match self.tree.child_at(parent, j) {
				Some(extra) => extra,
				None => continue,
			};
			trace!(j, "Trimming extra child.");
			match self.tree.remove_child(parent, &extra) {
				Ok(()) => self.stats.removed += 1,
				Err(error) => error!("Failed to remove extra child: {:?}", error),
			}
		}
	}
}

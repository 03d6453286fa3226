//! Per-element attribute synchronization.
//!
//! Every template attribute passes through the same gate, both when a fresh clone is first
//! populated ([`apply_default_attributes`]) and on each later pass ([`reconcile_attributes`]):
//!
//! 1. Names starting with [`INTERNAL_PREFIX`] are never materialized.
//! 2. A leading [`DELEGATED_PREFIX`] is stripped to get the real name.
//! 3. [Boolean attributes](`BOOLEAN_ATTRIBUTES`) with a [falsy literal](`FALSY_LITERALS`) are removed.
//! 4. Delegated attributes go to the [`DelegationHook`], if there is one.
//! 5. Anything [unsafe](`crate::sanitize::is_unsafe_attribute`) is dropped.
//! 6. The rest is written literally, and also as live property where the [`PROPERTIES`] table lists one.

use crate::{
	sanitize::is_unsafe_attribute,
	template::{Attribute, Element, Node},
	tree::{reborrow_hook, DelegationHook, LiveTree, PropertyValue},
};
use hashbrown::HashSet;
use std::borrow::Cow;
use tracing::{error, instrument, trace, warn};

/// Marks an attribute that should be routed through the [`DelegationHook`] instead of being written literally.
pub const DELEGATED_PREFIX: &str = ":";

/// Marks internal bookkeeping attributes, which are never rendered.
pub const INTERNAL_PREFIX: &str = "__";

/// Values of boolean attributes that mean "absent".
pub const FALSY_LITERALS: &[&str] = &["false", "null", "undefined"];

pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
	"autofocus",
	"autoplay",
	"checked",
	"controls",
	"disabled",
	"hidden",
	"inert",
	"loop",
	"multiple",
	"muted",
	"novalidate",
	"open",
	"readonly",
	"required",
	"selected",
];

/// Elements whose interactive state belongs to the user once they are live.
pub const LIVE_FORM_CONTROLS: &[&str] = &["input", "textarea", "option", "select"];

/// Attributes that carry [interactive state](`LIVE_FORM_CONTROLS`).
pub const FORM_STATE: &[&str] = &["value", "checked", "selected"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
	Text,
	Bool,
}

/// Live properties that are written alongside the literal attribute, per element kind.
pub const PROPERTIES: &[(&str, &[(&str, PropertyKind)])] = &[
	("input", &[("value", PropertyKind::Text), ("checked", PropertyKind::Bool)]),
	("textarea", &[("value", PropertyKind::Text)]),
	("select", &[("value", PropertyKind::Text)]),
	("option", &[("value", PropertyKind::Text), ("selected", PropertyKind::Bool)]),
	("button", &[("value", PropertyKind::Text)]),
	("progress", &[("value", PropertyKind::Text)]),
	("meter", &[("value", PropertyKind::Text)]),
];

#[must_use]
pub fn property_kind(tag: &str, name: &str) -> Option<PropertyKind> {
	PROPERTIES
		.iter()
		.find(|(element, _)| element.eq_ignore_ascii_case(tag))
		.and_then(|(_, properties)| properties.iter().find(|(property, _)| property.eq_ignore_ascii_case(name)))
		.map(|&(_, kind)| kind)
}

#[must_use]
pub fn is_live_form_control(tag: &str) -> bool {
	LIVE_FORM_CONTROLS.iter().any(|control| control.eq_ignore_ascii_case(tag))
}

#[must_use]
pub fn is_form_state(name: &str) -> bool {
	FORM_STATE.iter().any(|state| state.eq_ignore_ascii_case(name))
}

#[must_use]
pub fn is_boolean_attribute(name: &str) -> bool {
	BOOLEAN_ATTRIBUTES.iter().any(|boolean| boolean.eq_ignore_ascii_case(name))
}

#[must_use]
pub fn is_falsy_literal(value: &str) -> bool {
	FALSY_LITERALS.contains(&value)
}

/// Splits off the [`DELEGATED_PREFIX`], returning the real name and whether it was present.
#[must_use]
pub fn real_name(name: &str) -> (&str, bool) {
	match name.strip_prefix(DELEGATED_PREFIX) {
		Some(real) => (real, true),
		None => (name, false),
	}
}

/// Synchronizes `existing`'s attributes with `template`'s.
///
/// The [`FORM_STATE`] of [live form controls](`LIVE_FORM_CONTROLS`) is neither written nor removed.
/// Only a [`DelegationHook`] gets to see it, through the delegated name.
#[instrument(skip(template, tree, hook), fields(tag = %template.name))]
pub fn reconcile_attributes<T: LiveTree + ?Sized>(template: &Element, tree: &mut T, existing: &T::Handle, mut hook: Option<&mut dyn DelegationHook<T>>, events_allowed: bool) {
	let tag = tree.tag_name(existing).map(Cow::into_owned).unwrap_or_default();
	let form_control = is_live_form_control(&tag);

	for Attribute { name, value } in &template.attributes {
		if name.starts_with(INTERNAL_PREFIX) {
			trace!(name = name.as_str(), "Skipping internal attribute.");
			continue;
		}
		let (real, delegated) = real_name(name);
		if form_control && is_form_state(real) && !(delegated && hook.is_some()) {
			trace!(name = name.as_str(), "Leaving interactive state as is.");
			continue;
		}
		apply_attribute(tree, existing, &tag, name, value, reborrow_hook(&mut hook), events_allowed);
	}

	let wanted: HashSet<String> = template
		.attributes
		.iter()
		.filter(|attribute| !attribute.name.starts_with(INTERNAL_PREFIX))
		.map(|attribute| real_name(&attribute.name).0.to_ascii_lowercase())
		.collect();
	for name in tree.attribute_names(existing) {
		if wanted.contains(&name.to_ascii_lowercase()) || (form_control && is_form_state(&name)) {
			continue;
		}
		trace!(name = name.as_str(), "Removing stale attribute.");
		if let Err(error) = tree.remove_attribute(existing, &name) {
			error!("Failed to remove attribute {:?}: {:?}", name, error);
		}
	}
}

/// Populates a freshly cloned node (and its descendants) with `template`'s attributes.
///
/// `node` must have the same shape as `template`, which is the case for [`clone_node`](`crate::diff::clone_node`) output.
pub fn apply_default_attributes<T: LiveTree + ?Sized>(template: &Node, tree: &mut T, node: &T::Handle, mut hook: Option<&mut dyn DelegationHook<T>>, events_allowed: bool) {
	let element = match template {
		Node::Element(element) => element,
		Node::Text(_) | Node::Comment(_) => return,
	};

	for Attribute { name, value } in &element.attributes {
		if name.starts_with(INTERNAL_PREFIX) {
			continue;
		}
		apply_attribute(tree, node, &element.name, name, value, reborrow_hook(&mut hook), events_allowed);
	}

	for (i, child) in element.children.iter().enumerate() {
		match tree.child_at(node, i) {
			Some(live_child) => apply_default_attributes(child, tree, &live_child, reborrow_hook(&mut hook), events_allowed),
			None => {
				error!("Clone of <{}> is missing child {}. Skipping its attributes.", element.name, i);
				break;
			}
		}
	}
}

fn apply_attribute<T: LiveTree + ?Sized>(tree: &mut T, node: &T::Handle, tag: &str, name: &str, value: &str, hook: Option<&mut dyn DelegationHook<T>>, events_allowed: bool) {
	let (name, delegated) = real_name(name);

	if is_boolean_attribute(name) && is_falsy_literal(value) {
		if tree.attribute(node, name).is_some() {
			trace!(name, "Removing falsy boolean attribute.");
			if let Err(error) = tree.remove_attribute(node, name) {
				error!("Failed to remove attribute {:?}: {:?}", name, error);
			}
		}
		return;
	}

	if delegated {
		if let Some(hook) = hook {
			trace!(name, "Delegating attribute.");
			return hook.delegate(tree, node, name, value);
		}
	}

	if is_unsafe_attribute(name, value, events_allowed) {
		if cfg!(feature = "dangerous-logging") {
			warn!(name, value, "Dropping unsafe attribute.");
		} else {
			warn!(name, "Dropping unsafe attribute.");
		}
		return;
	}

	if tree.attribute(node, name).as_deref() == Some(value) {
		return;
	}

	if cfg!(feature = "dangerous-logging") {
		trace!(name, value, "Setting attribute.");
	} else {
		trace!(name, "Setting attribute.");
	}
	if let Err(error) = tree.set_attribute(node, name, value) {
		return error!("Failed to set attribute {:?}: {:?}", name, error);
	}

	if let Some(kind) = property_kind(tag, name) {
		let property = match kind {
			PropertyKind::Text => PropertyValue::Text(value.to_owned()),
			PropertyKind::Bool => PropertyValue::Bool(true),
		};
		if let Err(error) = tree.set_property(node, name, property) {
			error!("Failed to set property {:?}: {:?}", name, error);
		}
	}
}

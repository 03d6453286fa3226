//! Fail-closed filters for markup that could execute script.

use crate::{attributes::INTERNAL_PREFIX, template::Node};

/// Attributes whose value is interpreted as a URL.
pub const LOCATOR_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "xlink:href", "poster", "data"];

/// URL scheme prefixes (normalized) that are rejected in [`LOCATOR_ATTRIBUTES`].
pub const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:text/html"];

/// Elements that execute their content.
pub const SCRIPT_ELEMENTS: &[&str] = &["script"];

/// Checks whether writing `name`=`value` as a literal attribute could execute script.
///
/// Inline event handlers (`on…`) are only accepted with `events_allowed`.
/// Internal bookkeeping handlers (`__on…`) are never accepted: those must be delegated.
#[must_use]
pub fn is_unsafe_attribute(name: &str, value: &str, events_allowed: bool) -> bool {
	let lower_name = name.to_ascii_lowercase();

	if LOCATOR_ATTRIBUTES.contains(&lower_name.as_str()) {
		let normalized: String = value.chars().filter(|c| !c.is_ascii_whitespace() && !c.is_control()).flat_map(char::to_lowercase).collect();
		if DANGEROUS_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme)) {
			return true;
		}
	}

	if let Some(unprefixed) = lower_name.strip_prefix(INTERNAL_PREFIX) {
		if unprefixed.starts_with("on") {
			return true;
		}
	}

	lower_name.starts_with("on") && !events_allowed
}

#[must_use]
pub fn is_script_element(name: &str) -> bool {
	SCRIPT_ELEMENTS.iter().any(|script| script.eq_ignore_ascii_case(name))
}

/// Checks whether `node` is or contains a script-executing element.
#[must_use]
pub fn contains_unsafe_subtree(node: &Node) -> bool {
	let mut stack = vec![node];
	while let Some(node) = stack.pop() {
		if let Node::Element(element) = node {
			if is_script_element(&element.name) {
				return true;
			}
			stack.extend(&element.children);
		}
	}
	false
}

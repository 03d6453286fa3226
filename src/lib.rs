//! Converges a persistent live tree towards freshly rendered templates, in place.
//!
//! Focus and user-edited form values survive reconciliation, and template content that could execute script is dropped.
//! See [`diff::Reconciler`] for the algorithm and [`attributes`] for how individual attributes are treated.

#![doc(html_root_url = "https://docs.rs/tenfoot-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attributes;
pub mod diff;
pub mod load;
pub mod matcher;
pub mod memory;
pub mod sanitize;
pub mod template;
pub mod tree;
pub mod web;

pub use diff::{reconcile, ReconcileOptions, Reconciler};
pub use template::{Element, Node};
pub use tree::{DelegationHook, FocusRegistry, LiveTree, NoFocus};

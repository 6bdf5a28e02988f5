#![doc(html_root_url = "https://docs.rs/vnode-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A minimal virtual DOM.
//!
//! Vnode trees ([`Value`]s built with [`create_element`]) may contain functional [`Component`]s, fragments and literals.
//! They are [expanded](`expand()`) into normalized trees, which are then either [materialized](`materialize()`) into a
//! [`Target`] by a [`Renderer`] or serialized by [`render_to_string`].
//!
//! # Limitations
//!
//! - [`Renderer::update`] patches root properties and handles child lists that become empty or were empty,
//!   but doesn't diff two non-empty child lists. That case is reported as [`Outcome::ChildrenUnpatched`].
//! - [`render_to_string`] doesn't escape anything.
//! - Expanding a component that keeps producing itself doesn't terminate.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod classify;
pub mod diff;
pub mod error;
pub mod expand;
pub mod key;
mod listener_table;
pub mod markup;
pub mod materialize;
pub mod memory;
pub mod reconcile;
pub mod reserved;
pub mod target;
pub mod value;
pub mod web;

pub use classify::{classify, Classified, Kind};
pub use diff::{differs, Outcome, Renderer};
pub use error::{BoxError, Error, Result};
pub use expand::{expand, Expanded, ExpandedElement};
pub use key::{child_key, compute_child_key_map, Keyed};
pub use markup::render_to_string;
pub use materialize::{materialize, release, BackRefs};
pub use memory::MemoryTarget;
pub use reconcile::{reconcile_props, unbind_listeners};
pub use target::{ListenerOptions, Target};
pub use value::{create_element, same_value, Component, ElementNode, Listener, Literal, Placeholder, Props, Thunk, Value};
pub use web::{WebNode, WebTarget};

use core::fmt::{self, Display, Formatter};

/// Text content or attribute value in log fields, redacted unless the `"dangerous-logging"` feature is enabled.
pub(crate) struct Redacted<'a>(pub &'a str);

impl Display for Redacted<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			write!(f, "{:?}", self.0)
		} else {
			write!(f, "<{} bytes>", self.0.len())
		}
	}
}

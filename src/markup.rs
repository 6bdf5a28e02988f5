//! Serialization of vnode trees to markup strings.
//!
//! No escaping is performed: Text and attribute values are written verbatim,
//! so untrusted content must not be passed through here unfiltered.

use crate::{
	error::Result,
	expand::{expand, Expanded},
	reserved,
	value::Value,
};
use core::fmt::Write as _;
use tracing::{instrument, trace};

/// Expands `vnode` and serializes it.
///
/// Empty nodes produce nothing, fragment members are joined by newlines and elements always get an explicit closing tag.
/// Event properties and `children` are not serialized.
///
/// # Errors
///
/// Iff expansion fails.
#[instrument(skip(vnode))]
pub fn render_to_string(vnode: &Value) -> Result<String> {
	let expanded = expand(vnode)?;
	let mut markup = String::new();
	write_markup(&expanded, &mut markup);
	Ok(markup)
}

/// Serializes an already expanded tree into `out`.
pub fn write_markup(vnode: &Expanded, out: &mut String) {
	match vnode {
		Expanded::Empty(_) => (),
		Expanded::Text(literal) => {
			let _ = write!(out, "{}", literal);
		}
		Expanded::Fragment(members) => {
			for (i, member) in members.iter().enumerate() {
				if i > 0 {
					out.push('\n');
				}
				write_markup(member, out);
			}
		}
		Expanded::Element(element) => {
			out.push('<');
			out.push_str(&element.tag);
			for (name, value) in element.props.iter() {
				if reserved::is_event_key(name) || &**name == reserved::CHILDREN {
					continue;
				}
				match value.to_text() {
					Some(text) => {
						let _ = write!(out, " {}=\"{}\"", name, text);
					}
					None => trace!(name = &**name, value_type = value.type_name(), "Skipping attribute without textual form"),
				}
			}
			out.push('>');
			for child in &element.children {
				write_markup(child, out);
			}
			out.push_str("</");
			out.push_str(&element.tag);
			out.push('>');
		}
	}
}

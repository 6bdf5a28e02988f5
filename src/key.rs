//! Per-child identity hints.
//!
//! Keys are computed for every child list, but patching doesn't reorder by them (yet).

use crate::{
	classify::classify,
	expand::Expanded,
	reserved,
	value::Value,
};
use hashbrown::HashMap;
use std::rc::Rc;

/// A child that can be keyed.
pub trait Keyed {
	/// The `key` property, if present and not null or undefined.
	fn explicit_key(&self) -> Option<&Value>;
	/// An element's tag or a component's name.
	fn key_type_name(&self) -> Option<&str>;
	/// The runtime category name used when there is no type name.
	fn category(&self) -> &'static str;
}

impl Keyed for Value {
	fn explicit_key(&self) -> Option<&Value> {
		let props = match self {
			Value::Element(element) => &element.props,
			Value::Component(component) => &component.props,
			_ => return None,
		};
		props.get(reserved::KEY).filter(|key| !matches!(key, Value::Undefined | Value::Null))
	}

	fn key_type_name(&self) -> Option<&str> {
		match self {
			Value::Element(element) => Some(&element.tag),
			Value::Component(component) => Some(component.component.name()),
			_ => None,
		}
	}

	fn category(&self) -> &'static str {
		classify(self).map_or_else(|| Value::type_name(self), |classified| classified.kind().name())
	}
}

impl Keyed for Expanded {
	fn explicit_key(&self) -> Option<&Value> {
		match self {
			Expanded::Element(element) => element.props.get(reserved::KEY).filter(|key| !matches!(key, Value::Undefined | Value::Null)),
			_ => None,
		}
	}

	fn key_type_name(&self) -> Option<&str> {
		match self {
			Expanded::Element(element) => Some(&element.tag),
			_ => None,
		}
	}

	fn category(&self) -> &'static str {
		self.kind().name()
	}
}

impl<K: Keyed + ?Sized> Keyed for Rc<K> {
	fn explicit_key(&self) -> Option<&Value> {
		(**self).explicit_key()
	}

	fn key_type_name(&self) -> Option<&str> {
		(**self).key_type_name()
	}

	fn category(&self) -> &'static str {
		(**self).category()
	}
}

/// The key of `child` at `index`: Its explicit key, else its type name, [`KEY_NAMESPACE`](`reserved::KEY_NAMESPACE`) and index,
/// else its category name and index.
#[must_use]
pub fn child_key<K: Keyed + ?Sized>(child: &K, index: usize) -> String {
	if let Some(key) = child.explicit_key().and_then(Value::to_text) {
		return key;
	}
	match child.key_type_name() {
		Some(type_name) => format!("{}{}{}", type_name, reserved::KEY_NAMESPACE, index),
		None => format!("{}{}", child.category(), index),
	}
}

/// Maps each child's [key](`child_key`) to the child. Of children with duplicate keys, the last one wins.
#[must_use]
pub fn compute_child_key_map<K: Keyed>(children: &[K]) -> HashMap<String, &K> {
	children.iter().enumerate().map(|(index, child)| (child_key(child, index), child)).collect()
}

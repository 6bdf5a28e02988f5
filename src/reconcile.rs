use crate::{
	reserved,
	target::{event_binding, Target},
	value::{same_value, Props, Value},
	Redacted,
};
use tracing::{instrument, trace, warn};

/// Applies the difference between `prev` and `next` to `node`.
///
/// Properties missing from `next` are removed first. Then each property of `next` that is new or not [the same](`same_value`)
/// as in `prev` is set; a replaced listener is removed before its successor is added.
/// Unchanged properties cause no target mutation at all.
///
/// `key`, `ref` and `children` are never applied to the target.
#[instrument(skip(target, next, prev))]
pub fn reconcile_props<T: Target + ?Sized>(target: &mut T, node: &T::Node, next: &Props, prev: &Props) {
	for (key, value) in prev.iter() {
		if !next.contains_key(key) {
			remove_prop(target, node, key, value);
		}
	}

	for (key, value) in next.iter() {
		if reserved::is_unbound(key) {
			continue;
		}

		let previous = prev.get(key);
		if previous.map_or(false, |previous| same_value(previous, value)) {
			continue;
		}

		if let Some((event, options)) = event_binding(key) {
			if let Some(Value::Listener(old)) = previous {
				trace!(event = &*event, ?old, "Removing replaced listener");
				target.remove_listener(node, &event, old, options);
			}
			match value {
				Value::Listener(new) => {
					trace!(event = &*event, ?new, "Adding listener");
					target.add_listener(node, &event, new, options);
				}
				other => warn!("Ignoring non-listener value of type {} for event property {:?}", other.type_name(), key),
			}
		} else {
			match value.to_text() {
				Some(text) => {
					trace!(name = &**key, value = %Redacted(&text), "Setting attribute");
					target.set_attribute(node, key, &text);
				}
				None => {
					warn!("Skipping attribute {:?} with non-textual value of type {}", key, value.type_name());
					if previous.map_or(false, |previous| previous.to_text().is_some()) {
						target.remove_attribute(node, key);
					}
				}
			}
		}
	}
}

fn remove_prop<T: Target + ?Sized>(target: &mut T, node: &T::Node, key: &str, value: &Value) {
	if reserved::is_unbound(key) {
		return;
	}

	if let Some((event, options)) = event_binding(key) {
		if let Value::Listener(listener) = value {
			trace!(event = &*event, ?listener, "Removing listener");
			target.remove_listener(node, &event, listener, options);
		}
	} else if value.to_text().is_some() {
		trace!(name = key, "Removing attribute");
		target.remove_attribute(node, key);
	}
}

/// Removes every listener in `props` from `node`, leaving its attributes alone.
///
/// Used on nodes that are about to be dropped, so that adapters can release their listener wrappers.
pub fn unbind_listeners<T: Target + ?Sized>(target: &mut T, node: &T::Node, props: &Props) {
	for (key, value) in props.iter() {
		if let (Some((event, options)), Value::Listener(listener)) = (event_binding(key), value) {
			trace!(event = &*event, ?listener, "Unbinding listener of dropped node");
			target.remove_listener(node, &event, listener, options);
		}
	}
}

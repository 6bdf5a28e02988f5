//! Reserved property names and key syntax.

/// Properties whose name starts with this prefix bind event listeners, e.g. `onClick` for `click` events.
pub const EVENT_PREFIX: &str = "on";

/// An event property ending in this suffix binds a capturing listener, e.g. `onClickCapture`.
pub const CAPTURE_SUFFIX: &str = "Capture";

/// Reconciliation hint for a child's identity across renders. Never applied to the target.
pub const KEY: &str = "key";

/// Excluded from attribute diffing.
pub const REF: &str = "ref";

/// A component's children inside its resolved props.
pub const CHILDREN: &str = "children";

/// Separates a child's type name from its index in generated keys.
pub const KEY_NAMESPACE: &str = "$$";

/// Whether `key` binds an event listener.
#[must_use]
pub fn is_event_key(key: &str) -> bool {
	key.len() > EVENT_PREFIX.len() && key.starts_with(EVENT_PREFIX)
}

/// Whether `key` is never applied to a target node as attribute or listener.
#[must_use]
pub fn is_unbound(key: &str) -> bool {
	key == KEY || key == REF || key == CHILDREN
}

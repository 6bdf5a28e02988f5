use crate::value::{ComponentNode, ElementNode, Literal, Placeholder, Value};

/// The five renderable node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	Empty,
	Text,
	Element,
	Fragment,
	Component,
}

impl Kind {
	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Kind::Empty => "empty",
			Kind::Text => "text",
			Kind::Element => "element",
			Kind::Fragment => "fragment",
			Kind::Component => "component",
		}
	}
}

/// A classified view of a [`Value`], carrying the data relevant to its [`Kind`].
#[derive(Debug, Clone, Copy)]
pub enum Classified<'a> {
	Empty(Placeholder),
	Text(&'a Value),
	Element(&'a ElementNode),
	Fragment(&'a [Value]),
	Component(&'a ComponentNode),
}

impl Classified<'_> {
	#[must_use]
	pub fn kind(&self) -> Kind {
		match self {
			Classified::Empty(_) => Kind::Empty,
			Classified::Text(_) => Kind::Text,
			Classified::Element(_) => Kind::Element,
			Classified::Fragment(_) => Kind::Fragment,
			Classified::Component(_) => Kind::Component,
		}
	}

	/// The literal of a Text node.
	#[must_use]
	pub fn literal(&self) -> Option<Literal> {
		match self {
			Classified::Text(Value::Str(s)) => Some(Literal::Str(s.clone())),
			Classified::Text(Value::Number(n)) => Some(Literal::Number(*n)),
			_ => None,
		}
	}
}

#[must_use]
pub fn is_empty(value: &Value) -> bool {
	matches!(value, Value::Undefined | Value::Null | Value::Bool(_))
}

#[must_use]
pub fn is_text(value: &Value) -> bool {
	matches!(value, Value::Str(_) | Value::Number(_))
}

#[must_use]
pub fn is_element(value: &Value) -> bool {
	matches!(value, Value::Element(_))
}

#[must_use]
pub fn is_fragment(value: &Value) -> bool {
	matches!(value, Value::List(_))
}

#[must_use]
pub fn is_component(value: &Value) -> bool {
	matches!(value, Value::Component(_))
}

/// Classifies `value`, checking Empty, then Text, then Element, Fragment and Component.
///
/// Returns [`None`] for values that aren't renderable nodes ([`Value::Listener`] and un-invoked [`Value::Thunk`]).
#[must_use]
pub fn classify(value: &Value) -> Option<Classified<'_>> {
	if is_empty(value) {
		Some(Classified::Empty(match value {
			Value::Null => Placeholder::Null,
			Value::Bool(b) => Placeholder::Bool(*b),
			_ => Placeholder::Undefined,
		}))
	} else if is_text(value) {
		Some(Classified::Text(value))
	} else {
		match value {
			Value::Element(element) => Some(Classified::Element(element)),
			Value::List(items) => Some(Classified::Fragment(items)),
			Value::Component(component) => Some(Classified::Component(component)),
			_ => None,
		}
	}
}

/// The [`Kind`] of `value`, if it is renderable.
#[must_use]
pub fn kind_of(value: &Value) -> Option<Kind> {
	classify(value).map(|classified| classified.kind())
}

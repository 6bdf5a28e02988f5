use crate::{
	classify::{classify, Classified, Kind},
	error::{Error, Result},
	value::{ElementNode, Literal, Placeholder, Props, Value},
	Redacted,
};
use std::rc::Rc;
use tracing::{instrument, trace, trace_span};

/// A normalized vnode: No Component (or Thunk) survives expansion.
///
/// Nodes are reference-counted so that their identity can key [back-references](`crate::BackRefs`).
#[derive(Debug, Clone, PartialEq)]
pub enum Expanded {
	Empty(Placeholder),
	Text(Literal),
	Element(ExpandedElement),
	Fragment(Vec<Rc<Expanded>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedElement {
	pub tag: Rc<str>,
	pub props: Props,
	pub children: Vec<Rc<Expanded>>,
}

impl Expanded {
	#[must_use]
	pub fn kind(&self) -> Kind {
		match self {
			Expanded::Empty(_) => Kind::Empty,
			Expanded::Text(_) => Kind::Text,
			Expanded::Element(_) => Kind::Element,
			Expanded::Fragment(_) => Kind::Fragment,
		}
	}

	/// An element's children or a fragment's members. Empty for literals.
	#[must_use]
	pub fn children(&self) -> &[Rc<Expanded>] {
		match self {
			Expanded::Element(element) => &element.children,
			Expanded::Fragment(members) => members,
			Expanded::Empty(_) | Expanded::Text(_) => &[],
		}
	}

	/// Converts this tree back into a vnode description, e.g. to expand it again.
	#[must_use]
	pub fn to_value(&self) -> Value {
		match self {
			Expanded::Empty(placeholder) => (*placeholder).into(),
			Expanded::Text(literal) => literal.clone().into(),
			Expanded::Element(element) => ElementNode {
				tag: element.tag.clone(),
				props: element.props.clone(),
				children: element.children.iter().map(|child| child.to_value()).collect(),
			}
			.into(),
			Expanded::Fragment(members) => Value::List(members.iter().map(|member| member.to_value()).collect()),
		}
	}
}

/// Recursively resolves thunks, components and fragments in `value`.
///
/// # Errors
///
/// - [`Error::Component`] if a component or thunk fails. The failure aborts the whole expansion.
/// - [`Error::InvalidNode`] if a value that isn't a renderable node is encountered.
///
/// A component that (indirectly) keeps producing itself makes this function recurse without bound.
#[instrument(skip(value), fields(value = value.type_name()))]
pub fn expand(value: &Value) -> Result<Rc<Expanded>> {
	expand_node(value)
}

fn expand_node(value: &Value) -> Result<Rc<Expanded>> {
	if let Value::Thunk(thunk) = value {
		let span = trace_span!("Invoking thunk");
		let _enter = span.enter();
		return expand_node(&thunk.call()?);
	}

	let classified = classify(value).ok_or(Error::InvalidNode { found: value.type_name() })?;
	Ok(Rc::new(match classified {
		Classified::Empty(placeholder) => Expanded::Empty(placeholder),
		Classified::Text(_) => {
			let literal = classified.literal().ok_or(Error::InvalidNode { found: value.type_name() })?;
			trace!(text = %Redacted(&literal.to_string()), "Text");
			Expanded::Text(literal)
		}
		Classified::Fragment(members) => {
			let span = trace_span!("Expanding fragment", "members.len()" = members.len());
			let _enter = span.enter();
			Expanded::Fragment(members.iter().map(expand_node).collect::<Result<_>>()?)
		}
		Classified::Component(node) => {
			let span = trace_span!("Expanding component", name = node.component.name());
			let _enter = span.enter();
			let produced = node.component.call(&node.resolved_props())?;
			return expand_node(&produced);
		}
		Classified::Element(element) => {
			let span = trace_span!("Expanding element", tag = &*element.tag, "children.len()" = element.children.len());
			let _enter = span.enter();
			Expanded::Element(ExpandedElement {
				tag: element.tag.clone(),
				props: element.props.clone(),
				children: element.children.iter().map(expand_node).collect::<Result<_>>()?,
			})
		}
	}))
}

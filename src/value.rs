//! The dynamic vnode description: property values, children and the nodes built by [`create_element`].

use crate::{
	error::{BoxError, Error, Result},
	reserved,
};
use core::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
};
use std::rc::Rc;

/// A candidate vnode or property value.
///
/// Any [`Value`] may appear as a property value, but only the five kinds recognised by [`classify`](`crate::classify()`)
/// are renderable. [`Value::Thunk`]s are invoked during expansion and replaced by what they return.
#[derive(Debug, Clone)]
pub enum Value {
	Undefined,
	Null,
	Bool(bool),
	Number(f64),
	Str(Rc<str>),
	/// A fragment: An ordered sequence with no wrapping node of its own.
	List(Rc<[Value]>),
	Element(Rc<ElementNode>),
	Component(Rc<ComponentNode>),
	/// A late-bound description, invoked during expansion.
	Thunk(Thunk),
	/// An event callback. Not renderable.
	Listener(Listener),
}

impl Default for Value {
	fn default() -> Self {
		Self::Undefined
	}
}

impl Value {
	/// A short name of this value's runtime type, for diagnostics.
	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Undefined => "undefined",
			Value::Null => "null",
			Value::Bool(_) => "boolean",
			Value::Number(_) => "number",
			Value::Str(_) => "string",
			Value::List(_) => "list",
			Value::Element(_) => "element",
			Value::Component(_) => "component",
			Value::Thunk(_) => "thunk",
			Value::Listener(_) => "listener",
		}
	}

	/// The textual form of primitive values, as used for attributes and keys.
	///
	/// Returns [`None`] for values without one (lists, nodes and callables).
	#[must_use]
	pub fn to_text(&self) -> Option<String> {
		match self {
			Value::Undefined => Some("undefined".to_owned()),
			Value::Null => Some("null".to_owned()),
			Value::Bool(b) => Some(b.to_string()),
			Value::Number(n) => Some(format_number(*n)),
			Value::Str(s) => Some(s.to_string()),
			Value::List(_) | Value::Element(_) | Value::Component(_) | Value::Thunk(_) | Value::Listener(_) => None,
		}
	}

	pub fn thunk(f: impl 'static + Fn() -> Value) -> Self {
		Value::Thunk(Thunk::new(move || Ok(f())))
	}

	pub fn listener(f: impl 'static + Fn(&dyn Any)) -> Self {
		Value::Listener(Listener::new(f))
	}
}

/// Identity comparison with `Object.is` semantics.
///
/// Primitives compare by value (`NaN` is the same as `NaN`, `0.0` is not the same as `-0.0`),
/// everything else compares by reference.
#[must_use]
pub fn same_value(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
		(Value::Bool(a), Value::Bool(b)) => a == b,
		(Value::Number(a), Value::Number(b)) => same_number(*a, *b),
		(Value::Str(a), Value::Str(b)) => a == b,
		(Value::List(a), Value::List(b)) => addr(a) == addr(b),
		(Value::Element(a), Value::Element(b)) => Rc::ptr_eq(a, b),
		(Value::Component(a), Value::Component(b)) => Rc::ptr_eq(a, b),
		(Value::Thunk(a), Value::Thunk(b)) => a.ptr_eq(b),
		(Value::Listener(a), Value::Listener(b)) => a.ptr_eq(b),
		_ => false,
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		same_value(self, other)
	}
}

#[allow(clippy::float_cmp)]
fn same_number(a: f64, b: f64) -> bool {
	if a.is_nan() || b.is_nan() {
		a.is_nan() && b.is_nan()
	} else {
		a == b && a.is_sign_negative() == b.is_sign_negative()
	}
}

fn addr<T: ?Sized>(rc: &Rc<T>) -> usize {
	Rc::as_ptr(rc).cast::<()>() as usize
}

/// Formats a number the way `Number.prototype.toString` does for the common cases.
pub(crate) fn format_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_owned()
	} else if n.is_infinite() {
		let infinity = if n > 0.0 { "Infinity" } else { "-Infinity" };
		infinity.to_owned()
	} else if n == 0.0 {
		"0".to_owned()
	} else if n.fract() == 0.0 && n.abs() < 1e21 {
		format!("{:.0}", n)
	} else {
		n.to_string()
	}
}

/// The payload of an Empty node. Renders as nothing (or a placeholder comment in a live tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
	Undefined,
	Null,
	Bool(bool),
}

impl Display for Placeholder {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Placeholder::Undefined => f.write_str("undefined"),
			Placeholder::Null => f.write_str("null"),
			Placeholder::Bool(b) => Display::fmt(b, f),
		}
	}
}

impl From<Placeholder> for Value {
	fn from(placeholder: Placeholder) -> Self {
		match placeholder {
			Placeholder::Undefined => Value::Undefined,
			Placeholder::Null => Value::Null,
			Placeholder::Bool(b) => Value::Bool(b),
		}
	}
}

/// The payload of a Text node.
#[derive(Debug, Clone)]
pub enum Literal {
	Str(Rc<str>),
	Number(f64),
}

impl PartialEq for Literal {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Literal::Str(a), Literal::Str(b)) => a == b,
			(Literal::Number(a), Literal::Number(b)) => same_number(*a, *b),
			_ => false,
		}
	}
}

impl Display for Literal {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Literal::Str(s) => f.write_str(s),
			Literal::Number(n) => f.write_str(&format_number(*n)),
		}
	}
}

impl From<Literal> for Value {
	fn from(literal: Literal) -> Self {
		match literal {
			Literal::Str(s) => Value::Str(s),
			Literal::Number(n) => Value::Number(n),
		}
	}
}

/// An event callback, compared by identity.
///
/// The argument is the adapter-specific event object, for example a [`web_sys::Event`] or a test payload.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&dyn Any)>);

impl Listener {
	pub fn new(f: impl 'static + Fn(&dyn Any)) -> Self {
		Self(Rc::new(f))
	}

	pub fn call(&self, event: &dyn Any) {
		(self.0)(event)
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}

	/// An identity usable as a map key while this [`Listener`] (or a clone) is alive.
	#[must_use]
	pub fn id(&self) -> usize {
		addr(&self.0)
	}
}

impl Debug for Listener {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Listener({:#x})", self.id())
	}
}

/// A zero-argument, late-bound vnode description.
#[derive(Clone)]
pub struct Thunk(Rc<dyn Fn() -> core::result::Result<Value, BoxError>>);

impl Thunk {
	pub fn new(f: impl 'static + Fn() -> core::result::Result<Value, BoxError>) -> Self {
		Self(Rc::new(f))
	}

	/// # Errors
	///
	/// Iff the wrapped function fails, as [`Error::Component`].
	pub fn call(&self) -> Result<Value> {
		(self.0)().map_err(|source| Error::Component {
			name: "<thunk>".to_owned(),
			source,
		})
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		addr(&self.0) == addr(&other.0)
	}
}

impl Debug for Thunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Thunk({:#x})", addr(&self.0))
	}
}

type RenderFn = dyn Fn(&Props) -> core::result::Result<Value, BoxError>;

/// A functional component: A named pure function from resolved props to a vnode subtree.
#[derive(Clone)]
pub struct Component {
	name: Rc<str>,
	default_props: Option<Rc<Props>>,
	render: Rc<RenderFn>,
}

impl Component {
	pub fn new(name: impl Into<Rc<str>>, render: impl 'static + Fn(&Props) -> Value) -> Self {
		Self::try_new(name, move |props| Ok(render(props)))
	}

	pub fn try_new(name: impl Into<Rc<str>>, render: impl 'static + Fn(&Props) -> core::result::Result<Value, BoxError>) -> Self {
		Self {
			name: name.into(),
			default_props: None,
			render: Rc::new(render),
		}
	}

	#[must_use]
	pub fn with_default_props(mut self, default_props: Props) -> Self {
		self.default_props = Some(Rc::new(default_props));
		self
	}

	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	#[must_use]
	pub fn default_props(&self) -> Option<&Props> {
		self.default_props.as_deref()
	}

	/// # Errors
	///
	/// Iff the component function fails, as [`Error::Component`].
	pub fn call(&self, props: &Props) -> Result<Value> {
		(self.render)(props).map_err(|source| Error::Component {
			name: self.name.to_string(),
			source,
		})
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		addr(&self.render) == addr(&other.render)
	}
}

impl Debug for Component {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.name)
			.field("default_props", &self.default_props)
			.finish_non_exhaustive()
	}
}

/// An Element vnode: A tag name, its properties and its children.
///
/// `children` are stored beside `props`, never as a `"children"` property.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
	pub tag: Rc<str>,
	pub props: Props,
	pub children: Vec<Value>,
}

/// A Component vnode, before its function is invoked.
#[derive(Debug, Clone)]
pub struct ComponentNode {
	pub component: Component,
	pub props: Props,
	pub children: Rc<[Value]>,
}

impl ComponentNode {
	/// Default props, then own props, then `children`. Later sources win.
	#[must_use]
	pub fn resolved_props(&self) -> Props {
		let mut resolved = self.component.default_props().cloned().unwrap_or_default();
		resolved.extend(self.props.iter().map(|(key, value)| (key.clone(), value.clone())));
		resolved.insert(reserved::CHILDREN, Value::List(self.children.clone()));
		resolved
	}
}

/// An insertion-ordered property map.
///
/// Inserting an existing key replaces its value in place, so the position of a key is that of its first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(Vec<(Rc<str>, Value)>);

impl Props {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, key: impl Into<Rc<str>>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	/// Returns the replaced value, if any.
	pub fn insert(&mut self, key: impl Into<Rc<str>>, value: impl Into<Value>) -> Option<Value> {
		let key = key.into();
		let value = value.into();
		match self.0.iter_mut().find(|(k, _)| *k == key) {
			Some((_, slot)) => Some(core::mem::replace(slot, value)),
			None => {
				self.0.push((key, value));
				None
			}
		}
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		let index = self.0.iter().position(|(k, _)| &**k == key)?;
		Some(self.0.remove(index).1)
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(k, _)| &**k == key).map(|(_, v)| v)
	}

	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn iter(&self) -> impl '_ + Iterator<Item = (&Rc<str>, &Value)> {
		self.0.iter().map(|(k, v)| (k, v))
	}

	pub fn keys(&self) -> impl '_ + Iterator<Item = &str> {
		self.0.iter().map(|(k, _)| &**k)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<K: Into<Rc<str>>, V: Into<Value>> Extend<(K, V)> for Props {
	fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<K: Into<Rc<str>>, V: Into<Value>> core::iter::FromIterator<(K, V)> for Props {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut props = Props::new();
		props.extend(iter);
		props
	}
}

/// Builds [`Props`] from `key => value` pairs.
///
/// ```
/// use vnode_dom::{props, Value};
///
/// let props = props! { "id" => "main", "tabindex" => 0 };
/// assert_eq!(props.get("tabindex"), Some(&Value::Number(0.0)));
/// ```
#[macro_export]
macro_rules! props {
	($($key:expr => $value:expr),* $(,)?) => {{
		#[allow(unused_mut)]
		let mut props = $crate::Props::new();
		$(props.insert($key, $value);)*
		props
	}};
}

/// The `type` argument of [`create_element`].
#[derive(Debug, Clone)]
pub enum ElementType {
	Tag(Rc<str>),
	Component(Component),
}

impl From<&str> for ElementType {
	fn from(tag: &str) -> Self {
		ElementType::Tag(tag.into())
	}
}

impl From<String> for ElementType {
	fn from(tag: String) -> Self {
		ElementType::Tag(tag.into())
	}
}

impl From<Component> for ElementType {
	fn from(component: Component) -> Self {
		ElementType::Component(component)
	}
}

impl From<&Component> for ElementType {
	fn from(component: &Component) -> Self {
		ElementType::Component(component.clone())
	}
}

/// Constructs an Element or Component vnode.
///
/// `children` are flattened one level: A [`Value::List`] child contributes its items instead of itself.
pub fn create_element(r#type: impl Into<ElementType>, props: Props, children: impl IntoIterator<Item = Value>) -> Value {
	let mut flat = Vec::new();
	for child in children {
		match child {
			Value::List(items) => flat.extend(items.iter().cloned()),
			child => flat.push(child),
		}
	}

	match r#type.into() {
		ElementType::Tag(tag) => Value::Element(Rc::new(ElementNode { tag, props, children: flat })),
		ElementType::Component(component) => Value::Component(Rc::new(ComponentNode {
			component,
			props,
			children: flat.into(),
		})),
	}
}

/// Normalizes a `children` value to a sequence.
///
/// Absent, [`Value::Undefined`] and [`Value::Null`] yield an empty sequence, a [`Value::List`] yields its items
/// and any other value becomes a one-element sequence.
#[must_use]
pub fn normalize_children(children: Option<&Value>) -> Vec<Value> {
	match children {
		None | Some(Value::Undefined) | Some(Value::Null) => Vec::new(),
		Some(Value::List(items)) => items.to_vec(),
		Some(child) => vec![child.clone()],
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.into())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s.into())
	}
}

impl From<Rc<str>> for Value {
	fn from(s: Rc<str>) -> Self {
		Value::Str(s)
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Number(n)
	}
}

impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Value::Number(n.into())
	}
}

impl From<u32> for Value {
	fn from(n: u32) -> Self {
		Value::Number(n.into())
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(option: Option<T>) -> Self {
		option.map_or(Value::Null, Into::into)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::List(items.into())
	}
}

impl From<Listener> for Value {
	fn from(listener: Listener) -> Self {
		Value::Listener(listener)
	}
}

impl From<Thunk> for Value {
	fn from(thunk: Thunk) -> Self {
		Value::Thunk(thunk)
	}
}

impl From<ElementNode> for Value {
	fn from(element: ElementNode) -> Self {
		Value::Element(Rc::new(element))
	}
}

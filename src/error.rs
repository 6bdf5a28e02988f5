use thiserror::Error;

/// Boxed error returned by failing [`Component`](`crate::Component`)s and [`Thunk`](`crate::Thunk`)s.
pub type BoxError = Box<dyn std::error::Error + 'static>;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
	/// [`Renderer::update`](`crate::Renderer::update`) (or `unmount`) was called on a container that was never rendered into.
	#[error("missing prior render state: container {container} was never rendered into")]
	MissingRenderState { container: String },

	/// A [`Value`](`crate::Value`) that is none of Empty, Text, Element, Fragment or Component was used as a node.
	#[error("invalid node: {found} is not a renderable value")]
	InvalidNode { found: &'static str },

	/// A component function or thunk failed. The source error is passed through as-is.
	#[error("component {name:?} failed")]
	Component {
		name: String,
		#[source]
		source: BoxError,
	},

	/// The render target could not create a node.
	#[error("render target failure: {0}")]
	Target(String),
}

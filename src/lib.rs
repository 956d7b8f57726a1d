#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod diagram;
pub mod dot;
pub mod error;
pub mod icons;
pub mod model;
pub mod render;
pub mod scope;

pub use config::{DiagramConfig, Direction, OutputFormat};
pub use diagram::{Diagram, EdgeInfo, NodeHandle};
pub use error::{Error, ReferenceError, RenderError, ResourceError, Result, ScopeError};
pub use model::Attrs;

#[cfg(feature = "cli")]
pub use cli::run;

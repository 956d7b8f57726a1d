use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Scope discipline violations. Scopes close in exact reverse order of
/// opening; any other sequence fails at the offending call.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("a diagram is already open; diagrams cannot nest")]
    NestedDiagram,
    #[error("no diagram is open")]
    NoActiveDiagram,
    #[error("no cluster is open")]
    NoActiveCluster,
    #[error("{0} cluster(s) still open; close them before closing the diagram")]
    OpenClusters(usize),
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("node handle {id} does not belong to this diagram")]
    ForeignNode { id: String },
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("no icon registered for node kind \"{0}\"")]
    UnknownKind(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout engine \"{0}\" not found on PATH")]
    EngineNotFound(String),
    #[error("layout engine exited with {status}: {stderr}")]
    EngineFailed { status: ExitStatus, stderr: String },
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, Error>;

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::config::OutputFormat;
use crate::error::RenderError;

/// Hand the complete graph description to the layout engine and collect the
/// rendered image bytes. One synchronous call, no retry: the engine either
/// produces the whole artifact or the render fails.
pub fn invoke_engine(
    engine: &str,
    format: OutputFormat,
    dot_source: &str,
) -> Result<Vec<u8>, RenderError> {
    debug!("invoking layout engine {engine} for {} output", format.extension());

    let mut child = Command::new(engine)
        .arg(format!("-T{}", format.extension()))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| match err.kind() {
            ErrorKind::NotFound => RenderError::EngineNotFound(engine.to_string()),
            _ => RenderError::Io(err),
        })?;

    child
        .stdin
        .as_mut()
        .ok_or_else(|| RenderError::Io(ErrorKind::BrokenPipe.into()))?
        .write_all(dot_source.as_bytes())?;

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(RenderError::EngineFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output.stdout)
}

/// Write the final artifact. Nothing touches the path before the bytes are
/// complete, so a failed render leaves no partial file behind.
pub fn write_output(bytes: &[u8], output: &Path) -> Result<(), RenderError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, bytes)?;
    debug!("wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

//! Layer composition
//!
//! Rendering starts from the backup content and feeds it through every
//! repository layer in order. Nothing here writes to disk.

use std::fs;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use holo_fs::{FileKind, file_kind, io};

use crate::{Error, Result};

use super::config_file::ConfigFile;
use super::layer::Strategy;

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: Vec<u8>,
    /// Anything repository scripts printed on stderr while succeeding
    pub warnings: Vec<String>,
}

/// Compute the content `file` should have.
///
/// A copy layer replaces the content so far; a script layer transforms it.
/// Any failing layer aborts the render for this file only.
pub fn render(file: &ConfigFile) -> Result<Rendered> {
    let mut content = seed(file)?;
    let mut warnings = Vec::new();

    for layer in file.layers() {
        debug!(
            file = %file.logical_path(),
            layer = %layer.rel_path().display(),
            strategy = %layer.strategy(),
            "applying layer"
        );
        content = match layer.strategy() {
            Strategy::Copy => io::read_bytes(layer.path())?,
            Strategy::ExternalProgram => {
                let output = run_program(layer.path(), &content)?;
                if !output.stderr.trim().is_empty() {
                    warn!(
                        program = %layer.path().display(),
                        stderr = %output.stderr.trim(),
                        "script wrote to stderr"
                    );
                    warnings.push(format!(
                        "{}: {}",
                        layer.path().display(),
                        output.stderr.trim()
                    ));
                }
                output.stdout
            }
        };
    }

    Ok(Rendered { content, warnings })
}

/// Starting content for rendering.
///
/// Before the first apply there is no backup yet; the live target is what
/// would be saved as one.
fn seed(file: &ConfigFile) -> Result<Vec<u8>> {
    match file_kind(file.backup_path())? {
        FileKind::Missing => read_content(file.target_path()),
        _ => read_content(file.backup_path()),
    }
}

/// Content of a managed file, empty if it does not exist. For a symlink
/// this is its link target.
pub(crate) fn read_content(path: &Path) -> Result<Vec<u8>> {
    match file_kind(path)? {
        FileKind::Symlink => {
            let link = fs::read_link(path).map_err(|e| holo_fs::Error::io(path, e))?;
            Ok(link.as_os_str().as_bytes().to_vec())
        }
        FileKind::Regular => Ok(io::read_bytes(path)?),
        FileKind::Missing => Ok(Vec::new()),
        FileKind::Other => Err(Error::NotManageable {
            path: path.to_path_buf(),
        }),
    }
}

/// Captured output of a repository script.
#[derive(Debug)]
pub struct ProgramOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Run `program` with `input` on stdin, capturing stdout and stderr.
///
/// Blocks until the program exits; there is no timeout. A program that does
/// not read its input is fine as long as it exits successfully.
pub fn run_program(program: &Path, input: &[u8]) -> Result<ProgramOutput> {
    let spawn_error = |source| Error::ProgramSpawn {
        program: program.to_path_buf(),
        source,
    };

    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| spawn_error(std::io::Error::other("stdin was not captured")))?;

    // Feed stdin from a second thread so a program writing a lot of output
    // before draining its input cannot deadlock against us
    let (output, written) = std::thread::scope(|scope| {
        let writer = scope.spawn(move || stdin.write_all(input));
        let output = child.wait_with_output();
        (output, writer.join())
    });

    let output = output.map_err(Error::Io)?;
    match written {
        Ok(Ok(())) => {}
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
        Ok(Err(e)) => return Err(Error::Io(e)),
        Err(_) => return Err(Error::Io(std::io::Error::other("stdin writer panicked"))),
    }

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        return Err(Error::ProgramFailed {
            program: program.to_path_buf(),
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(ProgramOutput {
        stdout: output.stdout,
        stderr,
    })
}

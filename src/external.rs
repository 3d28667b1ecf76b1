use crate::builtin::BuiltinTable;
use crate::command::{ExecutableCommand, Flow};
use anyhow::Result;
use std::borrow::Cow;
use std::env;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Command that is not a builtin. Runs the named program in a child process.
pub(crate) struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    /// Resolve `name` against the `PATH` of the current process.
    ///
    /// Returns `None` when nothing on disk answers to the name; the caller
    /// owns the resulting "command not found" report.
    pub fn resolve(name: &str, args: &[&str]) -> Option<Self> {
        let search_paths = env::var_os("PATH").unwrap_or_default();
        let executable = find_command_path(&search_paths, Path::new(name))?;
        Some(Self {
            program: executable.as_os_str().to_owned(),
            args: args.iter().map(|a| a.into()).collect(),
        })
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        _builtins: &BuiltinTable,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Flow> {
        // The child inherits the interpreter's standard streams. A failed
        // spawn (the fused fork+exec) is recoverable: report and keep going.
        let mut child = match Command::new(&self.program).args(&self.args).spawn() {
            Ok(child) => child,
            Err(e) => {
                writeln!(
                    stderr,
                    "minish: could not start {}: {}",
                    self.program.to_string_lossy(),
                    e
                )?;
                return Ok(Flow::Continue);
            }
        };
        debug!(pid = child.id(), program = %self.program.to_string_lossy(), "spawned child");

        // wait() returns only once the child reaches a terminal state --
        // exited or killed by a signal; stop notifications never surface
        // here. The child is reaped either way.
        match child.wait() {
            Ok(status) => debug!(code = exit_code(status), "child finished"),
            Err(e) => writeln!(stderr, "minish: could not wait for child: {e}")?,
        }
        Ok(Flow::Continue)
    }
}

/// Collapse an [`ExitStatus`] to the conventional shell numeric code.
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => code,
        None => match status.signal() {
            Some(signal) => 128 + signal,
            None => -1,
        },
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub(crate) fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => {
            // Empty path -> not found
            None
        }
        (Some(x), None) => {
            // Single component -> search in PATH
            find_in_path(search_paths, x.as_os_str()).map(Cow::Owned)
        }
        _ => {
            // Multiple components -> search in current dir
            find_by_path(path).map(Cow::Borrowed)
        }
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in env::split_paths(search_paths) {
        let path = dir.join(cmd);
        if let Some(path) = find_by_path(&path) {
            return Some(path.to_owned());
        }
    }
    None
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}

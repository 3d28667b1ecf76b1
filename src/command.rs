use crate::builtin::BuiltinTable;
use anyhow::Result;
use std::io::Write;

/// Continuation signal produced by every dispatched command.
///
/// `Continue` keeps the read-eval loop running; `Exit` stops it after the
/// current iteration. This mirrors the truthy/falsy status convention used
/// by classic shell loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep prompting for the next line.
    Continue,
    /// Terminate the loop after this command.
    Exit,
}

impl Flow {
    /// True while the loop should keep running.
    pub fn should_continue(self) -> bool {
        matches!(self, Flow::Continue)
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// Implemented by built-ins (via their parse adapter) and by external
/// commands. The builtin table is passed through so commands that describe
/// the shell itself (`help`) can enumerate it; output and diagnostics go to
/// the injected streams, never directly to the process streams.
pub(crate) trait ExecutableCommand {
    /// Executes the command, consuming it.
    fn execute(
        self: Box<Self>,
        builtins: &BuiltinTable,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Flow>;
}

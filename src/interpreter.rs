use crate::builtin::BuiltinTable;
use crate::command::{ExecutableCommand, Flow};
use crate::external::ExternalCommand;
use crate::lexer;
use crate::reader::LineReader;
use anyhow::Result;
use std::io::{self, Read, Write};
use tracing::debug;

/// Factory allows creating instances of one kind of command.
///
/// The concrete behavior lives in the per-kind trait impls; the struct only
/// carries the type.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The interactive command interpreter.
///
/// Owns the fixed builtin table and drives the prompt-read-split-dispatch
/// cycle. Builtin names always take precedence over external programs of
/// the same name.
///
/// Example
/// ```
/// use minish::{Flow, Interpreter};
///
/// let sh = Interpreter::new();
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let flow = sh.execute(&["exit".into()], &mut out, &mut err).unwrap();
/// assert_eq!(flow, Flow::Exit);
/// ```
pub struct Interpreter {
    builtins: BuiltinTable,
}

impl Interpreter {
    /// Create an interpreter with the standard builtin table
    /// (`cd`, `help`, `exit`).
    pub fn new() -> Self {
        Self {
            builtins: BuiltinTable::standard(),
        }
    }

    /// Dispatch one argument vector.
    ///
    /// A blank line (empty vector) is a no-op. Otherwise the first token is
    /// looked up among the builtins, in table order, and the first match
    /// runs; anything else goes to the process launcher. An unknown name is
    /// reported on the error stream and the loop keeps going.
    pub fn execute(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Flow> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

        if let Some(factory) = self.builtins.lookup(name) {
            debug!(command = %name, "dispatching builtin");
            return factory.create(&rest).execute(&self.builtins, stdout, stderr);
        }

        match ExternalCommand::resolve(name, &rest) {
            Some(cmd) => {
                debug!(command = %name, "dispatching external command");
                Box::new(cmd).execute(&self.builtins, stdout, stderr)
            }
            None => {
                writeln!(stderr, "minish: command not found: {name}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run the read-eval loop on the real standard streams.
    ///
    /// Returns when `exit` is entered or the input stream ends; fatal
    /// conditions (allocation, stream I/O) propagate as errors.
    pub fn run(&self) -> Result<()> {
        let stdin = io::stdin().lock();
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr().lock();
        self.run_with(stdin, &mut stdout, &mut stderr)
    }

    /// Same as [`Interpreter::run`], with the streams supplied by the caller.
    pub fn run_with(
        &self,
        input: impl Read,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        let mut reader = LineReader::new(input);
        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;

            let Some(line) = reader.read_line()? else {
                break;
            };
            let args = lexer::split_line(&line)?;
            if !self.execute(&args, stdout, stderr)?.should_continue() {
                break;
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blank_line_is_a_no_op() {
        let sh = Interpreter::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let flow = sh.execute(&[], &mut out, &mut err).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn unknown_command_is_reported_and_the_loop_goes_on() {
        let sh = Interpreter::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let flow = sh
            .execute(&args(&["no_such_program_xyz_42"]), &mut out, &mut err)
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(String::from_utf8_lossy(&err).contains("command not found"));
    }

    #[test]
    fn builtin_names_win_over_external_programs() {
        // `exit` must hit the builtin table, never a PATH lookup.
        let sh = Interpreter::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let flow = sh.execute(&args(&["exit"]), &mut out, &mut err).unwrap();
        assert_eq!(flow, Flow::Exit);
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn loop_prompts_and_stops_on_exit() {
        let sh = Interpreter::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        sh.run_with(Cursor::new("help\nexit\n"), &mut out, &mut err)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("> ").count(), 2);
        assert!(text.contains("The following commands are built in:"));
        assert!(err.is_empty());
    }

    #[test]
    fn loop_stops_at_end_of_input() {
        let sh = Interpreter::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        sh.run_with(Cursor::new(""), &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "> ");
    }

    #[test]
    fn whitespace_only_lines_just_reprompt() {
        let sh = Interpreter::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        sh.run_with(Cursor::new("   \t \nexit\n"), &mut out, &mut err)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "> > ");
        assert!(err.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn external_command_runs_and_control_returns_to_the_prompt() {
        let sh = Interpreter::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        // The child inherits the real stdout, so only the prompts land in `out`.
        sh.run_with(Cursor::new("true\nexit\n"), &mut out, &mut err)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap().matches("> ").count(), 2);
        assert!(
            err.is_empty(),
            "stderr was: {}",
            String::from_utf8_lossy(&err)
        );
    }
}

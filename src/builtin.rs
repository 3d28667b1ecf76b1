use crate::command::{ExecutableCommand, Flow};
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Executes the command.
    ///
    /// Errors are turned into diagnostics by the caller and never stop the
    /// loop; the returned [`Flow`] alone decides whether the loop keeps
    /// running.
    fn run(
        self,
        builtins: &BuiltinTable,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Flow>;
}

/// Bridges a parsed builtin to the object-safe command interface.
///
/// Downgrades the builtin's error to a diagnostic on the error stream plus a
/// continue-signal; a failed builtin must never terminate the interpreter.
struct Parsed<T>(T);

impl<T: BuiltinCommand> ExecutableCommand for Parsed<T> {
    fn execute(
        self: Box<Self>,
        builtins: &BuiltinTable,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Flow> {
        match self.0.run(builtins, stdout, stderr) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                writeln!(stderr, "minish: {e:#}")?;
                Ok(Flow::Continue)
            }
        }
    }
}

/// Carries argh's own output for an argument list that did not parse.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _builtins: &BuiltinTable,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Flow> {
        if self.is_error {
            writeln!(stderr, "{}", self.output.trim_end())?;
        } else {
            writeln!(stdout, "{}", self.output.trim_end())?;
        }
        Ok(Flow::Continue)
    }
}

/// Factory producing one kind of builtin from its argument list.
pub(crate) trait BuiltinFactory {
    /// Name this factory answers to in the table.
    fn name(&self) -> &'static str;

    /// Parse `args` and produce a runnable command instance.
    fn create(&self, args: &[&str]) -> Box<dyn ExecutableCommand>;
}

impl<T: BuiltinCommand + 'static> BuiltinFactory for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn create(&self, args: &[&str]) -> Box<dyn ExecutableCommand> {
        match T::from_args(&[T::name()], args) {
            Ok(cmd) => Box::new(Parsed(cmd)),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        }
    }
}

/// The fixed table of builtins.
///
/// Built once at startup and never mutated. Lookup order is table order,
/// which is also the order `help` lists the names in.
pub(crate) struct BuiltinTable {
    factories: Vec<Box<dyn BuiltinFactory>>,
}

impl BuiltinTable {
    /// The standard table: `cd`, `help`, `exit`.
    pub fn standard() -> Self {
        Self {
            factories: vec![
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Help>::default()),
                Box::new(Factory::<Exit>::default()),
            ],
        }
    }

    /// First factory whose name matches exactly, scanned in table order.
    pub fn lookup(&self, name: &str) -> Option<&dyn BuiltinFactory> {
        self.factories
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
    }

    /// Builtin names in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(|f| f.name())
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub(crate) struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn run(
        self,
        _builtins: &BuiltinTable,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<Flow> {
        let target = self
            .target
            .filter(|t| !t.is_empty())
            .context("cd: expected a directory argument")?;
        env::set_current_dir(&target)
            .with_context(|| format!("cd: cannot change directory to {target}"))?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Print the builtin command list and usage notes.
pub(crate) struct Help {
    #[argh(positional, greedy)]
    /// accepted and ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn run(
        self,
        builtins: &BuiltinTable,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<Flow> {
        writeln!(stdout, "minish, a minimal interactive command interpreter.")?;
        writeln!(
            stdout,
            "Type a program name followed by its arguments, then press enter."
        )?;
        writeln!(stdout, "The following commands are built in:")?;
        for name in builtins.names() {
            writeln!(stdout, "{name}")?;
        }
        writeln!(stdout, "Use the man command for information on other programs.")?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Leave the interpreter.
pub(crate) struct Exit {
    #[argh(positional, greedy)]
    /// accepted and ignored; exit always succeeds.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn run(
        self,
        _builtins: &BuiltinTable,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
    ) -> Result<Flow> {
        Ok(Flow::Exit)
    }
}

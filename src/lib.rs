//! A tiny interactive command interpreter.
//!
//! This crate implements the classic read-parse-dispatch-execute cycle: a
//! prompt is printed, one line is read from the input stream, split into
//! whitespace-delimited arguments, and either handled by a built-in command
//! (`cd`, `help`, `exit`) or handed to an external program run in a child
//! process. It is intentionally small and easy to read, suitable for
//! experiments with process management and argument parsing.
//!
//! The main entry point is [`Interpreter`], which owns the fixed builtin
//! table and drives the loop. Input and output streams are injected, so the
//! whole cycle can be exercised in tests against in-memory buffers.

mod builtin;
mod command;
mod external;
mod interpreter;
mod lexer;
mod reader;

/// Continuation signal produced by every dispatched command.
pub use command::Flow;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

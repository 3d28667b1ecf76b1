use minish::Interpreter;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Log records go to stderr; stdout carries the prompt and command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = Interpreter::new().run() {
        eprintln!("minish: fatal: {e:#}");
        process::exit(1);
    }
}

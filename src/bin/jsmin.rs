//! JSMin command-line filter
//!
//! Reads JavaScript from standard input and writes the minified form to
//! standard output or to a file. Positional arguments are echoed into the
//! output as `// <comment>` lines ahead of the minified body, which is
//! the traditional way to carry a copyright notice through minification.

use anyhow::Context;
use clap::{ArgAction, Parser};
use jsmin::{FileStream, Minifier, Mode, StdStream, Stream};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jsmin", version, disable_version_flag = true)]
#[command(about = "Minify JavaScript source code")]
struct Args {
    /// Write the minified output to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Comments echoed into the output as `// <comment>` lines
    #[arg(value_name = "COMMENT")]
    comments: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: JSMIN {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut input = StdStream::input();
    let mut output: Box<dyn Stream> = match &args.output {
        Some(path) => Box::new(
            FileStream::open(path, Mode::Write)
                .with_context(|| format!("cannot open {}", path.display()))?,
        ),
        None => Box::new(StdStream::output()),
    };

    for comment in &args.comments {
        output
            .printf(format_args!("// {comment}\n"))
            .context("cannot write comment line")?;
    }

    Minifier::new(&mut input, output.as_mut()).minify()?;
    Ok(())
}

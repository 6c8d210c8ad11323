//! dockerlex CLI - Inspect how a Dockerfile parses
//!
//! Usage:
//!   dockerlex Dockerfile                 # Print the syntax tree as JSON
//!   dockerlex --outline Dockerfile       # One line per instruction/comment
//!   cat Dockerfile | dockerlex -         # Read from stdin
//!
//! Set `RUST_LOG=dockerlex=debug` to see parser events on stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dockerlex::{Dockerfile, LogConfig, Template};
use tracing_subscriber::EnvFilter;

/// dockerlex - Dockerfile parser
#[derive(Parser, Debug)]
#[command(name = "dockerlex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dockerfile to parse, `-` for stdin
    #[arg()]
    file: PathBuf,

    /// Print an outline instead of JSON
    #[arg(long)]
    outline: bool,

    /// Show arguments with variables expanded (outline only)
    #[arg(long, requires = "outline")]
    expanded: bool,

    /// Allow document text in debug logs
    #[arg(long)]
    log_content: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let text = read_input(&args.file)?;

    let mut log_config = LogConfig::new();
    if args.log_content {
        log_config = log_config.unsafe_log_documents();
    }
    let parser = dockerlex::Parser::builder().log_config(log_config).build();
    let dockerfile = parser.parse(text);
    tracing::debug!(
        instructions = dockerfile.instructions().len(),
        "parsed {}",
        args.file.display()
    );

    if args.outline {
        print!("{}", outline(&dockerfile, args.expanded));
    } else {
        let json =
            serde_json::to_string_pretty(&dockerfile).context("Failed to serialize syntax tree")?;
        println!("{json}");
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read Dockerfile: {}", path.display()))
}

/// One line per instruction and comment in document order, with ranges.
/// Stage boundaries get a header line.
fn outline(dockerfile: &Dockerfile, expanded: bool) -> String {
    let mut entries: Vec<(dockerlex::Position, String)> = Vec::new();

    for instruction in dockerfile.instructions() {
        let arguments = if expanded {
            instruction.expanded_arguments()
        } else {
            instruction.arguments()
        };
        let mut line = format!("{} {}", instruction.range(), instruction.keyword());
        for argument in arguments {
            line.push(' ');
            line.push_str(argument.value());
        }
        entries.push((instruction.range().start, line));
    }
    for comment in dockerfile.comments() {
        let content = comment.content().unwrap_or_default();
        entries.push((comment.range().start, format!("{} # {content}", comment.range())));
    }
    for stage in dockerfile.stages() {
        let name = stage.name().unwrap_or("-");
        entries.push((
            stage.range().start,
            format!("== stage {} {name} {}", stage.index(), stage.range()),
        ));
    }
    // Stage headers sort before the FROM that shares their start.
    entries.sort_by(|a, b| {
        let header = |line: &str| line.starts_with("==");
        a.0.cmp(&b.0).then_with(|| header(&b.1).cmp(&header(&a.1)))
    });

    let mut out = String::new();
    for (_, line) in entries {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_orders_entries() {
        let dockerfile = dockerlex::parse("# base\nFROM alpine AS base\nRUN echo hi\n");
        assert_eq!(
            outline(&dockerfile, false),
            "0:0-0:6 # base\n\
             == stage 0 base 1:0-2:11\n\
             1:0-1:19 FROM alpine AS base\n\
             2:0-2:11 RUN echo hi\n"
        );
    }

    #[test]
    fn test_outline_expanded() {
        let dockerfile = dockerlex::parse("ARG v=1\nRUN echo $v\n");
        assert_eq!(
            outline(&dockerfile, true),
            "0:0-0:7 ARG v=1\n1:0-1:11 RUN echo 1\n"
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["dockerlex", "--outline", "--expanded", "-"]);
        assert!(args.is_ok_and(|a| a.outline && a.expanded && a.file == PathBuf::from("-")));

        let args = Args::try_parse_from(["dockerlex", "--expanded", "Dockerfile"]);
        assert!(args.is_err());
    }
}

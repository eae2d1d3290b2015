//! Compile an object schema file: parse, resolve types, verify references.
//!
//! Usage:
//!   objdslc [OPTIONS] <INPUT>
//!
//! Options:
//!   --parse-tree       Print the verified document as JSON on stdout
//!   --output <PATH>    Write the verified document as JSON to PATH
//!   --types            Print every property with its generated-code type
//!
//! Diagnostics are printed as `file:line:column: message`. Exit code 1
//! if any error was found; nothing is written in that case.
//! Set `RUST_LOG=objdsl=debug` for parser and verifier tracing.

use anyhow::Context;
use clap::Parser;
use objdsl::{compile, render_type, required_includes, Error, VerifiedDocument};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "objdslc", version, about = "Object schema DSL compiler front end")]
struct Args {
    /// Schema source file
    input: PathBuf,

    /// Print the verified document as JSON instead of a summary
    #[arg(long)]
    parse_tree: bool,

    /// Write the verified document as JSON to this file
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print each property's resolved target type and the required includes
    #[arg(long)]
    types: bool,
}

fn print_types(doc: &VerifiedDocument) {
    for object in doc.objects.values() {
        println!("{}", object.name);
        for p in &object.properties {
            println!("  {}: {}", p.name, render_type(&p.ty));
        }
        let parents: Vec<&str> = doc.parents_of(&object.name).collect();
        if !parents.is_empty() {
            println!("  parented by: {}", parents.join(", "));
        }
    }
    for include in required_includes(doc) {
        println!("#include <{}>", include);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let display_path = args.input.display().to_string();
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", display_path))?;

    let doc = match compile(&source) {
        Ok(doc) => doc,
        Err(e) => {
            let messages = e.messages();
            for m in &messages {
                eprintln!("{}:{}", display_path, m);
            }
            let stage = match e {
                Error::Parse(_) => "parse",
                Error::Verify(_) => "verify",
            };
            eprintln!("{}: {} error(s)", stage, messages.len());
            std::process::exit(1);
        }
    };

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(output = %path.display(), "wrote document");
    }

    if args.parse_tree {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else if args.types {
        print_types(&doc);
    } else if args.output.is_none() {
        println!(
            "{}: ok ({} object(s), schema {} v{})",
            display_path,
            doc.objects.len(),
            doc.schema_name.as_deref().unwrap_or("-"),
            doc.schema_version.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
        );
    }
    Ok(())
}

//! quadc command-line driver
//!
//! Compiles one source file and prints the AST, the quad listing, or the
//! control-flow graph of every function.

mod output;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use quadc_engine::{compile, create_files, CompileOptions, Diagnostic};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quadc")]
#[command(about = "Lower a C-like program to quads and basic blocks", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file
    file: PathBuf,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Cfg)]
    emit: Emit,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    color: String,

    /// Keep functions that fall off their end without a return
    #[arg(long)]
    no_implicit_return: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Parsed syntax tree
    Ast,
    /// Flat quad listing
    Ir,
    /// Quads grouped into basic blocks
    Cfg,
    /// Basic blocks as JSON
    CfgJson,
}

/// The CFG is built for every emit mode so undefined labels are always caught
fn compile_options(cli: &Cli) -> CompileOptions {
    CompileOptions::default().with_implicit_return(!cli.no_implicit_return)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    info!("compiling {}", cli.file.display());

    let options = compile_options(&cli);

    let compilation = match compile(&source, &options) {
        Ok(compilation) => compilation,
        Err(error) => {
            debug!("compilation failed: {}", error);
            let files = create_files(cli.file.display().to_string(), source);
            let diagnostics = Diagnostic::from_compile_error(&error, 0);
            output::emit_diagnostics(
                &diagnostics,
                &files,
                output::resolve_color_choice(Some(&cli.color)),
            )?;
            anyhow::bail!("could not compile {}", cli.file.display());
        }
    };

    match cli.emit {
        Emit::Ast => print!("{}", compilation.dump_ast()),
        Emit::Ir => print!("{}", compilation.dump_ir()),
        Emit::Cfg => print!("{}", compilation.dump_cfg()),
        Emit::CfgJson => println!("{}", compilation.cfg_report().to_json()?),
    }
    Ok(())
}

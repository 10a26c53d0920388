use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sysreg_rs::doc::expand_architecture;
use sysreg_rs::render::render_table;
use sysreg_rs::{ConcreteReg, ExecState};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate system-register descriptor tables from ARM XML documentation"
)]
struct Opts {
    /// Root of the unpacked XML documentation (e.g. SysReg_v83A_xml-00bet4/)
    #[arg(value_name = "DOCDIR")]
    root: PathBuf,
    /// Restrict output to one execution state
    #[arg(long, value_enum, default_value_t = StateFilter::Both)]
    state: StateFilter,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StateFilter {
    Aarch32,
    Aarch64,
    Both,
}

impl StateFilter {
    fn states(self) -> &'static [ExecState] {
        match self {
            StateFilter::Aarch32 => &[ExecState::AArch32],
            StateFilter::Aarch64 => &[ExecState::AArch64],
            StateFilter::Both => &[ExecState::AArch32, ExecState::AArch64],
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    if !opts.root.is_dir() {
        eprintln!("error: {} is not a directory", opts.root.display());
        return ExitCode::from(3);
    }

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(4)
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    let mut regs: Vec<ConcreteReg> = Vec::new();
    for &state in opts.state.states() {
        regs.extend(expand_architecture(&opts.root, state)?);
    }

    let output = match opts.format {
        Format::Text => render_table(&regs),
        Format::Json => serde_json::to_string_pretty(&regs)?,
    };
    match &opts.out {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{output}"),
    }
    Ok(())
}

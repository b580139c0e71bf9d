use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Runtime-environment capability probing
#[derive(Parser, Debug)]
#[command(
    name = "envprobe",
    about = "Probe the runtime environment for filesystem, locale and shell capabilities",
    version,
    long_about = "envprobe registers small detectors that each test one environment \
                  behavior (symlink semantics, locale handling, shell quoting), runs \
                  them in dependency order and reports which capabilities the \
                  environment supports."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the detectors and print a capability report",
        long_about = "Runs every registered detector in dependency order and prints the \
                      resulting capability report.\n\n\
                      Examples:\n  \
                      envprobe probe\n  \
                      envprobe probe --format json\n  \
                      envprobe probe --policy abort -o report.yaml --format yaml"
    )]
    Probe(ProbeArgs),

    #[command(about = "List registered detectors and their dependencies")]
    List(ListArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ProbeArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "POLICY",
        help = "Failure policy: isolate keeps independent detectors running, abort stops at the first failure"
    )]
    pub policy: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, help = "List in registration order instead of resolved order")]
    pub registration_order: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Json,
    Yaml,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

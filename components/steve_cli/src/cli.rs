//! Command-line argument definitions.

use clap::Parser;

/// Virtual machine for the steve textual IR.
#[derive(Debug, Parser)]
#[command(name = "steve", version, about = "Virtual machine for the steve IR")]
pub struct Cli {
    /// Path to the IR file to execute.
    pub file: Option<String>,

    /// Enable the experimental JIT fast path.
    #[arg(long)]
    pub jit: bool,

    /// Run under the interactive debugger.
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set a breakpoint at a source line (repeatable).
    #[arg(short = 'b', long = "break", value_name = "LINE")]
    pub breakpoints: Vec<u32>,

    /// Print the decoded instruction listing before executing.
    #[arg(long)]
    pub print_ir: bool,
}

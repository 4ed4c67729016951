//! steve - virtual machine for the steve textual IR.
//!
//! Entry point: parses CLI arguments and delegates to the Runtime.

use clap::Parser as ClapParser;
use steve_cli::{Cli, CliError, Runtime, StdinDebugger};

fn main() {
    let cli = Cli::parse();

    let file = match cli.file {
        Some(file) => file,
        None => {
            println!("steve IR virtual machine v0.1.0");
            println!();
            println!("Usage:");
            println!("  steve <FILE>               Execute an IR file");
            println!("  steve <FILE> --jit         Allow the JIT fast path");
            println!("  steve <FILE> --debug       Run under the debugger");
            println!("  steve <FILE> -b <LINE>     Break at a source line");
            println!();
            println!("Run 'steve --help' for more options.");
            return;
        }
    };

    let mut runtime = Runtime::new(cli.jit).with_print_ir(cli.print_ir);
    for line in &cli.breakpoints {
        runtime.add_breakpoint(*line);
    }

    let result = if cli.debug || !cli.breakpoints.is_empty() {
        let mut ui = StdinDebugger::new();
        runtime.debug_file(&file, &mut ui)
    } else {
        runtime.execute_file(&file)
    };

    match result {
        Ok(()) => {}
        Err(CliError::Io(e)) => {
            eprintln!("Error: Could not read file '{}': {}", file, e);
            std::process::exit(1);
        }
        Err(CliError::Load(e)) => {
            eprintln!("Error: Could not load program: {}", e);
            std::process::exit(1);
        }
        // The interpreter already reported the fault with PC and line.
        Err(CliError::Vm(_)) => {
            std::process::exit(1);
        }
    }
}

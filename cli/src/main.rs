use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use vmgen::{Program, Registry, Report, RunOptions, Vm, VmOptions, load_program, render_error, stdlib};

/// vmgen - Run programs on virtual machines built from definition documents
#[derive(Parser, Debug)]
#[command(name = "vmgen")]
#[command(about = "Run and inspect vmgen programs", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program and print the outcome, final stack and statistics
    Run {
        /// Program file (binary framing, or hex text with --hex)
        program: PathBuf,

        #[command(flatten)]
        definition: DefinitionArg,

        /// Read the program as hex text
        #[arg(long)]
        hex: bool,

        /// Stop once the run has consumed more fuel than this
        #[arg(long)]
        fuel_limit: Option<u64>,

        /// Stop after this many instructions
        #[arg(long)]
        max_steps: Option<u64>,

        /// Maximum number of values on the stack
        #[arg(long, default_value_t = VmOptions::default().max_stack_size)]
        max_stack: usize,

        /// Memory slots available before any GROW
        #[arg(long, default_value_t = VmOptions::default().initial_memory_size)]
        memory: usize,

        /// Upper bound on memory slots, including GROW
        #[arg(long, default_value_t = VmOptions::default().max_memory_size)]
        max_memory: usize,
    },

    /// Print the instruction set as a Markdown table
    Report {
        #[command(flatten)]
        definition: DefinitionArg,

        /// Write the table to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print a decoded program, one instruction per line
    Disasm {
        program: PathBuf,

        /// Read the program as hex text
        #[arg(long)]
        hex: bool,
    },

    /// Print the version
    Version,
}

#[derive(clap::Args, Debug)]
struct DefinitionArg {
    /// Definition document (defaults to the bundled standard machine)
    #[arg(long, short)]
    definition: Option<PathBuf>,
}

/// Build the VM, rendering definition errors against their source.
fn build_vm(definition: Option<&Path>, options: VmOptions) -> Result<Vm> {
    let registry: Registry = stdlib::registry();
    let (source, vm) = match definition {
        Some(path) => vmgen::load_vm(path, &registry, options)?,
        None => {
            let vm = stdlib::definition()
                .and_then(|definition| Vm::with_options(&definition, &registry, options));
            (stdlib::DEFINITION.to_string(), vm)
        }
    };
    vm.map_err(|err| {
        render_error(&source, &err);
        vmgen::Error::from(err).into()
    })
}

fn run(program: &Program, vm: &mut Vm, options: &RunOptions) -> Result<()> {
    let outcome = vm.run(program, options).map_err(vmgen::Error::from)?;
    tracing::debug!(steps = outcome.steps, fuel = outcome.fuel, "Program finished");

    if outcome.halted {
        println!("halted at {}", vm.program_counter());
    } else {
        println!("finished");
    }
    println!("stack:");
    for value in vm.stack().as_slice().iter().rev() {
        println!("  {value}");
    }
    println!("operations: {}", vm.stats().operations());
    println!("fuel: {}", vm.stats().fuel());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use VMGEN_LOG to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_env("VMGEN_LOG")
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match args.command {
        Command::Run {
            program,
            definition,
            hex,
            fuel_limit,
            max_steps,
            max_stack,
            memory,
            max_memory,
        } => {
            if memory > max_memory {
                miette::bail!("--memory ({memory}) cannot exceed --max-memory ({max_memory})");
            }
            let options = VmOptions {
                max_stack_size: max_stack,
                initial_memory_size: memory,
                max_memory_size: max_memory,
            };
            let mut vm = build_vm(definition.definition.as_deref(), options)?;
            let program = load_program(&program, hex)?;
            let run_options = RunOptions {
                fuel_limit,
                max_steps,
            };
            run(&program, &mut vm, &run_options)?;
        }
        Command::Report { definition, output } => {
            let vm = build_vm(definition.definition.as_deref(), VmOptions::default())?;
            let report = Report::new(vm.table());
            match output {
                Some(path) => report.write_to_file(&path).into_diagnostic()?,
                None => print!("{report}"),
            }
        }
        Command::Disasm { program, hex } => {
            let program = load_program(&program, hex)?;
            print!("{program}");
        }
        Command::Version => {
            println!("vmgen {}", vmgen::version());
        }
    }

    Ok(())
}

use clap::Parser;
use env_logger::Builder;
use epsilon_machine::diagram::write_diagram;
use epsilon_machine::morph::MorphConfig;
use epsilon_machine::sequence::read_symbols;
use epsilon_machine::{EpsilonMachine, reconstruct};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "em_reconstruct")]
#[command(about = "Reconstruct the causal states (epsilon-machine) of a symbol sequence")]
struct Args {
    /// Path to a text file with one symbol per character (`#` starts a comment line)
    #[arg(value_name = "FILE")]
    file: String,

    /// Maximal depth D of the parse tree
    #[arg(long, default_value_t = 5, require_equals = true)]
    depth: usize,

    /// Depth K at which candidate morphs are sampled
    #[arg(long, default_value_t = 2, require_equals = true)]
    past: usize,

    /// Number of levels L that must match for two candidates to share a morph
    #[arg(long, default_value_t = 1, require_equals = true)]
    future: usize,

    /// Decimal digits kept in conditional probabilities
    #[arg(long, default_value_t = 2, require_equals = true)]
    precision: u32,

    /// Compare probabilities on every look-ahead level
    #[arg(long)]
    strict: bool,

    /// Write the PlantUML diagram of the labelled parse tree to this path
    #[arg(long, value_name = "PATH", require_equals = true)]
    state_diagram: Option<PathBuf>,

    /// Write the PlantUML diagram of the morph transitions to this path
    #[arg(long, value_name = "PATH", require_equals = true)]
    machine_diagram: Option<PathBuf>,

    /// Logging verbosity (use -v for info, or -v=LEVEL for specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = match args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let config = MorphConfig::new(args.depth, args.past, args.future)
        .map(|it| it.with_precision(args.precision))
        .map(|it| if args.strict { it.strict() } else { it })
        .unwrap_or_else(|e| {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        });

    let sequence = read_symbols(&args.file).unwrap_or_else(|e| {
        eprintln!("Failed to load sequence: {}", e);
        std::process::exit(1);
    });
    println!("Loaded {} symbols from {}.", sequence.len(), args.file);

    let machine = reconstruct(&sequence, &config).unwrap_or_else(|e| {
        eprintln!("Reconstruction failed: {}", e);
        std::process::exit(1);
    });

    print_machine(&machine);

    if let Some(path) = &args.state_diagram {
        write_diagram(&machine.state_diagram(), path).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });
        println!("State diagram written to {}.", path.display());
    }
    if let Some(path) = &args.machine_diagram {
        write_diagram(&machine.transition_diagram(), path).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });
        println!("Machine diagram written to {}.", path.display());
    }
}

fn print_machine(machine: &EpsilonMachine<char>) {
    println!("{}", machine);
    let tree = machine.tree();
    for (morph, representative) in machine.representatives().iter().enumerate() {
        println!(
            "Morph #{}: represented by {}",
            morph,
            tree.node(*representative).path_id()
        );
    }
    for (from, to, transition) in machine.transitions().iter() {
        println!(
            "({}) --[{}]--> ({}) : {:?}",
            from, transition.symbol, to, transition.probability
        );
    }
}

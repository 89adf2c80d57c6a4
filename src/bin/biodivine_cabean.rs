use biodivine_cabean::CabeanSession;
use biodivine_cabean::control::PerturbationKind;
use biodivine_cabean::engine::EngineConfig;
use biodivine_cabean::state::PartialState;
use biodivine_lib_param_bn::BooleanNetwork;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "biodivine_cabean")]
#[command(about = "Compute reprogramming strategies of a Boolean network using CABEAN")]
struct Args {
    /// Path to a Boolean network file (.aeon, .bnet, etc.)
    #[arg(value_name = "FILE")]
    file: String,

    /// What to compute
    #[arg(long, default_value = "attractors", require_equals = true)]
    mode: Mode,

    /// Temporal kind of perturbations (one-step and attractor-sequential control)
    #[arg(long, default_value = "instantaneous", require_equals = true)]
    kind: Kind,

    /// Source specification, e.g. `A=1,B=0`
    #[arg(long, require_equals = true)]
    from: Option<String>,

    /// Target specification, e.g. `A=0`
    #[arg(long, require_equals = true)]
    to: Option<String>,

    /// Initial state restriction of the attractor listing and control queries
    #[arg(long, require_equals = true)]
    initial: Option<String>,

    /// Excluded perturbations (`X+`, `X-`, or `X`), comma separated
    #[arg(long, value_delimiter = ',', require_equals = true)]
    exclude: Vec<String>,

    /// Maximum number of perturbed nodes
    #[arg(long, require_equals = true)]
    max_perturbations: Option<usize>,

    /// Maximum number of flips in state-based sequential control
    #[arg(long, default_value_t = 5, require_equals = true)]
    max_steps: u32,

    /// Number of state-based paths to enumerate (0 = all)
    #[arg(long, default_value_t = 200, require_equals = true)]
    limit: usize,

    /// Path to the CABEAN executable
    #[arg(long, default_value = "cabean", require_equals = true)]
    cabean: String,

    /// Do not repeat control queries when the engine renumbers attractors
    #[arg(long)]
    no_index_check: bool,

    /// Print raw engine output and keep temporary input files
    #[arg(long)]
    debug: bool,

    /// Logging verbosity (use -v for info, or -v=LEVEL for a specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum Mode {
    Attractors,
    OneStep,
    AttractorSequential,
    Sequential,
}

#[derive(Clone, clap::ValueEnum)]
enum Kind {
    Instantaneous,
    Temporary,
    Permanent,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<Kind> for PerturbationKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Instantaneous => PerturbationKind::Instantaneous,
            Kind::Temporary => PerturbationKind::Temporary,
            Kind::Permanent => PerturbationKind::Permanent,
        }
    }
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

fn parse_state(name: &str, value: Option<&String>) -> PartialState {
    let Some(value) = value else {
        return PartialState::new();
    };
    value.parse().unwrap_or_else(|e| {
        eprintln!("Invalid --{name} specification: {e}");
        std::process::exit(1);
    })
}

fn main() {
    let args = Args::parse();

    // Handle verbose flag: None = not specified, Some(None) = specified without value (defaults to info), Some(Some(level)) = specified with value
    let log_level = match args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let bn = BooleanNetwork::try_from_file(&args.file).unwrap_or_else(|e| {
        eprintln!("Failed to load BN file {}: {}", args.file, e);
        std::process::exit(1);
    });
    println!("Loaded BN with {} variables.", bn.num_vars());

    let mut config = EngineConfig::new(&args.cabean);
    config.debug = args.debug;
    config.check_index_stability = !args.no_index_check;

    let mut session = CabeanSession::from_network(&bn, config).unwrap_or_else(|e| {
        eprintln!("Failed to translate BN: {e}");
        std::process::exit(1);
    });

    let initial = args
        .initial
        .as_ref()
        .map(|it| parse_state("initial", Some(it)));
    let from = parse_state("from", args.from.as_ref());
    let to = parse_state("to", args.to.as_ref());
    let kind = PerturbationKind::from(args.kind);

    let configured = match session.set_initial(initial) {
        Ok(()) => session.exclude(args.exclude.as_slice()),
        Err(e) => Err(e),
    };
    if let Err(e) = configured {
        eprintln!("Invalid query: {e}");
        std::process::exit(1);
    }
    session.max_perturbations(args.max_perturbations);

    let result = match args.mode {
        Mode::Attractors => session.known_attractors().map(|attractors| {
            for (index, attractor) in attractors {
                println!("a{index} = {attractor}");
            }
            println!("Found {} attractor(s).", attractors.len());
        }),
        Mode::OneStep => session.one_step(kind, &from, &to).map(|it| print!("{it}")),
        Mode::AttractorSequential => session
            .attractor_sequential(kind, &from, &to)
            .map(|it| print!("{it}")),
        Mode::Sequential => session
            .sequential(&from, &to, args.max_steps, args.limit)
            .map(|it| print!("{it}")),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

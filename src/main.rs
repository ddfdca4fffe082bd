use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::LevelFilter;
use std::io;
use symeig::{
    eigh_with, report,
    solver::{min_workspace, NalgebraSyev, SymmetricEigensolver},
    workspace::{square_len, try_alloc},
    EigenConfig, EigenError, Job, Triangle,
};
use termcolor::{ColorChoice, StandardStream};

/// symeig: deterministic eigendecomposition of symmetric (covariance) matrices
#[derive(Parser, Debug)]
#[command(
    name = "symeig",
    about = "Eigenvalues (descending) and sign-canonical eigenvectors of a symmetric matrix",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decompose a matrix given inline in row-major order
    Decompose(DecomposeArgs),
    /// Report the scratch workspace the solver asks for at a given dimension
    Workspace(WorkspaceArgs),
}

#[derive(Args, Debug)]
struct DecomposeArgs {
    /// Matrix dimension n
    #[arg(short = 'n', long, value_name = "N")]
    dim: i32,
    /// n*n comma-separated values, row-major
    #[arg(
        long,
        value_name = "V1,V2,...",
        value_delimiter = ',',
        allow_negative_numbers = true,
        required = true
    )]
    values: Vec<f64>,
    /// Read the lower triangle instead of the upper one
    #[arg(long, default_value_t = false)]
    lower: bool,
    /// Reject inputs that are not symmetric within this relative tolerance
    #[arg(long, value_name = "TOL")]
    check_symmetry: Option<f64>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// Digits after the decimal point in table output
    #[arg(long, default_value_t = 6)]
    precision: usize,
    /// Show a coloured heatmap of the eigenvectors and eigenvalues
    #[arg(long, default_value_t = false)]
    heatmap: bool,
}

#[derive(Args, Debug)]
struct WorkspaceArgs {
    /// Matrix dimension n
    #[arg(short = 'n', long, value_name = "N")]
    dim: i32,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Table,
    Csv,
}

/// `-v` enables debug records, `-vv` and beyond trace; otherwise warnings only.
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .filter_level(log_level(verbose))
        .try_init();
}

fn run_decompose(args: &DecomposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let triangle = if args.lower {
        Triangle::Lower
    } else {
        Triangle::Upper
    };
    let mut config = EigenConfig::new(triangle);
    if let Some(tol) = args.check_symmetry {
        if tol < 0.0 {
            return Err("--check-symmetry must be non-negative".into());
        }
        config = config.with_symmetry_check(tol);
    }

    let decomp = eigh_with(&NalgebraSyev, &config, args.dim, &args.values)?;

    let stdout = io::stdout();
    match args.format {
        OutputFormat::Table => report::write_table(&decomp, stdout.lock(), args.precision)?,
        OutputFormat::Csv => report::write_csv(&decomp, stdout.lock())?,
    }

    if args.heatmap {
        let mut color_out = StandardStream::stdout(ColorChoice::Always);
        report::print_heatmap(&decomp, &mut color_out)?;
        report::print_eigenvalues_heatmap(&decomp.eigenvalues, &mut color_out)?;
    }
    Ok(())
}

fn run_workspace(args: &WorkspaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.dim <= 0 {
        return Err(format!("dimension must be positive, got {}", args.dim).into());
    }
    let n = args.dim as usize;
    let mut a = try_alloc(square_len(n, "query matrix")?, "query matrix")?;
    let mut w = try_alloc(n, "query eigenvalues")?;
    let mut work = [0.0];
    let status = NalgebraSyev.syev(
        Job::Vectors,
        Triangle::Upper,
        args.dim,
        &mut a,
        args.dim,
        &mut w,
        &mut work,
        -1,
    );
    if status != 0 {
        return Err(EigenError::SolverFailure { status }.into());
    }
    println!("n = {}", n);
    println!("minimum workspace: {}", min_workspace(n));
    println!("optimal workspace: {}", work[0] as usize);
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Decompose(args) => run_decompose(args),
        Command::Workspace(args) => run_workspace(args),
    };

    if let Err(err) = result {
        eprintln!("[symeig error] {}", err);
        std::process::exit(1);
    }
    Ok(())
}

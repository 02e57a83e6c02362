use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;
use vectorial_boolean_function::{
    table_io, DifferentialSearchConfig, PolynomialOverF2, VectorialBooleanFunction,
    VectorialBooleanFunctionImpl,
};

const TRUTH_TABLE_FILE: &str = "truth_table.tsv";
const ANF_TABLE_FILE: &str = "anf_table.tsv";
const WALSH_SPECTRUM_TABLE_FILE: &str = "walsh_spectrum_table.tsv";

#[derive(Parser, Debug)]
#[command(
    name = "vectorial_boolean_function",
    about = "Cryptographic analysis of power functions over GF(2^n)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build or load the tables of x^power, then print the selected metrics.
    Analyze {
        #[command(flatten)]
        function: FunctionArgs,
        /// Truth table to load instead of evaluating the function.
        #[arg(long)]
        truth_table: Option<PathBuf>,
        /// ANF table to load instead of computing the Möbius transform.
        #[arg(long)]
        anf_table: Option<PathBuf>,
        /// Walsh spectrum table to load instead of computing the Walsh-Hadamard transforms.
        #[arg(long)]
        walsh_spectrum_table: Option<PathBuf>,
        /// Metrics to print, comma separated (default: all).
        #[arg(long, value_enum, value_delimiter = ',')]
        metrics: Vec<Metric>,
        /// Worker count of the differential search (default: one per CPU).
        #[arg(long)]
        workers: Option<usize>,
        /// Directory where the three tables are stored after analysis.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Build the tables of x^power and store them.
    Tables {
        #[command(flatten)]
        function: FunctionArgs,
        /// Directory where the three tables are stored.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct FunctionArgs {
    /// Exponent of the power function.
    #[arg(long)]
    power: u64,
    /// Field modulus, as a decimal or 0x-prefixed hexadecimal coefficient bit vector (0x11b is x^8 + x^4 + x^3 + x + 1).
    #[arg(long, value_parser = parse_generator)]
    generator: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Metric {
    Degree,
    Disbalance,
    Nonlinearity,
    CorrelationImmunity,
    Resiliency,
    RateDistributionError,
    DifferentialProbability,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            function,
            truth_table,
            anf_table,
            walsh_spectrum_table,
            metrics,
            workers,
            output_dir,
        } => {
            let mut vbf = new_function(&function)?;
            populate_tables(
                &mut vbf,
                truth_table.as_deref(),
                anf_table.as_deref(),
                walsh_spectrum_table.as_deref(),
            )?;
            let config = match workers {
                Some(workers) => DifferentialSearchConfig::new(workers)?,
                None => DifferentialSearchConfig::default(),
            };
            print_metrics(&vbf, &metrics, &config)?;
            if let Some(output_dir) = output_dir {
                store_tables(&vbf, &output_dir)?;
            }
        }
        Commands::Tables {
            function,
            output_dir,
        } => {
            let mut vbf = new_function(&function)?;
            populate_tables(&mut vbf, None, None, None)?;
            store_tables(&vbf, &output_dir)?;
        }
    }

    Ok(())
}

fn parse_generator(value: &str) -> Result<u64, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.map_err(|error| format!("invalid generator {:?}: {}", value, error))
}

fn new_function(args: &FunctionArgs) -> Result<VectorialBooleanFunction> {
    let generator = PolynomialOverF2::new(args.generator);
    let vbf = VectorialBooleanFunction::new(args.power, generator)
        .with_context(|| format!("invalid field modulus {}", generator))?;
    info!(
        power = args.power,
        field_extension = vbf.field_extension(),
        "analyzing x^{} mod {}",
        args.power,
        generator
    );
    Ok(vbf)
}

fn populate_tables(
    vbf: &mut VectorialBooleanFunction,
    truth_table: Option<&Path>,
    anf_table: Option<&Path>,
    walsh_spectrum_table: Option<&Path>,
) -> Result<()> {
    match truth_table {
        Some(path) => vbf.load_truth_table(table_io::read_truth_table(open(path)?)?)?,
        None => vbf.create_truth_table()?,
    }
    match anf_table {
        Some(path) => vbf.load_anf_table(table_io::read_anf_table(open(path)?)?)?,
        None => vbf.create_anf_table()?,
    }
    match walsh_spectrum_table {
        Some(path) => {
            vbf.load_walsh_spectrum_table(table_io::read_walsh_spectrum_table(open(path)?)?)?
        }
        None => vbf.create_walsh_spectrum_table()?,
    }
    Ok(())
}

fn print_metrics(
    vbf: &VectorialBooleanFunction,
    metrics: &[Metric],
    config: &DifferentialSearchConfig,
) -> Result<()> {
    let selected = |metric: Metric| metrics.is_empty() || metrics.contains(&metric);

    if selected(Metric::Degree) {
        println!("algebraic degree\t{:?}", vbf.algebraic_degree()?);
        println!("max algebraic degree\t{}", vbf.max_algebraic_degree()?);
    }
    if selected(Metric::Disbalance) {
        println!("disbalance\t{:?}", vbf.disbalance()?);
    }
    if selected(Metric::Nonlinearity) {
        println!("nonlinearity\t{:?}", vbf.nonlinearity()?);
    }
    if selected(Metric::CorrelationImmunity) {
        println!("correlation immunity\t{:?}", vbf.correlation_immunity()?);
    }
    if selected(Metric::Resiliency) {
        println!("resiliency order\t{:?}", vbf.resiliency_order()?);
    }
    if selected(Metric::RateDistributionError) {
        let rde = vbf.rate_distribution_error()?;
        let deviation = vbf.relative_deviation_of_rde(&rde)?;
        println!("rate distribution error (multivariate)\t{:?}", rde.multivariate);
        println!("rate distribution error (univariate)\t{:?}", rde.univariate);
        println!("relative deviation % (multivariate)\t{:.2?}", deviation.multivariate);
        println!("relative deviation % (univariate)\t{:.2?}", deviation.univariate);
        println!(
            "strict avalanche criterion\t{}",
            rde.satisfies_strict_avalanche_criterion()
        );
    }
    if selected(Metric::DifferentialProbability) {
        let mdp = vbf
            .maximum_differential_probability(config)
            .context("differential search failed")?;
        println!("maximum differential probability\t{} = {}", mdp, mdp.value());
    }
    Ok(())
}

fn store_tables(vbf: &VectorialBooleanFunction, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    table_io::write_truth_table(create(&output_dir.join(TRUTH_TABLE_FILE))?, vbf.truth_table())?;
    table_io::write_anf_table(create(&output_dir.join(ANF_TABLE_FILE))?, vbf.anf_table())?;
    table_io::write_walsh_spectrum_table(
        create(&output_dir.join(WALSH_SPECTRUM_TABLE_FILE))?,
        vbf.walsh_spectrum_table(),
    )?;
    info!(output_dir = %output_dir.display(), "tables stored");
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

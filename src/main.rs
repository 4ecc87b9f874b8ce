use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use realign::environment::{EnvironmentCombined, ReadEnvironment, TemplateEnvironment};
use realign::matrix::{
    AllPaths, DeltaMatrix, ScoreFastUnderflow, ScoreFastUnderflowCg, ScoreFastUnderflowHomopolymer,
    ScoreMatrix, ScoreMatrixCg, ScoreMatrixCgReverse, ScoreMatrixHomopolymer, ScoreMatrixReverse,
};
use realign::params::{
    HomopolymerParams, LiteralRealignParams, MachineType, RealignParams, RealignParamsGenome,
};
use realign::{
    AlignmentRecord, ArithmeticKind, LogApproximatePossibility, LogPossibility,
    PossibilityArithmetic, SimplePossibility,
};

#[derive(Parser, Debug)]
#[command(name = "realign", about = "Diagnostic harness for the all-paths realignment matrices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Populate one matrix and print its total score.
    Score {
        #[command(flatten)]
        input: InputArgs,
        /// Matrix variant to populate.
        #[arg(long, value_enum, default_value_t = MatrixKind::Standard)]
        matrix: MatrixKind,
        /// Homopolymer counts file (homopolymer matrices only).
        #[arg(long)]
        calibration: Option<PathBuf>,
        /// Print every cell after the score.
        #[arg(long)]
        show_matrix: bool,
    },
    /// Print the posterior rendering of the standard matrix.
    Delta {
        #[command(flatten)]
        input: InputArgs,
        /// Dominant state and one decimal per cell instead of one digit.
        #[arg(long)]
        dense: bool,
    },
    /// Validate a homopolymer counts file and summarise it.
    Calibration {
        /// Counts file (`tag  template-length  count...` per line).
        path: PathBuf,
        /// Attribute counts to the complement base.
        #[arg(long)]
        complement: bool,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Template sequence.
    #[arg(long)]
    template: String,
    /// Read sequence.
    #[arg(long)]
    read: String,
    /// Comma-separated Phred qualities, one per read base.
    #[arg(long, value_delimiter = ',')]
    phred: Vec<u8>,
    /// Phred quality used when `--phred` is omitted.
    #[arg(long, default_value_t = 20)]
    default_phred: u8,
    /// Template offset of the expected first read base.
    #[arg(long, default_value_t = 0)]
    start: isize,
    /// Band half-width.
    #[arg(long, default_value_t = 5)]
    max_shift: usize,
    /// Possibility domain: log, approx or simple.
    #[arg(long, default_value = "log")]
    arithmetic: ArithmeticKind,
    /// Sequencing machine of the read.
    #[arg(long, value_enum, default_value_t = Machine::IlluminaPe)]
    machine: Machine,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MatrixKind {
    Standard,
    Reverse,
    Fast,
    Cg,
    CgReverse,
    FastCg,
    Homopolymer,
    FastHomopolymer,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Machine {
    IlluminaPe,
    IlluminaSe,
    CompleteGenomics,
    CompleteGenomics2,
    IonTorrent,
}

impl From<Machine> for MachineType {
    fn from(machine: Machine) -> Self {
        match machine {
            Machine::IlluminaPe => MachineType::IlluminaPe,
            Machine::IlluminaSe => MachineType::IlluminaSe,
            Machine::CompleteGenomics => MachineType::CompleteGenomics,
            Machine::CompleteGenomics2 => MachineType::CompleteGenomics2,
            Machine::IonTorrent => MachineType::IonTorrent,
        }
    }
}

type Env = EnvironmentCombined<ReadEnvironment, TemplateEnvironment>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Score {
            input,
            matrix,
            calibration,
            show_matrix,
        } => run_score(&input, matrix, calibration, show_matrix)?,
        Commands::Delta { input, dense } => run_delta(&input, dense)?,
        Commands::Calibration { path, complement } => run_calibration(path, complement)?,
    }
    Ok(())
}

fn build_env(input: &InputArgs) -> Result<Env> {
    let qualities = if input.phred.is_empty() {
        vec![input.default_phred; input.read.len()]
    } else {
        input.phred.clone()
    };
    let record = AlignmentRecord::new(
        input.start as i64,
        input.read.to_ascii_uppercase().into_bytes(),
        qualities,
        false,
        input.machine.into(),
    );
    let read = ReadEnvironment::from_record(&record).context("invalid read")?;
    let template = TemplateEnvironment::from_sequence(&input.template.to_ascii_uppercase())
        .context("invalid template")?;
    Ok(EnvironmentCombined::new(read, input.start, input.max_shift, template))
}

fn build_params(machine: MachineType) -> Result<Box<dyn RealignParams>> {
    Ok(match machine {
        MachineType::CompleteGenomics => Box::new(LiteralRealignParams::cg_v1()?),
        MachineType::CompleteGenomics2 => Box::new(LiteralRealignParams::cg_v2()?),
        other => Box::new(RealignParamsGenome::for_machine(other)),
    })
}

fn load_calibration(path: Option<PathBuf>) -> Result<Arc<HomopolymerParams>> {
    let Some(path) = path else {
        bail!("homopolymer matrices need --calibration");
    };
    let table = HomopolymerParams::from_path(&path, false)
        .with_context(|| format!("failed to load calibration from {}", path.display()))?;
    Ok(Arc::new(table))
}

fn report<M: AllPaths>(mut matrix: M, env: &Env, show_matrix: bool) -> Result<()> {
    matrix.set_env(env).context("matrix population failed")?;
    println!("total_score_ln\t{:.6}", matrix.total_score_ln());
    println!("underflow\t{}", matrix.underflow());
    if show_matrix {
        print!("{}", matrix);
    }
    Ok(())
}

fn score_in<A>(
    input: &InputArgs,
    env: &Env,
    params: &dyn RealignParams,
    kind: MatrixKind,
    calibration: Option<PathBuf>,
    show_matrix: bool,
) -> Result<()>
where
    A: PossibilityArithmetic + Default + Copy,
{
    info!(matrix = ?kind, arithmetic = %input.arithmetic, "scoring read");
    match kind {
        MatrixKind::Standard => report(ScoreMatrix::<A>::new(params), env, show_matrix),
        MatrixKind::Reverse => report(ScoreMatrixReverse::<A>::new(params), env, show_matrix),
        MatrixKind::Cg => report(ScoreMatrixCg::<A>::new(params)?, env, show_matrix),
        MatrixKind::CgReverse => report(ScoreMatrixCgReverse::<A>::new(params)?, env, show_matrix),
        MatrixKind::Homopolymer => report(
            ScoreMatrixHomopolymer::<A>::new(params, load_calibration(calibration)?),
            env,
            show_matrix,
        ),
        MatrixKind::Fast => report(ScoreFastUnderflow::new(params), env, show_matrix),
        MatrixKind::FastCg => report(ScoreFastUnderflowCg::new(params)?, env, show_matrix),
        MatrixKind::FastHomopolymer => report(
            ScoreFastUnderflowHomopolymer::new(params, load_calibration(calibration)?),
            env,
            show_matrix,
        ),
    }
}

fn run_score(
    input: &InputArgs,
    kind: MatrixKind,
    calibration: Option<PathBuf>,
    show_matrix: bool,
) -> Result<()> {
    let env = build_env(input)?;
    let params = build_params(input.machine.into())?;
    let params = params.as_ref();
    match input.arithmetic {
        ArithmeticKind::Log => {
            score_in::<LogPossibility>(input, &env, params, kind, calibration, show_matrix)
        }
        ArithmeticKind::LogApproximate => score_in::<LogApproximatePossibility>(
            input,
            &env,
            params,
            kind,
            calibration,
            show_matrix,
        ),
        ArithmeticKind::Simple => {
            score_in::<SimplePossibility>(input, &env, params, kind, calibration, show_matrix)
        }
    }
}

fn render<A: PossibilityArithmetic + Default + Copy>(
    env: &Env,
    params: &dyn RealignParams,
    dense: bool,
) -> Result<String> {
    let mut matrix = DeltaMatrix::<A>::new(params);
    matrix.set_env(env).context("matrix population failed")?;
    Ok(if dense { matrix.render_dense() } else { matrix.render_terse() })
}

fn run_delta(input: &InputArgs, dense: bool) -> Result<()> {
    let env = build_env(input)?;
    let params = build_params(input.machine.into())?;
    let params = params.as_ref();
    let text = match input.arithmetic {
        ArithmeticKind::Log => render::<LogPossibility>(&env, params, dense)?,
        ArithmeticKind::LogApproximate => render::<LogApproximatePossibility>(&env, params, dense)?,
        ArithmeticKind::Simple => render::<SimplePossibility>(&env, params, dense)?,
    };
    print!("{}", text);
    Ok(())
}

fn run_calibration(path: PathBuf, complement: bool) -> Result<()> {
    let table = HomopolymerParams::from_path(&path, complement)
        .with_context(|| format!("failed to load calibration from {}", path.display()))?;
    println!("entries\t{}", table.len());
    println!("complement\t{}", table.is_complement());
    for (name, base) in [("A", b'A'), ("C", b'C'), ("G", b'G'), ("T", b'T')] {
        let code = realign::dna::encode(base).unwrap_or(realign::dna::N);
        match table.max_template_length(code) {
            Some(length) => println!("{}\tmax_template_length\t{}", name, length),
            None => println!("{}\tmax_template_length\t-", name),
        }
    }
    Ok(())
}

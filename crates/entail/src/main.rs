//! entail CLI: check the queries of a `.kb` file by forward chaining or
//! resolution refutation.

use clap::{Args, Parser, Subcommand};
use entail::json::{QueryReportJson, Verdict};
use entail::{
    forward_chain, parse_file, parse_literal, resolve, EngineConfig, EntailError, Literal, Proof,
    Program, Result,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "entail", version, about = "First-order entailment checker")]
struct Cli {
    /// TOML file with [forward] and [resolution] budgets. Flags override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Saturate facts under definite rules until each query is derived.
    Forward {
        #[command(flatten)]
        run: RunArgs,

        /// Maximum number of known facts (0 = unlimited).
        #[arg(long)]
        max_facts: Option<usize>,
    },

    /// Refute the negated query by pairwise resolution.
    Resolve {
        #[command(flatten)]
        run: RunArgs,

        /// Maximum number of stored clauses (0 = unlimited).
        #[arg(long)]
        max_clauses: Option<usize>,

        /// Re-examine clause pairs from earlier rounds.
        #[arg(long)]
        no_memo: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Knowledge base in `.kb` format.
    file: PathBuf,

    /// Extra query literal, e.g. "Mortal(Marcus)". May be repeated.
    #[arg(long = "query", short)]
    queries: Vec<String>,

    /// Maximum number of rounds (0 = unlimited).
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Wall-clock limit per query in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print every derived fact or clause.
    #[arg(long)]
    trace: bool,

    /// Emit results as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(answers) if answers.iter().all(|a| a.report.result == Verdict::Proved) => {
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// One checked query: its report plus the proof, if resolution found one
struct Answer {
    report: QueryReportJson,
    proof: Option<Proof>,
}

fn run(cli: &Cli) -> Result<Vec<Answer>> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let (args, answers) = match &cli.command {
        Commands::Forward { run, max_facts } => {
            let forward = &mut config.forward;
            if let Some(n) = run.max_rounds {
                forward.max_rounds = n;
            }
            if let Some(n) = *max_facts {
                forward.max_facts = n;
            }
            if run.timeout_ms.is_some() {
                forward.timeout_ms = run.timeout_ms;
            }

            let (program, queries) = load(run)?;
            let kb = program.to_horn()?;
            let mut answers = Vec::with_capacity(queries.len());
            for query in &queries {
                let result = forward_chain(&kb, query, &config.forward)?;
                answers.push(Answer {
                    report: QueryReportJson::from_forward(query, &result),
                    proof: None,
                });
            }
            (run, answers)
        }
        Commands::Resolve {
            run,
            max_clauses,
            no_memo,
        } => {
            let resolution = &mut config.resolution;
            if let Some(n) = run.max_rounds {
                resolution.max_rounds = n;
            }
            if let Some(n) = *max_clauses {
                resolution.max_clauses = n;
            }
            if run.timeout_ms.is_some() {
                resolution.timeout_ms = run.timeout_ms;
            }
            if *no_memo {
                resolution.memoize_pairs = false;
            }

            let (program, queries) = load(run)?;
            let kb = program.to_clauses()?;
            let mut answers = Vec::with_capacity(queries.len());
            for query in &queries {
                let result = resolve(&kb, query, &config.resolution)?;
                answers.push(Answer {
                    report: QueryReportJson::from_resolution(query, &result),
                    proof: result.proof().cloned(),
                });
            }
            (run, answers)
        }
    };

    if args.json {
        let reports: Vec<&QueryReportJson> = answers.iter().map(|a| &a.report).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for answer in &answers {
            print_answer(answer, args.trace);
        }
    }
    Ok(answers)
}

/// Parse the input file and collect its queries followed by `--query` ones
fn load(args: &RunArgs) -> Result<(Program, Vec<Literal>)> {
    let program = parse_file(&args.file)?;
    let mut queries = program.queries.clone();
    for text in &args.queries {
        queries.push(parse_literal(text)?);
    }
    if queries.is_empty() {
        return Err(no_queries(&args.file));
    }
    Ok((program, queries))
}

fn no_queries(path: &Path) -> EntailError {
    EntailError::Parse(format!(
        "{}: no `?-` query in the file and none given with --query",
        path.display()
    ))
}

fn print_answer(answer: &Answer, trace: bool) {
    let report = &answer.report;
    println!("?- {}", report.query);
    if trace {
        for line in &report.derived {
            println!("  {}", line);
        }
    }
    if let Some(proof) = &answer.proof {
        for line in proof.to_string().lines() {
            println!("  {}", line);
        }
    }
    match (&report.result, &report.reason) {
        (Verdict::Proved, _) => println!("proved ({} rounds)", report.rounds),
        (Verdict::NotEntailed, _) => println!("not entailed ({} rounds)", report.rounds),
        (Verdict::Inconclusive, Some(reason)) => println!("inconclusive: {}", reason),
        (Verdict::Inconclusive, None) => println!("inconclusive"),
    }
}

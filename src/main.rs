//! School Choice - Binary Entry Point
//!
//! Prints the three mechanisms' matchings on one sample market, then
//! compares them over many random markets.
//!
//! ```bash
//! school-choice --trials 5000 --seed 7
//! RUST_LOG=school_choice=debug school-choice --students 30 --schools 5 --capacity 6
//! ```

use clap::Parser;
use tracing::info;

use school_choice::config::{
    MarketConfig, SimulationConfig, DEFAULT_CAPACITY, DEFAULT_SCHOOLS, DEFAULT_SEED,
    DEFAULT_STUDENTS, DEFAULT_TRIALS,
};
use school_choice::simulation::report::{MatchingReport, SummaryTable};
use school_choice::simulation::{generate_market, run_simulation, solve_all, trial_rng};
use school_choice::{Error, RankIndex};

/// School choice mechanism comparison
#[derive(Parser, Debug)]
#[command(name = "school-choice")]
#[command(about = "Compare DA, Boston, and TTC on random school choice markets")]
#[command(version)]
struct Args {
    /// Number of students
    #[arg(long, env = "SIM_STUDENTS", default_value_t = DEFAULT_STUDENTS)]
    students: usize,

    /// Number of schools
    #[arg(long, env = "SIM_SCHOOLS", default_value_t = DEFAULT_SCHOOLS)]
    schools: usize,

    /// Seats at every school
    #[arg(long, env = "SIM_CAPACITY", default_value_t = DEFAULT_CAPACITY as i64, allow_negative_numbers = true)]
    capacity: i64,

    /// Number of random markets to average over
    #[arg(long, env = "SIM_TRIALS", default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Base RNG seed
    #[arg(long, env = "SIM_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Skip the single-market printout
    #[arg(long)]
    skip_example: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let capacities = vec![args.capacity; args.schools];
    let config = SimulationConfig {
        market: MarketConfig::new(args.students, &capacities)?,
        trials: args.trials,
        seed: args.seed,
    };

    if !args.skip_example {
        print_example(&config)?;
    }

    let summary = run_simulation(&config)?;
    println!("Average rank over {} markets", summary.trials);
    println!();
    println!("{}", SummaryTable::new(&summary));
    Ok(())
}

/// Print every mechanism's matching on the market of trial 0.
fn print_example(config: &SimulationConfig) -> Result<(), Error> {
    let mut rng = trial_rng(config.seed, 0);
    let market = generate_market(&config.market, &mut rng)?;
    let ranks = RankIndex::build(&market);

    for (mechanism, result) in solve_all(&market, &ranks)? {
        info!(%mechanism, steps = result.steps, "example market solved");
        println!("{}", MatchingReport::new(mechanism.name(), &market, &result.matching));
    }
    Ok(())
}

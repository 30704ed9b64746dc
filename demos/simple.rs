use clap::Parser;

use petri_bdd::analysis::Analysis;
use petri_bdd::bdd::Bdd;
use petri_bdd::builder::NetBuilder;
use petri_bdd::config::AnalysisConfig;
use petri_bdd::encoder::SymbolicEncoder;
use petri_bdd::fixpoint::SymbolicReachability;
use petri_bdd::marking::Objective;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Objective weights, one per place.
    #[arg(long, value_delimiter = ',', default_value = "1,1")]
    objective: Vec<i64>,

    /// Print the reachable set in DOT format.
    #[arg(long)]
    dot: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    // p0 --t0--> p1
    let net = NetBuilder::new()
        .place("p0", 1)
        .place("p1", 0)
        .transition("t0")
        .arc("p0", "t0")
        .arc("t0", "p1")
        .build()?;

    let bdd = Bdd::default();
    let config = AnalysisConfig {
        objective: Some(Objective::new(args.objective)),
        ..AnalysisConfig::default()
    };
    let report = Analysis::new(config).run_with(&bdd, &net);
    println!("{}", report);

    if args.dot {
        let encoder = SymbolicEncoder::new(&bdd, &net)?;
        let reach = SymbolicReachability::new(&encoder).compute();
        println!("{}", encoder.to_dot(&[("reachable", *reach.reachable)])?);
    }

    Ok(())
}

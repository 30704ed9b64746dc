use clap::Parser;
use color_eyre::eyre::ensure;

use petri_bdd::analysis::Analysis;
use petri_bdd::builder::NetBuilder;
use petri_bdd::config::AnalysisConfig;
use petri_bdd::net::NetModel;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of philosophers.
    #[arg(value_name = "INT", default_value = "5")]
    n: usize,

    /// BDD size (in bits, so the actual size is `2^size` nodes).
    #[clap(long, value_name = "INT", default_value = "20")]
    size: usize,

    /// Collect garbage every this many fixpoint iterations.
    #[clap(long, value_name = "INT")]
    gc: Option<usize>,

    /// Accept deadlock witnesses without the 0/1 program check.
    #[clap(long)]
    no_solver: bool,

    /// Cap on explicitly enumerated markings.
    #[clap(long, value_name = "INT")]
    limit: Option<usize>,
}

/// Philosopher `i` picks up fork `i`, then fork `i+1`, eats, and puts both back.
/// Everyone holding their left fork is a deadlock.
fn philosophers(n: usize) -> color_eyre::Result<NetModel> {
    let mut b = NetBuilder::new();
    for i in 0..n {
        b = b
            .place(format!("think{}", i), 1)
            .place(format!("left{}", i), 0)
            .place(format!("eat{}", i), 0)
            .place(format!("fork{}", i), 1);
    }
    for i in 0..n {
        let j = (i + 1) % n;
        b = b
            .transition(format!("take_left{}", i))
            .arc(format!("think{}", i), format!("take_left{}", i))
            .arc(format!("fork{}", i), format!("take_left{}", i))
            .arc(format!("take_left{}", i), format!("left{}", i))
            .transition(format!("take_right{}", i))
            .arc(format!("left{}", i), format!("take_right{}", i))
            .arc(format!("fork{}", j), format!("take_right{}", i))
            .arc(format!("take_right{}", i), format!("eat{}", i))
            .transition(format!("release{}", i))
            .arc(format!("eat{}", i), format!("release{}", i))
            .arc(format!("release{}", i), format!("think{}", i))
            .arc(format!("release{}", i), format!("fork{}", i))
            .arc(format!("release{}", i), format!("fork{}", j));
    }
    Ok(b.build()?)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);
    ensure!(args.n >= 2, "need at least two philosophers, got {}", args.n);

    let net = philosophers(args.n)?;
    println!(
        "net: {} places, {} transitions",
        net.num_places(),
        net.num_transitions()
    );

    let config = AnalysisConfig {
        storage_bits: args.size,
        gc_interval: args.gc,
        max_explicit_markings: args.limit,
        confirm_with_solver: !args.no_solver,
        ..AnalysisConfig::default()
    };
    let report = Analysis::new(config).run(&net);
    println!("{}", report);

    if let Some(growth) = report.symbolic.as_ref().ok().map(|s| &s.growth) {
        println!(
            "growth: {}",
            growth
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );
    }

    println!("total time: {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}

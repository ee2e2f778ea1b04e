//! Repeated path queries on a partly blocked 3-D graph.
//!
//! Run: cargo run --bin wave-demo [lattice|scatter] [seed]

use navgraph_demos::{Layout, Scenario};

fn main() {
    let mut args = std::env::args().skip(1);
    let layout = match args.next().as_deref() {
        None | Some("lattice") => Layout::Lattice { n: 16, depth: 4 },
        Some("scatter") => Layout::Scatter {
            count: 600,
            extent: 20.0,
            radius: 4.5,
        },
        Some(other) => {
            eprintln!("Error: unknown layout {other:?} (expected lattice or scatter)");
            std::process::exit(2);
        }
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        None => 7,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            eprintln!("Error: bad seed: {e}");
            std::process::exit(2);
        }
    };

    let scenario = Scenario {
        layout,
        seed,
        ..Scenario::default()
    };
    let report = match scenario.run() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("graph:        {} nodes, {} arcs", report.nodes, report.arcs);
    println!(
        "queries:      {} found, {} not found",
        report.found, report.not_found
    );
    println!("cache hits:   {}", report.cache_hits);
    println!("A* fallbacks: {}", report.fallbacks);
    println!("relaxations:  {}", report.relaxations);
    println!("mutations:    {}", report.mutations);
    for (target, n) in report.tally.popular() {
        let c = report.tally.get(target);
        println!(
            "  target {target}: {n} queries, {} found, {} hops total",
            c.found, c.hops
        );
    }
}

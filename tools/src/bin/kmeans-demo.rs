use anyhow::Context as _;
use anyhow::Result;
use itertools::Itertools as _;

const USAGE: &str = "Usage: kmeans-demo [options] >out.clusters";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt("k", "clusters", "number of clusters (default: 7)", "COUNT");
    options.optopt("n", "points", "number of points per group (default: 100)", "COUNT");
    options.optopt("r", "restarts", "number of restarts (default: 10)", "COUNT");
    options.optopt("s", "seed", "seed of the random generator (default: 10)", "SEED");
    options.optopt("t", "trace", "emit a chrome trace", "FILE");

    let matches = lloyd_tools::parse_args(options, USAGE, 0)?;

    let _chrome_trace_guard = lloyd_tools::init_tracing(matches.opt_str("t"));

    let cluster_count = matches
        .opt_get_default("k", 7)
        .context("invalid value for -k, --clusters")?;
    let group_size = matches
        .opt_get_default("n", 100)
        .context("invalid value for -n, --points")?;
    let restart_count = matches
        .opt_get_default("r", 10)
        .context("invalid value for -r, --restarts")?;
    let seed = matches
        .opt_get_default("s", 10)
        .context("invalid value for -s, --seed")?;

    let mut rng = lloyd_tools::rng(Some(seed));
    let points = lloyd_tools::demo_points(&mut rng, group_size);

    let partition = lloyd::k_means(&points, cluster_count, restart_count, rng)
        .context("failed to cluster points")?;

    println!("[{}]", partition.iter().format(", "));

    Ok(())
}

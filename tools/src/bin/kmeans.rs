use anyhow::Context as _;
use anyhow::Result;
use lloyd::Partition as _;

const USAGE: &str = "Usage: kmeans [options] [in-points [out-clusters]] <in.points >out.clusters";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt("i", "max-iter", "maximum number of passes per restart", "COUNT");
    options.optopt("k", "clusters", "number of clusters", "COUNT");
    options.optopt("r", "restarts", "number of restarts (default: 1)", "COUNT");
    options.optopt("s", "seed", "seed of the random generator", "SEED");
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
    options.optflag("v", "verbose", "print diagnostic data");

    let matches = lloyd_tools::parse_args(options, USAGE, 2)?;

    let _chrome_trace_guard = lloyd_tools::init_tracing(matches.opt_str("t"));

    let cluster_count: usize = matches
        .opt_get("k")
        .context("invalid value for -k, --clusters")?
        .context("missing required option 'clusters'")?;
    let seed: Option<u64> = matches
        .opt_get("s")
        .context("invalid value for -s, --seed")?;

    let mut algorithm = lloyd::KMeans::new(lloyd_tools::rng(seed), cluster_count);
    if let Some(restart_count) = matches
        .opt_get("r")
        .context("invalid value for -r, --restarts")?
    {
        algorithm.restart_count = restart_count;
    }
    if let Some(max_iter) = matches
        .opt_get("i")
        .context("invalid value for -i, --max-iter")?
    {
        algorithm.max_iter = max_iter;
    }

    let input = lloyd_tools::reader(matches.free.first())?;
    let points = lloyd_tools::read_points(input).context("failed to read points")?;

    let mut partition = vec![0; points.len()];
    let metadata = algorithm
        .partition(&mut partition, &points[..])
        .context("failed to cluster points")?;

    if matches.opt_present("v") {
        eprintln!("kmeans: {metadata:?}");
    }

    let output = lloyd_tools::writer(matches.free.get(1))?;
    lloyd_tools::write_clusters(output, &partition).context("failed to write clusters")?;

    Ok(())
}

use anyhow::Context as _;
use anyhow::Result;
use lloyd::Point3D;
use lloyd::PointXD;
use rand::Rng;
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use std::env;
use std::fs;
use std::io;
use std::process;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;

/// Parse the command-line arguments with the given options, plus `-h`.
///
/// Prints the usage and exits when `-h` is given.
pub fn parse_args(
    mut options: getopts::Options,
    usage: &str,
    max_free_args: usize,
) -> Result<getopts::Matches> {
    options.optflag("h", "help", "print this help menu");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(usage));
        process::exit(0);
    }
    if matches.free.len() > max_free_args {
        anyhow::bail!("too many arguments\n\n{}", options.usage(usage));
    }

    Ok(matches)
}

/// Install the tracing subscriber, filtered by the `LOG` environment variable.
///
/// When `trace_file` is given, a chrome trace is also written to it.  The
/// returned guard must be kept alive until the end of the program.
pub fn init_tracing(trace_file: Option<String>) -> Option<tracing_chrome::FlushGuard> {
    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_thread_ids(true)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    match trace_file {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Seeded generator, or one seeded from the OS when `seed` is `None`.
pub fn rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    }
}

/// Open the given file, or stdin.
pub fn reader(filename: Option<&String>) -> Result<Box<dyn io::BufRead>> {
    Ok(match filename {
        Some(filename) => {
            let file = fs::File::open(filename)
                .with_context(|| format!("failed to open {filename:?}"))?;
            Box::new(io::BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    })
}

/// Create the given file, or use stdout.
pub fn writer(filename: Option<&String>) -> Result<Box<dyn io::Write>> {
    Ok(match filename {
        Some(filename) => {
            let file = fs::File::create(filename)
                .with_context(|| format!("failed to create {filename:?}"))?;
            Box::new(io::BufWriter::new(file))
        }
        None => Box::new(io::BufWriter::new(io::stdout().lock())),
    })
}

/// Read one point per line, as whitespace-separated coordinates.
///
/// Blank lines and lines starting with `#` are skipped.  All points must have
/// the same number of coordinates.
pub fn read_points(r: impl io::BufRead) -> Result<Vec<PointXD>> {
    let mut points = Vec::new();
    let mut dimension = None;

    for (line_idx, line) in r.lines().enumerate() {
        let lineno = line_idx + 1;
        let line = line.with_context(|| format!("failed to read line {lineno}"))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let coordinates = line
            .split_whitespace()
            .map(|word| {
                word.parse::<f64>()
                    .with_context(|| format!("line {lineno}: {word:?} is not a valid float"))
            })
            .collect::<Result<Vec<f64>>>()?;

        match dimension {
            None => dimension = Some(coordinates.len()),
            Some(dimension) if dimension != coordinates.len() => anyhow::bail!(
                "line {lineno}: expected {dimension} coordinates, found {}",
                coordinates.len(),
            ),
            Some(_) => {}
        }

        points.push(PointXD::from_vec(coordinates));
    }

    Ok(points)
}

/// Write one cluster ID per line.
pub fn write_clusters(mut w: impl io::Write, clusters: &[usize]) -> Result<()> {
    for cluster in clusters {
        writeln!(w, "{cluster}")?;
    }
    w.flush()?;
    Ok(())
}

/// Three groups of `group_size` points, whose coordinates are three distinct
/// integers taken from `[0, 50)`, `[50, 100)` and `[100, 150)` respectively.
pub fn demo_points(rng: &mut impl Rng, group_size: usize) -> Vec<Point3D> {
    [0, 50, 100]
        .into_iter()
        .flat_map(|offset| {
            (0..group_size)
                .map(|_| {
                    let coordinates = rand::seq::index::sample(&mut *rng, 50, 3);
                    Point3D::from_iterator(
                        coordinates
                            .into_iter()
                            .map(|coordinate| (offset + coordinate) as f64),
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools as _;

    #[test]
    fn test_read_points() {
        let input = "# x y z\n1 2 3\n\n  -4.5\t0 1e3  \n# done\n";
        let points = read_points(input.as_bytes()).unwrap();
        assert_eq!(
            points,
            [
                PointXD::from_vec(vec![1., 2., 3.]),
                PointXD::from_vec(vec![-4.5, 0., 1000.]),
            ],
        );
    }

    #[test]
    fn test_read_points_empty() {
        let points = read_points("\n# nothing\n".as_bytes()).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_read_points_ragged() {
        let err = read_points("1 2\n3 4\n5 6 7\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 3: expected 2 coordinates, found 3");
    }

    #[test]
    fn test_read_points_invalid() {
        let err = read_points("1 2\n3 four\n".as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{err}");
    }

    #[test]
    fn test_write_clusters() {
        let mut output = Vec::new();
        write_clusters(&mut output, &[0, 2, 1, 0]).unwrap();
        assert_eq!(output, b"0\n2\n1\n0\n");
    }

    proptest::proptest!(
        #[test]
        fn demo_points_within_groups(seed: u64, group_size in 1..50_usize) {
            let points = demo_points(&mut rng(Some(seed)), group_size);
            proptest::prop_assert_eq!(points.len(), 3 * group_size);
            for (group, points) in points.chunks(group_size).enumerate() {
                let range = (50 * group) as f64..(50 * group + 50) as f64;
                for point in points {
                    proptest::prop_assert!(point.iter().all(|coord| range.contains(coord)));
                    proptest::prop_assert!(point.iter().map(|coord| *coord as i64).all_unique());
                }
            }
        }
    );
}

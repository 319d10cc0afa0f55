//! Lloyd's k-means algorithm, with multiple random restarts.
//!
//! Each restart draws distinct initial centres from the point set, then
//! alternates between assigning points to their nearest centre and moving
//! centres to the mean of their points, for as long as the clustering cost
//! (the sum of point-to-centre distances) strictly decreases.  The clustering
//! of the cheapest restart is kept.

use super::Error;
use crate::Point;
use itertools::Itertools as _;
use nalgebra::allocator::Allocator;
use nalgebra::DefaultAllocator;
use nalgebra::Dim;
use rand::Rng;
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use rayon::iter::IndexedParallelIterator as _;
use rayon::iter::IntoParallelIterator as _;
use rayon::iter::ParallelIterator as _;
use std::cmp::Ordering;

mod assign;
mod update;

pub use assign::assign_points;
pub use update::update_centres;

const MAX_ITER: usize = 500;
const MAX_SEED_ATTEMPTS: usize = 1000;

#[derive(Clone, Copy, Debug)]
struct Settings {
    cluster_count: usize,
    max_iter: usize,
    max_seed_attempts: usize,
}

/// Outcome of a single restart.
#[derive(Debug)]
struct Restart {
    cost: f64,
    initial_cost: f64,
    cluster_ids: Vec<usize>,
    iterations: usize,
    seed_rejections: usize,
}

/// IDs of one point per distinct location, in lexicographic order of their
/// coordinates.
fn distinct_points<D>(points: &[Point<D>]) -> Vec<usize>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
{
    // Adding zero maps -0.0 to 0.0, which compare equal.
    let lexicographic = |a: &Point<D>, b: &Point<D>| {
        a.iter()
            .zip(b.iter())
            .map(|(a, b)| (a + 0.0).total_cmp(&(b + 0.0)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    };
    let mut point_ids: Vec<usize> = (0..points.len()).collect();
    point_ids.sort_by(|&a, &b| lexicographic(&points[a], &points[b]));
    point_ids.dedup_by(|a, b| points[*a] == points[*b]);
    point_ids
}

/// Draw `cluster_count` points at random, without replacement, until they all
/// have different coordinates.
///
/// After `max_attempts` rejected draws, the centres are drawn from
/// `distinct_ids` instead, which must hold at least `cluster_count` IDs of
/// points with different coordinates.
///
/// Returns the centres and the number of rejected draws.
fn seed_centres<D, R>(
    points: &[Point<D>],
    distinct_ids: &[usize],
    cluster_count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> (Vec<Point<D>>, usize)
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
    R: Rng,
{
    debug_assert!(cluster_count <= distinct_ids.len());
    for attempt in 0..max_attempts {
        let centres: Vec<Point<D>> =
            rand::seq::index::sample(&mut *rng, points.len(), cluster_count)
                .into_iter()
                .map(|point_id| points[point_id].clone())
                .collect();
        if centres.iter().tuple_combinations().all(|(a, b)| a != b) {
            return (centres, attempt);
        }
        tracing::trace!(attempt, "initial centres are not distinct, drawing again");
    }
    tracing::debug!(
        max_attempts,
        "no distinct draw found, drawing among distinct locations",
    );
    let centres = rand::seq::index::sample(&mut *rng, distinct_ids.len(), cluster_count)
        .into_iter()
        .map(|distinct_id| points[distinct_ids[distinct_id]].clone())
        .collect();
    (centres, max_attempts)
}

fn restart<D>(
    points: &[Point<D>],
    distinct_ids: &[usize],
    settings: Settings,
    seed: u64,
) -> Result<Restart, Error>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
    <DefaultAllocator as Allocator<f64, D>>::Buffer: Send + Sync,
{
    let mut rng = Pcg64::seed_from_u64(seed);
    let (mut centres, seed_rejections) = seed_centres(
        points,
        distinct_ids,
        settings.cluster_count,
        settings.max_seed_attempts,
        &mut rng,
    );

    let (initial_cost, mut cluster_ids) = assign_points(points, &centres)?;
    let mut cost = initial_cost;
    let mut iterations = 0;

    // The initial assignment is always refined at least once.
    loop {
        let new_centres = update_centres(points, &cluster_ids, &centres)?;
        let (new_cost, new_cluster_ids) = assign_points(points, &new_centres)?;
        iterations += 1;
        if new_cost.partial_cmp(&cost) != Some(Ordering::Less) {
            // Keep the previous assignment, this pass did not improve it.
            break;
        }
        cost = new_cost;
        cluster_ids = new_cluster_ids;
        centres = new_centres;
        if iterations >= settings.max_iter {
            tracing::debug!(iterations, "reached max iteration count");
            break;
        }
    }

    Ok(Restart {
        cost,
        initial_cost,
        cluster_ids,
        iterations,
        seed_rejections,
    })
}

fn k_means_restarts<D>(
    part_ids: &mut [usize],
    points: &[Point<D>],
    settings: Settings,
    seeds: Vec<u64>,
) -> Result<Metadata, Error>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
    <DefaultAllocator as Allocator<f64, D>>::Buffer: Send + Sync,
{
    if seeds.is_empty() {
        return Err(Error::ZeroRestarts);
    }
    if settings.cluster_count == 0 {
        return Err(Error::ZeroClusters);
    }
    if points.len() <= settings.cluster_count {
        return Err(Error::TooManyClusters {
            cluster_count: settings.cluster_count,
            point_count: points.len(),
        });
    }
    if part_ids.len() != points.len() {
        return Err(Error::InputLenMismatch {
            expected: points.len(),
            actual: part_ids.len(),
        });
    }

    let distinct_ids = distinct_points(points);
    if distinct_ids.len() < settings.cluster_count {
        return Err(Error::InsufficientDistinctPoints {
            cluster_count: settings.cluster_count,
            distinct_count: distinct_ids.len(),
        });
    }

    let span = tracing::info_span!(
        "k_means",
        cluster_count = settings.cluster_count,
        restart_count = seeds.len(),
        point_count = points.len(),
    );
    let _enter = span.enter();

    let restarts: Vec<Restart> = seeds
        .into_par_iter()
        .enumerate()
        .map(|(restart_id, seed)| -> Result<Restart, Error> {
            let restart = restart(points, &distinct_ids, settings, seed)?;
            tracing::debug!(
                restart_id,
                restart.initial_cost,
                restart.cost,
                restart.iterations,
                restart.seed_rejections,
                "restart converged",
            );
            Ok(restart)
        })
        .collect::<Result<_, Error>>()?;

    let total_seed_rejections = restarts.iter().map(|restart| restart.seed_rejections).sum();

    // Ties go to the earliest restart.
    let mut best_cost = f64::INFINITY;
    let mut best = None;
    for (restart_id, restart) in restarts.into_iter().enumerate() {
        if restart.cost < best_cost {
            best_cost = restart.cost;
            best = Some((restart_id, restart));
        }
    }
    let (best_restart, best) = best.ok_or(Error::NotFound)?;

    tracing::info!(best_restart, best_cost, "best restart");
    part_ids.copy_from_slice(&best.cluster_ids);

    Ok(Metadata {
        best_restart,
        iterations: best.iterations,
        total_seed_rejections,
    })
}

/// Diagnostic data for a [`KMeans`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Metadata {
    /// Index of the restart whose clustering has been kept.
    pub best_restart: usize,

    /// Number of update/assignment passes the kept restart went through,
    /// including the last one, which did not improve the clustering.
    pub iterations: usize,

    /// Number of initial centre draws that have been rejected because they
    /// contained duplicate points, summed over all restarts.
    pub total_seed_rejections: usize,
}

/// # k-means
///
/// Clusters points with Lloyd's algorithm.  The algorithm is run
/// `restart_count` times from different random initial centres, and the
/// clustering that has the lowest cost (the sum of the distances between each
/// point and the centre of its cluster) is kept.
///
/// Restarts run in parallel.  Their random generators are seeded from `rng`
/// beforehand, so the result only depends on the state of `rng`.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), lloyd::Error> {
/// use lloyd::Partition as _;
/// use lloyd::Point2D;
/// use rand::SeedableRng as _;
///
/// let points = [
///     Point2D::new(1.0, 1.0),
///     Point2D::new(1.5, 1.0),
///     Point2D::new(-8.0, 0.0),
///     Point2D::new(-8.0, 0.5),
///     Point2D::new(4.0, 9.0),
///     Point2D::new(4.5, 9.0),
/// ];
/// let mut partition = [0; 6];
///
/// let rng = rand_pcg::Pcg64::seed_from_u64(5);
/// lloyd::KMeans { restart_count: 16, ..lloyd::KMeans::new(rng, 3) }
///     .partition(&mut partition, &points[..])?;
///
/// assert_eq!(partition[0], partition[1]);
/// assert_eq!(partition[2], partition[3]);
/// assert_eq!(partition[4], partition[5]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct KMeans<R> {
    /// Random generator used to seed each restart.
    pub rng: R,

    /// Number of clusters, must be lower than the number of points.
    pub cluster_count: usize,

    /// Number of independent runs of the algorithm.
    pub restart_count: usize,

    /// Maximum number of update/assignment passes per restart.
    pub max_iter: usize,

    /// Maximum number of rejected draws of initial centres per restart,
    /// after which centres are drawn among distinct locations only.
    pub max_seed_attempts: usize,
}

impl<R> KMeans<R> {
    pub fn new(rng: R, cluster_count: usize) -> Self {
        Self {
            rng,
            cluster_count,
            restart_count: 1,
            max_iter: MAX_ITER,
            max_seed_attempts: MAX_SEED_ATTEMPTS,
        }
    }
}

impl<'a, D, R> crate::Partition<&'a [Point<D>]> for KMeans<R>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
    <DefaultAllocator as Allocator<f64, D>>::Buffer: Send + Sync,
    R: Rng,
{
    type Metadata = Metadata;
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        points: &'a [Point<D>],
    ) -> Result<Self::Metadata, Self::Error> {
        let settings = Settings {
            cluster_count: self.cluster_count,
            max_iter: self.max_iter,
            max_seed_attempts: self.max_seed_attempts,
        };
        let seeds = (0..self.restart_count).map(|_| self.rng.gen()).collect();
        k_means_restarts(part_ids, points, settings, seeds)
    }
}

/// Cluster `points` into `cluster_count` groups, keeping the best of
/// `restart_count` runs.  See [`KMeans`].
pub fn k_means<D>(
    points: &[Point<D>],
    cluster_count: usize,
    restart_count: usize,
    rng: impl Rng,
) -> Result<Vec<usize>, Error>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
    <DefaultAllocator as Allocator<f64, D>>::Buffer: Send + Sync,
{
    use crate::Partition as _;

    let mut partition = vec![0; points.len()];
    KMeans {
        restart_count,
        ..KMeans::new(rng, cluster_count)
    }
    .partition(&mut partition, points)?;
    Ok(partition)
}

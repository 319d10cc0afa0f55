use super::Error;
use crate::geometry;
use crate::Point;
use nalgebra::allocator::Allocator;
use nalgebra::DefaultAllocator;
use nalgebra::Dim;
use rayon::iter::IndexedParallelIterator as _;
use rayon::iter::IntoParallelIterator as _;
use rayon::iter::ParallelIterator as _;

/// Move each centre to the mean of the points assigned to it.
///
/// The number of clusters is `previous.len()`.  The centre of a cluster that
/// has no point left is kept where it was in `previous`.
///
/// # Errors
///
/// Fails if `cluster_ids` and `points` don't have the same length, or if a
/// cluster ID is not lower than the number of clusters.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), lloyd::Error> {
/// use lloyd::Point2D;
///
/// let points = [Point2D::new(0.0, 0.0), Point2D::new(2.0, 2.0), Point2D::new(5.0, 5.0)];
/// let previous = [Point2D::new(0.0, 0.0), Point2D::new(5.0, 5.0), Point2D::new(9.0, 9.0)];
///
/// let centres = lloyd::update_centres(&points, &[0, 0, 1], &previous)?;
/// assert_eq!(centres, [Point2D::new(1.0, 1.0), Point2D::new(5.0, 5.0), Point2D::new(9.0, 9.0)]);
/// # Ok(())
/// # }
/// ```
pub fn update_centres<D>(
    points: &[Point<D>],
    cluster_ids: &[usize],
    previous: &[Point<D>],
) -> Result<Vec<Point<D>>, Error>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
    <DefaultAllocator as Allocator<f64, D>>::Buffer: Send + Sync,
{
    if cluster_ids.len() != points.len() {
        return Err(Error::InputLenMismatch {
            expected: points.len(),
            actual: cluster_ids.len(),
        });
    }

    let cluster_count = previous.len();
    let mut clusters: Vec<Vec<&Point<D>>> = vec![Vec::new(); cluster_count];
    for (point, &cluster_id) in points.iter().zip(cluster_ids) {
        clusters
            .get_mut(cluster_id)
            .ok_or(Error::ClusterOutOfRange {
                cluster_id,
                cluster_count,
            })?
            .push(point);
    }

    let centres = clusters
        .into_par_iter()
        .zip(previous)
        .enumerate()
        .map(|(cluster_id, (members, previous))| {
            geometry::mean(&members).unwrap_or_else(|| {
                tracing::debug!(cluster_id, "empty cluster, keeping its previous centre");
                previous.clone()
            })
        })
        .collect();

    Ok(centres)
}

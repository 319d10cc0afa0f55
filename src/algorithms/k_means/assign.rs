use super::Error;
use crate::geometry;
use crate::Point;
use nalgebra::allocator::Allocator;
use nalgebra::DefaultAllocator;
use nalgebra::Dim;
use rayon::iter::IntoParallelRefIterator as _;
use rayon::iter::ParallelIterator as _;

/// Index and distance of the centre closest to `point`.
///
/// The comparison is strict so that, on exact ties, the lowest index wins.
fn nearest_centre<D>(point: &Point<D>, centres: &[Point<D>]) -> (usize, f64)
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
{
    let mut best = (0, geometry::distance(point, &centres[0]));
    for (centre_id, centre) in centres.iter().enumerate().skip(1) {
        let distance = geometry::distance(point, centre);
        if distance < best.1 {
            best = (centre_id, distance);
        }
    }
    best
}

/// Label every point with the ID of its nearest centre.
///
/// Returns the clustering cost, i.e. the sum of the distances between each
/// point and its nearest centre, along with the labels.
///
/// # Errors
///
/// Fails if `centres` is empty, or if a centre or a point does not have the
/// same dimension as the first centre.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), lloyd::Error> {
/// use lloyd::Point2D;
///
/// let points = [Point2D::new(0.0, 1.0), Point2D::new(9.0, 0.0)];
/// let centres = [Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)];
///
/// let (cost, cluster_ids) = lloyd::assign_points(&points, &centres)?;
/// assert_eq!(cluster_ids, [0, 1]);
/// assert_eq!(cost, 2.0);
/// # Ok(())
/// # }
/// ```
pub fn assign_points<D>(
    points: &[Point<D>],
    centres: &[Point<D>],
) -> Result<(f64, Vec<usize>), Error>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
    <DefaultAllocator as Allocator<f64, D>>::Buffer: Send + Sync,
{
    let dimension = match centres.first() {
        Some(centre) => centre.nrows(),
        None => return Err(Error::NoCentres),
    };
    if let Some(mismatch) = centres
        .iter()
        .chain(points)
        .find(|point| point.nrows() != dimension)
    {
        return Err(Error::DimensionMismatch {
            expected: dimension,
            actual: mismatch.nrows(),
        });
    }

    let nearest: Vec<(usize, f64)> = points
        .par_iter()
        .map(|point| nearest_centre(point, centres))
        .collect();

    // Summed in point order to keep the cost independent from the thread count.
    let cost = nearest.iter().map(|(_, distance)| distance).sum();
    let cluster_ids = nearest.into_iter().map(|(centre_id, _)| centre_id).collect();

    Ok((cost, cluster_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point2D;
    use crate::Point3D;
    use crate::PointXD;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_nearest() {
        let points = [
            Point2D::new(0., 0.),
            Point2D::new(1., 1.),
            Point2D::new(8., 9.),
            Point2D::new(11., 10.),
            Point2D::new(0., 9.),
        ];
        let centres = [
            Point2D::new(0., 0.),
            Point2D::new(10., 10.),
            Point2D::new(0., 10.),
        ];

        let (cost, cluster_ids) = assign_points(&points, &centres).unwrap();

        assert_eq!(cluster_ids, [0, 0, 1, 1, 2]);
        let expected = 0. + 2_f64.sqrt() + 5_f64.sqrt() + 1. + 1.;
        assert_relative_eq!(cost, expected);
    }

    #[test]
    fn test_tie_lowest_index_wins() {
        let points = [Point2D::new(0., 0.), Point2D::new(5., 0.)];
        let centres = [
            Point2D::new(-1., 0.),
            Point2D::new(1., 0.),
            Point2D::new(0., 1.),
        ];

        let (_, cluster_ids) = assign_points(&points, &centres).unwrap();

        // (0, 0) is at distance 1 from every centre.
        assert_eq!(cluster_ids, [0, 1]);
    }

    #[test]
    fn test_duplicate_centres() {
        let points = [Point3D::new(1., 1., 1.)];
        let centres = [Point3D::new(0., 0., 0.); 4];
        let (_, cluster_ids) = assign_points(&points, &centres).unwrap();
        assert_eq!(cluster_ids, [0]);
    }

    #[test]
    fn test_no_centres() {
        let points = [Point2D::new(0., 0.)];
        assert_eq!(assign_points(&points, &[]), Err(Error::NoCentres));
    }

    #[test]
    fn test_no_points() {
        let centres = [Point2D::new(0., 0.)];
        assert_eq!(assign_points(&[], &centres), Ok((0., Vec::new())));
    }

    #[test]
    fn test_point_dimension_mismatch() {
        let points = [
            PointXD::from_vec(vec![0., 0., 0.]),
            PointXD::from_vec(vec![0., 0.]),
        ];
        let centres = [PointXD::from_vec(vec![1., 1., 1.])];
        assert_eq!(
            assign_points(&points, &centres),
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 2,
            }),
        );
    }

    #[test]
    fn test_centre_dimension_mismatch() {
        let points = [PointXD::from_vec(vec![0., 0.])];
        let centres = [
            PointXD::from_vec(vec![1., 1.]),
            PointXD::from_vec(vec![1., 1., 1., 1.]),
        ];
        assert_eq!(
            assign_points(&points, &centres),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 4,
            }),
        );
    }

    proptest!(
        /// Assigning twice must give the exact same result.
        #[test]
        fn idempotent(
            (points, centres) in (1..8_usize).prop_flat_map(|centre_count| {
                let point = (-1e3..1e3_f64, -1e3..1e3_f64).prop_map(|(x, y)| Point2D::new(x, y));
                (
                    prop::collection::vec(point.clone(), 1..200),
                    prop::collection::vec(point, centre_count),
                )
            })
        ) {
            let first = assign_points(&points, &centres).unwrap();
            let second = assign_points(&points, &centres).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Each label must index the closest centre.
        #[test]
        fn labels_are_nearest(
            (points, centres) in (1..8_usize).prop_flat_map(|centre_count| {
                let point = (-1e3..1e3_f64, -1e3..1e3_f64, -1e3..1e3_f64)
                    .prop_map(|(x, y, z)| Point3D::new(x, y, z));
                (
                    prop::collection::vec(point.clone(), 1..200),
                    prop::collection::vec(point, centre_count),
                )
            })
        ) {
            let (cost, cluster_ids) = assign_points(&points, &centres).unwrap();
            prop_assert_eq!(cluster_ids.len(), points.len());
            prop_assert!(cost >= 0.0);
            for (point, &cluster_id) in points.iter().zip(&cluster_ids) {
                prop_assert!(cluster_id < centres.len());
                let assigned = geometry::distance(point, &centres[cluster_id]);
                for centre in &centres {
                    prop_assert!(assigned <= geometry::distance(point, centre));
                }
            }
        }
    );
}

//! Point types and the few geometric operations clustering needs.

use nalgebra::allocator::Allocator;
use nalgebra::DefaultAllocator;
use nalgebra::Dim;
use nalgebra::DVector;
use nalgebra::OVector;
use nalgebra::SVector;

/// A point of `D` coordinates.
///
/// `D` is either a compile-time dimension (see [`PointND`]) or
/// [`nalgebra::Dyn`] (see [`PointXD`]).
pub type Point<D> = OVector<f64, D>;

pub type PointND<const D: usize> = SVector<f64, D>;
pub type Point2D = PointND<2>;
pub type Point3D = PointND<3>;

/// A point whose dimension is only known at runtime.
pub type PointXD = DVector<f64>;

/// Euclidean distance between two points of the same dimension.
pub(crate) fn distance<D>(a: &Point<D>, b: &Point<D>) -> f64
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
{
    debug_assert_eq!(a.nrows(), b.nrows());
    a.metric_distance(b)
}

/// Coordinate-wise arithmetic mean of the given points, or `None` if there
/// are none.
pub(crate) fn mean<D>(points: &[&Point<D>]) -> Option<Point<D>>
where
    D: Dim,
    DefaultAllocator: Allocator<f64, D>,
{
    let (first, rest) = points.split_first()?;
    let mut sum = (*first).clone();
    for point in rest {
        sum += *point;
    }
    Some(sum / points.len() as f64)
}

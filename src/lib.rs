//! Lloyd's k-means clustering of point sets of arbitrary dimension.
//!
//! # Crate Layout
//!
//! Lloyd exposes a [`Partition`] trait, implemented by the [`KMeans`]
//! clusterer.  The trait is generic around its input, which means the same
//! clusterer accepts points of compile-time dimension ([`Point2D`],
//! [`Point3D`], [`PointND`]) and points whose dimension is only known at
//! runtime ([`PointXD`]).
//!
//! The two steps of Lloyd's algorithm are also available on their own:
//!
//! - [`assign_points`] labels each point with its nearest centre,
//! - [`update_centres`] moves each centre to the mean of its points.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> Result<(), lloyd::Error> {
//! use lloyd::Point2D;
//! use rand::SeedableRng as _;
//!
//! let points = [
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(0.5, 0.1),
//!     Point2D::new(10.0, 10.0),
//!     Point2D::new(10.2, 9.9),
//! ];
//! let rng = rand_pcg::Pcg64::seed_from_u64(10);
//!
//! let clusters = lloyd::k_means(&points, 2, 4, rng)?;
//! assert_eq!(clusters[0], clusters[1]);
//! assert_eq!(clusters[2], clusters[3]);
//! assert_ne!(clusters[0], clusters[2]);
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod algorithms;
mod geometry;

pub use crate::algorithms::*;
pub use crate::geometry::{Point, Point2D, Point3D, PointND, PointXD};

pub use nalgebra;
pub use rayon;

/// The `Partition` trait allows for partitioning data.
///
/// Clustering algorithms implement this trait.
///
/// The generic argument `M` defines the input of the algorithms (e.g. a set
/// of 2D points).
///
/// The input partition must be of the correct size.  Its contents are
/// overwritten.
pub trait Partition<M> {
    /// Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    /// Error details, should the algorithm fail to run.
    type Error;

    /// Partition the given data and output the cluster ID of each element in
    /// `part_ids`.
    ///
    /// Cluster IDs are contiguous and start from zero.
    fn partition(&mut self, part_ids: &mut [usize], data: M)
        -> Result<Self::Metadata, Self::Error>;
}

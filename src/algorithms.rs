use std::fmt;

mod k_means;

pub use k_means::assign_points;
pub use k_means::k_means;
pub use k_means::update_centres;
pub use k_means::KMeans;
pub use k_means::Metadata as KMeansMetadata;

/// Common errors thrown by algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No clustering could be found, which happens when every restart ended
    /// with a non-finite cost (e.g. points with NaN coordinates).
    NotFound,

    /// The restart count is zero.
    ZeroRestarts,

    /// The cluster count is zero.
    ZeroClusters,

    /// There must be strictly more points than clusters.
    TooManyClusters {
        cluster_count: usize,
        point_count: usize,
    },

    /// Points cannot be assigned to an empty set of centres.
    NoCentres,

    /// Points and centres don't all have the same number of coordinates.
    DimensionMismatch { expected: usize, actual: usize },

    /// Input sets don't have matching lengths.
    InputLenMismatch { expected: usize, actual: usize },

    /// A cluster ID does not index into the centre set.
    ClusterOutOfRange {
        cluster_id: usize,
        cluster_count: usize,
    },

    /// The point set has fewer distinct locations than `cluster_count`, so
    /// initial centres cannot all be different.
    InsufficientDistinctPoints {
        cluster_count: usize,
        distinct_count: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "no clustering found"),
            Error::ZeroRestarts => write!(f, "restart count must be larger than zero"),
            Error::ZeroClusters => write!(f, "cluster count must be larger than zero"),
            Error::TooManyClusters {
                cluster_count,
                point_count,
            } => write!(
                f,
                "too many clusters demanded ({cluster_count}) for the provided {point_count} points",
            ),
            Error::NoCentres => write!(f, "centre set is empty"),
            Error::DimensionMismatch { expected, actual } => write!(
                f,
                "points don't have the same dimension (expected {expected} coordinates, got {actual})",
            ),
            Error::InputLenMismatch { expected, actual } => write!(
                f,
                "input sets don't have the same length (expected {expected} items, got {actual})",
            ),
            Error::ClusterOutOfRange {
                cluster_id,
                cluster_count,
            } => write!(
                f,
                "cluster id {cluster_id} is out of range (expected less than {cluster_count})",
            ),
            Error::InsufficientDistinctPoints {
                cluster_count,
                distinct_count,
            } => write!(
                f,
                "insufficient distinct points for {cluster_count} clusters (found {distinct_count})",
            ),
        }
    }
}

impl std::error::Error for Error {}

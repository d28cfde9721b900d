//! Validation and serialization errors

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Problems with caller-supplied input.
///
/// Degeneracies produced *inside* the kernel (sliver fragments, collapsed
/// vertices) are never reported through this type; they are dropped silently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A polygon was given fewer than three vertices
    #[error("(TooFewPoints) a polygon needs at least 3 vertices, got {0}")]
    TooFewPoints(usize),
    /// The vertices do not span a plane (coincident or collinear)
    #[error("(DegeneratePolygon) vertices do not define a plane near {0}")]
    DegeneratePolygon(Point3<Real>),
    /// The coordinate has a NaN or infinite component
    #[error("(InvalidCoordinate) the coordinate ({0}) has a NaN or infinite component")]
    InvalidCoordinate(Point3<Real>),
    /// Extrusion offset has no component along the extrusion axis
    #[error("(ZeroExtrusion) offset cannot be orthogonal to the extrusion axis")]
    ZeroExtrusion,
    /// A sweep angle outside the accepted range
    #[error("(InvalidAngle) angle must be positive, got {0}")]
    InvalidAngle(Real),
    /// A segment/step count that cannot produce geometry
    #[error("(InvalidResolution) {what} must be at least {min}, got {got}")]
    InvalidResolution {
        what: &'static str,
        min: usize,
        got: usize,
    },
    /// An axis name that is not one of `X`, `Y`, `Z`, `-X`, `-Y`, `-Z`
    #[error("(UnknownAxis) unknown axis identifier {0:?}")]
    UnknownAxis(String),
    /// Two axes that cannot span a plane
    #[error("(ParallelAxes) axes {0} and {1} do not span a plane")]
    ParallelAxes(String, String),
    /// A connector whose axis is zero or parallel to its normal
    #[error("(DegenerateFrame) axis {0} and normal {1} do not define a frame")]
    DegenerateFrame(Vector3<Real>, Vector3<Real>),
    /// A transformation matrix without inverse
    #[error("(NonInvertibleMatrix) transformation matrix is not invertible")]
    NonInvertibleMatrix,
    /// An index in an encoded solid points outside its table
    #[error("(IndexOutOfRange) {table} index {index} is out of range (len = {len})")]
    IndexOutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },
    /// In general, anything else
    #[error("{0}")]
    Other(String),
}

/// Failures while reading or writing an interchange form.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unexpected class {0:?}, expected \"CSG\"")]
    UnexpectedClass(String),
}

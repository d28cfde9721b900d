//! Coordinate frames used to place 2‑D cross-sections in 3‑D.

use crate::errors::ValidationError;
use crate::float_types::{EPSILON, Real};
use crate::solid::plane::Plane;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Rotation3, Translation3, Unit, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point with an attached direction (`axis`) and an orientation around
/// that direction (`normal`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub point: Point3<Real>,
    pub axis: Vector3<Real>,
    pub normal: Vector3<Real>,
}

impl Connector {
    pub const fn new(point: Point3<Real>, axis: Vector3<Real>, normal: Vector3<Real>) -> Self {
        Self {
            point,
            axis,
            normal,
        }
    }

    /// Unit axis, and the normal made perpendicular to it and unit.
    ///
    /// ## Errors
    /// [`ValidationError::DegenerateFrame`] when the axis is zero or parallel to the normal.
    pub fn normalized(&self) -> Result<Connector, ValidationError> {
        let degenerate = || ValidationError::DegenerateFrame(self.axis, self.normal);
        let axis = self.axis.try_normalize(EPSILON).ok_or_else(degenerate)?;
        let normal = (self.normal - axis * self.normal.dot(&axis))
            .try_normalize(EPSILON)
            .ok_or_else(degenerate)?;
        Ok(Connector {
            point: self.point,
            axis,
            normal,
        })
    }

    /// Move the frame rigidly with the geometry: directions are transformed
    /// as offsets from `point`.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Connector {
        let point = matrix.transform_point(&self.point);
        let axis = matrix.transform_point(&(self.point + self.axis)) - point;
        let normal = matrix.transform_point(&(self.point + self.normal)) - point;
        Connector {
            point,
            axis,
            normal,
        }
    }

    /// Rigid motion taking this connector onto `other`.
    ///
    /// `point` goes to `other.point`, `axis` to `other.axis` (or to its
    /// opposite when `mirror` is set) and `normal` to `other.normal` turned by
    /// `normal_rotation` degrees around `other.axis`.
    pub fn transformation_to(
        &self,
        other: &Connector,
        mirror: bool,
        normal_rotation: Real,
    ) -> Result<Matrix4<Real>, ValidationError> {
        let us = self.normalized()?;
        let them = other.normalized()?;

        let target_axis = if mirror { -them.axis } else { them.axis };
        let spin = Rotation3::from_axis_angle(
            &Unit::new_unchecked(them.axis),
            normal_rotation.to_radians(),
        );
        let target_normal = spin * them.normal;

        let source = frame(&us.axis, &us.normal);
        let target = frame(&target_axis, &target_normal);
        let mut rotation = Matrix4::identity();
        rotation
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(target * source.transpose()));

        Ok(Translation3::from(them.point.coords).to_homogeneous()
            * rotation
            * Translation3::from(-us.point.coords).to_homogeneous())
    }
}

impl Default for Connector {
    /// The frame a 2‑D sketch lives in: origin, axis +Z, normal +Y.
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::z(), Vector3::y())
    }
}

/// Columns `axis`, `normal`, `axis × normal` of a unit, perpendicular pair.
fn frame(axis: &Vector3<Real>, normal: &Vector3<Real>) -> Matrix3<Real> {
    Matrix3::from_columns(&[*axis, *normal, axis.cross(normal)])
}

/// One of the six signed cartesian axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartesianAxis {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

impl CartesianAxis {
    pub fn vector(self) -> Vector3<Real> {
        match self {
            CartesianAxis::X => Vector3::x(),
            CartesianAxis::Y => Vector3::y(),
            CartesianAxis::Z => Vector3::z(),
            CartesianAxis::NegX => -Vector3::x(),
            CartesianAxis::NegY => -Vector3::y(),
            CartesianAxis::NegZ => -Vector3::z(),
        }
    }
}

impl FromStr for CartesianAxis {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(CartesianAxis::X),
            "Y" => Ok(CartesianAxis::Y),
            "Z" => Ok(CartesianAxis::Z),
            "-X" => Ok(CartesianAxis::NegX),
            "-Y" => Ok(CartesianAxis::NegY),
            "-Z" => Ok(CartesianAxis::NegZ),
            other => Err(ValidationError::UnknownAxis(other.to_string())),
        }
    }
}

impl fmt::Display for CartesianAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CartesianAxis::X => "X",
            CartesianAxis::Y => "Y",
            CartesianAxis::Z => "Z",
            CartesianAxis::NegX => "-X",
            CartesianAxis::NegY => "-Y",
            CartesianAxis::NegZ => "-Z",
        };
        f.write_str(name)
    }
}

/// A plane with a right-handed in-plane coordinate system (`u`, `v`) so
/// points can move between 3‑D and the plane's 2‑D coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthoNormalBasis {
    pub u: Vector3<Real>,
    pub v: Vector3<Real>,
    pub plane: Plane,
    pub plane_origin: Point3<Real>,
}

impl OrthoNormalBasis {
    /// Basis on `plane` whose `u` is picked from the cartesian axis least
    /// aligned with the normal.
    pub fn new(plane: Plane) -> Self {
        let right = least_aligned_axis(&plane.normal);
        let v = plane.normal.cross(&right).normalize();
        let u = v.cross(&plane.normal);
        let plane_origin = Point3::from(plane.normal * plane.w);
        Self {
            u,
            v,
            plane,
            plane_origin,
        }
    }

    /// Basis on `plane` whose `u` is `right` projected into the plane.
    pub fn with_right_vector(plane: Plane, right: &Vector3<Real>) -> Result<Self, ValidationError> {
        let v = plane
            .normal
            .cross(right)
            .try_normalize(EPSILON)
            .ok_or(ValidationError::DegenerateFrame(plane.normal, *right))?;
        let u = v.cross(&plane.normal);
        let plane_origin = Point3::from(plane.normal * plane.w);
        Ok(Self {
            u,
            v,
            plane,
            plane_origin,
        })
    }

    /// The plane through the origin spanned by two cartesian axes: 2‑D x maps
    /// to `axis1`, 2‑D y to `axis2`.
    pub fn cartesian(axis1: CartesianAxis, axis2: CartesianAxis) -> Result<Self, ValidationError> {
        let u = axis1.vector();
        let v = axis2.vector();
        let normal = u.cross(&v);
        if normal.norm_squared() < 0.5 {
            return Err(ValidationError::ParallelAxes(axis1.to_string(), axis2.to_string()));
        }
        Self::with_right_vector(Plane::from_normal(normal, 0.0), &u)
    }

    /// The XY plane with the identity basis.
    pub fn z0_plane() -> Self {
        Self {
            u: Vector3::x(),
            v: Vector3::y(),
            plane: Plane::from_normal(Vector3::z(), 0.0),
            plane_origin: Point3::origin(),
        }
    }

    pub fn to_2d(&self, point: &Point3<Real>) -> Point2<Real> {
        Point2::new(point.coords.dot(&self.u), point.coords.dot(&self.v))
    }

    pub fn to_3d(&self, point: &Point2<Real>) -> Point3<Real> {
        self.plane_origin + self.u * point.x + self.v * point.y
    }

    /// Maps world coordinates to `(u, v, height above plane)`.
    pub fn projection_matrix(&self) -> Matrix4<Real> {
        let n = self.plane.normal;
        Matrix4::new(
            self.u.x, self.u.y, self.u.z, 0.0,
            self.v.x, self.v.y, self.v.z, 0.0,
            n.x, n.y, n.z, -self.plane.w,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Maps `(u, v, height above plane)` back to world coordinates.
    pub fn inverse_projection_matrix(&self) -> Matrix4<Real> {
        let n = self.plane.normal;
        let o = self.plane_origin;
        Matrix4::new(
            self.u.x, self.v.x, n.x, o.x,
            self.u.y, self.v.y, n.y, o.y,
            self.u.z, self.v.z, n.z, o.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

/// Unit cartesian axis with the smallest absolute component of `v`.
pub(crate) fn least_aligned_axis(v: &Vector3<Real>) -> Vector3<Real> {
    let a = v.abs();
    if a.x <= a.y && a.x <= a.z {
        Vector3::x()
    } else if a.y <= a.x && a.y <= a.z {
        Vector3::y()
    } else {
        Vector3::z()
    }
}

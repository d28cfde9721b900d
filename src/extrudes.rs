//! Bridge between 2‑D sketches and solids: linear and twisted extrusion,
//! revolution, extrusion in an arbitrary plane, and the reverse direction
//! (sections and projections of a solid).

use crate::errors::ValidationError;
use crate::float_types::{DEFAULT_RESOLUTION_3D, EPSILON, Real};
use crate::sketch::{CapPlacement, Sketch};
use crate::solid::connector::{CartesianAxis, Connector, OrthoNormalBasis};
use crate::solid::plane::Plane;
use crate::solid::polygon::Polygon;
use crate::solid::Solid;
use crate::traits::CSGOps;
use nalgebra::{Point2, Point3, Rotation3, Vector3};

/// Options for [`extrude`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    /// End position of the sketch origin; `z` must not be zero.
    pub offset: Vector3<Real>,
    /// Total rotation about +Z in degrees between bottom and top.
    pub twist_angle: Real,
    /// Wall slices used to approximate the twist; zero counts as one.
    /// Ignored without twist.
    pub twist_steps: usize,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            offset: Vector3::z(),
            twist_angle: 0.0,
            twist_steps: DEFAULT_RESOLUTION_3D,
        }
    }
}

/// Options for [`rotate_extrude`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateExtrudeOptions {
    /// Sweep in degrees. Values above 360 wrap around.
    pub angle: Real,
    /// Segments over the swept angle.
    pub resolution: usize,
}

impl Default for RotateExtrudeOptions {
    fn default() -> Self {
        Self {
            angle: 360.0,
            resolution: DEFAULT_RESOLUTION_3D,
        }
    }
}

/// Options for [`extrude_in_orthonormal_basis`] and [`extrude_in_plane`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InPlaneOptions {
    /// Center the extrusion on the plane instead of starting at it.
    pub symmetrical: bool,
}

/// Sweep `sketch` along `options.offset`, optionally twisting it about +Z.
///
/// A negative `offset.z` extrudes downward; faces still point outward.
///
/// ## Errors
/// [`ValidationError::ZeroExtrusion`] when `offset.z` is zero.
pub fn extrude<S: Clone + Send + Sync + PartialEq>(
    sketch: &Sketch<S>,
    options: &ExtrudeOptions,
) -> Result<Solid<S>, ValidationError> {
    if sketch.is_empty() {
        return Ok(Solid::new());
    }
    let offset = options.offset;
    if offset.z == 0.0 {
        return Err(ValidationError::ZeroExtrusion);
    }
    let steps = if options.twist_angle == 0.0 {
        1
    } else {
        options.twist_steps.max(1)
    };

    let downward = offset.z < 0.0;
    let connector = |i: usize| {
        let fraction = i as Real / steps as Real;
        let spin = Rotation3::from_axis_angle(
            &Vector3::z_axis(),
            (options.twist_angle * fraction).to_radians(),
        );
        Connector::new(
            Point3::from(offset * fraction),
            Vector3::z(),
            spin * Vector3::y(),
        )
    };

    let mut polygons = sketch.to_plane_polygons(&CapPlacement::Connector {
        connector: connector(0),
        flipped: !downward,
    });
    polygons.extend(sketch.to_plane_polygons(&CapPlacement::Connector {
        connector: connector(steps),
        flipped: downward,
    }));
    for i in 0..steps {
        let walls = sketch.to_wall_polygons(&connector(i), &connector(i + 1));
        if downward {
            polygons.extend(walls.iter().map(Polygon::flipped));
        } else {
            polygons.extend(walls);
        }
    }

    log::debug!("extrude: {} steps -> {} polygons", steps, polygons.len());
    Ok(Solid::from_polygons(&polygons))
}

/// Revolve `sketch` about the Z axis. The sketch's x is the distance from
/// the axis and its y the height; the sweep runs clockwise seen from +Z,
/// starting in the XZ half-plane at positive x.
///
/// Angles above 360 wrap modulo 360 (an exact multiple is a full turn).
/// Partial turns get a cap at each end. The result is retesselated.
///
/// ## Errors
/// [`ValidationError::InvalidAngle`] for non-positive or non-finite angles,
/// [`ValidationError::InvalidResolution`] for zero segments.
pub fn rotate_extrude<S: Clone + Send + Sync + PartialEq>(
    sketch: &Sketch<S>,
    options: &RotateExtrudeOptions,
) -> Result<Solid<S>, ValidationError> {
    let RotateExtrudeOptions { angle, resolution } = *options;
    if !angle.is_finite() || angle <= 0.0 {
        return Err(ValidationError::InvalidAngle(angle));
    }
    if resolution < 1 {
        return Err(ValidationError::InvalidResolution {
            what: "resolution",
            min: 1,
            got: resolution,
        });
    }
    if sketch.is_empty() {
        return Ok(Solid::new());
    }

    let angle = if angle > 360.0 {
        let wrapped = angle % 360.0;
        if wrapped == 0.0 { 360.0 } else { wrapped }
    } else {
        angle
    };
    let full_turn = (angle - 360.0).abs() < EPSILON;

    // 2-D x goes to (cos θ, sin θ, 0), 2-D y to +Z
    let connector = |i: usize| {
        let i = if full_turn && i == resolution { 0 } else { i };
        let theta = (-angle * i as Real / resolution as Real).to_radians();
        Connector::new(
            Point3::origin(),
            Vector3::new(theta.sin(), -theta.cos(), 0.0),
            Vector3::z(),
        )
    };

    let mut polygons = Vec::new();
    for i in 0..resolution {
        polygons.extend(sketch.to_wall_polygons(&connector(i), &connector(i + 1)));
    }
    if !full_turn {
        polygons.extend(sketch.to_plane_polygons(&CapPlacement::Connector {
            connector: connector(0),
            flipped: true,
        }));
        polygons.extend(sketch.to_plane_polygons(&CapPlacement::Connector {
            connector: connector(resolution),
            flipped: false,
        }));
    }

    log::debug!(
        "rotate_extrude: {angle} degrees in {resolution} segments -> {} polygons",
        polygons.len()
    );
    Ok(Solid::from_polygons(&polygons).retesselated())
}

/// Extrude `sketch` laid out in `basis` along the basis normal by `depth`.
///
/// ## Errors
/// [`ValidationError::ZeroExtrusion`] when `depth` is zero.
pub fn extrude_in_orthonormal_basis<S: Clone + Send + Sync + PartialEq>(
    sketch: &Sketch<S>,
    basis: &OrthoNormalBasis,
    depth: Real,
    options: &InPlaneOptions,
) -> Result<Solid<S>, ValidationError> {
    let mut extruded = extrude(
        sketch,
        &ExtrudeOptions {
            offset: Vector3::new(0.0, 0.0, depth),
            ..ExtrudeOptions::default()
        },
    )?;
    if options.symmetrical {
        extruded = extruded.translate(0.0, 0.0, -depth / 2.0);
    }
    extruded.try_transform(&basis.inverse_projection_matrix())
}

/// Extrude `sketch` in the plane through the origin spanned by two cartesian
/// axes (2‑D x along `axis1`, 2‑D y along `axis2`).
///
/// ## Errors
/// As [`extrude_in_orthonormal_basis`], plus
/// [`ValidationError::ParallelAxes`] when the axes do not span a plane.
pub fn extrude_in_plane<S: Clone + Send + Sync + PartialEq>(
    sketch: &Sketch<S>,
    axis1: CartesianAxis,
    axis2: CartesianAxis,
    depth: Real,
    options: &InPlaneOptions,
) -> Result<Solid<S>, ValidationError> {
    let basis = OrthoNormalBasis::cartesian(axis1, axis2)?;
    extrude_in_orthonormal_basis(sketch, &basis, depth, options)
}

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    /// Faces lying in the basis plane and facing along its normal, in the
    /// basis' 2‑D coordinates and unioned.
    pub fn project_to_orthonormal_basis(&self, basis: &OrthoNormalBasis) -> Sketch<S> {
        let normal = basis.plane.normal;
        let rings: Vec<Vec<Point2<Real>>> = self
            .polygons
            .iter()
            .filter(|p| (p.plane.normal - normal).norm_squared() < EPSILON * EPSILON)
            .map(|p| p.vertices.iter().map(|v| basis.to_2d(&v.pos)).collect())
            .collect();
        Sketch::from_polygons(&rings, None)
    }

    /// Cross-section of the solid in the basis plane.
    pub fn section_cut(&self, basis: &OrthoNormalBasis) -> Sketch<S> {
        if self.polygons.is_empty() {
            return Sketch::new();
        }
        let plane = &basis.plane;
        let slab_floor = Plane::from_normal(-plane.normal, -plane.w + 10.0 * EPSILON);
        self.cut_by_plane(plane)
            .cut_by_plane(&slab_floor)
            .project_to_orthonormal_basis(basis)
    }

    /// Cut at the plane through `point` with `normal`, move the front part by
    /// `normal * length` and fill the gap with the extruded cross-section.
    ///
    /// ## Errors
    /// [`ValidationError::ZeroExtrusion`] when `length` is zero.
    pub fn stretch_at_plane(
        &self,
        normal: &Vector3<Real>,
        point: &Point3<Real>,
        length: Real,
    ) -> Result<Solid<S>, ValidationError> {
        if self.polygons.is_empty() {
            return Ok(self.clone());
        }
        let Some(normal) = normal.try_normalize(EPSILON) else {
            return Err(ValidationError::DegenerateFrame(*normal, *normal));
        };
        let plane = Plane::from_normal_and_point(normal, point);
        let basis = OrthoNormalBasis::new(plane.clone());

        let section = self.section_cut(&basis);
        let middle = extrude_in_orthonormal_basis(&section, &basis, length, &InPlaneOptions::default())?;
        let back = self.cut_by_plane(&plane);
        let front = self
            .cut_by_plane(&plane.flipped())
            .translate_vector(normal * length);

        Ok(Solid::union_all(&[back, middle, front]))
    }
}

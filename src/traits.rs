use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{EPSILON, Real};
use crate::solid::plane::Plane;
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Translation3, Unit, Vector3};

/// Boolean operations + transformations
pub trait CSGOps: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    fn xor(&self, other: &Self) -> Self;

    /// Apply a 4×4 matrix. Implementations return `self` unchanged when the
    /// matrix cannot be applied (singular); see `Solid::try_transform` for the
    /// checked form.
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&self) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Returns a new Self translated so that its bounding-box center is at the origin (0,0,0).
    fn center(&self) -> Self {
        let aabb = self.bounding_box();

        let center_x = (aabb.mins.x + aabb.maxs.x) * 0.5;
        let center_y = (aabb.mins.y + aabb.maxs.y) * 0.5;
        let center_z = (aabb.mins.z + aabb.maxs.z) * 0.5;

        self.translate(-center_x, -center_y, -center_z)
    }

    /// Translates the object so that its bottommost point(s) sit exactly at z=0.
    ///
    /// # Example
    /// ```
    /// use csg_kernel::solid::Solid;
    /// use csg_kernel::traits::CSGOps;
    /// let solid: Solid<()> = Solid::cuboid(1.0, 1.0, 3.0, None).translate(2.0, 1.0, -2.0);
    /// let floated = solid.float();
    /// assert_eq!(floated.bounding_box().mins.z, 0.0);
    /// ```
    fn float(&self) -> Self {
        let aabb = self.bounding_box();
        let min_z = aabb.mins.z;
        self.translate(0.0, 0.0, -min_z)
    }

    /// Rotates by x_degrees, y_degrees, z_degrees (applied X, then Y, then Z)
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Rotate by `degrees` around the line through `center` along `axis`.
    ///
    /// A zero `axis` leaves the object unchanged.
    fn rotate_around_axis(&self, center: &Point3<Real>, axis: &Vector3<Real>, degrees: Real) -> Self {
        let Some(axis) = Unit::try_new(*axis, EPSILON) else {
            return self.clone();
        };
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians()).to_homogeneous();
        let to_origin = Translation3::from(-center.coords).to_homogeneous();
        let back = Translation3::from(center.coords).to_homogeneous();
        self.transform(&(back * rotation * to_origin))
    }

    /// Scales by scale_x, scale_y, scale_z
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }

    /// Reflect (mirror) about an arbitrary plane `plane`.
    ///
    /// The plane is specified by:
    ///   `plane.normal` = the plane’s normal vector (need not be unit),
    ///   `plane.w`      = the dot-product with that normal for points on the plane (offset).
    ///
    /// The reflection has a negative determinant, so `transform` already
    /// reverses the winding; faces keep pointing outward.
    fn mirror(&self, plane: Plane) -> Self {
        let len = plane.normal().norm();
        if len.abs() < EPSILON {
            // Degenerate plane? Just return clone (no transform)
            return self.clone();
        }

        let n = plane.normal() / len;
        let w = plane.offset() / len;

        // Translate so the plane crosses the origin
        let offset = n * w;
        let t1 = Translation3::from(-offset).to_homogeneous();

        // R = I - 2 n n^T
        let mut reflect_4 = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect_4.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);

        let t2 = Translation3::from(offset).to_homogeneous();

        self.transform(&(t2 * reflect_4 * t1))
    }

    /// Mirror across the plane x = 0.
    fn mirror_x(&self) -> Self {
        self.mirror(Plane::from_normal(Vector3::x(), 0.0))
    }

    /// Mirror across the plane y = 0.
    fn mirror_y(&self) -> Self {
        self.mirror(Plane::from_normal(Vector3::y(), 0.0))
    }

    /// Mirror across the plane z = 0.
    fn mirror_z(&self) -> Self {
        self.mirror(Plane::from_normal(Vector3::z(), 0.0))
    }
}

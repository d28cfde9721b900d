//! A **Constructive Solid Geometry (CSG)** kernel: Boolean operations (*union*,
//! *difference*, *intersection*, *xor*) on solids stored as planar polygon
//! sets, computed with [BSP](solid::bsp) trees, plus the passes that keep
//! repeated results clean and comparable:
//!
//! - [canonicalization](solid::Solid::canonicalized) snaps nearly equal
//!   coordinates and planes onto shared representatives,
//! - [retesselation](solid::Solid::retesselated) merges coplanar fragments
//!   back into convex polygons and repairs T-junctions.
//!
//! A small [2‑D sketch](sketch::Sketch) type and the [extrusion
//! bridge](extrudes) turn outlines into solids, and [`io`] holds the compact
//! and object interchange forms.
//!
//! ```
//! use csg_kernel::{CSGOps, Solid};
//!
//! let a: Solid<()> = Solid::cube(2.0, None);
//! let b = Solid::cube(2.0, None).translate(1.0, 1.0, 1.0);
//! let c = a.union(&b);
//! assert!((c.volume() - 15.0).abs() < 1e-9);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod extrudes;
pub mod float_types;
pub mod io;
pub mod sketch;
pub mod solid;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::{IoError, ValidationError};
pub use extrudes::{
    ExtrudeOptions, InPlaneOptions, RotateExtrudeOptions, extrude, extrude_in_orthonormal_basis,
    extrude_in_plane, rotate_extrude,
};
pub use sketch::{CapPlacement, Sketch};
pub use solid::connector::{CartesianAxis, Connector, OrthoNormalBasis};
pub use solid::plane::Plane;
pub use solid::polygon::Polygon;
pub use solid::vertex::Vertex;
pub use solid::{BooleanOptions, Solid};
pub use traits::CSGOps;

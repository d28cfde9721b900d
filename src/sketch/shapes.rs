//! 2D Shapes as `Sketch`s

use crate::errors::ValidationError;
use crate::float_types::{Real, TAU};
use crate::sketch::Sketch;
use geo::{LineString, MultiPolygon, Polygon as GeoPolygon, line_string};
use nalgebra::{Point2, Point3};

impl<S: Clone + Send + Sync> Sketch<S> {
    /// Creates a 2D rectangle in the XY plane with one corner at the origin.
    ///
    /// # Example
    /// ```
    /// # use csg_kernel::sketch::Sketch;
    /// let sq2: Sketch<()> = Sketch::rectangle(2.0, 3.0, None);
    /// assert_eq!(sq2.sides().len(), 4);
    /// ```
    pub fn rectangle(width: Real, length: Real, shared: Option<S>) -> Self {
        let outer = line_string![
            (x: 0.0,     y: 0.0),
            (x: width,   y: 0.0),
            (x: width,   y: length),
            (x: 0.0,     y: length),
            (x: 0.0,     y: 0.0),  // close explicitly
        ];
        Sketch::from_multipolygon(MultiPolygon::new(vec![GeoPolygon::new(outer, vec![])]), shared)
    }

    pub fn square(width: Real, shared: Option<S>) -> Self {
        Self::rectangle(width, width, shared)
    }

    /// Regular `segments`-gon inscribed in a circle of `radius` around the
    /// origin. Fewer than 3 segments gives the empty sketch.
    pub fn circle(radius: Real, segments: usize, shared: Option<S>) -> Self {
        if segments < 3 || radius <= 0.0 {
            return Sketch::new();
        }
        let mut coords: Vec<(Real, Real)> = (0..segments)
            .map(|i| {
                let theta = TAU * (i as Real) / (segments as Real);
                (radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        // close it
        coords.push(coords[0]);
        let polygon_2d = GeoPolygon::new(LineString::from(coords), vec![]);
        Sketch::from_multipolygon(MultiPolygon::new(vec![polygon_2d]), shared)
    }

    /// Simple polygon through `points`, in either winding.
    ///
    /// ## Errors
    /// [`ValidationError::TooFewPoints`] below three points,
    /// [`ValidationError::InvalidCoordinate`] for non-finite input.
    pub fn polygon(points: &[Point2<Real>], shared: Option<S>) -> Result<Self, ValidationError> {
        if points.len() < 3 {
            return Err(ValidationError::TooFewPoints(points.len()));
        }
        if let Some(bad) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ValidationError::InvalidCoordinate(Point3::new(bad.x, bad.y, 0.0)));
        }
        let coords: Vec<(Real, Real)> = points.iter().map(|p| (p.x, p.y)).collect();
        let polygon_2d = GeoPolygon::new(LineString::from(coords), vec![]);
        Ok(Sketch::from_multipolygon(MultiPolygon::new(vec![polygon_2d]), shared))
    }
}

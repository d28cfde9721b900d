mod support;

use csg_kernel::{
    CSGOps, CartesianAxis, ExtrudeOptions, InPlaneOptions, RotateExtrudeOptions, Sketch, Solid,
    ValidationError, extrude, extrude_in_plane,
    float_types::{PI, Real},
    rotate_extrude,
};
use nalgebra::Vector3;

use crate::support::{approx_eq, bounding_box, is_watertight};

fn ring_profile() -> Sketch<()> {
    // square cross-section one unit out from the axis
    Sketch::square(1.0, None).translate(1.0, 0.0)
}

#[test]
fn downward_extrusion_hangs_below_the_sketch() {
    let options = ExtrudeOptions {
        offset: Vector3::new(0.0, 0.0, -2.0),
        ..Default::default()
    };
    let solid: Solid<()> = extrude(&Sketch::rectangle(1.0, 3.0, None), &options).expect("extrude");
    assert!(approx_eq(solid.volume(), 6.0, 1e-9));
    let bounds = bounding_box(solid.polygons());
    assert!(approx_eq(bounds[2], -2.0, 1e-12) && approx_eq(bounds[5], 0.0, 1e-12));
}

#[test]
fn slanted_extrusion_is_a_parallelepiped() {
    let options = ExtrudeOptions {
        offset: Vector3::new(1.0, 0.5, 1.0),
        ..Default::default()
    };
    let solid: Solid<()> = extrude(&Sketch::square(1.0, None), &options).expect("extrude");
    assert!(approx_eq(solid.volume(), 1.0, 1e-9));
    let bounds = bounding_box(solid.polygons());
    assert!(approx_eq(bounds[3], 2.0, 1e-12) && approx_eq(bounds[4], 1.5, 1e-12));
}

#[test]
fn extruded_sketch_with_a_hole_is_closed() {
    let outer: Sketch<()> = Sketch::square(4.0, None);
    let hole: Sketch<()> = Sketch::square(2.0, None).translate(1.0, 1.0);
    let frame: Sketch<()> = Sketch::from_multipolygon(
        geo::BooleanOps::difference(&outer.geometry, &hole.geometry),
        None,
    );
    let solid = extrude(&frame, &ExtrudeOptions::default()).expect("extrude");
    assert!(approx_eq(solid.volume(), 12.0, 1e-9));
    assert!(is_watertight(&solid.retesselated()));
}

#[test]
fn torus_volume_approaches_pappus() {
    let profile: Sketch<()> = Sketch::circle(0.5, 32, None).translate(2.0, 0.0);
    let torus = rotate_extrude(
        &profile,
        &RotateExtrudeOptions {
            angle: 360.0,
            resolution: 32,
        },
    )
    .expect("revolve");
    let pappus = 2.0 * PI * 2.0 * PI * 0.25;
    assert!(torus.volume() > 0.0);
    assert!((torus.volume() - pappus).abs() / pappus < 0.03);
    assert!(is_watertight(&torus));
}

#[test]
fn quarter_turn_is_capped() {
    let options = RotateExtrudeOptions {
        angle: 90.0,
        resolution: 16,
    };
    let wedge = rotate_extrude(&ring_profile(), &options).expect("revolve");
    // area 1 with its centroid 1.5 from the axis
    let expected = 1.5 * PI / 2.0;
    assert!((wedge.volume() - expected).abs() / expected < 0.01);
    assert!(is_watertight(&wedge));
    assert!(wedge.is_retesselated());
}

#[test]
fn angles_wrap_modulo_a_full_turn() {
    let revolve = |angle| {
        rotate_extrude(
            &ring_profile(),
            &RotateExtrudeOptions {
                angle,
                resolution: 8,
            },
        )
        .expect("revolve")
    };
    assert_eq!(revolve(720.0), revolve(360.0));
    assert_eq!(revolve(450.0), revolve(90.0));
}

#[test]
fn bad_revolution_parameters_are_rejected() {
    let sketch = ring_profile();
    let with = |angle, resolution| rotate_extrude(&sketch, &RotateExtrudeOptions { angle, resolution });
    assert_eq!(with(-10.0, 8), Err(ValidationError::InvalidAngle(-10.0)));
    assert!(matches!(with(Real::INFINITY, 8), Err(ValidationError::InvalidAngle(_))));
    assert!(matches!(
        with(90.0, 0),
        Err(ValidationError::InvalidResolution { got: 0, .. })
    ));
}

#[test]
fn extrude_in_plane_places_the_sketch_on_the_axes() {
    let sketch: Sketch<()> = Sketch::rectangle(1.0, 2.0, None);
    let solid =
        extrude_in_plane(&sketch, CartesianAxis::Y, CartesianAxis::Z, 3.0, &InPlaneOptions::default())
            .expect("extrude");
    assert!(approx_eq(solid.volume(), 6.0, 1e-9));
    let bounds = bounding_box(solid.polygons());
    // Y x Z = +X
    let expected = [0.0, 0.0, 0.0, 3.0, 1.0, 2.0];
    for (got, want) in bounds.iter().zip(expected) {
        assert!(approx_eq(*got, want, 1e-9), "{bounds:?}");
    }

    assert!(matches!(
        extrude_in_plane(&sketch, CartesianAxis::X, CartesianAxis::NegX, 1.0, &InPlaneOptions::default()),
        Err(ValidationError::ParallelAxes(_, _))
    ));
}

#[test]
fn section_extrudes_back_to_the_prism() {
    let cube: Solid<()> = Solid::cuboid(2.0, 3.0, 4.0, None).translate(0.0, 0.0, -1.0);
    let basis = csg_kernel::OrthoNormalBasis::z0_plane();
    let section = cube.section_cut(&basis);
    assert!(approx_eq(section.area(), 6.0, 1e-9));

    let rebuilt = extrude(
        &section,
        &ExtrudeOptions {
            offset: Vector3::new(0.0, 0.0, 4.0),
            ..Default::default()
        },
    )
    .expect("extrude");
    assert!(approx_eq(rebuilt.volume(), cube.volume(), 1e-9));
}

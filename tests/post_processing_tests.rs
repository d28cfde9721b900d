mod support;

use csg_kernel::{BooleanOptions, CSGOps, Solid, float_types::EPSILON};

use crate::support::{approx_eq, block, is_watertight};

fn raw_union() -> Solid<()> {
    let a = Solid::cube(2.0, None);
    let b = Solid::sphere(1.0, 12, 6, None).translate(2.0, 1.0, 1.0);
    a.union_with(&b, BooleanOptions::RAW)
}

#[test]
fn canonicalize_is_idempotent() {
    let once = raw_union().canonicalized();
    assert!(once.is_canonicalized());
    assert_eq!(once.canonicalized(), once);
}

#[test]
fn retesselate_is_idempotent() {
    let once = raw_union().retesselated();
    assert!(once.is_canonicalized() && once.is_retesselated());
    assert_eq!(once.retesselated(), once);
}

#[test]
fn canonical_polygons_canonicalize_to_themselves() {
    let once = raw_union().canonicalized();
    // from_polygons clears the flags, so the pass really runs again
    let again = Solid::from_polygons(once.polygons()).canonicalized();
    assert_eq!(again.polygons(), once.polygons());
}

#[test]
fn retesselated_polygons_retesselate_to_themselves() {
    let once = raw_union().retesselated();
    let again = Solid::from_polygons(once.polygons()).retesselated();
    assert_eq!(again.polygons(), once.polygons());
}

#[test]
fn noise_below_tolerance_snaps_to_one_representative() {
    let cube: Solid<()> = Solid::cube(1.0, None);
    let noisy = cube.translate(EPSILON * 0.01, -EPSILON * 0.01, EPSILON * 0.01);
    let mut polygons = cube.to_polygons();
    polygons.extend(noisy.to_polygons());

    let canonical = Solid::from_polygons(&polygons).canonicalized();
    let (original, copy) = canonical.polygons().split_at(6);
    for (a, b) in original.iter().zip(copy) {
        let pa: Vec<_> = a.vertices.iter().map(|v| v.pos).collect();
        let pb: Vec<_> = b.vertices.iter().map(|v| v.pos).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.plane, b.plane);
    }
}

#[test]
fn collapsed_polygons_are_dropped() {
    let cube: Solid<()> = Solid::cube(1.0, None);
    let tiny = Solid::cube(EPSILON * 0.1, None).translate(5.0, 5.0, 5.0);
    let mut polygons = cube.to_polygons();
    polygons.extend(tiny.to_polygons());
    let canonical = Solid::from_polygons(&polygons).canonicalized();
    assert_eq!(canonical.polygon_count(), 6);
}

#[test]
fn t_junctions_are_repaired() {
    // the tower footprint splits the top face of the base
    let base = block([0.0, 0.0, 0.0], [2.0, 2.0, 1.0]);
    let tower = block([0.5, 0.5, 1.0], [1.5, 1.5, 2.0]);
    let combined = base.union(&tower);
    assert!(is_watertight(&combined));
    assert!(approx_eq(combined.volume(), 5.0, 1e-9));
}

#[test]
fn fix_t_junctions_alone_closes_cracks() {
    let left = block([0.0, 0.0, 0.0], [1.0, 2.0, 1.0]);
    let right_low = block([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
    let right_high = block([1.0, 1.0, 0.0], [2.0, 2.0, 1.0]);
    let mut polygons = left.to_polygons();
    // drop the faces glued together at x = 1
    polygons.retain(|p| p.plane.normal.x < 0.5);
    for part in [&right_low, &right_high] {
        polygons.extend(part.polygons().iter().filter(|p| p.plane.normal.x > -0.5).cloned());
    }
    polygons.retain(|p| {
        let on_seam = p.vertices.iter().all(|v| v.pos.x >= 1.0 && v.pos.y == 1.0);
        !(p.plane.normal.y.abs() > 0.5 && on_seam)
    });

    let cracked = Solid::from_polygons(&polygons);
    assert!(!is_watertight(&cracked));
    let fixed = cracked.fix_t_junctions();
    assert!(fixed.is_canonicalized() && !fixed.is_retesselated());
    assert!(is_watertight(&fixed));
}

#[test]
fn shared_tags_split_groups() {
    let a: Solid<u32> = Solid::cube(1.0, Some(1));
    let b = Solid::cube(1.0, Some(2)).translate(1.0, 0.0, 0.0);
    let glued = a.union(&b);
    // coplanar faces with different tags stay apart
    assert_eq!(glued.polygon_count(), 10);
    assert_eq!(glued.polygons().iter().filter(|p| p.shared == Some(1)).count(), 5);
    assert_eq!(glued.polygons().iter().filter(|p| p.shared == Some(2)).count(), 5);
}

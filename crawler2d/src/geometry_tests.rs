use crate::geometry::{
    Rect, angle_diff, constrain_distance, ease_out_cubic, lerp, normalize_angle,
    solve_two_bone_ik,
};
use glam::Vec2;
use std::f32::consts::PI;

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-3,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

#[test]
fn lerp_does_not_clamp_t() {
    assert_approx(lerp(0.0, 10.0, 0.5), 5.0);
    assert_approx(lerp(0.0, 10.0, 1.5), 15.0);
    assert_approx(lerp(2.0, 4.0, -1.0), 0.0);
}

#[test]
fn ease_out_cubic_hits_endpoints_and_front_loads() {
    assert_approx(ease_out_cubic(0.0), 0.0);
    assert_approx(ease_out_cubic(1.0), 1.0);
    assert!(ease_out_cubic(0.5) > 0.5);
}

#[test]
fn normalize_angle_wraps_into_half_open_range() {
    assert_approx(normalize_angle(3.0 * PI), PI);
    assert_approx(normalize_angle(-PI), PI);
    assert_approx(normalize_angle(PI), PI);
    assert_approx(normalize_angle(-3.0 * PI / 2.0), PI / 2.0);
    assert_approx(normalize_angle(0.25), 0.25);

    for i in -200..200 {
        let a = normalize_angle(i as f32 * 0.37);
        assert!(a > -PI && a <= PI + 1.0e-6, "angle {a} escaped (-pi, pi]");
    }
}

#[test]
fn angle_diff_takes_shortest_path_across_the_seam() {
    assert_approx(angle_diff(PI - 0.1, -PI + 0.1), 0.2);
    assert_approx(angle_diff(-PI + 0.1, PI - 0.1), -0.2);
    assert_approx(angle_diff(0.0, PI / 2.0), PI / 2.0);
}

#[test]
fn constrain_distance_preserves_direction() {
    let p = constrain_distance(Vec2::new(10.0, 0.0), Vec2::ZERO, 4.0);
    assert_approx(p.x, 4.0);
    assert_approx(p.y, 0.0);

    let p = constrain_distance(Vec2::new(3.0, 4.0), Vec2::new(0.0, 0.0), 10.0);
    assert_approx(p.x, 6.0);
    assert_approx(p.y, 8.0);
}

#[test]
fn constrain_distance_coincident_points_fall_back_to_positive_x() {
    let anchor = Vec2::new(5.0, -2.0);
    let p = constrain_distance(anchor, anchor, 18.0);
    assert_approx(p.x, 23.0);
    assert_approx(p.y, -2.0);
}

#[test]
fn two_bone_ik_reaches_targets_inside_the_band() {
    let origin = Vec2::new(12.0, -7.0);
    let (len1, len2) = (45.0, 55.0);
    for step in 0..24 {
        let angle = step as f32 * 0.3;
        for dist in [14.0f32, 30.0, 60.0, 97.0] {
            let target = origin + Vec2::new(angle.cos(), angle.sin()) * dist;
            for bend in [1, -1] {
                let ik = solve_two_bone_ik(origin, target, len1, len2, bend);
                assert_approx(ik.elbow.distance(origin), len1);
                assert_approx(ik.elbow.distance(target), len2);
                assert_approx(ik.end.x, target.x);
                assert_approx(ik.end.y, target.y);
            }
        }
    }
}

#[test]
fn two_bone_ik_bend_sign_picks_opposite_elbows() {
    let origin = Vec2::ZERO;
    let target = Vec2::new(60.0, 0.0);
    let pos = solve_two_bone_ik(origin, target, 40.0, 40.0, 1);
    let neg = solve_two_bone_ik(origin, target, 40.0, 40.0, -1);
    assert!(pos.elbow.y > 0.0);
    assert!(neg.elbow.y < 0.0);
    assert_approx(pos.elbow.x, neg.elbow.x);
}

#[test]
fn two_bone_ik_out_of_range_targets_stay_finite() {
    let origin = Vec2::new(100.0, 100.0);
    let cases = [
        origin,
        origin + Vec2::new(0.5, 0.0),
        origin + Vec2::new(1000.0, -400.0),
        origin + Vec2::new(-3.0, 1.0),
    ];
    for target in cases {
        let ik = solve_two_bone_ik(origin, target, 25.0, 35.0, -1);
        assert!(ik.elbow.is_finite());
        assert!(ik.end.is_finite());
        assert!(ik.upper_angle.is_finite());
        assert!(ik.lower_angle.is_finite());
        assert_approx(ik.elbow.distance(origin), 25.0);
        assert_approx(ik.elbow.distance(ik.end), 35.0);
    }

    let far = solve_two_bone_ik(origin, origin + Vec2::new(500.0, 0.0), 25.0, 35.0, 1);
    assert_approx(far.end.distance(origin), 58.0);

    let degenerate = solve_two_bone_ik(origin, origin + Vec2::X, 1.0, 1.0, 1);
    assert!(degenerate.elbow.is_finite());
    assert!(degenerate.lower_angle.is_finite());
}

#[test]
fn rect_expand_and_contains() {
    let r = Rect::from_origin_size(Vec2::new(10.0, 20.0), Vec2::new(100.0, 10.0));
    assert_eq!(r.center(), Vec2::new(60.0, 25.0));
    assert!(!r.contains(Vec2::new(5.0, 25.0)));
    let grown = r.expand(30.0, 50.0);
    assert!(grown.contains(Vec2::new(-10.0, 25.0)));
    assert!(grown.contains(Vec2::new(60.0, 75.0)));
    assert!(!grown.contains(Vec2::new(60.0, 81.0)));
}

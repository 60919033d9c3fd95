use crate::{Error, InputTracker, Viewport};
use glam::Vec2;

fn tracker() -> InputTracker {
    InputTracker::new(Viewport::new(1000.0, 800.0).unwrap(), 30.0)
}

#[test]
fn viewport_rejects_empty_and_non_finite_sizes() {
    assert!(matches!(
        Viewport::new(0.0, 10.0),
        Err(Error::InvalidViewport { .. })
    ));
    assert!(Viewport::new(10.0, f32::INFINITY).is_err());
    assert!(Viewport::new(-5.0, 10.0).is_err());
}

#[test]
fn tiny_viewport_interior_collapses_without_panicking() {
    let viewport = Viewport::new(40.0, 100.0).unwrap();
    assert!(!viewport.fits_padding(30.0));
    let (min, max) = viewport.interior(30.0);
    assert_eq!(min, Vec2::splat(30.0));
    assert_eq!(max, Vec2::new(30.0, 70.0));
    assert_eq!(viewport.clamp(Vec2::new(-100.0, 500.0), 30.0), Vec2::new(30.0, 70.0));
}

#[test]
fn pointer_target_is_clamped_into_the_interior() {
    let mut input = tracker();
    input.pointer_moved(-50.0, 900.0);
    assert_eq!(input.pointer().target, Vec2::new(30.0, 770.0));
    input.pointer_moved(f32::NAN, 10.0);
    assert_eq!(input.pointer().target, Vec2::new(30.0, 770.0));
}

#[test]
fn advance_reports_displacement_once() {
    let mut input = tracker();
    input.pointer_moved(600.0, 400.0);
    let sample = input.advance();
    assert_eq!(sample.displacement, Vec2::new(100.0, 0.0));
    assert!(!sample.reset_speed);
    assert_eq!(input.advance().displacement, Vec2::ZERO);
}

#[test]
fn reentry_does_not_register_as_movement() {
    let mut input = tracker();
    input.pointer_moved(100.0, 100.0);
    input.advance();

    input.pointer_left();
    assert!(!input.is_tracking());
    input.pointer_entered();
    input.pointer_moved(900.0, 700.0);

    let sample = input.advance();
    assert_eq!(sample.target, Vec2::new(900.0, 700.0));
    assert_eq!(sample.displacement, Vec2::ZERO);
    assert!(sample.reset_speed);
    assert!(!input.advance().reset_speed);
}

#[test]
fn hidden_page_stops_tracking_until_the_pointer_moves() {
    let mut input = tracker();
    input.set_page_visible(false);
    assert!(!input.is_tracking());

    input.set_page_visible(true);
    assert!(!input.is_tracking());
    assert!(input.pointer().just_returned);

    input.pointer_moved(200.0, 200.0);
    assert!(input.is_tracking());
    assert!(input.advance().reset_speed);
}

#[test]
fn resize_reclamps_every_pointer_position() {
    let mut input = tracker();
    input.pointer_moved(950.0, 750.0);
    input.smooth_cursor(1.0);
    input.resize(Viewport::new(400.0, 300.0).unwrap());
    let pointer = input.pointer();
    assert_eq!(pointer.target, Vec2::new(370.0, 270.0));
    assert_eq!(pointer.previous, Vec2::new(370.0, 270.0));
    assert_eq!(pointer.current, Vec2::new(370.0, 270.0));
}

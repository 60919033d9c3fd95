use crate::effects::{VhsOverlay, format_clock};
use crate::{DrawCommand, DrawList, Paint, Viewport};

fn viewport() -> Viewport {
    Viewport::new(640.0, 480.0).unwrap()
}

#[test]
fn clock_labels_are_zero_padded() {
    assert_eq!(format_clock(7, 5, 0), "07:05:00");
    assert_eq!(format_clock(23, 59, 59), "23:59:59");
}

#[test]
fn static_lines_start_on_screen_with_bounded_parameters() {
    let overlay = VhsOverlay::new(viewport(), 1);
    assert_eq!(overlay.static_lines().len(), 5);
    for line in overlay.static_lines() {
        assert!((0.0..=480.0).contains(&line.y));
        assert!((1.0..=3.0).contains(&line.speed));
        assert!((1.0..=4.0).contains(&line.thickness));
        assert!((0.0..=0.3).contains(&line.opacity));
    }
}

#[test]
fn frame_starts_with_background_and_ends_with_vignette() {
    let mut overlay = VhsOverlay::new(viewport(), 2);
    overlay.set_clock_label("12:00:00");
    let mut out = DrawList::default();
    overlay.draw(&mut out, viewport());

    assert!(matches!(
        out.commands.first(),
        Some(DrawCommand::FillRect {
            paint: Paint::Radial { .. },
            ..
        })
    ));
    assert!(matches!(
        out.commands.last(),
        Some(DrawCommand::FillRect {
            paint: Paint::Radial { .. },
            ..
        })
    ));
    let texts: Vec<&str> = out
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["REC \u{25cf}", "12:00:00"]);
}

#[test]
fn static_lines_wrap_above_the_top_edge() {
    let mut overlay = VhsOverlay::new(viewport(), 3);
    let mut out = DrawList::default();
    let mut wrapped = false;
    for _ in 0..600 {
        out.clear();
        overlay.draw(&mut out, viewport());
        for line in overlay.static_lines() {
            assert!(line.y >= -10.0 && line.y <= 480.0);
            wrapped |= line.y == -10.0;
        }
    }
    assert!(wrapped);
}

#[test]
fn glitch_decays_and_stays_bounded() {
    let mut overlay = VhsOverlay::new(viewport(), 4);
    let mut out = DrawList::default();
    let mut seen = false;
    for _ in 0..2000 {
        overlay.draw(&mut out, viewport());
        let glitch = overlay.glitch_intensity();
        assert!((0.0..0.5).contains(&glitch));
        seen |= glitch > 0.0;
    }
    assert!(seen);
}

#[test]
fn same_seed_draws_the_same_frames() {
    let mut a = VhsOverlay::new(viewport(), 9);
    let mut b = VhsOverlay::new(viewport(), 9);
    for _ in 0..50 {
        let mut out_a = DrawList::default();
        let mut out_b = DrawList::default();
        a.draw(&mut out_a, viewport());
        b.draw(&mut out_b, viewport());
        assert_eq!(out_a, out_b);
    }
}

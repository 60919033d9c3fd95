use crate::effects::{DamageEvent, GlyphState, TextDamage};
use crate::{
    FrameObserver, FrameSnapshot, Leg, LegPairConfig, Rect, Side, SpineSegment, Viewport,
};
use glam::Vec2;

fn segment(x: f32, y: f32) -> SpineSegment {
    SpineSegment {
        position: Vec2::new(x, y),
        angle: 0.0,
        width: 20.0,
    }
}

/// A line of ten 10x20 glyphs starting at (100, 100).
fn damage() -> TextDamage {
    let glyphs = (0..10)
        .map(|i| {
            Rect::from_origin_size(
                Vec2::new(100.0 + i as f32 * 10.0, 100.0),
                Vec2::new(10.0, 20.0),
            )
        })
        .collect();
    let mut damage = TextDamage::new(5);
    damage.set_layout(
        Rect::from_origin_size(Vec2::new(100.0, 100.0), Vec2::new(100.0, 20.0)),
        glyphs,
    );
    damage
}

fn observe(damage: &mut TextDamage, time: f64, segments: &[SpineSegment], legs: &[Leg]) {
    let frame = FrameSnapshot {
        tick: 0,
        dt: 1.0 / 60.0,
        time,
        viewport: Viewport::new(1000.0, 800.0).unwrap(),
        segments,
        legs,
    };
    damage.on_frame(&frame);
}

#[test]
fn nothing_happens_without_a_layout() {
    let mut damage = TextDamage::new(1);
    observe(&mut damage, 0.0, &[segment(105.0, 110.0)], &[]);
    assert_eq!(damage.drain_events().count(), 0);
}

#[test]
fn body_over_a_glyph_cracks_it_away_from_the_hit() {
    let mut damage = damage();
    observe(&mut damage, 0.0, &[segment(125.0, 110.0)], &[]);
    let events: Vec<DamageEvent> = damage.drain_events().collect();
    assert!(!events.is_empty());

    for event in &events {
        let DamageEvent::Cracked {
            index,
            offset,
            fragments,
        } = event
        else {
            panic!("unexpected event {event:?}");
        };
        let center_x = 105.0 + *index as f32 * 10.0;
        let hit_x = 125.0 - center_x;
        if hit_x > 0.0 {
            assert!(offset.x <= -5.0 && offset.x >= -20.0);
        } else if hit_x < 0.0 {
            assert!(offset.x >= 5.0 && offset.x <= 20.0);
        }
        assert!(offset.y >= 10.0 && offset.y <= 30.0);
        assert!(offset.rotation_deg.abs() <= 20.0);
        assert!((2..=4).contains(&fragments.len()));
        for fragment in fragments {
            assert_eq!(fragment.origin, Vec2::new(center_x, 100.0));
            assert!(fragment.font_size_px >= 8.0 && fragment.font_size_px <= 16.0);
            assert!(fragment.drift.y >= 20.0 && fragment.drift.y <= 60.0);
        }
    }
    assert_eq!(
        damage.glyph_state(2),
        Some(GlyphState::Cracked { since: 0.0 })
    );
    assert_eq!(damage.glyph_state(9), Some(GlyphState::Intact));

    observe(&mut damage, 0.1, &[segment(125.0, 110.0)], &[]);
    assert_eq!(damage.drain_events().count(), 0);
}

#[test]
fn feet_crack_glyphs_within_their_smaller_radius() {
    let mut damage = damage();
    let mut leg = Leg::new(
        0,
        &LegPairConfig::new(0, 40.0, 40.0, 1.0),
        Side::Left,
        Vec2::ZERO,
    );
    leg.render_foot = Vec2::new(200.0, 130.0);
    observe(&mut damage, 0.0, &[segment(900.0, 700.0)], std::slice::from_ref(&leg));
    let cracked: Vec<usize> = damage
        .drain_events()
        .filter_map(|e| match e {
            DamageEvent::Cracked { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    assert_eq!(cracked, vec![8, 9]);
}

#[test]
fn cracked_glyphs_recover_then_settle_once_the_creature_leaves() {
    let mut damage = damage();
    let far = [segment(900.0, 700.0)];
    observe(&mut damage, 0.0, &[segment(105.0, 110.0)], &[]);
    damage.drain_events().for_each(drop);

    observe(&mut damage, 0.3, &far, &[]);
    assert_eq!(damage.drain_events().count(), 0);

    observe(&mut damage, 0.6, &far, &[]);
    let events: Vec<DamageEvent> = damage.drain_events().collect();
    assert!(events.contains(&DamageEvent::Recovering { index: 0 }));
    assert_eq!(
        damage.glyph_state(0),
        Some(GlyphState::Recovering { since: 0.6 })
    );

    observe(&mut damage, 0.9, &far, &[]);
    assert_eq!(damage.drain_events().count(), 0);

    observe(&mut damage, 1.2, &far, &[]);
    let events: Vec<DamageEvent> = damage.drain_events().collect();
    assert!(events.contains(&DamageEvent::Settled { index: 0 }));
    assert_eq!(damage.glyph_state(0), Some(GlyphState::Intact));
}

#[test]
fn glyphs_stay_cracked_while_the_creature_lingers_nearby() {
    let mut damage = damage();
    observe(&mut damage, 0.0, &[segment(105.0, 110.0)], &[]);
    damage.drain_events().for_each(drop);

    // Inside the grown block but out of reach of glyph 0.
    let lingering = [segment(215.0, 160.0)];
    for i in 1..=30 {
        observe(&mut damage, i as f64 * 0.1, &lingering, &[]);
    }
    assert!(matches!(
        damage.glyph_state(0),
        Some(GlyphState::Cracked { .. })
    ));
}

#[test]
fn recovering_glyph_cracks_again_when_hit() {
    let mut damage = damage();
    observe(&mut damage, 0.0, &[segment(105.0, 110.0)], &[]);
    observe(&mut damage, 0.6, &[segment(900.0, 700.0)], &[]);
    damage.drain_events().for_each(drop);

    observe(&mut damage, 0.7, &[segment(105.0, 110.0)], &[]);
    assert!(
        damage
            .drain_events()
            .any(|e| matches!(e, DamageEvent::Cracked { index: 0, .. }))
    );
}

#[test]
fn relayout_keeps_state_only_for_the_same_glyph_count() {
    let mut damage = damage();
    observe(&mut damage, 0.0, &[segment(105.0, 110.0)], &[]);
    let block = Rect::from_origin_size(Vec2::new(0.0, 0.0), Vec2::new(100.0, 20.0));
    let moved: Vec<Rect> = (0..10)
        .map(|i| Rect::from_origin_size(Vec2::new(i as f32 * 10.0, 0.0), Vec2::new(10.0, 20.0)))
        .collect();

    damage.set_layout(block, moved);
    assert!(matches!(
        damage.glyph_state(0),
        Some(GlyphState::Cracked { .. })
    ));

    damage.set_layout(block, Vec::new());
    assert_eq!(damage.glyph_count(), 0);
    assert_eq!(damage.glyph_state(0), None);
}

#[test]
fn glyphs_recover_on_a_clock_that_has_run_for_days() {
    let mut damage = damage();
    let start = 524_288.0;
    observe(&mut damage, start, &[segment(105.0, 110.0)], &[]);
    damage.drain_events().for_each(drop);

    let far = [segment(900.0, 700.0)];
    for i in 1..=90 {
        observe(&mut damage, start + f64::from(i) / 60.0, &far, &[]);
    }
    assert_eq!(damage.glyph_state(0), Some(GlyphState::Intact));
}

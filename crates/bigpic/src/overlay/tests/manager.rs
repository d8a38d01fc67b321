use std::time::{Duration, Instant};

use eframe::egui::{Rect, pos2, vec2};

use super::{DURATION, FakeTargets, overlay, single_target, viewport};
use crate::overlay::OverlaySettings;
use crate::overlay::geometry::content_rect;
use crate::overlay::session::Phase;

fn settled(
    overlay: &mut crate::overlay::Overlay,
    targets: &FakeTargets,
    id: crate::overlay::TargetId,
    t0: Instant,
) {
    overlay.open(targets, id, viewport(), t0);
    overlay.tick(t0);
    overlay.tick(t0 + DURATION);
    assert!(matches!(
        overlay.active.as_ref().unwrap().phase,
        Phase::Settled
    ));
}

#[test]
fn open_creates_one_session() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();

    assert_eq!(overlay.visual_node_count(), 0);
    overlay.open(&targets, a, viewport(), t0);
    assert!(overlay.is_open());
    assert_eq!(overlay.current_target(), Some(a));
    assert_eq!(overlay.visual_node_count(), 2);
}

#[test]
fn open_while_open_is_a_noop() {
    let mut targets = FakeTargets::new();
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    let b = targets.add(2, 300.0, 100.0, vec2(640.0, 480.0));
    targets.group(&[a, b]);
    let mut overlay = overlay();
    let t0 = Instant::now();

    overlay.open(&targets, a, viewport(), t0);
    let id_before = overlay.active.as_ref().unwrap().id;

    overlay.open(&targets, b, viewport(), t0 + Duration::from_millis(10));
    assert_eq!(overlay.current_target(), Some(a));
    assert_eq!(overlay.active.as_ref().unwrap().id, id_before);
    assert_eq!(overlay.visual_node_count(), 2);
}

#[test]
fn close_without_session_is_a_noop() {
    let mut targets = FakeTargets::new();
    single_target(&mut targets);
    let mut overlay = overlay();

    overlay.close(&targets, Instant::now());
    assert!(!overlay.is_open());
    assert!(overlay.pending.is_empty());
    assert_eq!(overlay.visual_node_count(), 0);
}

#[test]
fn open_unresolvable_or_degenerate_target_is_a_noop() {
    let mut targets = FakeTargets::new();
    let flat = targets.add(1, 100.0, 100.0, vec2(800.0, 0.0));
    let mut overlay = overlay();
    let t0 = Instant::now();

    overlay.open(&targets, crate::overlay::TargetId(99), viewport(), t0);
    assert!(!overlay.is_open());

    // Zero intrinsic height must be guarded, never divided by.
    overlay.open(&targets, flat, viewport(), t0);
    assert!(!overlay.is_open());
}

#[test]
fn opening_waits_one_tick_then_arms_then_settles() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();

    overlay.open(&targets, a, viewport(), t0);
    assert!(matches!(
        overlay.active.as_ref().unwrap().phase,
        Phase::Opening { started: None }
    ));

    // First tick after the pinned frame painted: morph starts.
    overlay.tick(t0);
    let session = overlay.active.as_ref().unwrap();
    assert!(matches!(session.phase, Phase::Opening { started: Some(s) } if s == t0));
    let settings = *overlay.settings();
    let session = overlay.active.as_ref().unwrap();
    assert_eq!(session.morph_factor(t0, settings.duration, settings.easing), 0.0);
    let halfway = session.morph_factor(
        t0 + DURATION / 2,
        settings.duration,
        settings.easing,
    );
    assert!(halfway > 0.0 && halfway < 1.0);

    overlay.tick(t0 + DURATION);
    assert!(matches!(
        overlay.active.as_ref().unwrap().phase,
        Phase::Settled
    ));
}

#[test]
fn sequential_round_trip_leaves_nothing_behind() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);

    let t1 = t0 + Duration::from_secs(1);
    overlay.close(&targets, t1);
    assert!(overlay.is_open(), "session stays in the slot while closing");

    overlay.tick(t1 + DURATION);
    assert!(!overlay.is_open());
    assert_eq!(overlay.visual_node_count(), 0);
    assert!(overlay.pending.is_empty());
    assert!(overlay.retiring.is_empty());
}

/// The race the identity capture guards against: a close completion that
/// fires after a newer session opened must not clear the newer session.
#[test]
fn stale_close_completion_does_not_clear_a_newer_session() {
    let mut targets = FakeTargets::new();
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    let b = targets.add(2, 300.0, 100.0, vec2(640.0, 480.0));
    targets.group(&[a, b]);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);

    // close(A) schedules completion T1.
    let t1 = t0 + Duration::from_secs(1);
    overlay.close(&targets, t1);

    // Before T1 fires, open(B) succeeds, superseding the closing A.
    let t2 = t1 + DURATION / 2;
    overlay.open(&targets, b, viewport(), t2);
    assert_eq!(overlay.current_target(), Some(b));
    // A keeps animating out alongside B.
    assert_eq!(overlay.visual_node_count(), 4);

    // T1 fires: A's visuals go, B's slot must survive.
    overlay.tick(t1 + DURATION);
    assert_eq!(overlay.current_target(), Some(b));
    assert!(overlay.retiring.is_empty());
    assert_eq!(overlay.visual_node_count(), 2);
}

#[test]
fn double_close_completions_are_harmless() {
    let mut targets = FakeTargets::new();
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    let b = targets.add(2, 300.0, 100.0, vec2(640.0, 480.0));
    targets.group(&[a, b]);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);

    // Rapid double click while closing: two completions, both capturing A.
    let t1 = t0 + Duration::from_secs(1);
    let t2 = t1 + Duration::from_millis(50);
    overlay.close(&targets, t1);
    overlay.close(&targets, t2);
    assert_eq!(overlay.pending.len(), 2);

    // First completion clears the slot.
    overlay.tick(t1 + DURATION);
    assert!(!overlay.is_open());

    // A new session opens before the second completion fires.
    overlay.open(&targets, b, viewport(), t2 + DURATION);
    overlay.tick(t2 + DURATION);
    assert_eq!(
        overlay.current_target(),
        Some(b),
        "stale second completion must not clear the new session"
    );
    assert!(overlay.pending.is_empty());
}

#[test]
fn close_rederives_the_current_source_rect() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);

    // The page reflowed: the thumbnail moved since open.
    let moved = targets.add(1, 500.0, 400.0, vec2(800.0, 600.0));
    assert_eq!(moved, a);

    overlay.close(&targets, t0 + Duration::from_secs(1));
    let session = overlay.active.as_ref().unwrap();
    let expected = content_rect(
        Rect::from_min_size(pos2(500.0, 400.0), vec2(120.0, 80.0)),
        crate::overlay::geometry::EdgeInsets::ZERO,
    );
    assert_eq!(session.src_rect, expected);
}

#[test]
fn close_during_opening_reverses_from_partial_progress() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();

    overlay.open(&targets, a, viewport(), t0);
    overlay.tick(t0);

    let mid = t0 + DURATION / 2;
    overlay.close(&targets, mid);
    let session = overlay.active.as_ref().unwrap();
    let Phase::Closing { from, .. } = session.phase else {
        panic!("expected closing phase");
    };
    assert!(from > 0.0 && from < 1.0);

    let settings = *overlay.settings();
    let factor = session.morph_factor(mid, settings.duration, settings.easing);
    assert!((factor - from).abs() < 1e-5);
}

#[test]
fn update_is_a_noop_unless_settled() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();

    // Safe to call in bursts with no session at all.
    for _ in 0..3 {
        overlay.update(&targets, viewport());
    }

    overlay.open(&targets, a, viewport(), t0);
    let dest_before = overlay.active.as_ref().unwrap().dest_rect;
    let shrunk = Rect::from_min_size(pos2(0.0, 0.0), vec2(600.0, 400.0));
    overlay.update(&targets, shrunk);
    assert_eq!(
        overlay.active.as_ref().unwrap().dest_rect,
        dest_before,
        "still opening, resize must not reapply yet"
    );

    overlay.tick(t0);
    overlay.tick(t0 + DURATION);
    overlay.update(&targets, shrunk);
    let dest_after = overlay.active.as_ref().unwrap().dest_rect;
    assert_ne!(dest_after, dest_before);
    assert!(dest_after.height() <= 400.0 * overlay.settings().fill + 1e-3);
}

#[test]
fn navigate_swaps_target_then_settles_on_load() {
    let mut targets = FakeTargets::new();
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    let b = targets.add(2, 300.0, 100.0, vec2(400.0, 500.0));
    targets.group(&[a, b]);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);

    overlay.navigate(&targets, 1);
    assert_eq!(overlay.current_target(), Some(b));
    assert!(matches!(
        overlay.active.as_ref().unwrap().phase,
        Phase::Navigating
    ));
    // The overlay never closed, and the proxy still shows A's pixels
    // while B decodes.
    assert_eq!(overlay.visual_node_count(), 2);
    assert_eq!(overlay.active.as_ref().unwrap().displayed, a);

    overlay.target_loaded(&targets, viewport());
    let session = overlay.active.as_ref().unwrap();
    assert!(matches!(session.phase, Phase::Settled));
    assert_eq!(session.displayed, b);
    // Geometry now derives from B: taller than wide, so width-constrained
    // destination aspect follows B's intrinsic ratio.
    let ratio = session.dest_rect.width() / session.dest_rect.height();
    assert!((ratio - 400.0 / 500.0).abs() < 1e-2);
}

#[test]
fn navigate_with_missing_current_does_nothing() {
    let mut targets = FakeTargets::new();
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    let b = targets.add(2, 300.0, 100.0, vec2(640.0, 480.0));
    targets.group(&[a, b]);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);

    // The presented image disappeared from the live collection.
    targets.remove(a);
    overlay.navigate(&targets, 1);
    assert_eq!(overlay.current_target(), Some(a));
    assert!(matches!(
        overlay.active.as_ref().unwrap().phase,
        Phase::Settled
    ));
}

#[test]
fn navigate_respects_the_disabled_setting() {
    let mut targets = FakeTargets::new();
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    let b = targets.add(2, 300.0, 100.0, vec2(640.0, 480.0));
    targets.group(&[a, b]);
    let mut overlay = crate::overlay::Overlay::new(OverlaySettings {
        duration: DURATION,
        navigate: false,
        ..OverlaySettings::default()
    });
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);

    overlay.navigate(&targets, 1);
    assert_eq!(overlay.current_target(), Some(a));
}

#[test]
fn failed_target_load_settles_on_previous_geometry() {
    let mut targets = FakeTargets::new();
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    let b = targets.add(2, 300.0, 100.0, vec2(640.0, 480.0));
    targets.group(&[a, b]);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);
    let dest_before = overlay.active.as_ref().unwrap().dest_rect;

    overlay.navigate(&targets, 1);
    overlay.target_failed();
    let session = overlay.active.as_ref().unwrap();
    assert!(matches!(session.phase, Phase::Settled));
    assert_eq!(session.dest_rect, dest_before);
    // The proxy never switched away from the working pixels.
    assert_eq!(session.displayed, a);
    assert_eq!(session.target, b);
}

#[test]
fn close_keeps_geometry_when_rederivation_degenerates() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();
    settled(&mut overlay, &targets, a, t0);
    let session = overlay.active.as_ref().unwrap();
    let src_before = session.src_rect;
    let morph_before = session.morph;

    // The thumbnail's decoration swallowed the whole box, so the
    // re-derived content rect is zero-width.
    let info = targets.infos.get_mut(&a).unwrap();
    info.insets = crate::overlay::geometry::EdgeInsets::uniform(100.0);

    overlay.close(&targets, t0 + Duration::from_secs(1));
    let session = overlay.active.as_ref().unwrap();
    assert!(session.is_closing());
    assert_eq!(session.src_rect, src_before, "geometry from open survives");
    assert_eq!(session.morph, morph_before);
}

#[test]
fn repaint_wanted_while_animating_or_pending() {
    let mut targets = FakeTargets::new();
    let a = single_target(&mut targets);
    let mut overlay = overlay();
    let t0 = Instant::now();

    assert!(!overlay.wants_repaint(t0));
    overlay.open(&targets, a, viewport(), t0);
    assert!(overlay.wants_repaint(t0));

    overlay.tick(t0);
    overlay.tick(t0 + DURATION);
    assert!(!overlay.wants_repaint(t0 + DURATION), "settled, idle");

    let t1 = t0 + Duration::from_secs(1);
    overlay.close(&targets, t1);
    assert!(overlay.wants_repaint(t1 + DURATION), "completion outstanding");
    overlay.tick(t1 + DURATION);
    assert!(!overlay.wants_repaint(t1 + DURATION));
}

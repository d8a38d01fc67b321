use eframe::egui::{Rect, pos2, vec2};

use crate::overlay::geometry::{
    EdgeInsets, MorphTransform, apply_morph, content_rect, destination_rect, morph_between,
};

const EPS: f32 = 1e-3;

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < EPS, "{a} != {b}");
}

#[test]
fn content_rect_subtracts_padding_and_border() {
    // Raw box {10, 10, 100, 50}, padding 5 on each side, border 2.
    let raw = Rect::from_min_size(pos2(10.0, 10.0), vec2(100.0, 50.0));
    let insets = EdgeInsets::padding_and_border(5.0, 2.0);
    let content = content_rect(raw, insets);
    assert_close(content.left(), 17.0);
    assert_close(content.top(), 17.0);
    assert_close(content.width(), 86.0);
    assert_close(content.height(), 36.0);
}

#[test]
fn content_rect_with_zero_insets_is_the_raw_box() {
    let raw = Rect::from_min_size(pos2(3.0, 4.0), vec2(50.0, 60.0));
    assert_eq!(content_rect(raw, EdgeInsets::ZERO), raw);
}

#[test]
fn content_rect_never_goes_negative() {
    let raw = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
    let content = content_rect(raw, EdgeInsets::uniform(20.0));
    assert_eq!(content.width(), 0.0);
    assert_eq!(content.height(), 0.0);
}

#[test]
fn destination_rect_height_constrained_in_wide_viewport() {
    // Viewport 1200x800 is relatively wider than a 4:3 image.
    let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(1200.0, 800.0));
    let dest = destination_rect(vec2(800.0, 600.0), viewport, 0.8);
    assert_close(dest.height(), 800.0 * 0.8);
    assert_close(dest.width(), dest.height() * (800.0 / 600.0));
}

#[test]
fn destination_rect_width_constrained_in_tall_viewport() {
    let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(600.0, 1200.0));
    let dest = destination_rect(vec2(800.0, 600.0), viewport, 0.8);
    assert_close(dest.width(), 600.0 * 0.8);
    assert_close(dest.height(), dest.width() / (800.0 / 600.0));
}

#[test]
fn destination_rect_respects_fill_and_aspect_across_sizes() {
    let fill = 0.8;
    let viewports = [(1200.0, 800.0), (800.0, 1200.0), (500.0, 500.0), (1920.0, 400.0)];
    let intrinsics = [(800.0, 600.0), (600.0, 800.0), (100.0, 100.0), (3000.0, 200.0)];
    for (vw, vh) in viewports {
        let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(vw, vh));
        for (iw, ih) in intrinsics {
            let dest = destination_rect(vec2(iw, ih), viewport, fill);
            assert!(dest.width() <= vw * fill + EPS);
            assert!(dest.height() <= vh * fill + EPS);
            let ratio = iw / ih;
            assert!(
                (dest.width() / dest.height() - ratio).abs() < 1e-2,
                "aspect drifted for {iw}x{ih} in {vw}x{vh}"
            );
            // Centered on both axes.
            assert_close(dest.center().x, viewport.center().x);
            assert_close(dest.center().y, viewport.center().y);
        }
    }
}

#[test]
fn destination_rect_honors_viewport_origin() {
    let viewport = Rect::from_min_size(pos2(100.0, 50.0), vec2(1000.0, 800.0));
    let dest = destination_rect(vec2(500.0, 500.0), viewport, 0.5);
    assert_close(dest.center().x, viewport.center().x);
    assert_close(dest.center().y, viewport.center().y);
}

#[test]
fn morph_between_identical_rects_is_identity() {
    let rect = Rect::from_min_size(pos2(40.0, 40.0), vec2(200.0, 150.0));
    let morph = morph_between(rect, rect);
    assert_eq!(morph, MorphTransform::IDENTITY);
}

#[test]
fn morph_between_translates_and_scales() {
    let src = Rect::from_min_size(pos2(10.0, 20.0), vec2(100.0, 80.0));
    let dest = Rect::from_min_size(pos2(110.0, 70.0), vec2(300.0, 240.0));
    let morph = morph_between(src, dest);
    assert_close(morph.translate.x, 100.0);
    assert_close(morph.translate.y, 50.0);
    assert_close(morph.scale, 3.0);
}

#[test]
fn apply_morph_endpoints() {
    let src = Rect::from_min_size(pos2(10.0, 20.0), vec2(100.0, 80.0));
    let dest = Rect::from_min_size(pos2(110.0, 70.0), vec2(300.0, 240.0));
    let morph = morph_between(src, dest);

    let at_zero = apply_morph(src, morph, 0.0);
    assert_eq!(at_zero, src);

    let at_one = apply_morph(src, morph, 1.0);
    assert_close(at_one.left(), dest.left());
    assert_close(at_one.top(), dest.top());
    assert_close(at_one.width(), dest.width());
}

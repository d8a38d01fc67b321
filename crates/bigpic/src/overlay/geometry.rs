use eframe::egui::{Rect, Vec2, pos2, vec2};

/// Per-side inset widths (padding + border) separating a thumbnail's raw
/// box from its visible image pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeInsets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    pub fn uniform(width: f32) -> Self {
        Self {
            left: width,
            right: width,
            top: width,
            bottom: width,
        }
    }

    /// Uniform padding inside a uniform border, the common framed-thumbnail case.
    pub fn padding_and_border(padding: f32, border: f32) -> Self {
        Self::uniform(padding + border)
    }
}

/// A translate+scale pair mapping a source rect onto a destination rect.
/// Applied to a proxy pinned at the source rect, so the morph animation only
/// interpolates two numbers per axis instead of re-laying-out box geometry
/// every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl MorphTransform {
    pub const IDENTITY: MorphTransform = MorphTransform {
        translate: Vec2::ZERO,
        scale: 1.0,
    };
}

/// The content-box rect of a node: its raw bounding rect shrunk by the
/// given insets. The morph must originate from the visible pixels, not the
/// raw box, so decoration is subtracted here. Degenerate insets never
/// produce a negative-sized rect.
pub fn content_rect(raw: Rect, insets: EdgeInsets) -> Rect {
    let width = (raw.width() - insets.left - insets.right).max(0.0);
    let height = (raw.height() - insets.top - insets.bottom).max(0.0);
    Rect::from_min_size(
        pos2(raw.left() + insets.left, raw.top() + insets.top),
        vec2(width, height),
    )
}

/// Aspect-fit-contain placement: the largest rect with the image's aspect
/// ratio that covers at most `fill` of the viewport on the constraining
/// axis, centered on both axes.
///
/// `intrinsic.y` must be positive; presentables with unknown natural size
/// are guarded out before reaching here.
pub fn destination_rect(intrinsic: Vec2, viewport: Rect, fill: f32) -> Rect {
    let ratio = intrinsic.x / intrinsic.y;
    let (width, height) = if viewport.width() / viewport.height() >= ratio {
        // Viewport relatively wider than the image: height-constrained.
        let height = viewport.height() * fill;
        (height * ratio, height)
    } else {
        let width = viewport.width() * fill;
        (width, width / ratio)
    };
    Rect::from_min_size(
        pos2(
            viewport.left() + (viewport.width() - width) / 2.0,
            viewport.top() + (viewport.height() - height) / 2.0,
        ),
        vec2(width, height),
    )
}

pub fn morph_between(src: Rect, dest: Rect) -> MorphTransform {
    MorphTransform {
        translate: dest.min - src.min,
        scale: dest.width() / src.width(),
    }
}

/// The rect a source-pinned proxy occupies with the morph applied at
/// interpolation factor `t` (0 = pinned at source, 1 = fully morphed).
/// Transform origin is the source rect's top-left; the scale is uniform.
pub fn apply_morph(src: Rect, morph: MorphTransform, t: f32) -> Rect {
    let scale = 1.0 + (morph.scale - 1.0) * t;
    Rect::from_min_size(src.min + morph.translate * t, src.size() * scale)
}

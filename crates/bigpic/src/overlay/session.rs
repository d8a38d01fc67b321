use std::time::{Duration, Instant};

use eframe::egui::Rect;

use super::TargetId;
use super::ease::Easing;
use super::geometry::{MorphTransform, apply_morph};

/// Identity of one presentation session. Assigned monotonically; captured
/// before scheduling a close completion so a stale completion can tell
/// whether the slot it is about to clear still belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Created this frame. `started` stays `None` until one frame has
    /// painted the proxy pinned at the source rect; only then does the
    /// morph begin, otherwise there is nothing to transition from.
    Opening { started: Option<Instant> },
    /// Opening morph finished. Resize updates reapply geometry with no
    /// animation from here on.
    Settled,
    /// Target swapped mid-session; geometry is stale until the new
    /// source's intrinsic size arrives.
    Navigating,
    /// Reverse morph running. `from` is the morph factor at the moment
    /// close was requested (1.0 unless the opening morph was interrupted).
    /// The session stays in the manager's slot until the scheduled
    /// completion fires.
    Closing { started: Instant, from: f32 },
}

/// The single active presentation: the displayed target, the geometry
/// derived for it, and where the animation stands. The source rect is
/// re-derived at every lifecycle edge (open, resize, target load, close)
/// rather than cached, since the page may have reflowed in between.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub target: TargetId,
    /// The target whose pixels the proxy currently shows. Trails `target`
    /// while Navigating: the old image stays up until the new source's
    /// pixels arrive, and stays up for good if they never do.
    pub displayed: TargetId,
    pub src_rect: Rect,
    pub dest_rect: Rect,
    pub morph: MorphTransform,
    pub phase: Phase,
}

impl Session {
    /// How far along the morph is at `now`: 0 pinned at source, 1 fully
    /// enlarged. Eased while Opening/Closing, constant otherwise.
    pub fn morph_factor(&self, now: Instant, duration: Duration, easing: Easing) -> f32 {
        match self.phase {
            Phase::Opening { started: None } => 0.0,
            Phase::Opening {
                started: Some(started),
            } => easing.apply(progress(started, now, duration)),
            Phase::Settled | Phase::Navigating => 1.0,
            Phase::Closing { started, from } => {
                from * (1.0 - easing.apply(progress(started, now, duration)))
            }
        }
    }

    /// The rect the proxy image occupies at `now`.
    pub fn proxy_rect(&self, now: Instant, duration: Duration, easing: Easing) -> Rect {
        apply_morph(self.src_rect, self.morph, self.morph_factor(now, duration, easing))
    }

    /// Backdrop dimming factor at `now`, in [0, 1], scaled by the
    /// configured opacity at draw time.
    pub fn backdrop_factor(&self, now: Instant, duration: Duration, easing: Easing) -> f32 {
        self.morph_factor(now, duration, easing)
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.phase, Phase::Closing { .. })
    }

    /// Whether the animation is still advancing at `now` (drives repaint
    /// scheduling in the host).
    pub fn is_animating(&self, now: Instant, duration: Duration) -> bool {
        match self.phase {
            Phase::Opening { started: None } => true,
            Phase::Opening {
                started: Some(started),
            }
            | Phase::Closing { started, .. } => now.duration_since(started) < duration,
            Phase::Settled | Phase::Navigating => false,
        }
    }
}

fn progress(started: Instant, now: Instant, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (now.duration_since(started).as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

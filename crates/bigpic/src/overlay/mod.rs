pub mod ease;
pub mod geometry;
pub mod navigator;
pub mod session;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, Rect, TextureId, Vec2};

use ease::Easing;
use geometry::{EdgeInsets, content_rect, destination_rect, morph_between};
use session::{Phase, Session, SessionId};

/// Identity of a presentable image, assigned by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// A presentable's geometry, derived fresh at the moment of the call.
/// `raw_rect` is the thumbnail's framed box on screen, `insets` the
/// decoration separating it from the visible pixels, `intrinsic` the
/// image's natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub raw_rect: Rect,
    pub insets: EdgeInsets,
    pub intrinsic: Vec2,
}

/// What the overlay needs from the host document: resolve a target's
/// current geometry on demand, and enumerate the live members of a
/// target's group. Neither result may be cached by the overlay; layout
/// and membership can change between calls.
pub trait Targets {
    fn resolve(&self, id: TargetId) -> Option<TargetInfo>;
    fn group_members(&self, of: TargetId) -> Vec<TargetId>;
}

/// Presentation settings, immutable for a session's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct OverlaySettings {
    pub duration: Duration,
    pub easing: Easing,
    /// Fraction of the viewport the enlarged image may fill.
    pub fill: f32,
    pub backdrop_opacity: f32,
    pub navigate: bool,
    pub wrap: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            easing: Easing::Ease,
            fill: 0.8,
            backdrop_opacity: 0.9,
            navigate: true,
            wrap: true,
        }
    }
}

/// A scheduled close completion. The session's identity is captured when
/// the close starts; when the deadline passes, the slot is cleared only if
/// it still holds that identity. Without the capture, a stale completion
/// racing a rapid re-open would null out the newer session's slot.
#[derive(Debug, Clone, Copy)]
struct PendingClose {
    captured: SessionId,
    due: Instant,
}

/// The session manager: owns the single active-session slot and mediates
/// every external trigger into session lifecycle steps. All entry points
/// are silent no-ops when their precondition does not hold: user-trigger
/// races (double open, double close, navigate with nothing open) never
/// signal errors.
pub struct Overlay {
    settings: OverlaySettings,
    /// The at-most-one active session. A closing session stays here until
    /// its completion fires, unless a new open supersedes it.
    active: Option<Session>,
    /// Superseded sessions still animating out; their visuals are removed
    /// when their completion fires.
    retiring: Vec<Session>,
    pending: Vec<PendingClose>,
    next_id: u64,
}

impl Overlay {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            settings,
            active: None,
            retiring: Vec::new(),
            pending: Vec::new(),
            next_id: 0,
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_target(&self) -> Option<TargetId> {
        self.active.as_ref().map(|s| s.target)
    }

    /// Backdrop + proxy per live session; used to assert teardown.
    pub fn visual_node_count(&self) -> usize {
        (self.active.iter().count() + self.retiring.len()) * 2
    }

    /// Open a session presenting `id`. No-op if a session is already open,
    /// unless that session is closing; opening while a close completion
    /// is still pending is legal and supersedes it. Also a no-op when the
    /// target cannot be resolved or has no usable intrinsic size.
    pub fn open(&mut self, targets: &impl Targets, id: TargetId, viewport: Rect, _now: Instant) {
        match &self.active {
            Some(session) if !session.is_closing() => return,
            Some(_) => {
                // Superseding a closing session: it keeps animating out
                // from the retiring list, and its captured completion will
                // no longer match the slot.
                let old = self.active.take();
                self.retiring.extend(old);
            }
            None => {}
        }

        let Some(info) = targets.resolve(id) else {
            return;
        };
        if info.intrinsic.y <= 0.0 || info.intrinsic.x <= 0.0 {
            return;
        }

        let src_rect = content_rect(info.raw_rect, info.insets);
        if src_rect.width() <= 0.0 {
            return;
        }
        let dest_rect = destination_rect(info.intrinsic, viewport, self.settings.fill);

        self.next_id += 1;
        self.active = Some(Session {
            id: SessionId(self.next_id),
            target: id,
            displayed: id,
            src_rect,
            dest_rect,
            morph: morph_between(src_rect, dest_rect),
            // The morph waits one painted frame so there is a pinned state
            // to transition from.
            phase: Phase::Opening { started: None },
        });
    }

    /// Start closing the active session. Re-derives the target's current
    /// rect first (it may have moved since open) so the reverse morph
    /// lands where the thumbnail is now. Schedules a completion carrying
    /// the session's captured identity. Closing an already-closing session
    /// restarts the reverse animation and schedules another (harmless)
    /// completion.
    pub fn close(&mut self, targets: &impl Targets, now: Instant) {
        let settings = self.settings;
        let Some(session) = self.active.as_mut() else {
            return;
        };

        let from = session.morph_factor(now, settings.duration, settings.easing);
        if let Some(info) = targets.resolve(session.displayed) {
            let src_rect = content_rect(info.raw_rect, info.insets);
            // A degenerate re-derivation keeps the geometry from open.
            if src_rect.width() > 0.0 {
                session.src_rect = src_rect;
                session.morph = morph_between(src_rect, session.dest_rect);
            }
        }
        session.phase = Phase::Closing { started: now, from };

        self.pending.push(PendingClose {
            captured: session.id,
            due: now + settings.duration,
        });
    }

    /// Re-derive geometry against the current viewport and reapply the
    /// morph immediately, with no animation; the transition is disabled
    /// once settled. Called on viewport resize; safe to call redundantly, and
    /// a no-op unless the session is settled.
    pub fn update(&mut self, targets: &impl Targets, viewport: Rect) {
        let fill = self.settings.fill;
        let Some(session) = self.active.as_mut() else {
            return;
        };
        if session.phase != Phase::Settled {
            return;
        }
        // The on-screen proxy, which after a failed swap is not the
        // awaited target.
        let Some(info) = targets.resolve(session.displayed) else {
            return;
        };
        let src_rect = content_rect(info.raw_rect, info.insets);
        if src_rect.width() <= 0.0 || info.intrinsic.y <= 0.0 {
            return;
        }
        session.src_rect = src_rect;
        session.dest_rect = destination_rect(info.intrinsic, viewport, fill);
        session.morph = morph_between(session.src_rect, session.dest_rect);
    }

    /// Swap the presented target `delta` steps within its group, wrapping
    /// or clamping per settings. Group membership is queried live on every
    /// call. The overlay stays up; geometry is re-derived once the new
    /// source's intrinsic size arrives via [`Self::target_loaded`].
    pub fn navigate(&mut self, targets: &impl Targets, delta: isize) {
        if !self.settings.navigate {
            return;
        }
        let wrap = self.settings.wrap;
        let Some(session) = self.active.as_mut() else {
            return;
        };
        if !matches!(session.phase, Phase::Settled | Phase::Navigating) {
            return;
        }
        let members = targets.group_members(session.target);
        let Some(next) = navigator::cycle(&members, session.target, delta, wrap) else {
            return;
        };
        if next == session.target {
            return;
        }
        session.target = next;
        session.phase = Phase::Navigating;
    }

    /// Host callback once the swapped target's pixels are available:
    /// re-derive geometry for the new intrinsic size, switch the proxy
    /// over to the new pixels, and settle.
    pub fn target_loaded(&mut self, targets: &impl Targets, viewport: Rect) {
        let fill = self.settings.fill;
        let Some(session) = self.active.as_mut() else {
            return;
        };
        if session.phase != Phase::Navigating {
            return;
        }
        if let Some(info) = targets.resolve(session.target) {
            let src_rect = content_rect(info.raw_rect, info.insets);
            if src_rect.width() > 0.0 && info.intrinsic.y > 0.0 {
                session.src_rect = src_rect;
                session.dest_rect = destination_rect(info.intrinsic, viewport, fill);
                session.morph = morph_between(session.src_rect, session.dest_rect);
            }
        }
        session.displayed = session.target;
        session.phase = Phase::Settled;
    }

    /// Host callback when the swapped target's source failed to decode.
    /// The session settles on its previous geometry; `displayed` never
    /// advanced, so the old pixels keep showing.
    pub fn target_failed(&mut self) {
        if let Some(session) = self.active.as_mut() {
            if session.phase == Phase::Navigating {
                session.phase = Phase::Settled;
            }
        }
    }

    /// Advance scheduled work. Run once per frame, after painting:
    /// - arms an opening session's morph (the pinned state has now been
    ///   painted once);
    /// - settles an opening session whose duration elapsed, disabling
    ///   further transition;
    /// - fires due close completions: the slot is cleared only when it
    ///   still holds the captured identity, and the retiring visuals for
    ///   that identity are removed unconditionally.
    pub fn tick(&mut self, now: Instant) {
        let duration = self.settings.duration;
        if let Some(session) = self.active.as_mut() {
            match session.phase {
                Phase::Opening { started: None } => {
                    session.phase = Phase::Opening { started: Some(now) };
                }
                Phase::Opening {
                    started: Some(started),
                } if now.duration_since(started) >= duration => {
                    session.phase = Phase::Settled;
                }
                _ => {}
            }
        }

        let mut fired = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                fired.push(p.captured);
                false
            } else {
                true
            }
        });
        for captured in fired {
            if self.active.as_ref().is_some_and(|s| s.id == captured) {
                self.active = None;
            }
            self.retiring.retain(|s| s.id != captured);
        }
    }

    /// Whether anything is animating or a completion is outstanding, so
    /// the host keeps repainting.
    pub fn wants_repaint(&self, now: Instant) -> bool {
        !self.pending.is_empty()
            || !self.retiring.is_empty()
            || self
                .active
                .as_ref()
                .is_some_and(|s| s.is_animating(now, self.settings.duration))
    }

    /// Paint every live session: dimming backdrop first, then the proxy
    /// image morphed to its current rect. Superseded (retiring) sessions
    /// paint under the slot session. `texture_for` maps a target to its
    /// uploaded pixels; the proxy draws the `displayed` target, so a
    /// navigation still waiting on its decode keeps the old image up.
    pub fn draw(
        &self,
        ui: &egui::Ui,
        viewport: Rect,
        now: Instant,
        texture_for: impl Fn(TargetId) -> Option<TextureId>,
    ) {
        let painter = ui.painter();
        let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        for session in self.retiring.iter().chain(self.active.iter()) {
            let dim = session.backdrop_factor(now, self.settings.duration, self.settings.easing)
                * self.settings.backdrop_opacity;
            painter.rect_filled(
                viewport,
                0.0,
                Color32::from_black_alpha((dim * 255.0) as u8),
            );
            if let Some(texture) = texture_for(session.displayed) {
                let rect = session.proxy_rect(now, self.settings.duration, self.settings.easing);
                painter.image(texture, rect, uv, Color32::WHITE);
            }
        }
    }
}

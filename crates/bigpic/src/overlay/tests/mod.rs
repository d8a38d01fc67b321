mod ease;
mod geometry;
mod manager;

use std::collections::HashMap;
use std::time::Duration;

use eframe::egui::{Rect, Vec2, pos2, vec2};

use super::geometry::EdgeInsets;
use super::{Overlay, OverlaySettings, TargetId, TargetInfo, Targets};

const DURATION: Duration = Duration::from_millis(250);

fn viewport() -> Rect {
    Rect::from_min_size(pos2(0.0, 0.0), vec2(1200.0, 800.0))
}

fn overlay() -> Overlay {
    Overlay::new(OverlaySettings {
        duration: DURATION,
        ..OverlaySettings::default()
    })
}

/// A stand-in document: fixed target geometry, one flat group per set of
/// registered targets.
struct FakeTargets {
    infos: HashMap<TargetId, TargetInfo>,
    groups: Vec<Vec<TargetId>>,
}

impl FakeTargets {
    fn new() -> Self {
        Self {
            infos: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Register a target with an undecorated 120x80 thumbnail at (x, y)
    /// and the given intrinsic size.
    fn add(&mut self, id: u64, x: f32, y: f32, intrinsic: Vec2) -> TargetId {
        let id = TargetId(id);
        self.infos.insert(
            id,
            TargetInfo {
                raw_rect: Rect::from_min_size(pos2(x, y), vec2(120.0, 80.0)),
                insets: EdgeInsets::ZERO,
                intrinsic,
            },
        );
        id
    }

    fn group(&mut self, members: &[TargetId]) {
        self.groups.push(members.to_vec());
    }

    fn remove(&mut self, id: TargetId) {
        self.infos.remove(&id);
        for group in &mut self.groups {
            group.retain(|t| *t != id);
        }
    }
}

impl Targets for FakeTargets {
    fn resolve(&self, id: TargetId) -> Option<TargetInfo> {
        self.infos.get(&id).copied()
    }

    fn group_members(&self, of: TargetId) -> Vec<TargetId> {
        self.groups
            .iter()
            .find(|g| g.contains(&of))
            .cloned()
            .unwrap_or_default()
    }
}

/// One target, registered and grouped alone.
fn single_target(targets: &mut FakeTargets) -> TargetId {
    let a = targets.add(1, 100.0, 100.0, vec2(800.0, 600.0));
    targets.group(&[a]);
    a
}

use std::collections::HashMap;

use eframe::egui::{self, Rect, Stroke, pos2, vec2};

use crate::images::{ImageCache, ImageState};
use crate::library::Library;
use crate::overlay::geometry::EdgeInsets;
use crate::overlay::{TargetId, TargetInfo, Targets};
use crate::theme::Theme;

/// Thumbnail grid: responsive column count, 4:3 cells, animated scroll.
/// Each pass records every thumbnail's framed rect so the overlay can
/// re-derive a target's on-screen geometry at any later moment.
pub struct Gallery {
    scroll_offset: f32,
    scroll_target: f32,
}

pub struct GalleryResponse {
    pub clicked: Option<TargetId>,
    pub hovered: Option<TargetId>,
}

impl Gallery {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0.0,
            scroll_target: 0.0,
        }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_target -= delta;
    }

    fn columns(count: usize) -> usize {
        if count <= 4 {
            2
        } else if count <= 9 {
            3
        } else {
            4
        }
    }

    fn cell_rect(
        index: usize,
        count: usize,
        rect: Rect,
        scale: f32,
        scroll_offset: f32,
    ) -> Rect {
        let cols = Self::columns(count);
        let padding = 24.0 * scale;
        let gap = 12.0 * scale;

        let grid_top = rect.top() + padding;
        let grid_width = rect.width() - padding * 2.0;
        let cell_width = (grid_width - gap * (cols as f32 - 1.0)) / cols as f32;
        let cell_height = cell_width * 3.0 / 4.0;

        let col = index % cols;
        let row = index / cols;
        let x = rect.left() + padding + col as f32 * (cell_width + gap);
        let y = grid_top + row as f32 * (cell_height + gap) - scroll_offset;

        Rect::from_min_size(pos2(x, y), vec2(cell_width, cell_height))
    }

    fn content_height(count: usize, rect: Rect, scale: f32) -> f32 {
        let cols = Self::columns(count);
        let rows = count.div_ceil(cols);
        let padding = 24.0 * scale;
        let gap = 12.0 * scale;
        let grid_width = rect.width() - padding * 2.0;
        let cell_width = (grid_width - gap * (cols as f32 - 1.0)) / cols as f32;
        let cell_height = cell_width * 3.0 / 4.0;
        rows as f32 * cell_height + (rows as f32 - 1.0) * gap + padding * 2.0
    }

    /// Lay out and paint the grid. When `interactive` is false (a session
    /// is open) thumbnails neither hover nor click. Records each framed
    /// thumbnail rect into `frame_rects`.
    #[allow(clippy::too_many_arguments)]
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        library: &Library,
        images: &mut ImageCache,
        theme: &Theme,
        rect: Rect,
        scale: f32,
        interactive: bool,
        frame_rects: &mut HashMap<TargetId, Rect>,
    ) -> GalleryResponse {
        let mut response = GalleryResponse {
            clicked: None,
            hovered: None,
        };
        frame_rects.clear();

        let count = library.len();
        if count == 0 {
            let galley = ui.painter().layout_no_wrap(
                "No matching images here yet".to_string(),
                egui::FontId::proportional(18.0 * scale),
                theme.foreground,
            );
            let pos = pos2(
                rect.center().x - galley.rect.width() / 2.0,
                rect.center().y - galley.rect.height() / 2.0,
            );
            ui.painter().galley(pos, galley, theme.foreground);
            return response;
        }

        // Animate scroll toward its clamped target.
        let overflow = (Self::content_height(count, rect, scale) - rect.height()).max(0.0);
        self.scroll_target = self.scroll_target.clamp(0.0, overflow);
        let diff = self.scroll_target - self.scroll_offset;
        if diff.abs() < 0.5 {
            self.scroll_offset = self.scroll_target;
        } else {
            self.scroll_offset += diff * 0.15;
            ctx.request_repaint();
        }

        let insets = EdgeInsets::padding_and_border(
            theme.thumb_padding * scale,
            theme.thumb_border * scale,
        );
        let inset_w = insets.left;

        for (index, presentable) in library.entries().iter().enumerate() {
            let cell = Self::cell_rect(index, count, rect, scale, self.scroll_offset);
            images.request(ctx, &presentable.path);

            let frame_rect = match images.state(&presentable.path) {
                Some(ImageState::Ready(loaded)) => {
                    let fit = aspect_fit(loaded.size, cell.shrink(inset_w));
                    let frame = fit.expand(inset_w);
                    frame_rects.insert(presentable.id, frame);

                    if frame.intersects(rect) {
                        ui.painter().rect_filled(frame, 2.0, theme.frame_fill);
                        ui.painter().image(
                            loaded.texture.id(),
                            fit,
                            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                            egui::Color32::WHITE,
                        );
                        ui.painter().rect_stroke(
                            frame,
                            2.0,
                            Stroke::new(theme.thumb_border * scale, theme.frame_border),
                            egui::StrokeKind::Inside,
                        );
                    }
                    frame
                }
                Some(ImageState::Failed(_)) => {
                    // Undecodable files keep a dead cell rather than
                    // reflowing the grid.
                    if cell.intersects(rect) {
                        ui.painter().rect_stroke(
                            cell,
                            2.0,
                            Stroke::new(1.0, theme.frame_border),
                            egui::StrokeKind::Inside,
                        );
                    }
                    continue;
                }
                _ => {
                    if cell.intersects(rect) {
                        ui.painter().rect_filled(cell, 2.0, theme.frame_fill);
                    }
                    continue;
                }
            };

            if interactive {
                let hit = ui.interact(
                    frame_rect.intersect(rect),
                    ui.id().with(presentable.id.0),
                    egui::Sense::click(),
                );
                if hit.hovered() {
                    response.hovered = Some(presentable.id);
                    ui.painter().rect_stroke(
                        frame_rect,
                        2.0,
                        Stroke::new(theme.thumb_border * scale, theme.accent),
                        egui::StrokeKind::Inside,
                    );
                }
                if hit.clicked() {
                    response.clicked = Some(presentable.id);
                }
            }
        }

        response
    }
}

/// The largest rect with `size`'s aspect ratio that fits inside `bounds`,
/// centered.
fn aspect_fit(size: egui::Vec2, bounds: Rect) -> Rect {
    if size.y <= 0.0 || bounds.height() <= 0.0 {
        return Rect::from_min_size(bounds.min, vec2(0.0, 0.0));
    }
    let ratio = size.x / size.y;
    let (w, h) = if bounds.width() / bounds.height() >= ratio {
        (bounds.height() * ratio, bounds.height())
    } else {
        (bounds.width(), bounds.width() / ratio)
    };
    Rect::from_center_size(bounds.center(), vec2(w, h))
}

/// The overlay's view of the document: thumbnail geometry from the last
/// gallery pass, intrinsic sizes from the image cache, group membership
/// from the library. Built fresh per call site so nothing is cached past
/// one computation.
pub struct DocumentTargets<'a> {
    pub frame_rects: &'a HashMap<TargetId, Rect>,
    pub insets: EdgeInsets,
    pub library: &'a Library,
    pub images: &'a ImageCache,
}

impl Targets for DocumentTargets<'_> {
    fn resolve(&self, id: TargetId) -> Option<TargetInfo> {
        let raw_rect = *self.frame_rects.get(&id)?;
        let presentable = self.library.get(id)?;
        let loaded = self.images.get(&presentable.path)?;
        Some(TargetInfo {
            raw_rect,
            insets: self.insets,
            intrinsic: loaded.size,
        })
    }

    fn group_members(&self, of: TargetId) -> Vec<TargetId> {
        self.library.group_members(of)
    }
}

use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::config::Config;
use crate::gallery::{DocumentTargets, Gallery};
use crate::images::{ImageCache, ImageState};
use crate::library::Library;
use crate::overlay::ease::Easing;
use crate::overlay::geometry::EdgeInsets;
use crate::overlay::{Overlay, TargetId};
use crate::theme::Theme;
use crate::watch::LibraryWatcher;

/// A transient status message. Holds at full strength for most of its
/// lifetime, then eases out with the same curve the overlay morphs with.
struct Toast {
    message: String,
    start: Instant,
    ttl: Duration,
}

impl Toast {
    const TTL: Duration = Duration::from_millis(1800);
    /// Fraction of the lifetime shown at full strength before the fade.
    const HOLD: f32 = 0.6;

    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
            ttl: Self::TTL,
        }
    }

    fn opacity(&self, now: Instant) -> f32 {
        let t = now.duration_since(self.start).as_secs_f32() / self.ttl.as_secs_f32();
        if t >= 1.0 {
            0.0
        } else if t < Self::HOLD {
            1.0
        } else {
            1.0 - Easing::Ease.apply((t - Self::HOLD) / (1.0 - Self::HOLD))
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.start) >= self.ttl
    }
}

struct ViewerApp {
    library: Library,
    watcher: Option<LibraryWatcher>,
    images: ImageCache,
    gallery: Gallery,
    overlay: Overlay,
    /// Framed thumbnail rects from the last gallery pass, the overlay's
    /// window into current document geometry.
    frame_rects: HashMap<TargetId, egui::Rect>,
    theme: Theme,
    zoom_cursor: bool,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
    last_viewport: egui::Rect,
    scale: f32,
}

impl ViewerApp {
    fn new(library: Library, watcher: Option<LibraryWatcher>, config: &Config) -> Self {
        Self {
            library,
            watcher,
            images: ImageCache::new(),
            gallery: Gallery::new(),
            overlay: Overlay::new(config.overlay_settings()),
            frame_rects: HashMap::new(),
            theme: Theme::from_name(config.theme()),
            zoom_cursor: config.cursor(),
            toast: None,
            last_esc: None,
            last_viewport: egui::Rect::ZERO,
            scale: 1.0,
        }
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        let ref_w = 1920.0;
        let ref_h = 1080.0;
        ((rect.width() / ref_w).min(rect.height() / ref_h)).max(0.4)
    }

    fn thumb_insets(&self) -> EdgeInsets {
        EdgeInsets::padding_and_border(
            self.theme.thumb_padding * self.scale,
            self.theme.thumb_border * self.scale,
        )
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
    }

    /// Fold watcher events into the library so late-arriving images become
    /// presentable without a restart.
    fn absorb_discoveries(&mut self) {
        let Some(watcher) = &self.watcher else { return };
        let touched = watcher.poll();
        if touched.is_empty() {
            return;
        }
        for path in &touched {
            if !path.exists() {
                self.images.forget(path);
            }
        }
        self.library.absorb(&touched);
    }

    /// React to decodes that finished this frame: a navigating session is
    /// waiting for exactly one of them.
    fn absorb_decodes(&mut self, ctx: &egui::Context, viewport: egui::Rect) {
        let finished = self.images.poll(ctx);
        if finished.is_empty() {
            return;
        }
        let Some(current) = self.overlay.current_target() else {
            return;
        };
        let Some(presentable) = self.library.get(current) else {
            return;
        };
        if !finished.contains(&presentable.path) {
            return;
        }
        match self.images.state(&presentable.path) {
            Some(ImageState::Ready(_)) => {
                let targets = DocumentTargets {
                    frame_rects: &self.frame_rects,
                    insets: self.thumb_insets(),
                    library: &self.library,
                    images: &self.images,
                };
                self.overlay.target_loaded(&targets, viewport);
            }
            Some(ImageState::Failed(message)) => {
                self.toast = Some(Toast::new(format!("Failed to load image: {message}")));
                self.overlay.target_failed();
            }
            _ => {}
        }
    }

    fn navigate(&mut self, delta: isize, viewport: egui::Rect) {
        let targets = DocumentTargets {
            frame_rects: &self.frame_rects,
            insets: self.thumb_insets(),
            library: &self.library,
            images: &self.images,
        };
        self.overlay.navigate(&targets, delta);

        // If the swapped-in source is already decoded, geometry can settle
        // immediately; otherwise absorb_decodes picks it up on arrival.
        let Some(current) = self.overlay.current_target() else {
            return;
        };
        let Some(presentable) = self.library.get(current) else {
            return;
        };
        match self.images.state(&presentable.path) {
            Some(ImageState::Ready(_)) => {
                let targets = DocumentTargets {
                    frame_rects: &self.frame_rects,
                    insets: self.thumb_insets(),
                    library: &self.library,
                    images: &self.images,
                };
                self.overlay.target_loaded(&targets, viewport);
            }
            Some(ImageState::Failed(_)) => self.overlay.target_failed(),
            _ => {}
        }
    }

    fn close_overlay(&mut self, now: Instant) {
        let targets = DocumentTargets {
            frame_rects: &self.frame_rects,
            insets: self.thumb_insets(),
            library: &self.library,
            images: &self.images,
        };
        self.overlay.close(&targets, now);
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect, now: Instant) {
        let Some(toast) = &self.toast else { return };
        let opacity = toast.opacity(now);
        if opacity <= 0.0 {
            return;
        }
        let scale = self.scale;
        let toast_color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let toast_bg = Theme::with_opacity(self.theme.frame_fill, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            toast_color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 80.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
        let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
        ui.painter().galley(text_pos, galley, toast_color);
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.absorb_discoveries();
        self.absorb_decodes(ctx, self.last_viewport);

        let presenting = self.overlay.is_open();

        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut close_requested = false;
        let mut nav_delta: isize = 0;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }

            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }

            if i.key_pressed(egui::Key::D) {
                self.toggle_theme();
                return;
            }

            if presenting {
                // Dismiss keys; wheel input is swallowed while a session
                // is open (no zoom/pan behavior is wired to it).
                if i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Space) {
                    close_requested = true;
                }
                if i.key_pressed(egui::Key::ArrowLeft) {
                    nav_delta = -1;
                }
                if i.key_pressed(egui::Key::ArrowRight) {
                    nav_delta = 1;
                }
            } else {
                // ESC double-tap to quit
                if i.key_pressed(egui::Key::Escape) {
                    if let Some(last) = self.last_esc {
                        if last.elapsed().as_secs_f32() < 1.0 {
                            viewport_cmds.push(egui::ViewportCommand::Close);
                            return;
                        }
                    }
                    self.last_esc = Some(Instant::now());
                    self.toast = Some(Toast::new("Press Esc again to exit".to_string()));
                    return;
                }

                let scroll = i.smooth_scroll_delta;
                if scroll.y != 0.0 {
                    self.gallery.scroll_by(scroll.y);
                }
                if i.key_pressed(egui::Key::ArrowUp) {
                    self.gallery.scroll_by(120.0);
                }
                if i.key_pressed(egui::Key::ArrowDown) {
                    self.gallery.scroll_by(-120.0);
                }
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }

        let bg = self.theme.background;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                self.scale = Self::compute_scale(rect);

                let response = self.gallery.show(
                    ui,
                    ctx,
                    &self.library,
                    &mut self.images,
                    &self.theme,
                    rect,
                    self.scale,
                    !presenting,
                    &mut self.frame_rects,
                );

                if response.hovered.is_some() && self.zoom_cursor {
                    ctx.output_mut(|o| o.cursor_icon = egui::CursorIcon::ZoomIn);
                }
                if let Some(clicked) = response.clicked {
                    let targets = DocumentTargets {
                        frame_rects: &self.frame_rects,
                        insets: self.thumb_insets(),
                        library: &self.library,
                        images: &self.images,
                    };
                    self.overlay.open(&targets, clicked, rect, now);
                }

                // Viewport resize while presenting: reapply geometry
                // against the new size, no animation.
                if rect != self.last_viewport {
                    self.last_viewport = rect;
                    let targets = DocumentTargets {
                        frame_rects: &self.frame_rects,
                        insets: self.thumb_insets(),
                        library: &self.library,
                        images: &self.images,
                    };
                    self.overlay.update(&targets, rect);
                }

                if nav_delta != 0 {
                    self.navigate(nav_delta, rect);
                }

                if self.overlay.is_open() {
                    // Clicking anywhere over the backdrop dismisses, same
                    // as clicking the enlarged image itself.
                    let backdrop = ui.interact(
                        rect,
                        ui.id().with("backdrop"),
                        egui::Sense::click(),
                    );
                    if backdrop.clicked() {
                        close_requested = true;
                    }
                }
                if close_requested {
                    self.close_overlay(now);
                }

                let library = &self.library;
                let images = &self.images;
                self.overlay.draw(ui, rect, now, |id| {
                    library
                        .get(id)
                        .and_then(|p| images.get(&p.path))
                        .map(|loaded| loaded.texture.id())
                });

                self.draw_toast(ui, rect, now);
            });

        // Scheduled work runs after paint so a freshly opened session gets
        // one pinned frame before its morph starts.
        self.overlay.tick(now);
        if self.overlay.wants_repaint(now) {
            ctx.request_repaint();
        }
    }
}

pub fn run(dir: PathBuf, config: Config, windowed: bool) -> Result<()> {
    let library = Library::scan(&dir, config.pattern())?;
    let watcher = match LibraryWatcher::new(&dir) {
        Ok(w) => Some(w),
        Err(e) => {
            eprintln!("Warning: live discovery disabled: {e}");
            None
        }
    };

    let title = format!("bigpic - {}", dir.display());
    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_title(title);
    if !windowed {
        viewport = viewport.with_fullscreen(true);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let app = ViewerApp::new(library, watcher, &config);
    eframe::run_native("bigpic", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Failed to launch viewer: {e}"))
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};

use eframe::egui;

/// A decoded, GPU-resident image.
pub struct LoadedImage {
    pub texture: egui::TextureHandle,
    /// Natural pixel dimensions, the presentable's intrinsic size.
    pub size: egui::Vec2,
}

pub enum ImageState {
    Loading,
    Ready(LoadedImage),
    Failed(String),
}

type DecodeResult = (PathBuf, Result<(egui::ColorImage, egui::Vec2), String>);

/// Decodes images on rayon workers and uploads them as egui textures on
/// the main thread. `request` is idempotent per path; `poll` drains
/// finished decodes each frame.
pub struct ImageCache {
    states: HashMap<PathBuf, ImageState>,
    tx: Sender<DecodeResult>,
    rx: Receiver<DecodeResult>,
}

impl ImageCache {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            states: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn state(&self, path: &Path) -> Option<&ImageState> {
        self.states.get(path)
    }

    pub fn get(&self, path: &Path) -> Option<&LoadedImage> {
        match self.states.get(path) {
            Some(ImageState::Ready(loaded)) => Some(loaded),
            _ => None,
        }
    }

    /// Queue a background decode unless the path is already known. The
    /// worker wakes the event loop when it finishes, otherwise the result
    /// would sit in the channel until the next input event.
    pub fn request(&mut self, ctx: &egui::Context, path: &Path) {
        if self.states.contains_key(path) {
            return;
        }
        self.states.insert(path.to_path_buf(), ImageState::Loading);
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        let path = path.to_path_buf();
        rayon::spawn(move || {
            let result = decode(&path);
            // Receiver gone means the app is shutting down.
            let _ = tx.send((path, result));
            ctx.request_repaint();
        });
    }

    /// Upload finished decodes. Returns the paths that changed state this
    /// frame, so the app can react (settle a navigating overlay, toast a
    /// failure).
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<PathBuf> {
        let mut finished = Vec::new();
        while let Ok((path, result)) = self.rx.try_recv() {
            let state = match result {
                Ok((color_image, size)) => {
                    let texture = ctx.load_texture(
                        path.to_string_lossy(),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    ImageState::Ready(LoadedImage { texture, size })
                }
                Err(message) => ImageState::Failed(message),
            };
            self.states.insert(path.clone(), state);
            finished.push(path);
        }
        finished
    }

    /// Drop cached state for a path (e.g. the file was deleted); a later
    /// request will decode afresh.
    pub fn forget(&mut self, path: &Path) {
        self.states.remove(path);
    }
}

fn decode(path: &Path) -> Result<(egui::ColorImage, egui::Vec2), String> {
    let image = image::open(path).map_err(|e| e.to_string())?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        rgba.as_raw(),
    );
    Ok((color_image, egui::vec2(width as f32, height as f32)))
}

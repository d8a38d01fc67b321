use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub frame_fill: Color32,
    pub frame_border: Color32,
    pub accent: Color32,
    /// Padding between a thumbnail's border and its image pixels. Part of
    /// the raw box but not of the visible image; the overlay subtracts it
    /// when deriving the morph's source rect.
    pub thumb_padding: f32,
    /// Thumbnail border stroke width, subtracted the same way.
    pub thumb_border: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            frame_fill: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            frame_border: Color32::from_rgb(0x45, 0x45, 0x45),
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            thumb_padding: 6.0,
            thumb_border: 2.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            frame_fill: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            frame_border: Color32::from_rgb(0xD0, 0xD0, 0xD0),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            thumb_padding: 6.0,
            thumb_border: 2.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }
}

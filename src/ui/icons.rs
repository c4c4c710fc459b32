use ratatui::style::Color;
use std::collections::HashMap;

/// Terminal stand-in for an application icon: a glyph plus a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppIcon {
    pub glyph: &'static str,
    pub category: &'static str,
    pub color: Color,
}

pub const PLACEHOLDER_GLYPH: &str = "📦";

const CATEGORIES: &[(&[&str], AppIcon)] = &[
    (
        &["code", "vim", "nvim", "terminal", "alacritty", "kitty", "cargo", "editor", "vscodium",
          "gedit", "nano", "emacs", "sublime", "console", "iterm", "wezterm", "devenv", "idea"],
        AppIcon { glyph: "💻", category: "Development", color: Color::Yellow },
    ),
    (
        &["browser", "chrome", "firefox", "brave", "msedge", "chromium", "safari", "opera"],
        AppIcon { glyph: "🌐", category: "Browsing", color: Color::Blue },
    ),
    (
        &["slack", "zoom", "teams", "discord", "telegram", "chat", "signal", "element", "skype"],
        AppIcon { glyph: "💬", category: "Communication", color: Color::Green },
    ),
    (
        &["spotify", "vlc", "music", "media", "rhythmbox", "audacious", "clementine"],
        AppIcon { glyph: "🎵", category: "Media", color: Color::Magenta },
    ),
    (
        &["explorer", "nautilus", "files", "dolphin", "finder", "thunar", "nemo"],
        AppIcon { glyph: "📁", category: "Files", color: Color::Cyan },
    ),
    (
        &["outlook", "thunderbird", "evolution", "geary", "mail"],
        AppIcon { glyph: "📧", category: "Email", color: Color::LightYellow },
    ),
    (
        &["libreoffice", "soffice", "winword", "excel", "powerpnt", "notepad"],
        AppIcon { glyph: "📄", category: "Office", color: Color::LightBlue },
    ),
];

/// Picks an icon from the application key. `None` for unrecognised apps.
pub fn resolve_icon(key: &str) -> Option<AppIcon> {
    let key_lower = key.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| key_lower.contains(needle)))
        .map(|(_, icon)| *icon)
}

/// Per-key icon lookups, misses included, until cleared.
#[derive(Debug, Default)]
pub struct IconCache {
    entries: HashMap<String, Option<AppIcon>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn icon_for(&mut self, key: &str) -> Option<AppIcon> {
        if let Some(cached) = self.entries.get(key) {
            return *cached;
        }
        let icon = resolve_icon(key);
        self.entries.insert(key.to_string(), icon);
        icon
    }

    pub fn get(&self, key: &str) -> Option<AppIcon> {
        self.entries.get(key).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

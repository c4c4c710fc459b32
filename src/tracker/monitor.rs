use active_win_pos_rs::{ActiveWindow, get_active_window};
use std::path::Path;

use crate::tracker::identity::{FocusProbe, ForegroundIdentity, resolve_label};

/// Focus probe backed by the platform window APIs.
pub struct AppMonitor;

impl Default for AppMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl AppMonitor {
    pub fn new() -> Self {
        // Log detected platform
        #[cfg(target_os = "macos")]
        log::info!("=== PLATFORM: macOS ===");

        #[cfg(target_os = "windows")]
        log::info!("=== PLATFORM: Windows ===");

        #[cfg(target_os = "linux")]
        {
            log::info!("=== PLATFORM: Linux ===");
            if Self::is_wayland() {
                log::warn!("Wayland session detected - focus detection may report no window");
            }
        }

        Self
    }

    #[cfg(target_os = "linux")]
    fn is_wayland() -> bool {
        std::env::var("WAYLAND_DISPLAY").is_ok()
            || std::env::var("XDG_SESSION_TYPE").map(|s| s == "wayland").unwrap_or(false)
    }

    fn identity_from_window(window: &ActiveWindow) -> Option<ForegroundIdentity> {
        identity_from_parts(
            window.process_id,
            &window.process_path,
            &window.app_name,
            &window.title,
        )
    }
}

impl FocusProbe for AppMonitor {
    fn current_identity(&self) -> Option<ForegroundIdentity> {
        match get_active_window() {
            Ok(window) => {
                let identity = Self::identity_from_window(&window);
                if identity.is_none() {
                    log::debug!("Focused window pid {} could not be inspected", window.process_id);
                }
                identity
            }
            Err(()) => {
                log::debug!("No active window detected");
                None
            }
        }
    }
}

/// Builds an identity from what the OS reported about the focused window.
///
/// The key is the executable's file stem, so every window of one program maps
/// to the same record. `app_name` stands in for the product name.
pub fn identity_from_parts(
    process_id: u64,
    process_path: &Path,
    app_name: &str,
    title: &str,
) -> Option<ForegroundIdentity> {
    if process_id == 0 {
        return None;
    }

    let key = process_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .filter(|stem| !stem.is_empty())
        .or_else(|| Some(app_name.trim().to_string()).filter(|name| !name.is_empty()))?;

    let label = resolve_label(Some(title), Some(app_name), &key);
    Some(ForegroundIdentity::new(key, label))
}

/// The application that owns input focus, as seen at one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundIdentity {
    /// Stable per application across samples (derived from the owning process).
    pub key: String,
    /// Best-effort human label for the application.
    pub label: String,
}

impl ForegroundIdentity {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Answers "which application is focused right now?".
///
/// Implementations never fail outward: anything that goes wrong while
/// inspecting the OS (no foreground window, access denied, the process exited
/// between lookups) is reported as `None`.
pub trait FocusProbe {
    fn current_identity(&self) -> Option<ForegroundIdentity>;
}

impl<P: FocusProbe + ?Sized> FocusProbe for Box<P> {
    fn current_identity(&self) -> Option<ForegroundIdentity> {
        (**self).current_identity()
    }
}

/// First non-blank of window title, product name, key.
pub fn resolve_label(title: Option<&str>, product_name: Option<&str>, key: &str) -> String {
    [title, product_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(key)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_wins() {
        let label = resolve_label(Some("Untitled - Notepad"), Some("Microsoft Notepad"), "notepad");
        assert_eq!(label, "Untitled - Notepad");
    }

    #[test]
    fn test_product_name_when_title_blank() {
        assert_eq!(resolve_label(Some(""), Some("Microsoft Notepad"), "notepad"), "Microsoft Notepad");
        assert_eq!(resolve_label(Some("  \t"), Some("Microsoft Notepad"), "notepad"), "Microsoft Notepad");
        assert_eq!(resolve_label(None, Some("Microsoft Notepad"), "notepad"), "Microsoft Notepad");
    }

    #[test]
    fn test_key_as_last_resort() {
        assert_eq!(resolve_label(None, None, "notepad"), "notepad");
        assert_eq!(resolve_label(Some(""), Some(" "), "notepad"), "notepad");
    }
}

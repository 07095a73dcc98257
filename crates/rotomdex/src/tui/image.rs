//! Sprite support for terminals that can draw images

use ratatui_image::{picker::Picker, protocol::StatefulProtocol};

/// Whether the terminal supports image display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProtocol {
    Supported,
    None,
}

impl ImageProtocol {
    pub fn detect() -> Self {
        Self::from_env(
            std::env::var("TERM").ok().as_deref(),
            std::env::var("TERM_PROGRAM").ok().as_deref(),
        )
    }

    /// Kitty and Ghostty speak the kitty graphics protocol
    pub fn from_env(term: Option<&str>, term_program: Option<&str>) -> Self {
        if let Some(term) = term
            && (term.contains("kitty") || term.contains("ghostty"))
        {
            return ImageProtocol::Supported;
        }
        if let Some(program) = term_program
            && program.to_lowercase().contains("ghostty")
        {
            return ImageProtocol::Supported;
        }
        ImageProtocol::None
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ImageProtocol::Supported)
    }
}

/// Decode sprite bytes into a renderable protocol
pub fn decode_image(bytes: &[u8], picker: &Picker) -> Option<StatefulProtocol> {
    let img = image::load_from_memory(bytes)
        .inspect_err(|e| log::debug!("Failed to decode sprite: {}", e))
        .ok()?;
    Some(picker.new_resize_protocol(img))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_kitty_and_ghostty() {
        assert!(ImageProtocol::from_env(Some("xterm-kitty"), None).is_supported());
        assert!(ImageProtocol::from_env(Some("xterm-ghostty"), None).is_supported());
        assert!(ImageProtocol::from_env(Some("xterm-256color"), Some("Ghostty")).is_supported());
    }

    #[test]
    fn test_other_terminals_unsupported() {
        assert_eq!(
            ImageProtocol::from_env(Some("xterm-256color"), Some("Apple_Terminal")),
            ImageProtocol::None
        );
        assert_eq!(ImageProtocol::from_env(None, None), ImageProtocol::None);
    }
}

//! Color palettes
//!
//! One complete set of named color tokens per effective appearance. Both
//! palettes are instances of the same [`Palette`] struct, so every token
//! present in one is present in the other by construction; toggling can
//! never surface a missing key.

use prism_core::Color;

/// Token keys for dynamic palette access
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum PaletteToken {
    // Surfaces
    Background,
    Surface,
    SurfaceElevated,

    // Text
    TextPrimary,
    TextSecondary,
    TextMuted,

    // Chrome
    Border,
    Separator,
    Overlay,

    // Accent
    Accent,
    AccentMuted,

    // Semantic
    Success,
    Warning,
    Error,
}

impl PaletteToken {
    /// Full token list
    pub fn all() -> &'static [PaletteToken] {
        const TOKENS: [PaletteToken; 14] = [
            PaletteToken::Background,
            PaletteToken::Surface,
            PaletteToken::SurfaceElevated,
            PaletteToken::TextPrimary,
            PaletteToken::TextSecondary,
            PaletteToken::TextMuted,
            PaletteToken::Border,
            PaletteToken::Separator,
            PaletteToken::Overlay,
            PaletteToken::Accent,
            PaletteToken::AccentMuted,
            PaletteToken::Success,
            PaletteToken::Warning,
            PaletteToken::Error,
        ];
        &TOKENS
    }
}

/// Complete set of named color tokens for one effective appearance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub surface_elevated: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub border: Color,
    pub separator: Color,
    pub overlay: Color,
    pub accent: Color,
    pub accent_muted: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    /// Get a token value by key
    pub fn get(&self, token: PaletteToken) -> Color {
        match token {
            PaletteToken::Background => self.background,
            PaletteToken::Surface => self.surface,
            PaletteToken::SurfaceElevated => self.surface_elevated,
            PaletteToken::TextPrimary => self.text_primary,
            PaletteToken::TextSecondary => self.text_secondary,
            PaletteToken::TextMuted => self.text_muted,
            PaletteToken::Border => self.border,
            PaletteToken::Separator => self.separator,
            PaletteToken::Overlay => self.overlay,
            PaletteToken::Accent => self.accent,
            PaletteToken::AccentMuted => self.accent_muted,
            PaletteToken::Success => self.success,
            PaletteToken::Warning => self.warning,
            PaletteToken::Error => self.error,
        }
    }

    /// Interpolate token-wise between two palettes
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            background: Color::lerp(&from.background, &to.background, t),
            surface: Color::lerp(&from.surface, &to.surface, t),
            surface_elevated: Color::lerp(&from.surface_elevated, &to.surface_elevated, t),
            text_primary: Color::lerp(&from.text_primary, &to.text_primary, t),
            text_secondary: Color::lerp(&from.text_secondary, &to.text_secondary, t),
            text_muted: Color::lerp(&from.text_muted, &to.text_muted, t),
            border: Color::lerp(&from.border, &to.border, t),
            separator: Color::lerp(&from.separator, &to.separator, t),
            overlay: Color::lerp(&from.overlay, &to.overlay, t),
            accent: Color::lerp(&from.accent, &to.accent, t),
            accent_muted: Color::lerp(&from.accent_muted, &to.accent_muted, t),
            success: Color::lerp(&from.success, &to.success, t),
            warning: Color::lerp(&from.warning, &to.warning, t),
            error: Color::lerp(&from.error, &to.error, t),
        }
    }

    /// Light palette
    pub fn light() -> Self {
        Self {
            background: Color::from_hex(0xF7F8FA),
            surface: Color::from_hex(0xFFFFFF),
            surface_elevated: Color::from_hex(0xFFFFFF),
            text_primary: Color::from_hex(0x1B1D29),
            text_secondary: Color::from_hex(0x565B73),
            text_muted: Color::from_hex(0x8A8FA3),
            border: Color::from_hex(0xD9DCE3),
            separator: Color::from_hex(0xE8EAEF),
            overlay: Color::from_hex(0x1B1D29).with_alpha(0.4),
            accent: Color::from_hex(0x3A6DF0),
            accent_muted: Color::from_hex(0xDCE5FC),
            success: Color::from_hex(0x2E9E5B),
            warning: Color::from_hex(0xD98E04),
            error: Color::from_hex(0xD23B4E),
        }
    }

    /// Dark palette
    pub fn dark() -> Self {
        Self {
            background: Color::from_hex(0x14161F),
            surface: Color::from_hex(0x1D2029),
            surface_elevated: Color::from_hex(0x262A36),
            text_primary: Color::from_hex(0xE8EAF2),
            text_secondary: Color::from_hex(0xA9AEC4),
            text_muted: Color::from_hex(0x6E7390),
            border: Color::from_hex(0x343848),
            separator: Color::from_hex(0x2A2E3C),
            overlay: Color::from_hex(0x000000).with_alpha(0.55),
            accent: Color::from_hex(0x6C92F4),
            accent_muted: Color::from_hex(0x2A3A63),
            success: Color::from_hex(0x54C27F),
            warning: Color::from_hex(0xE8B04B),
            error: Color::from_hex(0xE5697A),
        }
    }
}

/// Select the palette for an effective appearance
pub fn palette_for(is_dark: bool) -> Palette {
    if is_dark {
        Palette::dark()
    } else {
        Palette::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_is_present_in_both_palettes() {
        let light = Palette::light();
        let dark = Palette::dark();
        for token in PaletteToken::all() {
            // `get` is total over the closed token set for both palettes.
            let _ = light.get(*token);
            let _ = dark.get(*token);
        }
    }

    #[test]
    fn light_and_dark_backgrounds_differ() {
        assert_ne!(Palette::light().background, Palette::dark().background);
        assert_ne!(Palette::light().text_primary, Palette::dark().text_primary);
    }

    #[test]
    fn lerp_endpoints_reproduce_palettes() {
        let light = Palette::light();
        let dark = Palette::dark();
        assert_eq!(Palette::lerp(&light, &dark, 0.0), light);
        assert_eq!(Palette::lerp(&light, &dark, 1.0), dark);
    }
}

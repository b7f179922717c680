//! Color tokens for theming

use crate::theme::ColorScheme;
use folio_core::Color;

/// Semantic color token keys for dynamic access
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ColorToken {
    Background,
    Heading,
    Text,
    SubtleText,
    Link,
    CardBackground,
    CardBorder,
    /// Bento card glow, inner stop
    Glow1,
    /// Bento card glow, outer stop
    Glow2,
    /// Hero heading gradient start
    Gradient1,
    /// Hero heading gradient end
    Gradient2,
}

impl ColorToken {
    pub const ALL: [ColorToken; 11] = [
        ColorToken::Background,
        ColorToken::Heading,
        ColorToken::Text,
        ColorToken::SubtleText,
        ColorToken::Link,
        ColorToken::CardBackground,
        ColorToken::CardBorder,
        ColorToken::Glow1,
        ColorToken::Glow2,
        ColorToken::Gradient1,
        ColorToken::Gradient2,
    ];

    /// CSS custom property name, without the `--` prefix
    pub fn css_name(&self) -> &'static str {
        match self {
            ColorToken::Background => "bg",
            ColorToken::Heading => "heading",
            ColorToken::Text => "text",
            ColorToken::SubtleText => "subtle-text",
            ColorToken::Link => "link",
            ColorToken::CardBackground => "card-bg",
            ColorToken::CardBorder => "card-border",
            ColorToken::Glow1 => "glow-1",
            ColorToken::Glow2 => "glow-2",
            ColorToken::Gradient1 => "gradient-1",
            ColorToken::Gradient2 => "gradient-2",
        }
    }
}

/// Resolved colors for one scheme
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub heading: Color,
    pub text: Color,
    pub subtle_text: Color,
    pub link: Color,
    pub card_background: Color,
    pub card_border: Color,
    pub glow_1: Color,
    pub glow_2: Color,
    pub gradient_1: Color,
    pub gradient_2: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: Color::from_hex(0xf1f5f9),
            heading: Color::from_hex(0x020617),
            text: Color::from_hex(0x475569),
            subtle_text: Color::from_hex(0x64748b),
            link: Color::from_hex(0x4f46e5),
            card_background: Color::WHITE.with_alpha(0.6),
            card_border: Color::BLACK.with_alpha(0.1),
            glow_1: Color::from_rgb8(56, 189, 248),
            glow_2: Color::from_rgb8(167, 139, 250),
            gradient_1: Color::from_hex(0x8b5cf6),
            gradient_2: Color::from_hex(0x3b82f6),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::from_hex(0x020617),
            heading: Color::from_hex(0xf8fafc),
            text: Color::from_hex(0x94a3b8),
            subtle_text: Color::from_hex(0x475569),
            link: Color::from_hex(0xa5b4fc),
            card_background: Color::from_rgb8(15, 23, 42).with_alpha(0.5),
            card_border: Color::WHITE.with_alpha(0.1),
            ..Self::light()
        }
    }

    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
        }
    }

    /// Get a color by token
    pub fn get(&self, token: ColorToken) -> Color {
        match token {
            ColorToken::Background => self.background,
            ColorToken::Heading => self.heading,
            ColorToken::Text => self.text,
            ColorToken::SubtleText => self.subtle_text,
            ColorToken::Link => self.link,
            ColorToken::CardBackground => self.card_background,
            ColorToken::CardBorder => self.card_border,
            ColorToken::Glow1 => self.glow_1,
            ColorToken::Glow2 => self.glow_2,
            ColorToken::Gradient1 => self.gradient_1,
            ColorToken::Gradient2 => self.gradient_2,
        }
    }

    /// Interpolate every token between two palettes
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            background: Color::lerp(&from.background, &to.background, t),
            heading: Color::lerp(&from.heading, &to.heading, t),
            text: Color::lerp(&from.text, &to.text, t),
            subtle_text: Color::lerp(&from.subtle_text, &to.subtle_text, t),
            link: Color::lerp(&from.link, &to.link, t),
            card_background: Color::lerp(&from.card_background, &to.card_background, t),
            card_border: Color::lerp(&from.card_border, &to.card_border, t),
            glow_1: Color::lerp(&from.glow_1, &to.glow_1, t),
            glow_2: Color::lerp(&from.glow_2, &to.glow_2, t),
            gradient_1: Color::lerp(&from.gradient_1, &to.gradient_1, t),
            gradient_2: Color::lerp(&from.gradient_2, &to.gradient_2, t),
        }
    }

    /// `(--name, css color)` pairs in token order
    pub fn css_variables(&self) -> Vec<(String, String)> {
        ColorToken::ALL
            .iter()
            .map(|token| (format!("--{}", token.css_name()), self.get(*token).to_css()))
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::light()
    }
}

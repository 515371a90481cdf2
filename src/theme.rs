use catppuccin::PALETTE;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used by the picker and its dialogs.
///
/// Built from one of the Catppuccin flavors. The config file selects the
/// flavor by name, see [`theme_from_name`].
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub overlay0: Color,
    pub overlay1: Color,
    pub text: Color,
    pub mauve: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub sky: Color,
    pub lavender: Color,

    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            overlay0: catppuccin_to_color(&c.overlay0),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            mauve: catppuccin_to_color(&c.mauve),
            peach: catppuccin_to_color(&c.peach),
            yellow: catppuccin_to_color(&c.yellow),
            green: catppuccin_to_color(&c.green),
            sky: catppuccin_to_color(&c.sky),
            lavender: catppuccin_to_color(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    /// Catppuccin Mocha theme (dark).
    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    /// Catppuccin Latte theme (light).
    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    /// Catppuccin Frappé theme (dark).
    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    /// Catppuccin Macchiato theme (dark).
    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    #[must_use]
    pub const fn base(&self) -> Color {
        self.base
    }

    #[must_use]
    pub const fn text(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn muted(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn disabled(&self) -> Color {
        self.overlay0
    }

    #[must_use]
    pub const fn accent(&self) -> Color {
        self.mauve
    }

    #[must_use]
    pub const fn key_hint(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn success(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn warning(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn info(&self) -> Color {
        self.sky
    }

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn border_focused(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface0
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Names accepted in `[theme] name = ...`.
const THEMES: &[(&str, fn() -> Theme)] = &[
    ("Catppuccin Mocha", Theme::catppuccin_mocha),
    ("Catppuccin Macchiato", Theme::catppuccin_macchiato),
    ("Catppuccin Frappé", Theme::catppuccin_frappe),
    ("Catppuccin Latte", Theme::catppuccin_latte),
];

/// Look up a theme by name. Returns the default theme if not found.
pub fn theme_from_name(name: &str) -> Theme {
    THEMES
        .iter()
        .find(|(theme_name, _)| theme_name.eq_ignore_ascii_case(name))
        .map_or_else(
            || {
                tracing::warn!("Unknown theme {name:?}, falling back to Catppuccin Mocha");
                Theme::default()
            },
            |(_, build)| build(),
        )
}

use catppuccin::PALETTE;
use ratatui::style::Color;

const fn rgb(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colours used by the page, taken from a Catppuccin flavour.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    base: Color,
    mantle: Color,
    surface0: Color,
    surface1: Color,
    surface2: Color,
    overlay0: Color,
    overlay1: Color,
    text: Color,
    subtext0: Color,
    mauve: Color,
    red: Color,
    peach: Color,
    yellow: Color,
    green: Color,
    blue: Color,
    lavender: Color,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: rgb(&c.base),
            mantle: rgb(&c.mantle),
            surface0: rgb(&c.surface0),
            surface1: rgb(&c.surface1),
            surface2: rgb(&c.surface2),
            overlay0: rgb(&c.overlay0),
            overlay1: rgb(&c.overlay1),
            text: rgb(&c.text),
            subtext0: rgb(&c.subtext0),
            mauve: rgb(&c.mauve),
            red: rgb(&c.red),
            peach: rgb(&c.peach),
            yellow: rgb(&c.yellow),
            green: rgb(&c.green),
            blue: rgb(&c.blue),
            lavender: rgb(&c.lavender),
        }
    }

    pub const fn base(&self) -> Color {
        self.base
    }

    pub const fn mantle(&self) -> Color {
        self.mantle
    }

    pub const fn surface0(&self) -> Color {
        self.surface0
    }

    pub const fn surface1(&self) -> Color {
        self.surface1
    }

    pub const fn surface2(&self) -> Color {
        self.surface2
    }

    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    pub const fn text(&self) -> Color {
        self.text
    }

    pub const fn subtext0(&self) -> Color {
        self.subtext0
    }

    pub const fn mauve(&self) -> Color {
        self.mauve
    }

    pub const fn red(&self) -> Color {
        self.red
    }

    pub const fn peach(&self) -> Color {
        self.peach
    }

    pub const fn yellow(&self) -> Color {
        self.yellow
    }

    pub const fn green(&self) -> Color {
        self.green
    }

    pub const fn blue(&self) -> Color {
        self.blue
    }

    pub const fn lavender(&self) -> Color {
        self.lavender
    }

    // Semantic colors

    /// Saffron accent used for prices and highlights.
    pub const fn accent(&self) -> Color {
        self.peach
    }

    pub const fn selection_bg(&self) -> Color {
        self.surface1
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }
}

const THEMES: &[&str] = &[
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappé",
    "Catppuccin Latte",
];

pub fn available_themes() -> &'static [&'static str] {
    THEMES
}

/// Look up a theme by name. Unknown names get the default theme.
pub fn theme_from_name(name: &str) -> Theme {
    match name {
        "Catppuccin Macchiato" => Theme::from_catppuccin(&PALETTE.macchiato),
        "Catppuccin Frappé" => Theme::from_catppuccin(&PALETTE.frappe),
        "Catppuccin Latte" => Theme::from_catppuccin(&PALETTE.latte),
        "Catppuccin Mocha" => Theme::default(),
        other => {
            tracing::warn!(theme = other, "Unknown theme, using the default");
            Theme::default()
        }
    }
}

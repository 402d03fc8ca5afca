mod colors;

use ratatui::style::Color;

use colors::HangryColors;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
    pub surface: Color,
    pub text_secondary: Color,
    pub bar_bg: Color,
    pub text_on_bar: Color,
}

impl Theme {
    pub fn hangry() -> Self {
        Self {
            name: "Hangry",
            accent: HangryColors::TOMATO,
            success: HangryColors::BASIL,
            warning: HangryColors::MUSTARD,
            error: HangryColors::TOMATO,
            border: HangryColors::CRUST,
            surface: HangryColors::CREAM,
            text_secondary: HangryColors::TEXT_SECONDARY,
            bar_bg: HangryColors::ESPRESSO,
            text_on_bar: HangryColors::TEXT_ON_BAR,
        }
    }

    pub fn terminal() -> Self {
        Self {
            name: "Terminal",
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border: Color::DarkGray,
            surface: Color::Black,
            text_secondary: Color::Gray,
            bar_bg: Color::Blue,
            text_on_bar: Color::White,
        }
    }

    pub fn next(self) -> Self {
        if self.name == "Hangry" {
            Self::terminal()
        } else {
            Self::hangry()
        }
    }
}

//! Hangry colour palette as ratatui Color::Rgb constants.

use ratatui::style::Color;

pub struct HangryColors;

impl HangryColors {
    // Primary palette
    pub const TOMATO: Color = Color::Rgb(214, 69, 65); // #D64541
    pub const MUSTARD: Color = Color::Rgb(226, 170, 52); // #E2AA34
    pub const BASIL: Color = Color::Rgb(61, 126, 74); // #3D7E4A
    pub const ESPRESSO: Color = Color::Rgb(45, 33, 28); // #2D211C

    // Surfaces
    pub const CREAM: Color = Color::Rgb(252, 246, 236); // #FCF6EC
    pub const CRUST: Color = Color::Rgb(222, 205, 180); // #DECDB4

    // Text
    pub const TEXT_SECONDARY: Color = Color::Rgb(128, 110, 98); // #806E62
    pub const TEXT_ON_BAR: Color = Color::Rgb(255, 255, 255);
}

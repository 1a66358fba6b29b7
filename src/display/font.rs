use embedded_graphics::mono_font::{
    iso_8859_1::{FONT_5X8, FONT_6X10, FONT_7X13},
    MonoFont,
};

use crate::config::FontName;

/// The iso-8859-1 variants carry the degree sign used on the CPU line.
pub fn font_for(name: FontName) -> &'static MonoFont<'static> {
    match name {
        FontName::Font5x8 => &FONT_5X8,
        FontName::Font6x10 => &FONT_6X10,
        FontName::Font7x13 => &FONT_7X13,
    }
}

/// Rendered width of `text` in pixels. Monospace fonts advance by a fixed
/// amount per character, so this is exact, not an estimate.
pub fn measure_width(font: &MonoFont<'_>, text: &str) -> u32 {
    let advance = font.character_size.width + font.character_spacing;
    text.chars().count() as u32 * advance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_by_character_advance() {
        let font = font_for(FontName::Font6x10);
        assert_eq!(measure_width(font, ""), 0);
        assert_eq!(measure_width(font, "CPU"), 3 * measure_width(font, "C"));
    }

    #[test]
    fn multibyte_characters_count_once() {
        let font = font_for(FontName::Font6x10);
        assert_eq!(measure_width(font, "°C"), 2 * measure_width(font, "C"));
    }

    #[test]
    fn wider_font_measures_wider() {
        let narrow = font_for(FontName::Font5x8);
        let wide = font_for(FontName::Font7x13);
        assert!(measure_width(wide, "RAM") > measure_width(narrow, "RAM"));
    }
}

//! Colour helpers shared by the raster buffer, the overlay and the config layer.

use egui::Color32;
use image::Rgb;

/// Parse `#rrggbb`, `#rgb`, or one of a handful of basic colour names.
pub fn parse_color(text: &str) -> Option<Color32> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    let color = match text.to_ascii_lowercase().as_str() {
        "white" => Color32::WHITE,
        "black" => Color32::BLACK,
        "red" => Color32::from_rgb(255, 0, 0),
        "green" => Color32::from_rgb(0, 128, 0),
        "blue" => Color32::from_rgb(0, 0, 255),
        "yellow" => Color32::from_rgb(255, 255, 0),
        "gray" | "grey" => Color32::from_rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color32::from_rgb(r, g, b))
        }
        3 => {
            // #abc expands to #aabbcc
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Color32::from_rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

/// Format a colour as `#rrggbb`.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Colour as an RGB pixel for the raster buffer. Alpha is dropped.
pub fn to_pixel(color: Color32) -> Rgb<u8> {
    Rgb([color.r(), color.g(), color.b()])
}

pub fn from_pixel(pixel: Rgb<u8>) -> Color32 {
    Color32::from_rgb(pixel[0], pixel[1], pixel[2])
}

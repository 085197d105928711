use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};

/// Integer magnification applied to the 8x8 glyphs
pub const GLYPH_SCALE: u32 = 2;
/// Advance per character and per line, in pixels
pub const GLYPH_ADVANCE: u32 = 8 * GLYPH_SCALE;
pub const LINE_ADVANCE: u32 = GLYPH_ADVANCE + 2;

fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

/// Lit pixel offsets, relative to the text anchor, for `text` laid out with
/// the bitmap font. Characters without a glyph are drawn as a hollow box.
pub fn glyph_pixels(text: &str) -> Vec<(u32, u32)> {
    let mut pixels = Vec::new();
    let mut line = 0u32;
    let mut column = 0u32;

    for c in text.chars() {
        if c == '\n' {
            line += 1;
            column = 0;
            continue;
        }

        let origin_x = column * GLYPH_ADVANCE;
        let origin_y = line * LINE_ADVANCE;
        let rows = glyph(c).unwrap_or([0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF]);

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..8u32 {
                // Bit 0 is the leftmost column
                if bits & (1 << col) == 0 {
                    continue;
                }
                for sy in 0..GLYPH_SCALE {
                    for sx in 0..GLYPH_SCALE {
                        pixels.push((
                            origin_x + col * GLYPH_SCALE + sx,
                            origin_y + row as u32 * GLYPH_SCALE + sy,
                        ));
                    }
                }
            }
        }
        column += 1;
    }

    pixels
}

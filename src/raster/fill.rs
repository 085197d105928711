use image::{Rgb, RgbImage};

/// 4-connected flood fill from `(x, y)`, returning the number of repainted pixels.
///
/// Uses an explicit stack so large contiguous regions cannot exhaust the call
/// stack. Seeding on a pixel that already has `fill` is a no-op, which also
/// makes the operation idempotent.
pub fn flood_fill(image: &mut RgbImage, x: u32, y: u32, fill: Rgb<u8>) -> usize {
    let (width, height) = image.dimensions();
    if x >= width || y >= height {
        return 0;
    }

    let target = *image.get_pixel(x, y);
    if target == fill {
        return 0;
    }

    let mut changed = 0;
    let mut stack = vec![(x, y)];
    while let Some((px, py)) = stack.pop() {
        // Already repainted through another neighbour
        if *image.get_pixel(px, py) != target {
            continue;
        }
        image.put_pixel(px, py, fill);
        changed += 1;

        let mut visit = |nx: u32, ny: u32| {
            if *image.get_pixel(nx, ny) == target {
                stack.push((nx, ny));
            }
        };
        if px > 0 {
            visit(px - 1, py);
        }
        if px + 1 < width {
            visit(px + 1, py);
        }
        if py > 0 {
            visit(px, py - 1);
        }
        if py + 1 < height {
            visit(px, py + 1);
        }
    }

    changed
}

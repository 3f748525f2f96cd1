//! 1bpp frame for the 144x168 face.

use core::convert::Infallible;
use std::io;

use classy_core::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
use embedded_graphics::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
};

pub const WIDTH: usize = SCREEN_WIDTH as usize;
pub const HEIGHT: usize = SCREEN_HEIGHT as usize;
pub const LINE_BYTES: usize = WIDTH / 8;
pub const FRAME_BYTES: usize = LINE_BYTES * HEIGHT;

/// Packed monochrome frame; a set bit is a black pixel.
///
/// Bit 7 of each line byte is the leftmost pixel, the same packing PBM uses.
#[derive(Clone)]
pub struct Frame {
    bytes: [u8; FRAME_BYTES],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// An all-white frame.
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; FRAME_BYTES],
        }
    }

    pub fn bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.bytes
    }

    pub fn clear(&mut self, on: bool) {
        self.bytes.fill(if on { 0xFF } else { 0x00 });
    }

    /// Returns `false` when the pixel is off screen.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        let Some((index, mask)) = locate(x, y) else {
            return false;
        };

        if on {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        let (index, mask) = locate(x, y)?;
        Some(self.bytes[index] & mask != 0)
    }

    /// Number of black pixels.
    pub fn count_on(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Writes the frame as a binary PBM (`P4`) image.
    pub fn write_pbm<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P4\n{} {}\n", WIDTH, HEIGHT)?;
        out.write_all(&self.bytes)?;
        out.flush()
    }
}

fn locate(x: usize, y: usize) -> Option<(usize, u8)> {
    if x >= WIDTH || y >= HEIGHT {
        return None;
    }
    Some((y * LINE_BYTES + x / 8, 1u8 << (7 - (x % 8))))
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let _ = self.set_pixel(point.x as usize, point.y as usize, color.is_on());
        }
        Ok(())
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    #[test]
    fn leftmost_pixel_is_the_high_bit() {
        let mut frame = Frame::new();
        assert!(frame.set_pixel(0, 0, true));
        assert!(frame.set_pixel(9, 0, true));

        assert_eq!(frame.bytes()[0], 0b1000_0000);
        assert_eq!(frame.bytes()[1], 0b0100_0000);
        assert_eq!(frame.count_on(), 2);
    }

    #[test]
    fn off_screen_pixels_are_ignored() {
        let mut frame = Frame::new();
        assert!(!frame.set_pixel(WIDTH, 0, true));
        assert!(!frame.set_pixel(0, HEIGHT, true));
        assert_eq!(frame.pixel(WIDTH - 1, HEIGHT - 1), Some(false));
        assert_eq!(frame.pixel(WIDTH, HEIGHT), None);
        assert_eq!(frame.count_on(), 0);
    }

    #[test]
    fn draws_through_embedded_graphics() {
        let mut frame = Frame::new();
        Rectangle::new(Point::new(-2, -2), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();

        assert_eq!(frame.count_on(), 4);
        assert_eq!(frame.pixel(1, 1), Some(true));
    }

    #[test]
    fn pbm_has_header_and_packed_rows() {
        let mut frame = Frame::new();
        frame.clear(true);

        let mut out = Vec::new();
        frame.write_pbm(&mut out).unwrap();

        let header = b"P4\n144 168\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(out.len(), header.len() + FRAME_BYTES);
        assert!(out[header.len()..].iter().all(|b| *b == 0xFF));
    }
}

use chipcore::display::{FrameBuffer, HEIGHT, WIDTH};
use chipcore::keyboard::KeyLatch;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

const TITLE: &str = "chipcore - ESC to exit";

pub fn scale_from(factor: usize) -> Scale {
    match factor {
        0 | 1 => Scale::X1,
        2 | 3 => Scale::X2,
        4..=7 => Scale::X4,
        8..=15 => Scale::X8,
        16..=31 => Scale::X16,
        _ => Scale::X32,
    }
}

fn from_u16_rgb(r: u16, g: u16, b: u16) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

/// Window that shows the framebuffer and feeds the key latch.
pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
    on: u32,
    off: u32,
}

impl Screen {
    pub fn new(scale: Scale) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            TITLE,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);
        // the host loop paces presentation itself
        window.limit_update_rate(None);
        Ok(Self {
            pixel_buffer: vec![0; WIDTH * HEIGHT],
            window,
            on: from_u16_rgb(0, 127, 255),
            off: from_u16_rgb(0, 0, 0),
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    pub fn paint(&mut self, fb: &FrameBuffer) {
        for (px, lit) in self.pixel_buffer.iter_mut().zip(fb.pixels()) {
            *px = if *lit { self.on } else { self.off };
        }
    }

    /// Push the pixel buffer, pump window events and refresh the key latch.
    pub fn sync(&mut self, keys: &KeyLatch) -> Result<(), minifb::Error> {
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)?;
        keys.update_from_keys(&self.window.get_keys());
        Ok(())
    }

    pub fn set_status(&mut self, status: Option<&str>) {
        match status {
            Some(status) => self.window.set_title(&format!("{TITLE} | {status}")),
            None => self.window.set_title(TITLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_rounds_down() {
        assert!(matches!(scale_from(1), Scale::X1));
        assert!(matches!(scale_from(10), Scale::X8));
        assert!(matches!(scale_from(16), Scale::X16));
        assert!(matches!(scale_from(100), Scale::X32));
    }

    #[test]
    fn test_rgb_packing() {
        assert_eq!(from_u16_rgb(0, 127, 255), 0x007FFF);
    }
}

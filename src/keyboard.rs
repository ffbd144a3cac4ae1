use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use minifb::Key;

/// Bitmask of held hex keys, bit k = key k. Clones share the same mask, so an
/// input source on another thread can keep one and write while the
/// interpreter reads once per step.
#[derive(Debug, Clone, Default)]
pub struct KeyLatch {
    mask: Arc<AtomicU16>,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: u8) {
        self.mask.fetch_or(1 << (key & 0xF), Ordering::Relaxed);
    }

    pub fn release(&self, key: u8) {
        self.mask.fetch_and(!(1 << (key & 0xF)), Ordering::Relaxed);
    }

    pub fn set_mask(&self, mask: u16) {
        self.mask.store(mask, Ordering::Relaxed);
    }

    pub fn mask(&self) -> u16 {
        self.mask.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> KeyState {
        KeyState(self.mask())
    }

    /// Replace the whole mask with whatever mapped keys appear in `held`.
    pub fn update_from_keys(&self, held: &[Key]) {
        let mask = held
            .iter()
            .filter_map(key_to_num)
            .fold(0u16, |acc, k| acc | 1 << k);
        self.set_mask(mask);
    }
}

/// One read of the latch, taken at the start of a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState(pub u16);

impl KeyState {
    pub fn is_pressed(&self, key: u8) -> bool {
        // VX can hold any byte; only 0x0..=0xF name a key
        key < 16 && self.0 & (1 << key) != 0
    }

    pub fn highest_pressed(&self) -> Option<u8> {
        (0..16u8).rev().find(|k| self.is_pressed(*k))
    }
}

// 1 2 3 C      1 2 3 4
// 4 5 6 D  <-  Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
pub fn key_to_num(key: &Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_mask() {
        let latch = KeyLatch::new();
        let writer = latch.clone();
        writer.press(3);
        writer.press(0xA);
        assert_eq!(latch.mask(), 0b0000_0100_0000_1000);
        writer.release(3);
        assert_eq!(latch.mask(), 1 << 0xA);
    }

    #[test]
    fn test_highest_pressed() {
        assert_eq!(KeyState(0).highest_pressed(), None);
        assert_eq!(KeyState(0b1001).highest_pressed(), Some(3));
        assert_eq!(KeyState(0x8001).highest_pressed(), Some(15));
    }

    #[test]
    fn test_out_of_range_key_is_never_pressed() {
        assert!(!KeyState(0xFFFF).is_pressed(16));
        assert!(!KeyState(0xFFFF).is_pressed(0xFF));
    }

    #[test]
    fn test_update_from_keys_maps_qwerty() {
        let latch = KeyLatch::new();
        latch.update_from_keys(&[Key::Q, Key::V, Key::Space]);
        let keys = latch.snapshot();
        assert!(keys.is_pressed(0x4));
        assert!(keys.is_pressed(0xF));
        assert_eq!(keys.0.count_ones(), 2);
        latch.update_from_keys(&[]);
        assert_eq!(latch.snapshot(), KeyState(0));
    }
}

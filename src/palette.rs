use serde::Serialize;

/// Fill colors assigned to newly added options, in wheel order.
///
/// New options take `PALETTE[len % PALETTE.len()]` where `len` is the list
/// length at creation time, so colors cycle as the wheel grows.
pub const PALETTE: [Rgb; 10] = [
    Rgb::new(0xFF, 0x31, 0x31),
    Rgb::new(0xFF, 0x14, 0x93),
    Rgb::new(0x94, 0x00, 0xD3),
    Rgb::new(0x00, 0x00, 0xFF),
    Rgb::new(0x00, 0xBF, 0xFF),
    Rgb::new(0x00, 0xFF, 0x00),
    Rgb::new(0xFF, 0xD7, 0x00),
    Rgb::new(0xFF, 0xA5, 0x00),
    Rgb::new(0xFF, 0x45, 0x00),
    Rgb::new(0xFF, 0x69, 0xB4),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// CSS-style `#RRGGBB` form, used by the SVG export.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Color for an option created while the list holds `len` entries.
pub fn color_for(len: usize) -> Rgb {
    PALETTE[len % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_after_palette_length() {
        assert_eq!(color_for(0), color_for(PALETTE.len()));
        assert_eq!(color_for(3), color_for(3 + PALETTE.len()));
    }

    #[test]
    fn hex_roundtrip_format() {
        assert_eq!(Rgb::new(0xFF, 0x31, 0x31).to_hex(), "#FF3131");
        assert_eq!(Rgb::new(0x00, 0xBF, 0xFF).to_hex(), "#00BFFF");
    }
}

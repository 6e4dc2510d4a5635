use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParamsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Fill for seats reserved by another owner.
    pub const BLOCKED: Color = Color::rgb(0x55, 0x55, 0x55);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn hex(v: u32) -> Self {
        Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Scales every channel to `(4 - level) / 4` of its value.
    pub fn shade(self, level: u8) -> Self {
        let keep = 4u16.saturating_sub(level as u16);
        let f = |c: u8| ((c as u16 * keep) / 4) as u8;
        Self::rgb(f(self.r), f(self.g), f(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParamsError;

    /// Accepts `#RRGGBB`, `#RGB`, or a CSS color name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || ParamsError::Color(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(bad());
            }
            let v = u32::from_str_radix(hex, 16).map_err(|_| bad())?;
            return match hex.len() {
                6 => Ok(Color::hex(v)),
                3 => {
                    let expand = |n: u32| ((n & 0xF) * 0x11) as u8;
                    Ok(Color::rgb(expand(v >> 8), expand(v >> 4), expand(v)))
                }
                _ => Err(bad()),
            };
        }

        NAMED
            .iter()
            .chain(ALIASES)
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, c)| c)
            .ok_or_else(bad)
    }
}

impl TryFrom<String> for Color {
    type Error = ParamsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Deepest shade tried before colors start repeating.
const MAX_SHADE: u8 = 3;

/// Hands out slot colors: the first palette entry no live slot uses.
/// Entries equal to the event or blocked color are never handed out.
#[derive(Debug, Clone)]
pub struct SlotPalette {
    base: Color,
}

impl SlotPalette {
    pub fn new(base: Color) -> Self {
        Self { base }
    }

    fn candidates(&self) -> impl Iterator<Item = Color> + '_ {
        NAMED
            .iter()
            .map(|&(_, c)| c)
            .filter(move |c| *c != self.base && *c != Color::BLOCKED)
    }

    /// Once the plain palette is used up, walks it again at darker shades.
    pub fn pick(&self, used: &[Color]) -> Color {
        for level in 0..=MAX_SHADE {
            if let Some(c) = self
                .candidates()
                .map(|c| c.shade(level))
                .find(|c| !used.contains(c))
            {
                return c;
            }
        }

        let n = self.candidates().count().max(1);
        let repeat = self
            .candidates()
            .nth(used.len() % n)
            .unwrap_or(Color::BLACK);
        tracing::warn!(color = %repeat, in_use = used.len(), "slot palette exhausted, repeating");
        repeat
    }
}

// CSS named colors, value duplicates (Cyan, Magenta) moved to ALIASES.
const NAMED: &[(&str, Color)] = &[
    ("Aqua", Color::hex(0x00FFFF)),
    ("Aquamarine", Color::hex(0x7FFFD4)),
    ("BlanchedAlmond", Color::hex(0xFFEBCD)),
    ("Blue", Color::hex(0x0000FF)),
    ("BlueViolet", Color::hex(0x8A2BE2)),
    ("Brown", Color::hex(0xA52A2A)),
    ("BurlyWood", Color::hex(0xDEB887)),
    ("CadetBlue", Color::hex(0x5F9EA0)),
    ("Chartreuse", Color::hex(0x7FFF00)),
    ("Chocolate", Color::hex(0xD2691E)),
    ("Coral", Color::hex(0xFF7F50)),
    ("CornflowerBlue", Color::hex(0x6495ED)),
    ("Cornsilk", Color::hex(0xFFF8DC)),
    ("Crimson", Color::hex(0xDC143C)),
    ("DarkBlue", Color::hex(0x00008B)),
    ("DarkCyan", Color::hex(0x008B8B)),
    ("DarkGoldenRod", Color::hex(0xB8860B)),
    ("DarkGray", Color::hex(0xA9A9A9)),
    ("DarkGreen", Color::hex(0x006400)),
    ("DarkKhaki", Color::hex(0xBDB76B)),
    ("DarkMagenta", Color::hex(0x8B008B)),
    ("DarkOliveGreen", Color::hex(0x556B2F)),
    ("DarkOrange", Color::hex(0xFF8C00)),
    ("DarkOrchid", Color::hex(0x9932CC)),
    ("DarkRed", Color::hex(0x8B0000)),
    ("DarkSalmon", Color::hex(0xE9967A)),
    ("DarkSeaGreen", Color::hex(0x8FBC8F)),
    ("DarkSlateBlue", Color::hex(0x483D8B)),
    ("DarkSlateGray", Color::hex(0x2F4F4F)),
    ("DarkTurquoise", Color::hex(0x00CED1)),
    ("DarkViolet", Color::hex(0x9400D3)),
    ("DeepPink", Color::hex(0xFF1493)),
    ("DeepSkyBlue", Color::hex(0x00BFFF)),
    ("DodgerBlue", Color::hex(0x1E90FF)),
    ("FireBrick", Color::hex(0xB22222)),
    ("ForestGreen", Color::hex(0x228B22)),
    ("Fuchsia", Color::hex(0xFF00FF)),
    ("Gold", Color::hex(0xFFD700)),
    ("GoldenRod", Color::hex(0xDAA520)),
    ("Gray", Color::hex(0x808080)),
    ("Green", Color::hex(0x008000)),
    ("GreenYellow", Color::hex(0xADFF2F)),
    ("HotPink", Color::hex(0xFF69B4)),
    ("IndianRed", Color::hex(0xCD5C5C)),
    ("Indigo", Color::hex(0x4B0082)),
    ("Khaki", Color::hex(0xF0E68C)),
    ("LawnGreen", Color::hex(0x7CFC00)),
    ("LightCoral", Color::hex(0xF08080)),
    ("LightGoldenRodYellow", Color::hex(0xFAFAD2)),
    ("LightGreen", Color::hex(0x90EE90)),
    ("LightPink", Color::hex(0xFFB6C1)),
    ("LightSalmon", Color::hex(0xFFA07A)),
    ("LightSeaGreen", Color::hex(0x20B2AA)),
    ("LightSkyBlue", Color::hex(0x87CEFA)),
    ("Lime", Color::hex(0x00FF00)),
    ("LimeGreen", Color::hex(0x32CD32)),
    ("Maroon", Color::hex(0x800000)),
    ("MediumAquaMarine", Color::hex(0x66CDAA)),
    ("MediumBlue", Color::hex(0x0000CD)),
    ("MediumOrchid", Color::hex(0xBA55D3)),
    ("MediumPurple", Color::hex(0x9370DB)),
    ("MediumSeaGreen", Color::hex(0x3CB371)),
    ("MediumSlateBlue", Color::hex(0x7B68EE)),
    ("MediumSpringGreen", Color::hex(0x00FA9A)),
    ("MediumTurquoise", Color::hex(0x48D1CC)),
    ("MediumVioletRed", Color::hex(0xC71585)),
    ("MidnightBlue", Color::hex(0x191970)),
    ("Navy", Color::hex(0x000080)),
    ("Olive", Color::hex(0x808000)),
    ("OliveDrab", Color::hex(0x6B8E23)),
    ("Orange", Color::hex(0xFFA500)),
    ("OrangeRed", Color::hex(0xFF4500)),
    ("Orchid", Color::hex(0xDA70D6)),
    ("PaleGreen", Color::hex(0x98FB98)),
    ("PaleVioletRed", Color::hex(0xDB7093)),
    ("Peru", Color::hex(0xCD853F)),
    ("Pink", Color::hex(0xFFC0CB)),
    ("Plum", Color::hex(0xDDA0DD)),
    ("PowderBlue", Color::hex(0xB0E0E6)),
    ("Purple", Color::hex(0x800080)),
    ("RebeccaPurple", Color::hex(0x663399)),
    ("Red", Color::hex(0xFF0000)),
    ("RosyBrown", Color::hex(0xBC8F8F)),
    ("RoyalBlue", Color::hex(0x4169E1)),
    ("SaddleBrown", Color::hex(0x8B4513)),
    ("Salmon", Color::hex(0xFA8072)),
    ("SandyBrown", Color::hex(0xF4A460)),
    ("SeaGreen", Color::hex(0x2E8B57)),
    ("Sienna", Color::hex(0xA0522D)),
    ("Silver", Color::hex(0xC0C0C0)),
    ("SkyBlue", Color::hex(0x87CEEB)),
    ("SlateBlue", Color::hex(0x6A5ACD)),
    ("SlateGray", Color::hex(0x708090)),
    ("SpringGreen", Color::hex(0x00FF7F)),
    ("SteelBlue", Color::hex(0x4682B4)),
    ("Tan", Color::hex(0xD2B48C)),
    ("Teal", Color::hex(0x008080)),
    ("Thistle", Color::hex(0xD8BFD8)),
    ("Tomato", Color::hex(0xFF6347)),
    ("Turquoise", Color::hex(0x40E0D0)),
    ("Violet", Color::hex(0xEE82EE)),
    ("Yellow", Color::hex(0xFFFF00)),
    ("YellowGreen", Color::hex(0x9ACD32)),
];

const ALIASES: &[(&str, Color)] = &[
    ("Cyan", Color::hex(0x00FFFF)),
    ("Magenta", Color::hex(0xFF00FF)),
    ("Black", Color::BLACK),
    ("White", Color::hex(0xFFFFFF)),
];

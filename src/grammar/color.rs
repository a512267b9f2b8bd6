use serde::{Deserialize, Serialize};

/// Canonical palette the lab shader understands. Free-text synonyms resolve
/// to exactly one of these; anything else fails classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorToken {
    Green,
    Blue,
    Red,
    Purple,
    Orange,
    Yellow,
    Pink,
    White,
}

impl ColorToken {
    pub const ALL: [ColorToken; 8] = [
        ColorToken::Green,
        ColorToken::Blue,
        ColorToken::Red,
        ColorToken::Purple,
        ColorToken::Orange,
        ColorToken::Yellow,
        ColorToken::Pink,
        ColorToken::White,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorToken::Green => "green",
            ColorToken::Blue => "blue",
            ColorToken::Red => "red",
            ColorToken::Purple => "purple",
            ColorToken::Orange => "orange",
            ColorToken::Yellow => "yellow",
            ColorToken::Pink => "pink",
            ColorToken::White => "white",
        }
    }

    /// Every synonym maps to exactly one canonical token. Keep these sets
    /// disjoint; `grammar_tests` checks for collisions.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            ColorToken::Green => &["green", "grass", "lime"],
            ColorToken::Blue => &["blue", "sky", "ocean", "cyan"],
            ColorToken::Red => &["red", "crimson"],
            ColorToken::Purple => &["purple", "violet"],
            ColorToken::Orange => &["orange"],
            ColorToken::Yellow => &["yellow", "gold", "sun"],
            ColorToken::Pink => &["pink", "magenta"],
            ColorToken::White => &["white"],
        }
    }

    /// Scan a lowercased line for the first word naming a color.
    /// Whole words only, so "lime" matches but "sublime" does not.
    pub fn scan(text: &str) -> Option<ColorToken> {
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            for color in Self::ALL {
                if color.synonyms().contains(&word) {
                    return Some(color);
                }
            }
        }
        None
    }
}

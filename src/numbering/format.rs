//! Number format kinds and the value-to-glyph mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

const FULL_WIDTH_DIGITS: [char; 10] = ['０', '１', '２', '３', '４', '５', '６', '７', '８', '９'];

const ENCLOSED_CIRCLE: [&str; 20] = [
    "①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩", "⑪", "⑫", "⑬", "⑭", "⑮", "⑯", "⑰",
    "⑱", "⑲", "⑳",
];

const IROHA: [&str; 48] = [
    "イ", "ロ", "ハ", "ニ", "ホ", "ヘ", "ト", "チ", "リ", "ヌ", "ル", "ヲ", "ワ", "カ", "ヨ", "タ",
    "レ", "ソ", "ツ", "ネ", "ナ", "ラ", "ム", "ウ", "ヰ", "ノ", "オ", "ク", "ヤ", "マ", "ケ", "フ",
    "コ", "エ", "テ", "ア", "サ", "キ", "ユ", "メ", "ミ", "シ", "ヱ", "ヒ", "モ", "セ", "ス", "ン",
];

/// Largest value written as letters (`zzz...z`, 30 long).
const MAX_LETTER_VALUE: u32 = 26 * 30;

const MAX_ROMAN_VALUE: u32 = 3999;

const ROMAN: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Numbering format of a list level (`w:numFmt/@w:val`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum NumberFormat {
    /// Bullet glyph; the counter itself renders as nothing.
    Bullet,
    /// No number at all.
    None,
    /// `1`, `2`, `3`
    #[default]
    Decimal,
    /// `１`, `２`, `３`
    DecimalFullWidth,
    /// `(1)`, `(2)`, `(3)`
    DecimalEnclosedParen,
    /// `①`, `②`, `③`
    DecimalEnclosedCircle,
    /// `イ`, `ロ`, `ハ`
    IrohaFullWidth,
    /// `a`, `b`, ... `z`, `aa`
    LowerLetter,
    /// `A`, `B`, ... `Z`, `AA`
    UpperLetter,
    /// `i`, `ii`, `iii`
    LowerRoman,
    /// `I`, `II`, `III`
    UpperRoman,
    /// Any format name without a renderer.
    Other(String),
}

impl NumberFormat {
    /// Map a format name to its kind. Unrecognized names become
    /// [`NumberFormat::Other`].
    pub fn parse(kind: &str) -> Self {
        match kind {
            "bullet" => Self::Bullet,
            "none" => Self::None,
            "decimal" => Self::Decimal,
            "decimalFullWidth" => Self::DecimalFullWidth,
            "decimalEnclosedParen" => Self::DecimalEnclosedParen,
            "decimalEnclosedCircle" => Self::DecimalEnclosedCircle,
            "irohaFullWidth" => Self::IrohaFullWidth,
            "lowerLetter" => Self::LowerLetter,
            "upperLetter" => Self::UpperLetter,
            "lowerRoman" => Self::LowerRoman,
            "upperRoman" => Self::UpperRoman,
            other => Self::Other(other.to_string()),
        }
    }

    /// The format name as written in markup.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bullet => "bullet",
            Self::None => "none",
            Self::Decimal => "decimal",
            Self::DecimalFullWidth => "decimalFullWidth",
            Self::DecimalEnclosedParen => "decimalEnclosedParen",
            Self::DecimalEnclosedCircle => "decimalEnclosedCircle",
            Self::IrohaFullWidth => "irohaFullWidth",
            Self::LowerLetter => "lowerLetter",
            Self::UpperLetter => "upperLetter",
            Self::LowerRoman => "lowerRoman",
            Self::UpperRoman => "upperRoman",
            Self::Other(name) => name,
        }
    }

    /// Render a counter value.
    ///
    /// Never fails: values a lookup table does not cover are written as
    /// plain decimal digits, and unknown kinds produce a diagnostic string
    /// naming the kind and the value.
    pub fn render(&self, value: u32) -> String {
        match self {
            Self::Bullet | Self::None => String::new(),
            Self::Decimal => value.to_string(),
            Self::DecimalFullWidth => value
                .to_string()
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(d) => FULL_WIDTH_DIGITS[d as usize],
                    None => c,
                })
                .collect(),
            Self::DecimalEnclosedParen => format!("({})", value),
            Self::DecimalEnclosedCircle => lookup(&ENCLOSED_CIRCLE, value, self),
            Self::IrohaFullWidth => lookup(&IROHA, value, self),
            Self::LowerLetter => letters(value, b'a').unwrap_or_else(|| out_of_range(value, self)),
            Self::UpperLetter => letters(value, b'A').unwrap_or_else(|| out_of_range(value, self)),
            Self::LowerRoman => roman(value)
                .map(|r| r.to_ascii_lowercase())
                .unwrap_or_else(|| out_of_range(value, self)),
            Self::UpperRoman => roman(value).unwrap_or_else(|| out_of_range(value, self)),
            Self::Other(kind) => {
                log::debug!("no renderer for number format {:?}", kind);
                format!("[unknown format type]: {} {}", kind, value)
            }
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for NumberFormat {
    fn from(kind: String) -> Self {
        Self::parse(&kind)
    }
}

impl From<NumberFormat> for String {
    fn from(format: NumberFormat) -> Self {
        format.as_str().to_string()
    }
}

/// Render `value` in the format named `kind`.
pub fn format_number(value: u32, kind: &str) -> String {
    NumberFormat::parse(kind).render(value)
}

fn lookup(table: &[&str], value: u32, format: &NumberFormat) -> String {
    match (value as usize).checked_sub(1).and_then(|i| table.get(i)) {
        Some(glyph) => (*glyph).to_string(),
        None => out_of_range(value, format),
    }
}

fn out_of_range(value: u32, format: &NumberFormat) -> String {
    log::debug!("value {} outside the {} range, using decimal", value, format);
    value.to_string()
}

/// `a`..`z`, then `aa`..`zz`, and so on, up to 30 repeats.
fn letters(value: u32, base: u8) -> Option<String> {
    if value == 0 || value > MAX_LETTER_VALUE {
        return None;
    }
    let letter = (base + ((value - 1) % 26) as u8) as char;
    let repeat = ((value - 1) / 26 + 1) as usize;
    Some(letter.to_string().repeat(repeat))
}

fn roman(mut value: u32) -> Option<String> {
    if value == 0 || value > MAX_ROMAN_VALUE {
        return None;
    }
    let mut out = String::new();
    for (weight, numeral) in ROMAN {
        while value >= weight {
            out.push_str(numeral);
            value -= weight;
        }
    }
    Some(out)
}

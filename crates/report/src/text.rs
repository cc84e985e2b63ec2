//! Text handling for the standard Helvetica fonts: truncation, WinAnsi
//! encoding, and width measurement.

/// Hard-truncate to `max` characters, ending in `...` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Encode a string for a WinAnsiEncoding font.
///
/// Glyphs the encoding lacks are substituted (`₹` becomes `Rs.`, `✓` becomes
/// `*`, `⚠` becomes `!`); anything else unrepresentable becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '₹' => out.extend_from_slice(b"Rs."),
            '✓' | '✔' => out.push(b'*'),
            '⚠' => out.push(b'!'),
            '€' => out.push(0x80),
            '…' => out.push(0x85),
            '‘' => out.push(0x91),
            '’' => out.push(0x92),
            '“' => out.push(0x93),
            '”' => out.push(0x94),
            '•' => out.push(0x95),
            '–' => out.push(0x96),
            '—' => out.push(0x97),
            ' '..='~' => out.push(ch as u8),
            '\u{a0}'..='\u{ff}' => out.push(ch as u32 as u8),
            '\t' | '\n' | '\r' => out.push(b' '),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Hex string operand for a `Tj` operator.
pub fn hex_operand(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2 + 2);
    hex.push('<');
    for b in bytes {
        hex.push_str(&format!("{b:02X}"));
    }
    hex.push('>');
    hex
}

// Helvetica advance widths (1/1000 em) for 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const DEFAULT_WIDTH: u16 = 556;

const MM_PER_PT: f64 = 25.4 / 72.0;

/// Approximate rendered width in millimetres of WinAnsi-encoded text.
///
/// Bold faces run slightly wider than regular Helvetica.
pub fn measure(encoded: &[u8], size_pt: f64, bold: bool) -> f64 {
    let units: u32 = encoded
        .iter()
        .map(|b| match b {
            0x20..=0x7E => u32::from(HELVETICA_WIDTHS[usize::from(b - 0x20)]),
            _ => u32::from(DEFAULT_WIDTH),
        })
        .sum();
    let factor = if bold { 1.06 } else { 1.0 };
    f64::from(units) / 1000.0 * size_pt * MM_PER_PT * factor
}

//! Human-readable byte formatting.
//!
//! One convention everywhere: base 1024, two decimals with trailing zeros
//! trimmed, no space before the unit (`"0B"`, `"1.5KB"`, `"2.34GB"`).

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary unit scaling.
///
/// Absent or zero input renders as `"0B"`. For nonzero input the numeric
/// magnitude stays in `[1, 1024)` — when two-decimal rounding would push
/// it to 1024, the value rolls over into the next unit instead.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: Option<u64>) -> String {
    let Some(b) = bytes.filter(|b| *b > 0) else {
        return "0B".to_owned();
    };

    let mut value = b as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut rounded = (value * 100.0).round() / 100.0;
    if rounded >= 1024.0 && unit < UNITS.len() - 1 {
        rounded /= 1024.0;
        unit += 1;
    }

    // `{}` on f64 drops trailing zeros: 1.00 -> "1", 1.50 -> "1.5".
    format!("{rounded}{}", UNITS[unit])
}

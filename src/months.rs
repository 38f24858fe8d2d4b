use crate::error::{AnalyticsError, Result};

const MONTH_NAMES: [(&str, u32); 13] = [
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        other => other,
    }
}

/// Resolves a Spanish month name to its calendar number (1..=12).
///
/// Matching ignores case, surrounding whitespace and accents.
pub fn resolve_month(name: &str) -> Result<u32> {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .collect();

    MONTH_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == normalized)
        .map(|(_, number)| *number)
        .ok_or_else(|| AnalyticsError::InvalidMonth(name.to_string()))
}

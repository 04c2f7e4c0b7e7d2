use std::cmp::Ordering;

use chrono::NaiveDateTime;

/// Shown in place of a date or time the server sent in an unknown shape.
pub const INVALID_DATE: &str = "Invalid Date";

/// Format a kickoff as an es-ES short date, e.g. "01/05/2024"
pub fn format_date(kickoff: Option<NaiveDateTime>) -> String {
    kickoff.map_or_else(|| INVALID_DATE.to_string(), |dt| dt.format("%d/%m/%Y").to_string())
}

/// Format a kickoff as a 24h "HH:MM" time
pub fn format_time(kickoff: Option<NaiveDateTime>) -> String {
    kickoff.map_or_else(|| INVALID_DATE.to_string(), |dt| dt.format("%H:%M").to_string())
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Primary collation key for Spanish text: case and accents folded,
/// with ñ kept as its own letter between n and o.
fn collation_key(input: &str) -> String {
    let mut key = String::with_capacity(input.len());
    for c in input.chars().flat_map(char::to_lowercase) {
        match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => key.push('a'),
            'é' | 'è' | 'ê' | 'ë' => key.push('e'),
            'í' | 'ì' | 'î' | 'ï' => key.push('i'),
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => key.push('o'),
            'ú' | 'ù' | 'û' | 'ü' => key.push('u'),
            'ç' => key.push('c'),
            'ñ' => key.push_str("n\u{10FFFF}"),
            _ => key.push(c),
        }
    }
    key
}

/// Locale-aware string comparison used for column sorting.
///
/// Compares by the folded key first, so "árbol" sorts next to "arbol" and
/// "Zeta" after "alfa"; ties fall back to the raw text to keep the order total.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_date_and_time() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(format_date(Some(dt)), "01/05/2024");
        assert_eq!(format_time(Some(dt)), "10:00");
        assert_eq!(format_date(None), INVALID_DATE);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"A&B"</b>"#), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape_html("O'Higgins"), "O&#39;Higgins");
    }

    #[test]
    fn test_locale_compare_folds_case_and_accents() {
        assert_eq!(locale_compare("alfa", "Zeta"), Ordering::Less);
        assert_eq!(locale_compare("Álvarez", "Alvear"), Ordering::Less);
        assert_eq!(locale_compare("canción", "cancion"), Ordering::Greater);
    }

    #[test]
    fn test_locale_compare_spanish_enye() {
        assert_eq!(locale_compare("nube", "ñandú"), Ordering::Less);
        assert_eq!(locale_compare("ñandú", "oso"), Ordering::Less);
    }
}

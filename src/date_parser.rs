use chrono::NaiveDate;

/// Portuguese three-letter month abbreviations as they appear on the site.
const MONTHS_BR: [(&str, u32); 12] = [
    ("jan", 1),
    ("fev", 2),
    ("mar", 3),
    ("abr", 4),
    ("mai", 5),
    ("jun", 6),
    ("jul", 7),
    ("ago", 8),
    ("set", 9),
    ("out", 10),
    ("nov", 11),
    ("dez", 12),
];

/// Parse a Brazilian date token, either numeric ("05/05/2024") or with an
/// abbreviated month ("05/mai/2024"). Anything else is `None` — malformed
/// tokens never raise.
pub fn parse_date_br(token: &str) -> Option<NaiveDate> {
    let token = token.trim().to_lowercase();

    if let Ok(date) = NaiveDate::parse_from_str(&token, "%d/%m/%Y") {
        return Some(date);
    }

    let parts: Vec<&str> = token.split('/').collect();
    if parts.len() == 3 {
        if let Some(&(_, month)) = MONTHS_BR.iter().find(|(abbr, _)| *abbr == parts[1]) {
            let rebuilt = format!("{}/{:02}/{}", parts[0], month, parts[2]);
            if let Ok(date) = NaiveDate::parse_from_str(&rebuilt, "%d/%m/%Y") {
                return Some(date);
            }
        }
    }

    None
}

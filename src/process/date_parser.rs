use chrono::NaiveDate;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Parse `"YYYY-MM-DD"` or `"YYYY/MM/DD"`, optionally followed by a time
/// component (`T...` or ` ...`) which is discarded.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() < 10 || !s.is_char_boundary(10) {
        return None;
    }
    let (day_part, rest) = s.split_at(10);
    if !day_part.is_ascii() {
        return None;
    }
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    let sep = &day_part[4..5];
    if (sep != "-" && sep != "/") || &day_part[7..8] != sep {
        return None;
    }
    let (y, m, d) = (&day_part[0..4], &day_part[5..7], &day_part[8..10]);
    if ![y, m, d].iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    let day: u32 = d.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Days since 1970-01-01, the Date32 representation.
pub fn to_date32(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_iso_and_slashed_dates() {
        let want = NaiveDate::from_ymd_opt(2021, 1, 2);
        assert_eq!(parse_calendar_date("2021-01-02"), want);
        assert_eq!(parse_calendar_date(" 2021/01/02 "), want);
        assert_eq!(parse_calendar_date("2021-01-02T13:45:00Z"), want);
        assert_eq!(parse_calendar_date("2021-01-02 00:00:00"), want);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("2021-13-01"), None);
        assert_eq!(parse_calendar_date("2021-01/02"), None);
        assert_eq!(parse_calendar_date("02-01-2021"), None);
        assert_eq!(parse_calendar_date("2021-01-02x"), None);
        assert_eq!(parse_calendar_date("2021-01-0é"), None);
    }

    #[test]
    fn rejects_signed_components() {
        assert_eq!(parse_calendar_date("2021-+1-+1"), None);
        assert_eq!(parse_calendar_date("+021-01-01"), None);
        assert_eq!(parse_calendar_date("2021- 1-01"), None);
    }

    #[test]
    fn date32_counts_days_from_epoch() {
        assert_eq!(to_date32(epoch()), 0);
        let d = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(to_date32(d), 18628);
    }
}

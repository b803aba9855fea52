//! RFC 1123 dates as used by `Last-Modified` and `If-Modified-Since`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

const RFC1123_STAMP: &str = "%a, %d %b %Y %H:%M:%S";
/// What follows the `Day, ` prefix.
const RFC1123_DATE_TIME: &str = "%d %b %Y %H:%M:%S";
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Formats `t` in RFC 1123 form, converted to GMT.
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use revalidate::http::date::format_http_date;
/// let t = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
/// assert_eq!(format_http_date(&t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    format!("{} GMT", t.with_timezone(&Utc).format(RFC1123_STAMP))
}

/// Parses an RFC 1123 date whose zone is `GMT`, `UTC` or `UT`.
///
/// The weekday must be a valid abbreviation but need not agree with the date.
pub fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    let (weekday, rest) = s.trim().split_once(", ")?;
    if !WEEKDAYS.contains(&weekday) {
        return None;
    }

    let (stamp, zone) = rest.rsplit_once(' ')?;
    if !matches!(zone, "GMT" | "UTC" | "UT") {
        return None;
    }

    NaiveDateTime::parse_from_str(stamp, RFC1123_DATE_TIME)
        .ok()
        .map(|naive| naive.and_utc())
}

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Date layouts a site can pick; the time part is always `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
    DayMonthYearSlash,
    MonthDayYearSlash,
    DayMonthYearDot,
}

impl DateFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dd-mm-yyyy" => Some(Self::DayMonthYear),
            "mm-dd-yyyy" => Some(Self::MonthDayYear),
            "yyyy-mm-dd" => Some(Self::YearMonthDay),
            "dd/mm/yyyy" => Some(Self::DayMonthYearSlash),
            "mm/dd/yyyy" => Some(Self::MonthDayYearSlash),
            "dd.mm.yyyy" => Some(Self::DayMonthYearDot),
            _ => None,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::DayMonthYear => "%d-%m-%Y %H:%M:%S",
            Self::MonthDayYear => "%m-%d-%Y %H:%M:%S",
            Self::YearMonthDay => "%Y-%m-%d %H:%M:%S",
            Self::DayMonthYearSlash => "%d/%m/%Y %H:%M:%S",
            Self::MonthDayYearSlash => "%m/%d/%Y %H:%M:%S",
            Self::DayMonthYearDot => "%d.%m.%Y %H:%M:%S",
        }
    }
}

/// Renders UTC timestamps in a site's zone and date layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreationFormatter {
    tz: Tz,
    date_format: DateFormat,
}

impl Default for CreationFormatter {
    fn default() -> Self {
        Self::new(Tz::UTC, DateFormat::default())
    }
}

impl CreationFormatter {
    pub fn new(tz: Tz, date_format: DateFormat) -> Self {
        Self { tz, date_format }
    }

    /// Unknown zone names and layouts fall back to UTC / `dd-mm-yyyy`.
    pub fn from_settings(time_zone: Option<&str>, date_format: Option<&str>) -> Self {
        let tz = match time_zone.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(time_zone = %name, "unknown time zone; using UTC");
                Tz::UTC
            }),
            None => Tz::UTC,
        };

        let date_format = match date_format.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => DateFormat::parse(raw).unwrap_or_else(|| {
                tracing::warn!(date_format = %raw, "unknown date format; using dd-mm-yyyy");
                DateFormat::default()
            }),
            None => DateFormat::default(),
        };

        Self::new(tz, date_format)
    }

    pub fn format(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz)
            .format(self.date_format.pattern())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 22, 15, 7).unwrap()
    }

    #[test]
    fn defaults_to_utc_day_first() {
        assert_eq!(CreationFormatter::default().format(at()), "01-03-2024 22:15:07");
    }

    #[test]
    fn converts_into_site_zone() {
        let f = CreationFormatter::from_settings(Some("Asia/Kolkata"), Some("yyyy-mm-dd"));
        assert_eq!(f.format(at()), "2024-03-02 03:45:07");
    }

    #[test]
    fn each_layout() {
        let cases = [
            ("mm-dd-yyyy", "03-01-2024 22:15:07"),
            ("dd/mm/yyyy", "01/03/2024 22:15:07"),
            ("mm/dd/yyyy", "03/01/2024 22:15:07"),
            ("dd.mm.yyyy", "01.03.2024 22:15:07"),
        ];
        for (layout, expected) in cases {
            let f = CreationFormatter::from_settings(None, Some(layout));
            assert_eq!(f.format(at()), expected, "{layout}");
        }
    }

    #[test]
    fn garbage_settings_fall_back() {
        let f = CreationFormatter::from_settings(Some("Mars/Olympus"), Some("yy"));
        assert_eq!(f, CreationFormatter::default());
    }
}

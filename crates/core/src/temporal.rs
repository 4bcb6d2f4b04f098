use crate::Error;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// A parsed temporal filter.
///
/// The wire form is either a single instant or a `start/end` interval where
/// `..` (or an empty string) opens a bound. An interval with both bounds open
/// is rejected.
///
/// # Examples
///
/// ```
/// use ogcfeat::TemporalFilter;
///
/// let filter = TemporalFilter::parse("2023-01-01T00:00:00Z/..").unwrap();
/// assert_eq!(
///     filter,
///     TemporalFilter::Range {
///         start: Some("2023-01-01T00:00:00Z".to_string()),
///         end: None,
///     }
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemporalFilter {
    /// A single instant, matched by equality.
    Instant(String),

    /// An interval with optional bounds.
    Range {
        /// The inclusive lower bound, or `None` when open.
        start: Option<String>,

        /// The inclusive upper bound, or `None` when open.
        end: Option<String>,
    },
}

impl TemporalFilter {
    /// Parses a datetime parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogcfeat::TemporalFilter;
    ///
    /// let instant = TemporalFilter::parse("2023-06-01T00:00:00Z").unwrap();
    /// let range = TemporalFilter::parse("2023-01-01/2023-12-31").unwrap();
    /// TemporalFilter::parse("../..").unwrap_err();
    /// ```
    pub fn parse(datetime: &str) -> Result<TemporalFilter, Error> {
        if let Some((start, end)) = datetime.split_once('/') {
            let start = parse_bound(start)?;
            let end = parse_bound(end)?;
            match (&start, &end) {
                (None, None) => return Err(Error::EmptyDatetimeInterval),
                (Some(start_value), Some(end_value)) => {
                    if let (Some(start_instant), Some(end_instant)) =
                        (as_instant(start_value), as_instant(end_value))
                    {
                        if end_instant < start_instant {
                            return Err(Error::StartIsAfterEnd(
                                start_value.clone(),
                                end_value.clone(),
                            ));
                        }
                    }
                }
                _ => {}
            }
            Ok(TemporalFilter::Range { start, end })
        } else if as_instant(datetime).is_some() {
            Ok(TemporalFilter::Instant(datetime.to_string()))
        } else {
            Err(Error::InvalidDatetime(datetime.to_string()))
        }
    }
}

fn parse_bound(s: &str) -> Result<Option<String>, Error> {
    if s.is_empty() || s == ".." {
        Ok(None)
    } else if as_instant(s).is_some() {
        Ok(Some(s.to_string()))
    } else {
        Err(Error::InvalidDatetime(s.to_string()))
    }
}

fn as_instant(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
        Some(
            Utc.from_utc_datetime(&date.and_time(midnight))
                .fixed_offset(),
        )
    })
}

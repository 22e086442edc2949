use jiff::{
    Zoned, civil,
    fmt::strtime::BrokenDownTime,
    tz::TimeZone,
};

/// The date used when a layout carries no date at all (the bare clock time
/// layouts). This matches the reference date that `Date`-formatter style
/// parsers resolve time-only strings against, and keeps parsing independent
/// of the clock: the same input always yields the same instant.
const DEFAULT_DATE: civil::Date = civil::date(2000, 1, 1);

/// Resolve a parsed `BrokenDownTime` into an absolute instant.
///
/// A layout doesn't necessarily pin down every component, so the gaps are
/// filled with fixed defaults before conversion: a week date without a
/// weekday resolves to the Monday of that week, a missing month or day
/// resolves to the first, and a missing date entirely resolves to
/// `DEFAULT_DATE`. A missing time-of-day is handled by Jiff itself, which
/// defaults it to midnight.
///
/// `zulu` is set when the input carried a trailing `Z` rather than a
/// numeric offset. Jiff's numeric offset directives don't consume `Z`, so
/// the decomposer matches it as a literal and tells us about it here.
pub(crate) fn to_zoned(
    mut tm: BrokenDownTime,
    zulu: bool,
) -> Result<Zoned, jiff::Error> {
    if tm.iso_week_year().is_some() {
        if tm.weekday().is_none() {
            tm.set_weekday(Some(civil::Weekday::Monday));
        }
    } else if tm.year().is_some() {
        if tm.day_of_year().is_none() {
            if tm.month().is_none() {
                tm.set_month(Some(1))?;
            }
            if tm.day().is_none() {
                tm.set_day(Some(1))?;
            }
        }
    } else {
        tm.set_year(Some(DEFAULT_DATE.year()))?;
        tm.set_month(Some(DEFAULT_DATE.month()))?;
        tm.set_day(Some(DEFAULT_DATE.day()))?;
    }
    let dt = tm.to_datetime()?;
    let tz = match tm.offset() {
        Some(offset) => TimeZone::fixed(offset),
        None if zulu => TimeZone::UTC,
        None => TimeZone::system(),
    };
    dt.to_zoned(tz)
}

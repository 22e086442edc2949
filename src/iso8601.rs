use std::sync::LazyLock;

use {jiff::Zoned, regex::Regex};

use crate::{Failure, resolve};

/// The top-level shape of an "extended" ISO 8601 datetime: a calendar part
/// with dash-separated year/week/ordinal forms, an optional `T`-or-space
/// separator followed by a colon-separated time, and an optional offset.
///
/// This is anchored at the start only. It may match a prefix of the input;
/// the strict parse of the full input against the composed layout is the
/// final gate, so trailing garbage still fails.
static EXTENDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        ^\s*
        (?<date>
            (?:[+-][0-9]{6}|[0-9]{4})
            -
            (?:[0-9]{2}-[0-9]{2}|W[0-9]{2}-[0-9]|W[0-9]{2}|[0-9]{3}|[0-9]{2})
        )
        (?:
            (?<sep>T|\x20)
            (?<time>
                [0-9]{2}
                (?::[0-9]{2}(?::[0-9]{2}(?:[.,][0-9]+)?)?)?
            )
            (?<offset>[+-][0-9]{2}(?::?[0-9]{2})?|\s*Z)?
        )?
        "#,
    )
    .unwrap()
});

/// The "basic" (separator-free) counterpart of `EXTENDED`. The calendar
/// part permits an empty tail so that a bare four-digit year matches.
static BASIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        ^\s*
        (?<date>
            (?:[+-][0-9]{6}|[0-9]{4})
            (?:[0-9]{4}|W[0-9]{3}|W[0-9]{2}|[0-9]{3}|[0-9]{2}|)
        )
        (?:
            (?<sep>T|\x20)
            (?<time>
                [0-9]{2}
                (?::[0-9]{2}(?::[0-9]{2}(?:[.,][0-9]+)?)?)?
            )
            (?<offset>[+-][0-9]{2}(?::?[0-9]{2})?|\s*Z)?
        )?
        "#,
    )
    .unwrap()
});

/// Calendar sub-formats, most specific first.
///
/// The recognizer order is a contract. In particular, the ordinal-day
/// recognizer accepts one to three digits and therefore shadows the
/// year-month one: `2023-09` resolves as day-of-year nine, not September.
/// That quirk is reference behavior and is preserved deliberately.
static CALENDAR_FORMATS: &[(&str, &str)] = &[
    ("%Y-%m-%d", r"^[0-9]{4}-[0-9]{2}-[0-9]{2}"),
    ("%G-W%V-%u", r"^[0-9]{4}-W[0-9]{2}-[0-9]"),
    ("%G-W%V", r"^[0-9]{4}-W[0-9]{2}"),
    ("%Y-%j", r"^[0-9]{4}-[0-9]{1,3}"),
    ("%Y-%m", r"^[0-9]{4}-[0-9]{2}"),
    ("%Y%m%d", r"^[0-9]{8}"),
    ("%GW%V%u", r"^[0-9]{4}W[0-9]{3}"),
    ("%GW%V", r"^[0-9]{4}W[0-9]{2}"),
    ("%Y%j", r"^[0-9]{7}"),
    ("%Y%m", r"^[0-9]{6}"),
    ("%Y", r"^[0-9]{4}"),
];

/// Time sub-formats, most specific first: fractional seconds with `.` then
/// with `,`, whole seconds, minute precision, the same four in compact
/// form, then hour-only.
static TIME_FORMATS: &[(&str, &str)] = &[
    ("%H:%M:%S.%f", r"^[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+"),
    ("%H:%M:%S,%f", r"^[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]+"),
    ("%H:%M:%S", r"^[0-9]{2}:[0-9]{2}:[0-9]{2}"),
    ("%H:%M", r"^[0-9]{2}:[0-9]{2}"),
    ("%H%M%S.%f", r"^[0-9]{6}\.[0-9]+"),
    ("%H%M%S,%f", r"^[0-9]{6},[0-9]+"),
    ("%H%M%S", r"^[0-9]{6}"),
    ("%H%M", r"^[0-9]{4}"),
    ("%H", r"^[0-9]{2}"),
];

static CALENDAR: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| compile(CALENDAR_FORMATS));
static TIME: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| compile(TIME_FORMATS));

fn compile(table: &[(&'static str, &str)]) -> Vec<(&'static str, Regex)> {
    table
        .iter()
        .map(|&(layout, pattern)| (layout, Regex::new(pattern).unwrap()))
        .collect()
}

/// Attempt to parse `input` as an ISO 8601 datetime.
///
/// The input is decomposed structurally, each captured piece is mapped to a
/// layout fragment, and the concatenated layout gets exactly one strict
/// parse attempt against the full input. There is no backtracking to a
/// different sub-format combination: if the strict parse rejects, the whole
/// stage fails.
pub(crate) fn parse(input: &str) -> Result<Zoned, Failure> {
    let caps = EXTENDED
        .captures(input)
        .or_else(|| BASIC.captures(input))
        .ok_or(Failure::NoMatch)?;
    let Some(date) = caps.name("date") else {
        return Err(Failure::NoMatch);
    };
    let Some(&(date_layout, _)) =
        CALENDAR.iter().find(|(_, re)| re.is_match(date.as_str()))
    else {
        // The top-level grammar accepted a calendar fragment that no
        // sub-format recognizes. Treated as a parse failure, not a bug.
        return Err(Failure::NoMatch);
    };

    let mut layout = String::from(date_layout);
    if let Some(time) = caps.name("time") {
        let Some(&(time_layout, _)) =
            TIME.iter().find(|(_, re)| re.is_match(time.as_str()))
        else {
            return Err(Failure::NoMatch);
        };
        if let Some(sep) = caps.name("sep") {
            // `T` and space are ordinary literals in a layout, so the
            // separator is carried over verbatim.
            layout.push_str(sep.as_str());
        }
        layout.push_str(time_layout);
    }

    let mut zulu = false;
    if let Some(offset) = caps.name("offset") {
        match offset_layout(offset.as_str()) {
            OffsetLayout::Zulu => {
                // Jiff's numeric offset directives don't consume `Z`, so
                // it goes into the layout verbatim as a literal and the
                // resolver pins the result to UTC.
                layout.push_str(offset.as_str());
                zulu = true;
            }
            OffsetLayout::Numeric(directive) => layout.push_str(directive),
        }
    }

    log::trace!("composed ISO 8601 layout {layout:?} for input {input:?}");
    let tm = jiff::fmt::strtime::parse(&layout, input).map_err(|err| {
        log::trace!("strict parse of {input:?} against {layout:?}: {err}");
        Failure::FormatMismatch
    })?;
    resolve::to_zoned(tm, zulu).map_err(|err| {
        log::trace!("could not resolve {input:?} to an instant: {err}");
        Failure::FormatMismatch
    })
}

enum OffsetLayout {
    Zulu,
    Numeric(&'static str),
}

/// Pick the offset directive matching the shape of the captured offset:
/// `±HH:MM` needs the colon form, a bare `±HH` the hour-only form and
/// `±HHMM` the colon-free form.
fn offset_layout(offset: &str) -> OffsetLayout {
    if offset.trim_start() == "Z" {
        OffsetLayout::Zulu
    } else if offset.contains(':') {
        OffsetLayout::Numeric("%:z")
    } else if offset.len() == 3 {
        OffsetLayout::Numeric("%:::z")
    } else {
        OffsetLayout::Numeric("%z")
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil, tz};

    use super::*;

    #[test]
    fn extended_date_time_offset() {
        let zdt = parse("2023-09-13T01:08:10Z").unwrap();
        assert_eq!(zdt.datetime(), civil::date(2023, 9, 13).at(1, 8, 10, 0));
        assert_eq!(zdt.offset(), tz::Offset::UTC);

        let zdt = parse("2023-09-13T01:08:10.123+02:00").unwrap();
        assert_eq!(
            zdt.datetime(),
            civil::date(2023, 9, 13).at(1, 8, 10, 123_000_000),
        );
        assert_eq!(zdt.offset(), tz::offset(2));

        // Comma is a legal fraction separator.
        let zdt = parse("2023-09-13T01:08:10,123-0930").unwrap();
        assert_eq!(
            zdt.datetime(),
            civil::date(2023, 9, 13).at(1, 8, 10, 123_000_000),
        );
        assert_eq!(zdt.offset(), tz::Offset::from_seconds(-34200).unwrap());

        // Hour-only offsets are legal too.
        let zdt = parse("2023-09-13T01:08:10+05").unwrap();
        assert_eq!(zdt.offset(), tz::offset(5));
    }

    #[test]
    fn space_separator() {
        let zdt = parse("2023-09-13 01:08:10").unwrap();
        assert_eq!(zdt.datetime(), civil::date(2023, 9, 13).at(1, 8, 10, 0));

        // A space is also permitted before the `Z`.
        let zdt = parse("2023-09-13 01:08:10 Z").unwrap();
        assert_eq!(zdt.offset(), tz::Offset::UTC);
    }

    #[test]
    fn week_dates() {
        let zdt = parse("2023-W37-3").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 13));

        let zdt = parse("2023-W37").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 11));

        let zdt = parse("2023W373").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 13));

        let zdt = parse("2023W37").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 11));
    }

    #[test]
    fn ordinal_dates() {
        let zdt = parse("2023-256").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 13));

        let zdt = parse("2023256").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 13));

        // The ordinal recognizer shadows year-month: two digits after the
        // dash are a day-of-year, not a month.
        let zdt = parse("2023-09").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 1, 9));
    }

    #[test]
    fn reduced_precision() {
        let zdt = parse("2023").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 1, 1));

        let zdt = parse("202309").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 1));

        let zdt = parse("20230913").unwrap();
        assert_eq!(zdt.date(), civil::date(2023, 9, 13));

        let zdt = parse("20230913T0108").unwrap();
        assert_eq!(zdt.datetime(), civil::date(2023, 9, 13).at(1, 8, 0, 0));

        let zdt = parse("2023-09-13T01").unwrap();
        assert_eq!(zdt.datetime(), civil::date(2023, 9, 13).at(1, 0, 0, 0));
    }

    /// A structural match with out-of-range values is a format mismatch,
    /// and there is no backtracking to a different sub-format.
    #[test]
    fn structural_match_strict_reject() {
        assert_eq!(parse("2023-02-30"), Err(Failure::FormatMismatch));
        assert_eq!(parse("2023-09-13T25:00:00"), Err(Failure::FormatMismatch));
        // Trailing garbage survives the prefix match but not the strict
        // parse of the full input.
        assert_eq!(
            parse("2023-09-13 and then some"),
            Err(Failure::FormatMismatch),
        );
    }

    #[test]
    fn no_match() {
        assert_eq!(parse(""), Err(Failure::NoMatch));
        assert_eq!(parse("not a date"), Err(Failure::NoMatch));
        assert_eq!(parse("Sat Aug 13 2022"), Err(Failure::NoMatch));
    }
}

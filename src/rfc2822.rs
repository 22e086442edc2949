use std::sync::LazyLock;

use {
    jiff::{Zoned, fmt::rfc2822},
    regex::Regex,
};

use crate::Failure;

/// The shape of an RFC 2822 datetime, e.g.,
/// `Sat, 13 Aug 2022 12:53:29 -0400`.
///
/// The weekday is optional, the year may have two digits and the zone may
/// be one of the obsolete names the RFC grandfathers in. This is only a
/// shape check; false positives are filtered out by the strict parse.
static RFC2822: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        ^
        (?:(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun),?\x20)?
        [0-9]{1,2}
        \x20
        (?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)
        \x20
        [0-9]{2,4}
        \x20
        [0-9]{2}:[0-9]{2}(?::[0-9]{2})?
        \x20
        (?:UT|GMT|[ECMP][SD]T|[Zz]|[+-][0-9]{4})
        $
        "#,
    )
    .unwrap()
});

static PARSER: rfc2822::DateTimeParser = rfc2822::DateTimeParser::new();

/// Attempt to parse `input` as an RFC 2822 datetime.
///
/// The obsolete zone names (`UT`, `GMT`, `EST` and friends) are handled by
/// Jiff's parser, so there is no hand-rolled offset table here.
pub(crate) fn parse(input: &str) -> Result<Zoned, Failure> {
    if !RFC2822.is_match(input) {
        return Err(Failure::NoMatch);
    }
    PARSER.parse_zoned(input).map_err(|err| {
        log::trace!("RFC 2822 parse of {input:?}: {err}");
        Failure::FormatMismatch
    })
}

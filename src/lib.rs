/*!
A best-effort parser for date/time strings of unknown format.

Give [`parse_date`] a string and it will try to figure out which calendar
date and time-of-day the string denotes, without a format hint from the
caller. It targets the formats commonly produced by web APIs, log files and
JavaScript's default date stringification, plus ISO 8601 in its many
permitted variants.

Parsing works by trying a fixed sequence of recognizers, in order, and
returning the first successful parse:

1. An ISO 8601 decomposer. The input is matched against a structural
   pattern, split into calendar/time/offset pieces, and each piece is mapped
   to a concrete `strftime`-style layout. The composed layout gets exactly
   one strict parse attempt.
2. An RFC 2822 recognizer, e.g., `Sat, 13 Aug 2022 12:53:29 -0400`.
3. A priority-ordered table of fixed layouts, each guarded by a cheap length
   check so that obviously-incompatible candidates are skipped before paying
   for a full parse attempt.

Failure is a normal, expected outcome and is reported as `None`. No
distinction is made between "nothing resembling a date" and "looked like a
date but had invalid values"; callers needing diagnostics should reach for a
stricter parser of their own choosing.

# Example

```
use datesniff::parse_date;

let zdt = parse_date("2023-09-13T01:08:10Z").unwrap();
assert_eq!(zdt.to_string(), "2023-09-13T01:08:10+00:00[UTC]");

assert_eq!(parse_date("not a date"), None);
```

# Time zones

A parsed numeric offset (or a trailing `Z`) pins the result to that offset.
When the input carries no offset at all, the result is interpreted as a
local time in the system's configured time zone, which may be overridden
with the `TZ` environment variable.

Inputs that carry only part of a datetime are filled in with fixed defaults:
a missing time-of-day is midnight, a missing day (or month) is the first of
the month (or year), a week date without a weekday resolves to the Monday of
that week, and a bare clock time like `13:45` lands on `2000-01-01`. The
defaults are deterministic on purpose: parsing never consults a clock.
*/

use jiff::Zoned;

mod fallback;
mod iso8601;
mod resolve;
mod rfc2822;

/// The recognizer stages, in the order they are attempted.
///
/// Order is part of the contract: the first stage to produce a datetime
/// wins, and later stages never see the input.
static STAGES: &[(&str, fn(&str) -> Result<Zoned, Failure>)] = &[
    ("iso8601", iso8601::parse),
    ("rfc2822", rfc2822::parse),
    ("fallback", fallback::parse),
];

/// Parse a date/time string of unknown format.
///
/// This attempts ISO 8601 decomposition first, then RFC 2822, then a
/// priority-ordered list of fallback layouts, and returns the first
/// successful parse. `None` means no recognizer accepted the input. This
/// never panics, no matter how malformed the input is.
///
/// # Example
///
/// ```
/// use datesniff::parse_date;
///
/// let zdt = parse_date("Sat Aug 13 2022 13:12:43 GMT-0900 (EDT)").unwrap();
/// assert_eq!(zdt.to_string(), "2022-08-13T13:12:43-09:00[-09:00]");
/// ```
pub fn parse_date(input: &str) -> Option<Zoned> {
    for &(stage, attempt) in STAGES {
        match attempt(input) {
            Ok(zdt) => {
                log::trace!("stage {stage} parsed {input:?} as {zdt}");
                return Some(zdt);
            }
            Err(failure) => {
                log::trace!("stage {stage} failed on {input:?}: {failure}");
            }
        }
    }
    None
}

/// An extension trait for sniffing datetimes out of strings.
///
/// This is sugar for [`parse_date`]:
///
/// ```
/// use datesniff::SniffDate;
///
/// let zdt = "2023-W37-3".sniff_date().unwrap();
/// assert_eq!(zdt.date(), jiff::civil::date(2023, 9, 13));
/// ```
pub trait SniffDate {
    // This would be more naturally named `as_str()`, but that creates
    // conflicts with other `as_str()` methods.
    fn as_sniff_input(&self) -> &str;

    /// Best-effort parse of this string as a datetime.
    fn sniff_date(&self) -> Option<Zoned> {
        parse_date(self.as_sniff_input())
    }
}

impl SniffDate for str {
    fn as_sniff_input(&self) -> &str {
        self
    }
}

impl SniffDate for String {
    fn as_sniff_input(&self) -> &str {
        self
    }
}

/// Why a recognizer stage did not produce a datetime.
///
/// The distinction is deliberately not part of the public API. Both cases
/// collapse to `None` in `parse_date`; this exists so that trace logs (and
/// tests) can tell a shape rejection apart from a value rejection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Failure {
    /// The input's top-level structure resembles nothing the stage knows.
    NoMatch,
    /// The input structurally resembled a known layout, but the strict
    /// parse rejected it, e.g., a month of `13` or a malformed offset.
    FormatMismatch,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Failure::NoMatch => write!(f, "no recognized structure"),
            Failure::FormatMismatch => {
                write!(f, "structural match rejected by strict parse")
            }
        }
    }
}

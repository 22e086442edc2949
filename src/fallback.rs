use std::{borrow::Cow, ops::RangeInclusive, sync::LazyLock};

use jiff::{Zoned, fmt::strtime};

use crate::{Failure, resolve};

/// A single fallback candidate: a concrete layout plus the range of input
/// lengths the layout can possibly render to.
///
/// The length check is a cheap necessary-but-not-sufficient filter. It
/// exists purely to skip obviously-incompatible candidates before paying
/// for a full strict-parse attempt; acceptance guarantees nothing, and the
/// matcher falls through to the next candidate when the strict parse
/// rejects anyway.
#[derive(Clone, Debug)]
pub(crate) struct Candidate {
    layout: &'static str,
    len: RangeInclusive<usize>,
}

impl Candidate {
    fn new(layout: &'static str, len: RangeInclusive<usize>) -> Candidate {
        Candidate { layout, len }
    }

    fn plausible(&self, input: &str) -> bool {
        self.len.contains(&input.len())
    }
}

/// The fallback layouts in priority order.
///
/// The order is a contract, not an implementation detail: several entries
/// overlap, and a more permissive layout placed earlier would shadow a more
/// specific one and silently change parse results. Near-duplicate entries
/// (one- versus two-digit days and months) are preserved in their given
/// order even where flexible digit parsing makes them behaviorally
/// identical.
pub(crate) static FORMATS: LazyLock<Vec<Candidate>> = LazyLock::new(|| {
    vec![
        // JavaScript's default date stringification, e.g.,
        // `Sat Aug 13 2022 12:53:29 GMT-0400 (EDT)` once the noise
        // has been stripped.
        Candidate::new("%a %b %e %Y %H:%M:%S %z", 29..=30),
        Candidate::new("%a %b %d %Y %H:%M:%S %z", 30..=30),
        Candidate::new("%a %b %e %Y %H:%M:%S", 23..=24),
        Candidate::new("%a %b %d %Y %H:%M:%S", 24..=24),
        // The default rendering of datetime values in several languages,
        // e.g., `2023-09-13 01:08:10 +0000`.
        Candidate::new("%Y-%m-%d %H:%M:%S %z", 25..=26),
        // Slash dates with a clock time.
        Candidate::new("%m/%d/%Y %H:%M:%S", 17..=19),
        Candidate::new("%m/%d/%Y %I:%M %p", 16..=19),
        Candidate::new("%m/%d/%Y %I:%M%p", 15..=18),
        Candidate::new("%m/%d/%Y %I:%M %p", 16..=19),
        Candidate::new("%m/%d/%Y %I:%M%p", 15..=18),
        // Long month names.
        Candidate::new("%B %d, %Y", 12..=18),
        Candidate::new("%B %e, %Y %I:%M %p", 19..=27),
        Candidate::new("%B %e, %Y %I:%M%p", 18..=26),
        Candidate::new("%B %e, %Y", 11..=18),
        // Abbreviated month names.
        Candidate::new("%b %d, %Y", 11..=12),
        Candidate::new("%b %e, %Y, %I:%M %p", 20..=22),
        Candidate::new("%b %e, %Y, %I:%M%p", 19..=21),
        Candidate::new("%b %e, %Y", 11..=12),
        // Dash dates, month first.
        Candidate::new("%m-%d-%y", 6..=8),
        Candidate::new("%m-%d-%y", 6..=8),
        Candidate::new("%m-%d-%Y", 8..=10),
        Candidate::new("%m-%d-%Y", 8..=10),
        // Dash and slash dates, year first.
        Candidate::new("%Y-%m-%d", 8..=10),
        Candidate::new("%Y/%m/%d", 8..=10),
        // Slash dates, month first.
        Candidate::new("%m/%d/%Y", 8..=10),
        Candidate::new("%m/%d/%Y", 8..=10),
        Candidate::new("%m/%d/%y", 6..=8),
        Candidate::new("%m/%d/%y", 6..=8),
        // Bare clock times.
        Candidate::new("%I:%M %p", 7..=8),
        Candidate::new("%H:%M", 4..=5),
    ]
});

/// Strip the noise JavaScript's default date stringification adds after
/// the numeric offset, e.g., `Sat Aug 13 2022 13:12:43 GMT-0900 (EDT)`:
/// every `GMT` token is removed and the string is truncated at the first
/// `(`. The truncation leaves a dangling space behind, which a strict
/// parser will not tolerate, so trailing whitespace goes with it.
fn strip_noise(input: &str) -> Cow<'_, str> {
    if !input.contains("GMT") {
        return Cow::Borrowed(input);
    }
    let mut cleaned = input.replace("GMT", "");
    if let Some(at) = cleaned.find('(') {
        cleaned.truncate(at);
    }
    cleaned.truncate(cleaned.trim_end().len());
    Cow::Owned(cleaned)
}

/// Attempt to parse `input` against the fallback table, in priority order.
///
/// The first candidate whose length filter accepts the input and whose
/// strict parse succeeds wins. A candidate that passes the filter but fails
/// the parse simply falls through to the next one.
pub(crate) fn parse(input: &str) -> Result<Zoned, Failure> {
    let input = strip_noise(input);
    for candidate in FORMATS.iter() {
        if !candidate.plausible(&input) {
            continue;
        }
        let tm = match strtime::parse(candidate.layout, input.as_bytes()) {
            Ok(tm) => tm,
            Err(err) => {
                log::trace!(
                    "fallback layout {:?} rejected {input:?}: {err}",
                    candidate.layout,
                );
                continue;
            }
        };
        match resolve::to_zoned(tm, false) {
            Ok(zdt) => return Ok(zdt),
            Err(err) => {
                log::trace!(
                    "fallback layout {:?} matched {input:?} but did not \
                     resolve: {err}",
                    candidate.layout,
                );
            }
        }
    }
    Err(Failure::NoMatch)
}

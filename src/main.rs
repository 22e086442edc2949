use std::{env, io::Write, process::ExitCode};

use bstr::{ByteSlice, io::BufReadExt};

use datesniff::parse_date;

mod logger;

const USAGE: &str = r#"
Sniff out the datetime denoted by a string of unknown format.

This accepts one or more strings to parse as positional arguments. When no
positional arguments are given, then line delimited strings are read from
stdin. Every successfully parsed datetime is printed on its own line as an
RFC 9557 timestamp.

Inputs without an offset are interpreted in the system time zone, which may
be overridden via the `TZ` environment variable. To see why an input parsed
the way it did, set `DATESNIFF_LOG=trace`.

USAGE:
    datesniff <string>...
    datesniff < line delimited <string>

OPTIONS:
    -h, --help
        Print this help message.

    -i, --ignore-invalid
        Ignore strings that don't parse as a datetime.

        When enabled, these strings are dropped and parsing continues with
        the next input. To see a message for each dropped string, enable
        logging with `DATESNIFF_LOG=warn`. When disabled, the first string
        that fails to parse stops execution with an error.

EXAMPLES:
    Parse the datetime stringifications of several ecosystems:

        $ datesniff '2023-09-13T01:08:10Z'
        $ datesniff 'Sat Aug 13 2022 12:53:29 GMT-0400 (EDT)'
        $ datesniff '09/13/2023 01:08:10'

    Normalize the timestamps in a file, one per line:

        $ cut -d' ' -f1 access.log | datesniff -i
"#;

fn main() -> ExitCode {
    let err = match run() {
        Ok(code) => return code,
        Err(err) => err,
    };
    // Look for a broken pipe error. In this case, we generally want
    // to exit "gracefully" with a success exit code. This matches
    // existing Unix convention. We need to handle this explicitly
    // since the Rust runtime doesn't ask for PIPE signals, and thus
    // we get an I/O error instead.
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<std::io::Error>() {
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                return ExitCode::from(0);
            }
        }
    }
    if std::env::var("RUST_BACKTRACE").map_or(false, |v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        writeln!(&mut std::io::stderr(), "{:?}", err).unwrap();
    } else {
        writeln!(&mut std::io::stderr(), "{:#}", err).unwrap();
    }
    ExitCode::from(1)
}

fn run() -> anyhow::Result<ExitCode> {
    let rustlog = env::var("DATESNIFF_LOG").unwrap_or_else(|_| String::new());
    let level = match &*rustlog {
        "" | "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        unk => anyhow::bail!("unrecognized log level '{}'", unk),
    };
    log::set_max_level(level);
    logger::Logger::init()?;

    let config = Config::parse(&mut lexopt::Parser::from_env())?;
    if config.help {
        writeln!(&mut std::io::stdout(), "{}", USAGE.trim())?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut wtr = std::io::stdout().lock();
    if config.inputs.is_empty() {
        let mut rdr = std::io::stdin().lock();
        rdr.for_byte_line(|line| {
            let line = match line.to_str() {
                Ok(line) => line.trim(),
                Err(err) => return Err(std::io::Error::other(err)),
            };
            sniff(&mut wtr, line, config.ignore_invalid)
                .map_err(std::io::Error::other)?;
            Ok(true)
        })?;
    } else {
        for input in config.inputs.iter() {
            sniff(&mut wtr, input, config.ignore_invalid)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse one input and print the result, or report an unparseable input
/// as configured. Empty inputs (e.g., blank lines) are passed over quietly.
fn sniff(
    mut wtr: impl Write,
    input: &str,
    ignore_invalid: bool,
) -> anyhow::Result<()> {
    if input.is_empty() {
        return Ok(());
    }
    match parse_date(input) {
        Some(zdt) => writeln!(wtr, "{zdt}")?,
        None if ignore_invalid => {
            log::warn!("could not parse {input:?} as a datetime");
        }
        None => anyhow::bail!("could not parse {input:?} as a datetime"),
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    help: bool,
    ignore_invalid: bool,
    inputs: Vec<String>,
}

impl Config {
    fn parse(p: &mut lexopt::Parser) -> anyhow::Result<Config> {
        let mut config = Config::default();
        while let Some(arg) = p.next()? {
            match arg {
                lexopt::Arg::Short('h') | lexopt::Arg::Long("help") => {
                    config.help = true;
                }
                lexopt::Arg::Short('i')
                | lexopt::Arg::Long("ignore-invalid") => {
                    config.ignore_invalid = true;
                }
                lexopt::Arg::Value(value) => {
                    let value = value.into_string().map_err(|value| {
                        anyhow::anyhow!("argument {value:?} is not valid UTF-8")
                    })?;
                    config.inputs.push(value);
                }
                arg => return Err(arg.unexpected().into()),
            }
        }
        Ok(config)
    }
}

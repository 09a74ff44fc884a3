mod error;
mod math;
mod parser;

use anyhow::{Context, Result};
use clap::{value_t, App, AppSettings, Arg, ArgMatches};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::math::{compute, StatisticMode, StatisticOptions};
use crate::parser::parse_numbers;

const USAGE: &str = "Usage: simple-stats <mode> <numbers_or_file_path> [--file]";

/// Exit code for invocations that could not be started (bad usage, missing input file)
const EXIT_USAGE: i32 = 2;

fn build_app() -> App<'static, 'static> {
    App::new("simple-stats")
        .version("1.0")
        .author("Pascal Bormann")
        .about("Computes the mean, median or standard deviation of a list of numbers")
        // Negative numbers must not be mistaken for flags
        .setting(AppSettings::AllowLeadingHyphen)
        .arg(
            Arg::with_name("mode")
                .value_name("MODE")
                .help("The statistic to compute: mean, median or std")
                .index(1),
        )
        .arg(
            Arg::with_name("input")
                .value_name("NUMBERS_OR_FILE")
                .help("Numbers separated by commas, tabs or spaces, or a file path if --file is given")
                .index(2),
        )
        .arg(
            Arg::with_name("rest")
                .index(3)
                .multiple(true)
                .hidden(true),
        )
        .arg(
            Arg::with_name("file")
                .long("file")
                .help("Read the numbers from the first line of the file at NUMBERS_OR_FILE"),
        )
        .arg(
            Arg::with_name("digits")
                .long("digits")
                .value_name("N")
                .help("Number of decimal digits to round the result to [default: 2]")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("allow-negative")
                .long("allow-negative")
                .help("Accept negative numbers in the input"),
        )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn options_from_matches(matches: &ArgMatches) -> StatisticOptions {
    let mut options = StatisticOptions::default();
    if matches.is_present("digits") {
        let digits = value_t!(matches, "digits", u32).unwrap_or_else(|e| e.exit());
        options = options.with_round_digits(digits);
    }
    options.with_allow_negative(matches.is_present("allow-negative"))
}

fn read_first_line(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(line)
}

fn format_result(result: Option<f64>) -> String {
    match result {
        Some(value) if value.is_nan() => "nan".to_owned(),
        // Debug formatting always keeps a fractional part, e.g. `2.0`
        Some(value) => format!("{:?}", value),
        None => "None".to_owned(),
    }
}

/// Runs the command described by `matches`, returning the process exit code
fn run(matches: &ArgMatches) -> Result<i32> {
    let (mode, input) = match (matches.value_of("mode"), matches.value_of("input")) {
        (Some(mode), Some(input)) => (mode, input),
        _ => {
            println!("{}", USAGE);
            return Ok(EXIT_USAGE);
        }
    };

    let text = if matches.is_present("file") {
        let path = Path::new(input);
        if !path.exists() {
            println!("file not found:{}", input);
            return Ok(EXIT_USAGE);
        }
        debug!(path = %path.display(), "reading numbers from file");
        read_first_line(path)?
    } else {
        input.to_owned()
    };

    let mode = mode.parse::<StatisticMode>()?;
    let options = options_from_matches(matches);
    debug!(%mode, ?options, "resolved invocation");

    let numbers = parse_numbers(Some(text.as_str()))?;
    let result = compute(Some(numbers.as_slice()), mode, &options)?;
    println!("{}", format_result(result));
    Ok(0)
}

fn main() -> Result<()> {
    init_logging();
    let matches = build_app().get_matches();
    let exit_code = run(&matches)?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_for(args: &[&str]) -> ArgMatches<'static> {
        build_app()
            .get_matches_from_safe(std::iter::once("simple-stats").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn negative_numbers_are_positional_values() {
        let matches = matches_for(&["mean", "-1,2", "--allow-negative"]);
        assert_eq!(matches.value_of("mode"), Some("mean"));
        assert_eq!(matches.value_of("input"), Some("-1,2"));
        assert!(matches.is_present("allow-negative"));
        assert!(!matches.is_present("file"));
    }

    #[test]
    fn file_flag_after_input() {
        let matches = matches_for(&["median", "nums.txt", "--file"]);
        assert_eq!(matches.value_of("input"), Some("nums.txt"));
        assert!(matches.is_present("file"));
    }

    #[test]
    fn options_default_and_override() {
        let options = options_from_matches(&matches_for(&["mean", "1"]));
        assert_eq!(options, StatisticOptions::default());

        let options = options_from_matches(&matches_for(&[
            "mean",
            "1",
            "--digits",
            "4",
            "--allow-negative",
        ]));
        assert_eq!(options.round_digits(), 4);
        assert!(options.allow_negative());
    }

    #[test]
    fn results_are_printed_with_fraction() {
        assert_eq!(format_result(Some(2.0)), "2.0");
        assert_eq!(format_result(Some(2.5)), "2.5");
        assert_eq!(format_result(Some(0.67)), "0.67");
        assert_eq!(format_result(None), "None");
    }

    #[test]
    fn non_finite_results_are_lowercase() {
        assert_eq!(format_result(Some(f64::NAN)), "nan");
        assert_eq!(format_result(Some(f64::INFINITY)), "inf");
        assert_eq!(format_result(Some(f64::NEG_INFINITY)), "-inf");
    }

    #[test]
    fn reads_only_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"1,2,3\n4,5,6\n").unwrap();
        assert_eq!(read_first_line(file.path()).unwrap(), "1,2,3\n");
    }
}

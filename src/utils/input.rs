// src/utils/input.rs
//! Interactive numeric prompts for the CLI.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

/// Parses `input` as a finite number within `[min, max]`.
pub fn parse_and_validate_float(input: &str, min: f64, max: f64) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }

    let value: f64 = match trimmed.parse() {
        Ok(v) => v,
        Err(_) => bail!("value must be a valid number, got {:?}", trimmed),
    };
    if !value.is_finite() {
        bail!("value must be a finite number");
    }
    if value < min {
        bail!("value must be at least {}", min);
    }
    if value > max {
        bail!("value must be at most {}", max);
    }
    Ok(value)
}

/// Prompts for `name` until a valid value is entered. Running out of input
/// is an error.
pub fn read_float_until_valid<R, W>(
    reader: &mut R,
    writer: &mut W,
    name: &str,
    min: f64,
    max: f64,
) -> Result<f64>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(writer, "Please enter the {}: ", name)?;
        writer.flush()?;

        line.clear();
        let read = reader
            .read_line(&mut line)
            .with_context(|| format!("Failed to read {}", name))?;
        if read == 0 {
            writeln!(writer)?;
            bail!("no more input available while reading {}", name);
        }

        match parse_and_validate_float(&line, min, max) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(writer, "{}. Please try again.", e)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_valid_values() {
        let cases = [
            ("42", 0.0, 100.0, 42.0),
            ("2.75", 0.0, 10.0, 2.75),
            ("-45.5", -90.0, 90.0, -45.5),
            ("-90", -90.0, 90.0, -90.0),
            ("90", -90.0, 90.0, 90.0),
            ("  51.5  ", -90.0, 90.0, 51.5),
            ("0", 0.0, 40_075.0, 0.0),
            ("1e2", 0.0, 1000.0, 100.0),
        ];
        for (input, min, max, expected) in cases {
            let value = parse_and_validate_float(input, min, max).unwrap();
            assert_eq!(value, expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        for input in ["", "   ", "hello", "-91", "91", "Inf", "-inf", "NaN", "12abc"] {
            assert!(
                parse_and_validate_float(input, -90.0, 90.0).is_err(),
                "input {:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_error_messages() {
        let msg = |input: &str| {
            parse_and_validate_float(input, -90.0, 90.0)
                .unwrap_err()
                .to_string()
        };
        assert_eq!(msg(""), "input must not be empty");
        assert_eq!(msg("abc"), "value must be a valid number, got \"abc\"");
        assert_eq!(msg("inf"), "value must be a finite number");
        assert_eq!(msg("-90.5"), "value must be at least -90");
        assert_eq!(msg("90.5"), "value must be at most 90");
    }

    #[test]
    fn test_read_first_valid_line() {
        let mut input = Cursor::new("51.5\n");
        let mut output = Vec::new();
        let value = read_float_until_valid(&mut input, &mut output, "latitude", -90.0, 90.0).unwrap();

        assert_eq!(value, 51.5);
        assert_eq!(String::from_utf8(output).unwrap(), "Please enter the latitude: ");
    }

    #[test]
    fn test_read_retries_until_valid() {
        let mut input = Cursor::new("abc\n200\n\n-0.1278\n");
        let mut output = Vec::new();
        let value =
            read_float_until_valid(&mut input, &mut output, "longitude", -180.0, 180.0).unwrap();

        assert_eq!(value, -0.1278);
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Please enter the longitude: ").count(), 4);
        assert!(output.contains("value must be a valid number, got \"abc\". Please try again."));
        assert!(output.contains("value must be at most 180. Please try again."));
        assert!(output.contains("input must not be empty. Please try again."));
    }

    #[test]
    fn test_read_without_trailing_newline() {
        let mut input = Cursor::new("25");
        let mut output = Vec::new();
        let value = read_float_until_valid(&mut input, &mut output, "radius", 0.0, 40_075.0).unwrap();
        assert_eq!(value, 25.0);
    }

    #[test]
    fn test_read_fails_at_end_of_input() {
        let mut input = Cursor::new("not a number\n");
        let mut output = Vec::new();
        let err = read_float_until_valid(&mut input, &mut output, "radius", 0.0, 40_075.0)
            .unwrap_err();
        assert!(err.to_string().contains("no more input available"));
    }
}

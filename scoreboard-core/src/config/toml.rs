//! Minimal TOML parser for the board configuration
//!
//! Handles only the subset `scoreboard.toml` uses. It does NOT support the
//! full TOML grammar and needs no allocator.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs: decimal or `0x` hex integers, booleans
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown sections and keys are errors, so a typo never silently falls
//! back to a default.

use super::types::{ConfigError, ScoreboardConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (1-based line)
    InvalidSection { line: usize },
    /// Line is neither a header nor `key = value`
    InvalidLine { line: usize },
    /// Key not known in its section
    UnknownKey { line: usize },
    /// Value has the wrong type or is out of range
    InvalidValue { line: usize },
    /// Parsed, but the result does not validate
    Invalid(ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Segments,
    Multiplex,
    Backlight,
    Link,
}

/// Parse and validate a configuration file
///
/// Keys missing from the file keep their default values.
pub fn parse_config(input: &str) -> Result<ScoreboardConfig, ParseError> {
    let mut config = ScoreboardConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::InvalidSection { line: line_no });
            }
            section = parse_section_header(line[1..line.len() - 1].trim())
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine { line: line_no })?;
        apply_key(&mut config, section, key, value, line_no)?;
    }

    config.validate().map_err(ParseError::Invalid)?;
    Ok(config)
}

fn parse_section_header(name: &str) -> Option<Section> {
    match name {
        "segments" => Some(Section::Segments),
        "multiplex" => Some(Section::Multiplex),
        "backlight" => Some(Section::Backlight),
        "link" => Some(Section::Link),
        _ => None,
    }
}

fn apply_key(
    config: &mut ScoreboardConfig,
    section: Section,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };
    match (section, key) {
        (Section::Segments, "home_address") => {
            config.segments.home_address = parse_int(value).ok_or(invalid)?
        }
        (Section::Segments, "away_address") => {
            config.segments.away_address = parse_int(value).ok_or(invalid)?
        }
        (Section::Segments, "inning_address") => {
            config.segments.inning_address = parse_int(value).ok_or(invalid)?
        }
        (Section::Segments, "enable_active_low") => {
            config.segments.enable_active_low = parse_bool(value).ok_or(invalid)?
        }
        (Section::Multiplex, "tick_us") => config.multiplex.tick_us = parse_int(value).ok_or(invalid)?,
        (Section::Multiplex, "dwell_us") => {
            config.multiplex.dwell_us = parse_int(value).ok_or(invalid)?
        }
        (Section::Multiplex, "batch_limit") => {
            config.multiplex.batch_limit = parse_int(value).ok_or(invalid)?
        }
        (Section::Backlight, "tick_ms") => config.backlight.tick_ms = parse_int(value).ok_or(invalid)?,
        (Section::Backlight, "resolution") => {
            config.backlight.resolution = parse_int(value).ok_or(invalid)?
        }
        (Section::Backlight, "initial_duty") => {
            config.backlight.initial_duty = parse_int(value).ok_or(invalid)?
        }
        (Section::Backlight, "frequency_hz") => {
            config.backlight.frequency_hz = parse_int(value).ok_or(invalid)?
        }
        (Section::Link, "baud") => config.link.baud = parse_int(value).ok_or(invalid)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

/// Drop a trailing `# comment`
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a decimal or `0x` hex integer, allowing `_` separators
fn parse_int<T: TryFrom<u64>>(value: &str) -> Option<T> {
    let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    if digits.is_empty() {
        return None;
    }

    let mut result: u64 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix)?;
        result = result.checked_mul(radix as u64)?.checked_add(digit as u64)?;
    }
    T::try_from(result).ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

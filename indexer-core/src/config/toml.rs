//! Minimal TOML reader for the indexer configuration
//!
//! Handles only the subset `indexer.toml` uses:
//! - `[section]` and `[section.subsection]` headers
//! - `key = value` with float, integer, boolean and quoted string values
//! - Full-line and trailing `#` comments
//!
//! Works without an allocator. Keys not listed for a section are errors so a
//! typo fails loudly instead of silently keeping the default.

use core::f32::consts::PI;

use super::types::{FaultPolicy, IndexerConfig, MotionConstraints};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Value failed to parse for its key
    InvalidValue,
    /// Line is neither a header nor `key = value`
    InvalidLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Encoder,
    Controller,
    Profile,
    Speaker,
    Amp,
    Coordinator,
    Safety,
}

/// Parse TOML text over the defaults in `IndexerConfig::default()`
pub fn parse_config(input: &str) -> Result<IndexerConfig, ParseError> {
    let mut config = IndexerConfig::default();
    let mut section = Section::Root;

    // The profile table edits these and is folded back at the end
    let mut profile = config.controller.constraints.unwrap_or(MotionConstraints {
        max_velocity: 4.0,
        max_acceleration: 8.0,
    });
    let mut profile_enabled = config.controller.constraints.is_some();

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;

        if section == Section::Profile {
            match key {
                "enabled" => profile_enabled = parse_bool(value)?,
                "max_velocity" => profile.max_velocity = parse_float(value)?,
                "max_acceleration" => profile.max_acceleration = parse_float(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            continue;
        }

        apply_value(section, key, value, &mut config)?;
    }

    config.controller.constraints = profile_enabled.then_some(profile);

    Ok(config)
}

/// Parse section header like "controller" or "controller.profile"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "encoder" => Ok(Section::Encoder),
        "controller" => Ok(Section::Controller),
        "controller.profile" => Ok(Section::Profile),
        "speaker" => Ok(Section::Speaker),
        "amp" => Ok(Section::Amp),
        "coordinator" => Ok(Section::Coordinator),
        "safety" => Ok(Section::Safety),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut IndexerConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root | Section::Profile => Err(ParseError::UnknownKey),
        Section::Encoder => {
            let enc = &mut config.encoder;
            match key {
                "ratio" => {
                    let (num, den) = parse_ratio(value)?;
                    enc.position_factor = 2.0 * PI * num / den;
                }
                "position_factor" => enc.position_factor = parse_float(value)?,
                "velocity_factor" => enc.velocity_factor = parse_float(value)?,
                "inverted" => enc.inverted = parse_bool(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
        Section::Controller => {
            let c = &mut config.controller;
            match key {
                "min_angle" => c.min_angle = parse_float(value)?,
                "max_angle" => c.max_angle = parse_float(value)?,
                "wrap_period" => c.wrap_period = parse_float(value)?,
                "tolerance" => c.tolerance = parse_float(value)?,
                "kp" => c.gains.kp = parse_float(value)?,
                "ki" => c.gains.ki = parse_float(value)?,
                "kd" => c.gains.kd = parse_float(value)?,
                "integral_limit" => c.integral_limit = parse_float(value)?,
                "ks" => c.feedforward.ks = parse_float(value)?,
                "kg" => c.feedforward.kg = parse_float(value)?,
                "kv" => c.feedforward.kv = parse_float(value)?,
                "max_output_volts" => c.max_output_volts = parse_float(value)?,
                "nominal_period_ms" => c.nominal_period_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
        Section::Speaker => {
            let s = &mut config.coordinator.speaker;
            match key {
                "feed_wheels" => s.feed_wheels = parse_float(value)?,
                "intake_top" => s.intake_top = parse_float(value)?,
                "intake_bottom" => s.intake_bottom = parse_float(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
        Section::Amp => {
            let a = &mut config.coordinator.amp;
            match key {
                "top_wheel" => a.top_wheel = parse_float(value)?,
                "bottom_wheels" => a.bottom_wheels = parse_float(value)?,
                "intake_top" => a.intake_top = parse_float(value)?,
                "intake_bottom" => a.intake_bottom = parse_float(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
        Section::Coordinator => {
            let c = &mut config.coordinator;
            match key {
                "source_angle_deg" => c.source_angle = parse_float(value)? * PI / 180.0,
                "source_angle" => c.source_angle = parse_float(value)?,
                "settle_ms" => c.settle_ms = parse_int(value)?,
                "haptic_intensity" => c.haptic_intensity = parse_float(value)?,
                "searching_pattern" => c.searching_pattern = parse_pattern(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
        Section::Safety => {
            let s = &mut config.safety;
            match key {
                "policy" => s.policy = parse_policy(value)?,
                "max_stale_ticks" => s.max_stale_ticks = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
    }
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(hash_pos) if text[..hash_pos].matches('"').count() % 2 == 0 => {
            text[..hash_pos].trim()
        }
        _ => text,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a finite float; integer literals are accepted
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let v: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse gear ratio string like "16:23"
fn parse_ratio(value: &str) -> Result<(f32, f32), ParseError> {
    let (num, den) = parse_string(value)?
        .split_once(':')
        .ok_or(ParseError::InvalidValue)?;
    let num = parse_float(num.trim())?;
    let den = parse_float(den.trim())?;
    if num <= 0.0 || den <= 0.0 {
        return Err(ParseError::InvalidValue);
    }
    Ok((num, den))
}

/// A light pattern, or "none" to leave the light untouched
fn parse_pattern(value: &str) -> Result<Option<f32>, ParseError> {
    if value.starts_with('"') {
        return match parse_string(value)? {
            "none" => Ok(None),
            _ => Err(ParseError::InvalidValue),
        };
    }
    parse_float(value).map(Some)
}

fn parse_policy(value: &str) -> Result<FaultPolicy, ParseError> {
    match parse_string(value)? {
        "fail_safe" => Ok(FaultPolicy::FailSafe),
        "hold_last" => Ok(FaultPolicy::HoldLast),
        _ => Err(ParseError::InvalidValue),
    }
}

//! Build script for indexer-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates indexer.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in each section
const SECTIONS: &[(&str, &[&str])] = &[
    ("encoder", &["ratio", "position_factor", "velocity_factor", "inverted"]),
    (
        "controller",
        &[
            "min_angle",
            "max_angle",
            "wrap_period",
            "tolerance",
            "kp",
            "ki",
            "kd",
            "integral_limit",
            "ks",
            "kg",
            "kv",
            "max_output_volts",
            "nominal_period_ms",
            "profile",
        ],
    ),
    ("speaker", &["feed_wheels", "intake_top", "intake_bottom"]),
    (
        "amp",
        &["top_wheel", "bottom_wheels", "intake_top", "intake_bottom"],
    ),
    (
        "coordinator",
        &[
            "source_angle_deg",
            "source_angle",
            "settle_ms",
            "haptic_intensity",
            "searching_pattern",
        ],
    ),
    ("safety", &["policy", "max_stale_ticks"]),
];

const PROFILE_KEYS: &[&str] = &["enabled", "max_velocity", "max_acceleration"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and flags
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate indexer.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=indexer.toml");

    let config_path = Path::new("indexer.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: indexer.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds indexer.toml at build time.                 ║\n\
            ║  Please create one in the indexer-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read indexer.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in indexer.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_keys(&config, &mut errors);
    validate_controller(&config, &mut errors);
    validate_coordinator(&config, &mut errors);
    validate_safety(&config, &mut errors);
    report("Invalid indexer configuration", &errors);

    println!("cargo:warning=indexer.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Reject unknown sections and keys; the firmware parser does the same
fn validate_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (section, value) in root {
        let Some(allowed) = SECTIONS.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for (key, value) in table {
            if !allowed.1.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
            if section == "controller" && key == "profile" {
                for sub in value.as_table().into_iter().flat_map(|t| t.keys()) {
                    if !PROFILE_KEYS.contains(&sub.as_str()) {
                        errors.push(format!("[controller.profile] unknown key '{}'", sub));
                    }
                }
            }
        }
    }
}

fn number(config: &toml::Value, section: &str, key: &str) -> Option<f64> {
    let mut value = config;
    for part in section.split('.') {
        value = value.get(part)?;
    }
    match value.get(key)? {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn validate_controller(config: &toml::Value, errors: &mut Vec<String>) {
    let min = number(config, "controller", "min_angle");
    let max = number(config, "controller", "max_angle");
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            errors.push("[controller] min_angle must not exceed max_angle".into());
        }
    }

    for key in ["wrap_period", "tolerance", "max_output_volts", "nominal_period_ms"] {
        if let Some(v) = number(config, "controller", key) {
            if v <= 0.0 {
                errors.push(format!("[controller] {} must be positive", key));
            }
        }
    }

    if let Some(v) = number(config, "controller", "integral_limit") {
        if v < 0.0 {
            errors.push("[controller] integral_limit must not be negative".into());
        }
    }

    for key in ["max_velocity", "max_acceleration"] {
        if let Some(v) = number(config, "controller.profile", key) {
            if v <= 0.0 {
                errors.push(format!("[controller.profile] {} must be positive", key));
            }
        }
    }

    if let Some(toml::Value::String(ratio)) = config.get("encoder").and_then(|e| e.get("ratio")) {
        let valid = ratio
            .split_once(':')
            .map(|(n, d)| {
                let n: f64 = n.trim().parse().unwrap_or(0.0);
                let d: f64 = d.trim().parse().unwrap_or(0.0);
                n > 0.0 && d > 0.0
            })
            .unwrap_or(false);
        if !valid {
            errors.push("[encoder] ratio must look like \"16:23\"".into());
        }
    }
}

fn validate_coordinator(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(v) = number(config, "coordinator", "settle_ms") {
        if v <= 0.0 {
            errors.push("[coordinator] settle_ms must be positive".into());
        }
    }

    let coordinator = config.get("coordinator");
    match coordinator.and_then(|c| c.get("searching_pattern")) {
        None | Some(toml::Value::Float(_)) | Some(toml::Value::Integer(_)) => {}
        Some(toml::Value::String(s)) if s == "none" => {}
        Some(_) => errors.push("[coordinator] searching_pattern must be a number or \"none\"".into()),
    }

    for section in ["speaker", "amp"] {
        for (key, value) in config
            .get(section)
            .and_then(|s| s.as_table())
            .into_iter()
            .flatten()
        {
            let v = match value {
                toml::Value::Float(f) => *f,
                toml::Value::Integer(i) => *i as f64,
                _ => {
                    errors.push(format!("[{}] {} must be a number", section, key));
                    continue;
                }
            };
            if !(-1.0..=1.0).contains(&v) {
                errors.push(format!("[{}] {} must be within -1.0..1.0", section, key));
            }
        }
    }
}

fn validate_safety(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(safety) = config.get("safety") else {
        return;
    };

    if let Some(policy) = safety.get("policy") {
        match policy.as_str() {
            Some("fail_safe") | Some("hold_last") => {}
            _ => errors.push("[safety] policy must be 'fail_safe' or 'hold_last'".into()),
        }
    }

    if let Some(toml::Value::Integer(ticks)) = safety.get("max_stale_ticks") {
        if *ticks < 0 || *ticks > 255 {
            errors.push("[safety] max_stale_ticks must be 0-255".into());
        }
    }
}

//! Build script for scoreboard-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates scoreboard.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys each section accepts, with their allowed range
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "segments",
        &[
            ("home_address", Kind::Int(0x20, 0x27)),
            ("away_address", Kind::Int(0x20, 0x27)),
            ("inning_address", Kind::Int(0x20, 0x27)),
            ("enable_active_low", Kind::Bool),
        ],
    ),
    (
        "multiplex",
        &[
            ("tick_us", Kind::Int(1, u32::MAX as i64)),
            ("dwell_us", Kind::Int(1, u32::MAX as i64)),
            ("batch_limit", Kind::Int(1, 64)),
        ],
    ),
    (
        "backlight",
        &[
            ("tick_ms", Kind::Int(1, u32::MAX as i64)),
            ("resolution", Kind::Int(1, 100)),
            ("initial_duty", Kind::Int(0, 100)),
            ("frequency_hz", Kind::Int(1, u32::MAX as i64)),
        ],
    ),
    ("link", &[("baud", Kind::Int(1, u32::MAX as i64))]),
];

#[derive(Clone, Copy)]
enum Kind {
    Int(i64, i64),
    Bool,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate scoreboard.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=scoreboard.toml");

    let config_path = Path::new("scoreboard.toml");
    if !config_path.exists() {
        fail(
            "scoreboard.toml not found!",
            &["The firmware embeds scoreboard.toml from the crate directory.".to_string()],
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read scoreboard.toml", &[e.to_string()]),
    };

    let config: toml::Table = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            fail("Invalid TOML syntax in scoreboard.toml", &lines);
        }
    };

    let mut errors = Vec::new();
    for (section, table) in &config {
        let Some((_, keys)) = SCHEMA.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(table) = table.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for (key, value) in table {
            match keys.iter().find(|(name, _)| name == key) {
                Some((_, kind)) => check_value(section, key, value, *kind, &mut errors),
                None => errors.push(format!("[{}] unknown key '{}'", section, key)),
            }
        }
    }
    check_addresses_distinct(&config, &mut errors);
    check_dwell(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in scoreboard.toml", &errors);
    }

    println!("cargo:warning=scoreboard.toml validated successfully");
}

fn check_value(section: &str, key: &str, value: &toml::Value, kind: Kind, errors: &mut Vec<String>) {
    match (kind, value) {
        (Kind::Int(min, max), toml::Value::Integer(n)) => {
            if *n < min || *n > max {
                errors.push(format!("[{}] {} must be {:#x}-{:#x}", section, key, min, max));
            }
        }
        (Kind::Int(..), _) => errors.push(format!("[{}] {} must be an integer", section, key)),
        (Kind::Bool, toml::Value::Boolean(_)) => {}
        (Kind::Bool, _) => errors.push(format!("[{}] {} must be true or false", section, key)),
    }
}

fn integer(config: &toml::Table, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// The three units must sit on different expanders
fn check_addresses_distinct(config: &toml::Table, errors: &mut Vec<String>) {
    let defaults = [("home_address", 0x20), ("away_address", 0x21), ("inning_address", 0x22)];
    let addresses: Vec<i64> = defaults
        .iter()
        .map(|(key, default)| integer(config, "segments", key).unwrap_or(*default))
        .collect();
    for (i, address) in addresses.iter().enumerate() {
        if addresses[..i].contains(address) {
            errors.push(format!("[segments] address {:#x} used by two units", address));
        }
    }
}

fn check_dwell(config: &toml::Table, errors: &mut Vec<String>) {
    let tick = integer(config, "multiplex", "tick_us").unwrap_or(1_000);
    let dwell = integer(config, "multiplex", "dwell_us").unwrap_or(5_000);
    if dwell < tick {
        errors.push("[multiplex] dwell_us must be at least tick_us".to_string());
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

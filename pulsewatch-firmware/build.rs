//! Build script for pulsewatch-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates monitor.toml at compile time
//! - Generates the `MONITOR_CONFIG` constant from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pulsewatch_core::MonitorConfig;

/// Keys accepted in each monitor.toml section
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    (
        "limits",
        &["min_heart_rate", "max_heart_rate", "min_confidence", "min_oxygen"],
    ),
    ("history", &["capacity", "valid_frame_threshold"]),
    (
        "timing",
        &[
            "max_invalid_time_ms",
            "freeze_timeout_ms",
            "grace_period_ms",
            "tick_period_ms",
        ],
    ),
];

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    let config = load_config();
    generate_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, check and deserialize monitor.toml
fn load_config() -> MonitorConfig {
    println!("cargo:rerun-if-changed=monitor.toml");

    let config_path = Path::new("monitor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: monitor.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a monitor.toml configuration file.        ║\n\
            ║  Please create one in the pulsewatch-firmware directory.         ║\n\
            ║  An empty file selects every default.                            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read monitor.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let document: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in monitor.toml",
            &format_error_lines(&e.to_string()),
        ),
    };

    check_known_keys(&document);

    let config: MonitorConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => fail(
            "Invalid value in monitor.toml",
            &format_error_lines(&e.to_string()),
        ),
    };

    if let Err(e) = config.validate() {
        fail(
            "Inconsistent monitor configuration",
            &format_error_lines(e.message()),
        );
    }

    println!("cargo:warning=monitor.toml validated successfully");
    config
}

/// Reject sections and keys the firmware does not know
///
/// Serde would silently drop a misspelled key and fall back to the default.
fn check_known_keys(document: &toml::Value) {
    let Some(sections) = document.as_table() else {
        return;
    };

    let mut errors = Vec::new();

    for (section, body) in sections {
        let known = KNOWN_KEYS.iter().find(|(name, _)| *name == section.as_str());
        let Some((_, keys)) = known else {
            errors.push(format!("Unknown section [{}]", section));
            continue;
        };

        let Some(body) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };

        for key in body.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
        }
    }

    if !errors.is_empty() {
        fail(
            "Unknown keys in monitor.toml",
            &errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
}

/// Write `monitor_config.rs` into OUT_DIR
fn generate_config(out_dir: &Path, config: &MonitorConfig) {
    let limits = &config.limits;
    let history = &config.history;
    let timing = &config.timing;

    let source = format!(
        "// Generated by build.rs from monitor.toml\n\
         \n\
         pub const MONITOR_CONFIG: MonitorConfig = MonitorConfig {{\n\
         \x20   limits: ValidityLimits {{\n\
         \x20       min_heart_rate: {},\n\
         \x20       max_heart_rate: {},\n\
         \x20       min_confidence: {},\n\
         \x20       min_oxygen: {},\n\
         \x20   }},\n\
         \x20   history: HistoryConfig {{\n\
         \x20       capacity: {},\n\
         \x20       valid_frame_threshold: {},\n\
         \x20   }},\n\
         \x20   timing: TimingConfig {{\n\
         \x20       max_invalid_time_ms: {},\n\
         \x20       freeze_timeout_ms: {},\n\
         \x20       grace_period_ms: {},\n\
         \x20       tick_period_ms: {},\n\
         \x20   }},\n\
         }};\n",
        limits.min_heart_rate,
        limits.max_heart_rate,
        limits.min_confidence,
        limits.min_oxygen,
        history.capacity,
        history.valid_frame_threshold,
        timing.max_invalid_time_ms,
        timing.freeze_timeout_ms,
        timing.grace_period_ms,
        timing.tick_period_ms,
    );

    fs::write(out_dir.join("monitor_config.rs"), source).unwrap();
}

/// Abort the build with a boxed error
fn fail(title: &str, body: &str) -> ! {
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

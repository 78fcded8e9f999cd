//! Build script for tessera-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses machine.toml into the core `MachineConfig` and validates it
//! - Generates the configuration, print pattern and cartridge counts as
//!   Rust constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tessera_core::config::{ConfigError, MachineConfig, MAX_CARTRIDGES};

fn main() {
    setup_linker();
    let machine = validate_config();
    generate_config(&machine);
}

/// Set up linker search paths for memory.x
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

/// Print a boxed error report and abort the build
fn fail(title: &str, errors: &[String]) -> ! {
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

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> Vec<String> {
    msg.lines()
        .map(|line| {
            if line.len() > 61 {
                format!("{}...", &line[..58])
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Parse and validate machine.toml
fn validate_config() -> Machine {
    // Re-run if machine.toml changes
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");
    if !config_path.exists() {
        fail(
            "machine.toml not found!",
            &["Create machine.toml in the tessera-firmware directory".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read machine.toml", &[e.to_string()]),
    };

    let mut table: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => fail(
            "Invalid TOML syntax in machine.toml",
            &format_error_lines(&e.to_string()),
        ),
    };

    // Sections that are not part of MachineConfig
    let pattern = table.remove("pattern");
    let cartridges = table.remove("cartridges");

    let config: MachineConfig = match toml::Value::Table(table).try_into() {
        Ok(config) => config,
        Err(e) => fail("Invalid machine.toml", &format_error_lines(&e.to_string())),
    };

    let mut errors = Vec::new();
    if let Err(e) = config.validate() {
        errors.push(describe(e));
    }
    let (pattern_width, pattern) = read_pattern(pattern.as_ref(), &mut errors);
    let capacity = read_capacity(cartridges.as_ref(), &mut errors);

    let machine = Machine {
        config,
        pattern_width,
        pattern,
        capacity,
    };
    if errors.is_empty() {
        machine.check(&mut errors);
    }
    if !errors.is_empty() {
        fail("Invalid machine.toml", &errors);
    }

    println!("cargo:warning=machine.toml validated successfully");
    machine
}

/// Human-readable message for a rejected configuration
fn describe(err: ConfigError) -> String {
    match err {
        ConfigError::ZeroTickPeriod => "motion.tick_period_us must be positive".to_string(),
        ConfigError::ZeroInterval => "intervals must be at least 1 tick".to_string(),
        ConfigError::ZeroProbeSteps => "homing.probe_steps must be positive".to_string(),
        ConfigError::ZeroLimit => "max_probes and max_move_us must be positive".to_string(),
        ConfigError::EmptyRange(axis) => format!("[envelope] {:?} minimum exceeds maximum", axis),
        ConfigError::RangeTooWide(axis) => format!("[envelope] {:?} spans more than 2^31-1 steps", axis),
        ConfigError::ZOrdering => "safe_z must be above (less than) pick_z and place_z".to_string(),
        ConfigError::EmptyLayout => "slot_count, grid_cols and grid_rows must be positive".to_string(),
        ConfigError::TooManySlots => format!("pick_place.slot_count must be at most {}", MAX_CARTRIDGES),
        ConfigError::LayoutOutsideEnvelope => "a slot or grid cell lies outside [envelope]".to_string(),
    }
}

/// Everything compiled into the firmware
struct Machine {
    config: MachineConfig,
    pattern_width: usize,
    pattern: Vec<Option<u8>>,
    capacity: Vec<u16>,
}

impl Machine {
    /// Checks that span the pattern, the cartridges and the layout
    fn check(&self, errors: &mut Vec<String>) {
        let pp = &self.config.pick_place;
        let height = self.pattern.len() / self.pattern_width.max(1);
        if self.pattern_width > pp.grid_cols as usize || height > pp.grid_rows as usize {
            errors.push(format!(
                "[pattern] is {}x{}, grid is {}x{}",
                self.pattern_width, height, pp.grid_cols, pp.grid_rows
            ));
        }
        if let Some(slot) = self.pattern.iter().flatten().find(|s| **s >= pp.slot_count) {
            errors.push(format!("[pattern] uses slot {} but slot_count is {}", slot, pp.slot_count));
        }
        if self.capacity.len() > pp.slot_count as usize {
            errors.push(format!(
                "[cartridges] lists {} slots but slot_count is {}",
                self.capacity.len(),
                pp.slot_count
            ));
        }
    }
}

/// Parse `[pattern] rows` into a width and row-major cells
fn read_pattern(section: Option<&toml::Value>, errors: &mut Vec<String>) -> (usize, Vec<Option<u8>>) {
    let rows = match section.and_then(|p| p.get("rows")).and_then(|r| r.as_array()) {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            errors.push("[pattern] rows must be a non-empty array".to_string());
            return (0, Vec::new());
        }
    };

    let mut width = None;
    let mut cells = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let Some(row) = row.as_str() else {
            errors.push(format!("[pattern] row {} must be a string", i));
            continue;
        };
        let len = row.chars().count();
        let expected = *width.get_or_insert(len);
        if expected != len {
            errors.push(format!("[pattern] row {} has {} cells, expected {}", i, len, expected));
        }
        for c in row.chars() {
            cells.push(match c {
                '.' => None,
                '0'..='9' => Some(c as u8 - b'0'),
                'a'..='t' => Some(c as u8 - b'a' + 10),
                _ => {
                    errors.push(format!("[pattern] row {} has invalid cell '{}'", i, c));
                    None
                }
            });
        }
    }
    (width.unwrap_or(0), cells)
}

/// Parse `[cartridges] capacity`; an absent section means untracked
fn read_capacity(section: Option<&toml::Value>, errors: &mut Vec<String>) -> Vec<u16> {
    let Some(section) = section else {
        return Vec::new();
    };
    let Some(items) = section.get("capacity").and_then(|c| c.as_array()) else {
        errors.push("[cartridges] capacity must be an array".to_string());
        return Vec::new();
    };

    let mut capacity = Vec::new();
    for (slot, item) in items.iter().enumerate() {
        match item.as_integer().and_then(|v| u16::try_from(v).ok()) {
            Some(count) => capacity.push(count),
            None => errors.push(format!("[cartridges] slot {} must be 0-{}", slot, u16::MAX)),
        }
    }
    capacity
}

/// Write machine config, pattern and cartridge counts to OUT_DIR
fn generate_config(m: &Machine) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let c = &m.config;
    let pp = &c.pick_place;
    let dir = &c.homing.home_direction;

    let cells = m
        .pattern
        .iter()
        .map(|c| format!("{:?}", c))
        .collect::<Vec<_>>()
        .join(", ");
    let capacity = m
        .capacity
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let code = format!(
        "// Generated by build.rs from machine.toml\n\
        \n\
        pub const MACHINE_CONFIG: MachineConfig = MachineConfig {{\n    \
            version: {version},\n    \
            motion: MotionConfig {{\n        \
                tick_period_us: {tick},\n        \
                ramp_start_interval: {ramp},\n        \
                decel_runway_steps: {runway},\n    \
            }},\n    \
            homing: HomingConfig {{\n        \
                probe_steps: {probe_steps},\n        \
                probe_start_interval: {probe_start},\n        \
                probe_interval: {probe_interval},\n        \
                home_direction: PerAxis {{ x: Direction::{hx:?}, y: Direction::{hy:?}, z: Direction::{hz:?} }},\n        \
                max_probes: {max_probes:?},\n    \
            }},\n    \
            pick_place: PickPlaceConfig {{\n        \
                safe_z: {safe_z},\n        \
                pick_z: {pick_z},\n        \
                place_z: {place_z},\n        \
                transit_interval: {transit},\n        \
                precise_interval: {precise},\n        \
                slot_origin: PlanePoint {{ x: {sox}, y: {soy} }},\n        \
                slot_pitch_x: {slot_pitch},\n        \
                slot_count: {slot_count},\n        \
                grid_origin: PlanePoint {{ x: {gox}, y: {goy} }},\n        \
                grid_pitch: PlanePoint {{ x: {gpx}, y: {gpy} }},\n        \
                grid_cols: {cols},\n        \
                grid_rows: {rows},\n    \
            }},\n    \
            envelope: PerAxis {{\n        \
                x: AxisRange::new({x0}, {x1}),\n        \
                y: AxisRange::new({y0}, {y1}),\n        \
                z: AxisRange::new({z0}, {z1}),\n    \
            }},\n    \
            limits: WaitLimits {{ max_move_us: {max_move:?} }},\n\
        }};\n\
        \n\
        pub const PATTERN_WIDTH: u16 = {width};\n\
        \n\
        pub static PATTERN: [Option<u8>; {len}] = [{cells}];\n\
        \n\
        pub static CARTRIDGE_CAPACITY: [u16; {slots}] = [{capacity}];\n",
        version = c.version,
        tick = c.motion.tick_period_us,
        ramp = c.motion.ramp_start_interval,
        runway = c.motion.decel_runway_steps,
        probe_steps = c.homing.probe_steps,
        probe_start = c.homing.probe_start_interval,
        probe_interval = c.homing.probe_interval,
        hx = dir.x,
        hy = dir.y,
        hz = dir.z,
        max_probes = c.homing.max_probes,
        safe_z = pp.safe_z,
        pick_z = pp.pick_z,
        place_z = pp.place_z,
        transit = pp.transit_interval,
        precise = pp.precise_interval,
        sox = pp.slot_origin.x,
        soy = pp.slot_origin.y,
        slot_pitch = pp.slot_pitch_x,
        slot_count = pp.slot_count,
        gox = pp.grid_origin.x,
        goy = pp.grid_origin.y,
        gpx = pp.grid_pitch.x,
        gpy = pp.grid_pitch.y,
        cols = pp.grid_cols,
        rows = pp.grid_rows,
        x0 = c.envelope.x.min,
        x1 = c.envelope.x.max,
        y0 = c.envelope.y.min,
        y1 = c.envelope.y.max,
        z0 = c.envelope.z.min,
        z1 = c.envelope.z.max,
        max_move = c.limits.max_move_us,
        width = m.pattern_width,
        len = m.pattern.len(),
        cells = cells,
        slots = m.capacity.len(),
        capacity = capacity,
    );

    fs::write(out_dir.join("machine_config.rs"), code).unwrap();
}

//! Temperature probing. Sensor files are tried in a fixed order, then any
//! hwmon inputs discovered under `/sys/class/hwmon`, then `vcgencmd` as the
//! firmware fallback. Absence is reported as `None`, never as zero.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
const HWMON_FIXED: [&str; 2] = [
    "/sys/class/hwmon/hwmon0/temp1_input",
    "/sys/class/hwmon/hwmon1/temp1_input",
];
const HWMON_ROOT: &str = "/sys/class/hwmon";

/// First temperature any source yields, in degrees Celsius.
pub fn temperature_c() -> Option<f64> {
    let mut paths: Vec<PathBuf> = vec![PathBuf::from(THERMAL_ZONE)];
    paths.extend(HWMON_FIXED.iter().map(PathBuf::from));
    paths.extend(discover_hwmon_inputs(Path::new(HWMON_ROOT)));
    read_first_sensor(&paths).or_else(vcgencmd_temp)
}

fn read_first_sensor(paths: &[PathBuf]) -> Option<f64> {
    paths.iter().find_map(|path| {
        fs::read_to_string(path)
            .ok()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .map(normalize_units)
    })
}

/// Values above 1000 are millidegrees (the sysfs convention).
fn normalize_units(value: f64) -> f64 {
    if value > 1000.0 {
        value / 1000.0
    } else {
        value
    }
}

/// Enumerate `hwmon*/temp*_input` files, sorted so the probe order is stable.
fn discover_hwmon_inputs(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(root) else {
        return found;
    };
    let mut dirs: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    dirs.sort();
    for dir in dirs {
        let Ok(inner) = fs::read_dir(&dir) else {
            continue;
        };
        let mut inputs: Vec<PathBuf> = inner
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("temp") && n.ends_with("_input"))
            })
            .collect();
        inputs.sort();
        found.extend(inputs);
    }
    found
}

fn vcgencmd_temp() -> Option<f64> {
    let output = Command::new("vcgencmd").arg("measure_temp").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_vcgencmd(&String::from_utf8_lossy(&output.stdout))
}

/// Parses `temp=45.6'C`.
fn parse_vcgencmd(raw: &str) -> Option<f64> {
    raw.trim()
        .strip_prefix("temp=")?
        .trim_end_matches("'C")
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(path: &Path, contents: &str) {
        let mut file = File::create(path).unwrap();
        write!(file, "{contents}").unwrap();
    }

    #[test]
    fn millidegrees_are_scaled_down() {
        assert_eq!(normalize_units(48234.0), 48.234);
        assert_eq!(normalize_units(48.2), 48.2);
        // 1000 itself is taken as degrees per the strict > comparison.
        assert_eq!(normalize_units(1000.0), 1000.0);
    }

    #[test]
    fn first_parsable_sensor_wins() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("zone0");
        let good = dir.path().join("temp1_input");
        let ignored = dir.path().join("temp2_input");
        write_file(&broken, "not-a-number\n");
        write_file(&good, "51345\n");
        write_file(&ignored, "99000\n");
        let paths = vec![
            dir.path().join("missing"),
            broken,
            good,
            ignored,
        ];
        assert_eq!(read_first_sensor(&paths), Some(51.345));
    }

    #[test]
    fn no_sensor_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![dir.path().join("absent")];
        assert_eq!(read_first_sensor(&paths), None);
    }

    #[test]
    fn discovers_hwmon_temperature_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let hwmon0 = dir.path().join("hwmon0");
        let hwmon1 = dir.path().join("hwmon1");
        fs::create_dir_all(&hwmon0).unwrap();
        fs::create_dir_all(&hwmon1).unwrap();
        write_file(&hwmon0.join("temp1_input"), "50000\n");
        write_file(&hwmon0.join("temp1_label"), "cpu\n");
        write_file(&hwmon1.join("temp2_input"), "41000\n");
        write_file(&hwmon1.join("fan1_input"), "1200\n");

        let found = discover_hwmon_inputs(dir.path());
        assert_eq!(
            found,
            vec![hwmon0.join("temp1_input"), hwmon1.join("temp2_input")]
        );
    }

    #[test]
    fn discovery_of_missing_root_is_empty() {
        assert!(discover_hwmon_inputs(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn parses_vcgencmd_output() {
        assert_eq!(parse_vcgencmd("temp=45.6'C\n"), Some(45.6));
        assert_eq!(parse_vcgencmd("temp=60.0'C"), Some(60.0));
        assert_eq!(parse_vcgencmd("VCHI initialization failed"), None);
        assert_eq!(parse_vcgencmd(""), None);
    }
}

use std::fs;

const PROC_MEMINFO: &str = "/proc/meminfo";

/// Memory utilisation as `100 * (MemTotal - MemAvailable) / MemTotal`,
/// in `[0, 100]`. Returns `0.0` when the record is unreadable or empty.
pub fn mem_percent() -> f64 {
    fs::read_to_string(PROC_MEMINFO)
        .map(|raw| parse_meminfo(&raw))
        .unwrap_or(0.0)
}

fn parse_meminfo(raw: &str) -> f64 {
    let mut total = 0u64;
    let mut available = 0u64;
    for line in raw.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        match key.trim() {
            "MemTotal" => total = value,
            "MemAvailable" => available = value,
            _ => {}
        }
    }
    if total == 0 {
        return 0.0;
    }
    (100.0 * total.saturating_sub(available) as f64 / total as f64).clamp(0.0, 100.0)
}

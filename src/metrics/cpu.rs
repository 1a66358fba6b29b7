use std::fs;
use std::thread;
use std::time::Duration;

const PROC_STAT: &str = "/proc/stat";

/// Gap between the two counter reads; `cpu_percent` owns this delay.
pub const SAMPLE_GAP: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuTimes {
    idle: u64,
    total: u64,
}

/// Aggregate CPU utilisation over a 250 ms window, in `[0, 100]`.
/// Returns `0.0` when the counters are unreadable or nothing elapsed.
pub fn cpu_percent() -> f64 {
    let Some(first) = read_cpu_times() else {
        return 0.0;
    };
    thread::sleep(SAMPLE_GAP);
    let Some(second) = read_cpu_times() else {
        return 0.0;
    };
    delta_percent(first, second)
}

fn read_cpu_times() -> Option<CpuTimes> {
    parse_proc_stat(&fs::read_to_string(PROC_STAT).ok()?)
}

/// Pull idle and total jiffies from the aggregate `cpu ` line. Idle counts
/// both idle and iowait, matching what the kernel considers not-busy.
fn parse_proc_stat(raw: &str) -> Option<CpuTimes> {
    let line = raw.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map_while(|f| f.parse().ok())
        .collect();
    if fields.len() < 5 {
        return None;
    }
    Some(CpuTimes {
        idle: fields[3] + fields[4],
        total: fields.iter().sum(),
    })
}

fn delta_percent(first: CpuTimes, second: CpuTimes) -> f64 {
    let d_total = second.total.saturating_sub(first.total);
    if d_total == 0 {
        return 0.0;
    }
    let d_idle = second.idle.saturating_sub(first.idle);
    (100.0 * (1.0 - d_idle as f64 / d_total as f64)).clamp(0.0, 100.0)
}

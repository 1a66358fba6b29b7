//! Text fitting and line building. Every line handed to the draw call has
//! already been reduced until its measured width fits the panel; the
//! CPU/temperature line additionally degrades through a candidate chain
//! (decimal formatting, then integer formatting) before truncation.

use crate::display::{DisplayLine, LINE_COUNT};
use crate::metrics::MetricSnapshot;

/// Truncation marker. The built-in monospace fonts carry no U+2026 glyph,
/// so three dots stand in for it.
pub const ELLIPSIS: &str = "...";

/// Reduce `text` until `measure` says it fits in `max_width_px`: unchanged
/// if it already fits, otherwise truncated with the ellipsis marker, and as
/// a last resort the first character alone. Pure; one measurement per
/// dropped character.
pub fn fit<F>(text: &str, max_width_px: u32, measure: F) -> String
where
    F: Fn(&str) -> u32,
{
    if measure(text) <= max_width_px {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        if kept.is_empty() {
            break;
        }
        let mut candidate: String = kept.iter().collect();
        candidate.push_str(ELLIPSIS);
        if measure(&candidate) <= max_width_px {
            return candidate;
        }
    }
    text.chars().next().map(String::from).unwrap_or_default()
}

/// Round-half-up, applied uniformly so the integer tier never disagrees
/// with itself between frames.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// First candidate that fits wins; the final candidate is truncated as the
/// safety net. Candidates must be ordered most- to least-precise.
fn first_fitting<F>(candidates: &[String], max_width_px: u32, measure: F) -> String
where
    F: Fn(&str) -> u32,
{
    for candidate in &candidates[..candidates.len() - 1] {
        if measure(candidate) <= max_width_px {
            return candidate.clone();
        }
    }
    fit(&candidates[candidates.len() - 1], max_width_px, measure)
}

fn cpu_temp_line<F>(snapshot: &MetricSnapshot, max_width_px: u32, measure: F) -> String
where
    F: Fn(&str) -> u32,
{
    let candidates = match snapshot.temperature_c {
        Some(temp) => vec![
            format!("CPU:{:.1}%  T:{:.1}°C", snapshot.cpu_percent, temp),
            format!(
                "CPU:{}%  T:{}°C",
                round_half_up(snapshot.cpu_percent),
                round_half_up(temp)
            ),
        ],
        // No sensor answered: drop the segment entirely, no placeholder.
        None => vec![format!("CPU:{:.1}%", snapshot.cpu_percent)],
    };
    first_fitting(&candidates, max_width_px, measure)
}

/// Build the four display lines for one snapshot. `mount` is the disk path
/// label; `measure` is the font's pixel-width capability.
pub fn build_lines<F>(
    snapshot: &MetricSnapshot,
    mount: &str,
    max_width_px: u32,
    measure: F,
) -> [DisplayLine; LINE_COUNT]
where
    F: Fn(&str) -> u32,
{
    let ip = fit(&format!("IP: {}", snapshot.ip), max_width_px, &measure);
    let cpu = cpu_temp_line(snapshot, max_width_px, &measure);
    let ram = fit(
        &format!("RAM:{:.1}%", snapshot.mem_percent),
        max_width_px,
        &measure,
    );
    let disk = fit(
        &format!("DISK({}):{:.1}%", mount, snapshot.disk_percent),
        max_width_px,
        &measure,
    );
    [
        DisplayLine::new(ip, 0),
        DisplayLine::new(cpu, 1),
        DisplayLine::new(ram, 2),
        DisplayLine::new(disk, 3),
    ]
}

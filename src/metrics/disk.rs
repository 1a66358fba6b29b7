use std::path::{Path, PathBuf};

use sysinfo::Disks;

/// Usage of the filesystem holding `path`, as `100 * used/total` in
/// `[0, 100]`. Returns `0.0` for a missing path, an unmatched mount, or a
/// zero-size filesystem.
pub fn disk_percent(path: &Path) -> f64 {
    if !path.exists() {
        return 0.0;
    }
    let disks = Disks::new_with_refreshed_list();
    let mounts: Vec<MountUsage> = disks
        .list()
        .iter()
        .map(|disk| MountUsage {
            mount: disk.mount_point().to_path_buf(),
            total: disk.total_space(),
            available: disk.available_space(),
        })
        .collect();
    usage_for(path, &mounts)
}

struct MountUsage {
    mount: PathBuf,
    total: u64,
    available: u64,
}

/// Pick the mount with the longest prefix of `path`; the root mount matches
/// everything, deeper mounts shadow it.
fn usage_for(path: &Path, mounts: &[MountUsage]) -> f64 {
    let best = mounts
        .iter()
        .filter(|m| path.starts_with(&m.mount))
        .max_by_key(|m| m.mount.as_os_str().len());
    let Some(found) = best else {
        return 0.0;
    };
    if found.total == 0 {
        return 0.0;
    }
    let used = found.total.saturating_sub(found.available);
    (100.0 * used as f64 / found.total as f64).clamp(0.0, 100.0)
}

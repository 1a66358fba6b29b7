//! The supervisor loop: sample, format, draw, sleep — forever. Failures
//! never end the process; they are logged, waited out, and retried, with a
//! session re-acquire only when the display itself reports Disconnected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::Config;
use crate::display::{
    font::{font_for, measure_width},
    layout::build_lines,
    session::{sleep_unless_stopped, DisplaySession},
    ScreenConnector, WIDTH_PX,
};
use crate::logger::Logger;
use crate::metrics::{self, MetricSnapshot};
use crate::Result;

/// Pause before resuming after a refresh failure.
const RECOVERY_DELAY: Duration = Duration::from_secs(2);

pub(super) fn run_status_loop<C: ScreenConnector>(
    session: &mut DisplaySession<C>,
    config: &Config,
    logger: &Logger,
    running: &AtomicBool,
) {
    let interval = Duration::from_secs_f64(config.update_secs);
    session.acquire(logger, running);
    if session.is_connected() {
        logger.info("display acquired");
    }

    while running.load(Ordering::SeqCst) {
        match refresh_once(session, config) {
            Ok(()) => sleep_unless_stopped(interval, running),
            Err(err) => {
                logger.warn(format!(
                    "refresh failed: {err}; resuming in {}s",
                    RECOVERY_DELAY.as_secs()
                ));
                sleep_unless_stopped(RECOVERY_DELAY, running);
                if !session.is_connected() && running.load(Ordering::SeqCst) {
                    logger.info("display lost; re-acquiring");
                    session.acquire(logger, running);
                }
            }
        }
    }
}

/// One sample-format-draw iteration; blocks for the CPU sampling window.
fn refresh_once<C: ScreenConnector>(
    session: &mut DisplaySession<C>,
    config: &Config,
) -> Result<()> {
    let snapshot = metrics::sample(config);
    render_snapshot(session, &snapshot, config)
}

fn render_snapshot<C: ScreenConnector>(
    session: &mut DisplaySession<C>,
    snapshot: &MetricSnapshot,
    config: &Config,
) -> Result<()> {
    let font = font_for(config.font);
    let lines = build_lines(snapshot, &config.mount, WIDTH_PX, |text| {
        measure_width(font, text)
    });
    session.draw(&lines)
}

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::display::{session::DisplaySession, DisplayLine, ScreenConnector};
use crate::logger::Logger;
use crate::{Error, Result};

/// Install a ctrl-c handler that flips the shared running flag instead of exiting immediately.
pub(super) fn create_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_handle = running.clone();

    ctrlc::set_handler(move || {
        running_handle.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    Ok(running)
}

/// Show the shutdown message before the daemon exits.
pub(super) fn render_shutdown<C: ScreenConnector>(
    session: &mut DisplaySession<C>,
    logger: &Logger,
) {
    if !session.is_connected() {
        return;
    }
    let lines = [DisplayLine::new("offline", 0)];
    if let Err(err) = session.draw(&lines) {
        logger.debug(format!("shutdown frame not drawn: {err}"));
    }
}

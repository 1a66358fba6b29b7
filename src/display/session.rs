use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::display::{DisplayLine, Screen, ScreenConnector};
use crate::logger::Logger;
use crate::{Error, Result};

/// Delay between connection attempts while the display is absent.
pub const ACQUIRE_RETRY_DELAY: Duration = Duration::from_secs(5);

const SLEEP_SLICE: Duration = Duration::from_millis(100);

enum SessionState<S> {
    Disconnected,
    Connected(S),
}

/// Owns the one live connection to the panel. A transport fault tears the
/// session down to Disconnected; the screen is then re-created from the
/// connector, never repaired in place.
pub struct DisplaySession<C: ScreenConnector> {
    connector: C,
    contrast: u8,
    retry_delay: Duration,
    state: SessionState<C::Screen>,
}

impl<C: ScreenConnector> DisplaySession<C> {
    pub fn new(connector: C, contrast: u8) -> Self {
        Self {
            connector,
            contrast,
            retry_delay: ACQUIRE_RETRY_DELAY,
            state: SessionState::Disconnected,
        }
    }

    /// Shorter retry delay for tests driving a fake connector.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Block until a usable screen exists, retrying forever with a fixed
    /// delay. Returns early only when the shutdown flag clears.
    pub fn acquire(&mut self, logger: &Logger, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            match self.try_connect() {
                Ok(()) => return,
                Err(err) => {
                    logger.error(format!(
                        "display init failed, retrying in {}s: {err}",
                        self.retry_delay.as_secs_f32()
                    ));
                    sleep_unless_stopped(self.retry_delay, running);
                }
            }
        }
    }

    fn try_connect(&mut self) -> Result<()> {
        let mut screen = self.connector.connect()?;
        screen.set_contrast(self.contrast)?;
        self.state = SessionState::Connected(screen);
        Ok(())
    }

    /// Draw one frame. A fault transitions the session to Disconnected and
    /// surfaces to the caller as the signal to re-acquire.
    pub fn draw(&mut self, lines: &[DisplayLine]) -> Result<()> {
        let SessionState::Connected(screen) = &mut self.state else {
            return Err(Error::Display("draw on a disconnected session".into()));
        };
        match screen.draw_frame(lines) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.state = SessionState::Disconnected;
                Err(err)
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected(_))
    }
}

/// Sleep in short slices so a shutdown request is honored promptly.
pub(crate) fn sleep_unless_stopped(total: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + total;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogLevel, Logger};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeScreenInner {
        frames: Vec<Vec<DisplayLine>>,
        contrast: Option<u8>,
        fail_next_draw: bool,
    }

    #[derive(Clone, Default)]
    struct FakeScreen {
        inner: Rc<RefCell<FakeScreenInner>>,
    }

    impl Screen for FakeScreen {
        fn set_contrast(&mut self, level: u8) -> Result<()> {
            self.inner.borrow_mut().contrast = Some(level);
            Ok(())
        }

        fn draw_frame(&mut self, lines: &[DisplayLine]) -> Result<()> {
            let mut inner = self.inner.borrow_mut();
            if inner.fail_next_draw {
                inner.fail_next_draw = false;
                return Err(Error::Display("bus fault".into()));
            }
            inner.frames.push(lines.to_vec());
            Ok(())
        }
    }

    /// Fails the first `failures` connect calls, then hands out the screen.
    struct FlakyConnector {
        screen: FakeScreen,
        failures: RefCell<usize>,
    }

    impl FlakyConnector {
        fn new(screen: FakeScreen, failures: usize) -> Self {
            Self {
                screen,
                failures: RefCell::new(failures),
            }
        }
    }

    impl ScreenConnector for FlakyConnector {
        type Screen = FakeScreen;

        fn connect(&self) -> Result<FakeScreen> {
            let mut failures = self.failures.borrow_mut();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::Display("no device".into()));
            }
            Ok(self.screen.clone())
        }
    }

    fn quiet_logger() -> Logger {
        Logger::new(LogLevel::Error, None)
    }

    fn lines() -> Vec<DisplayLine> {
        vec![DisplayLine::new("IP: 10.0.0.1", 0)]
    }

    #[test]
    fn acquire_retries_until_the_connector_yields() {
        let screen = FakeScreen::default();
        let connector = FlakyConnector::new(screen.clone(), 3);
        let mut session =
            DisplaySession::new(connector, 0xff).with_retry_delay(Duration::from_millis(1));
        let running = AtomicBool::new(true);
        session.acquire(&quiet_logger(), &running);
        assert!(session.is_connected());
        assert_eq!(screen.inner.borrow().contrast, Some(0xff));
    }

    #[test]
    fn draw_fault_disconnects_and_surfaces() {
        let screen = FakeScreen::default();
        let connector = FlakyConnector::new(screen.clone(), 0);
        let mut session =
            DisplaySession::new(connector, 0x80).with_retry_delay(Duration::from_millis(1));
        let running = AtomicBool::new(true);
        session.acquire(&quiet_logger(), &running);

        screen.inner.borrow_mut().fail_next_draw = true;
        assert!(session.draw(&lines()).is_err());
        assert!(!session.is_connected());

        // Re-acquire replaces the handle and drawing works again.
        session.acquire(&quiet_logger(), &running);
        assert!(session.is_connected());
        session.draw(&lines()).unwrap();
        assert_eq!(screen.inner.borrow().frames.len(), 1);
    }

    #[test]
    fn draw_on_disconnected_session_is_an_error() {
        let connector = FlakyConnector::new(FakeScreen::default(), 0);
        let mut session = DisplaySession::new(connector, 0xff);
        assert!(session.draw(&lines()).is_err());
    }

    #[test]
    fn acquire_respects_the_shutdown_flag() {
        // A connector that never succeeds must not trap acquire once the
        // flag clears.
        let connector = FlakyConnector::new(FakeScreen::default(), usize::MAX);
        let mut session =
            DisplaySession::new(connector, 0xff).with_retry_delay(Duration::from_millis(1));
        let running = AtomicBool::new(false);
        session.acquire(&quiet_logger(), &running);
        assert!(!session.is_connected());
    }
}

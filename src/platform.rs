//! Native fullscreen capability
//!
//! The terminal implementation uses the xterm window manipulation
//! sequences (`CSI 10 ; 1 t` / `CSI 10 ; 0 t`). Terminals that ignore them
//! still get the in-app fullscreen player.
//!
//! Terminals do not report fullscreen changes. An exit started by the
//! window manager is inferred from a resize back to the windowed size; an
//! entry started outside the app is not noticed.

use std::io::Write;
use std::sync::Arc;

use crate::error::{AppError, Result};

const ENTER_FULLSCREEN: &[u8] = b"\x1b[10;1t";
const EXIT_FULLSCREEN: &[u8] = b"\x1b[10;0t";

pub type FullscreenListener = Arc<dyn Fn(bool) + Send + Sync>;

pub trait FullscreenCapability: Send {
    fn request_enter(&mut self) -> Result<()>;
    fn request_exit(&mut self) -> Result<()>;
    fn is_active(&self) -> bool;

    /// Called with every terminal size, including the initial one.
    fn on_resize(&mut self, _cols: u16, _rows: u16) {}
}

pub struct TerminalFullscreen {
    enabled: bool,
    active: bool,
    size: Option<(u16, u16)>,
    /// Size before entering; shrinking back to it means we left
    windowed_size: Option<(u16, u16)>,
    out: Box<dyn Write + Send>,
    on_change: FullscreenListener,
}

impl TerminalFullscreen {
    pub fn new(enabled: bool, on_change: FullscreenListener) -> Self {
        Self::with_writer(enabled, Box::new(std::io::stdout()), on_change)
    }

    pub fn with_writer(enabled: bool, out: Box<dyn Write + Send>, on_change: FullscreenListener) -> Self {
        Self {
            enabled,
            active: false,
            size: None,
            windowed_size: None,
            out,
            on_change,
        }
    }

    fn request(&mut self, active: bool) -> Result<()> {
        if !self.enabled {
            return Err(AppError::Platform("native fullscreen is disabled".to_string()));
        }
        let sequence = if active { ENTER_FULLSCREEN } else { EXIT_FULLSCREEN };
        self.out
            .write_all(sequence)
            .and_then(|_| self.out.flush())
            .map_err(|e| AppError::Platform(e.to_string()))?;

        tracing::debug!(active, "Requested terminal fullscreen change");
        self.windowed_size = if active { self.size } else { None };
        self.set_active(active);
        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        (self.on_change)(active);
    }
}

impl FullscreenCapability for TerminalFullscreen {
    fn request_enter(&mut self) -> Result<()> {
        self.request(true)
    }

    fn request_exit(&mut self) -> Result<()> {
        self.request(false)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.size = Some((cols, rows));
        let Some((windowed_cols, windowed_rows)) = self.windowed_size else {
            return;
        };
        if self.active && cols <= windowed_cols && rows <= windowed_rows {
            tracing::debug!(cols, rows, "Terminal left fullscreen on its own");
            self.windowed_size = None;
            self.set_active(false);
        }
    }
}

impl Drop for TerminalFullscreen {
    fn drop(&mut self) {
        if self.active {
            let _ = self.out.write_all(EXIT_FULLSCREEN);
            let _ = self.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_enter_and_exit_notify() {
        let buffer = Buffer::default();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        let mut fullscreen = TerminalFullscreen::with_writer(
            true,
            Box::new(buffer.clone()),
            Arc::new(move |active| sink.lock().unwrap().push(active)),
        );

        fullscreen.request_enter().unwrap();
        assert!(fullscreen.is_active());
        fullscreen.request_exit().unwrap();
        assert!(!fullscreen.is_active());

        assert_eq!(*changes.lock().unwrap(), vec![true, false]);
        assert_eq!(buffer.0.lock().unwrap().as_slice(), b"\x1b[10;1t\x1b[10;0t");
    }

    #[test]
    fn test_shrinking_back_reports_exit() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        let mut fullscreen = TerminalFullscreen::with_writer(
            true,
            Box::new(Buffer::default()),
            Arc::new(move |active| sink.lock().unwrap().push(active)),
        );

        fullscreen.on_resize(80, 24);
        fullscreen.request_enter().unwrap();
        fullscreen.on_resize(200, 60);
        assert!(fullscreen.is_active());

        fullscreen.on_resize(80, 24);
        assert!(!fullscreen.is_active());
        assert_eq!(*changes.lock().unwrap(), vec![true, false]);

        // Later resizes while windowed report nothing
        fullscreen.on_resize(70, 20);
        assert_eq!(changes.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_resize_without_known_size_is_ignored() {
        let mut fullscreen =
            TerminalFullscreen::with_writer(true, Box::new(Buffer::default()), Arc::new(|_| {}));
        fullscreen.request_enter().unwrap();
        fullscreen.on_resize(10, 5);
        assert!(fullscreen.is_active());
    }

    #[test]
    fn test_disabled_requests_fail() {
        let mut fullscreen =
            TerminalFullscreen::with_writer(false, Box::new(Buffer::default()), Arc::new(|_| {}));
        assert!(matches!(fullscreen.request_enter(), Err(AppError::Platform(_))));
        assert!(!fullscreen.is_active());
    }
}

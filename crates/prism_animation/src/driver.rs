//! Frame driver
//!
//! A background thread that invokes a frame callback at a target FPS while
//! transitions are running. The timing thread is independent of the caller's
//! event loop, so transitions keep advancing even when that loop is busy.
//! The thread is stopped and joined on drop; a dropped driver never leaves a
//! timer running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Background ticking thread driving per-frame callbacks
pub struct FrameDriver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameDriver {
    /// Spawn a driver calling `on_frame` at roughly `target_fps`
    ///
    /// The callback returns whether anything is still animating; idle frames
    /// back off to a slower poll interval.
    pub fn spawn<F>(target_fps: u32, on_frame: F) -> Self
    where
        F: Fn() -> bool + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let frame = Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)));
        let idle = frame * 4;

        let handle = std::thread::Builder::new()
            .name("prism-frame-driver".into())
            .spawn(move || {
                tracing::trace!(target_fps, "frame driver started");
                while flag.load(Ordering::SeqCst) {
                    let active = on_frame();
                    std::thread::sleep(if active { frame } else { idle });
                }
                tracing::trace!("frame driver stopped");
            })
            .expect("failed to spawn frame driver thread");

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the driver and wait for the thread to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn driver_ticks_until_dropped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let driver = FrameDriver::spawn(240, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        std::thread::sleep(Duration::from_millis(50));
        drop(driver);
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen > 0, "driver never ticked");

        // No further ticks after drop.
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut driver = FrameDriver::spawn(60, || false);
        driver.stop();
        driver.stop();
    }
}

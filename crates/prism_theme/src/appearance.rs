//! OS appearance capability
//!
//! The engine is a passive reader of the host platform's light/dark
//! preference: it asks an [`AppearanceSource`] for the current value and
//! registers a change listener that is removed exactly once when the
//! returned [`AppearanceSubscription`] drops.
//!
//! [`SimulatedAppearance`] is the programmable source used by tests and
//! previews; the `watcher` feature adds a polling bridge over the
//! best-effort [`detect_system_appearance`] probe.

use std::sync::{Arc, Mutex, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::mode::OsAppearance;

/// Callback invoked when the OS appearance changes
pub type AppearanceListener = Arc<dyn Fn(OsAppearance) + Send + Sync>;

new_key_type! {
    /// Registry key for an appearance listener
    pub struct ListenerId;
}

/// A source of the host platform's light/dark preference
pub trait AppearanceSource: Send + Sync {
    /// Read the current appearance
    fn current(&self) -> OsAppearance;

    /// Register a change listener; dropping the subscription unregisters it
    fn subscribe(&self, listener: AppearanceListener) -> AppearanceSubscription;
}

/// RAII handle for a registered appearance listener
///
/// Unregisters on drop, exactly once.
pub struct AppearanceSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl AppearanceSubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for AppearanceSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

#[derive(Default)]
struct ListenerRegistry {
    listeners: Mutex<SlotMap<ListenerId, AppearanceListener>>,
}

impl ListenerRegistry {
    fn insert(&self, listener: AppearanceListener) -> ListenerId {
        self.listeners.lock().unwrap().insert(listener)
    }

    fn remove(&self, id: ListenerId) {
        self.listeners.lock().unwrap().remove(id);
    }

    fn notify(&self, appearance: OsAppearance) {
        // Snapshot under the lock, call outside it: a listener may
        // re-enter subscribe/unsubscribe.
        let listeners: Vec<AppearanceListener> =
            self.listeners.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener(appearance);
        }
    }
}

struct SimulatedInner {
    appearance: Mutex<OsAppearance>,
    registry: ListenerRegistry,
}

/// Programmable appearance source for tests and previews
#[derive(Clone)]
pub struct SimulatedAppearance {
    inner: Arc<SimulatedInner>,
}

impl SimulatedAppearance {
    pub fn new(initial: OsAppearance) -> Self {
        Self {
            inner: Arc::new(SimulatedInner {
                appearance: Mutex::new(initial),
                registry: ListenerRegistry::default(),
            }),
        }
    }

    /// Change the simulated appearance, notifying listeners on change
    pub fn set(&self, appearance: OsAppearance) {
        {
            let mut current = self.inner.appearance.lock().unwrap();
            if *current == appearance {
                return;
            }
            *current = appearance;
        }
        self.inner.registry.notify(appearance);
    }
}

impl AppearanceSource for SimulatedAppearance {
    fn current(&self) -> OsAppearance {
        *self.inner.appearance.lock().unwrap()
    }

    fn subscribe(&self, listener: AppearanceListener) -> AppearanceSubscription {
        let id = self.inner.registry.insert(listener);
        let weak: Weak<SimulatedInner> = Arc::downgrade(&self.inner);
        AppearanceSubscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.registry.remove(id);
            }
        })
    }
}

/// Best-effort probe of the host platform's appearance
///
/// Returns `Unknown` whenever the preference cannot be read; the resolver
/// treats that as light.
pub fn detect_system_appearance() -> OsAppearance {
    detect_impl()
}

#[cfg(target_os = "macos")]
fn detect_impl() -> OsAppearance {
    // `AppleInterfaceStyle` is only present when dark mode is on.
    match std::process::Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
    {
        Ok(output) if output.status.success() => {
            if String::from_utf8_lossy(&output.stdout).trim() == "Dark" {
                OsAppearance::Dark
            } else {
                OsAppearance::Light
            }
        }
        Ok(_) => OsAppearance::Light,
        Err(_) => OsAppearance::Unknown,
    }
}

#[cfg(target_os = "linux")]
fn detect_impl() -> OsAppearance {
    match std::process::Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
    {
        Ok(output) if output.status.success() => {
            let scheme = String::from_utf8_lossy(&output.stdout);
            if scheme.contains("prefer-dark") {
                OsAppearance::Dark
            } else if scheme.contains("prefer-light") || scheme.contains("default") {
                OsAppearance::Light
            } else {
                OsAppearance::Unknown
            }
        }
        _ => OsAppearance::Unknown,
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn detect_impl() -> OsAppearance {
    OsAppearance::Unknown
}

#[cfg(feature = "watcher")]
pub use watcher::PollingAppearanceWatcher;

#[cfg(feature = "watcher")]
mod watcher {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread::JoinHandle;
    use std::time::Duration;

    struct WatcherInner {
        last: Mutex<OsAppearance>,
        registry: ListenerRegistry,
    }

    /// Polls an appearance probe on a background thread and fans out changes
    pub struct PollingAppearanceWatcher {
        inner: Arc<WatcherInner>,
        running: Arc<AtomicBool>,
        handle: Option<JoinHandle<()>>,
    }

    impl PollingAppearanceWatcher {
        /// Watch the system probe at the given poll interval
        pub fn system(interval: Duration) -> Self {
            Self::with_probe(interval, detect_system_appearance)
        }

        /// Watch a custom probe
        pub fn with_probe<F>(interval: Duration, probe: F) -> Self
        where
            F: Fn() -> OsAppearance + Send + 'static,
        {
            let inner = Arc::new(WatcherInner {
                last: Mutex::new(probe()),
                registry: ListenerRegistry::default(),
            });
            let running = Arc::new(AtomicBool::new(true));

            let thread_inner = Arc::clone(&inner);
            let flag = Arc::clone(&running);
            let handle = std::thread::Builder::new()
                .name("prism-appearance-watcher".into())
                .spawn(move || {
                    while flag.load(Ordering::SeqCst) {
                        std::thread::sleep(interval);
                        if !flag.load(Ordering::SeqCst) {
                            break;
                        }
                        let seen = probe();
                        let changed = {
                            let mut last = thread_inner.last.lock().unwrap();
                            if *last != seen {
                                *last = seen;
                                true
                            } else {
                                false
                            }
                        };
                        if changed {
                            tracing::debug!(?seen, "system appearance changed");
                            thread_inner.registry.notify(seen);
                        }
                    }
                })
                .expect("failed to spawn appearance watcher thread");

            Self {
                inner,
                running,
                handle: Some(handle),
            }
        }
    }

    impl AppearanceSource for PollingAppearanceWatcher {
        fn current(&self) -> OsAppearance {
            *self.inner.last.lock().unwrap()
        }

        fn subscribe(&self, listener: AppearanceListener) -> AppearanceSubscription {
            let id = self.inner.registry.insert(listener);
            let weak = Arc::downgrade(&self.inner);
            AppearanceSubscription::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.registry.remove(id);
                }
            })
        }
    }

    impl Drop for PollingAppearanceWatcher {
        fn drop(&mut self) {
            self.running.store(false, Ordering::SeqCst);
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

//! Theme engine
//!
//! Owns the user's mode, the lifecycle gate, and the animated background
//! color. Construction issues the persisted-mode read immediately; until it
//! settles the engine is in [`LifecyclePhase::Loading`] and [`snapshot`]
//! returns `None`, so no consumer can render an unresolved palette. Once
//! `Ready`, `set_mode`/`toggle_theme` commit synchronously, animate the
//! background, and persist in the background without blocking the caller.
//!
//! [`snapshot`]: ThemeEngine::snapshot

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use prism_animation::{AnimatedColor, AnimatedColorReader, Easing, FrameDriver};
use slotmap::{new_key_type, SlotMap};
use tokio::sync::watch;

use crate::appearance::{AppearanceSource, AppearanceSubscription};
use crate::mode::{resolve_is_dark, OsAppearance, ThemeMode};
use crate::palette::{palette_for, Palette};
use crate::store::{ThemeStore, MODE_STORAGE_KEY};

new_key_type! {
    /// Registry key for a snapshot subscriber
    pub struct SubscriberId;
}

/// Callback receiving a fresh snapshot after every engine mutation
pub type SnapshotListener = Arc<dyn Fn(&ThemeSnapshot) + Send + Sync>;

/// Callback requesting a redraw while the background is animating
pub type RedrawCallback = Arc<dyn Fn() + Send + Sync>;

/// Immutable view of the resolved theme published to subscribers
#[derive(Clone)]
pub struct ThemeSnapshot {
    pub mode: ThemeMode,
    pub is_dark: bool,
    pub palette: Palette,
    /// Read-only handle to the animated background color
    pub background: AnimatedColorReader,
}

/// Engine lifecycle: the persisted-mode read gates rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Initial persisted-mode read in flight; descendants must not render
    Loading,
    /// Mode resolved; terminal for the lifecycle gate
    Ready,
}

/// Engine construction options
#[derive(Clone)]
pub struct EngineConfig {
    /// Storage key holding the persisted mode
    pub storage_key: String,
    /// Duration of the background transition on explicit mode changes
    pub transition: Duration,
    /// Easing curve for the background transition
    pub easing: Easing,
    /// Target FPS for the redraw driver (only used with `on_frame`)
    pub redraw_fps: u32,
    /// Redraw callback pumped while the background animates
    pub on_frame: Option<RedrawCallback>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: MODE_STORAGE_KEY.to_owned(),
            transition: Duration::from_millis(300),
            easing: Easing::EaseOutQuad,
            redraw_fps: 60,
            on_frame: None,
        }
    }
}

struct EngineInner {
    mode: RwLock<ThemeMode>,
    os_appearance: RwLock<OsAppearance>,
    phase: RwLock<LifecyclePhase>,
    background: AnimatedColor,
    subscribers: Mutex<SlotMap<SubscriberId, SnapshotListener>>,
    store: Arc<dyn ThemeStore>,
    storage_key: String,
    transition: Duration,
    easing: Easing,
    ready_tx: watch::Sender<bool>,
}

impl EngineInner {
    fn is_ready(&self) -> bool {
        *self.phase.read().unwrap() == LifecyclePhase::Ready
    }

    fn resolved_is_dark(&self) -> bool {
        resolve_is_dark(
            *self.mode.read().unwrap(),
            *self.os_appearance.read().unwrap(),
        )
    }

    fn make_snapshot(&self) -> ThemeSnapshot {
        let mode = *self.mode.read().unwrap();
        let is_dark = resolve_is_dark(mode, *self.os_appearance.read().unwrap());
        ThemeSnapshot {
            mode,
            is_dark,
            palette: palette_for(is_dark),
            background: self.background.reader(),
        }
    }

    fn publish(&self) {
        let snapshot = self.make_snapshot();
        // Snapshot the listener list so callbacks can re-enter
        // subscribe/unsubscribe without deadlocking.
        let listeners: Vec<SnapshotListener> =
            self.subscribers.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Loading -> Ready, exactly once
    fn finish_load(&self, stored: Option<ThemeMode>) {
        {
            let mut phase = self.phase.write().unwrap();
            if *phase == LifecyclePhase::Ready {
                return;
            }
            if let Some(mode) = stored {
                *self.mode.write().unwrap() = mode;
            }
            let is_dark = self.resolved_is_dark();
            // Seed the background before the gate opens; the first thing
            // any consumer reads is already the resolved color.
            self.background.set(palette_for(is_dark).background);
            *phase = LifecyclePhase::Ready;
        }
        tracing::debug!(mode = %*self.mode.read().unwrap(), "theme mode resolved");
        let _ = self.ready_tx.send(true);
        self.publish();
    }

    fn set_mode(&self, mode: ThemeMode) {
        if !self.is_ready() {
            tracing::warn!(%mode, "set_mode before initial load resolved; ignoring");
            return;
        }

        let is_dark = resolve_is_dark(mode, *self.os_appearance.read().unwrap());
        // The transition starts and the mode commits before control returns,
        // so palette-dependent re-renders and the animation begin together.
        self.background.animate_to(
            palette_for(is_dark).background,
            self.transition,
            self.easing,
        );
        *self.mode.write().unwrap() = mode;
        tracing::debug!(%mode, is_dark, "theme mode changed");
        self.publish();

        // Persistence is best-effort and never blocks the visual change.
        let store = Arc::clone(&self.store);
        let key = self.storage_key.clone();
        tokio::spawn(async move {
            if let Err(err) = store.set(&key, mode.id()).await {
                tracing::warn!(error = %err, "failed to persist theme mode");
            }
        });
    }

    fn handle_os_change(&self, appearance: OsAppearance) {
        *self.os_appearance.write().unwrap() = appearance;
        if !self.is_ready() {
            return;
        }
        if *self.mode.read().unwrap() != ThemeMode::System {
            return;
        }
        // OS-driven changes snap; the animated transition is reserved for
        // explicit user intent.
        let is_dark = resolve_is_dark(ThemeMode::System, appearance);
        self.background.set(palette_for(is_dark).background);
        tracing::debug!(?appearance, "following system appearance change");
        self.publish();
    }
}

/// The theme resolution and persistence engine
///
/// Construct one instance at process start, inside a Tokio runtime, and hand
/// it to the rendering tree root. Dropping the engine unregisters the OS
/// appearance listener and stops the redraw driver.
pub struct ThemeEngine {
    inner: Arc<EngineInner>,
    ready_rx: watch::Receiver<bool>,
    _appearance_subscription: AppearanceSubscription,
    _driver: Option<FrameDriver>,
}

impl ThemeEngine {
    /// Create the engine and issue the persisted-mode read
    ///
    /// The engine starts in `Loading` with a provisional `System` mode.
    /// Await [`ready`](Self::ready) before rendering themed content.
    pub fn new(
        store: Arc<dyn ThemeStore>,
        appearance: Arc<dyn AppearanceSource>,
        config: EngineConfig,
    ) -> Self {
        let EngineConfig {
            storage_key,
            transition,
            easing,
            redraw_fps,
            on_frame,
        } = config;
        let (ready_tx, ready_rx) = watch::channel(false);

        let inner = Arc::new(EngineInner {
            mode: RwLock::new(ThemeMode::System),
            os_appearance: RwLock::new(appearance.current()),
            phase: RwLock::new(LifecyclePhase::Loading),
            background: AnimatedColor::new(Palette::light().background),
            subscribers: Mutex::new(SlotMap::with_key()),
            store,
            storage_key,
            transition,
            easing,
            ready_tx,
        });

        let listener_inner = Arc::clone(&inner);
        let subscription = appearance.subscribe(Arc::new(move |a| {
            listener_inner.handle_os_change(a);
        }));

        let driver = on_frame.map(|callback| {
            let reader = inner.background.reader();
            FrameDriver::spawn(redraw_fps, move || {
                if reader.is_animating() {
                    callback();
                    true
                } else {
                    false
                }
            })
        });

        let load_inner = Arc::clone(&inner);
        tokio::spawn(async move {
            let stored = match load_inner.store.get(&load_inner.storage_key).await {
                Ok(value) => value.as_deref().and_then(ThemeMode::from_id),
                Err(err) => {
                    // Degrade silently to the default mode.
                    tracing::warn!(error = %err, "failed to read persisted theme mode");
                    None
                }
            };
            load_inner.finish_load(stored);
        });

        Self {
            inner,
            ready_rx,
            _appearance_subscription: subscription,
            _driver: driver,
        }
    }

    /// Wait for the initial persisted-mode read to settle
    pub async fn ready(&self) {
        let mut rx = self.ready_rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> LifecyclePhase {
        *self.inner.phase.read().unwrap()
    }

    /// Whether the initial persisted-mode read has settled
    pub fn is_loaded(&self) -> bool {
        self.inner.is_ready()
    }

    /// The resolved theme, or `None` while still loading
    ///
    /// This is the loading gate: consumers render nothing until this
    /// returns `Some`.
    pub fn snapshot(&self) -> Option<ThemeSnapshot> {
        self.inner.is_ready().then(|| self.inner.make_snapshot())
    }

    /// The user's stored preference
    pub fn mode(&self) -> ThemeMode {
        *self.inner.mode.read().unwrap()
    }

    /// The effective appearance after resolving against the OS signal
    pub fn is_dark(&self) -> bool {
        self.inner.resolved_is_dark()
    }

    /// The active palette
    pub fn palette(&self) -> Palette {
        palette_for(self.is_dark())
    }

    /// Read-only handle to the animated background color
    pub fn background(&self) -> AnimatedColorReader {
        self.inner.background.reader()
    }

    /// Set the user's mode, animating the background transition
    ///
    /// Commits in memory synchronously; persistence runs in the background
    /// and a failed write never rolls the mode back. Ignored (with a warning)
    /// while still loading.
    pub fn set_mode(&self, mode: ThemeMode) {
        self.inner.set_mode(mode);
    }

    /// Flip to the opposite of the current *effective* appearance
    ///
    /// Under `System` mode this commits an explicit choice and exits
    /// system-following.
    pub fn toggle_theme(&self) {
        let target = if self.is_dark() {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        self.set_mode(target);
    }

    /// Register a snapshot listener; fires after every mutation
    pub fn subscribe(&self, listener: SnapshotListener) -> SubscriberId {
        self.inner.subscribers.lock().unwrap().insert(listener)
    }

    /// Remove a snapshot listener
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.subscribers.lock().unwrap().remove(id);
    }
}

//! Prism Theme Engine
//!
//! Decides which color palette the application renders with, reconciling
//! three signals: the persisted user preference, the live OS appearance,
//! and in-flight user toggles.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prism_theme::{EngineConfig, MemoryStore, SimulatedAppearance, ThemeEngine};
//!
//! let store = Arc::new(MemoryStore::new());
//! let os = Arc::new(SimulatedAppearance::new(Default::default()));
//! let engine = ThemeEngine::new(store, os, EngineConfig::default());
//!
//! // Gate rendering on the initial persisted-mode read.
//! engine.ready().await;
//! let snapshot = engine.snapshot().expect("ready");
//! let bg = snapshot.background.get();
//! ```
//!
//! # Architecture
//!
//! - [`mode`]: `ThemeMode` / `OsAppearance` enums and the pure resolver.
//! - [`palette`]: named color tokens, one complete set per appearance.
//! - [`store`]: the async persistence capability plus memory/file stores.
//! - [`appearance`]: the OS appearance capability and its test double.
//! - [`engine`]: the orchestrating state machine with the loading gate,
//!   snapshot subscribers, and the animated background bridge.
//!
//! Persistence is best-effort by design: a read failure falls back to
//! `System`, a write failure is logged and dropped, and neither ever
//! surfaces as a user-visible error.

pub mod appearance;
pub mod engine;
pub mod mode;
pub mod palette;
pub mod store;

// Re-export commonly used types
pub use appearance::{
    detect_system_appearance, AppearanceListener, AppearanceSource, AppearanceSubscription,
    SimulatedAppearance,
};
pub use engine::{
    EngineConfig, LifecyclePhase, RedrawCallback, SnapshotListener, SubscriberId, ThemeEngine,
    ThemeSnapshot,
};
pub use mode::{resolve_is_dark, OsAppearance, ThemeMode};
pub use palette::{palette_for, Palette, PaletteToken};
pub use store::{FileStore, MemoryStore, StoreError, ThemeStore, MODE_STORAGE_KEY};

#[cfg(feature = "watcher")]
pub use appearance::PollingAppearanceWatcher;

//! Theme mode state, persistence and propagation to the renderer.

use crate::observable::{Observable, SubscriptionId};
use crate::storage::KeyValueStore;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

pub const STORAGE_KEY: &str = "ppl.theme.mode";

/// The user's choice. `System` follows the OS preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme mode: {0:?}")]
pub struct ParseThemeModeError(pub String);

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::System, ThemeMode::Light, ThemeMode::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(ThemeMode::System),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(ParseThemeModeError(other.to_string())),
        }
    }
}

/// What actually gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    /// Marker name set on the root rendering context.
    pub fn marker(&self) -> &'static str {
        match self {
            EffectiveTheme::Light => "theme-light",
            EffectiveTheme::Dark => "theme-dark",
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("no rendering context")]
    Unavailable,

    #[error("rendering context rejected the update: {0}")]
    Rejected(String),
}

/// The root surface the theme is applied to.
pub trait RenderContext {
    fn set_theme_marker(&self, theme: EffectiveTheme) -> Result<(), RenderError>;

    /// Current background color, if the renderer exposes one.
    fn background_color(&self) -> Result<Option<String>, RenderError> {
        Ok(None)
    }

    /// Auxiliary color hint kept in sync with the background.
    fn set_theme_color(&self, _color: &str) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Source of the OS color-scheme preference.
pub trait SystemScheme {
    /// `None` when the platform does not report a preference.
    fn current(&self) -> Option<EffectiveTheme>;
}

/// No renderer and no OS preference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl RenderContext for Headless {
    fn set_theme_marker(&self, _theme: EffectiveTheme) -> Result<(), RenderError> {
        Ok(())
    }
}

impl SystemScheme for Headless {
    fn current(&self) -> Option<EffectiveTheme> {
        None
    }
}

/// OS preference cell that an event loop updates and the controller reads.
#[derive(Debug, Clone, Default)]
pub struct SharedScheme(Rc<Cell<Option<EffectiveTheme>>>);

impl SharedScheme {
    pub fn new(initial: Option<EffectiveTheme>) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    /// Returns true if the stored preference changed.
    pub fn set(&self, theme: Option<EffectiveTheme>) -> bool {
        self.0.replace(theme) != theme
    }
}

impl SystemScheme for SharedScheme {
    fn current(&self) -> Option<EffectiveTheme> {
        self.0.get()
    }
}

/// Published to observers after every mode change or OS-driven re-resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChange {
    pub mode: ThemeMode,
    pub effective: EffectiveTheme,
}

pub fn resolve(mode: ThemeMode, scheme: &impl SystemScheme) -> EffectiveTheme {
    match mode {
        ThemeMode::Light => EffectiveTheme::Light,
        ThemeMode::Dark => EffectiveTheme::Dark,
        ThemeMode::System => scheme.current().unwrap_or(EffectiveTheme::Light),
    }
}

pub struct ThemeController<S, R, P> {
    store: S,
    render: R,
    scheme: P,
    state: Observable<ThemeChange>,
}

impl<S, R, P> ThemeController<S, R, P>
where
    S: KeyValueStore,
    R: RenderContext,
    P: SystemScheme,
{
    /// Restores the persisted mode and applies it. The returned controller
    /// expects [`handle_system_change`](Self::handle_system_change) whenever
    /// the OS preference changes.
    pub fn initialize(store: S, render: R, scheme: P) -> Self {
        let mode = load_mode(&store);
        let effective = resolve(mode, &scheme);
        let controller = Self {
            store,
            render,
            scheme,
            state: Observable::new(ThemeChange { mode, effective }),
        };
        controller.apply(effective);
        debug!(%mode, ?effective, "theme initialized");
        controller
    }

    pub fn mode(&self) -> ThemeMode {
        self.state.get().mode
    }

    /// Resolved against the live OS preference; never `System`.
    pub fn effective_theme(&self) -> EffectiveTheme {
        resolve(self.mode(), &self.scheme)
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        if let Err(e) = self.store.set(STORAGE_KEY, mode.as_str()) {
            warn!(error = %e, %mode, "could not persist theme mode");
        }
        let effective = resolve(mode, &self.scheme);
        self.apply(effective);
        debug!(%mode, ?effective, "theme mode set");
        self.state.set(ThemeChange { mode, effective });
    }

    /// OS color-scheme notification. Only acts while following the system.
    pub fn handle_system_change(&mut self) {
        let mode = self.mode();
        if mode != ThemeMode::System {
            return;
        }
        let effective = resolve(mode, &self.scheme);
        self.apply(effective);
        self.state.set(ThemeChange { mode, effective });
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ThemeChange) + 'static) -> SubscriptionId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn scheme(&self) -> &P {
        &self.scheme
    }

    fn apply(&self, theme: EffectiveTheme) {
        if let Err(e) = self.render.set_theme_marker(theme) {
            debug!(error = %e, "theme marker not applied");
        }
        match self.render.background_color() {
            Ok(Some(color)) if !color.trim().is_empty() => {
                if let Err(e) = self.render.set_theme_color(color.trim()) {
                    debug!(error = %e, "theme color not applied");
                }
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "background color unavailable"),
        }
    }
}

fn load_mode(store: &impl KeyValueStore) -> ThemeMode {
    match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: ParseThemeModeError| {
            debug!(error = %e, "ignoring stored theme mode");
            ThemeMode::System
        }),
        Ok(None) => ThemeMode::System,
        Err(e) => {
            warn!(error = %e, "could not read theme mode");
            ThemeMode::System
        }
    }
}

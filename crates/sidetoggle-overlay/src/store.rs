use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::{fs, io, path::Path, path::PathBuf};
use thiserror::Error;
use tracing::warn;

const APP_HOME_DIR: &str = ".sidetoggle";
const PREFERENCES_FILE: &str = "preferences.json";

/// The two settings that survive a page reload.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// The user hid the sidebar.
    pub is_hidden: bool,
    /// Show the button even when the sidebar is not in the way.
    pub button_always_displayed: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference file I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no location available for the preference file")]
    NoLocation,
}

/// Key-value persistence for [`Preferences`].
pub trait PreferenceStore {
    /// Read the stored preferences. Missing data reads as defaults.
    fn load(&mut self) -> Result<Preferences, StoreError>;

    fn store(&mut self, preferences: &Preferences) -> Result<(), StoreError>;
}

/// Preferences kept in a JSON file.
///
/// Unreadable or corrupt files are logged and treated as empty; writes are
/// skipped when nothing changed since the last load or store.
pub struct JsonPreferenceStore {
    path: PathBuf,
    last: Option<Preferences>,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: None,
        }
    }

    /// `~/.sidetoggle/preferences.json`, or the current directory when there
    /// is no home directory.
    pub fn default_location() -> Result<Self, StoreError> {
        Ok(Self::new(storage_path()?))
    }

    /// Use `path` when given, the default location otherwise.
    pub fn at_or_default(path: Option<&Path>) -> Result<Self, StoreError> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_location(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&mut self) -> Result<Preferences, StoreError> {
        let path = &self.path;
        let preferences = match fs::read(path) {
            Ok(data) => match serde_json::from_slice::<Preferences>(&data) {
                Ok(parsed) => parsed,
                Err(error) => {
                    warn!(?error, ?path, "failed to parse persisted preferences");
                    Preferences::default()
                }
            },
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    warn!(?error, ?path, "failed to read persisted preferences");
                }
                Preferences::default()
            }
        };

        self.last = Some(preferences);
        Ok(preferences)
    }

    fn store(&mut self, preferences: &Preferences) -> Result<(), StoreError> {
        if self.last.as_ref() == Some(preferences) {
            return Ok(());
        }

        write_preferences(&self.path, preferences)?;
        self.last = Some(*preferences);
        Ok(())
    }
}

fn storage_path() -> Result<PathBuf, StoreError> {
    if let Some(mut home) = dirs::home_dir() {
        home.push(APP_HOME_DIR);
        home.push(PREFERENCES_FILE);
        Ok(home)
    } else {
        let mut cwd = std::env::current_dir().map_err(|_| StoreError::NoLocation)?;
        cwd.push(PREFERENCES_FILE);
        Ok(cwd)
    }
}

fn write_preferences(path: &Path, preferences: &Preferences) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let json = serde_json::to_string_pretty(preferences)?;
    fs::write(path, json).map_err(io_error)?;
    Ok(())
}

/// In-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    preferences: Rc<RefCell<Preferences>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(preferences: Preferences) -> Self {
        let store = Self::new();
        *store.preferences.borrow_mut() = preferences;
        store
    }

    pub fn current(&self) -> Preferences {
        *self.preferences.borrow()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&mut self) -> Result<Preferences, StoreError> {
        Ok(self.current())
    }

    fn store(&mut self, preferences: &Preferences) -> Result<(), StoreError> {
        *self.preferences.borrow_mut() = *preferences;
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use ron::value::{Map as RonMap, Value as RonValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use util::ResultExt;

use crate::{Settings, SettingsError};

fn to_ron_value<T: Serialize>(value: &T) -> Result<RonValue, SettingsError> {
    let s = ron::to_string(value)?;
    Ok(ron::from_str(&s)?)
}

fn to_section_map<T: Serialize>(value: &T) -> Result<RonMap, SettingsError> {
    match to_ron_value(value)? {
        RonValue::Map(m) => Ok(m),
        _ => Err(SettingsError::Invalid("section must serialize to a map")),
    }
}

fn from_ron_value<T: DeserializeOwned>(value: &RonValue) -> Result<T, SettingsError> {
    Ok(value.clone().into_rust()?)
}

/// Merge default + delta recursively (maps only).
fn merge_maps(default: &RonMap, delta: &RonMap) -> RonMap {
    let mut merged = default.clone();
    for (k, v_delta) in delta.iter() {
        let next = match (merged.get(k), v_delta) {
            (Some(RonValue::Map(def_m)), RonValue::Map(delta_m)) => {
                RonValue::Map(merge_maps(def_m, delta_m))
            }
            _ => v_delta.clone(),
        };
        merged.insert(k.clone(), next);
    }
    merged
}

/// Recursive diff of `new_v` against `default_v`; `None` when identical.
fn diff_value(new_v: &RonValue, default_v: &RonValue) -> Option<RonValue> {
    match (new_v, default_v) {
        (RonValue::Map(new_m), RonValue::Map(def_m)) => {
            let diff_m = diff_map(new_m, def_m);
            (!diff_m.is_empty()).then_some(RonValue::Map(diff_m))
        }
        _ => (new_v != default_v).then(|| new_v.clone()),
    }
}

fn diff_map(new_m: &RonMap, def_m: &RonMap) -> RonMap {
    let mut out = RonMap::new();
    for (k, new_v) in new_m.iter() {
        match def_m.get(k) {
            Some(def_v) => {
                if let Some(d) = diff_value(new_v, def_v) {
                    out.insert(k.clone(), d);
                }
            }
            None => {
                out.insert(k.clone(), new_v.clone());
            }
        }
    }
    out
}

fn merged(default_map: &RonMap, delta: Option<&RonValue>) -> RonValue {
    match delta {
        Some(RonValue::Map(delta_m)) => RonValue::Map(merge_maps(default_map, delta_m)),
        Some(other) => {
            warn!(?other, "settings delta is not a map, using defaults");
            RonValue::Map(default_map.clone())
        }
        None => RonValue::Map(default_map.clone()),
    }
}

fn read_deltas(path: &Path) -> Result<HashMap<String, RonValue>, SettingsError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(ron::from_str(&content)?)
}

/// Builder for [`SettingsStore`]. Without a file the store lives in memory only.
#[derive(Debug, Default)]
pub struct SettingsStoreBuilder {
    settings_file: Option<PathBuf>,
}

impl SettingsStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SettingsStore, SettingsError> {
        let deltas = match &self.settings_file {
            Some(file_path) => {
                if let Some(dir) = file_path.parent() {
                    if !dir.as_os_str().is_empty() && !dir.exists() {
                        fs::create_dir_all(dir)?;
                    }
                }
                read_deltas(file_path)?
            }
            None => HashMap::new(),
        };
        debug!(file = ?self.settings_file, sections = deltas.len(), "settings store opened");

        Ok(SettingsStore {
            file_path: self.settings_file,
            deltas: RwLock::new(deltas),
            defaults: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
        })
    }
}

/// Thread-safe settings store keeping defaults, user deltas and merged values per section.
pub struct SettingsStore {
    file_path: Option<PathBuf>,
    deltas: RwLock<HashMap<String, RonValue>>,
    defaults: RwLock<HashMap<&'static str, RonMap>>,
    values: RwLock<HashMap<&'static str, RonValue>>,
}

impl SettingsStore {
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    /// Store without a backing file; updates stay in memory.
    pub fn in_memory() -> Self {
        Self {
            file_path: None,
            deltas: RwLock::new(HashMap::new()),
            defaults: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_registered<T: Settings>(&self) -> bool {
        self.values.read().contains_key(T::SECTION)
    }

    /// Register a section: loads its defaults and applies a stored delta if present.
    pub fn register<T>(&self) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
    {
        let section = T::SECTION;
        if self.is_registered::<T>() {
            return Err(SettingsError::AlreadyRegistered(section));
        }

        let default_map = to_section_map(&T::default())?;
        let value = merged(&default_map, self.deltas.read().get(section));
        // Reject deltas that no longer deserialize instead of failing on every `get`.
        let value = match from_ron_value::<T>(&value).log_err_with(section) {
            Some(_) => value,
            None => RonValue::Map(default_map.clone()),
        };

        self.defaults.write().insert(section, default_map);
        self.values.write().insert(section, value);
        debug!(section, "settings section registered");
        Ok(())
    }

    /// Snapshot of the effective value.
    pub fn get<T>(&self) -> Result<Arc<T>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        self.try_get::<T>()?
            .ok_or(SettingsError::NotRegistered(T::SECTION))
    }

    /// Like [`get`](Self::get), `None` if the section is not registered.
    pub fn try_get<T>(&self) -> Result<Option<Arc<T>>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        let values = self.values.read();
        let Some(value) = values.get(T::SECTION) else {
            return Ok(None);
        };
        Ok(Some(Arc::new(from_ron_value(value)?)))
    }

    /// Update via mutable closure. Only the recursive delta to the defaults is persisted.
    pub fn update<T, F>(&self, mutator: F) -> Result<(), SettingsError>
    where
        T: Settings + Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let section = T::SECTION;
        let mut current: T = {
            let values = self.values.read();
            let raw = values
                .get(section)
                .ok_or(SettingsError::NotRegistered(section))?;
            from_ron_value(raw)?
        };
        mutator(&mut current);

        let new_map = to_section_map(&current)?;
        let diff_root = {
            let defaults = self.defaults.read();
            let default_map = defaults
                .get(section)
                .ok_or(SettingsError::NotRegistered(section))?;
            diff_map(&new_map, default_map)
        };

        self.values.write().insert(section, RonValue::Map(new_map));
        {
            let mut deltas = self.deltas.write();
            if diff_root.is_empty() {
                deltas.remove(section);
            } else {
                deltas.insert(section.to_string(), RonValue::Map(diff_root));
            }
        }

        self.persist_deltas()
    }

    /// Re-read the delta file and re-merge all registered sections.
    pub fn reload(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let new_deltas = read_deltas(path)?;

        let defaults = self.defaults.read();
        let mut values = self.values.write();
        for (section, default_map) in defaults.iter() {
            values.insert(*section, merged(default_map, new_deltas.get(*section)));
        }
        *self.deltas.write() = new_deltas;
        debug!(path = %path.display(), "settings reloaded");
        Ok(())
    }

    fn persist_deltas(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let clean: HashMap<String, RonValue> = self
            .deltas
            .read()
            .iter()
            .filter(|(_, v)| !matches!(v, RonValue::Map(m) if m.is_empty()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let pretty = ron::ser::PrettyConfig::default();
        let ron_string = ron::ser::to_string_pretty(&clean, pretty)?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, ron_string)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

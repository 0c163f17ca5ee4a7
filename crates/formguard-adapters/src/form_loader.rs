//! TOML form definitions.
//!
//! A form file declares the inputs of a form and the rules guarding each one.
//! [`FormLoader`] parses and checks it; [`FormDefinition::mount`] creates an
//! in-memory input per field and registers it with a [`ValidationManager`].
//!
//! # Format
//!
//! ```toml
//! [form]
//! name = "signup"
//! description = "Account creation"     # optional
//!
//! [[fields]]
//! id    = "username"
//! kind  = "text-field"                 # text-field | text-view | object
//! value = "ada"                        # optional initial content
//! rules = [{ type = "non-empty" }, { type = "length", min = 3, max = 16 }]
//!
//! [[fields]]
//! id      = "terms"
//! kind    = "object"
//! event   = "terms-toggled"            # required for objects
//! enabled = false                      # optional, default true
//! rules   = [{ type = "equals", value = "accepted" }]
//! ```

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use formguard_core::{
    application::{InputSource, ValidationManager, ValidationUnit},
    domain::{EventName, SourceKind, UnitId},
    error::{FormguardError, FormguardResult},
};

use crate::{
    rules::{RuleSpec, build_all},
    source::{MemoryTextField, MemoryTextView, ObservableObject},
};

#[derive(Debug, Error)]
pub enum FormLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse form: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid form: {0}")]
    Invalid(String),
}

/// Deserialised form file.
#[derive(Debug, Clone, Deserialize)]
pub struct FormDefinition {
    pub form: FormSection,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// `[form]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FormSection {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One `[[fields]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub kind: SourceKind,
    /// Overrides the kind's default change event.
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl FieldDefinition {
    fn event(&self) -> Result<EventName, FormLoadError> {
        let explicit = self
            .event
            .as_deref()
            .map(EventName::new)
            .transpose()
            .map_err(|e| FormLoadError::Invalid(format!("field '{}': {e}", self.id)))?;
        self.kind
            .resolve_event(explicit)
            .map_err(|e| FormLoadError::Invalid(format!("field '{}': {e}", self.id)))
    }

    fn mount(&self, manager: &ValidationManager, form: &mut MountedForm) -> FormguardResult<()> {
        let id = UnitId::new(self.id.as_str())?;
        let event = self.event().map_err(|e| FormguardError::Configuration {
            message: e.to_string(),
        })?;
        let rules = build_all(&self.rules)?;

        let input = MountedInput::new(self.kind, event.clone());
        let unit = manager.register_source(
            self.kind,
            input.as_source(),
            rules,
            Some(event),
            Some(id.clone()),
        )?;

        input.set(&self.value);
        if !self.enabled {
            unit.set_enabled(false);
        }

        debug!(field = %id, kind = %self.kind, "mounted field");
        form.inputs.insert(id.clone(), input);
        form.units.insert(id, unit);
        Ok(())
    }
}

pub struct FormLoader;

impl FormLoader {
    /// Parse and check a form definition.
    ///
    /// # Errors
    /// [`FormLoadError::Parse`] on malformed TOML, [`FormLoadError::Invalid`]
    /// on blank or duplicate ids, objects without an event, or rules that
    /// cannot be built.
    pub fn from_str(source: &str) -> Result<FormDefinition, FormLoadError> {
        let definition: FormDefinition = toml::from_str(source)?;
        Self::check(&definition)?;
        debug!(
            form = %definition.form.name,
            fields = definition.fields.len(),
            "loaded form definition"
        );
        Ok(definition)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<FormDefinition, FormLoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| FormLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&raw)
    }

    fn check(definition: &FormDefinition) -> Result<(), FormLoadError> {
        if definition.form.name.trim().is_empty() {
            return Err(FormLoadError::Invalid("form name must not be blank".into()));
        }

        let mut seen = HashSet::new();
        for field in &definition.fields {
            UnitId::new(field.id.as_str())
                .map_err(|e| FormLoadError::Invalid(format!("field id '{}': {e}", field.id)))?;
            if !seen.insert(field.id.as_str()) {
                return Err(FormLoadError::Invalid(format!(
                    "duplicate field id '{}'",
                    field.id
                )));
            }
            field.event()?;
            build_all(&field.rules)
                .map_err(|e| FormLoadError::Invalid(format!("field '{}': {e}", field.id)))?;
        }
        Ok(())
    }
}

/// Concrete input created for a mounted field.
#[derive(Clone)]
pub enum MountedInput {
    TextField(Arc<MemoryTextField>),
    TextView(Arc<MemoryTextView>),
    Object(Arc<ObservableObject>, EventName),
}

impl MountedInput {
    fn new(kind: SourceKind, event: EventName) -> Self {
        match kind {
            SourceKind::TextField => {
                Self::TextField(Arc::new(MemoryTextField::new().posting(event)))
            }
            SourceKind::TextView => Self::TextView(Arc::new(MemoryTextView::new().posting(event))),
            SourceKind::Object => Self::Object(Arc::new(ObservableObject::new("")), event),
        }
    }

    fn as_source(&self) -> Arc<dyn InputSource> {
        match self {
            Self::TextField(field) => Arc::clone(field) as Arc<dyn InputSource>,
            Self::TextView(view) => Arc::clone(view) as Arc<dyn InputSource>,
            Self::Object(object, _) => Arc::clone(object) as Arc<dyn InputSource>,
        }
    }

    /// Replace the content and post the change event.
    pub fn set(&self, value: &str) -> usize {
        match self {
            Self::TextField(field) => field.set_text(value),
            Self::TextView(view) => view.set_text(value),
            Self::Object(object, event) => object.update(value, event),
        }
    }

    pub fn content(&self) -> String {
        self.as_source().content()
    }
}

/// A form whose fields are registered with a manager.
pub struct MountedForm {
    name: String,
    inputs: BTreeMap<UnitId, MountedInput>,
    units: BTreeMap<UnitId, Arc<ValidationUnit>>,
}

impl std::fmt::Debug for MountedForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedForm")
            .field("name", &self.name)
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl MountedForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self, id: &str) -> Option<&MountedInput> {
        self.inputs.get(id)
    }

    pub fn unit(&self, id: &str) -> Option<&Arc<ValidationUnit>> {
        self.units.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &UnitId> {
        self.inputs.keys()
    }

    /// Set a field's content as a user edit would.
    ///
    /// Returns `false` when no field has that id.
    pub fn set(&self, id: &str, value: &str) -> bool {
        match self.inputs.get(id) {
            Some(input) => {
                input.set(value);
                true
            }
            None => false,
        }
    }
}

impl FormDefinition {
    /// Create an input per field, register it, then apply its initial value.
    ///
    /// The definition is checked first, as [`FormLoader`] does. If a field
    /// fails to register, the fields already registered are removed again.
    /// A field with `enabled = false` is evaluated once against its initial
    /// value and ignores later edits.
    #[instrument(skip_all, fields(form = %self.form.name))]
    pub fn mount(&self, manager: &ValidationManager) -> FormguardResult<MountedForm> {
        FormLoader::check(self).map_err(|e| FormguardError::Configuration {
            message: e.to_string(),
        })?;

        let mut form = MountedForm {
            name: self.form.name.clone(),
            inputs: BTreeMap::new(),
            units: BTreeMap::new(),
        };
        for field in &self.fields {
            if let Err(e) = field.mount(manager, &mut form) {
                for id in form.units.keys() {
                    if let Err(err) = manager.remove_unit_for_identifier(id.as_str()) {
                        warn!(field = %id, error = %err, "failed to roll back mounted field");
                    }
                }
                return Err(e);
            }
        }
        Ok(form)
    }
}

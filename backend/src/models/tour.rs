//! Tour records.
//!
//! Tours are schema-less: apart from `tour_id` every field is whatever the
//! client sent, so records travel as JSON objects from the request body to
//! the store and back. The types here only add the checks the CRUD contract
//! relies on:
//!
//! - [`NewTour`]: a create payload carrying an integer `tour_id`
//! - [`TourPatch`]: a partial update that never touches `_id` or `tour_id`
//! - [`Tour`]: a stored record, including the storage-assigned `_id`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::define_id_type;

/// Field holding the application-level identifier.
pub const TOUR_ID_FIELD: &str = "tour_id";

/// Field holding the storage-assigned identifier.
pub const STORAGE_ID_FIELD: &str = "_id";

/// Open field set of a tour record.
pub type Fields = Map<String, Value>;

define_id_type!(i64, TourId);

impl TourId {
    /// Parse an identifier taken from a request path.
    pub fn parse_path(raw: &str) -> Result<Self, TourValidationError> {
        raw.parse()
            .map_err(|_| TourValidationError::InvalidPathId(raw.to_string()))
    }
}

/// Storage-assigned identifier, opaque to the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageId(pub String);

impl StorageId {
    pub fn new(value: impl Into<String>) -> Self {
        StorageId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons a tour payload is rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TourValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("tour_id is required for insert")]
    MissingTourId,

    #[error("tour_id must be an integer")]
    InvalidTourId,

    #[error("_id is assigned by storage and cannot be supplied")]
    StorageIdSupplied,

    #[error("tour_id cannot be changed (target {target}, body {found})")]
    TourIdChanged { target: TourId, found: String },

    #[error("invalid field name '{0}'")]
    InvalidFieldName(String),

    #[error("invalid tour id '{0}'")]
    InvalidPathId(String),
}

/// Field names the document store would interpret as operators or paths.
fn check_field_name(name: &str) -> Result<(), TourValidationError> {
    if name.is_empty() || name.starts_with('$') || name.contains('.') {
        return Err(TourValidationError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}

/// Check `name` and every key nested anywhere inside `value`.
fn check_field(name: &str, value: &Value) -> Result<(), TourValidationError> {
    check_field_name(name)?;
    check_nested(value)
}

fn check_nested(value: &Value) -> Result<(), TourValidationError> {
    match value {
        Value::Object(fields) => fields
            .iter()
            .try_for_each(|(name, value)| check_field(name, value)),
        Value::Array(items) => items.iter().try_for_each(check_nested),
        _ => Ok(()),
    }
}

/// Integer value of a JSON number; floats count when they have no
/// fractional part and fit in an `i64`.
fn integer_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64().filter(|_| value.is_f64())?;
    if f.fract() == 0.0 && f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0 {
        Some(f as i64)
    } else {
        None
    }
}

fn into_object(value: Value) -> Result<Fields, TourValidationError> {
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(TourValidationError::NotAnObject),
    }
}

/// A stored tour: every persisted field plus `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour(Fields);

impl Tour {
    pub fn from_fields(fields: Fields) -> Self {
        Tour(fields)
    }

    pub fn storage_id(&self) -> Option<&str> {
        self.0.get(STORAGE_ID_FIELD).and_then(Value::as_str)
    }

    pub fn tour_id(&self) -> Option<TourId> {
        self.0
            .get(TOUR_ID_FIELD)
            .and_then(integer_value)
            .map(TourId::new)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Merge `patch` into this record.
    ///
    /// Fields present in the patch overwrite or extend the record; the rest
    /// are left alone. Returns `true` when at least one stored value changed,
    /// matching how a document store counts modified documents.
    pub fn merge(&mut self, patch: &TourPatch) -> bool {
        let mut changed = false;
        for (key, value) in patch.fields() {
            if self.0.get(key) != Some(value) {
                self.0.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }
}

/// A validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTour {
    tour_id: TourId,
    fields: Fields,
}

impl NewTour {
    /// Validate a request body for insertion.
    ///
    /// The body must be an object carrying an integer `tour_id` and no `_id`.
    /// A whole-valued float such as `1.0` is stored as the integer `1`. All
    /// other fields are kept verbatim.
    pub fn from_value(value: Value) -> Result<Self, TourValidationError> {
        let mut fields = into_object(value)?;

        if fields.contains_key(STORAGE_ID_FIELD) {
            return Err(TourValidationError::StorageIdSupplied);
        }
        for (name, value) in &fields {
            check_field(name, value)?;
        }

        let tour_id = match fields.get(TOUR_ID_FIELD) {
            None | Some(Value::Null) => return Err(TourValidationError::MissingTourId),
            Some(value) => integer_value(value)
                .map(TourId::new)
                .ok_or(TourValidationError::InvalidTourId)?,
        };
        if let Some(stored) = fields.get_mut(TOUR_ID_FIELD) {
            *stored = Value::from(tour_id.value());
        }

        Ok(Self { tour_id, fields })
    }

    pub fn tour_id(&self) -> TourId {
        self.tour_id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Attach the storage id, producing the record as it is persisted.
    pub fn into_stored(self, storage_id: &StorageId) -> Tour {
        let mut fields = Fields::with_capacity(self.fields.len() + 1);
        fields.insert(
            STORAGE_ID_FIELD.to_string(),
            Value::String(storage_id.as_str().to_string()),
        );
        fields.extend(self.fields);
        Tour(fields)
    }
}

/// A validated partial update for one tour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourPatch(Fields);

impl TourPatch {
    /// Validate a request body as a patch for the tour `target`.
    ///
    /// `_id` is dropped. A `tour_id` equal to `target` is dropped too; any
    /// other value is rejected since the identifier is immutable.
    pub fn from_value(target: TourId, value: Value) -> Result<Self, TourValidationError> {
        let mut patch = Fields::new();

        for (key, value) in into_object(value)? {
            match key.as_str() {
                STORAGE_ID_FIELD => continue,
                TOUR_ID_FIELD => {
                    if integer_value(&value) != Some(target.value()) {
                        return Err(TourValidationError::TourIdChanged {
                            target,
                            found: value.to_string(),
                        });
                    }
                }
                _ => {
                    check_field(&key, &value)?;
                    patch.insert(key, value);
                }
            }
        }

        Ok(Self(patch))
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

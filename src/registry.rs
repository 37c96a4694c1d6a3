//! Type Registry
//!
//! The closed set of record kinds and their declared schemas.
//!
//! ## Responsibilities
//! - Answer "does this class exist" for the console
//! - Provide each kind's default field map (allowed attributes + declared types)
//! - Construct fresh records pre-populated with those defaults
//!
//! The table is a compile-time constant: no registration, no teardown.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{HbnbError, Result};
use crate::record::{FieldType, Record, Value};

/// One attribute in a kind's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty }
}

const USER_FIELDS: &[FieldSpec] = &[
    field("email", FieldType::String),
    field("password", FieldType::String),
    field("first_name", FieldType::String),
    field("last_name", FieldType::String),
];

const STATE_FIELDS: &[FieldSpec] = &[field("name", FieldType::String)];

const CITY_FIELDS: &[FieldSpec] = &[
    field("state_id", FieldType::String),
    field("name", FieldType::String),
];

const AMENITY_FIELDS: &[FieldSpec] = &[field("name", FieldType::String)];

const PLACE_FIELDS: &[FieldSpec] = &[
    field("city_id", FieldType::String),
    field("user_id", FieldType::String),
    field("name", FieldType::String),
    field("description", FieldType::String),
    field("number_rooms", FieldType::Integer),
    field("number_bathrooms", FieldType::Integer),
    field("max_guest", FieldType::Integer),
    field("price_by_night", FieldType::Integer),
    field("latitude", FieldType::Float),
    field("longitude", FieldType::Float),
    field("amenity_ids", FieldType::List),
];

const REVIEW_FIELDS: &[FieldSpec] = &[
    field("place_id", FieldType::String),
    field("user_id", FieldType::String),
    field("text", FieldType::String),
];

/// A record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl Kind {
    /// Every registered kind, in registry order
    pub const ALL: [Kind; 6] = [
        Kind::User,
        Kind::State,
        Kind::City,
        Kind::Amenity,
        Kind::Place,
        Kind::Review,
    ];

    /// The kind name as typed at the console and stored in the file
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::User => "User",
            Kind::State => "State",
            Kind::City => "City",
            Kind::Amenity => "Amenity",
            Kind::Place => "Place",
            Kind::Review => "Review",
        }
    }

    /// Declared attributes for this kind
    pub fn schema(self) -> &'static [FieldSpec] {
        match self {
            Kind::User => USER_FIELDS,
            Kind::State => STATE_FIELDS,
            Kind::City => CITY_FIELDS,
            Kind::Amenity => AMENITY_FIELDS,
            Kind::Place => PLACE_FIELDS,
            Kind::Review => REVIEW_FIELDS,
        }
    }

    /// Declared type of `attribute`, if the kind has it
    pub fn field_type(self, attribute: &str) -> Option<FieldType> {
        self.schema()
            .iter()
            .find(|spec| spec.name == attribute)
            .map(|spec| spec.ty)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = HbnbError;

    /// Exact, case-sensitive match against the registered names
    fn from_str(name: &str) -> Result<Self> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| HbnbError::UnknownKind(name.to_string()))
    }
}

// =============================================================================
// Registry operations
// =============================================================================

/// Whether `name` is a registered kind
pub fn is_known(name: &str) -> bool {
    name.parse::<Kind>().is_ok()
}

/// Default field map for `name`
pub fn default_fields(name: &str) -> Result<BTreeMap<String, Value>> {
    let kind: Kind = name.parse()?;
    Ok(defaults_for(kind))
}

/// Fresh record of `name` with its defaults filled in
pub fn construct(name: &str) -> Result<Record> {
    let kind: Kind = name.parse()?;
    Ok(Record::with_fields(kind, defaults_for(kind)))
}

/// Declared type of `attribute` on `kind`
pub fn field_type(kind: Kind, attribute: &str) -> Result<FieldType> {
    kind.field_type(attribute)
        .ok_or_else(|| HbnbError::UnknownAttribute {
            kind: kind.to_string(),
            attribute: attribute.to_string(),
        })
}

pub(crate) fn defaults_for(kind: Kind) -> BTreeMap<String, Value> {
    kind.schema()
        .iter()
        .map(|spec| (spec.name.to_string(), spec.ty.default_value()))
        .collect()
}

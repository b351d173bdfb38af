//! Value kinds and runtime parameter values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::time::{format_datetime, format_duration};
use crate::{BoundingBox, CrsCode};

/// The semantic type a parameter value must conform to.
///
/// Kinds outside the built-in set are named with [`ValueKind::Custom`] and
/// become usable once a parser is registered for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Boolean,
    Uri,
    Duration,
    DateTime,
    Crs,
    BoundingBox,
    Custom(String),
}

static BUILTIN_KINDS: [ValueKind; 9] = [
    ValueKind::Text,
    ValueKind::Integer,
    ValueKind::Float,
    ValueKind::Boolean,
    ValueKind::Uri,
    ValueKind::Duration,
    ValueKind::DateTime,
    ValueKind::Crs,
    ValueKind::BoundingBox,
];

impl ValueKind {
    /// A custom kind named `name`.
    ///
    /// Built-in names (in any case) are rejected so a custom kind never
    /// prints or serializes like a built-in one.
    pub fn custom(name: impl Into<String>) -> Result<Self, KindParseError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(KindParseError::EmptyName);
        }
        if Self::builtin_named(name).is_some() {
            return Err(KindParseError::Reserved(name.to_string()));
        }
        Ok(ValueKind::Custom(name.to_string()))
    }

    /// Built-in kind for a canonical name or a common alias (`string`, `int`,
    /// `url`, `bounding_box`, ...). Used where people write kind names by
    /// hand, such as definition files.
    pub fn from_alias(name: &str) -> Option<Self> {
        let kind = match name.trim().to_lowercase().as_str() {
            "string" | "str" => ValueKind::Text,
            "int" | "long" => ValueKind::Integer,
            "double" | "number" => ValueKind::Float,
            "bool" => ValueKind::Boolean,
            "url" => ValueKind::Uri,
            "date" | "timestamp" => ValueKind::DateTime,
            "srs" => ValueKind::Crs,
            "bounding_box" | "boundingbox" => ValueKind::BoundingBox,
            _ => return Self::builtin_named(name),
        };
        Some(kind)
    }

    fn builtin_named(name: &str) -> Option<Self> {
        let name = name.trim();
        BUILTIN_KINDS
            .iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// All kinds that have a built-in parser (plus `Text`, which needs none).
    pub fn builtins() -> &'static [ValueKind] {
        &BUILTIN_KINDS
    }

    pub fn name(&self) -> &str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Uri => "uri",
            ValueKind::Duration => "duration",
            ValueKind::DateTime => "datetime",
            ValueKind::Crs => "crs",
            ValueKind::BoundingBox => "bbox",
            ValueKind::Custom(name) => name,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ValueKind::Text)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ValueKind::Custom(_))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = KindParseError;

    /// Parse a canonical kind name (case-insensitive); any other name is a
    /// custom kind. Inverse of `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(KindParseError::EmptyName);
        }
        Ok(Self::builtin_named(name).unwrap_or_else(|| ValueKind::Custom(name.to_string())))
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.name().to_string()
    }
}

impl TryFrom<String> for ValueKind {
    type Error = KindParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KindParseError {
    #[error("Value type name cannot be empty")]
    EmptyName,

    #[error("'{0}' is a built-in value type name")]
    Reserved(String),
}

/// Value of a custom kind produced by a registered parser.
#[derive(Clone)]
pub struct CustomValue {
    kind: String,
    text: String,
    payload: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    /// Wrap `value` as a value of the custom kind `kind`.
    ///
    /// The text form is taken from `Display` once, up front.
    pub fn new<T>(kind: impl Into<String>, value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self {
            kind: kind.into(),
            text: value.to_string(),
            payload: Arc::new(value),
        }
    }

    pub fn kind_name(&self) -> &str {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("kind", &self.kind)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

/// Custom values compare by kind and text form.
impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

/// A parameter value, either raw input or the result of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uri(Url),
    Duration(Duration),
    DateTime(DateTime<Utc>),
    Crs(CrsCode),
    BoundingBox(BoundingBox),
    Custom(CustomValue),
}

impl ParamValue {
    /// The runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ParamValue::Text(_) => ValueKind::Text,
            ParamValue::Integer(_) => ValueKind::Integer,
            ParamValue::Float(_) => ValueKind::Float,
            ParamValue::Boolean(_) => ValueKind::Boolean,
            ParamValue::Uri(_) => ValueKind::Uri,
            ParamValue::Duration(_) => ValueKind::Duration,
            ParamValue::DateTime(_) => ValueKind::DateTime,
            ParamValue::Crs(_) => ValueKind::Crs,
            ParamValue::BoundingBox(_) => ValueKind::BoundingBox,
            ParamValue::Custom(custom) => ValueKind::Custom(custom.kind.clone()),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ParamValue::Text(_))
    }

    /// Text form that the default parser for the same kind reads back.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&Url> {
        match self {
            ParamValue::Uri(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            ParamValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            ParamValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_crs(&self) -> Option<CrsCode> {
        match self {
            ParamValue::Crs(crs) => Some(*crs),
            _ => None,
        }
    }

    pub fn as_bbox(&self) -> Option<BoundingBox> {
        match self {
            ParamValue::BoundingBox(bbox) => Some(*bbox),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomValue> {
        match self {
            ParamValue::Custom(custom) => Some(custom),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Boolean(b) => write!(f, "{}", b),
            ParamValue::Uri(url) => f.write_str(url.as_str()),
            ParamValue::Duration(d) => f.write_str(&format_duration(d)),
            ParamValue::DateTime(dt) => f.write_str(&format_datetime(dt)),
            ParamValue::Crs(crs) => write!(f, "{}", crs),
            ParamValue::BoundingBox(bbox) => write!(f, "{}", bbox),
            ParamValue::Custom(custom) => f.write_str(&custom.text),
        }
    }
}

/// JSON keeps scalars native and writes everything else as its text form.
impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Integer(i) => serializer.serialize_i64(*i),
            ParamValue::Float(v) => serializer.serialize_f64(*v),
            ParamValue::Boolean(b) => serializer.serialize_bool(*b),
            other => serializer.serialize_str(&other.to_text()),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

impl From<Url> for ParamValue {
    fn from(value: Url) -> Self {
        ParamValue::Uri(value)
    }
}

impl From<Duration> for ParamValue {
    fn from(value: Duration) -> Self {
        ParamValue::Duration(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::DateTime(value)
    }
}

impl From<CrsCode> for ParamValue {
    fn from(value: CrsCode) -> Self {
        ParamValue::Crs(value)
    }
}

impl From<BoundingBox> for ParamValue {
    fn from(value: BoundingBox) -> Self {
        ParamValue::BoundingBox(value)
    }
}

impl From<CustomValue> for ParamValue {
    fn from(value: CustomValue) -> Self {
        ParamValue::Custom(value)
    }
}

/// Typed extraction from a resolved [`ParamValue`].
pub trait FromParamValue: Sized {
    fn from_param_value(value: &ParamValue) -> Option<Self>;
}

macro_rules! impl_from_param_value {
    ($ty:ty, $accessor:ident) => {
        impl FromParamValue for $ty {
            fn from_param_value(value: &ParamValue) -> Option<Self> {
                value.$accessor()
            }
        }
    };
}

impl_from_param_value!(i64, as_integer);
impl_from_param_value!(f64, as_float);
impl_from_param_value!(bool, as_bool);
impl_from_param_value!(Duration, as_duration);
impl_from_param_value!(DateTime<Utc>, as_datetime);
impl_from_param_value!(CrsCode, as_crs);
impl_from_param_value!(BoundingBox, as_bbox);

impl FromParamValue for String {
    fn from_param_value(value: &ParamValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromParamValue for Url {
    fn from_param_value(value: &ParamValue) -> Option<Self> {
        value.as_uri().cloned()
    }
}

impl FromParamValue for ParamValue {
    fn from_param_value(value: &ParamValue) -> Option<Self> {
        Some(value.clone())
    }
}

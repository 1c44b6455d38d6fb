use crate::io::wkt::writer::format_f64;
use crate::storage::{ExactBlob, RefHandle, SerializedGeometry};

/// A value crossing the call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Int4(i32),
    Float8(f64),
    Text(String),
    /// Copy strategy token.
    Geometry(SerializedGeometry),
    /// Reference strategy token.
    Ref(RefHandle),
    /// Exact strategy token.
    Exact(ExactBlob),
}

impl Datum {
    pub fn type_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Bool(_) => "bool",
            Datum::Int4(_) => "int4",
            Datum::Float8(_) => "float8",
            Datum::Text(_) => "text",
            Datum::Geometry(_) => "geometry",
            Datum::Ref(_) => "ref_geometry",
            Datum::Exact(_) => "exact_geometry",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int4(&self) -> Option<i32> {
        match self {
            Datum::Int4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float8(&self) -> Option<f64> {
        match self {
            Datum::Float8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Datum::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Text of a non-geometry datum, as shown in diagnostics.
    pub(crate) fn render_scalar(&self) -> String {
        match self {
            Datum::Null => "NULL".to_string(),
            Datum::Bool(v) => v.to_string(),
            Datum::Int4(v) => v.to_string(),
            Datum::Float8(v) => format_f64(*v, -1),
            Datum::Text(v) => v.clone(),
            Datum::Geometry(_) | Datum::Ref(_) | Datum::Exact(_) => {
                format!("<{}>", self.type_name())
            }
        }
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Bool(value)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Self {
        Datum::Int4(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Float8(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Text(value.to_string())
    }
}

impl From<SerializedGeometry> for Datum {
    fn from(value: SerializedGeometry) -> Self {
        Datum::Geometry(value)
    }
}

impl From<RefHandle> for Datum {
    fn from(value: RefHandle) -> Self {
        Datum::Ref(value)
    }
}

impl From<ExactBlob> for Datum {
    fn from(value: ExactBlob) -> Self {
        Datum::Exact(value)
    }
}

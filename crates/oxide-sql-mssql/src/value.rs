//! SQL values and their dialect-native wrappers.

use core::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use uuid::Uuid;

use crate::quoting::quote_string_single;

/// Largest fractional-second precision SQL Server stores.
pub const MAX_FRACTIONAL_PRECISION: u8 = 7;

/// A value that can be rendered as a SQL literal or bound as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value, possibly multibyte.
    Text(String),
    /// Binary blob value.
    Binary(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Date with time of day.
    DateTime(NaiveDateTime),
    /// A SQL Server typed value that knows its own literal form.
    Native(NativeValue),
    /// Anything else. Rendered only by the host's generic quoting.
    Opaque(String),
}

impl SqlValue {
    /// Returns the generic (ANSI) inline literal.
    ///
    /// This is the fallback rendering used when no dialect rule applies.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) | Self::Opaque(s) => quote_string_single(s),
            Self::Binary(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Self::Native(native) => native.quoted(),
        }
    }

    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A value wrapped in a SQL Server specific type.
///
/// Each variant renders its own literal through [`NativeValue::quoted`] and
/// converts to plain text for parameter binding through `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeValue {
    /// `uniqueidentifier`.
    Uuid(Uuid),
    /// `char(n)`: non-Unicode fixed-length text.
    Char(String),
    /// `varchar(n)`: non-Unicode variable-length text.
    VarChar(String),
    /// `time(p)`.
    Time {
        /// Time of day.
        value: NaiveTime,
        /// Fractional-second digits, 0 to 7.
        precision: u8,
    },
    /// `datetime2(p)`.
    DateTime2 {
        /// Date and time.
        value: NaiveDateTime,
        /// Fractional-second digits, 0 to 7.
        precision: u8,
    },
    /// `datetimeoffset(p)`.
    DateTimeOffset {
        /// Date and time with UTC offset.
        value: DateTime<FixedOffset>,
        /// Fractional-second digits, 0 to 7.
        precision: u8,
    },
}

impl NativeValue {
    /// Returns the SQL literal for this value.
    ///
    /// Non-Unicode text stays un-prefixed so that comparisons against
    /// `char`/`varchar` columns do not force an implicit conversion.
    #[must_use]
    pub fn quoted(&self) -> String {
        quote_string_single(&self.to_string())
    }

    /// Returns the SQL Server type name of the wrapper.
    #[must_use]
    pub fn sql_type(&self) -> String {
        match self {
            Self::Uuid(_) => String::from("uniqueidentifier"),
            Self::Char(s) => format!("char({})", s.chars().count().max(1)),
            Self::VarChar(s) => format!("varchar({})", s.chars().count().max(1)),
            Self::Time { precision, .. } => format!("time({})", clamp(*precision)),
            Self::DateTime2 { precision, .. } => format!("datetime2({})", clamp(*precision)),
            Self::DateTimeOffset { precision, .. } => {
                format!("datetimeoffset({})", clamp(*precision))
            }
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Self::Char(s) | Self::VarChar(s) => f.write_str(s),
            Self::Time { value, precision } => write!(
                f,
                "{}{}",
                value.format("%H:%M:%S"),
                fraction(value.nanosecond(), *precision)
            ),
            Self::DateTime2 { value, precision } => write!(
                f,
                "{}{}",
                value.format("%Y-%m-%d %H:%M:%S"),
                fraction(value.nanosecond(), *precision)
            ),
            Self::DateTimeOffset { value, precision } => write!(
                f,
                "{}{} {}",
                value.format("%Y-%m-%d %H:%M:%S"),
                fraction(value.nanosecond(), *precision),
                value.format("%:z")
            ),
        }
    }
}

fn clamp(precision: u8) -> u8 {
    precision.min(MAX_FRACTIONAL_PRECISION)
}

/// Renders `.fffffff` truncated to `precision` digits, or nothing for 0.
fn fraction(nanos: u32, precision: u8) -> String {
    let digits = usize::from(clamp(precision));
    if digits == 0 {
        return String::new();
    }
    // Leap seconds are encoded as nanos >= 1e9.
    let padded = format!("{:09}", nanos.min(999_999_999));
    format!(".{}", &padded[..digits])
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for NativeValue {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Native(self)
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! int_to_sql_value {
    ($($ty:ty),*) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )*
    };
}

int_to_sql_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Binary(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Binary(self.to_vec())
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Date(self)
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::DateTime(self)
    }
}

impl ToSqlValue for Uuid {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Native(NativeValue::Uuid(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

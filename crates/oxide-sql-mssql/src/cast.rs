//! Cast types and column type metadata.
//!
//! A declared SQL Server type such as `nvarchar(50)` or `decimal(18, 4)` maps
//! to a [`CastType`]: the generic kind plus limit, precision and scale.
//! [`TypeMetadata`] combines that with the SQL Server specific column
//! attributes read from the catalog.

/// Storage limit of `varchar(max)` and `varbinary(max)`, in bytes.
pub const MAX_LIMIT: u32 = 2_147_483_647;
/// Storage limit of `nvarchar(max)`, in characters.
pub const NATIONAL_MAX_LIMIT: u32 = 1_073_741_823;

/// Generic kind of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    /// `tinyint`, `smallint`, `int`, `bigint`.
    Integer,
    /// `bit`.
    Boolean,
    /// `decimal`, `numeric`.
    Decimal,
    /// `money`, `smallmoney`.
    Money,
    /// `float`, `real`.
    Float,
    /// `date`.
    Date,
    /// `time`.
    Time,
    /// `datetime`, `datetime2`, `smalldatetime`.
    DateTime,
    /// `datetimeoffset`.
    DateTimeOffset,
    /// `char`, `varchar`.
    Char,
    /// `nchar`, `nvarchar`.
    String,
    /// `text`, `ntext`.
    Text,
    /// `binary`, `varbinary`, `image`.
    Binary,
    /// `uniqueidentifier`.
    Uuid,
    /// `xml`.
    Xml,
    /// Anything not recognized.
    Other,
}

/// The generic type a declared column type casts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastType {
    /// Kind of the type.
    pub kind: CastKind,
    /// Length in characters or bytes.
    pub limit: Option<u32>,
    /// Total digits, or fractional-second digits for temporal types.
    pub precision: Option<u8>,
    /// Digits after the decimal point.
    pub scale: Option<u8>,
}

impl CastType {
    /// Creates a cast type without size information.
    #[must_use]
    pub const fn new(kind: CastKind) -> Self {
        Self {
            kind,
            limit: None,
            precision: None,
            scale: None,
        }
    }

    /// Sets the limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the precision.
    #[must_use]
    pub const fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Splits `name(arg, arg)` into a lowercase name and its trimmed arguments.
fn split_type(sql_type: &str) -> (String, Vec<String>) {
    let sql_type = sql_type.trim();
    match sql_type.split_once('(') {
        Some((name, rest)) => {
            let args = rest
                .trim_end()
                .trim_end_matches(')')
                .split(',')
                .map(|a| a.trim().to_ascii_lowercase())
                .filter(|a| !a.is_empty())
                .collect();
            (name.trim().to_ascii_lowercase(), args)
        }
        None => (sql_type.to_ascii_lowercase(), Vec::new()),
    }
}

/// Looks up the cast type of a declared SQL Server type.
///
/// Names are matched case-insensitively. Unknown names map to
/// [`CastKind::Other`] rather than failing.
#[must_use]
pub fn lookup_cast_type(sql_type: &str) -> CastType {
    let (name, args) = split_type(sql_type);
    let arg = |idx: usize| args.get(idx).map(String::as_str);
    let number = |idx: usize| arg(idx).and_then(|a| a.parse::<u32>().ok());
    let digits = |idx: usize, default: u8| {
        arg(idx)
            .and_then(|a| a.parse::<u8>().ok())
            .unwrap_or(default)
    };
    // `(n)`, `(max)` or nothing.
    let length = |default: u32, max: u32| match arg(0) {
        Some("max") => max,
        _ => number(0).unwrap_or(default),
    };

    match name.as_str() {
        "tinyint" => CastType::new(CastKind::Integer).with_limit(1),
        "smallint" => CastType::new(CastKind::Integer).with_limit(2),
        "int" | "integer" => CastType::new(CastKind::Integer).with_limit(4),
        "bigint" => CastType::new(CastKind::Integer).with_limit(8),
        "bit" => CastType::new(CastKind::Boolean),
        "decimal" | "numeric" => CastType::new(CastKind::Decimal)
            .with_precision(digits(0, 18))
            .with_scale(digits(1, 0)),
        "money" => CastType::new(CastKind::Money)
            .with_precision(19)
            .with_scale(4),
        "smallmoney" => CastType::new(CastKind::Money)
            .with_precision(10)
            .with_scale(4),
        "float" => CastType::new(CastKind::Float).with_precision(digits(0, 53)),
        "real" => CastType::new(CastKind::Float).with_precision(24),
        "date" => CastType::new(CastKind::Date),
        "time" => CastType::new(CastKind::Time).with_precision(digits(0, 7)),
        "datetime" | "smalldatetime" => CastType::new(CastKind::DateTime),
        "datetime2" => CastType::new(CastKind::DateTime).with_precision(digits(0, 7)),
        "datetimeoffset" => CastType::new(CastKind::DateTimeOffset).with_precision(digits(0, 7)),
        "char" => CastType::new(CastKind::Char).with_limit(length(1, MAX_LIMIT)),
        "varchar" => CastType::new(CastKind::Char).with_limit(length(8000, MAX_LIMIT)),
        "nchar" => CastType::new(CastKind::String).with_limit(length(1, NATIONAL_MAX_LIMIT)),
        "nvarchar" => {
            CastType::new(CastKind::String).with_limit(length(4000, NATIONAL_MAX_LIMIT))
        }
        "text" => CastType::new(CastKind::Text).with_limit(MAX_LIMIT),
        "ntext" => CastType::new(CastKind::Text).with_limit(NATIONAL_MAX_LIMIT),
        "binary" => CastType::new(CastKind::Binary).with_limit(length(1, MAX_LIMIT)),
        "varbinary" => CastType::new(CastKind::Binary).with_limit(length(8000, MAX_LIMIT)),
        "image" => CastType::new(CastKind::Binary).with_limit(MAX_LIMIT),
        "uniqueidentifier" => CastType::new(CastKind::Uuid),
        "xml" => CastType::new(CastKind::Xml),
        _ => CastType::new(CastKind::Other),
    }
}

/// SQL Server specific column attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMetadataOptions {
    is_identity: bool,
    is_primary: bool,
    table_name: Option<String>,
    ordinal_position: Option<u32>,
}

impl TypeMetadataOptions {
    /// Creates options with every attribute unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the column as an `IDENTITY` column.
    #[must_use]
    pub const fn identity(mut self, is_identity: bool) -> Self {
        self.is_identity = is_identity;
        self
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub const fn primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    /// Sets the owning table.
    #[must_use]
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Sets the column's position in the table, starting at 1.
    #[must_use]
    pub const fn ordinal_position(mut self, position: u32) -> Self {
        self.ordinal_position = Some(position);
        self
    }
}

/// Immutable type information for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMetadata {
    sql_type: String,
    cast_type: CastType,
    options: TypeMetadataOptions,
}

impl TypeMetadata {
    /// Combines a declared type, its cast type and the column attributes.
    #[must_use]
    pub fn new(
        sql_type: impl Into<String>,
        cast_type: CastType,
        options: TypeMetadataOptions,
    ) -> Self {
        Self {
            sql_type: sql_type.into(),
            cast_type,
            options,
        }
    }

    /// The declared type, as written.
    #[must_use]
    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    /// The cast type.
    #[must_use]
    pub const fn cast_type(&self) -> CastType {
        self.cast_type
    }

    /// The cast kind.
    #[must_use]
    pub const fn kind(&self) -> CastKind {
        self.cast_type.kind
    }

    /// Length limit.
    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        self.cast_type.limit
    }

    /// Precision.
    #[must_use]
    pub const fn precision(&self) -> Option<u8> {
        self.cast_type.precision
    }

    /// Scale.
    #[must_use]
    pub const fn scale(&self) -> Option<u8> {
        self.cast_type.scale
    }

    /// True for `IDENTITY` columns.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        self.options.is_identity
    }

    /// True for primary key columns.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.options.is_primary
    }

    /// The owning table, if known.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.options.table_name.as_deref()
    }

    /// Position in the table, if known.
    #[must_use]
    pub const fn ordinal_position(&self) -> Option<u32> {
        self.options.ordinal_position
    }
}

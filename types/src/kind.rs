//! Scalar column kinds.

/// The closed set of scalar field kinds.
///
/// These correspond to PostgreSQL data types.
/// See: <https://www.postgresql.org/docs/current/datatype.html>
///
/// # Examples
///
/// ```
/// use tether_types::ScalarKind;
///
/// let kind = ScalarKind::from_name("int4").unwrap();
/// assert_eq!(kind, ScalarKind::Integer);
/// assert_eq!(ScalarKind::varchar(50).to_sql_type(), "VARCHAR(50)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Character data; `limit` selects `VARCHAR(n)`, `size` selects `CHAR(n)`,
    /// neither selects unbounded `TEXT`
    Text {
        limit: Option<u32>,
        size: Option<u32>,
    },

    /// 16-bit signed integer
    Smallint,

    /// 32-bit signed integer
    Integer,

    /// 64-bit signed integer
    Bigint,

    /// Single precision float
    Real,

    /// Double precision float
    DoublePrecision,

    /// Exact numeric
    Numeric,

    Boolean,

    /// Date and time without time zone
    Timestamp,

    /// Date and time with time zone
    Timestamptz,

    Date,

    Time,

    /// Geometric point `(x, y)`
    Point,

    /// Currency amount; rendered by the server with a currency symbol
    Money,

    Json,

    Jsonb,

    /// Native enum over the given labels. The type itself is named after the
    /// owning entity and field (see [`crate::naming::enum_type_name`]).
    Enum(Vec<String>),

    /// Any other type name, declared verbatim and encoded/decoded as text
    Custom(String),
}

impl ScalarKind {
    /// Unbounded text
    pub const fn text() -> Self {
        Self::Text {
            limit: None,
            size: None,
        }
    }

    /// Variable-length text bounded to `limit` characters
    pub const fn varchar(limit: u32) -> Self {
        Self::Text {
            limit: Some(limit),
            size: None,
        }
    }

    /// Fixed-length text of `size` characters
    pub const fn char(size: u32) -> Self {
        Self::Text {
            limit: None,
            size: Some(size),
        }
    }

    /// Convert from a declared kind name.
    ///
    /// `text` comes back unbounded and `enum` with no labels; callers attach
    /// their parameters afterwards. Unknown names return `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::text()),
            "varchar" | "character_varying" => Some(Self::text()),
            "smallint" | "int2" => Some(Self::Smallint),
            "integer" | "int" | "int4" => Some(Self::Integer),
            "bigint" | "int8" => Some(Self::Bigint),
            "real" | "float4" => Some(Self::Real),
            "double_precision" | "double" | "float8" => Some(Self::DoublePrecision),
            "numeric" | "decimal" => Some(Self::Numeric),
            "boolean" | "bool" => Some(Self::Boolean),
            "timestamp" => Some(Self::Timestamp),
            "timestamptz" => Some(Self::Timestamptz),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "point" => Some(Self::Point),
            "money" => Some(Self::Money),
            "json" => Some(Self::Json),
            "jsonb" => Some(Self::Jsonb),
            "enum" => Some(Self::Enum(Vec::new())),
            _ => None,
        }
    }

    /// The SQL type text for this kind.
    ///
    /// Enum kinds have no intrinsic name; see [`crate::declare_column`].
    #[must_use]
    pub fn to_sql_type(&self) -> String {
        match self {
            Self::Text {
                limit: Some(limit), ..
            } => format!("VARCHAR({limit})"),
            Self::Text {
                size: Some(size), ..
            } => format!("CHAR({size})"),
            Self::Text { .. } => "TEXT".to_string(),
            Self::Smallint => "SMALLINT".to_string(),
            Self::Integer => "INTEGER".to_string(),
            Self::Bigint => "BIGINT".to_string(),
            Self::Real => "REAL".to_string(),
            Self::DoublePrecision => "DOUBLE PRECISION".to_string(),
            Self::Numeric => "NUMERIC".to_string(),
            Self::Boolean => "BOOLEAN".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::Timestamptz => "TIMESTAMPTZ".to_string(),
            Self::Date => "DATE".to_string(),
            Self::Time => "TIME".to_string(),
            Self::Point => "POINT".to_string(),
            Self::Money => "MONEY".to_string(),
            Self::Json => "JSON".to_string(),
            Self::Jsonb => "JSONB".to_string(),
            Self::Enum(_) => "TEXT".to_string(),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Check if values of this kind are written as quoted text
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::Text { .. } | Self::Enum(_) | Self::Custom(_))
    }
}

impl core::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_sql_type())
    }
}

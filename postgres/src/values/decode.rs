//! Column decoding from simple-query text.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tether_core::{Result, TetherError, Value};
use tether_types::ScalarKind;

/// Decodes the text of `column` as a value of `kind`.
///
/// `None` (SQL `NULL`) always decodes to [`Value::Null`]. Enum and custom
/// kinds are returned as text.
pub fn decode(kind: &ScalarKind, column: &str, raw: Option<&str>) -> Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };
    let fail = |reason: &dyn ToString| TetherError::decode(column, raw, reason.to_string());

    let value = match kind {
        ScalarKind::Text { .. } | ScalarKind::Enum(_) | ScalarKind::Custom(_) => {
            Value::Text(raw.to_string())
        }
        ScalarKind::Smallint | ScalarKind::Integer | ScalarKind::Bigint => {
            Value::Int(raw.parse().map_err(|e| fail(&e))?)
        }
        ScalarKind::Real | ScalarKind::DoublePrecision => {
            Value::Float(raw.parse().map_err(|e| fail(&e))?)
        }
        ScalarKind::Numeric => Value::Decimal(Decimal::from_str(raw).map_err(|e| fail(&e))?),
        ScalarKind::Boolean => match raw {
            "t" | "true" => Value::Bool(true),
            "f" | "false" => Value::Bool(false),
            _ => return Err(fail(&"not a boolean")),
        },
        ScalarKind::Timestamp => Value::Timestamp(
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map_err(|e| fail(&e))?,
        ),
        ScalarKind::Timestamptz => Value::TimestampTz(
            DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z").map_err(|e| fail(&e))?,
        ),
        ScalarKind::Date => {
            Value::Date(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| fail(&e))?)
        }
        ScalarKind::Time => {
            Value::Time(NaiveTime::parse_from_str(raw, "%H:%M:%S%.f").map_err(|e| fail(&e))?)
        }
        ScalarKind::Point => {
            let (x, y) = decode_point(raw).ok_or_else(|| fail(&"not a point"))?;
            Value::Point(x, y)
        }
        ScalarKind::Money => Value::Decimal(decode_money(raw).ok_or_else(|| fail(&"not money"))?),
        ScalarKind::Json | ScalarKind::Jsonb => {
            Value::Json(serde_json::from_str(raw).map_err(|e| fail(&e))?)
        }
    };
    Ok(value)
}

/// Parses the `(x,y)` point output format into an ordered pair.
pub fn decode_point(raw: &str) -> Option<(f64, f64)> {
    let inner = raw.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Parses currency output such as `$1,020.50` or `-$5.00`.
///
/// A single leading currency symbol is stripped and grouping commas removed.
pub fn decode_money(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let digits = rest
        .strip_prefix(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest)
        .replace(',', "");
    let amount = Decimal::from_str(&digits).ok()?;
    Some(if negative { -amount } else { amount })
}

//! Conversion of MySQL result cells into [`Value`].
//!
//! Statements with bound parameters use MySQL's binary protocol, so each cell
//! is decoded according to its column type. Temporal values are formatted
//! from their packed form, which also covers zero dates and TIME values
//! beyond 24 hours. Anything without a textual decoding (BLOB, BINARY, BIT,
//! GEOMETRY...) is kept as raw bytes.

use sift_core::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Decode, MySql, Row, TypeInfo, ValueRef};

/// Decoding strategy for a result column, derived from its type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Signed,
    Unsigned,
    Float,
    Double,
    Date,
    DateTime,
    Time,
    Year,
    /// Sent as character data: CHAR/TEXT families, ENUM, SET, JSON, DECIMAL.
    Textual,
    Bytes,
}

impl ColumnKind {
    /// Classify a `sqlx` MySQL type name such as `BIGINT UNSIGNED` or `VARBINARY`.
    pub fn from_type_name(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        let unsigned = upper.ends_with(" UNSIGNED");
        let base = upper.trim_end_matches(" UNSIGNED");

        match base {
            // TINYINT(1) is reported as BOOLEAN but may hold any TINYINT value.
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                if unsigned {
                    ColumnKind::Unsigned
                } else {
                    ColumnKind::Signed
                }
            }
            "FLOAT" => ColumnKind::Float,
            "DOUBLE" => ColumnKind::Double,
            "DATE" => ColumnKind::Date,
            "DATETIME" | "TIMESTAMP" => ColumnKind::DateTime,
            "TIME" => ColumnKind::Time,
            "YEAR" => ColumnKind::Year,
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" | "JSON" | "DECIMAL" => ColumnKind::Textual,
            _ => ColumnKind::Bytes,
        }
    }
}

/// Decode every cell of a row, in column order.
pub fn decode_row(row: &MySqlRow) -> Result<Vec<Value>, sqlx::Error> {
    (0..row.len()).map(|idx| decode_cell(row, idx)).collect()
}

fn decode_cell(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let kind = ColumnKind::from_type_name(row.column(idx).type_info().name());
    let decoded = match kind {
        ColumnKind::Signed => text::<i64>(row, idx),
        ColumnKind::Unsigned => text::<u64>(row, idx),
        ColumnKind::Float => text::<f32>(row, idx),
        ColumnKind::Double => text::<f64>(row, idx),
        ColumnKind::Date | ColumnKind::DateTime | ColumnKind::Time => {
            return temporal(row, idx, kind);
        }
        ColumnKind::Year => text::<u16>(row, idx),
        ColumnKind::Textual => row.try_get_unchecked::<String, _>(idx).map(Value::Text),
        ColumnKind::Bytes => return bytes(row, idx),
    };

    decoded.or_else(|_| bytes(row, idx))
}

fn text<'r, T>(row: &'r MySqlRow, idx: usize) -> Result<Value, sqlx::Error>
where
    T: Decode<'r, MySql> + ToString,
{
    row.try_get_unchecked::<T, _>(idx)
        .map(|v| Value::Text(v.to_string()))
}

fn bytes(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
    row.try_get_unchecked::<Vec<u8>, _>(idx).map(Value::Binary)
}

fn temporal(row: &MySqlRow, idx: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_unchecked::<&[u8], _>(idx)?;
    let value = match format_packed(kind, raw) {
        Some(text) => Value::Text(text),
        // Text-protocol cells already carry the server's rendering.
        None => match std::str::from_utf8(raw) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Binary(raw.to_vec()),
        },
    };
    Ok(value)
}

/// Render a binary-protocol DATE, DATETIME/TIMESTAMP or TIME cell the way the
/// server prints it. `raw` starts with the payload length byte.
///
/// Returns `None` when `raw` is not a packed temporal value.
pub fn format_packed(kind: ColumnKind, raw: &[u8]) -> Option<String> {
    let (&len, body) = raw.split_first()?;
    if usize::from(len) != body.len() {
        return None;
    }

    match kind {
        ColumnKind::Date | ColumnKind::DateTime => {
            let (year, month, day) = match body.len() {
                0 => (0, 0, 0),
                4 | 7 | 11 => (u16::from_le_bytes([body[0], body[1]]), body[2], body[3]),
                _ => return None,
            };
            let date = format!("{:04}-{:02}-{:02}", year, month, day);
            if kind == ColumnKind::Date {
                return Some(date);
            }

            let (hour, minute, second) = match body.get(4..7) {
                Some(&[h, m, s]) => (h, m, s),
                _ => (0, 0, 0),
            };
            Some(format!(
                "{} {}",
                date,
                clock(u32::from(hour), minute, second, micros(body, 7))
            ))
        }
        ColumnKind::Time => match body.len() {
            0 => Some(clock(0, 0, 0, 0)),
            8 | 12 => {
                let negative = body[0] == 1;
                let days = u32::from_le_bytes([body[1], body[2], body[3], body[4]]);
                let hours = days * 24 + u32::from(body[5]);
                let sign = if negative { "-" } else { "" };
                Some(format!(
                    "{}{}",
                    sign,
                    clock(hours, body[6], body[7], micros(body, 8))
                ))
            }
            _ => None,
        },
        _ => None,
    }
}

fn micros(body: &[u8], at: usize) -> u32 {
    match body.get(at..at + 4) {
        Some(&[a, b, c, d]) => u32::from_le_bytes([a, b, c, d]),
        _ => 0,
    }
}

fn clock(hours: u32, minutes: u8, seconds: u8, micros: u32) -> String {
    if micros == 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}.{:06}", hours, minutes, seconds, micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_kinds() {
        assert_eq!(ColumnKind::from_type_name("INT"), ColumnKind::Signed);
        assert_eq!(ColumnKind::from_type_name("BIGINT"), ColumnKind::Signed);
        assert_eq!(
            ColumnKind::from_type_name("BIGINT UNSIGNED"),
            ColumnKind::Unsigned
        );
        assert_eq!(
            ColumnKind::from_type_name("tinyint unsigned"),
            ColumnKind::Unsigned
        );
        assert_eq!(ColumnKind::from_type_name("BOOLEAN"), ColumnKind::Signed);
    }

    #[test]
    fn test_textual_kinds() {
        for name in ["VARCHAR", "CHAR", "TEXT", "LONGTEXT", "JSON", "ENUM", "DECIMAL"] {
            assert_eq!(ColumnKind::from_type_name(name), ColumnKind::Textual, "{}", name);
        }
    }

    #[test]
    fn test_binary_kinds() {
        for name in ["VARBINARY", "BINARY", "BLOB", "LONGBLOB", "BIT", "GEOMETRY"] {
            assert_eq!(ColumnKind::from_type_name(name), ColumnKind::Bytes, "{}", name);
        }
    }

    #[test]
    fn test_temporal_kinds() {
        assert_eq!(ColumnKind::from_type_name("DATE"), ColumnKind::Date);
        assert_eq!(ColumnKind::from_type_name("DATETIME"), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from_type_name("TIMESTAMP"), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from_type_name("TIME"), ColumnKind::Time);
        assert_eq!(ColumnKind::from_type_name("YEAR"), ColumnKind::Year);
    }

    #[test]
    fn test_packed_dates() {
        assert_eq!(
            format_packed(ColumnKind::Date, &[4, 0xe8, 0x07, 3, 1]).as_deref(),
            Some("2024-03-01")
        );
        assert_eq!(
            format_packed(ColumnKind::DateTime, &[7, 0xe8, 0x07, 3, 1, 9, 5, 30]).as_deref(),
            Some("2024-03-01 09:05:30")
        );
        assert_eq!(
            format_packed(ColumnKind::DateTime, &[4, 0xe8, 0x07, 12, 31]).as_deref(),
            Some("2024-12-31 00:00:00")
        );
        assert_eq!(
            format_packed(
                ColumnKind::DateTime,
                &[11, 0xe8, 0x07, 3, 1, 9, 5, 30, 0x20, 0xa1, 0x07, 0]
            )
            .as_deref(),
            Some("2024-03-01 09:05:30.500000")
        );
    }

    #[test]
    fn test_packed_zero_dates() {
        assert_eq!(
            format_packed(ColumnKind::DateTime, &[0]).as_deref(),
            Some("0000-00-00 00:00:00")
        );
        assert_eq!(
            format_packed(ColumnKind::Date, &[0]).as_deref(),
            Some("0000-00-00")
        );
        assert_eq!(
            format_packed(ColumnKind::Date, &[4, 0xe8, 0x07, 0, 0]).as_deref(),
            Some("2024-00-00")
        );
    }

    #[test]
    fn test_packed_times() {
        assert_eq!(format_packed(ColumnKind::Time, &[0]).as_deref(), Some("00:00:00"));
        assert_eq!(
            format_packed(ColumnKind::Time, &[8, 0, 0, 0, 0, 0, 13, 45, 0]).as_deref(),
            Some("13:45:00")
        );
        // 34 days 22:59:59, the TIME maximum.
        assert_eq!(
            format_packed(ColumnKind::Time, &[8, 0, 34, 0, 0, 0, 22, 59, 59]).as_deref(),
            Some("838:59:59")
        );
        assert_eq!(
            format_packed(ColumnKind::Time, &[8, 1, 1, 0, 0, 0, 2, 0, 0]).as_deref(),
            Some("-26:00:00")
        );
        assert_eq!(
            format_packed(ColumnKind::Time, &[12, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0]).as_deref(),
            Some("00:00:01.000001")
        );
    }

    #[test]
    fn test_packed_rejects_text_protocol() {
        assert_eq!(format_packed(ColumnKind::Date, b"2024-03-01"), None);
        assert_eq!(format_packed(ColumnKind::Time, b"-01:00:00"), None);
        assert_eq!(format_packed(ColumnKind::Time, &[]), None);
        assert_eq!(format_packed(ColumnKind::Year, &[0]), None);
    }
}

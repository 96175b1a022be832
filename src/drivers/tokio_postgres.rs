use std::error::Error;
use std::net::IpAddr;

use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tokio_postgres::types::{to_sql_checked, FromSql, IsNull, Kind, ToSql, Type};
use tokio_postgres::{Client, NoTls, Row, SimpleQueryMessage};
use tracing::error;
use uuid::Uuid;

use crate::config::ConnectionParams;
use crate::error::DriverResult;
use crate::traits::{Connector, DatabaseDriver};
use crate::types::{RawQueryResult, SqlValue};

/// PostgreSQL driver implementation using tokio-postgres.
pub struct TokioPostgresDriver {
    client: Client,
}

impl TokioPostgresDriver {
    /// Connect to a PostgreSQL database.
    pub async fn connect(params: &ConnectionParams) -> DriverResult<Self> {
        let (client, connection) = match params {
            ConnectionParams::Uri(uri) => tokio_postgres::connect(uri, NoTls).await?,
            ConnectionParams::Attributes(attributes) => {
                attributes.to_pg_config().connect(NoTls).await?
            }
        };

        // Spawn the connection handler; it ends when the client is dropped
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Self { client })
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DriverResult<RawQueryResult> {
        let converted: Vec<Param<'_>> = params.iter().map(Param).collect();
        let param_refs: Vec<&(dyn ToSql + Sync)> =
            converted.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let rows = self.client.query(sql, &param_refs).await?;

        // Extract column names
        let columns: Vec<String> = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            None => Vec::new(),
        };

        let result_rows = rows
            .iter()
            .map(|row| {
                row.columns()
                    .iter()
                    .enumerate()
                    .map(|(i, col)| row_value(row, i, col.type_()))
                    .collect::<DriverResult<Vec<_>>>()
            })
            .collect::<DriverResult<Vec<_>>>()?;

        Ok(RawQueryResult::new(columns, result_rows))
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DriverResult<u64> {
        if params.is_empty() {
            // Simple protocol, so utility statements run outside an implicit transaction
            let messages = self.client.simple_query(sql).await?;
            return Ok(messages
                .iter()
                .map(|m| match m {
                    SimpleQueryMessage::CommandComplete(n) => *n,
                    _ => 0,
                })
                .sum());
        }

        let converted: Vec<Param<'_>> = params.iter().map(Param).collect();
        let param_refs: Vec<&(dyn ToSql + Sync)> =
            converted.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Ok(self.client.execute(sql, &param_refs).await?)
    }
}

/// Connects through [`TokioPostgresDriver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPostgresConnector;

#[async_trait]
impl Connector for TokioPostgresConnector {
    async fn connect(&self, params: &ConnectionParams) -> DriverResult<Box<dyn DatabaseDriver>> {
        let driver = TokioPostgresDriver::connect(params).await?;
        Ok(Box::new(driver))
    }
}

/// Binds a SqlValue as a statement parameter.
///
/// Integers and floats are converted to the width the server expects for the
/// placeholder, so `Int32(40)` can be compared with a `smallint` column.
/// Other values must match the placeholder type.
#[derive(Debug)]
struct Param<'a>(&'a SqlValue);

impl ToSql for Param<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        if let Some(i) = self.0.as_i64() {
            return match *ty {
                Type::INT2 => i16::try_from(i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(i)?.to_sql(ty, out),
                Type::INT8 => i.to_sql(ty, out),
                Type::FLOAT4 => (i as f32).to_sql(ty, out),
                Type::FLOAT8 => (i as f64).to_sql(ty, out),
                _ => Err(wrong_type(self.0, ty)),
            };
        }
        match self.0 {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Float64(f) if *ty == Type::FLOAT4 => (*f as f32).to_sql(ty, out),
            SqlValue::Float64(f) => f.to_sql_checked(ty, out),
            SqlValue::Bool(b) => b.to_sql_checked(ty, out),
            SqlValue::Text(s) => s.to_sql_checked(ty, out),
            SqlValue::Date(d) => d.to_sql_checked(ty, out),
            SqlValue::Time(t) => t.to_sql_checked(ty, out),
            SqlValue::Timestamp(ts) => ts.to_sql_checked(ty, out),
            SqlValue::TimestampTz(ts) => ts.to_sql_checked(ty, out),
            SqlValue::Json(json) => json.to_sql_checked(ty, out),
            SqlValue::Uuid(uuid) => uuid.to_sql_checked(ty, out),
            SqlValue::Int16(_) | SqlValue::Int32(_) | SqlValue::Int64(_) => {
                Err(wrong_type(self.0, ty))
            }
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn wrong_type(value: &SqlValue, ty: &Type) -> BoxError {
    format!("cannot bind {:?} to a parameter of type {}", value, ty).into()
}

/// Convert the value at `index` to a SqlValue based on its column type.
/// Types without a dedicated variant are read as text through [`TextValue`].
fn row_value(row: &Row, index: usize, ty: &Type) -> DriverResult<SqlValue> {
    let value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(index)?.map(SqlValue::Bool),
        Type::INT2 => row.try_get::<_, Option<i16>>(index)?.map(SqlValue::Int16),
        Type::INT4 => row.try_get::<_, Option<i32>>(index)?.map(SqlValue::Int32),
        Type::INT8 => row.try_get::<_, Option<i64>>(index)?.map(SqlValue::Int64),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(index)?
            .map(|f| SqlValue::Float64(f64::from(f))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(index)?.map(SqlValue::Float64),
        Type::DATE => row.try_get::<_, Option<NaiveDate>>(index)?.map(SqlValue::Date),
        Type::TIME => row.try_get::<_, Option<NaiveTime>>(index)?.map(SqlValue::Time),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(index)?
            .map(SqlValue::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(index)?
            .map(SqlValue::TimestampTz),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<serde_json::Value>>(index)?
            .map(SqlValue::Json),
        Type::UUID => row.try_get::<_, Option<Uuid>>(index)?.map(SqlValue::Uuid),
        _ => row
            .try_get::<_, Option<TextValue>>(index)?
            .map(|t| SqlValue::Text(t.0)),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}

type BoxError = Box<dyn Error + Sync + Send>;

/// A column value rendered as PostgreSQL would print it.
///
/// Numbers with arbitrary precision, byte strings, intervals and network
/// addresses are decoded from their binary form. Text-like types (including
/// enums and `citext`) are read as UTF-8.
#[derive(Debug, PartialEq)]
struct TextValue(String);

impl<'a> FromSql<'a> for TextValue {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let text = match *ty {
            Type::NUMERIC => numeric_text(raw)?,
            Type::BYTEA => bytea_text(raw),
            Type::INTERVAL => interval_text(raw)?,
            Type::INET | Type::CIDR => inet_text(raw)?,
            Type::MACADDR => macaddr_text(raw)?,
            Type::OID => {
                let mut buf = raw;
                check_len(buf, 4, ty)?;
                buf.get_u32().to_string()
            }
            _ if is_text_like(ty) => std::str::from_utf8(raw)?.to_string(),
            _ => return Err(format!("unsupported column type {}", ty).into()),
        };
        Ok(TextValue(text))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn is_text_like(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN | Type::XML
    ) || matches!(ty.kind(), Kind::Enum(_))
        || ty.name() == "citext"
}

fn check_len(raw: &[u8], needed: usize, ty: &Type) -> Result<(), BoxError> {
    if raw.len() < needed {
        return Err(format!("invalid {} value: {} bytes", ty, raw.len()).into());
    }
    Ok(())
}

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// Binary numeric: digit count, weight, sign and display scale, followed by
/// base-10000 digits. `weight` is the power of 10000 of the first digit.
fn numeric_text(raw: &[u8]) -> Result<String, BoxError> {
    let mut buf = raw;
    check_len(buf, 8, &Type::NUMERIC)?;
    let ndigits = usize::from(buf.get_u16());
    let weight = i32::from(buf.get_i16());
    let sign = buf.get_u16();
    let dscale = usize::from(buf.get_u16());
    check_len(buf, ndigits * 2, &Type::NUMERIC)?;
    let digits: Vec<i16> = (0..ndigits).map(|_| buf.get_i16()).collect();

    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        _ => {}
    }

    let digit = |i: i32| -> i16 {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut text = String::new();
    if sign == NUMERIC_NEG {
        text.push('-');
    }
    if weight < 0 {
        text.push('0');
    } else {
        text.push_str(&digit(0).to_string());
        for i in 1..=weight {
            text.push_str(&format!("{:04}", digit(i)));
        }
    }
    if dscale > 0 {
        let mut fraction = String::with_capacity(dscale + 4);
        let mut i = weight + 1;
        while fraction.len() < dscale {
            fraction.push_str(&format!("{:04}", digit(i)));
            i += 1;
        }
        fraction.truncate(dscale);
        text.push('.');
        text.push_str(&fraction);
    }
    Ok(text)
}

/// Hex output format, as with `bytea_output = 'hex'`.
fn bytea_text(raw: &[u8]) -> String {
    let mut text = String::with_capacity(2 + raw.len() * 2);
    text.push_str("\\x");
    for byte in raw {
        text.push_str(&format!("{:02x}", byte));
    }
    text
}

/// Binary interval: microseconds, days, months. Rendered in the `postgres`
/// interval style, e.g. `1 year 2 mons 3 days 04:05:06.5`.
fn interval_text(raw: &[u8]) -> Result<String, BoxError> {
    let mut buf = raw;
    check_len(buf, 16, &Type::INTERVAL)?;
    let micros = buf.get_i64();
    let days = buf.get_i32();
    let months = buf.get_i32();

    let plural = |n: i32, unit: &str, units: &str| -> String {
        format!("{} {}", n, if n.abs() == 1 { unit } else { units })
    };

    let mut parts = Vec::new();
    let (years, months) = (months / 12, months % 12);
    if years != 0 {
        parts.push(plural(years, "year", "years"));
    }
    if months != 0 {
        parts.push(plural(months, "mon", "mons"));
    }
    if days != 0 {
        parts.push(plural(days, "day", "days"));
    }
    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 { "-" } else { "" };
        let total = micros.unsigned_abs();
        let secs = total / 1_000_000;
        let mut clock = format!(
            "{}{:02}:{:02}:{:02}",
            sign,
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        );
        let fraction = total % 1_000_000;
        if fraction != 0 {
            let digits = format!("{:06}", fraction);
            clock.push('.');
            clock.push_str(digits.trim_end_matches('0'));
        }
        parts.push(clock);
    }
    Ok(parts.join(" "))
}

const PGSQL_AF_INET: u8 = 2;
const PGSQL_AF_INET6: u8 = 3;

/// Binary inet/cidr: family, prefix bits, cidr flag, address length, address.
fn inet_text(raw: &[u8]) -> Result<String, BoxError> {
    let mut buf = raw;
    check_len(buf, 4, &Type::INET)?;
    let family = buf.get_u8();
    let bits = buf.get_u8();
    let is_cidr = buf.get_u8() != 0;
    let len = usize::from(buf.get_u8());
    check_len(buf, len, &Type::INET)?;

    let (addr, max_bits) = match (family, len) {
        (PGSQL_AF_INET, 4) => {
            let octets: [u8; 4] = [buf[0], buf[1], buf[2], buf[3]];
            (IpAddr::from(octets), 32)
        }
        (PGSQL_AF_INET6, 16) => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&buf[..16]);
            (IpAddr::from(octets), 128)
        }
        _ => return Err(format!("invalid inet family {} with length {}", family, len).into()),
    };

    if is_cidr || bits != max_bits {
        Ok(format!("{}/{}", addr, bits))
    } else {
        Ok(addr.to_string())
    }
}

fn macaddr_text(raw: &[u8]) -> Result<String, BoxError> {
    check_len(raw, 6, &Type::MACADDR)?;
    Ok(raw[..6]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;

    fn numeric(weight: i16, sign: u16, dscale: u16, digits: &[i16]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        buf.put_u16(digits.len() as u16);
        buf.put_i16(weight);
        buf.put_u16(sign);
        buf.put_u16(dscale);
        for d in digits {
            buf.put_i16(*d);
        }
        buf.to_vec()
    }

    fn decode(ty: &Type, raw: &[u8]) -> String {
        TextValue::from_sql(ty, raw).unwrap().0
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(decode(&Type::NUMERIC, &numeric(0, 0, 2, &[12, 5000])), "12.50");
        assert_eq!(decode(&Type::NUMERIC, &numeric(-1, 0, 2, &[500])), "0.05");
        assert_eq!(
            decode(&Type::NUMERIC, &numeric(1, NUMERIC_NEG, 1, &[12, 3456, 7000])),
            "-123456.7"
        );
        assert_eq!(decode(&Type::NUMERIC, &numeric(1, 0, 0, &[1])), "10000");
        assert_eq!(decode(&Type::NUMERIC, &numeric(0, 0, 0, &[])), "0");
        assert_eq!(decode(&Type::NUMERIC, &numeric(0, NUMERIC_NAN, 0, &[])), "NaN");
    }

    #[test]
    fn test_numeric_rejects_truncated_input() {
        assert!(TextValue::from_sql(&Type::NUMERIC, &[0, 2, 0, 0]).is_err());
        let mut short = numeric(0, 0, 0, &[1, 2]);
        short.truncate(10);
        assert!(TextValue::from_sql(&Type::NUMERIC, &short).is_err());
    }

    #[test]
    fn test_interval_text() {
        let interval = |micros: i64, days: i32, months: i32| {
            let mut buf = BytesMut::new();
            buf.put_i64(micros);
            buf.put_i32(days);
            buf.put_i32(months);
            decode(&Type::INTERVAL, &buf)
        };
        assert_eq!(interval(7_200_000_000, 1, 0), "1 day 02:00:00");
        assert_eq!(interval(0, 3, 14), "1 year 2 mons 3 days");
        assert_eq!(interval(0, 0, 0), "00:00:00");
        assert_eq!(interval(-1_500_000, 0, 0), "-00:00:01.5");
    }

    #[test]
    fn test_bytea_and_network_text() {
        assert_eq!(decode(&Type::BYTEA, &[0x01, 0xab]), "\\x01ab");
        assert_eq!(decode(&Type::INET, &[2, 32, 0, 4, 10, 0, 0, 1]), "10.0.0.1");
        assert_eq!(decode(&Type::CIDR, &[2, 24, 1, 4, 10, 0, 0, 0]), "10.0.0.0/24");
        assert_eq!(
            decode(&Type::MACADDR, &[0x08, 0x00, 0x2b, 0x01, 0x02, 0x03]),
            "08:00:2b:01:02:03"
        );
        assert_eq!(decode(&Type::OID, &[0, 0, 0x04, 0xd2]), "1234");
    }

    #[test]
    fn test_text_like_and_unsupported() {
        assert_eq!(decode(&Type::VARCHAR, b"Fred"), "Fred");
        assert_eq!(decode(&Type::XML, b"<a/>"), "<a/>");

        let err = TextValue::from_sql(&Type::TS_VECTOR, b"x").unwrap_err();
        assert_eq!(err.to_string(), "unsupported column type tsvector");
    }
}

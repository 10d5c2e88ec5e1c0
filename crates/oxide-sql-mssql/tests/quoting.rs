//! Tests for literal rendering, parameter casting and type metadata.

mod common;
use common::*;

use chrono::{DateTime, NaiveDate, NaiveTime};
use oxide_sql_mssql::{CastKind, Column, NativeValue, SqlValue, ToSqlValue, TypeMetadataOptions};
use uuid::Uuid;

#[test]
fn quote_text_is_national() {
    assert_eq!(quoting().quote(&"O'Brien".to_sql_value()), "N'O''Brien'");
    assert_eq!(quoting().quote(&text("")), "N''");
}

#[test]
fn quote_injection_stays_inside_literal() {
    let sql = quoting().quote(&text("'; DROP TABLE users; --"));
    assert_eq!(sql, "N'''; DROP TABLE users; --'");
}

#[test]
fn quote_binary_as_hex() {
    let bytes: &[u8] = &[0x01, 0xAB, 0xFF];
    assert_eq!(quoting().quote(&bytes.to_sql_value()), "0x01abff");
}

#[test]
fn quote_booleans() {
    assert_eq!(quoting().quote(&true.to_sql_value()), "1");
    assert_eq!(quoting().quote(&false.to_sql_value()), "0");
}

#[test]
fn quote_null_and_numbers() {
    assert_eq!(quoting().quote(&None::<i32>.to_sql_value()), "NULL");
    assert_eq!(quoting().quote(&(-7i64).to_sql_value()), "-7");
}

#[test]
fn quote_native_values() {
    let q = quoting();
    assert_eq!(
        q.quote(&NativeValue::VarChar(String::from("it's")).to_sql_value()),
        "'it''s'"
    );
    assert_eq!(
        q.quote(&Uuid::nil().to_sql_value()),
        "'00000000-0000-0000-0000-000000000000'"
    );

    let time = NaiveTime::from_hms_nano_opt(13, 5, 9, 123_456_789).unwrap();
    assert_eq!(
        q.quote(&NativeValue::Time { value: time, precision: 3 }.to_sql_value()),
        "'13:05:09.123'"
    );

    let offset = DateTime::parse_from_rfc3339("2024-02-29T23:59:59.5+05:30").unwrap();
    assert_eq!(
        q.quote(
            &NativeValue::DateTimeOffset {
                value: offset,
                precision: 2
            }
            .to_sql_value()
        ),
        "'2024-02-29 23:59:59.50 +05:30'"
    );
}

#[test]
fn quote_dates() {
    let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    let datetime = date.and_hms_milli_opt(23, 59, 58, 7).unwrap();
    assert_eq!(quoting().quote(&date.to_sql_value()), "'1999-12-31'");
    assert_eq!(
        quoting().quote(&datetime.to_sql_value()),
        "'1999-12-31T23:59:58.007'"
    );
}

#[test]
fn default_expression_for_uniqueidentifier() {
    let q = quoting();
    let column = Column::new("guid", "UNIQUEIDENTIFIER");
    assert_eq!(
        q.quote_default_expression(&text("newsequentialid()"), &column),
        "newsequentialid()"
    );
    assert_eq!(q.quote_default_expression(&SqlValue::Null, &column), "NULL");
}

#[test]
fn default_expression_for_other_columns() {
    let q = quoting();
    assert_eq!(
        q.quote_default_expression(&text("newid()"), &Column::new("code", "varchar(36)")),
        "N'newid()'"
    );
    assert_eq!(
        q.quote_default_expression(&SqlValue::Int(5), &Column::new("n", "int")),
        "5"
    );
}

#[test]
fn default_expression_follows_dialect_literals() {
    let q = quoting();
    assert_eq!(
        q.quote_default_expression(&true.to_sql_value(), &Column::new("enabled", "bit")),
        "1"
    );
    assert_eq!(
        q.quote_default_expression(&text("Zoë"), &Column::new("name", "nvarchar(20)")),
        "N'Zoë'"
    );
    let bytes: &[u8] = &[0xDE, 0xAD];
    assert_eq!(
        q.quote_default_expression(&bytes.to_sql_value(), &Column::new("blob", "varbinary(10)")),
        "0xdead"
    );
}

#[test]
fn type_cast_for_binding() {
    let q = quoting();
    assert_eq!(
        q.type_cast(&NativeValue::Char(String::from("A")).to_sql_value()),
        text("A")
    );
    assert_eq!(q.type_cast(&false.to_sql_value()), SqlValue::Int(0));
    assert_eq!(q.type_cast(&SqlValue::Float(2.5)), SqlValue::Float(2.5));
}

#[test]
fn type_metadata_from_declared_type() {
    let q = quoting();

    let meta = q.fetch_type_metadata(
        "nvarchar(max)",
        TypeMetadataOptions::new()
            .table_name("dbo.Users")
            .ordinal_position(3),
    );
    assert_eq!(meta.sql_type(), "nvarchar(max)");
    assert_eq!(meta.kind(), CastKind::String);
    assert_eq!(meta.limit(), Some(1_073_741_823));
    assert_eq!(meta.table_name(), Some("dbo.Users"));
    assert_eq!(meta.ordinal_position(), Some(3));

    let meta = q.fetch_type_metadata(
        "int",
        TypeMetadataOptions::new().identity(true).primary(true),
    );
    assert_eq!(meta.kind(), CastKind::Integer);
    assert_eq!(meta.limit(), Some(4));
    assert!(meta.is_identity());
    assert!(meta.is_primary());

    assert_eq!(
        q.fetch_type_metadata("geography", TypeMetadataOptions::new()).kind(),
        CastKind::Other
    );
}

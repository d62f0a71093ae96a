//! SQL text for the layer tables
//!
//! Identifiers are always double-quoted: several columns (`product-area`,
//! `content-area`) are not valid bare identifiers.

use crate::domain::geometry::RD_NEW_SRID;
use crate::domain::record::{table_columns, RecordField};

/// Column holding the publication date used for cursor and boundary deletes
pub const MODIFIED_COLUMN: &str = "modified";

/// Column holding the geometry
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Quote an identifier, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `"schema"."table"`
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Existence check against the information schema
pub fn table_exists() -> &'static str {
    "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_schema = $1 AND table_name = $2)"
}

/// Newest modified date; the cast accepts both `date` and ISO-text columns
pub fn max_modified(schema: &str, table: &str) -> String {
    format!(
        "SELECT max({}::date) FROM {}",
        quote_ident(MODIFIED_COLUMN),
        qualified(schema, table)
    )
}

/// Delete all rows of one day
pub fn delete_modified_on(schema: &str, table: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {}::date = $1",
        qualified(schema, table),
        quote_ident(MODIFIED_COLUMN)
    )
}

/// Create a layer table with the full column set
pub fn create_table(schema: &str, table: &str) -> String {
    let columns: Vec<String> = table_columns()
        .iter()
        .map(|column| {
            let sql_type = match column.as_str() {
                MODIFIED_COLUMN => "date".to_string(),
                GEOMETRY_COLUMN => format!("geometry(Geometry, {RD_NEW_SRID})"),
                _ => "text".to_string(),
            };
            format!("{} {}", quote_ident(column), sql_type)
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified(schema, table),
        columns.join(", ")
    )
}

/// Create the schema if it is missing
pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema))
}

/// Parameterised single-row insert
///
/// Every parameter carries an explicit cast so the statement prepares the same
/// way whether `modified` is a `date` or a legacy `text` column.
pub fn insert(schema: &str, table: &str) -> String {
    let columns = table_columns();
    let modified_position = RecordField::Modified as usize;
    let geometry_position = columns.len() - 1;

    let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let values: Vec<String> = (0..columns.len())
        .map(|i| {
            let param = i + 1;
            if i == modified_position {
                format!("${param}::date")
            } else if i == geometry_position {
                format!("ST_GeomFromText(${param}::text, {RD_NEW_SRID})")
            } else {
                format!("${param}::text")
            }
        })
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified(schema, table),
        names.join(", "),
        values.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("product-area"), "\"product-area\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(qualified("geo", "punten"), "\"geo\".\"punten\"");
    }

    #[test]
    fn test_create_table_column_types() {
        let sql = create_table("geo", "vlakken");
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"geo\".\"vlakken\""));
        assert!(sql.contains("\"modified\" date"));
        assert!(sql.contains("\"product-area\" text"));
        assert!(sql.contains("\"geometrielabel\" text"));
        assert!(sql.contains("\"geometry\" geometry(Geometry, 28992)"));
    }

    #[test]
    fn test_insert_placeholders() {
        let sql = insert("geo", "punten");
        let columns = table_columns().len();
        assert!(sql.contains(&format!("ST_GeomFromText(${columns}::text, 28992)")));
        assert!(sql.contains("$5::date"));
        assert!(sql.contains("$1::text"));
        assert!(!sql.contains(&format!("${}", columns + 1)));
    }

    #[test]
    fn test_delete_and_max_use_day_granularity() {
        assert_eq!(
            delete_modified_on("geo", "lijnen"),
            "DELETE FROM \"geo\".\"lijnen\" WHERE \"modified\"::date = $1"
        );
        assert_eq!(
            max_modified("geo", "lijnen"),
            "SELECT max(\"modified\"::date) FROM \"geo\".\"lijnen\""
        );
    }
}

// src/schema/types.rs

/// How a required column is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    Date,
    Numeric,
}

/// A required column of the cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

pub const ISO_CODE: &str = "iso_code";
pub const DATE: &str = "date";
pub const TOTAL_TESTS: &str = "total_tests";

/// Output columns, in output order.
pub const OUTPUT_COLUMNS: [Column; 10] = [
    col(ISO_CODE, ColumnKind::Text),
    col("location", ColumnKind::Text),
    col(DATE, ColumnKind::Date),
    col("population", ColumnKind::Numeric),
    col(TOTAL_TESTS, ColumnKind::Numeric),
    col("total_cases", ColumnKind::Numeric),
    col("total_deaths", ColumnKind::Numeric),
    col("hospital_beds_per_thousand", ColumnKind::Numeric),
    col("human_development_index", ColumnKind::Numeric),
    col("life_expectancy", ColumnKind::Numeric),
];

pub fn output_column_names() -> impl Iterator<Item = &'static str> {
    OUTPUT_COLUMNS.iter().map(|c| c.name)
}

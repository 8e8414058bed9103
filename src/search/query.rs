// src/search/query.rs
use std::fmt;

use crate::models::{BoundingBox, LongitudeRange};
use crate::utils::constants::{MAX_LONGITUDE, MIN_LONGITUDE, QUERY_COORDINATE_PRECISION};

pub const LATITUDE_FIELD: &str = "lat";
pub const LONGITUDE_FIELD: &str = "lon";

/// Filter expression understood by the search index (Lucene syntax when
/// rendered with `Display`).
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpression {
    /// Inclusive numeric range on one field.
    Range { field: &'static str, min: f64, max: f64 },
    And(Vec<QueryExpression>),
    Or(Vec<QueryExpression>),
}

impl QueryExpression {
    pub fn range(field: &'static str, min: f64, max: f64) -> Self {
        QueryExpression::Range { field, min, max }
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryExpression::Range { field, min, max } => write!(
                f,
                "{}:[{:.prec$} TO {:.prec$}]",
                field,
                min,
                max,
                prec = QUERY_COORDINATE_PRECISION
            ),
            QueryExpression::And(parts) => write_joined(f, parts, " AND "),
            QueryExpression::Or(parts) => write_joined(f, parts, " OR "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[QueryExpression], separator: &str) -> fmt::Result {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        // nested compound expressions need their own grouping
        match part {
            QueryExpression::Range { .. } => write!(f, "{}", part)?,
            _ => write!(f, "({})", part)?,
        }
    }
    Ok(())
}

/// Search filter selecting every record inside `bounds`.
///
/// A box that crosses the antimeridian becomes a disjunction of two
/// non-wrapping longitude ranges.
pub fn build_query(bounds: &BoundingBox) -> QueryExpression {
    let latitude = QueryExpression::range(LATITUDE_FIELD, bounds.min_lat, bounds.max_lat);
    let longitude = match bounds.longitude {
        LongitudeRange::Contiguous { min, max } => QueryExpression::range(LONGITUDE_FIELD, min, max),
        LongitudeRange::Antimeridian { min, max } => QueryExpression::Or(vec![
            QueryExpression::range(LONGITUDE_FIELD, min, MAX_LONGITUDE),
            QueryExpression::range(LONGITUDE_FIELD, MIN_LONGITUDE, max),
        ]),
    };
    QueryExpression::And(vec![latitude, longitude])
}

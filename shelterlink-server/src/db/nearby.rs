//! Listing queries with an optional haversine radius filter
//!
//! Postgres cannot reference a select-list alias in `WHERE`/`HAVING`
//! without grouping, so the distance is computed in an inner select and
//! filtered in the outer one:
//!
//! ```text
//! SELECT * FROM (
//!     SELECT <columns>, <haversine> AS distance FROM <table> WHERE 1=1 AND ...
//! ) AS candidates
//! WHERE distance < $r ORDER BY distance ASC LIMIT $l OFFSET $o
//! ```
//!
//! Without a location the `distance` column is a typed NULL so the same row
//! type decodes both shapes.

use super::{SqlValue, Statement};
use crate::models::{GeoFilter, GeoPoint, Pagination};

/// Earth radius rendered into SQL; kept equal to `geo::EARTH_RADIUS_KM`.
const EARTH_RADIUS_SQL: &str = "6371.0";

/// Builder for a geolocated listing query.
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    stmt: Statement,
    geo: Option<GeoFilter>,
}

impl NearbyQuery {
    /// Start `SELECT <columns>, <distance> FROM <table> WHERE 1=1`.
    ///
    /// `columns` and `table` must be compile-time identifiers. The table must
    /// have `latitude` and `longitude` columns.
    pub fn select(columns: &'static str, table: &'static str, geo: Option<GeoFilter>) -> Self {
        let mut stmt = Statement::new("SELECT * FROM (SELECT ");
        stmt.push(columns).push(", ");
        match geo {
            Some(filter) => push_haversine(&mut stmt, filter.origin),
            None => {
                stmt.push("NULL::DOUBLE PRECISION");
            }
        }
        stmt.push(" AS distance FROM ").push(table).push(" WHERE 1=1");
        Self { stmt, geo }
    }

    /// Add `AND <column> = $n` when the filter is present.
    pub fn filter_eq<V>(mut self, column: &'static str, value: Option<V>) -> Self
    where
        V: Into<SqlValue>,
    {
        self.stmt.and_eq(column, value);
        self
    }

    /// Add a case-insensitive substring match when the term is present.
    pub fn filter_contains(mut self, column: &'static str, term: Option<&str>) -> Self {
        self.stmt.and_contains(column, term);
        self
    }

    /// Close the inner select and apply radius, ordering and paging.
    ///
    /// With a location, rows are limited to `distance < radius` and ordered
    /// nearest first; otherwise `fallback_order` applies.
    pub fn finish(mut self, fallback_order: &'static str, page: Pagination) -> Statement {
        self.stmt.push(") AS candidates");
        match self.geo {
            Some(filter) => {
                self.stmt
                    .push(" WHERE distance < ")
                    .push_bind(filter.radius_km)
                    .push(" ORDER BY distance ASC, id ASC");
            }
            None => {
                self.stmt.push(" ORDER BY ").push(fallback_order);
            }
        }
        self.stmt.limit_offset(page.limit(), page.offset());
        self.stmt
    }
}

/// Append the haversine distance (km) from `origin` to the row's
/// `latitude`/`longitude`.
fn push_haversine(stmt: &mut Statement, origin: GeoPoint) {
    stmt.push("(2 * ")
        .push(EARTH_RADIUS_SQL)
        .push(" * ASIN(LEAST(1.0, SQRT(POWER(SIN(RADIANS(latitude - ")
        .push_bind(origin.lat)
        .push(") / 2), 2) + COS(RADIANS(")
        .push_bind(origin.lat)
        .push(")) * COS(RADIANS(latitude)) * POWER(SIN(RADIANS(longitude - ")
        .push_bind(origin.lng)
        .push(") / 2), 2)))))");
}

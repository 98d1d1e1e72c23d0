//! Parameter-bound SQL statements
//!
//! A [`Statement`] carries SQL text and its bind values side by side.
//! Placeholders are numbered automatically (`$1`, `$2`, ...) as values are
//! pushed, so filter clauses can be appended conditionally without ever
//! interpolating request data into the SQL text.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};

/// A typed, nullable bind value.
///
/// Every variant carries an `Option` so that NULLs keep their Postgres type
/// (binding an untyped NULL into an integer column fails).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
}

macro_rules! impl_from_value {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for SqlValue {
            fn from(v: $ty) -> Self {
                SqlValue::$variant(Some(v.into()))
            }
        }

        impl From<Option<$ty>> for SqlValue {
            fn from(v: Option<$ty>) -> Self {
                SqlValue::$variant(v.map(Into::into))
            }
        }
    };
}

impl_from_value!(Bool, bool);
impl_from_value!(Int, i64);
impl_from_value!(Int, i32);
impl_from_value!(Float, f64);
impl_from_value!(Text, String);
impl_from_value!(Text, &str);
impl_from_value!(Timestamp, DateTime<Utc>);

/// SQL text plus positional bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    sql: String,
    values: Vec<SqlValue>,
}

impl Statement {
    /// Start a statement from literal SQL.
    ///
    /// Literal SQL may already contain `$n` placeholders; supply their values
    /// with [`Statement::bind`] in order.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            values: Vec::new(),
        }
    }

    /// Attach the value for the next placeholder already present in the SQL.
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Append raw SQL text. Never pass request data here.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a new `$n` placeholder and record its value.
    pub fn push_bind(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.values.push(value.into());
        let n = self.values.len();
        self.sql.push('$');
        self.sql.push_str(&n.to_string());
        self
    }

    /// Append `AND <column> = $n` when a filter value is present.
    ///
    /// `column` must be a compile-time identifier, not user input.
    pub fn and_eq<V>(&mut self, column: &'static str, value: Option<V>) -> &mut Self
    where
        V: Into<SqlValue>,
    {
        if let Some(v) = value {
            self.push(" AND ").push(column).push(" = ").push_bind(v);
        }
        self
    }

    /// Append `AND <column> ILIKE '%term%'` for a free-text search.
    pub fn and_contains(&mut self, column: &'static str, term: Option<&str>) -> &mut Self {
        if let Some(t) = term.map(str::trim).filter(|t| !t.is_empty()) {
            self.push(" AND ")
                .push(column)
                .push(" ILIKE ")
                .push_bind(format!("%{}%", escape_like(t)));
        }
        self
    }

    /// Append `LIMIT $n OFFSET $m`.
    pub fn limit_offset(&mut self, limit: u32, offset: u64) -> &mut Self {
        self.push(" LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(offset as i64)
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Build an untyped sqlx query with every value bound in order.
    pub(crate) fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.values
            .iter()
            .fold(sqlx::query::<Postgres>(&self.sql), |q, v| match v {
                SqlValue::Bool(b) => q.bind(*b),
                SqlValue::Int(i) => q.bind(*i),
                SqlValue::Float(f) => q.bind(*f),
                SqlValue::Text(s) => q.bind(s.as_deref()),
                SqlValue::Timestamp(t) => q.bind(*t),
            })
    }

    /// Build a typed sqlx query with every value bound in order.
    pub(crate) fn query_as<T>(&self) -> QueryAs<'_, Postgres, T, PgArguments>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
    {
        self.values
            .iter()
            .fold(sqlx::query_as::<Postgres, T>(&self.sql), |q, v| match v {
                SqlValue::Bool(b) => q.bind(*b),
                SqlValue::Int(i) => q.bind(*i),
                SqlValue::Float(f) => q.bind(*f),
                SqlValue::Text(s) => q.bind(s.as_deref()),
                SqlValue::Timestamp(t) => q.bind(*t),
            })
    }
}

/// Escape LIKE wildcards so a search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_bind_numbers_placeholders() {
        let mut stmt = Statement::new("SELECT * FROM food_banks WHERE 1=1");
        stmt.and_eq("city", Some("Leeds"))
            .and_eq("pet_food_available", Some(true));

        assert_eq!(
            stmt.sql(),
            "SELECT * FROM food_banks WHERE 1=1 AND city = $1 AND pet_food_available = $2"
        );
        assert_eq!(
            stmt.values(),
            &[
                SqlValue::Text(Some("Leeds".into())),
                SqlValue::Bool(Some(true))
            ]
        );
    }

    #[test]
    fn absent_filters_add_nothing() {
        let mut stmt = Statement::new("SELECT 1 WHERE 1=1");
        stmt.and_eq::<bool>("accepts_pets", None)
            .and_contains("name", Some("   "))
            .and_contains("name", None);

        assert_eq!(stmt.sql(), "SELECT 1 WHERE 1=1");
        assert!(stmt.values().is_empty());
    }

    #[test]
    fn clause_order_follows_call_order() {
        let mut a = Statement::new("W");
        a.and_eq("x", Some(1i64)).and_eq("y", Some(2i64));
        let mut b = Statement::new("W");
        b.and_eq::<i64>("x", None).and_eq("y", Some(2i64));

        assert_eq!(a.sql(), "W AND x = $1 AND y = $2");
        assert_eq!(b.sql(), "W AND y = $1");
    }

    #[test]
    fn literal_binds_keep_order() {
        let stmt = Statement::new("UPDATE dogs SET name = $1 WHERE id = $2")
            .bind("Rex")
            .bind(7i64);
        assert_eq!(
            stmt.values(),
            &[SqlValue::Text(Some("Rex".into())), SqlValue::Int(Some(7))]
        );
    }

    #[test]
    fn typed_nulls() {
        let none: Option<i64> = None;
        let stmt = Statement::new("INSERT INTO t (a) VALUES ($1)").bind(none);
        assert_eq!(stmt.values(), &[SqlValue::Int(None)]);
    }

    #[test]
    fn search_term_is_bound_and_escaped() {
        let mut stmt = Statement::new("SELECT 1 WHERE 1=1");
        stmt.and_contains("title", Some("50%_off"));
        assert_eq!(stmt.sql(), "SELECT 1 WHERE 1=1 AND title ILIKE $1");
        assert_eq!(
            stmt.values(),
            &[SqlValue::Text(Some("%50\\%\\_off%".into()))]
        );
    }

    #[test]
    fn limit_offset_binds_integers() {
        let mut stmt = Statement::new("SELECT 1");
        stmt.limit_offset(20, 40);
        assert_eq!(stmt.sql(), "SELECT 1 LIMIT $1 OFFSET $2");
        assert_eq!(
            stmt.values(),
            &[SqlValue::Int(Some(20)), SqlValue::Int(Some(40))]
        );
    }
}

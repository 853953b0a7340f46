//! Listing: filter, search, count, order, paginate.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{FilterSet, Resource};
use crate::config::PaginationConfig;
use crate::db::RepositoryError;
use validator::{Validate, ValidationErrors};

/// Query parameters shared by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListParams {
    /// Free-text term matched against the resource's search fields.
    pub search: Option<String>,
    /// 1-based page number.
    #[validate(range(min = 1, message = "Page numbers start at 1."))]
    pub page: Option<i64>,
    #[validate(range(min = 1))]
    pub page_size: Option<i64>,
    /// Return the full representation instead of the default fields.
    #[serde(default)]
    pub expand: bool,
}

impl ListParams {
    /// The trimmed search term, if there is one worth searching for.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Resolve `(page, page_size)` against the configured bounds.
    ///
    /// Oversized pages are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` for a page or page size below 1.
    pub fn window(&self, bounds: PaginationConfig) -> Result<(i64, i64), ValidationErrors> {
        self.validate()?;
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(bounds.default_page_size);
        Ok((page, page_size.min(bounds.max_page_size)))
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Matches across all pages.
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub results: Vec<T>,
}

/// Fetch one page of `R` rows plus the total match count.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if either query fails.
pub async fn fetch_page<R: Resource>(
    pool: &PgPool,
    params: &ListParams,
    filter: &R::Filter,
    (page, page_size): (i64, i64),
) -> Result<Page<R::Row>, RepositoryError> {
    let config = R::config();

    let mut counted = filtered::<R>("SELECT COUNT(*) FROM (", params, filter);
    counted.push(") AS counted");
    let count: i64 = counted.build_query_scalar().fetch_one(pool).await?;

    let mut query = filtered::<R>("", params, filter);
    query
        .push(" ORDER BY ")
        .push(config.order_by)
        .push(" LIMIT ")
        .push_bind(page_size)
        .push(" OFFSET ")
        .push_bind((page - 1).saturating_mul(page_size));
    let results = query.build_query_as::<R::Row>().fetch_all(pool).await?;

    Ok(Page {
        count,
        page,
        page_size,
        results,
    })
}

/// Base query with filters and search applied, prefixed by `prefix`.
fn filtered<'args, R: Resource>(
    prefix: &str,
    params: &ListParams,
    filter: &R::Filter,
) -> QueryBuilder<'args, Postgres> {
    let config = R::config();
    let mut qb = QueryBuilder::new(prefix);
    qb.push(config.select).push(" WHERE 1 = 1");
    filter.apply(&mut qb);
    if let Some(term) = params.search_term() {
        push_search(&mut qb, config.search_fields, term);
    }
    qb
}

/// `AND (f1 ILIKE $n OR f2 ILIKE $n+1 ...)`
fn push_search(qb: &mut QueryBuilder<'_, Postgres>, fields: &[&str], term: &str) {
    if fields.is_empty() {
        return;
    }
    let pattern = format!("%{}%", escape_like(term));
    qb.push(" AND (");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*field).push(" ILIKE ").push_bind(pattern.clone());
    }
    qb.push(")");
}

/// Escape `LIKE` wildcards so a search term matches literally.
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(query: &str) -> ListParams {
        serde_urlencoded_like(query)
    }

    // Parse the way axum's `Query` does.
    fn serde_urlencoded_like(query: &str) -> ListParams {
        let uri: axum::http::Uri = format!("/x?{query}").parse().unwrap();
        axum::extract::Query::<ListParams>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("shirt"), "shirt");
    }

    #[test]
    fn test_search_term_trimmed() {
        assert_eq!(params("search=%20red%20").search_term(), Some("red"));
        assert_eq!(params("search=%20").search_term(), None);
        assert_eq!(params("").search_term(), None);
    }

    #[test]
    fn test_window_defaults_and_clamps() {
        let bounds = PaginationConfig::default();
        assert_eq!(params("").window(bounds).unwrap(), (1, 20));
        assert_eq!(params("page=3&page_size=500").window(bounds).unwrap(), (3, 100));
    }

    #[test]
    fn test_window_rejects_zero() {
        let errors = params("page=0&page_size=0")
            .window(PaginationConfig::default())
            .unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(
            fields["page"][0].message.as_deref(),
            Some("Page numbers start at 1.")
        );
        assert!(fields.contains_key("page_size"));
    }

    #[test]
    fn test_expand_flag() {
        assert!(params("expand=true").expand);
        assert!(!params("search=x").expand);
    }

    #[test]
    fn test_search_clause_ors_fields() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p WHERE 1 = 1");
        push_search(&mut qb, &["p.name", "p.sku"], "red");
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM products p WHERE 1 = 1 AND (p.name ILIKE $1 OR p.sku ILIKE $2)"
        );
    }
}

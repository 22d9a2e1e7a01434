//! Paginated, searchable, sortable listings over a single table.
//!
//! User input never reaches the SQL text directly: the sort column comes from a
//! per-entity allow-list, the direction from a two-token enum, and the search
//! term is always a bound parameter.

use crate::db::SqlitePool;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite};

pub const PAGE_SIZE: u32 = 10;

/// Number of page links shown around the current page.
pub const PAGE_WINDOW: u32 = 5;

/// Describes how one entity table is listed.
pub trait ListSource {
    /// `FROM` clause, optionally with joins.
    const FROM: &'static str;
    /// Selected columns, matching the row type's `FromRow` fields.
    const COLUMNS: &'static str;
    /// Columns matched against the search term.
    const SEARCH_COLUMNS: &'static [&'static str];
    /// Allowed `ordenar_por` tokens and the column each one sorts by.
    /// The first entry is the default.
    const SORT_COLUMNS: &'static [(&'static str, &'static str)];
    /// Tie-breaker that keeps page boundaries stable.
    const TIE_BREAK: &'static str;
}

/// Query string accepted by list pages. Everything is optional and parsed leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub pagina: Option<String>,
    pub busca: Option<String>,
    pub ordenar_por: Option<String>,
    pub direcao: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Exactly `asc` or `desc`; anything else falls back to ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A listing request after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub search: Option<String>,
    /// The accepted `ordenar_por` token, echoed back into links.
    pub sort: &'static str,
    #[serde(skip)]
    pub sort_column: &'static str,
    pub direction: SortDirection,
}

impl ListQuery {
    pub fn resolve<S: ListSource>(params: &ListParams) -> Self {
        let page = params
            .pagina
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);

        let search = params
            .busca
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let (sort, sort_column) = resolve_sort(S::SORT_COLUMNS, params.ordenar_por.as_deref());

        Self {
            page,
            search,
            sort,
            sort_column,
            direction: SortDirection::parse(params.direcao.as_deref()),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(PAGE_SIZE)
    }
}

fn resolve_sort(
    allowed: &'static [(&'static str, &'static str)],
    requested: Option<&str>,
) -> (&'static str, &'static str) {
    let default = allowed.first().copied().unwrap_or(("id", "id"));
    requested
        .and_then(|r| allowed.iter().find(|(token, _)| *token == r).copied())
        .unwrap_or(default)
}

/// One page of results plus everything the pager needs.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub total_pages: u32,
    pub current: u32,
    pub window: Vec<u32>,
    pub has_previous: bool,
    pub has_next: bool,
    pub page_size: u32,
    pub query: ListQuery,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, query: ListQuery) -> Self {
        let pages = total_pages(total);
        let current = query.page;
        Self {
            items,
            total,
            total_pages: pages,
            current,
            window: page_window(current, pages),
            has_previous: current > 1 && pages > 0,
            has_next: current < pages,
            page_size: PAGE_SIZE,
            query,
        }
    }
}

/// `ceil(total / PAGE_SIZE)`; zero rows means zero pages.
pub fn total_pages(total: i64) -> u32 {
    let total = u64::try_from(total).unwrap_or(0);
    let pages = total.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Up to [`PAGE_WINDOW`] page numbers centred on `current`, clamped to `[1, total_pages]`.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages == 0 {
        return Vec::new();
    }
    let half = PAGE_WINDOW / 2;
    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(half).max(1);
    let end = (start + PAGE_WINDOW - 1).min(total_pages);
    start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
    (start..=end).collect()
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, columns: &[&str], search: Option<&str>) {
    let Some(term) = search else {
        return;
    };
    qb.push(" WHERE (");
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        // instr is a case-sensitive substring test; the term stays a bind parameter
        qb.push("instr(")
            .push(*col)
            .push(", ")
            .push_bind(term.to_owned())
            .push(") > 0");
    }
    qb.push(")");
}

pub fn select_page_sql<S: ListSource>(query: &ListQuery) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", S::COLUMNS, S::FROM));
    push_filter(&mut qb, S::SEARCH_COLUMNS, query.search.as_deref());
    qb.push(format!(
        " ORDER BY {} {}, {} ASC LIMIT ",
        query.sort_column,
        query.direction.sql(),
        S::TIE_BREAK
    ));
    qb.push_bind(i64::from(PAGE_SIZE));
    qb.push(" OFFSET ");
    qb.push_bind(query.offset());
    qb
}

pub fn count_sql<S: ListSource>(query: &ListQuery) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", S::FROM));
    push_filter(&mut qb, S::SEARCH_COLUMNS, query.search.as_deref());
    qb
}

/// Run the window query and the count query for one page.
pub async fn fetch_page<S>(pool: &SqlitePool, query: ListQuery) -> Result<Page<S>, AppError>
where
    S: ListSource + for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let items: Vec<S> = select_page_sql::<S>(&query)
        .build_query_as()
        .fetch_all(pool)
        .await?;
    let total: i64 = count_sql::<S>(&query)
        .build_query_scalar()
        .fetch_one(pool)
        .await?;
    Ok(Page::new(items, total, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    impl ListSource for Widget {
        const FROM: &'static str = "widgets";
        const COLUMNS: &'static str = "id, name";
        const SEARCH_COLUMNS: &'static [&'static str] = &["name", "code"];
        const SORT_COLUMNS: &'static [(&'static str, &'static str)] =
            &[("nome", "name"), ("codigo", "code")];
        const TIE_BREAK: &'static str = "id";
    }

    fn params(pagina: Option<&str>, ordenar_por: Option<&str>, direcao: Option<&str>) -> ListParams {
        ListParams {
            pagina: pagina.map(String::from),
            busca: None,
            ordenar_por: ordenar_por.map(String::from),
            direcao: direcao.map(String::from),
        }
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(95), 10);
        assert_eq!(total_pages(-3), 0);
    }

    #[test]
    fn window_is_centred_and_clamped() {
        assert_eq!(page_window(1, 0), Vec::<u32>::new());
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(9, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(40, 10), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(ListQuery::resolve::<Widget>(&params(None, None, None)).page, 1);
        assert_eq!(ListQuery::resolve::<Widget>(&params(Some("0"), None, None)).page, 1);
        assert_eq!(ListQuery::resolve::<Widget>(&params(Some("-4"), None, None)).page, 1);
        assert_eq!(ListQuery::resolve::<Widget>(&params(Some("abc"), None, None)).page, 1);
        assert_eq!(ListQuery::resolve::<Widget>(&params(Some("7"), None, None)).page, 7);
        assert_eq!(ListQuery::resolve::<Widget>(&params(Some("3"), None, None)).offset(), 20);
    }

    #[test]
    fn sort_column_outside_allow_list_falls_back() {
        let q = ListQuery::resolve::<Widget>(&params(None, Some("codigo"), None));
        assert_eq!((q.sort, q.sort_column), ("codigo", "code"));

        for hostile in ["name; DROP TABLE widgets", "code", "NOME", ""] {
            let q = ListQuery::resolve::<Widget>(&params(None, Some(hostile), None));
            assert_eq!((q.sort, q.sort_column), ("nome", "name"));
        }
    }

    #[test]
    fn direction_accepts_only_exact_tokens() {
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("desc ")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
    }

    #[test]
    fn search_is_bound_not_interpolated() {
        let mut p = params(Some("2"), Some("codigo"), Some("desc"));
        p.busca = Some("  o'hara  ".into());
        let q = ListQuery::resolve::<Widget>(&p);
        assert_eq!(q.search.as_deref(), Some("o'hara"));

        let sql = select_page_sql::<Widget>(&q).into_sql();
        assert_eq!(
            sql,
            "SELECT id, name FROM widgets WHERE (instr(name, ?) > 0 OR instr(code, ?) > 0) \
             ORDER BY code DESC, id ASC LIMIT ? OFFSET ?"
        );
        let count = count_sql::<Widget>(&q).into_sql();
        assert_eq!(
            count,
            "SELECT COUNT(*) FROM widgets WHERE (instr(name, ?) > 0 OR instr(code, ?) > 0)"
        );
    }

    #[test]
    fn blank_search_adds_no_filter() {
        let mut p = params(None, None, None);
        p.busca = Some("   ".into());
        let q = ListQuery::resolve::<Widget>(&p);
        assert_eq!(q.search, None);
        assert_eq!(count_sql::<Widget>(&q).into_sql(), "SELECT COUNT(*) FROM widgets");
    }

    #[test]
    fn page_past_the_end_is_well_formed() {
        let q = ListQuery::resolve::<Widget>(&params(Some("9"), None, None));
        let page: Page<()> = Page::new(Vec::new(), 25, q);
        assert_eq!(page.total_pages, 3);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.window, vec![1, 2, 3]);
    }
}

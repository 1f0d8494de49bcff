//! Builds parameterized SELECT statements for filtered, ordered, paged lists.

use super::SqlParam;

/// Rows returned by a single list call are capped at this many.
pub const MAX_PAGE_SIZE: u32 = 1000;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// `asc` (any case) is ascending; anything else is descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(d) if d.trim().eq_ignore_ascii_case("asc") => Direction::Asc,
            _ => Direction::Desc,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// ORDER BY terms. Columns are always whitelisted `'static` identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder(pub Vec<(&'static str, Direction)>);

impl SortOrder {
    pub fn by(column: &'static str, direction: Direction) -> Self {
        SortOrder(vec![(column, direction)])
    }

    pub fn then(mut self, column: &'static str, direction: Direction) -> Self {
        self.0.push((column, direction));
        self
    }

    /// Resolve a client-supplied `order[column]` / `order[dir]` pair.
    /// No column keeps `default`; an unknown column falls back to `fallback`.
    pub fn resolve(
        column: Option<&str>,
        dir: Option<&str>,
        allowed: &[&'static str],
        fallback: &'static str,
        default: SortOrder,
    ) -> SortOrder {
        let Some(requested) = column.map(str::trim).filter(|c| !c.is_empty()) else {
            return default;
        };
        let column = allowed
            .iter()
            .copied()
            .find(|c| *c == requested)
            .unwrap_or(fallback);
        SortOrder::by(column, Direction::parse(dir))
    }
}

/// LIMIT / OFFSET window. `limit: None` returns everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Page {
    /// From the raw `length` and `start` query values. Non-positive or unparsable length means no limit;
    /// negative start is clamped to zero.
    pub fn from_raw(length: Option<&str>, start: Option<&str>) -> Self {
        let limit = length
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l > 0)
            .map(|l| l.min(MAX_PAGE_SIZE as i64) as u32);
        let offset = start
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|s| s.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(0);
        Page { limit, offset }
    }
}

/// Escape LIKE metacharacters and wrap in `%` for a substring match.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// Accumulates WHERE terms and parameters on top of a fixed `SELECT ... FROM ...` head.
pub struct ListQuery {
    head: String,
    conditions: Vec<String>,
    params: Vec<SqlParam>,
    order: Option<SortOrder>,
    page: Page,
}

impl ListQuery {
    pub fn new(head: impl Into<String>) -> Self {
        ListQuery {
            head: head.into(),
            conditions: Vec::new(),
            params: Vec::new(),
            order: None,
            page: Page::default(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> usize {
        self.params.push(v);
        self.params.len()
    }

    pub fn eq(&mut self, column: &'static str, value: impl Into<SqlParam>) -> &mut Self {
        let n = self.push_param(value.into());
        self.conditions.push(format!("{} = ${}", column, n));
        self
    }

    /// Case-insensitive substring match on any of `columns`, sharing one parameter.
    pub fn search(&mut self, columns: &[&'static str], term: &str) -> &mut Self {
        if columns.is_empty() {
            return self;
        }
        let n = self.push_param(SqlParam::Text(like_pattern(term)));
        let ors: Vec<String> = columns.iter().map(|c| format!("{} ILIKE ${}", c, n)).collect();
        self.conditions.push(format!("({})", ors.join(" OR ")));
        self
    }

    pub fn order_by(&mut self, order: SortOrder) -> &mut Self {
        self.order = Some(order);
        self
    }

    pub fn page(&mut self, page: Page) -> &mut Self {
        self.page = page;
        self
    }

    pub fn finish(self) -> QueryBuf {
        let mut sql = self.head;
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if let Some(order) = self.order.filter(|o| !o.0.is_empty()) {
            let terms: Vec<String> = order
                .0
                .iter()
                .map(|(c, d)| format!("{} {}", c, d.keyword()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        if let Some(n) = self.page.limit {
            sql.push_str(&format!(" LIMIT {}", n.min(MAX_PAGE_SIZE)));
        }
        if self.page.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.page.offset));
        }
        QueryBuf {
            sql,
            params: self.params,
        }
    }
}

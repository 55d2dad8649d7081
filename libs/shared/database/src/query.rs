//! Typed construction of PostgREST read/write paths.
//!
//! List endpoints accept a handful of optional filters; rather than pasting
//! user input into a query string, callers compose predicates here and the
//! builder takes care of operator syntax and percent-encoding.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone)]
enum Predicate {
    /// `column=eq.value` - exact match.
    Eq { column: String, value: String },
    /// `column=ilike.%value%` - case-insensitive substring match.
    ContainsCi { column: String, value: String },
}

impl Predicate {
    fn render(&self) -> String {
        match self {
            Predicate::Eq { column, value } => {
                format!("{}=eq.{}", column, urlencoding::encode(value))
            }
            Predicate::ContainsCi { column, value } => {
                let pattern = format!("%{}%", value);
                format!("{}=ilike.{}", column, urlencoding::encode(&pattern))
            }
        }
    }
}

/// An ordered set of optional predicate clauses over one table, rendered as
/// a PostgREST request path.
#[derive(Debug, Clone)]
pub struct TableQuery {
    table: String,
    select: Option<String>,
    predicates: Vec<Predicate>,
    order: Vec<(String, SortDirection)>,
    limit: Option<usize>,
}

impl TableQuery {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            select: None,
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Column projection, including embedded resources
    /// (e.g. `*,appointments(*)`).
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn filter_eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn filter_contains_ci(mut self, column: &str, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::ContainsCi {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    /// Appends a sort key; repeated calls build a compound order.
    /// Columns are caller-whitelisted names, never raw user input.
    pub fn order_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.order.push((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Renders the full request path, e.g.
    /// `/rest/v1/appointments?status=eq.completed&order=date.desc,time.desc`.
    pub fn to_path(&self) -> String {
        let mut params: Vec<String> = Vec::new();

        if let Some(select) = &self.select {
            params.push(format!("select={}", urlencoding::encode(select)));
        }

        params.extend(self.predicates.iter().map(Predicate::render));

        if !self.order.is_empty() {
            let keys: Vec<String> = self
                .order
                .iter()
                .map(|(column, direction)| format!("{}.{}", column, direction.keyword()))
                .collect();
            params.push(format!("order={}", keys.join(",")));
        }

        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }

        if params.is_empty() {
            format!("/rest/v1/{}", self.table)
        } else {
            format!("/rest/v1/{}?{}", self.table, params.join("&"))
        }
    }
}

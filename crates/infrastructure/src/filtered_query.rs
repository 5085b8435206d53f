use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use backoffice_core::{AppError, AppResult, Page};

/// Typed value bound into a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PredicateValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// One `WHERE` clause over a repository-owned column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Predicate {
    Equals {
        column: &'static str,
        value: PredicateValue,
    },
    Contains {
        column: &'static str,
        value: String,
    },
    AtLeast {
        column: &'static str,
        value: PredicateValue,
    },
    AtMost {
        column: &'static str,
        value: PredicateValue,
    },
}

/// Predicates over one table, rendered as a paged list query and a count query
/// that share the same `WHERE` clause.
#[derive(Debug, Clone)]
pub(crate) struct FilteredQuery {
    table: &'static str,
    predicates: Vec<Predicate>,
}

impl FilteredQuery {
    pub(crate) fn new(table: &'static str) -> Self {
        Self {
            table,
            predicates: Vec::new(),
        }
    }

    /// Adds an equality clause when the value is present.
    pub(crate) fn equals(mut self, column: &'static str, value: Option<PredicateValue>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate::Equals { column, value });
        }
        self
    }

    /// Adds a case-insensitive substring clause when the value is present.
    pub(crate) fn contains(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate::Contains {
                column,
                value: value.to_owned(),
            });
        }
        self
    }

    /// Adds an inclusive lower bound when the value is present.
    pub(crate) fn at_least(mut self, column: &'static str, value: Option<PredicateValue>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate::AtLeast { column, value });
        }
        self
    }

    /// Adds an inclusive upper bound when the value is present.
    pub(crate) fn at_most(mut self, column: &'static str, value: Option<PredicateValue>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate::AtMost { column, value });
        }
        self
    }

    pub(crate) fn list_query(
        &self,
        columns: &'static str,
        order_by: &'static str,
        page: Page,
    ) -> AppResult<QueryBuilder<'static, Postgres>> {
        let limit = i64::from(page.limit());
        let offset = i64::try_from(page.offset()).map_err(|error| {
            AppError::Validation(format!("invalid list query offset: {error}"))
        })?;

        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(columns);
        builder.push(" FROM ");
        builder.push(self.table);
        self.push_where(&mut builder);
        builder.push(" ORDER BY ");
        builder.push(order_by);
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        Ok(builder)
    }

    pub(crate) fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
        builder.push(self.table);
        self.push_where(&mut builder);
        builder
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        for (index, predicate) in self.predicates.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });

            match predicate {
                Predicate::Equals { column, value } => {
                    builder.push(*column);
                    builder.push(" = ");
                    push_value(builder, value);
                }
                Predicate::Contains { column, value } => {
                    builder.push(*column);
                    builder.push(" ILIKE ");
                    builder.push_bind(format!("%{}%", escape_like(value)));
                    builder.push(" ESCAPE '\\'");
                }
                Predicate::AtLeast { column, value } => {
                    builder.push(*column);
                    builder.push(" >= ");
                    push_value(builder, value);
                }
                Predicate::AtMost { column, value } => {
                    builder.push(*column);
                    builder.push(" <= ");
                    push_value(builder, value);
                }
            }
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &PredicateValue) {
    match value {
        PredicateValue::Integer(value) => builder.push_bind(*value),
        PredicateValue::Text(value) => builder.push_bind(value.clone()),
        PredicateValue::Timestamp(value) => builder.push_bind(*value),
    };
}

/// Escapes `LIKE` wildcards so user text only matches literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use backoffice_core::Page;

    use super::{FilteredQuery, PredicateValue, escape_like};

    fn page(page: u32, limit: u32) -> Page {
        match Page::new(page, limit) {
            Ok(page) => page,
            Err(error) => panic!("valid page rejected: {error}"),
        }
    }

    #[test]
    fn absent_filters_produce_no_where_clause() {
        let query = FilteredQuery::new("items")
            .equals("owner_id", None)
            .contains("name", None);

        let list = query.list_query("id, name", "created_at DESC", page(1, 10));
        let Ok(list) = list else {
            panic!("list query failed");
        };
        assert_eq!(
            list.sql(),
            "SELECT id, name FROM items ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        assert_eq!(query.count_query().sql(), "SELECT COUNT(*) FROM items");
    }

    #[test]
    fn list_and_count_share_predicates() {
        let lower = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .map(PredicateValue::Timestamp);
        let query = FilteredQuery::new("items")
            .equals("owner_id", Some(PredicateValue::Integer(4)))
            .contains("name", Some("box"))
            .at_least("created_at", lower)
            .at_most("created_at", None);

        let list = query.list_query("id", "created_at DESC", page(2, 20));
        let Ok(list) = list else {
            panic!("list query failed");
        };
        let where_clause = " WHERE owner_id = $1 AND name ILIKE $2 ESCAPE '\\' AND created_at >= $3";

        assert_eq!(
            list.sql(),
            format!("SELECT id FROM items{where_clause} ORDER BY created_at DESC LIMIT $4 OFFSET $5")
        );
        assert_eq!(
            query.count_query().sql(),
            format!("SELECT COUNT(*) FROM items{where_clause}")
        );
    }

    #[test]
    fn user_text_is_never_part_of_the_sql() {
        let hostile = "x'; DROP TABLE items; --";
        let query = FilteredQuery::new("items")
            .contains("name", Some(hostile))
            .equals("category", Some(PredicateValue::Text(hostile.to_owned())));

        assert!(!query.count_query().sql().contains("DROP"));
        let list = query.list_query("id", "id DESC", page(1, 1));
        assert!(list.is_ok_and(|list| !list.sql().contains("DROP")));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}

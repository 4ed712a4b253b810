//! Request handlers.

pub mod check;
pub mod health;
pub mod permissions;
pub mod roles;

use chrono::{DateTime, Utc};
use rolegate_core::models::{Permission, Role};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::views::Column;

/// Body returned by destroy actions.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: bool,
    pub message: String,
}

impl DeleteResponse {
    fn succeeded() -> Self {
        Self {
            status: true,
            message: "Delete succeeded".into(),
        }
    }
}

/// Parse the `{id}` segment of a record route.
pub fn record_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}")))
}

/// Parse the `{id}` segment of a destroy route.
///
/// Only one record may be deleted per request; comma-separated id lists
/// (bulk delete) are refused.
pub fn single_id(raw: &str) -> AppResult<i64> {
    if raw.contains(',') {
        return Err(AppError::BadRequest("Bulk delete is not available".into()));
    }
    record_id(raw)
}

/// Query params for listing grids: `?sort=<column>&order=asc|desc`.
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortQuery {
    /// Check the query against a grid's columns. Only sortable columns are accepted.
    pub fn resolve(&self, columns: &[Column]) -> AppResult<Option<Sort>> {
        let order = match self.order.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(other) => {
                return Err(AppError::BadRequest(format!("Invalid sort order: {other}")));
            }
        };
        let Some(name) = self.sort.as_deref() else {
            return Ok(None);
        };
        let not_sortable = || AppError::BadRequest(format!("Column is not sortable: {name}"));
        if !columns.iter().any(|c| c.sortable && c.name == name) {
            return Err(not_sortable());
        }
        let column = match name {
            "id" => SortColumn::Id,
            "created_at" => SortColumn::CreatedAt,
            "updated_at" => SortColumn::UpdatedAt,
            _ => return Err(not_sortable()),
        };
        Ok(Some(Sort { column, order }))
    }
}

/// Fields a listing grid can be ordered by.
pub trait Sortable {
    fn sort_id(&self) -> i64;
    fn sort_created_at(&self) -> Option<DateTime<Utc>>;
    fn sort_updated_at(&self) -> Option<DateTime<Utc>>;
}

impl Sortable for Permission {
    fn sort_id(&self) -> i64 {
        self.id
    }
    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn sort_updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Sortable for Role {
    fn sort_id(&self) -> i64 {
        self.id
    }
    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn sort_updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Sort {
    /// Order records in place. Ties fall back to the id; null timestamps sort first.
    pub fn apply<R: Sortable>(&self, records: &mut [R]) {
        records.sort_by(|a, b| {
            let by_id = a.sort_id().cmp(&b.sort_id());
            let ordering = match self.column {
                SortColumn::Id => by_id,
                SortColumn::CreatedAt => {
                    a.sort_created_at().cmp(&b.sort_created_at()).then(by_id)
                }
                SortColumn::UpdatedAt => {
                    a.sort_updated_at().cmp(&b.sort_updated_at()).then(by_id)
                }
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

/// Apply an optional listing sort.
pub fn sorted<R: Sortable>(
    mut records: Vec<R>,
    query: &SortQuery,
    columns: &[Column],
) -> AppResult<Vec<R>> {
    if let Some(sort) = query.resolve(columns)? {
        sort.apply(&mut records);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_id_accepts_one_id() {
        assert_eq!(single_id("12").unwrap(), 12);
    }

    #[test]
    fn single_id_refuses_lists() {
        assert!(matches!(single_id("1,2,3"), Err(AppError::BadRequest(_))));
        assert!(matches!(single_id("abc"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn record_id_rejects_non_numbers() {
        assert_eq!(record_id(" 7 ").unwrap(), 7);
        assert!(matches!(record_id("seven"), Err(AppError::BadRequest(_))));
    }

    fn query(sort: Option<&str>, order: Option<&str>) -> SortQuery {
        SortQuery {
            sort: sort.map(String::from),
            order: order.map(String::from),
        }
    }

    fn columns() -> Vec<Column> {
        vec![Column::sortable("id", "ID"), Column::new("slug", "Slug")]
    }

    #[test]
    fn sort_query_accepts_sortable_columns_only() {
        assert_eq!(query(None, None).resolve(&columns()).unwrap(), None);
        assert_eq!(
            query(Some("id"), Some("DESC")).resolve(&columns()).unwrap(),
            Some(Sort {
                column: SortColumn::Id,
                order: SortOrder::Desc
            })
        );
        assert!(matches!(
            query(Some("slug"), None).resolve(&columns()),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            query(Some("created_at"), None).resolve(&columns()),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            query(Some("id"), Some("sideways")).resolve(&columns()),
            Err(AppError::BadRequest(_))
        ));
    }

    fn role(id: i64, created_secs: Option<i64>) -> Role {
        Role {
            id,
            slug: format!("r{id}"),
            name: format!("R{id}"),
            permissions: vec![],
            created_at: created_secs.and_then(|s| DateTime::from_timestamp(s, 0)),
            updated_at: None,
        }
    }

    #[test]
    fn sort_orders_by_timestamp_then_id() {
        let mut roles = vec![role(1, Some(50)), role(2, None), role(3, Some(10)), role(4, Some(10))];
        Sort {
            column: SortColumn::CreatedAt,
            order: SortOrder::Asc,
        }
        .apply(&mut roles);
        assert_eq!(roles.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3, 4, 1]);

        Sort {
            column: SortColumn::CreatedAt,
            order: SortOrder::Desc,
        }
        .apply(&mut roles);
        assert_eq!(roles.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 4, 3, 2]);
    }
}

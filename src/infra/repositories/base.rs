//! Query building blocks shared by every repository.
//!
//! Free-text search, day-boundary filters and offset paging follow the same
//! rules across resources, so they are composed here once.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    Iterable, ModelTrait, PaginatorTrait, QuerySelect, Select, SelectTwo,
};
use tokio::try_join;

use crate::errors::AppResult;
use crate::types::PageRequest;

/// `%term%` with LIKE wildcards escaped, lowercased for [`contains_ci`].
pub(crate) fn like_pattern(term: &str) -> String {
    let term = term.trim().to_lowercase();
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `LOWER(column) LIKE pattern`
pub(crate) fn contains_ci<C: ColumnTrait>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// Case-insensitive substring match of `term` against any of `columns`.
///
/// Blank terms yield `None` so callers can skip the filter.
pub(crate) fn search_any<C: ColumnTrait>(term: Option<&str>, columns: &[C]) -> Option<Condition> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let pattern = like_pattern(term);
    Some(
        columns
            .iter()
            .fold(Condition::any(), |cond, column| {
                cond.add(contains_ci(*column, &pattern))
            }),
    )
}

/// Half-open UTC range covering one calendar day.
pub(crate) fn day_range(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// `column` falls on `day`
pub(crate) fn on_day<C: ColumnTrait>(column: C, day: NaiveDate) -> SimpleExpr {
    let (start, end) = day_range(day);
    column.gte(start).and(column.lt(end))
}

/// Count the filtered rows and fetch one page of them, concurrently.
pub(crate) async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: PageRequest,
) -> AppResult<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
{
    let count = select.clone().count(db);
    let rows = select.offset(page.offset()).limit(page.limit).all(db);
    let (rows, total) = try_join!(rows, count)?;
    Ok((rows, total))
}

/// [`fetch_page`] for a listing joined with one related entity.
pub(crate) async fn fetch_joined_page<E, F>(
    db: &DatabaseConnection,
    select: SelectTwo<E, F>,
    page: PageRequest,
) -> AppResult<(Vec<(E::Model, Option<F::Model>)>, u64)>
where
    E: EntityTrait,
    F: EntityTrait,
    E::Model: Send + Sync + 'static,
    F::Model: Send + Sync + 'static,
{
    let count = select.clone().count(db);
    let rows = select.offset(page.offset()).limit(page.limit).all(db);
    let (rows, total) = try_join!(rows, count)?;
    Ok((rows, total))
}

/// Active model over `stored` that writes only the columns where `target`
/// holds a different value. Every other column stays unchanged in the UPDATE.
pub(crate) fn changed_columns<A>(stored: <A::Entity as EntityTrait>::Model, target: A) -> A
where
    A: ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let mut active = stored.clone().into_active_model();
    for column in <A::Entity as EntityTrait>::Column::iter() {
        if let Some(value) = target.get(column).into_value() {
            if value != stored.get(column) {
                active.set(column, value);
            }
        }
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::infra::repositories::entities::guest;
    use crate::infra::repositories::entities::json::StringList;
    use crate::domain::Guest;
    use sea_orm::{DbBackend, IdenStatic, MockDatabase, QueryFilter, QueryTrait, Value};

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" 50%_Off "), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_day_range_spans_one_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let (start, end) = day_range(day);
        assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn test_blank_search_is_skipped() {
        assert!(search_any(Some("  "), &[guest::Column::Name]).is_none());
        assert!(search_any(None, &[guest::Column::Name]).is_none());
    }

    #[test]
    fn test_search_renders_lower_like() {
        let cond = search_any(Some("Rao"), &[guest::Column::Name, guest::Column::Phone]).unwrap();
        let sql = guest::Entity::find()
            .filter(cond)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("guests"."name") LIKE '%rao%'"#));
        assert!(sql.contains(" OR "));
    }

    fn guest_model() -> guest::Model {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc();
        guest::Model {
            id: uuid::Uuid::new_v4(),
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "+919876543210".into(),
            dob: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            address: "12 MG Road".into(),
            documents: StringList(vec!["1-a-id.pdf".into()]),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_fetch_page_counts_and_pages() {
        let model = guest_model();
        let columns: Vec<guest::Column> = guest::Column::iter().collect();
        // one row serves both the page query and the count query
        let mut row: BTreeMap<&str, Value> = columns
            .iter()
            .map(|column| (column.as_str(), model.get(*column)))
            .collect();
        row.insert("num_items", Value::BigInt(Some(41)));

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .append_query_results([vec![row]])
            .into_connection();

        let page = PageRequest { page: 3, limit: 20 };
        let (rows, total) = fetch_page(&db, guest::Entity::find(), page).await.unwrap();

        assert_eq!(rows, vec![model]);
        assert_eq!(total, 41);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        let sql: Vec<String> = log.iter().map(|t| format!("{t:?}")).collect();
        assert!(sql.iter().any(|s| s.contains("COUNT(*)")));
        assert!(sql.iter().any(|s| s.contains("OFFSET")));
    }

    #[test]
    fn test_changed_columns_leaves_untouched_fields_out() {
        let stored = guest_model();
        let mut guest = Guest::from(stored.clone());
        guest.address = "14 MG Road".into();
        guest.documents.clear();

        let active = changed_columns(stored, guest::ActiveModel::from(guest));

        assert!(active.address.is_set());
        assert!(active.documents.is_set());
        assert!(!active.name.is_set());
        assert!(!active.phone.is_set());
        assert!(!active.updated_at.is_set());
    }
}

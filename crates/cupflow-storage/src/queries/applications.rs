// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD operations for application records.
//!
//! Filters are rendered from the explicit [`ApplicationFilter`] object into
//! parameterized WHERE clauses; user-influenced values never reach the query
//! text itself.

use std::str::FromStr;

use cupflow_core::CupflowError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{
    Application, ApplicationFilter, ApplicationKind, ApplicationStatus, NewApplication,
    StatusFilter,
};

const SELECT_COLUMNS: &str = "id, type, contact, phone, city, size, comment, status, created_at";

/// Insert a new application. Status is forced to `new` and `created_at` to
/// the current time regardless of caller input. Returns the generated id.
pub async fn create(db: &Database, app: &NewApplication) -> Result<i64, CupflowError> {
    let app = app.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO applications (type, contact, phone, city, size, comment, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'new')",
                params![
                    app.kind.to_string(),
                    app.contact,
                    app.phone,
                    app.city,
                    app.size,
                    app.comment,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one application by id. `None` when the id does not exist.
pub async fn get(db: &Database, id: i64) -> Result<Option<Application>, CupflowError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM applications WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_application);
            match result {
                Ok(app) => Ok(Some(app)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Count applications matching the filter.
pub async fn count(db: &Database, filter: &ApplicationFilter) -> Result<i64, CupflowError> {
    let filter = *filter;
    db.connection()
        .call(move |conn| {
            let (where_sql, params) = filter_clause(&filter);
            let mut stmt =
                conn.prepare(&format!("SELECT COUNT(*) FROM applications{where_sql}"))?;
            let n = stmt.query_row(
                rusqlite::params_from_iter(params.iter()),
                |row| row.get::<_, i64>(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// List applications matching the filter, newest id first, bounded by
/// `limit` and skipping `offset` rows.
pub async fn list(
    db: &Database,
    filter: &ApplicationFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Application>, CupflowError> {
    let filter = *filter;
    db.connection()
        .call(move |conn| {
            let (where_sql, filter_params) = filter_clause(&filter);
            let mut params: Vec<Box<dyn rusqlite::ToSql>> = filter_params
                .into_iter()
                .map(|p| Box::new(p) as Box<dyn rusqlite::ToSql>)
                .collect();
            params.push(Box::new(limit));
            let limit_idx = params.len();
            params.push(Box::new(offset));
            let offset_idx = params.len();
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM applications{where_sql}
                 ORDER BY id DESC LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
            ))?;
            let rows = stmt.query_map(
                rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                row_to_application,
            )?;
            let mut apps = Vec::new();
            for row in rows {
                apps.push(row?);
            }
            Ok(apps)
        })
        .await
        .map_err(map_tr_err)
}

/// List every application, newest id first, without filter or bound.
pub async fn list_all(db: &Database) -> Result<Vec<Application>, CupflowError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM applications ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map([], row_to_application)?;
            let mut apps = Vec::new();
            for row in rows {
                apps.push(row?);
            }
            Ok(apps)
        })
        .await
        .map_err(map_tr_err)
}

/// Unconditionally overwrite the status of the given application.
///
/// A nonexistent id is a no-op, not an error; callers that need to
/// distinguish re-fetch the record afterwards.
pub async fn set_status(
    db: &Database,
    id: i64,
    status: ApplicationStatus,
) -> Result<(), CupflowError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE applications SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Render a filter into a WHERE fragment plus its positional parameters.
///
/// `StatusFilter::Active` expands into a parameterized `IN` over the two
/// active status tokens; it is a status-set, not a single status.
fn filter_clause(filter: &ApplicationFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(kind) = filter.kind {
        params.push(kind.to_string());
        clauses.push(format!("type = ?{}", params.len()));
    }
    match filter.status {
        Some(StatusFilter::Is(status)) => {
            params.push(status.to_string());
            clauses.push(format!("status = ?{}", params.len()));
        }
        Some(StatusFilter::Active) => {
            let mut placeholders = Vec::new();
            for status in ApplicationStatus::ACTIVE {
                params.push(status.to_string());
                placeholders.push(format!("?{}", params.len()));
            }
            clauses.push(format!("status IN ({})", placeholders.join(", ")));
        }
        None => {}
    }

    let sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (sql, params)
}

fn row_to_application(row: &rusqlite::Row<'_>) -> rusqlite::Result<Application> {
    let kind_str: String = row.get(1)?;
    let status_str: String = row.get(7)?;
    let kind = ApplicationKind::from_str(&kind_str).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown application type `{kind_str}`").into(),
        )
    })?;
    let status = ApplicationStatus::from_str(&status_str).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            rusqlite::types::Type::Text,
            format!("unknown application status `{status_str}`").into(),
        )
    })?;
    Ok(Application {
        id: row.get(0)?,
        kind,
        contact: row.get(2)?,
        phone: row.get(3)?,
        city: row.get(4)?,
        size: row.get(5)?,
        comment: row.get(6)?,
        status,
        created_at: row.get(8)?,
    })
}

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, types::Value, Connection};

use crate::domain::entities::dataset::{RowQuery, SortDirection};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::DatasetMeta;

pub fn insert_header_names(
    tx: &rusqlite::Transaction<'_>,
    dataset_id: i64,
    headers: &[String],
) -> Result<()> {
    let mut insert_header = tx
        .prepare("INSERT INTO column_name(dataset_id, col_idx, name) VALUES (?1, ?2, ?3)")
        .context("failed to prepare header insert")?;

    for (col_idx, name) in headers.iter().enumerate() {
        insert_header
            .execute(params![dataset_id, col_idx as i64, name])
            .context("failed to insert header")?;
    }

    Ok(())
}

/// Column names usable as row property names: trimmed, `.` replaced by `_`,
/// blanks named `column_{n}` (1-based) and repeats suffixed `_2`, `_3`, ...
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    let mut taken = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(col_idx, raw)| {
            let trimmed = raw.trim();
            let base = if trimmed.is_empty() {
                format!("column_{}", col_idx + 1)
            } else {
                trimmed.replace('.', "_")
            };

            let mut name = base.clone();
            let mut suffix = 2;
            while taken.contains(&name) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

pub fn create_dataset_from_rows(
    db_path: &Path,
    name: &str,
    source_path: &str,
    columns: &[String],
    rows: &[Vec<String>],
) -> Result<i64> {
    if columns.is_empty() {
        anyhow::bail!("a dataset needs at least one column")
    }

    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start dataset create transaction")?;

    tx.execute(
        "INSERT INTO dataset(name, source_path, row_count) VALUES (?1, ?2, 0)",
        params![name, source_path],
    )
    .context("failed to insert dataset")?;
    let dataset_id = tx.last_insert_rowid();

    insert_header_names(&tx, dataset_id, &normalize_headers(columns))?;

    let mut insert_cell = tx
        .prepare("INSERT INTO cell(dataset_id, row_idx, col_idx, value) VALUES (?1, ?2, ?3, ?4)")
        .context("failed to prepare cell insert")?;
    for (row_idx, row) in rows.iter().enumerate() {
        for col_idx in 0..columns.len() {
            let value = row.get(col_idx).map(String::as_str).unwrap_or("");
            insert_cell
                .execute(params![dataset_id, row_idx as i64, col_idx as i64, value])
                .context("failed to insert dataset cell")?;
        }
    }
    drop(insert_cell);

    tx.execute(
        "UPDATE dataset SET row_count = ?1 WHERE id = ?2",
        params![rows.len() as i64, dataset_id],
    )
    .context("failed to update dataset row_count")?;

    tx.commit().context("failed to commit dataset create")?;
    Ok(dataset_id)
}

pub fn list_datasets(db_path: &Path) -> Result<Vec<DatasetMeta>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, name, row_count, source_path
             FROM dataset
             ORDER BY id DESC",
        )
        .context("failed to prepare datasets query")?;

    let datasets = stmt
        .query_map([], |row| {
            Ok(DatasetMeta {
                id: row.get::<_, i64>(0)?.into(),
                name: row.get(1)?,
                row_count: row.get(2)?,
                source_path: row.get(3)?,
            })
        })
        .context("failed to query datasets")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect datasets")?;

    Ok(datasets)
}

pub fn purge_dataset(db_path: &Path, dataset_id: i64) -> Result<()> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start purge transaction")?;
    tx.execute(
        "DELETE FROM cell WHERE dataset_id = ?1",
        params![dataset_id],
    )
    .with_context(|| format!("failed to delete cells for dataset #{dataset_id}"))?;
    tx.execute(
        "DELETE FROM column_name WHERE dataset_id = ?1",
        params![dataset_id],
    )
    .with_context(|| format!("failed to delete columns for dataset #{dataset_id}"))?;
    let deleted = tx
        .execute("DELETE FROM dataset WHERE id = ?1", params![dataset_id])
        .with_context(|| format!("failed to delete dataset #{dataset_id}"))?;
    if deleted == 0 {
        anyhow::bail!("dataset #{dataset_id} does not exist")
    }
    tx.commit().context("failed to commit purge transaction")?;
    Ok(())
}

pub fn load_columns(conn: &Connection, dataset_id: i64) -> Result<Vec<String>> {
    let mut columns_stmt = conn
        .prepare(
            "SELECT name
             FROM column_name
             WHERE dataset_id = ?1
             ORDER BY col_idx ASC",
        )
        .context("failed to prepare columns query")?;
    let columns = columns_stmt
        .query_map([dataset_id], |row| row.get::<_, String>(0))
        .context("failed to query columns")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect columns")?;
    Ok(columns)
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn filter_sql(dataset_id: i64, query: &RowQuery) -> (String, Vec<Value>) {
    let mut filter_clauses = vec!["base.dataset_id = ?".to_string()];
    let mut filter_params = vec![Value::Integer(dataset_id)];

    for filter in &query.filters {
        let term = filter.term.trim();
        if term.is_empty() {
            continue;
        }
        filter_clauses.push(
            "EXISTS (
                SELECT 1 FROM cell cs
                WHERE cs.dataset_id = ?
                  AND cs.row_idx = base.row_idx
                  AND cs.col_idx = ?
                  AND cs.value LIKE ? ESCAPE '\\'
            )"
            .to_string(),
        );
        filter_params.push(Value::Integer(dataset_id));
        filter_params.push(Value::Integer(filter.column_idx));
        filter_params.push(Value::Text(format!("%{}%", escape_like(term))));
    }

    (filter_clauses.join(" AND "), filter_params)
}

pub fn count_rows(conn: &Connection, dataset_id: i64, query: &RowQuery) -> Result<i64> {
    let (where_sql, filter_params) = filter_sql(dataset_id, query);

    let count_sql = format!(
        "SELECT COUNT(*)
         FROM (
             SELECT base.row_idx
             FROM cell base
             WHERE {where_sql}
             GROUP BY base.row_idx
         ) filtered"
    );
    let total_rows: i64 = conn
        .query_row(
            &count_sql,
            rusqlite::params_from_iter(filter_params),
            |row| row.get(0),
        )
        .context("failed to query filtered row count")?;

    Ok(total_rows)
}

/// Rows of the filtered, sorted dataset in `[offset, offset + limit)`, each
/// padded to `column_count` cells.
pub fn query_rows(
    conn: &Connection,
    dataset_id: i64,
    column_count: usize,
    query: &RowQuery,
    offset: i64,
    limit: i64,
) -> Result<Vec<Vec<String>>> {
    if limit <= 0 || column_count == 0 {
        return Ok(Vec::new());
    }

    if let Some(sort) = &query.sort {
        if sort.column_idx < 0 || sort.column_idx as usize >= column_count {
            anyhow::bail!(
                "sort column out of range: {} (columns: {column_count})",
                sort.column_idx
            );
        }
    }

    let (where_sql, filter_params) = filter_sql(dataset_id, query);

    let mut row_params = Vec::<Value>::new();
    let mut row_sql = String::from("SELECT base.row_idx FROM cell base ");
    if let Some(sort) = &query.sort {
        row_sql.push_str(
            "LEFT JOIN cell sort_cell
             ON sort_cell.dataset_id = base.dataset_id
            AND sort_cell.row_idx = base.row_idx
            AND sort_cell.col_idx = ? ",
        );
        row_params.push(Value::Integer(sort.column_idx));
    }

    row_sql.push_str(&format!(
        "WHERE {where_sql} GROUP BY base.row_idx ORDER BY "
    ));
    if let Some(sort) = &query.sort {
        let sort_direction = match sort.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        row_sql.push_str(&format!("COALESCE(sort_cell.value, '') {sort_direction}, "));
    }
    row_sql.push_str("base.row_idx ASC LIMIT ? OFFSET ?");

    row_params.extend(filter_params);
    row_params.push(Value::Integer(limit));
    row_params.push(Value::Integer(offset.max(0)));

    let mut row_stmt = conn
        .prepare(&row_sql)
        .context("failed to prepare page row_idx query")?;
    let row_indices = row_stmt
        .query_map(rusqlite::params_from_iter(row_params), |row| {
            row.get::<_, i64>(0)
        })
        .context("failed to query page row_idx")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect page row_idx")?;
    drop(row_stmt);

    if row_indices.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = std::iter::repeat_n("?", row_indices.len())
        .collect::<Vec<_>>()
        .join(",");
    let hydrate_sql = format!(
        "SELECT row_idx, col_idx, value
         FROM cell
         WHERE dataset_id = ? AND row_idx IN ({placeholders})
         ORDER BY row_idx ASC, col_idx ASC"
    );
    let mut hydrate_params = vec![Value::Integer(dataset_id)];
    hydrate_params.extend(row_indices.iter().copied().map(Value::Integer));

    let mut rows = vec![vec![String::new(); column_count]; row_indices.len()];
    let row_pos: HashMap<i64, usize> = row_indices
        .iter()
        .copied()
        .enumerate()
        .map(|(idx, row_idx)| (row_idx, idx))
        .collect();

    let mut hydrate_stmt = conn
        .prepare(&hydrate_sql)
        .context("failed to prepare row hydration query")?;

    let mut hydrate_rows = hydrate_stmt
        .query(rusqlite::params_from_iter(hydrate_params))
        .context("failed to run row hydration query")?;

    while let Some(row) = hydrate_rows.next().context("failed to read hydrated row")? {
        let row_idx: i64 = row.get(0).context("failed to read row_idx")?;
        let col_idx: i64 = row.get(1).context("failed to read col_idx")?;
        let value: String = row.get(2).context("failed to read value")?;

        if let Some(&dest_row_idx) = row_pos.get(&row_idx) {
            if let Some(dest_cell) = rows
                .get_mut(dest_row_idx)
                .and_then(|dest_row| dest_row.get_mut(col_idx as usize))
            {
                *dest_cell = value;
            }
        }
    }

    Ok(rows)
}

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Pool, Row, Sqlite, TypeInfo, ValueRef};

use crate::application::ports::record_store::{ConditionalWrite, RecordStore};
use crate::domain::entities::RecordRow;
use crate::domain::value_objects::{RecordId, TableBinding, UpdatePatch, Version};
use crate::shared::error::OccError;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Row store over a SQLite pool. Identifiers come from the validated table
/// binding; values are always bound. The conditional write bumps the version
/// column in the same statement that checks it, which stands in for the
/// server-side auto-increment trigger of a hosted backend.
pub struct SqliteRecordStore {
    pool: Pool<Sqlite>,
}

impl SqliteRecordStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    async fn select_row(&self, binding: &TableBinding, id: &RecordId) -> Result<Option<RecordRow>> {
        let sql = format!(
            r#"SELECT * FROM "{}" WHERE "{}" = ?1"#,
            binding.table(),
            binding.id_column()
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read {} '{}'", binding.table(), id))?;
        row.as_ref().map(decode_row).transpose()
    }

    async fn run_conditional(
        &self,
        binding: &TableBinding,
        id: &RecordId,
        expected_version: Version,
        patch: &UpdatePatch,
    ) -> Result<ConditionalWrite> {
        let version_column = binding.version_column();
        let mut assignments: Vec<String> = patch
            .fields()
            .keys()
            .map(|name| format!(r#""{name}" = ?"#))
            .collect();
        assignments.push(format!(r#""{version_column}" = "{version_column}" + 1"#));

        // RETURNING hands back the row exactly as this statement committed
        // it; a separate read-back could observe a later writer.
        let sql = format!(
            r#"UPDATE "{}" SET {} WHERE "{}" = ? AND "{}" = ? RETURNING *"#,
            binding.table(),
            assignments.join(", "),
            binding.id_column(),
            version_column
        );

        let expected = i64::try_from(expected_version.value())
            .with_context(|| format!("version {expected_version} out of range"))?;

        let mut query = sqlx::query(&sql);
        for value in patch.fields().values() {
            query = bind_value(query, value)?;
        }
        let row = query
            .bind(id.as_str())
            .bind(expected)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| {
                format!(
                    "conditional update of {} '{}' failed",
                    binding.table(),
                    id
                )
            })?;

        match row.as_ref().map(decode_row).transpose()? {
            Some(row) => Ok(ConditionalWrite::Updated(row)),
            None => Ok(ConditionalWrite::NoMatchingRow),
        }
    }

    async fn run_unchecked(
        &self,
        binding: &TableBinding,
        id: &RecordId,
        patch: &UpdatePatch,
    ) -> Result<RecordRow> {
        if patch.is_empty() {
            // Nothing to write; serve the current row.
            return self
                .select_row(binding, id)
                .await?
                .with_context(|| format!("{} '{}' not found", binding.table(), id));
        }

        let assignments: Vec<String> = patch
            .fields()
            .keys()
            .map(|name| format!(r#""{name}" = ?"#))
            .collect();
        let sql = format!(
            r#"UPDATE "{}" SET {} WHERE "{}" = ? RETURNING *"#,
            binding.table(),
            assignments.join(", "),
            binding.id_column()
        );

        let mut query = sqlx::query(&sql);
        for value in patch.fields().values() {
            query = bind_value(query, value)?;
        }
        let row = query
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("update of {} '{}' failed", binding.table(), id))?;

        row.as_ref()
            .map(decode_row)
            .transpose()?
            .with_context(|| format!("{} '{}' not found", binding.table(), id))
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_one(
        &self,
        binding: &TableBinding,
        id: &RecordId,
    ) -> Result<Option<RecordRow>, OccError> {
        Ok(self.select_row(binding, id).await?)
    }

    async fn conditional_update(
        &self,
        binding: &TableBinding,
        id: &RecordId,
        expected_version: Version,
        patch: &UpdatePatch,
    ) -> Result<ConditionalWrite, OccError> {
        Ok(self
            .run_conditional(binding, id, expected_version, patch)
            .await?)
    }

    async fn update_unchecked(
        &self,
        binding: &TableBinding,
        id: &RecordId,
        patch: &UpdatePatch,
    ) -> Result<RecordRow, OccError> {
        Ok(self.run_unchecked(binding, id, patch).await?)
    }
}

fn decode_row(row: &SqliteRow) -> Result<RecordRow> {
    let mut fields = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        fields.insert(column.name().to_string(), decode_column(row, index)?);
    }
    Ok(RecordRow::from_fields(fields))
}

fn decode_column(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_info = raw.type_info();
    let value = match type_info.name() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(index)?),
        "REAL" | "NUMERIC" => Number::from_f64(row.try_get::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BOOLEAN" => Value::from(row.try_get::<bool, _>(index)?),
        "TEXT" | "DATETIME" | "DATE" | "TIME" => Value::from(row.try_get::<String, _>(index)?),
        other => bail!("unsupported SQLite column type '{other}'"),
    };
    Ok(value)
}

fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q Value) -> Result<SqliteQuery<'q>> {
    Ok(match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(flag) => query.bind(*flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                query.bind(int)
            } else {
                let float = number
                    .as_f64()
                    .with_context(|| format!("numeric field out of range: {number}"))?;
                query.bind(float)
            }
        }
        Value::String(text) => query.bind(text.as_str()),
        other => bail!("cannot bind JSON value to a SQLite column: {other}"),
    })
}

//! PostgreSQL storage backed by an sqlx pool

use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    PropertyFilter, PropertyRepository, PropertyTypeFilter, PropertyTypeRepository, Storage,
    StoreError,
};
use crate::db;
use crate::domain::{NewPropertyType, Property, PropertyInput, PropertyType, PropertyTypeStatus};

/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

const TYPE_COLUMNS: &str = "id, description, status";

/// Columns of a property joined with its type; `p` is the property relation.
const PROPERTY_COLUMNS: &str = "p.id, p.ad_code, p.neighborhood, p.room_count, \
     p.internal_area, p.external_area, p.property_type_id, \
     t.description AS type_description, t.status AS type_status";

/// Database row for property type
#[derive(Debug, sqlx::FromRow)]
struct PropertyTypeRow {
    id: i64,
    description: String,
    status: String,
}

impl From<PropertyTypeRow> for PropertyType {
    fn from(row: PropertyTypeRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            status: PropertyTypeStatus::from_db(&row.status),
        }
    }
}

/// Database row for property, joined with its type
#[derive(Debug, sqlx::FromRow)]
struct PropertyRow {
    id: i64,
    ad_code: String,
    neighborhood: String,
    room_count: i32,
    internal_area: f64,
    external_area: f64,
    property_type_id: i64,
    type_description: String,
    type_status: String,
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        Self {
            id: row.id,
            ad_code: row.ad_code,
            neighborhood: row.neighborhood,
            room_count: row.room_count,
            internal_area: row.internal_area,
            external_area: row.external_area,
            property_type: PropertyType {
                id: row.property_type_id,
                description: row.type_description,
                status: PropertyTypeStatus::from_db(&row.type_status),
            },
        }
    }
}

fn map_write_error(err: sqlx::Error, property_type_id: i64) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return StoreError::MissingPropertyType(property_type_id);
        }
    }
    StoreError::Database(err)
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyTypeRepository for PgStore {
    async fn count_property_types(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM property_type")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_property_type(&self, id: i64) -> Result<Option<PropertyType>, StoreError> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM property_type WHERE id = $1");
        let row = sqlx::query_as::<_, PropertyTypeRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_property_types(
        &self,
        filter: &PropertyTypeFilter,
    ) -> Result<Vec<PropertyType>, StoreError> {
        let query = format!(
            "SELECT {TYPE_COLUMNS} FROM property_type
             WHERE status <> 'INACTIVE'
               AND ($1::TEXT IS NULL OR strpos(lower(description), lower($1)) > 0)
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, PropertyTypeRow>(&query)
            .bind(filter.term.as_deref())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_property_type(
        &self,
        input: &NewPropertyType,
    ) -> Result<PropertyType, StoreError> {
        let query = format!(
            "INSERT INTO property_type (description, status)
             VALUES ($1, $2)
             RETURNING {TYPE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PropertyTypeRow>(&query)
            .bind(&input.description)
            .bind(input.status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_property_type(
        &self,
        property_type: &PropertyType,
    ) -> Result<Option<PropertyType>, StoreError> {
        let query = format!(
            "UPDATE property_type SET description = $2, status = $3
             WHERE id = $1
             RETURNING {TYPE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PropertyTypeRow>(&query)
            .bind(property_type.id)
            .bind(&property_type.description)
            .bind(property_type.status.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl PropertyRepository for PgStore {
    async fn find_property(&self, id: i64) -> Result<Option<Property>, StoreError> {
        let query = format!(
            "SELECT {PROPERTY_COLUMNS}
             FROM property p
             JOIN property_type t ON t.id = p.property_type_id
             WHERE p.id = $1"
        );
        let row = sqlx::query_as::<_, PropertyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>, StoreError> {
        let query = format!(
            "SELECT {PROPERTY_COLUMNS}
             FROM property p
             JOIN property_type t ON t.id = p.property_type_id
             WHERE $1::TEXT IS NULL
                OR strpos(lower(p.neighborhood), lower($1)) > 0
                OR strpos(lower(p.ad_code), lower($1)) > 0
             ORDER BY p.id"
        );
        let rows = sqlx::query_as::<_, PropertyRow>(&query)
            .bind(filter.term.as_deref())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_property_by_ad_code(
        &self,
        ad_code: &str,
        excluding_id: Option<i64>,
    ) -> Result<Option<Property>, StoreError> {
        let query = format!(
            "SELECT {PROPERTY_COLUMNS}
             FROM property p
             JOIN property_type t ON t.id = p.property_type_id
             WHERE p.ad_code = $1
               AND ($2::BIGINT IS NULL OR p.id <> $2)
             ORDER BY p.id
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, PropertyRow>(&query)
            .bind(ad_code)
            .bind(excluding_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn insert_property(&self, input: &PropertyInput) -> Result<Property, StoreError> {
        let query = format!(
            "WITH p AS (
                INSERT INTO property
                    (ad_code, neighborhood, room_count,
                     internal_area, external_area, property_type_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
             )
             SELECT {PROPERTY_COLUMNS}
             FROM p
             JOIN property_type t ON t.id = p.property_type_id"
        );
        let row = sqlx::query_as::<_, PropertyRow>(&query)
            .bind(&input.ad_code)
            .bind(&input.neighborhood)
            .bind(input.room_count)
            .bind(input.internal_area)
            .bind(input.external_area)
            .bind(input.property_type_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, input.property_type_id))?;
        Ok(row.into())
    }

    async fn update_property(
        &self,
        id: i64,
        input: &PropertyInput,
    ) -> Result<Option<Property>, StoreError> {
        let query = format!(
            "WITH p AS (
                UPDATE property SET
                    ad_code = $2,
                    neighborhood = $3,
                    room_count = $4,
                    internal_area = $5,
                    external_area = $6,
                    property_type_id = $7
                WHERE id = $1
                RETURNING *
             )
             SELECT {PROPERTY_COLUMNS}
             FROM p
             JOIN property_type t ON t.id = p.property_type_id"
        );
        let row = sqlx::query_as::<_, PropertyRow>(&query)
            .bind(id)
            .bind(&input.ad_code)
            .bind(&input.neighborhood)
            .bind(input.room_count)
            .bind(input.internal_area)
            .bind(input.external_area)
            .bind(input.property_type_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, input.property_type_id))?;
        Ok(row.map(Into::into))
    }

    async fn delete_property(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM property WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        db::health_check(&self.pool).await?;
        Ok(())
    }
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use models::document;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, SqlErr,
};

use super::{Document, DocumentStore, IndexFilter, ListOptions, SortKey, SortOrder};
use crate::errors::StoreError;

/// SeaORM-backed document store over the `document` table.
pub struct SeaOrmDocumentStore {
    pub db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    fn find(kind: &str, filter: &IndexFilter) -> Select<document::Entity> {
        let mut query = document::Entity::find().filter(document::Column::Kind.eq(kind));
        for (field, value) in filter.iter() {
            query = query.filter(Expr::cust_with_values("labels ->> $1 = $2", [field.clone(), value.clone()]));
        }
        query
    }
}

fn db_err(e: DbErr) -> StoreError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::RecordExist,
        _ => StoreError::backend(e),
    }
}

fn labels_json(index: &BTreeMap<String, String>) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(index).map_err(|e| StoreError::Encode(e.to_string()))
}

fn into_document(row: document::Model) -> Result<Document, StoreError> {
    let index = serde_json::from_value(row.labels).map_err(|e| StoreError::Decode {
        kind: row.kind.clone(),
        key: row.key.clone(),
        reason: e.to_string(),
    })?;
    Ok(Document {
        kind: row.kind,
        key: row.key,
        body: row.body,
        index,
        create_time: row.create_time.with_timezone(&Utc),
        update_time: row.update_time.with_timezone(&Utc),
    })
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn get(&self, kind: &str, key: &str) -> Result<Document, StoreError> {
        let row = document::Entity::find_by_id((kind.to_string(), key.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(StoreError::RecordNotExist)?;
        into_document(row)
    }

    async fn add(&self, doc: Document) -> Result<(), StoreError> {
        // the primary key still rejects a concurrent insert that wins the race
        if self.is_exist(&doc.kind, &doc.key).await? {
            return Err(StoreError::RecordExist);
        }
        let am = document::ActiveModel {
            kind: Set(doc.kind),
            key: Set(doc.key),
            labels: Set(labels_json(&doc.index)?),
            body: Set(doc.body),
            create_time: Set(doc.create_time.into()),
            update_time: Set(doc.update_time.into()),
        };
        am.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn put(&self, doc: Document) -> Result<(), StoreError> {
        let existing = document::Entity::find_by_id((doc.kind.clone(), doc.key.clone()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(StoreError::RecordNotExist)?;
        let mut am: document::ActiveModel = existing.into();
        am.labels = Set(labels_json(&doc.index)?);
        am.body = Set(doc.body);
        am.update_time = Set(doc.update_time.into());
        am.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, kind: &str, key: &str) -> Result<(), StoreError> {
        let res = document::Entity::delete_by_id((kind.to_string(), key.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(StoreError::RecordNotExist);
        }
        Ok(())
    }

    async fn list(&self, kind: &str, filter: &IndexFilter, opts: &ListOptions) -> Result<Vec<Document>, StoreError> {
        let mut query = Self::find(kind, filter);
        for opt in &opts.sort_by {
            let column = match opt.key {
                SortKey::CreateTime => document::Column::CreateTime,
                SortKey::UpdateTime => document::Column::UpdateTime,
            };
            let order = match opt.order {
                SortOrder::Ascending => Order::Asc,
                SortOrder::Descending => Order::Desc,
            };
            query = query.order_by(column, order);
        }
        query = query.order_by(document::Column::Key, Order::Asc);
        if let Some((offset, limit)) = opts.pagination.window() {
            query = query.offset(offset).limit(limit);
        }
        let rows = query.all(&self.db).await.map_err(db_err)?;
        rows.into_iter().map(into_document).collect()
    }

    async fn count(&self, kind: &str, filter: &IndexFilter) -> Result<u64, StoreError> {
        Self::find(kind, filter).count(&self.db).await.map_err(db_err)
    }

    async fn is_exist(&self, kind: &str, key: &str) -> Result<bool, StoreError> {
        let n = document::Entity::find_by_id((kind.to_string(), key.to_string()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(n > 0)
    }
}

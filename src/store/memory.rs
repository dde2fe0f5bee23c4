//! Process-local storage
//!
//! Used by the test suite and by `STORAGE_BACKEND=memory` for local runs.
//! Ids are assigned sequentially from 1, the same way BIGSERIAL columns do.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use super::{
    PropertyFilter, PropertyRepository, PropertyTypeFilter, PropertyTypeRepository, Storage,
    StoreError,
};
use crate::domain::{NewPropertyType, Property, PropertyInput, PropertyType};

#[derive(Debug, Default)]
struct Tables {
    last_property_type_id: i64,
    property_types: BTreeMap<i64, PropertyType>,
    last_property_id: i64,
    properties: BTreeMap<i64, PropertyInput>,
}

impl Tables {
    /// Join a stored property row with its type
    fn hydrate(&self, id: i64, row: &PropertyInput) -> Result<Property, StoreError> {
        let property_type = self
            .property_types
            .get(&row.property_type_id)
            .cloned()
            .ok_or(StoreError::MissingPropertyType(row.property_type_id))?;

        Ok(Property {
            id,
            ad_code: row.ad_code.clone(),
            neighborhood: row.neighborhood.clone(),
            room_count: row.room_count,
            internal_area: row.internal_area,
            external_area: row.external_area,
            property_type,
        })
    }

    fn check_type_exists(&self, property_type_id: i64) -> Result<(), StoreError> {
        if self.property_types.contains_key(&property_type_id) {
            Ok(())
        } else {
            Err(StoreError::MissingPropertyType(property_type_id))
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyTypeRepository for InMemoryStore {
    async fn count_property_types(&self) -> Result<i64, StoreError> {
        Ok(self.tables.lock().property_types.len() as i64)
    }

    async fn find_property_type(&self, id: i64) -> Result<Option<PropertyType>, StoreError> {
        Ok(self.tables.lock().property_types.get(&id).cloned())
    }

    async fn list_property_types(
        &self,
        filter: &PropertyTypeFilter,
    ) -> Result<Vec<PropertyType>, StoreError> {
        Ok(self
            .tables
            .lock()
            .property_types
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn insert_property_type(
        &self,
        input: &NewPropertyType,
    ) -> Result<PropertyType, StoreError> {
        let mut tables = self.tables.lock();
        tables.last_property_type_id += 1;

        let property_type = PropertyType {
            id: tables.last_property_type_id,
            description: input.description.clone(),
            status: input.status,
        };
        tables
            .property_types
            .insert(property_type.id, property_type.clone());

        Ok(property_type)
    }

    async fn update_property_type(
        &self,
        property_type: &PropertyType,
    ) -> Result<Option<PropertyType>, StoreError> {
        let mut tables = self.tables.lock();
        Ok(tables
            .property_types
            .get_mut(&property_type.id)
            .map(|stored| {
                *stored = property_type.clone();
                stored.clone()
            }))
    }
}

#[async_trait]
impl PropertyRepository for InMemoryStore {
    async fn find_property(&self, id: i64) -> Result<Option<Property>, StoreError> {
        let tables = self.tables.lock();
        let property = tables
            .properties
            .get(&id)
            .map(|row| tables.hydrate(id, row))
            .transpose();
        property
    }

    async fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>, StoreError> {
        let tables = self.tables.lock();
        let mut properties = Vec::new();
        for (id, row) in &tables.properties {
            let property = tables.hydrate(*id, row)?;
            if filter.matches(&property) {
                properties.push(property);
            }
        }
        Ok(properties)
    }

    async fn find_property_by_ad_code(
        &self,
        ad_code: &str,
        excluding_id: Option<i64>,
    ) -> Result<Option<Property>, StoreError> {
        let tables = self.tables.lock();
        let property = tables
            .properties
            .iter()
            .find(|(id, row)| row.ad_code == ad_code && Some(**id) != excluding_id)
            .map(|(id, row)| tables.hydrate(*id, row))
            .transpose();
        property
    }

    async fn insert_property(&self, input: &PropertyInput) -> Result<Property, StoreError> {
        let mut tables = self.tables.lock();
        tables.check_type_exists(input.property_type_id)?;

        tables.last_property_id += 1;
        let id = tables.last_property_id;
        tables.properties.insert(id, input.clone());

        tables.hydrate(id, input)
    }

    async fn update_property(
        &self,
        id: i64,
        input: &PropertyInput,
    ) -> Result<Option<Property>, StoreError> {
        let mut tables = self.tables.lock();
        tables.check_type_exists(input.property_type_id)?;

        match tables.properties.get_mut(&id) {
            Some(row) => *row = input.clone(),
            None => return Ok(None),
        }

        tables.hydrate(id, input).map(Some)
    }

    async fn delete_property(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.lock().properties.remove(&id).is_some())
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyTypeStatus;

    fn input(ad_code: &str, neighborhood: &str, property_type_id: i64) -> PropertyInput {
        PropertyInput {
            ad_code: ad_code.to_string(),
            neighborhood: neighborhood.to_string(),
            room_count: 2,
            internal_area: 50.0,
            external_area: 5.0,
            property_type_id,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let a = store
            .insert_property_type(&NewPropertyType::new("CASA"))
            .await
            .unwrap();
        let b = store
            .insert_property_type(&NewPropertyType::new("APARTAMENTO"))
            .await
            .unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.count_property_types().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn inactive_types_stay_stored_but_unlisted() {
        let store = InMemoryStore::new();
        let mut casa = store
            .insert_property_type(&NewPropertyType::new("CASA"))
            .await
            .unwrap();
        casa.status = PropertyTypeStatus::Inactive;
        store.update_property_type(&casa).await.unwrap();

        let listed = store
            .list_property_types(&PropertyTypeFilter::default())
            .await
            .unwrap();
        assert!(listed.is_empty());
        assert_eq!(store.count_property_types().await.unwrap(), 1);
        assert_eq!(
            store.find_property_type(casa.id).await.unwrap().unwrap().status,
            PropertyTypeStatus::Inactive
        );
    }

    #[tokio::test]
    async fn update_unknown_type_returns_none() {
        let store = InMemoryStore::new();
        let ghost = PropertyType {
            id: 42,
            description: "GHOST".to_string(),
            status: PropertyTypeStatus::Active,
        };
        assert!(store.update_property_type(&ghost).await.unwrap().is_none());
        assert_eq!(store.count_property_types().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_properties_with_unknown_type() {
        let store = InMemoryStore::new();
        let err = store.insert_property(&input("X-1", "Centro", 9)).await;
        assert!(matches!(err, Err(StoreError::MissingPropertyType(9))));
    }

    #[tokio::test]
    async fn ad_code_lookup_skips_excluded_row() {
        let store = InMemoryStore::new();
        let casa = store
            .insert_property_type(&NewPropertyType::new("CASA"))
            .await
            .unwrap();
        let saved = store
            .insert_property(&input("C-10", "Centro", casa.id))
            .await
            .unwrap();

        let found = store.find_property_by_ad_code("C-10", None).await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(saved.id));

        let excluded = store
            .find_property_by_ad_code("C-10", Some(saved.id))
            .await
            .unwrap();
        assert!(excluded.is_none());
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = InMemoryStore::new();
        let casa = store
            .insert_property_type(&NewPropertyType::new("CASA"))
            .await
            .unwrap();
        let saved = store
            .insert_property(&input("C-11", "Lagoa", casa.id))
            .await
            .unwrap();

        assert!(store.delete_property(saved.id).await.unwrap());
        assert!(!store.delete_property(saved.id).await.unwrap());
        assert!(store.find_property(saved.id).await.unwrap().is_none());
    }
}

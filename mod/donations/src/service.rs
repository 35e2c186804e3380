use std::sync::Arc;

use thiserror::Error;

use carehub_core::{merge_patch, new_id, now_rfc3339, ListParams, ListResult};
use carehub_store::{Collection, CollectionSpec, ColumnDef, Store, StoreError, Value};

use crate::model::{CreateDonation, Donation};

const PROTECTED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

#[derive(Debug, Error)]
pub enum DonationError {
    #[error("Donation not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<DonationError> for carehub_core::ServiceError {
    fn from(e: DonationError) -> Self {
        use carehub_core::ServiceError;
        match e {
            DonationError::NotFound => ServiceError::NotFound(e.to_string()),
            DonationError::Validation(m) => ServiceError::Validation(m),
            DonationError::Storage(m) => ServiceError::Storage(m),
            DonationError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

impl From<StoreError> for DonationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Corrupt(m) => DonationError::Internal(m),
            other => DonationError::Storage(other.to_string()),
        }
    }
}

static DONATIONS: CollectionSpec = CollectionSpec {
    table: "donations",
    columns: &[
        ColumnDef { name: "date", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "created_at", sql_type: "TEXT", indexed: false, unique: false },
        ColumnDef { name: "updated_at", sql_type: "TEXT", indexed: false, unique: false },
    ],
    unique_together: &[],
};

/// Donation ledger: plain CRUD, no linked accounts.
pub struct DonationService {
    donations: Collection,
}

impl DonationService {
    pub fn new(store: Store) -> Result<Arc<Self>, DonationError> {
        Ok(Arc::new(Self { donations: Collection::open(store, &DONATIONS)? }))
    }

    pub fn create(&self, input: CreateDonation) -> Result<Donation, DonationError> {
        if input.purpose_of_donation.trim().is_empty() {
            return Err(DonationError::Validation(
                "Purpose of donation is required.".to_string(),
            ));
        }

        let now = now_rfc3339();
        let donation = Donation {
            id: new_id(),
            date: input.date,
            purpose_of_donation: input.purpose_of_donation,
            amount_donated_words: input.amount_donated_words,
            amount_donated_figures: input.amount_donated_figures,
            donor_contact: input.donor_contact,
            items_donated: input.items_donated,
            signed_by: input.signed_by,
            signed_date: input.signed_date,
            received_by: input.received_by,
            created_at: now.clone(),
            updated_at: now,
        };
        self.donations.insert(&donation.id, &donation, &indexes(&donation))?;
        Ok(donation)
    }

    pub fn get(&self, id: &str) -> Result<Donation, DonationError> {
        self.donations.get(id)?.ok_or(DonationError::NotFound)
    }

    pub fn list(&self, params: &ListParams) -> Result<ListResult<Donation>, DonationError> {
        let (items, total) = self.donations.list(&[], params.limit, params.offset)?;
        Ok(ListResult { items, total })
    }

    pub fn update(&self, id: &str, patch: serde_json::Value) -> Result<Donation, DonationError> {
        let donation = self.get(id)?;
        let mut doc = serde_json::to_value(&donation)
            .map_err(|e| DonationError::Internal(e.to_string()))?;
        let mut patch = patch;
        if let Some(obj) = patch.as_object_mut() {
            for field in PROTECTED_FIELDS {
                obj.remove(*field);
            }
        }
        merge_patch(&mut doc, &patch);

        let mut updated: Donation = serde_json::from_value(doc)
            .map_err(|e| DonationError::Validation(e.to_string()))?;
        updated.updated_at = now_rfc3339();
        self.donations.update(id, &updated, &indexes(&updated))?;
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<(), DonationError> {
        if !self.donations.delete(id)? {
            return Err(DonationError::NotFound);
        }
        Ok(())
    }
}

fn indexes(d: &Donation) -> Vec<(&'static str, Value)> {
    vec![
        ("date", Value::from(d.date.clone())),
        ("created_at", Value::from(d.created_at.clone())),
        ("updated_at", Value::from(d.updated_at.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use carehub_store::SqliteStore;

    use super::*;

    fn service() -> Arc<DonationService> {
        let store: carehub_store::Store = Arc::new(SqliteStore::open_in_memory().unwrap());
        DonationService::new(store).unwrap()
    }

    fn sample() -> CreateDonation {
        CreateDonation {
            date: "2026-08-01".to_string(),
            purpose_of_donation: "School supplies".to_string(),
            amount_donated_words: "Five hundred dollars".to_string(),
            amount_donated_figures: 500.0,
            donor_contact: "donor@example.org".to_string(),
            items_donated: vec![crate::model::DonatedItem {
                description: "Notebooks".to_string(),
                quantity: "200".to_string(),
                value_of_donation: 300.0,
                comment: None,
            }],
            signed_by: "Jane Donor".to_string(),
            signed_date: "2026-08-01".to_string(),
            received_by: vec![crate::model::Receiver {
                full_name: "Grace Mensah".to_string(),
                position: "Financial Controller".to_string(),
                date: "2026-08-01".to_string(),
            }],
        }
    }

    #[test]
    fn crud_round_trip() {
        let svc = service();
        let d = svc.create(sample()).unwrap();
        assert_eq!(svc.get(&d.id).unwrap().purpose_of_donation, "School supplies");

        let updated = svc
            .update(&d.id, json!({"amount_donated_figures": 750.0, "id": "hijacked"}))
            .unwrap();
        assert_eq!(updated.id, d.id);
        assert_eq!(updated.amount_donated_figures, 750.0);

        assert_eq!(svc.list(&Default::default()).unwrap().total, 1);

        svc.delete(&d.id).unwrap();
        assert!(matches!(svc.get(&d.id), Err(DonationError::NotFound)));
        assert!(matches!(svc.delete(&d.id), Err(DonationError::NotFound)));
    }

    #[test]
    fn purpose_is_required() {
        let svc = service();
        let mut input = sample();
        input.purpose_of_donation = " ".to_string();
        assert!(matches!(svc.create(input), Err(DonationError::Validation(_))));
    }
}

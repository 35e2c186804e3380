use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonatedItem {
    pub description: String,
    pub quantity: String,
    pub value_of_donation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receiver {
    pub full_name: String,
    pub position: String,
    pub date: String,
}

/// A recorded donation, cash or in kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,

    pub date: String,
    pub purpose_of_donation: String,
    pub amount_donated_words: String,
    pub amount_donated_figures: f64,
    pub donor_contact: String,

    #[serde(default)]
    pub items_donated: Vec<DonatedItem>,

    pub signed_by: String,
    pub signed_date: String,
    #[serde(default)]
    pub received_by: Vec<Receiver>,

    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonation {
    pub date: String,
    pub purpose_of_donation: String,
    pub amount_donated_words: String,
    pub amount_donated_figures: f64,
    pub donor_contact: String,
    #[serde(default)]
    pub items_donated: Vec<DonatedItem>,
    pub signed_by: String,
    pub signed_date: String,
    #[serde(default)]
    pub received_by: Vec<Receiver>,
}

//! Point-of-interest candidates and local ordering.

use crate::geo::Location;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Where a candidate's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Returned by the points-of-interest provider.
    #[default]
    Provider,
    /// Static substitute data used when the provider failed.
    Fallback,
}

/// A point of interest eligible for ranking and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque id, unique within one ranking call.
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<u8>,
    /// Estimated visit length in hours.
    pub estimated_duration: f64,
    pub description: String,
    pub address: Option<String>,
    #[serde(default)]
    pub location: Location,
    pub opening_hours: Option<Vec<String>>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub photo_references: Vec<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Candidate {
    /// Minimal candidate; the remaining attributes start empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            description: name.clone(),
            name,
            category: category.into(),
            types: Vec::new(),
            rating: None,
            user_ratings_total: None,
            price_level: None,
            estimated_duration: 2.0,
            address: None,
            location: Location::default(),
            opening_hours: None,
            website: None,
            image_url: None,
            photo_references: Vec::new(),
            provenance: Provenance::Provider,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// Local ordering applied before re-ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Rating descending, unrated last.
    #[default]
    Rating,
    /// Price tier ascending, unknown price last.
    Price,
    /// Keep provider order.
    None,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "price" => Ok(SortKey::Price),
            "none" => Ok(SortKey::None),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

/// Stable in-place sort of candidates by `key`.
pub fn sort_candidates(candidates: &mut [Candidate], key: SortKey) {
    match key {
        SortKey::Price => candidates.sort_by(|a, b| match (a.price_level, b.price_level) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::Rating => candidates.sort_by(|a, b| match (a.rating, b.rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::None => {}
    }
}

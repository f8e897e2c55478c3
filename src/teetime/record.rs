//! Tee-time record
//!
//! A single bookable slot as the booking API serializes it. The record is
//! a DTO: it is created fresh from each response and never mutated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single bookable tee time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeeTimeRecord {
    /// Tee-off time
    pub start_time: String,
    /// Calendar date
    pub date: String,
    /// Golf course identifier
    pub course_name: String,
    /// Holes included (9, 18, or both)
    pub holes: Vec<u8>,
    /// Upstream booking provider name
    pub provider: String,
    /// Deep link to book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    /// Whether the slot is currently bookable
    pub is_available: bool,
    /// Base fee
    pub green_fee: f64,
    /// Half-cart fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_cart: Option<f64>,
    /// Fee subtotal
    pub subtotal: f64,
    /// Total price
    pub price: f64,
    /// Booking restrictions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Vec<String>>,
    /// Promotional flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_offer: Option<bool>,
    /// Smallest group the slot can be booked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_num_players: Option<u8>,
    /// Largest group the slot can be booked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_players: Option<u8>,
}

/// A record that parsed but violates a value constraint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

impl TeeTimeRecord {
    /// Check that every fee is finite and non-negative
    pub fn validate(&self) -> Result<(), RecordError> {
        let amounts = [
            ("green_fee", Some(self.green_fee)),
            ("half_cart", self.half_cart),
            ("subtotal", Some(self.subtotal)),
            ("price", Some(self.price)),
        ];

        for (field, value) in amounts {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(RecordError::InvalidAmount { field, value });
                }
            }
        }

        Ok(())
    }

    /// Total price formatted as dollars, e.g. `$45.00`
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Holes joined with a slash, e.g. `9/18`
    pub fn holes_label(&self) -> String {
        self.holes
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Promotional flag, treating an absent value as false
    pub fn is_special_offer(&self) -> bool {
        self.special_offer.unwrap_or(false)
    }
}

//! Subscription pricing for monitoring profiles.
//!
//! The same function backs the live price preview and the price stamped onto a
//! profile at submission, so the two can never disagree.
//!
//! # Example
//!
//! ```
//! use pricing::{calculate_price, DeliveryMethod, Frequency};
//!
//! let pricing = calculate_price(Frequency::Daily, 5, DeliveryMethod::Slack).unwrap();
//! assert_eq!(pricing.total, 50);
//! assert_eq!(pricing.annually, 600);
//! ```

pub mod error;
pub mod plan;

pub use error::{PricingError, Result};
pub use plan::{DeliveryMethod, Frequency};

use serde::{Deserialize, Serialize};

/// Monthly base price before the frequency multiplier.
pub const BASE_PRICE: i64 = 10;

/// Monthly price per monitored source.
pub const SOURCE_PRICE: i64 = 2;

/// Itemized price components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: i64,
    pub frequency: Frequency,
    pub frequency_multiplier: i64,
    pub base_with_frequency: i64,
    pub sources_count: i64,
    pub source_price: i64,
    pub sources_cost: i64,
    pub delivery_method: DeliveryMethod,
    pub delivery_cost: i64,
}

/// A computed subscription price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub breakdown: PriceBreakdown,
    /// Monthly total.
    pub total: i64,
    /// Same as `total`; kept for clients that read the explicit name.
    pub monthly: i64,
    pub annually: i64,
}

impl Pricing {
    /// Human-readable monthly and yearly prices.
    pub fn formatted(&self) -> (String, String) {
        (
            format!("${}.00/month", self.total),
            format!("${}.00/year", self.annually),
        )
    }
}

/// Calculate the price of a subscription.
///
/// Fails with [`PricingError::InvalidInput`] on field `sourceCount` when the
/// count is negative or too large to price.
pub fn calculate_price(
    frequency: Frequency,
    sources_count: i64,
    delivery_method: DeliveryMethod,
) -> Result<Pricing> {
    if sources_count < 0 {
        return Err(PricingError::invalid("sourceCount", sources_count));
    }

    let frequency_multiplier = frequency.multiplier();
    let base_with_frequency = BASE_PRICE * frequency_multiplier;
    let delivery_cost = delivery_method.cost();

    let sources_cost = sources_count
        .checked_mul(SOURCE_PRICE)
        .ok_or_else(|| PricingError::invalid("sourceCount", sources_count))?;
    let total = sources_cost
        .checked_add(base_with_frequency + delivery_cost)
        .ok_or_else(|| PricingError::invalid("sourceCount", sources_count))?;
    let annually = total
        .checked_mul(12)
        .ok_or_else(|| PricingError::invalid("sourceCount", sources_count))?;

    Ok(Pricing {
        breakdown: PriceBreakdown {
            base_price: BASE_PRICE,
            frequency,
            frequency_multiplier,
            base_with_frequency,
            sources_count,
            source_price: SOURCE_PRICE,
            sources_cost,
            delivery_method,
            delivery_cost,
        },
        total,
        monthly: total,
        annually,
    })
}

/// Calculate a price from raw wire values.
///
/// Inputs are validated in order: frequency, source count, delivery method.
pub fn calculate_price_str(
    frequency: &str,
    sources_count: i64,
    delivery_method: &str,
) -> Result<Pricing> {
    let frequency: Frequency = frequency.parse()?;
    if sources_count < 0 {
        return Err(PricingError::invalid("sourceCount", sources_count));
    }
    let delivery_method: DeliveryMethod = delivery_method.parse()?;

    calculate_price(frequency, sources_count, delivery_method)
}

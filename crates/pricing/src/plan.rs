//! Subscription plan options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// How often a profile's monitoring digest is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// All frequencies, most expensive first.
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    /// Wire name of this frequency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Multiplier applied to the base price.
    pub fn multiplier(&self) -> i64 {
        match self {
            Frequency::Daily => 3,
            Frequency::Weekly => 2,
            Frequency::Monthly => 1,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(PricingError::invalid("frequency", other)),
        }
    }
}

/// Where a profile's updates are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Dashboard,
    Slack,
}

impl DeliveryMethod {
    /// All delivery methods, cheapest first.
    pub const ALL: [DeliveryMethod; 3] = [
        DeliveryMethod::Email,
        DeliveryMethod::Dashboard,
        DeliveryMethod::Slack,
    ];

    /// Wire name of this delivery method.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Email => "email",
            DeliveryMethod::Dashboard => "dashboard",
            DeliveryMethod::Slack => "slack",
        }
    }

    /// Flat monthly surcharge for this delivery method.
    pub fn cost(&self) -> i64 {
        match self {
            DeliveryMethod::Email => 0,
            DeliveryMethod::Dashboard => 5,
            DeliveryMethod::Slack => 10,
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMethod {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(DeliveryMethod::Email),
            "dashboard" => Ok(DeliveryMethod::Dashboard),
            "slack" => Ok(DeliveryMethod::Slack),
            other => Err(PricingError::invalid("deliveryMethod", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_round_trips_through_str() {
        for frequency in Frequency::ALL {
            assert_eq!(frequency.as_str().parse::<Frequency>().unwrap(), frequency);
        }
    }

    #[test]
    fn test_frequency_rejects_unknown() {
        let err = "hourly".parse::<Frequency>().unwrap_err();
        assert_eq!(err.field(), "frequency");
    }

    #[test]
    fn test_delivery_method_is_case_sensitive() {
        assert!("Slack".parse::<DeliveryMethod>().is_err());
        assert_eq!("slack".parse::<DeliveryMethod>().unwrap(), DeliveryMethod::Slack);
    }

    #[test]
    fn test_serde_names_are_lowercase() {
        let json = serde_json::to_string(&DeliveryMethod::Dashboard).unwrap();
        assert_eq!(json, "\"dashboard\"");
        let freq: Frequency = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(freq, Frequency::Weekly);
    }
}

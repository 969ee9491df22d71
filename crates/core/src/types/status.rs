//! Enumerations shared by accounts and checkout.

use serde::{Deserialize, Serialize};

/// Membership tier chosen at signup.
///
/// Informational only: no operation changes behaviour based on the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    #[default]
    Basic,
    Premium,
}

impl std::fmt::Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for Membership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            other => Err(format!("invalid membership: {other}")),
        }
    }
}

/// Payment method selected at checkout.
///
/// Only `Credit` carries form fields that need validating; the other two
/// are simulated hand-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Credit,
    Paypal,
    Bank,
}

impl PaymentMethod {
    /// Whether this method requires card details.
    #[must_use]
    pub const fn requires_card(&self) -> bool {
        matches!(self, Self::Credit)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credit => write!(f, "credit"),
            Self::Paypal => write!(f, "paypal"),
            Self::Bank => write!(f, "bank"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "paypal" => Ok(Self::Paypal),
            "bank" => Ok(Self::Bank),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_parse() {
        assert_eq!("premium".parse::<Membership>().unwrap(), Membership::Premium);
        assert_eq!(" Basic ".parse::<Membership>().unwrap(), Membership::Basic);
        assert!("gold".parse::<Membership>().is_err());
        assert_eq!(Membership::default(), Membership::Basic);
    }

    #[test]
    fn test_payment_method_roundtrip_text() {
        for method in [PaymentMethod::Credit, PaymentMethod::Paypal, PaymentMethod::Bank] {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
        assert!(PaymentMethod::Credit.requires_card());
        assert!(!PaymentMethod::Bank.requires_card());
    }
}

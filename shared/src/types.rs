//! Common types used across the application

use serde::{Deserialize, Serialize};

/// Units a product can be stocked in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    G,
    Lb,
    Oz,
    Piece,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::Lb => "lb",
            Unit::Oz => "oz",
            Unit::Piece => "piece",
        }
    }

    /// Parse the wire/storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "kg" => Some(Unit::Kg),
            "g" => Some(Unit::G),
            "lb" => Some(Unit::Lb),
            "oz" => Some(Unit::Oz),
            "piece" => Some(Unit::Piece),
            _ => None,
        }
    }
}

/// How a purchase was paid for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Cheque => "cheque",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "credit" => Some(PaymentMethod::Credit),
            "cheque" => Some(PaymentMethod::Cheque),
            _ => None,
        }
    }
}

/// Reporting periods offered by the dashboard charts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl ChartPeriod {
    /// Window length in calendar days
    pub fn days(&self) -> i64 {
        match self {
            ChartPeriod::Week => 7,
            ChartPeriod::Month => 30,
            ChartPeriod::Quarter => 90,
            ChartPeriod::Year => 365,
        }
    }
}

/// Date range for report queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_round_trips_through_wire_form() {
        for unit in [Unit::Kg, Unit::G, Unit::Lb, Unit::Oz, Unit::Piece] {
            assert_eq!(Unit::parse(unit.as_str()), Some(unit));
        }
        assert_eq!(Unit::parse("tonne"), None);
    }

    #[test]
    fn payment_method_round_trips_through_wire_form() {
        for method in [PaymentMethod::Cash, PaymentMethod::Credit, PaymentMethod::Cheque] {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(PaymentMethod::parse("barter"), None);
    }

    #[test]
    fn chart_period_days() {
        assert_eq!(ChartPeriod::Week.days(), 7);
        assert_eq!(ChartPeriod::Year.days(), 365);
    }
}

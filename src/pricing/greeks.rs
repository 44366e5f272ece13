//! Option price and first-order sensitivities.

use serde::{Deserialize, Serialize};

/// Price, the volatility it was evaluated at, and the five BSM Greeks.
///
/// Theta is annual (per unit of year fraction); see [`Greeks::theta_per_day`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Option price (observed market price when calibrated, fair value otherwise).
    pub price: f64,
    /// Volatility the Greeks are evaluated at (implied when calibrated).
    pub implied_volatility: f64,
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// ∂V/∂t, annual
    pub theta: f64,
    /// ∂V/∂r
    pub rho: f64,
    /// ∂V/∂σ
    pub vega: f64,
}

impl Greeks {
    /// Theta per calendar day.
    #[must_use]
    pub fn theta_per_day(&self) -> f64 {
        self.theta / 365.0
    }

    /// Named values in reporting order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, f64); 7] {
        [
            ("price", self.price),
            ("implied_volatility", self.implied_volatility),
            ("delta", self.delta),
            ("gamma", self.gamma),
            ("theta", self.theta),
            ("rho", self.rho),
            ("vega", self.vega),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theta_per_day() {
        let greeks = Greeks {
            theta: -7.3,
            ..Greeks::default()
        };
        assert!((greeks.theta_per_day() + 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_fields_order_and_serialization() {
        let greeks = Greeks {
            price: 10.0,
            implied_volatility: 0.2,
            delta: 0.6,
            gamma: 0.02,
            theta: -6.4,
            rho: 53.2,
            vega: 37.5,
        };
        let names: Vec<&str> = greeks.fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["price", "implied_volatility", "delta", "gamma", "theta", "rho", "vega"]
        );

        let json = serde_json::to_value(greeks).unwrap();
        assert_eq!(json["implied_volatility"], 0.2);
        assert_eq!(json["vega"], 37.5);
    }
}

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Footprint saved by switching from one activity to another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CarbonCalculation {
    /// Kilograms of CO2e saved
    pub savings_per_kg: f64,

    /// Litres of water saved
    pub water_savings_liters: f64,
}

/// Lookup request for a carbon calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CarbonComparisonRequest {
    /// Activity the user does today, e.g. `car_km`
    pub current_activity: String,

    /// Activity they could switch to, e.g. `bicycle_km`
    pub alternative_activity: String,

    /// Distance in km, or number of meals or items
    pub quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carbon_calculation_wire_shape() {
        let calculation = CarbonCalculation {
            savings_per_kg: 1.92,
            water_savings_liters: 0.0,
        };
        let json = serde_json::to_value(calculation).unwrap();
        assert_eq!(json["savings_per_kg"], 1.92);
        assert_eq!(json["water_savings_liters"], 0.0);
    }
}

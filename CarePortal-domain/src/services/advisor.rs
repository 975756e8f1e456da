//! Carbon and water footprints for the sustainability advisor.

use crate::entities::advisor::CarbonCalculation;
use crate::errors::PortalError;

/// What a footprint is measured per
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Kilometre,
    Meal,
    Item,
}

/// (activity, unit, kg CO2e per unit, litres of water per unit)
const FOOTPRINTS: &[(&str, Unit, f64, f64)] = &[
    ("car_km", Unit::Kilometre, 0.192, 0.0),
    ("bus_km", Unit::Kilometre, 0.105, 0.0),
    ("train_km", Unit::Kilometre, 0.041, 0.0),
    ("bicycle_km", Unit::Kilometre, 0.0, 0.0),
    ("walking_km", Unit::Kilometre, 0.0, 0.0),
    ("beef_meal", Unit::Meal, 7.7, 3080.0),
    ("chicken_meal", Unit::Meal, 1.8, 860.0),
    ("vegetarian_meal", Unit::Meal, 0.9, 400.0),
    ("vegan_meal", Unit::Meal, 0.6, 300.0),
    ("plastic_bottle", Unit::Item, 0.083, 3.0),
    ("reusable_bottle", Unit::Item, 0.0, 0.0),
];

fn footprint(activity: &str) -> Option<(Unit, f64, f64)> {
    FOOTPRINTS
        .iter()
        .find(|(name, ..)| *name == activity)
        .map(|(_, unit, carbon, water)| (*unit, *carbon, *water))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Names accepted by [`calculate_savings`]
pub fn known_activities() -> Vec<&'static str> {
    FOOTPRINTS.iter().map(|(name, ..)| *name).collect()
}

/// Footprint saved by doing `alternative` instead of `current`, `quantity` times.
///
/// Savings are negative when the alternative is worse.
pub fn calculate_savings(current: &str, alternative: &str, quantity: f64) -> Result<CarbonCalculation, PortalError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(PortalError::Validation("Quantity must be a non-negative number".to_string()));
    }
    let (current_unit, current_carbon, current_water) = footprint(current)
        .ok_or_else(|| PortalError::Validation(format!("Unknown activity: {}", current)))?;
    let (alternative_unit, alternative_carbon, alternative_water) = footprint(alternative)
        .ok_or_else(|| PortalError::Validation(format!("Unknown activity: {}", alternative)))?;
    if current_unit != alternative_unit {
        return Err(PortalError::Validation(format!(
            "{} and {} are not comparable",
            current, alternative
        )));
    }

    Ok(CarbonCalculation {
        savings_per_kg: round2((current_carbon - alternative_carbon) * quantity),
        water_savings_liters: round2((current_water - alternative_water) * quantity),
    })
}

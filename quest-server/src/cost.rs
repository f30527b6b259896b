//! Trip cost estimation.
//!
//! Two accommodation policies exist because two call sites need different
//! answers: ranking candidate destinations assumes a default nightly rate
//! for nights without a quote, while a concrete itinerary only charges for
//! hotels that were actually found.

use crate::domain::{CostBreakdown, FuelType, TransportMode};

/// Consumption and price for one fuel type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelProfile {
    /// Litres (or kWh) per 100 km.
    pub consumption_per_100km: f64,
    /// Price per litre (or kWh).
    pub price_per_unit: f64,
}

impl FuelProfile {
    pub fn cost_per_km(&self) -> f64 {
        self.consumption_per_100km / 100.0 * self.price_per_unit
    }
}

/// How the traveller moves, as far as cost is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportOptions {
    pub mode: TransportMode,
    pub fuel: FuelType,
    /// An unlimited rail pass makes train travel free.
    pub unlimited_rail_pass: bool,
}

impl TransportOptions {
    pub fn car(fuel: FuelType) -> Self {
        Self {
            mode: TransportMode::Car,
            fuel,
            unlimited_rail_pass: false,
        }
    }

    pub fn train(unlimited_rail_pass: bool) -> Self {
        Self {
            mode: TransportMode::Train,
            fuel: FuelType::default(),
            unlimited_rail_pass,
        }
    }
}

/// Cost constants.
#[derive(Debug, Clone)]
pub struct CostModel {
    pub petrol: FuelProfile,
    pub diesel: FuelProfile,
    pub electric: FuelProfile,
    /// Train fare per kilometre without a pass.
    pub train_cost_per_km: f64,
    /// Nightly rate assumed when no hotel quote exists.
    pub default_nightly_rate: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            petrol: FuelProfile {
                consumption_per_100km: 7.0,
                price_per_unit: 1.75,
            },
            diesel: FuelProfile {
                consumption_per_100km: 5.5,
                price_per_unit: 1.65,
            },
            electric: FuelProfile {
                consumption_per_100km: 20.0,
                price_per_unit: 0.35,
            },
            train_cost_per_km: 0.15,
            default_nightly_rate: 60.0,
        }
    }
}

impl CostModel {
    pub fn fuel(&self, fuel: FuelType) -> &FuelProfile {
        match fuel {
            FuelType::Petrol => &self.petrol,
            FuelType::Diesel => &self.diesel,
            FuelType::Electric => &self.electric,
        }
    }

    /// Transport cost for a distance, rounded to whole currency units.
    pub fn transport_cost(&self, distance_km: f64, transport: &TransportOptions) -> f64 {
        let distance_km = distance_km.max(0.0);
        match transport.mode {
            TransportMode::Train if transport.unlimited_rail_pass => 0.0,
            TransportMode::Train => (distance_km * self.train_cost_per_km).round(),
            TransportMode::Car => (distance_km * self.fuel(transport.fuel).cost_per_km()).round(),
        }
    }

    /// Cost where only nights with a known price are charged.
    ///
    /// `nightly_prices` has one entry per night; `None` means no hotel was
    /// assigned and contributes nothing.
    pub fn estimate_exact(
        &self,
        distance_km: f64,
        transport: &TransportOptions,
        nightly_prices: &[Option<f64>],
    ) -> CostBreakdown {
        CostBreakdown {
            transport_cost: self.transport_cost(distance_km, transport),
            accommodation_cost: nightly_prices.iter().flatten().map(|p| p.max(0.0)).sum(),
        }
    }

    /// Cost where nights without a price are charged the default rate.
    pub fn estimate_with_fallback(
        &self,
        distance_km: f64,
        transport: &TransportOptions,
        nightly_prices: &[Option<f64>],
    ) -> CostBreakdown {
        CostBreakdown {
            transport_cost: self.transport_cost(distance_km, transport),
            accommodation_cost: nightly_prices
                .iter()
                .map(|p| p.unwrap_or(self.default_nightly_rate).max(0.0))
                .sum(),
        }
    }
}

//! Scenario-wide constants and the scenario tag.

use crate::PlanError;
use biochain_core::units::{Liters, LitersPerMegagram, Megagrams};
use biochain_core::TransportMode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Vehicle size and per-trip cost for one transport mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeParameters {
    pub vehicle_capacity: Megagrams,
    /// Fixed cost per dispatched trip
    pub trip_handling_cost: f64,
}

impl ModeParameters {
    pub fn truck() -> Self {
        Self {
            vehicle_capacity: Megagrams(500.0),
            trip_handling_cost: 10_000.0,
        }
    }

    pub fn train() -> Self {
        Self {
            vehicle_capacity: Megagrams(20_000.0),
            trip_handling_cost: 60_000.0,
        }
    }
}

/// How fixed per-trip handling costs enter the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlingCostPolicy {
    /// One binary usage indicator per trip slot, linked by
    /// `slot <= vehicle_capacity × indicator`; the fixed cost is charged per
    /// indicator, i.e. per slot carrying any flow.
    #[default]
    PerDispatchedSlot,
    /// `trip_handling_cost / vehicle_capacity` per unit carried; no extra
    /// binaries, exact only for full loads.
    PerLoad,
}

impl HandlingCostPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            HandlingCostPolicy::PerDispatchedSlot => "per-dispatched-slot",
            HandlingCostPolicy::PerLoad => "per-load",
        }
    }
}

impl FromStr for HandlingCostPolicy {
    type Err = PlanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace('_', "-").as_str() {
            "per-dispatched-slot" | "per-slot" | "slot" => {
                Ok(HandlingCostPolicy::PerDispatchedSlot)
            }
            "per-load" | "load" => Ok(HandlingCostPolicy::PerLoad),
            other => Err(PlanError::Configuration(format!(
                "unknown handling-cost policy '{other}'; supported values: per-dispatched-slot, per-load"
            ))),
        }
    }
}

/// Which network shape a run plans over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioVariant {
    /// Supplier → plant by truck
    Direct,
    /// Supplier → hub by truck, hub → plant by train
    Hubbed,
    /// Hubbed, plus a market supplier feeding every hub at a flat price
    HubbedWithExternalMarket,
}

impl ScenarioVariant {
    pub const ALL: [ScenarioVariant; 3] = [
        ScenarioVariant::Direct,
        ScenarioVariant::Hubbed,
        ScenarioVariant::HubbedWithExternalMarket,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioVariant::Direct => "direct",
            ScenarioVariant::Hubbed => "hubbed",
            ScenarioVariant::HubbedWithExternalMarket => "hubbed-with-external-market",
        }
    }

    pub fn uses_transfers(self) -> bool {
        !matches!(self, ScenarioVariant::Direct)
    }

    pub fn uses_external_market(self) -> bool {
        matches!(self, ScenarioVariant::HubbedWithExternalMarket)
    }
}

impl FromStr for ScenarioVariant {
    type Err = PlanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace('_', "-").as_str() {
            "direct" => Ok(ScenarioVariant::Direct),
            "hubbed" => Ok(ScenarioVariant::Hubbed),
            "hubbed-with-external-market" | "external-market" => {
                Ok(ScenarioVariant::HubbedWithExternalMarket)
            }
            other => Err(PlanError::Configuration(format!(
                "unknown scenario variant '{other}'; supported values: direct, hubbed, hubbed-with-external-market"
            ))),
        }
    }
}

impl std::fmt::Display for ScenarioVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constants shared by every site and route of one run.
///
/// Defaults reproduce the reference case study: 500 Mg trucks, 20 000 Mg
/// trains, 300 000 Mg hubs, plants sized for 152 063 705 L of fuel at
/// 232 L/Mg, and a 500 ML production goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanParameters {
    pub truck: ModeParameters,
    pub train: ModeParameters,
    pub transfer_capacity: Megagrams,
    pub transfer_activation_cost: f64,
    /// Plant output capacity, converted to biomass through `fuel_yield`
    pub facility_capacity: Liters,
    pub facility_activation_cost: f64,
    pub fuel_yield: LitersPerMegagram,
    pub production_goal: Liters,
    /// Price per Mg bought from the external market
    pub external_unit_cost: f64,
    pub handling_policy: HandlingCostPolicy,
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self {
            truck: ModeParameters::truck(),
            train: ModeParameters::train(),
            transfer_capacity: Megagrams(300_000.0),
            transfer_activation_cost: 3_476_219.0,
            facility_capacity: Liters(152_063_705.0),
            facility_activation_cost: 130_956_797.0,
            fuel_yield: LitersPerMegagram::default(),
            production_goal: Liters(500_000_000.0),
            external_unit_cost: 2_000.0,
            handling_policy: HandlingCostPolicy::default(),
        }
    }
}

impl PlanParameters {
    pub fn mode(&self, mode: TransportMode) -> &ModeParameters {
        match mode {
            TransportMode::Truck => &self.truck,
            TransportMode::Train => &self.train,
        }
    }

    /// Plant throughput in Mg of biomass
    pub fn facility_capacity_mass(&self) -> Megagrams {
        self.fuel_yield.to_biomass(self.facility_capacity)
    }

    /// Minimum biomass that must reach plants
    pub fn goal_mass(&self) -> Megagrams {
        self.fuel_yield.to_biomass(self.production_goal)
    }

    /// Reject values no model can be built from.
    pub fn validate(&self) -> Result<(), PlanError> {
        let positive = [
            ("truck vehicle capacity", self.truck.vehicle_capacity.value()),
            ("train vehicle capacity", self.train.vehicle_capacity.value()),
            ("transfer capacity", self.transfer_capacity.value()),
            ("facility capacity", self.facility_capacity.value()),
            ("fuel yield", self.fuel_yield.value()),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlanError::Configuration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("truck handling cost", self.truck.trip_handling_cost),
            ("train handling cost", self.train.trip_handling_cost),
            ("transfer activation cost", self.transfer_activation_cost),
            ("facility activation cost", self.facility_activation_cost),
            ("production goal", self.production_goal.value()),
            ("external unit cost", self.external_unit_cost),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlanError::Configuration(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

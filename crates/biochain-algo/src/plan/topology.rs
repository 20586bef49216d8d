//! Scenario topology: which sites and routes a variant may use.

use super::params::{ModeParameters, PlanParameters, ScenarioVariant};
use crate::PlanError;
use biochain_core::data::{ArcRecord, ArcSet, NetworkData};
use biochain_core::Diagnostics;
use biochain_core::{
    BiochainError, Capacity, Route, Site, SiteKey, SiteKind, SupplyNetwork, TransportMode,
};
use tracing::debug;

/// Build the graph one scenario plans over.
///
/// Fails with [`PlanError::Configuration`] when parameters are unusable or
/// when the variant needs an echelon (nodes or arcs) the data does not
/// provide, or when the records themselves are malformed (undefined or
/// negative supply, negative distances or rates, duplicate or dangling arcs).
/// Data for echelons the variant does not use is otherwise ignored.
pub fn build_topology(
    data: &NetworkData,
    params: &PlanParameters,
    variant: ScenarioVariant,
) -> Result<SupplyNetwork, PlanError> {
    params.validate()?;

    require(!data.sources.is_empty(), variant, "suppliers")?;
    require(!data.facilities.is_empty(), variant, "plants")?;
    if variant.uses_transfers() {
        require(!data.transfers.is_empty(), variant, "hubs")?;
    }
    for set in arc_sets(variant) {
        require(!data.arcs(*set).is_empty(), variant, set.as_str())?;
    }
    reject_invalid(data)?;

    let mut network = SupplyNetwork::new();

    for source in &data.sources {
        insert_site(&mut network, Site::source(source.id, source.supply))?;
    }
    if variant.uses_external_market() {
        insert_site(&mut network, Site::external(data.next_source_id()))?;
    }
    if variant.uses_transfers() {
        for transfer in &data.transfers {
            insert_site(
                &mut network,
                Site::new(
                    SiteKey::new(SiteKind::Transfer, transfer.id.value()),
                    Capacity::Finite(params.transfer_capacity),
                    params.transfer_activation_cost,
                ),
            )?;
        }
    }
    for facility in &data.facilities {
        insert_site(
            &mut network,
            Site::new(
                SiteKey::new(SiteKind::Facility, facility.id.value()),
                Capacity::Finite(params.facility_capacity_mass()),
                params.facility_activation_cost,
            ),
        )?;
    }

    for set in arc_sets(variant) {
        let mode = mode_of(*set);
        for arc in data.arcs(*set) {
            insert_route(&mut network, quantized_route(arc, *set, mode, params.mode(mode)))?;
        }
    }

    if variant.uses_external_market() {
        let market = SiteKey {
            kind: SiteKind::ExternalSource,
            id: data.next_source_id(),
        };
        for transfer in &data.transfers {
            insert_route(
                &mut network,
                Route {
                    origin: market,
                    destination: SiteKey::new(SiteKind::Transfer, transfer.id.value()),
                    mode: TransportMode::Truck,
                    unit_cost: params.external_unit_cost,
                    vehicle_capacity: None,
                    trip_handling_cost: 0.0,
                },
            )?;
        }
    }

    let stats = network.stats();
    debug!(
        variant = %variant,
        sources = stats.num_sources,
        transfers = stats.num_transfers,
        facilities = stats.num_facilities,
        routes = stats.num_routes,
        "built scenario topology"
    );

    Ok(network)
}

/// Record everything that would stop `variant` from being formulated, plus
/// a warning when suppliers alone cannot meet the production goal.
pub fn check_inputs(
    data: &NetworkData,
    params: &PlanParameters,
    variant: ScenarioVariant,
    diag: &mut Diagnostics,
) {
    data.validate_into(diag);
    if let Err(err) = params.validate() {
        diag.add_error("parameters", &err.to_string());
    }

    let mut missing = Vec::new();
    if data.sources.is_empty() {
        missing.push("suppliers");
    }
    if data.facilities.is_empty() {
        missing.push("plants");
    }
    if variant.uses_transfers() && data.transfers.is_empty() {
        missing.push("hubs");
    }
    for set in arc_sets(variant) {
        if data.arcs(*set).is_empty() {
            missing.push(set.as_str());
        }
    }
    for what in missing {
        diag.add_error(
            "structure",
            &format!("{variant} scenario needs {what}, but the data has none"),
        );
    }

    let supply = data.total_supply();
    let goal = params.goal_mass();
    if !variant.uses_external_market() && supply < goal {
        diag.add_warning(
            "capacity",
            &format!("Total supply {supply} is below the production goal {goal}"),
        );
    }
}

/// Arc lists a variant draws routes from
pub fn arc_sets(variant: ScenarioVariant) -> &'static [ArcSet] {
    match variant {
        ScenarioVariant::Direct => &[ArcSet::SourceToFacility],
        ScenarioVariant::Hubbed | ScenarioVariant::HubbedWithExternalMarket => {
            &[ArcSet::SourceToTransfer, ArcSet::TransferToFacility]
        }
    }
}

/// Trucks on roads, trains on the hub→plant railroads
pub fn mode_of(set: ArcSet) -> TransportMode {
    match set {
        ArcSet::SourceToFacility | ArcSet::SourceToTransfer => TransportMode::Truck,
        ArcSet::TransferToFacility => TransportMode::Train,
    }
}

fn quantized_route(
    arc: &ArcRecord,
    set: ArcSet,
    mode: TransportMode,
    mode_params: &ModeParameters,
) -> Route {
    let (from_kind, to_kind) = set.endpoints();
    Route {
        origin: SiteKey::new(from_kind, arc.origin.value()),
        destination: SiteKey::new(to_kind, arc.destination.value()),
        mode,
        unit_cost: arc.unit_cost(),
        vehicle_capacity: Some(mode_params.vehicle_capacity),
        trip_handling_cost: mode_params.trip_handling_cost,
    }
}

fn require(present: bool, variant: ScenarioVariant, what: &str) -> Result<(), PlanError> {
    if present {
        Ok(())
    } else {
        Err(PlanError::Configuration(format!(
            "{variant} scenario needs {what}, but the data has none"
        )))
    }
}

fn reject_invalid(data: &NetworkData) -> Result<(), PlanError> {
    let mut diag = Diagnostics::new();
    data.validate_into(&mut diag);
    let result = match diag.errors().next() {
        None => Ok(()),
        Some(first) => Err(PlanError::Configuration(format!(
            "network data has {} (first: {first})",
            diag.summary()
        ))),
    };
    result
}

fn insert_site(network: &mut SupplyNetwork, site: Site) -> Result<(), PlanError> {
    network
        .add_site(site)
        .map(|_| ())
        .map_err(|e| PlanError::Configuration(configuration_message(e)))
}

fn insert_route(network: &mut SupplyNetwork, route: Route) -> Result<(), PlanError> {
    network
        .add_route(route)
        .map(|_| ())
        .map_err(|e| PlanError::Configuration(configuration_message(e)))
}

fn configuration_message(err: BiochainError) -> String {
    match err {
        BiochainError::Configuration(msg) => msg,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biochain_core::SiteId;

    fn hubbed_data() -> NetworkData {
        NetworkData::new()
            .with_source(1, 1000.0)
            .with_source(3, 500.0)
            .with_transfer(1)
            .with_transfer(2)
            .with_facility(1)
            .with_arc(ArcSet::SourceToTransfer, ArcRecord::new(1, 1, 10.0, 1.0))
            .with_arc(ArcSet::SourceToTransfer, ArcRecord::new(3, 2, 10.0, 1.0))
            .with_arc(ArcSet::TransferToFacility, ArcRecord::new(1, 1, 50.0, 0.2))
            .with_arc(ArcSet::TransferToFacility, ArcRecord::new(2, 1, 50.0, 0.2))
            .with_arc(ArcSet::SourceToFacility, ArcRecord::new(1, 1, 30.0, 1.0))
    }

    #[test]
    fn test_direct_ignores_hubs() {
        let network =
            build_topology(&hubbed_data(), &PlanParameters::default(), ScenarioVariant::Direct)
                .unwrap();
        let stats = network.stats();
        assert_eq!(stats.num_transfers, 0);
        assert_eq!(stats.num_routes, 1);
        assert_eq!(stats.num_truck_routes, 1);
    }

    #[test]
    fn test_hubbed_modes() {
        let network =
            build_topology(&hubbed_data(), &PlanParameters::default(), ScenarioVariant::Hubbed)
                .unwrap();
        let stats = network.stats();
        assert_eq!(stats.num_transfers, 2);
        assert_eq!(stats.num_truck_routes, 2);
        assert_eq!(stats.num_train_routes, 2);
        assert!(!stats.has_external_source);
    }

    #[test]
    fn test_external_market_feeds_every_hub() {
        let params = PlanParameters::default();
        let network = build_topology(
            &hubbed_data(),
            &params,
            ScenarioVariant::HubbedWithExternalMarket,
        )
        .unwrap();

        let market = SiteKey {
            kind: SiteKind::ExternalSource,
            id: SiteId::new(4),
        };
        assert_eq!(network.site(&market).map(|s| s.capacity), Some(Capacity::Unbounded));

        let routes = network.routes_from(&market);
        assert_eq!(routes.len(), 2);
        for idx in routes {
            let route = &network.graph[idx];
            assert_eq!(route.unit_cost, params.external_unit_cost);
            assert_eq!(route.vehicle_capacity, None);
            assert_eq!(route.trip_handling_cost, 0.0);
        }
    }

    #[test]
    fn test_hubbed_without_hubs_fails() {
        let data = NetworkData::new()
            .with_source(1, 100.0)
            .with_facility(1)
            .with_arc(ArcSet::SourceToFacility, ArcRecord::new(1, 1, 1.0, 1.0));
        let err = build_topology(&data, &PlanParameters::default(), ScenarioVariant::Hubbed)
            .unwrap_err();
        assert!(matches!(err, PlanError::Configuration(ref m) if m.contains("hubs")));
    }

    #[test]
    fn test_check_inputs_warns_on_short_supply() {
        let mut diag = Diagnostics::new();
        check_inputs(
            &hubbed_data(),
            &PlanParameters::default(),
            ScenarioVariant::Hubbed,
            &mut diag,
        );
        assert!(!diag.has_errors(), "{}", diag);
        assert_eq!(diag.issues_by_category("capacity").count(), 1);

        let mut diag = Diagnostics::new();
        check_inputs(
            &hubbed_data(),
            &PlanParameters::default(),
            ScenarioVariant::HubbedWithExternalMarket,
            &mut diag,
        );
        assert_eq!(diag.issues_by_category("capacity").count(), 0);
    }

    #[test]
    fn test_dangling_arc_fails() {
        let data = hubbed_data()
            .with_arc(ArcSet::TransferToFacility, ArcRecord::new(9, 1, 1.0, 1.0));
        let err = build_topology(&data, &PlanParameters::default(), ScenarioVariant::Hubbed)
            .unwrap_err();
        assert!(matches!(err, PlanError::Configuration(ref m) if m.contains("9->1")));
    }

    #[test]
    fn test_undefined_supply_fails() {
        let data = hubbed_data().with_source(5, f64::NAN);
        let err = build_topology(&data, &PlanParameters::default(), ScenarioVariant::Direct)
            .unwrap_err();
        assert!(matches!(err, PlanError::Configuration(ref m) if m.contains("Source 5")));
    }

    #[test]
    fn test_negative_supply_fails() {
        let data = NetworkData::new()
            .with_source(1, -500.0)
            .with_facility(1)
            .with_arc(ArcSet::SourceToFacility, ArcRecord::new(1, 1, 10.0, 1.0));
        let err = build_topology(&data, &PlanParameters::default(), ScenarioVariant::Direct)
            .unwrap_err();
        assert!(matches!(err, PlanError::Configuration(ref m) if m.contains("non-negative")));
    }

    #[test]
    fn test_negative_distance_and_duplicate_arc_fail() {
        let negative = NetworkData::new()
            .with_source(1, 100.0)
            .with_facility(1)
            .with_arc(ArcSet::SourceToFacility, ArcRecord::new(1, 1, -10.0, 1.0));
        let err = build_topology(&negative, &PlanParameters::default(), ScenarioVariant::Direct)
            .unwrap_err();
        assert!(matches!(err, PlanError::Configuration(ref m) if m.contains("Distance")));

        let duplicated = hubbed_data()
            .with_arc(ArcSet::SourceToTransfer, ArcRecord::new(1, 1, 12.0, 1.0));
        let err = build_topology(&duplicated, &PlanParameters::default(), ScenarioVariant::Hubbed)
            .unwrap_err();
        assert!(matches!(err, PlanError::Configuration(ref m) if m.contains("Duplicate arc")));
    }
}

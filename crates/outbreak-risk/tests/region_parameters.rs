use std::io::Write;
use std::sync::Arc;

use outbreak_risk::risk::{
    parameters::seed_factor_set, FactorValues, InMemoryParameterStore, ProjectionMode,
    RegionCatalog, RegionParametersUpdate, RiskFactor, RiskService, StaticRegionCatalog,
    WeightProfile, STATE_DISTRICTS,
};

fn open(store: Arc<InMemoryParameterStore>) -> RiskService<StaticRegionCatalog, InMemoryParameterStore> {
    RiskService::new(
        Arc::new(StaticRegionCatalog::standard()),
        store,
        WeightProfile::standard(),
        ProjectionMode::Constant,
    )
    .expect("service opens")
}

fn tuned() -> FactorValues {
    FactorValues {
        bat_density: 0.9,
        pig_farming_intensity: 0.1,
        fruit_consumption_practices: 0.2,
        human_population_density: 0.3,
        healthcare_infrastructure: 0.8,
        environmental_degradation: 0.4,
    }
}

#[test]
fn saved_parameters_outlive_the_service() {
    let store = Arc::new(InMemoryParameterStore::default());
    let first = open(store.clone());
    first
        .update_region_parameters(RegionParametersUpdate {
            state: "West Bengal".to_string(),
            district: "Nadia".to_string(),
            parameters: tuned(),
        })
        .expect("update saved");
    drop(first);

    let second = open(store);
    let nadia = second
        .region_parameters("West Bengal", "Nadia")
        .expect("lookup");
    assert_eq!(nadia.get(RiskFactor::BatDensity), 0.9);

    let murshidabad = second
        .region_parameters("West Bengal", "Murshidabad")
        .expect("lookup");
    assert_eq!(
        murshidabad,
        second.region_parameters("West Bengal", "").expect("lookup")
    );
}

#[test]
fn exported_book_imports_into_a_fresh_service() {
    let source = open(Arc::new(InMemoryParameterStore::default()));
    source
        .update_region_parameters(RegionParametersUpdate {
            state: "Kerala".to_string(),
            district: "Kozhikode".to_string(),
            parameters: tuned(),
        })
        .expect("update saved");
    let exported = source.export_region_parameters().expect("export");

    let entries: Vec<serde_json::Value> = serde_json::from_str(&exported).expect("export is a list");
    let target = open(Arc::new(InMemoryParameterStore::default()));
    assert_eq!(
        target.import_region_parameters(&exported).expect("import"),
        entries.len()
    );
    assert_eq!(
        target.region_parameters("Kerala", "Kozhikode").expect("lookup"),
        source.region_parameters("Kerala", "Kozhikode").expect("lookup")
    );
    assert_eq!(
        target.region_parameters("Kerala", "Kozhikode").expect("lookup").get(RiskFactor::BatDensity),
        0.9
    );
}

#[test]
fn every_listed_district_starts_from_its_seed() {
    let service = open(Arc::new(InMemoryParameterStore::default()));
    for (state, districts) in STATE_DISTRICTS {
        assert_eq!(
            service.region_parameters(state, "").expect("lookup"),
            seed_factor_set(state, "")
        );
        for district in *districts {
            assert_eq!(
                service.region_parameters(state, district).expect("lookup"),
                seed_factor_set(state, district),
                "{district}, {state}"
            );
        }
    }
}

#[test]
fn region_catalog_loads_from_a_file() {
    let path = std::env::temp_dir().join(format!(
        "outbreak-risk-catalog-{}.json",
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).expect("temp file created");
    write!(
        file,
        r#"[{{"identifier":"perak","name":"Malaysia (Perak)","baseRiskScore":0.45,
            "center":[4.77,101.04],"coordinates":[[4.3,100.6],[4.3,101.4],[5.2,101.4]]}}]"#
    )
    .expect("catalog written");
    drop(file);

    let catalog = StaticRegionCatalog::from_path(&path).expect("catalog loads");
    std::fs::remove_file(&path).ok();

    assert_eq!(catalog.all().len(), 1);
    let perak = catalog.get_by_identifier("perak").expect("region present");
    assert_eq!(perak.base_risk_score, 0.45);
}

use enaudit::engine::evaluate;
use enaudit::envelope::{conductivity, u_value_of_layers};
use enaudit::measures::MeasureAction;
use enaudit::{
    AuditProject, BuildingUse, CalcConfig, ClassThresholds, ClimateRegistry, ConstructionElement,
    DhwSystem, ElementKind, EnergyClass, EnergyTariffs, Envelope, FactorSet, HeatingSystem,
    Measure, Orientation, ThermalBridge,
};

/// An uninsulated 1970s Slovak family house: 120 m² over one and a half
/// storeys, brick walls, old double glazing, atmospheric gas boiler.
fn family_house_1970s() -> Envelope {
    let mut env = Envelope::new(120.0, 324.0).unwrap();
    env.add_element(ConstructionElement::opaque(
        "external walls",
        ElementKind::Wall,
        145.0,
        u_value_of_layers(&[(0.38, conductivity::BRICK)]),
        Orientation::South,
    ))
    .unwrap();
    env.add_element(ConstructionElement::opaque(
        "roof",
        ElementKind::Roof,
        130.0,
        0.9,
        Orientation::Horizontal,
    ))
    .unwrap();
    env.add_element(ConstructionElement::opaque(
        "ground floor",
        ElementKind::Floor,
        120.0,
        1.1,
        Orientation::Horizontal,
    ))
    .unwrap();
    env.add_element(ConstructionElement::window(
        "south windows",
        14.0,
        2.8,
        Orientation::South,
        0.75,
        0.9,
    ))
    .unwrap();
    env.add_element(ConstructionElement::window(
        "north windows",
        8.0,
        2.8,
        Orientation::North,
        0.75,
        1.0,
    ))
    .unwrap();
    env.add_element(ConstructionElement::opaque(
        "entrance door",
        ElementKind::Door,
        2.0,
        3.0,
        Orientation::North,
    ))
    .unwrap();
    env.add_thermal_bridge(ThermalBridge::new("eaves + plinth", 80.0, 0.15))
        .unwrap();
    env
}

fn project() -> AuditProject {
    AuditProject::new(
        "Rodinný dom, Nitra",
        family_house_1970s(),
        HeatingSystem::gas_boiler(),
        DhwSystem::electric_boiler(),
        "SK-lowland",
        CalcConfig::new(BuildingUse::FamilyHouse),
    )
}

#[test]
fn uninsulated_house_lands_in_a_poor_class() {
    let evaluation = project()
        .evaluate_baseline(
            &ClimateRegistry::slovak_reference(),
            &FactorSet::slovak_2024(),
            &ClassThresholds::slovak_residential(),
        )
        .unwrap();

    // ~1.3-1.6 W/m²K walls plus single-digit glazing push the specific
    // heating need well past 100 kWh/m²a.
    assert!(
        evaluation.balance.specific_heating_kwh_per_m2 > 100.0,
        "Specific heating need {} kWh/m²a is implausibly low for this fabric",
        evaluation.balance.specific_heating_kwh_per_m2
    );
    assert!(
        evaluation.class_result.class >= EnergyClass::D,
        "Expected class D or worse, got {:?}",
        evaluation.class_result.class
    );
}

#[test]
fn monthly_balance_conserves_energy() {
    let evaluation = project()
        .evaluate_baseline(
            &ClimateRegistry::slovak_reference(),
            &FactorSet::slovak_2024(),
            &ClassThresholds::slovak_residential(),
        )
        .unwrap();

    let mut annual = 0.0;
    for month in &evaluation.balance.months {
        let losses = month.total_losses_kwh();
        let gains = month.total_gains_kwh();
        let expected = (losses - month.utilization_factor * gains).max(0.0);
        assert!(
            (month.net_heating_kwh - expected).abs() < 1e-9,
            "Month {} violates the balance: net {} vs expected {}",
            month.month,
            month.net_heating_kwh,
            expected
        );
        assert!(month.net_heating_kwh >= 0.0);
        assert!((0.0..=1.0).contains(&month.utilization_factor));
        annual += month.net_heating_kwh;
    }
    assert!(
        (annual - evaluation.balance.annual_heating_kwh).abs() < 1e-9,
        "Annual need must be the plain sum of the monthly values"
    );
}

#[test]
fn deep_retrofit_improves_the_class() {
    let registry = ClimateRegistry::slovak_reference();
    let factors = FactorSet::slovak_2024();
    let thresholds = ClassThresholds::slovak_residential();

    let baseline = project()
        .evaluate_baseline(&registry, &factors, &thresholds)
        .unwrap();

    let mut env = family_house_1970s();
    let mut heating = HeatingSystem::gas_boiler();
    let mut dhw = DhwSystem::electric_boiler();
    let mut config = CalcConfig::new(BuildingUse::FamilyHouse);
    let retrofit = Measure::new("deep retrofit", 45_000.0, 30)
        .with_action(MeasureAction::AddInsulation {
            element: "external walls".to_string(),
            thickness_m: 0.16,
            conductivity: conductivity::EPS,
        })
        .with_action(MeasureAction::AddInsulation {
            element: "roof".to_string(),
            thickness_m: 0.25,
            conductivity: conductivity::MINERAL_WOOL,
        })
        .with_action(MeasureAction::ImproveElementU {
            element: "south windows".to_string(),
            new_u_value: 0.9,
        })
        .with_action(MeasureAction::ReplaceHeatingSystem {
            system: HeatingSystem::heat_pump(),
        });
    retrofit
        .apply(&mut env, &mut heating, &mut dhw, &mut config)
        .unwrap();

    let zone = registry.lookup("SK-lowland").unwrap();
    let retrofitted = evaluate(&env, &heating, &dhw, zone, &config, &factors, &thresholds).unwrap();

    assert!(
        retrofitted.balance.annual_heating_kwh < 0.5 * baseline.balance.annual_heating_kwh,
        "Deep retrofit should at least halve the heating need: {} vs {}",
        retrofitted.balance.annual_heating_kwh,
        baseline.balance.annual_heating_kwh
    );
    assert!(
        retrofitted.class_result.class < baseline.class_result.class,
        "Class must improve: {:?} vs {:?}",
        retrofitted.class_result.class,
        baseline.class_result.class
    );
}

#[test]
fn measure_prioritization_respects_the_budget() {
    let mut p = project();
    p.add_measure(
        Measure::new("wall insulation 160 mm", 14_000.0, 30).with_action(
            MeasureAction::AddInsulation {
                element: "external walls".to_string(),
                thickness_m: 0.16,
                conductivity: conductivity::EPS,
            },
        ),
    );
    p.add_measure(
        Measure::new("roof insulation 250 mm", 8_000.0, 30).with_action(
            MeasureAction::AddInsulation {
                element: "roof".to_string(),
                thickness_m: 0.25,
                conductivity: conductivity::MINERAL_WOOL,
            },
        ),
    );
    p.add_measure(
        Measure::new("triple glazing", 11_000.0, 30).with_action(
            MeasureAction::ImproveElementU {
                element: "south windows".to_string(),
                new_u_value: 0.9,
            },
        ),
    );

    let matrix = p
        .prioritize_measures(
            &ClimateRegistry::slovak_reference(),
            &FactorSet::slovak_2024(),
            &ClassThresholds::slovak_residential(),
            &EnergyTariffs::slovak_household(),
            Some(23_000.0),
        )
        .unwrap();

    assert!(matrix.selected_investment_eur <= 23_000.0);
    assert!(matrix.selected().count() >= 1);
    assert!(matrix.selected_annual_saving_eur > 0.0);
    // A bigger budget can never do worse.
    let wide = p
        .prioritize_measures(
            &ClimateRegistry::slovak_reference(),
            &FactorSet::slovak_2024(),
            &ClassThresholds::slovak_residential(),
            &EnergyTariffs::slovak_household(),
            Some(50_000.0),
        )
        .unwrap();
    assert!(wide.selected_annual_saving_eur >= matrix.selected_annual_saving_eur);
}

#[test]
fn full_evaluation_is_reproducible() {
    let p = project();
    let registry = ClimateRegistry::slovak_reference();
    let factors = FactorSet::slovak_2024();
    let thresholds = ClassThresholds::slovak_residential();
    let a = p.evaluate_baseline(&registry, &factors, &thresholds).unwrap();
    let b = p.evaluate_baseline(&registry, &factors, &thresholds).unwrap();
    assert_eq!(a, b);
}

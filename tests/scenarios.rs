use deepvein::*;
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn soil_falls_on_the_second_half_second_of_contact() {
    let config = SimConfig::default();
    let mut world = TileWorld::with_terrain(&config);
    let model = TerrainDamageModel::new(&config);
    let c = TileCoord::new(5, 40);

    let first = model.apply_contact_damage(&mut world, c, 500.0);
    assert!(!first.removed);
    assert!(world.has_tile_at(Layer::Soil, c));

    let second = model.apply_contact_damage(&mut world, c, 500.0);
    assert!(second.removed);
    assert!(!world.has_tile_at(Layer::Soil, c));
}

#[test]
fn miner_yields_a_hundred_in_five_seconds() {
    let mut economy = ResourceEconomy::new(&SimConfig::default());
    economy.spawn_miner((0.0, 0.0));
    economy.advance_mining(5000.0);
    assert_eq!(economy.miners()[0].quantity, 50.0);
    assert_eq!(economy.raw_ore, 100.0);
}

#[test]
fn win_fires_on_the_tick_stock_crosses_the_threshold() {
    let mut engine = Engine::new(SimConfig { seed: Some(5), ..SimConfig::default() }).unwrap();
    engine.economy.raw_ore = 999.5;
    engine.economy.spawn_miner((0.0, 0.0));
    assert!(!engine.economy.check_win());

    // 50 ms mines one unit; the full drill sends all processed ore back.
    let report = engine.tick(&TickInput { delta_ms: 50.0, ..TickInput::default() });
    assert!(report.won);
    assert!((engine.economy.raw_ore - 1000.5).abs() < 1e-9);
}

#[test]
fn win_does_not_fire_early() {
    let mut engine = Engine::new(SimConfig { seed: Some(5), ..SimConfig::default() }).unwrap();
    engine.economy.raw_ore = 999.5;
    engine.economy.spawn_miner((0.0, 0.0));
    // 20 ms mines 0.4: still short.
    let report = engine.tick(&TickInput { delta_ms: 20.0, ..TickInput::default() });
    assert!(!report.won);
    assert!(!engine.is_won());
}

#[test]
fn guaranteed_ore_on_row_29_for_every_seed() {
    let config = SimConfig::default();
    for seed in 0..200 {
        let mut world = TileWorld::with_terrain(&config);
        let mut rng = StdRng::seed_from_u64(seed);
        OreSeeder::new(&config).seed(&mut world, &mut rng);
        let on_row: Vec<_> = world
            .tiles(Layer::Ore)
            .filter(|(c, _)| c.y == 29)
            .map(|(c, _)| c.x)
            .collect();
        assert_eq!(on_row.len(), 1, "seed {seed}");
        let x = on_row[0];
        assert!(x <= 14 || x >= 17, "seed {seed}: x = {x}");
    }
}

#[test]
fn drained_drill_stops_and_recharges_from_ore() {
    let mut engine = Engine::new(SimConfig { seed: Some(9), ..SimConfig::default() }).unwrap();
    engine.drill.power.energy = 0.0;
    let (cx, _) = engine.world.tile_center(TileCoord::new(16, 28));
    let body = Body::new(cx - 12.0, 28.0 * 24.0 - 24.0, 24.0, 24.0);
    let grind = TickInput {
        delta_ms: 1000.0,
        drill: Some(DrillContact { body, grounded: true }),
        ..TickInput::default()
    };

    let report = engine.tick(&grind);
    assert!(report.soil_destroyed.is_empty());
    assert_eq!(
        engine.world.get_tile(Layer::Soil, TileCoord::new(16, 28)).unwrap().health(),
        Some(100.0)
    );

    engine.economy.raw_ore = 20.0;
    let report = engine.tick(&TickInput { delta_ms: 1000.0, ..TickInput::default() });
    assert_eq!(report.processing.absorbed, 10.0);
    assert_eq!(engine.drill.energy(), 10.0);
    assert_eq!(engine.economy.raw_ore, 10.0);

    // 400 ms deals 40 damage for 5 energy, then processing tops up 4.
    let report = engine.tick(&TickInput { delta_ms: 400.0, ..grind });
    assert!(report.soil_destroyed.is_empty());
    assert_eq!(
        engine.world.get_tile(Layer::Soil, TileCoord::new(16, 28)).unwrap().health(),
        Some(60.0)
    );
    assert_eq!(engine.drill.energy(), 9.0);
    assert_eq!(engine.economy.raw_ore, 6.0);
}

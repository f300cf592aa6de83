/// Growth-completion math: always recomputed from the stored epoch, never
/// accumulated, so every peer computing at the same wall-clock instant
/// agrees.
use verdant_peer::{PlantDefinition, PlantableEntity};
use verdant_peer::shared::{EntityId, EntityTypeId, Phase};

fn definition(grow_duration_seconds: f32) -> PlantDefinition {
    PlantDefinition {
        type_id: EntityTypeId::from("carrot"),
        display_name: "Carrot".to_string(),
        grow_duration_seconds,
        max_scale: 2.0,
        scale_multiplier: 1.0,
        buy_price: 5,
        sell_value: 12,
    }
}

fn planted_at(t0: i64, grow_duration_seconds: f32) -> PlantableEntity {
    let mut entity = PlantableEntity::new(EntityId(1), &definition(grow_duration_seconds));
    entity.on_claimed();
    entity.plant(t0);
    entity
}

#[test]
fn test_completion_hits_half_way_and_saturates() {
    let t0 = 1_700_000_000;
    let mut entity = planted_at(t0, 100.0);

    assert_eq!(entity.growth_completion(t0), 0.0);
    assert!((entity.growth_completion(t0 + 50) - 0.5).abs() < 1e-6);
    assert_eq!(entity.growth_completion(t0 + 150), 1.0);

    entity.tick(t0 + 150);
    assert_eq!(entity.phase, Phase::Harvestable);
}

#[test]
fn test_completion_is_monotonically_non_decreasing() {
    let t0 = 1_700_000_000;
    let entity = planted_at(t0, 100.0);

    let mut previous = 0.0;
    for offset in 0..200 {
        let completion = entity.growth_completion(t0 + offset);
        assert!(completion >= previous);
        previous = completion;
    }
    assert_eq!(previous, 1.0);
}

#[test]
fn test_two_peers_agree_from_the_same_epoch() {
    let t0 = 1_700_000_000;
    // the second peer never saw the planting; it loads the epoch later
    let owner = planted_at(t0, 100.0);
    let mut late_joiner = PlantableEntity::new(EntityId(1), &definition(100.0));
    late_joiner.on_claimed();
    late_joiner.load(t0, t0 + 75);

    let now = t0 + 75;
    assert!((owner.growth_completion(now) - late_joiner.growth_completion(now)).abs() < 1e-6);
}

#[test]
fn test_clock_behind_the_epoch_clamps_to_zero() {
    let t0 = 1_700_000_000;
    let entity = planted_at(t0, 100.0);
    assert_eq!(entity.growth_completion(t0 - 500), 0.0);
}

#[test]
fn test_non_positive_duration_never_completes() {
    let t0 = 1_700_000_000;
    for duration in [0.0, -5.0] {
        let mut entity = planted_at(t0, duration);
        assert_eq!(entity.growth_completion(t0 + 1_000_000), 0.0);
        assert!(!entity.tick(t0 + 1_000_000));
        // the accepted misconfiguration: stuck in Growing, not a crash
        assert_eq!(entity.phase, Phase::Growing);
    }
}

#[test]
fn test_scale_tracks_completion() {
    let t0 = 1_700_000_000;
    let mut entity = planted_at(t0, 100.0);

    entity.tick(t0 + 50);
    // completion 0.5 * max_scale 2.0 * multiplier 1.0
    assert!((entity.scale - 1.0).abs() < 1e-6);

    entity.tick(t0 + 100);
    assert!((entity.scale - 2.0).abs() < 1e-6);
}

#[test]
fn test_enable_edge_fires_exactly_once() {
    let t0 = 1_700_000_000;
    let mut entity = planted_at(t0, 100.0);

    assert!(!entity.tick(t0 + 99));
    assert!(entity.tick(t0 + 100));
    // edge already consumed; later ticks stay quiet
    assert!(!entity.tick(t0 + 101));
    assert!(!entity.tick(t0 + 500));
}

#[test]
fn test_scale_override_replaces_max_scale_at_planting() {
    let t0 = 1_700_000_000;
    let mut entity = PlantableEntity::new(EntityId(1), &definition(100.0));
    entity.on_claimed();
    entity.scale_override = 3.5;
    entity.plant(t0);

    entity.tick(t0 + 100);
    assert!((entity.scale - 3.5).abs() < 1e-6);

    // restore puts the definition's parameters back
    entity.restore();
    assert_eq!(entity.max_scale, 2.0);
    assert_eq!(entity.scale_override, 0.0);
}

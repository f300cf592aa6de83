/// Integration tests for Pool and PoolManager error handling
///
/// Empty-pool claims are an expected, recoverable condition; returns are
/// idempotent and always restore the same canonical state that pool
/// initialization produces.
use verdant_peer::{PlantDefinition, PlantableEntity, Pool, PoolManager};
use verdant_peer::shared::{EntityId, EntityTypeId, Phase};

fn carrot_definition() -> PlantDefinition {
    PlantDefinition {
        type_id: EntityTypeId::from("carrot"),
        display_name: "Carrot".to_string(),
        grow_duration_seconds: 100.0,
        max_scale: 1.5,
        scale_multiplier: 1.0,
        buy_price: 5,
        sell_value: 12,
    }
}

fn carrot(id: u32) -> PlantableEntity {
    PlantableEntity::new(EntityId(id), &carrot_definition())
}

#[test]
fn test_claim_from_empty_pool_returns_none() {
    let mut pool = Pool::new(EntityTypeId::from("carrot"));
    assert_eq!(pool.available(), 0);
    assert!(pool.claim().is_none());
    assert_eq!(pool.available(), 0);
}

#[test]
fn test_claim_transitions_pooled_to_seed() {
    let mut pool = Pool::new(EntityTypeId::from("carrot"));
    pool.insert(carrot(1));

    let entity = pool.claim().expect("pool holds one entity");
    assert_eq!(entity.phase, Phase::Seed);
    assert!(entity.seed_visible);
    assert!(!entity.plant_visible);
    assert_eq!(entity.planted_epoch_seconds, 0);
    assert_eq!(pool.available(), 0);
}

#[test]
fn test_return_restores_canonical_pooled_state_from_any_phase() {
    let mut pool = Pool::new(EntityTypeId::from("carrot"));
    pool.insert(carrot(1));

    let mut entity = pool.claim().expect("pool holds one entity");
    entity.plant(1_000);
    entity.tick(2_000);
    assert_eq!(entity.phase, Phase::Harvestable);

    pool.return_entity(entity);
    assert_eq!(pool.available(), 1);

    let entity = pool.claim().expect("entity is back");
    assert_eq!(entity.phase, Phase::Seed);
    assert_eq!(entity.planted_epoch_seconds, 0);
    assert_eq!(entity.scale, 0.0);
    assert_eq!(entity.parent_slot, None);
}

#[test]
fn test_double_return_is_idempotent() {
    let mut pool = Pool::new(EntityTypeId::from("carrot"));
    pool.insert(carrot(1));
    let entity = pool.claim().expect("pool holds one entity");

    pool.return_entity(entity.clone());
    // a second return of the same entity re-applies defaults, nothing more
    pool.return_entity(entity);
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_cycled_pool_is_indistinguishable_from_a_fresh_one() {
    let mut fresh = Pool::new(EntityTypeId::from("carrot"));
    fresh.insert(carrot(1));

    let mut cycled = Pool::new(EntityTypeId::from("carrot"));
    cycled.insert(carrot(1));
    for round in 0..3 {
        let mut entity = cycled.claim().expect("entity present");
        entity.plant(round * 500);
        entity.tick(round * 500 + 50);
        cycled.return_entity(entity);
    }

    assert_eq!(fresh.claim(), cycled.claim());
}

#[test]
fn test_claim_specific_pulls_by_id() {
    let mut pool = Pool::new(EntityTypeId::from("carrot"));
    pool.insert(carrot(1));
    pool.insert(carrot(2));
    pool.insert(carrot(3));

    let entity = pool.claim_specific(EntityId(2)).expect("id 2 is pooled");
    assert_eq!(entity.id, EntityId(2));
    assert_eq!(pool.available(), 2);
    assert!(pool.claim_specific(EntityId(2)).is_none());
}

#[test]
fn test_manager_claim_for_unknown_type_returns_none() {
    let mut manager = PoolManager::new();
    assert!(manager.claim(&EntityTypeId::from("kale")).is_none());
    assert_eq!(manager.available(&EntityTypeId::from("kale")), 0);
}

#[test]
fn test_manager_fans_out_by_type_id() {
    let mut manager = PoolManager::new();
    let carrot_id = EntityTypeId::from("carrot");
    manager.ensure_pool(&carrot_id).insert(carrot(1));
    manager.ensure_pool(&carrot_id).insert(carrot(2));

    assert_eq!(manager.available(&carrot_id), 2);
    let entity = manager.claim(&carrot_id).expect("carrots available");
    assert_eq!(manager.available(&carrot_id), 1);
    manager.return_entity(&carrot_id, entity);
    assert_eq!(manager.available(&carrot_id), 2);
}

#[test]
fn test_manager_claim_by_id_searches_every_pool() {
    let mut manager = PoolManager::new();
    let carrot_id = EntityTypeId::from("carrot");
    manager.ensure_pool(&carrot_id).insert(carrot(7));

    let entity = manager.claim_by_id(EntityId(7)).expect("id 7 is pooled");
    assert_eq!(entity.id, EntityId(7));
    assert!(manager.claim_by_id(EntityId(7)).is_none());
}

/// Slot reconciliation: the proximity observation and the `Planted`
/// broadcast can arrive in either order, and the merge must come out the
/// same both ways. Late joiners get a point-to-point state sync instead of
/// the broadcast they missed.
use verdant_peer::shared::{
    EntityId, EntityTypeId, Envelope, GardenMessage, MessageTarget, PeerId, PeerRole, Phase,
    PlantConfig, SlotId,
};
use verdant_peer::{
    DefinitionSet, GardenPeer, PlantDefinition, TriggerEvent, TriggerKind, TriggerRegion,
};

const T0: i64 = 1_700_000_000;

fn definitions() -> DefinitionSet {
    let mut set = DefinitionSet::new();
    set.insert(PlantDefinition {
        type_id: EntityTypeId::from("carrot"),
        display_name: "Carrot".to_string(),
        grow_duration_seconds: 100.0,
        max_scale: 2.0,
        scale_multiplier: 1.0,
        buy_price: 5,
        sell_value: 12,
    });
    set
}

/// A participant peer with one slot and one pooled carrot, as every peer
/// starts from static placement.
fn observer_peer() -> GardenPeer {
    let mut peer = GardenPeer::new(PeerId(2), PeerRole::Participant, definitions(), 0);
    peer.register_slot(SlotId(10), [1.0, 0.0, 3.0]);
    peer.spawn_pool_entity(&EntityTypeId::from("carrot"), EntityId(1));
    peer
}

fn planted_envelope() -> Envelope {
    Envelope::new(
        MessageTarget::Slot(SlotId(10)),
        GardenMessage::Planted(PlantConfig {
            type_id: EntityTypeId::from("carrot"),
            planted_epoch_seconds: T0,
            grow_duration_seconds: 100.0,
            max_scale: 2.0,
            scale_multiplier: 1.0,
        }),
    )
}

fn proximity_enter() -> TriggerEvent {
    TriggerEvent {
        region: TriggerRegion::Slot(SlotId(10)),
        entity: EntityId(1),
        kind: TriggerKind::Enter,
    }
}

#[test]
fn test_message_then_event_merges_once() {
    let mut peer = observer_peer();

    peer.handle_message(PeerId(1), planted_envelope(), T0 + 5);
    // config cached, occupant not yet observed: visuals stay default
    let slot = peer.slot(SlotId(10)).expect("slot registered");
    assert!(slot.occupied);
    assert_eq!(slot.occupant, None);
    assert!(slot.pending_config.is_some());

    peer.handle_trigger(proximity_enter(), T0 + 5);
    let slot = peer.slot(SlotId(10)).expect("slot registered");
    assert_eq!(slot.occupant, Some(EntityId(1)));
    assert!(slot.pending_config.is_none());

    let entity = peer.entity(EntityId(1)).expect("entity active after merge");
    assert_eq!(entity.phase, Phase::Growing);
    assert_eq!(entity.planted_epoch_seconds, T0);
    assert_eq!(entity.parent_slot, Some(SlotId(10)));
}

#[test]
fn test_event_then_message_merges_once() {
    let mut peer = observer_peer();

    peer.handle_trigger(proximity_enter(), T0 + 5);
    // observed but unconfigured: occupancy not yet announced
    let slot = peer.slot(SlotId(10)).expect("slot registered");
    assert_eq!(slot.occupant, Some(EntityId(1)));
    assert!(!slot.occupied);
    assert!(slot.pending_config.is_none());

    peer.handle_message(PeerId(1), planted_envelope(), T0 + 5);
    let entity = peer.entity(EntityId(1)).expect("entity active after merge");
    assert_eq!(entity.phase, Phase::Growing);
    assert_eq!(entity.planted_epoch_seconds, T0);
}

#[test]
fn test_merge_is_commutative() {
    let mut message_first = observer_peer();
    message_first.handle_message(PeerId(1), planted_envelope(), T0 + 5);
    message_first.handle_trigger(proximity_enter(), T0 + 5);

    let mut event_first = observer_peer();
    event_first.handle_trigger(proximity_enter(), T0 + 5);
    event_first.handle_message(PeerId(1), planted_envelope(), T0 + 5);

    assert_eq!(
        message_first.slot(SlotId(10)),
        event_first.slot(SlotId(10))
    );
    assert_eq!(
        message_first.entity(EntityId(1)),
        event_first.entity(EntityId(1))
    );
}

#[test]
fn test_merge_pulls_the_entity_out_of_the_local_pool() {
    let mut peer = observer_peer();
    let carrot_id = EntityTypeId::from("carrot");
    assert_eq!(peer.pool_available(&carrot_id), 1);

    peer.handle_message(PeerId(1), planted_envelope(), T0 + 5);
    peer.handle_trigger(proximity_enter(), T0 + 5);

    // pool membership reconciled purely from the broadcast
    assert_eq!(peer.pool_available(&carrot_id), 0);
}

#[test]
fn test_authoritative_planting_broadcasts_the_config() {
    let mut controller = GardenPeer::new(PeerId(1), PeerRole::Controller, definitions(), 0);
    controller.register_slot(SlotId(10), [1.0, 0.0, 3.0]);
    controller.spawn_pool_entity(&EntityTypeId::from("carrot"), EntityId(1));
    let entity_id = controller
        .claim(&EntityTypeId::from("carrot"))
        .expect("pool has a carrot");

    controller.handle_trigger(proximity_enter(), T0);

    let entity = controller.entity(entity_id).expect("entity active");
    assert_eq!(entity.phase, Phase::Growing);
    assert_eq!(entity.planted_epoch_seconds, T0);

    let outgoing = controller.drain_outgoing();
    let planted = outgoing
        .iter()
        .find(|(_, envelope)| matches!(envelope.message, GardenMessage::Planted(_)))
        .expect("planted broadcast queued");
    let GardenMessage::Planted(ref config) = planted.1.message else {
        unreachable!();
    };
    assert_eq!(config.planted_epoch_seconds, T0);
    assert_eq!(config.type_id, EntityTypeId::from("carrot"));
    assert!(outgoing
        .iter()
        .any(|(_, envelope)| envelope.message == GardenMessage::Disable));
}

#[test]
fn test_occupied_slot_rejects_a_second_planting() {
    let mut controller = GardenPeer::new(PeerId(1), PeerRole::Controller, definitions(), 0);
    controller.register_slot(SlotId(10), [0.0; 3]);
    controller.spawn_pool_entity(&EntityTypeId::from("carrot"), EntityId(1));
    controller.spawn_pool_entity(&EntityTypeId::from("carrot"), EntityId(2));
    let first = controller.claim(&EntityTypeId::from("carrot")).expect("one");
    let second = controller.claim(&EntityTypeId::from("carrot")).expect("two");

    controller.handle_trigger(proximity_enter(), T0);
    controller.handle_trigger(
        TriggerEvent {
            region: TriggerRegion::Slot(SlotId(10)),
            entity: second,
            kind: TriggerKind::Enter,
        },
        T0 + 1,
    );

    let slot = controller.slot(SlotId(10)).expect("slot registered");
    assert_eq!(slot.occupant, Some(first));
    let second_entity = controller.entity(second).expect("still active");
    assert_eq!(second_entity.phase, Phase::Seed);
}

#[test]
fn test_late_joiner_state_sync_yields_mid_growth_visuals() {
    // owner has been growing a carrot since T0
    let mut owner = GardenPeer::new(PeerId(1), PeerRole::Controller, definitions(), 0);
    owner.register_slot(SlotId(10), [0.0; 3]);
    owner.spawn_pool_entity(&EntityTypeId::from("carrot"), EntityId(1));
    owner.claim(&EntityTypeId::from("carrot"));
    owner.handle_trigger(proximity_enter(), T0);
    owner.drain_outgoing();

    // a peer joins at T0+60; the owner sends state sync point-to-point
    owner.on_peer_joined(PeerId(3), "p-3", "Chen");
    let outgoing = owner.drain_outgoing();
    let (recipient, envelope) = outgoing
        .iter()
        .find(|(_, envelope)| matches!(envelope.message, GardenMessage::StateSync { .. }))
        .expect("state sync queued for the joiner");
    assert_eq!(
        *recipient,
        verdant_peer::shared::Recipient::Peer(PeerId(3))
    );

    let mut joiner = observer_peer();
    joiner.handle_message(PeerId(1), envelope.clone(), T0 + 60);

    let entity = joiner.entity(EntityId(1)).expect("entity active on joiner");
    assert_eq!(entity.phase, Phase::Growing);
    assert_eq!(entity.planted_epoch_seconds, T0);
    // completion 0.6 * max_scale 2.0
    assert!((entity.scale - 1.2).abs() < 1e-5);
    assert_eq!(
        joiner
            .growth_completion(EntityId(1), T0 + 60)
            .expect("active"),
        0.6
    );
}

#[test]
fn test_owner_exit_clears_and_broadcasts_lockstep_release() {
    let mut owner = GardenPeer::new(PeerId(1), PeerRole::Controller, definitions(), 0);
    owner.register_slot(SlotId(10), [0.0; 3]);
    owner.spawn_pool_entity(&EntityTypeId::from("carrot"), EntityId(1));
    owner.claim(&EntityTypeId::from("carrot"));
    owner.handle_trigger(proximity_enter(), T0);
    owner.drain_outgoing();

    owner.handle_trigger(
        TriggerEvent {
            region: TriggerRegion::Slot(SlotId(10)),
            entity: EntityId(1),
            kind: TriggerKind::Exit,
        },
        T0 + 10,
    );

    let slot = owner.slot(SlotId(10)).expect("slot registered");
    assert!(!slot.occupied);
    assert_eq!(slot.occupant, None);

    let outgoing = owner.drain_outgoing();
    assert!(outgoing
        .iter()
        .any(|(_, envelope)| envelope.target == MessageTarget::Slot(SlotId(10))
            && envelope.message == GardenMessage::Harvested));

    // a proxy that receives the notice releases its slot too
    let mut proxy = observer_peer();
    proxy.handle_message(PeerId(1), planted_envelope(), T0);
    proxy.handle_message(
        PeerId(1),
        Envelope::new(MessageTarget::Slot(SlotId(10)), GardenMessage::Harvested),
        T0 + 10,
    );
    let slot = proxy.slot(SlotId(10)).expect("slot registered");
    assert!(!slot.occupied);
    assert!(slot.pending_config.is_none());
}

#[test]
fn test_non_authoritative_observation_does_not_plant() {
    let mut peer = observer_peer();
    // no message yet; observing alone must not start growth
    peer.handle_trigger(proximity_enter(), T0);
    // entity still pooled locally, visuals default
    assert_eq!(peer.pool_available(&EntityTypeId::from("carrot")), 1);
    assert!(peer.entity(EntityId(1)).is_none());
    assert!(peer.drain_outgoing().is_empty());
}

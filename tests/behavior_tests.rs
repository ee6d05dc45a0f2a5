//! End-to-end behavior tests: archetype tags through template expansion,
//! graph walking, event scheduling, and gated dispatch.

use tileflow::{
    apply_default_behaviors, compile, ActionKind, BehaviorConfig, ConditionKind, Flows, GameEvent,
    GameEventKind, GameEvents, GameItem, GameRules, ItemId, ItemKind, ItemProps, ItemState, Level,
    NodeKind, Tag, TagStore, TargetValue, TriggerKind,
};

/// Tagging item 42 evil (Biped, speed 20) synthesizes the near-attack
/// chain with interval round10(3 - 20/50) = 2.6.
#[test]
fn test_evil_tag_expansion() {
    let mut level = Level::new();
    level.add_item(
        GameItem::new(ItemId(42), ItemKind::Biped).with_props(ItemProps::new().with_speed(20)),
    );
    let mut tags = TagStore::new();
    tags.link(ItemId(42), Tag::EVIL);

    let mut flows = Flows::new();
    apply_default_behaviors(&mut level, &tags, &mut flows, &BehaviorConfig::new());

    // Exactly one near trigger for the item.
    let near: Vec<_> = flows
        .triggers_by_type(TriggerKind::Near)
        .iter()
        .filter_map(|&id| flows.node(id))
        .filter(|node| node.owner == Some(ItemId(42)))
        .collect();
    assert_eq!(near.len(), 1);

    // Chained: condition(bTagged player) -> action(attackB) -> wait 0.5
    // -> wait 2.6.
    let condition = flows.children_by_node(near[0].id, None)[0];
    assert_eq!(condition.condition_kind(), Some(ConditionKind::BTagged));

    let action = flows.children_by_node(condition.id, Some(true))[0];
    assert_eq!(action.action_kind(), Some(ActionKind::AttackB));

    let wait_windup = flows.children_by_node(action.id, None)[0];
    let wait_interval = flows.children_by_node(wait_windup.id, None)[0];
    assert_eq!(wait_windup.kind, NodeKind::Wait);
    assert_eq!(wait_windup.target.as_number(), 0.5);
    assert_eq!(wait_interval.target.as_number(), 2.6);
}

/// The full loop: expand defaults, walk the graph like the game loop
/// would, gate the action, schedule the event, step the queue, observe
/// the broadcast.
#[test]
fn test_tag_to_dispatch_pipeline() {
    let mut level = Level::new();
    level.add_item(
        GameItem::new(ItemId(42), ItemKind::Biped).with_props(ItemProps::new().with_speed(20)),
    );
    level.add_item(GameItem::new(ItemId::PLAYER, ItemKind::Biped));

    let mut tags = TagStore::new();
    tags.link(ItemId(42), Tag::EVIL);

    let mut flows = Flows::new();
    apply_default_behaviors(&mut level, &tags, &mut flows, &BehaviorConfig::new());

    let mut events = GameEvents::new();
    let rx = events.subscribe();

    // The simulation reports the player near item 42; the game loop walks
    // the item's near triggers.
    for &trigger_id in flows.triggers_by_item(ItemId(42)) {
        let trigger = flows.node(trigger_id).unwrap();
        if trigger.trigger_kind() != Some(TriggerKind::Near) {
            continue;
        }

        for condition in flows.children_by_node(trigger_id, None) {
            // bTagged player: does the B operand carry the player tag?
            assert_eq!(condition.condition_kind(), Some(ConditionKind::BTagged));
            if !tags.item_has_tag(ItemId::PLAYER, condition.target.as_tag()) {
                continue;
            }

            for action in flows.children_by_node(condition.id, Some(true)) {
                let kind = action.action_kind().unwrap();
                let source = level.item(ItemId(42));
                let target = level.item(ItemId::PLAYER);
                assert!(GameRules::allow_action(kind, source, target));

                // The game starts the swing and schedules the hit.
                if let Some(item) = level.item_mut(ItemId(42)) {
                    item.state = ItemState::Attacking;
                }
                events.add_event(
                    GameEventKind::Attack,
                    Some(ItemId(42)),
                    Some(ItemId::PLAYER),
                    0,
                    TargetValue::None,
                );
            }
        }
    }

    assert_eq!(events.pending(), 1);
    events.step(&level);

    let dispatched: Vec<GameEvent> = rx.try_iter().collect();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].kind, GameEventKind::Attack);
    assert_eq!(dispatched[0].source, Some(ItemId(42)));
    assert_eq!(dispatched[0].target, Some(ItemId::PLAYER));

    // And the default combat rule agrees: evil source, player target.
    assert!(GameRules::allow_default(&dispatched[0], &level, &tags));
}

/// The whole default-behavior store survives a save/load round trip.
#[test]
fn test_defaults_survive_round_trip() {
    let mut level = Level::new();
    for id in 1..=3 {
        level.add_item(
            GameItem::new(ItemId(id), ItemKind::Biped).with_props(ItemProps::new().with_speed(10)),
        );
    }
    let mut tags = TagStore::new();
    tags.link(ItemId(1), Tag::EVIL);
    tags.link(ItemId(2), Tag::POWERUP);
    tags.link(ItemId(3), Tag::KEY);

    let mut flows = Flows::new();
    apply_default_behaviors(&mut level, &tags, &mut flows, &BehaviorConfig::new());

    let restored = Flows::with_data(&flows.serialize());
    assert_eq!(restored.len(), flows.len());
    for id in 1..=3 {
        let item = ItemId(id);
        assert_eq!(restored.triggers_by_item(item), flows.triggers_by_item(item));
    }

    // Tag store round trip too.
    let tags_restored = TagStore::with_data(&tags.serialize());
    for id in 1..=3 {
        assert_eq!(
            tags_restored.special_tag_for_item(ItemId(id)),
            tags.special_tag_for_item(ItemId(id))
        );
    }
}

/// Hand-written statements and expanded defaults coexist in one store.
#[test]
fn test_defaults_mix_with_authored_flows() {
    let mut level = Level::new();
    level.add_item(GameItem::new(ItemId(1), ItemKind::Biped));
    let mut tags = TagStore::new();
    tags.link(ItemId(1), Tag::EVIL);

    let mut flows = Flows::new();
    compile(
        "ON healthChanged THEN DO showText \"ouch\"",
        &mut flows,
        true,
        Some(ItemId(1)),
    );
    apply_default_behaviors(&mut level, &tags, &mut flows, &BehaviorConfig::new());

    assert!(flows.item_has_trigger_of(ItemId(1), TriggerKind::HealthChanged));
    assert!(flows.item_has_trigger_of(ItemId(1), TriggerKind::Near));
    // 1 authored + 5 default biped triggers.
    assert_eq!(flows.triggers_by_item(ItemId(1)).len(), 6);
}

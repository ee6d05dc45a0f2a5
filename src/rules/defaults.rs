//! Default behaviors for archetype-tagged items.
//!
//! A designer tags an item "evil" or "powerup" and gets a working enemy or
//! pickup without writing a single statement: this pass walks the archetype
//! tag range once per level load, synthesizes the matching DSL, and
//! compiles it into the flow store under the item's id. Template expansion,
//! not interpretation — after this runs, the items are indistinguishable
//! from hand-scripted ones.

use crate::core::{BehaviorConfig, ItemKind, Level};
use crate::flows::node::format_number;
use crate::flows::{compile, Flows};
use crate::tags::{Tag, TagStore};

/// Expand default behaviors for every item in the archetype tag range
/// (weapon up to, but not including, good).
///
/// Runs once per level load. Items flagged evil get their `evil` marker set
/// on the level model so the combat rules can see it.
pub fn apply_default_behaviors(
    level: &mut Level,
    tags: &TagStore,
    flows: &mut Flows,
    config: &BehaviorConfig,
) {
    for raw in Tag::WEAPON.raw()..Tag::GOOD.raw() {
        let tag = Tag(raw);
        // Clone the id list: compilation below needs the stores mutable.
        let item_ids: Vec<_> = tags.items_by_tag(tag).to_vec();

        for item_id in item_ids {
            let Some(item) = level.item(item_id) else {
                continue;
            };
            let kind = item.kind;
            let props = item.props;
            let add = |statement: &str, flows: &mut Flows| {
                compile(statement, flows, true, Some(item_id));
            };

            match tag {
                Tag::EVIL => {
                    let interval = format_number(config.attack_interval(props.speed));
                    let windup = format_number(config.attack_windup);

                    match kind {
                        ItemKind::Biped => {
                            add("ON see THEN IF bTagged player THEN DO followB", flows);
                            add(
                                &format!(
                                    "ON near THEN IF bTagged player THEN DO attackB THEN WAIT {windup} THEN WAIT {interval}"
                                ),
                                flows,
                            );
                            add(
                                &format!(
                                    "ON collision THEN IF bTagged player THEN DO attackB THEN WAIT {windup} THEN WAIT {interval}"
                                ),
                                flows,
                            );
                            add("ON rangeOut THEN IF followingB THEN DO unfollow", flows);
                            add("ON attackStart THEN DO defend", flows);
                        }
                        ItemKind::Item => {
                            add("ON see THEN IF bTagged player THEN DO followB", flows);
                            add("ON rangeOut THEN IF followingB THEN DO unfollow", flows);
                            add(
                                &format!(
                                    "ON near THEN IF bTagged player THEN DO GOTO 2 THEN DO attackB THEN WAIT {windup} THEN DO GOTO 1 THEN WAIT {interval}"
                                ),
                                flows,
                            );
                        }
                        _ => {}
                    }

                    if let Some(item) = level.item_mut(item_id) {
                        item.evil = true;
                    }
                }

                Tag::POWERUP => {
                    let delta_health = props.health;
                    let delta_score = props.score;

                    add(
                        &format!(
                            "ON collision IF bTagged player THEN WITH B THEN DO changeHealth {delta_health}"
                        ),
                        flows,
                    );
                    add(
                        &format!(
                            "ON collision IF bTagged player THEN DO changeScore {delta_score}"
                        ),
                        flows,
                    );
                    add("ON collision IF bTagged player THEN DO selfDestruct", flows);
                }

                Tag::KEY | Tag::WEAPON | Tag::ARMOR => {
                    add("ON selected THEN DO selfDestruct", flows);
                    add("ON pickedUp THEN DO selfDestruct", flows);
                }

                Tag::HAZARD => match kind {
                    ItemKind::Liquid => {
                        let amount = match props.liquid_kind {
                            1 => Some(config.liquid_damage_mild),
                            2 => Some(config.liquid_damage_harsh),
                            _ => None,
                        };
                        if let Some(amount) = amount {
                            let cooldown = format_number(config.hazard_cooldown);
                            add(
                                &format!(
                                    "ON collision WITH B THEN DO changeHealth -{amount} THEN WAIT {cooldown}"
                                ),
                                flows,
                            );
                        }
                    }
                    ItemKind::Wall => {
                        let amount = config.hazard_wall_damage;
                        let cooldown = format_number(config.hazard_cooldown);
                        add(
                            &format!(
                                "ON steppedOn IF bTagged player THEN WITH B DO changeHealth -{amount} THEN WAIT {cooldown}"
                            ),
                            flows,
                        );
                    }
                    _ => {}
                },

                _ => {}
            }
        }
    }
}

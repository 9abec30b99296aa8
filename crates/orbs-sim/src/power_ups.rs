//! Power-up effects on players.

use hecs::{Entity, World};

use orbs_core::components::{EffectSet, Player};
use orbs_core::constants::*;
use orbs_core::enums::PowerUpKind;

use crate::context::SimContext;
use crate::timers::{TimerAction, TimerKey};
use crate::world_setup;

/// Apply a collected power-up to a player.
///
/// Temporary kinds schedule their own expiry. Picking one up again while it
/// is active reverts the pending modifier first, so it never stacks.
pub fn apply(world: &mut World, ctx: &mut SimContext, player: Entity, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Healing => {
            if let Ok(mut p) = world.get::<&mut Player>(player) {
                p.health += HEALING_AMOUNT;
                if p.health > p.max_health {
                    p.max_health = p.health;
                }
                let radius = p.radius();
                p.position = ctx.area.clamp_inside(p.position, radius);
            }
        }
        PowerUpKind::OrbsGrant => {
            if let Ok(mut p) = world.get::<&mut Player>(player) {
                let wanted = p.orbs.len() + ORBS_GRANT_AMOUNT;
                p.max_orbs = p.max_orbs.max(wanted);
            }
            world_setup::spawn_orbs(world, player, ORBS_GRANT_AMOUNT, &EffectSet::new());
        }
        PowerUpKind::DamageUpgrade
        | PowerUpKind::OrbRegenUpgrade
        | PowerUpKind::SpeedUpgrade
        | PowerUpKind::MaxOrbsUpgrade => modify(world, player, kind, 1),
        PowerUpKind::DoubleDamage | PowerUpKind::DoubleOrbRegen | PowerUpKind::SpeedBoost => {
            let Some(duration) = kind.duration() else { return };
            if !world.contains(player) {
                return;
            }
            modify(world, player, kind, 1);
            let replaced = ctx.timers.schedule_keyed(
                ctx.now + duration,
                TimerKey::PowerUp(player, kind),
                TimerAction::ExpirePowerUp { player, kind },
            );
            if replaced.is_some() {
                revert(world, player, kind);
            }
        }
    }
    log::debug!("power-up {:?} applied", kind);
}

/// Undo a temporary power-up.
pub fn revert(world: &mut World, player: Entity, kind: PowerUpKind) {
    if kind.is_temporary() {
        modify(world, player, kind, -1);
    }
}

fn modify(world: &mut World, player: Entity, kind: PowerUpKind, sign: i32) {
    let Ok(mut p) = world.get::<&mut Player>(player) else {
        return;
    };
    let factor = f64::from(sign);
    match kind {
        PowerUpKind::DamageUpgrade => p.damage_modifier += sign * DAMAGE_UPGRADE_AMOUNT,
        PowerUpKind::OrbRegenUpgrade => p.orb_regen_modifier += factor * ORB_REGEN_UPGRADE_AMOUNT,
        PowerUpKind::SpeedUpgrade => p.mobility_modifier += factor * SPEED_UPGRADE_AMOUNT,
        PowerUpKind::MaxOrbsUpgrade => {
            if sign > 0 {
                p.max_orbs += MAX_ORBS_UPGRADE_AMOUNT;
            } else {
                p.max_orbs = p.max_orbs.saturating_sub(MAX_ORBS_UPGRADE_AMOUNT);
            }
        }
        PowerUpKind::DoubleDamage => p.damage_modifier += sign * DOUBLE_DAMAGE_AMOUNT,
        PowerUpKind::DoubleOrbRegen => p.orb_regen_modifier += factor * DOUBLE_ORB_REGEN_AMOUNT,
        PowerUpKind::SpeedBoost => p.mobility_modifier += factor * SPEED_BOOST_AMOUNT,
        PowerUpKind::Healing | PowerUpKind::OrbsGrant => {}
    }
}

//! Reserve promotion after a hybrid falls.

use super::RoundContext;
use crate::state::Player;

/// Sends in the player's first healthy benched hybrid when nobody is fighting.
///
/// The newcomer starts from its base stats with a clean modifier table.
/// Returns true when a hybrid was promoted.
pub fn bring_in_reserve(player: &mut Player, ctx: &mut RoundContext) -> bool {
    if player.hybrids.len() < 2 || player.active_index().is_some() {
        return false;
    }
    let Some(next) = player
        .hybrids
        .iter_mut()
        .find(|h| !h.is_defeated && !h.is_active)
    else {
        return false;
    };

    next.reset_to_base();
    next.is_active = true;
    ctx.log(format!(
        "{} sends in {}",
        player.display_name,
        next.display_name()
    ));
    true
}

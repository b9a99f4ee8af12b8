use std::collections::HashSet;

use crate::{EngineError, EngineResult, PlayerId, Standing};

#[derive(Clone, Debug, PartialEq)]
pub struct ByeAllocation {
    /// Ranked order with the bye recipient, if any, moved to the end.
    pub order: Vec<Standing>,
    pub bye: Option<PlayerId>,
}

/// Picks the highest ranked player without a previous bye when the field is
/// odd. Even fields pass through untouched.
pub fn allocate_bye(
    mut ranked: Vec<Standing>,
    previous_byes: &HashSet<PlayerId>,
) -> EngineResult<ByeAllocation> {
    if ranked.len() % 2 == 0 {
        return Ok(ByeAllocation {
            order: ranked,
            bye: None,
        });
    }

    let Some(index) = ranked
        .iter()
        .position(|s| !previous_byes.contains(&s.player_id))
    else {
        return Err(EngineError::ExhaustedByes {
            player_count: ranked.len(),
        });
    };

    let recipient = ranked.remove(index);
    let bye = Some(recipient.player_id);
    ranked.push(recipient);
    Ok(ByeAllocation { order: ranked, bye })
}

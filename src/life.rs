use std::collections::HashSet;

use metrohash::MetroBuildHasher;

use crate::{Pos, World};

/// Cells that change between two consecutive generations.
///
/// `deaths` are alive cells that do not survive, `births` are dead cells
/// brought alive. Both refer to the pre-step world, so they are disjoint.
#[derive(Debug, Clone)]
pub struct StepDelta {
    pub deaths: Vec<Pos>,
    pub births: Vec<Pos>,
}

/// Computes what one generation changes, without applying it.
///
/// Every neighbor count is taken against the passed-in world only, so the
/// outcome does not depend on any iteration order.
pub fn step_delta<W>(world: &W) -> StepDelta
where
    W: World,
{
    let mut deaths = Vec::new();
    // Dead cells adjacent to a living one are the only birth candidates.
    // Set semantics: a cell found through several alive neighbors is
    // examined once.
    let mut candidates = HashSet::<Pos, MetroBuildHasher>::default();

    for pos in world.actives() {
        let mut alive_neighbors = 0;
        for neighbor in pos.neighbors() {
            if world.is_alive(neighbor) {
                alive_neighbors += 1;
            } else {
                candidates.insert(neighbor);
            }
        }
        if alive_neighbors != 2 && alive_neighbors != 3 {
            deaths.push(pos);
        }
    }

    let births = candidates
        .into_iter()
        .filter(|candidate| {
            let alive_neighbors = candidate
                .neighbors()
                .filter(|neighbor| world.is_alive(*neighbor))
                .count();
            alive_neighbors == 3
        })
        .collect();

    StepDelta { deaths, births }
}

/// Computes the next generation. The passed-in world is left untouched.
///
/// An empty result means the simulation reached a terminal state: no further
/// generation can bring cells back without outside edits.
pub fn step<W>(world: &W) -> W
where
    W: World,
{
    let StepDelta { deaths, births } = step_delta(world);
    let mut next = world.clone();
    for pos in deaths {
        next.set(pos, false);
    }
    for pos in births {
        next.set(pos, true);
    }
    next
}

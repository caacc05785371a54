//! Requirement graph ordering
//!
//! Kahn's algorithm over the requirement edges, with two error paths the
//! host must report precisely: an edge to a plugin no descriptor matches,
//! and a cycle. Cycle reporting trims acyclic tails off the residual so the
//! error names only plugins actually sitting on a cycle.

use std::collections::{BTreeSet, HashMap, HashSet};

use latch_domain::error::{Error, Result};

use super::descriptor::PluginDescriptor;

/// Compute a valid initialisation order as indices into `descriptors`
///
/// Ties are broken by declaration order, so the result is deterministic.
pub(crate) fn initialisation_order(descriptors: &[PluginDescriptor]) -> Result<Vec<usize>> {
    let count = descriptors.len();

    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(count);
    for (index, descriptor) in descriptors.iter().enumerate() {
        if index_of.insert(descriptor.ident(), index).is_some() {
            return Err(Error::configuration(format!(
                "duplicate plugin identifier '{}'",
                descriptor.ident()
            )));
        }
    }

    // dependents[i] holds every plugin that requires plugin i.
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut pending_requirements = vec![0usize; count];
    for (index, descriptor) in descriptors.iter().enumerate() {
        for requirement in descriptor.requirements() {
            let Some(&required) = index_of.get(requirement.target) else {
                return Err(Error::UnknownRequirement {
                    plugin: descriptor.ident().to_string(),
                    requirement: requirement.target.to_string(),
                });
            };
            dependents[required].push(index);
            pending_requirements[index] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..count)
        .filter(|&index| pending_requirements[index] == 0)
        .collect();
    let mut order = Vec::with_capacity(count);
    while let Some(&index) = ready.iter().next() {
        ready.remove(&index);
        order.push(index);
        for &dependent in &dependents[index] {
            pending_requirements[dependent] -= 1;
            if pending_requirements[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() == count {
        return Ok(order);
    }

    // Some plugins never became ready: their requirements form at least one
    // cycle. The residual also contains plugins merely downstream of a
    // cycle; peel those off until only cycle members remain.
    let emitted: HashSet<usize> = order.into_iter().collect();
    let mut residual: HashSet<usize> = (0..count).filter(|i| !emitted.contains(i)).collect();
    loop {
        let peelable: Vec<usize> = residual
            .iter()
            .copied()
            .filter(|&index| dependents[index].iter().all(|d| !residual.contains(d)))
            .collect();
        if peelable.is_empty() {
            break;
        }
        for index in peelable {
            residual.remove(&index);
        }
    }

    let mut participants: Vec<usize> = residual.into_iter().collect();
    participants.sort_unstable();
    Err(Error::RequirementCycle {
        participants: participants
            .into_iter()
            .map(|index| descriptors[index].ident().to_string())
            .collect(),
    })
}

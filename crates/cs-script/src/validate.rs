use std::collections::{BTreeMap, BTreeSet, VecDeque};

use cs_core::{CallScriptError, State, StateId, DIAL_STATE, START_STATE};

pub(crate) fn validate_states(
    states: Vec<State>,
) -> Result<BTreeMap<StateId, State>, CallScriptError> {
    let mut by_id = BTreeMap::new();
    for state in states {
        let id = state.id;
        if by_id.insert(id, state).is_some() {
            return Err(CallScriptError::new(
                "SCRIPT_DUPLICATE_STATE",
                format!("State \"{}\" is defined more than once.", id),
            ));
        }
    }

    let missing = StateId::ALL
        .iter()
        .filter(|id| !by_id.contains_key(id))
        .map(|id| id.as_str())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(CallScriptError::new(
            "SCRIPT_MISSING_STATE",
            format!("States are not defined: {}.", missing.join(", ")),
        ));
    }

    for state in by_id.values() {
        if state.id != START_STATE && state.transitions.is_empty() {
            return Err(CallScriptError::new(
                "SCRIPT_DEAD_END",
                format!("State \"{}\" has no transitions.", state.id),
            ));
        }
    }

    let forward = edges(&by_id, false);
    let reachable = walk(&forward, START_STATE);
    if let Some(id) = StateId::ALL.iter().find(|id| !reachable.contains(id)) {
        return Err(CallScriptError::new(
            "SCRIPT_UNREACHABLE",
            format!("State \"{}\" cannot be reached from \"{}\".", id, START_STATE),
        ));
    }

    let backward = edges(&by_id, true);
    let returning = walk(&backward, START_STATE);
    if let Some(id) = StateId::ALL.iter().find(|id| !returning.contains(id)) {
        return Err(CallScriptError::new(
            "SCRIPT_NO_PATH_TO_START",
            format!("State \"{}\" has no path back to \"{}\".", id, START_STATE),
        ));
    }

    Ok(by_id)
}

// The begin-call entry point counts as an edge from start to dialing.
fn edges(states: &BTreeMap<StateId, State>, reversed: bool) -> BTreeMap<StateId, Vec<StateId>> {
    let mut out: BTreeMap<StateId, Vec<StateId>> = BTreeMap::new();
    let declared = states.values().flat_map(|state| {
        state
            .transitions
            .iter()
            .map(move |transition| (state.id, transition.target))
    });
    for (from, to) in declared.chain(std::iter::once((START_STATE, DIAL_STATE))) {
        let (key, value) = if reversed { (to, from) } else { (from, to) };
        out.entry(key).or_default().push(value);
    }
    out
}

fn walk(edges: &BTreeMap<StateId, Vec<StateId>>, origin: StateId) -> BTreeSet<StateId> {
    let mut seen = BTreeSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    while let Some(id) = queue.pop_front() {
        for next in edges.get(&id).into_iter().flatten() {
            if seen.insert(*next) {
                queue.push_back(*next);
            }
        }
    }
    seen
}

use crate::MorphId;
use crate::log_tree;
use crate::morph::morph_state::{ClassifiedTree, MorphState, Phase};
use crate::morph::{MorphConfig, collect_k_nodes};
use crate::tree::{NodeId, Symbol, SymbolTree};
use cancel_this::{Cancellable, is_cancelled};
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::{debug, info, trace};
use std::marker::PhantomData;

/// Step implementation of the greedy morph classification.
///
/// Every call performs one unit of work: preparing the tree, comparing one candidate against
/// the known representatives, or relabelling the whole tree.
pub struct MorphStep<S: Symbol>(PhantomData<S>);

impl<S: Symbol> ComputationStep<MorphConfig, MorphState<S>, ClassifiedTree<S>> for MorphStep<S> {
    fn step(context: &MorphConfig, state: &mut MorphState<S>) -> Completable<ClassifiedTree<S>> {
        match state.phase {
            Phase::Preparing => {
                state.tree.set_precision(context.precision);
                state.tree.compute_probabilities();
                state.candidates = collect_k_nodes(&state.tree, context.past_depth);
                state.representatives.clear();
                debug!(
                    "Collected {} candidates at depth {} ({}).",
                    state.candidates.len(),
                    context.past_depth,
                    log_tree(&state.tree)
                );

                if state.candidates.is_empty() {
                    // Nothing was observed deep enough; the root stands for the single morph.
                    debug!("No candidates available; using the root as a degenerate morph.");
                    state.representatives.push(state.tree.root());
                    state.phase = Phase::Labelling;
                } else {
                    state.phase = Phase::Grouping { next: 0 };
                }
                Err(Suspended)
            }
            Phase::Grouping { next } => {
                let Some(&candidate) = state.candidates.get(next) else {
                    info!(
                        "Out of {} candidates, found {} unique morphs: {:?}",
                        state.candidates.len(),
                        state.representatives.len(),
                        state
                            .representatives
                            .iter()
                            .map(|it| state.tree.node(*it).path_id())
                            .collect::<Vec<_>>()
                    );
                    state.phase = Phase::Labelling;
                    return Err(Suspended);
                };

                let is_known = state
                    .representatives
                    .iter()
                    .any(|it| context.equivalent(&state.tree, candidate, *it));
                if !is_known {
                    debug!(
                        "[candidate:{}] New morph {} represented by `{}`.",
                        next,
                        state.representatives.len(),
                        state.tree.node(candidate).path_id()
                    );
                    state.representatives.push(candidate);
                }

                state.phase = Phase::Grouping { next: next + 1 };
                Err(Suspended)
            }
            Phase::Labelling => {
                let unassigned = label_tree(context, &mut state.tree, &state.representatives)?;
                debug!(
                    "Labelled {} nodes with {} morphs; {} nodes match no morph.",
                    state.tree.len(),
                    state.representatives.len(),
                    unassigned
                );

                for candidate in &state.candidates {
                    let node = state.tree.node(*candidate);
                    assert!(
                        node.morph().is_some(),
                        "Candidate `{}` is not equivalent to any morph representative.",
                        node.path_id()
                    );
                }

                state.phase = Phase::Done;
                Ok(finish(state))
            }
            Phase::Done => Ok(finish(state)),
        }
    }
}

fn finish<S: Symbol>(state: &MorphState<S>) -> ClassifiedTree<S> {
    ClassifiedTree {
        tree: state.tree.clone(),
        candidate_count: state.candidates.len(),
        representatives: state.representatives.clone(),
    }
}

/// Assign every node the first representative it is equivalent to (or `None`).
///
/// Returns the number of nodes that stayed unassigned.
fn label_tree<S: Symbol>(
    config: &MorphConfig,
    tree: &mut SymbolTree<S>,
    representatives: &[NodeId],
) -> Cancellable<usize> {
    let mut unassigned = 0;
    for index in 0..tree.len() {
        is_cancelled!()?;
        let node = NodeId(index);
        let morph: Option<MorphId> = representatives
            .iter()
            .position(|it| config.equivalent(&*tree, node, *it));
        if morph.is_none() {
            unassigned += 1;
        }
        trace!("Node `{}` labelled as {:?}.", tree.node(node).path_id(), morph);
        tree.set_morph(node, morph);
    }
    Ok(unassigned)
}

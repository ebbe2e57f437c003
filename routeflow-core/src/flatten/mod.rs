use crate::types::{PreparedTransaction, Route};

/// A transaction lifted out of its step with positional bookkeeping.
///
/// `index` is the position in the flattened list; `step_index` the position
/// of the owning step. Created once per route and referenced by index
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTx {
    pub index: usize,
    pub step_index: usize,
    pub tx: PreparedTransaction,
}

/// Flattens a route's steps into the linear execution order.
pub fn flatten_route(route: &Route) -> Vec<FlatTx> {
    let mut out = Vec::with_capacity(route.transaction_count());
    for (step_index, step) in route.steps.iter().enumerate() {
        for tx in &step.transactions {
            out.push(FlatTx {
                index: out.len(),
                step_index,
                tx: tx.clone(),
            });
        }
    }
    out
}

/// Greedy batch window starting at `start`: the exclusive end of the maximal
/// run of consecutive transactions sharing `txs[start]`'s chain.
///
/// Returns `start + 1` (single-transaction window) when batching is not
/// available or `start` is the last transaction.
pub fn batch_window(txs: &[FlatTx], start: usize, batching: bool) -> usize {
    if !batching || start + 1 >= txs.len() {
        return (start + 1).min(txs.len());
    }
    let chain = txs[start].tx.chain_id;
    let mut end = start + 1;
    while end < txs.len() && txs[end].tx.chain_id == chain {
        end += 1;
    }
    end
}

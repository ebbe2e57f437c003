/// Run progress as a whole percentage, rounded to the nearest integer.
///
/// The onramp leg, when the route has one, counts as one more unit in both
/// the total and (once completed) the completed count. A zero total yields 0.
pub fn percent_complete(
    completed_txs: usize,
    total_txs: usize,
    onramp_required: bool,
    onramp_completed: bool,
) -> u8 {
    let total = total_txs + usize::from(onramp_required);
    if total == 0 {
        return 0;
    }
    let done = completed_txs + usize::from(onramp_required && onramp_completed);
    let pct = (done as f64 / total as f64) * 100.0;
    pct.round() as u8
}

//! Integer partitioning of matched sites among species.

/// Splits `total` items among `shares` with the largest-remainder method.
///
/// Each share gets the floor of its quota `share · total`; the leftover items go one at
/// a time to the largest fractional remainders, ties to the lowest index. `shares` are
/// expected to sum to one.
pub(crate) fn largest_remainder(shares: &[f64], total: usize) -> Vec<usize> {
    let quotas: Vec<f64> = shares.iter().map(|s| s * total as f64).collect();
    let mut counts: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();

    let assigned: usize = counts.iter().sum();
    let leftover = total.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &index in order.iter().cycle().take(leftover) {
        counts[index] += 1;
    }
    counts
}

/// Orders `Σ counts` slots so that every prefix is proportionally mixed.
///
/// Slot `t` goes to the species with the largest deficit `counts[i]·t − N·placed[i]`
/// among those not yet exhausted, ties to the lowest index.
pub(crate) fn interleave(counts: &[usize]) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    let mut placed = vec![0usize; counts.len()];
    let mut sequence = Vec::with_capacity(total);

    for t in 1..=total {
        let next = (0..counts.len())
            .filter(|&i| placed[i] < counts[i])
            .max_by(|&a, &b| {
                let deficit = |i: usize| (counts[i] * t) as i128 - (total * placed[i]) as i128;
                deficit(a).cmp(&deficit(b)).then(b.cmp(&a))
            });
        if let Some(species) = next {
            placed[species] += 1;
            sequence.push(species);
        }
    }
    sequence
}

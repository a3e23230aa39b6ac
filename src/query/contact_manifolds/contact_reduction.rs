use crate::math::Real;
use crate::query::contact_manifolds::{ContactPoint, MAX_MANIFOLD_POINTS};
use arrayvec::ArrayVec;
use num::Bounded;

/// Selects at most [`MAX_MANIFOLD_POINTS`] contacts among `candidates`.
///
/// The selection keeps, in that order:
/// 1. the deepest contact,
/// 2. the contact farthest from the first one,
/// 3. the contact farthest on one side of the line joining the first two,
/// 4. the contact farthest on the other side of that line.
///
/// Distances are measured on the first shape, in the plane orthogonal to the normal of the deepest
/// contact. If `candidates` already fits, it is returned as-is.
pub fn reduce_contacts(candidates: &[ContactPoint]) -> ArrayVec<ContactPoint, MAX_MANIFOLD_POINTS> {
    if candidates.len() <= MAX_MANIFOLD_POINTS {
        return candidates.iter().copied().collect();
    }

    let mut selected: ArrayVec<usize, MAX_MANIFOLD_POINTS> = ArrayVec::new();

    let deepest = argmax(candidates, &selected, |c| c.penetration);
    selected.push(deepest);

    let p0 = candidates[deepest].local_p1;
    let farthest = argmax(candidates, &selected, |c| (c.local_p1 - p0).norm_squared());
    selected.push(farthest);

    let side = candidates[deepest]
        .local_n1
        .cross(&(candidates[farthest].local_p1 - p0));
    let max_side = argmax(candidates, &selected, |c| (c.local_p1 - p0).dot(&side));
    selected.push(max_side);

    let min_side = argmax(candidates, &selected, |c| -(c.local_p1 - p0).dot(&side));
    selected.push(min_side);

    selected.iter().map(|i| candidates[*i]).collect()
}

// The index of the candidate maximizing `score`, excluding those already selected.
fn argmax(
    candidates: &[ContactPoint],
    selected: &[usize],
    score: impl Fn(&ContactPoint) -> Real,
) -> usize {
    let mut best = usize::MAX;
    let mut best_score = -Real::max_value();

    for (i, candidate) in candidates.iter().enumerate() {
        if selected.contains(&i) {
            continue;
        }

        let s = score(candidate);
        if best == usize::MAX || s > best_score {
            best = i;
            best_score = s;
        }
    }

    best
}

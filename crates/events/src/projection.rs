use crate::Event;

/// A projection builds a read model from an append-only event log.
///
/// Projections here are **disposable and recomputed**: every query starts from
/// an empty accumulator and folds the full snapshot it was handed. Nothing is
/// cached between calls, so a read model can never drift from the log it was
/// built from; edits or deletions in the log show up on the next fold.
///
/// ## Determinism
///
/// `apply` must not perform IO and must depend only on the accumulator and the
/// event. Whether the fold is also order-independent is a property of each
/// implementation (aggregate balances are, running histories are not) and is
/// documented on the implementing type.
pub trait Projection {
    type Ev: Event;

    /// Fold a single event into the read model.
    fn apply(&mut self, event: &Self::Ev);
}

/// Fold `events` into a fresh projection.
pub fn project<'a, P, I>(events: I) -> P
where
    P: Projection + Default,
    P::Ev: 'a,
    I: IntoIterator<Item = &'a P::Ev>,
{
    events.into_iter().fold(P::default(), |mut acc, event| {
        acc.apply(event);
        acc
    })
}

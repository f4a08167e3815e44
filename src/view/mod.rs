//! View-model state shared by the console views.
//!
//! Mutating gateway calls return [`Mutation`]s naming the reads they made
//! stale; views decide whether to refetch. List fetches run under a
//! [`Ticket`] so a result arriving after a newer fetch, or after the view
//! was dismissed, is dropped instead of overwriting fresher state.

mod generation;
mod invalidation;
mod orders;

pub use generation::{Generation, Ticket};
pub use invalidation::{Invalidation, Mutation};
pub use orders::{ListState, OrderListView};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub mod postings;
pub mod profiles;

pub use postings::{PostingStore, UpsertOutcome};
pub use profiles::{ProfileStore, ProfileStoreError};

//! Client-side expense engine.
//!
//! Everything here is pure: the aggregation functions recompute from the full
//! expense collection on every call and the drafts turn raw user input into
//! request payloads without touching the network.

pub use draft::{ExpenseDraft, LoginDraft, SignupDraft, UpdateDraft};
pub use error::DraftError;
pub use money::{format_amount, format_percent, format_whole};
pub use summary::{
    CategoryShare, CategoryTotal, Summary, TOP_CATEGORIES, average, category_totals,
    percentage_share, top_categories, total,
};

mod draft;
mod error;
mod money;
mod summary;

type ResultDraft<T> = Result<T, DraftError>;

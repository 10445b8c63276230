//! Mutating actions over a project.
//!
//! Each action computes a change from project data and applies it through the
//! [`crate::project::ProjectState`] setters.

mod compilation;
mod hooks;
mod ordering;
mod review;
mod trim;

pub use compilation::{
    create_compilation, order_by_vibe, select_for_duration, Compilation, CompilationEntry,
    Selection, Vibe,
};
pub use hooks::{
    parse_hook_response, regenerate_hooks, HookFailure, HookRegeneration, HookSuggestion,
    HookUpdate,
};
pub use ordering::{order_clips, suggest_order, OrderStrategy, OrderSuggestion, OrderedClip};
pub use review::{auto_review, plan_review, ReviewCriteria, ReviewDecision, ReviewSummary};
pub use trim::{smart_trim, TrimOutcome, TrimStrategy};

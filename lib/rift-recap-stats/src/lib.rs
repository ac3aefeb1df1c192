//! Pure derivations over raw match documents: per-match rows for one
//! player, and the aggregate summary over a set of rows.

pub mod row;
pub mod summary;

pub use row::{extract_row, MatchRow};
pub use summary::{summarize, ChampionCount, RoleCount, Summary};

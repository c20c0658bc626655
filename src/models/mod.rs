//! Wire models for the storefront API.
//!
//! These models match the remote JSON contract exactly; server documents use
//! `_id`, accepted everywhere via serde aliases.

mod category;
mod product;
mod user;

pub use category::*;
pub use product::*;
pub use user::*;

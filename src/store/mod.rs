//! Store layer: the state slices that mediate between a UI and the remote
//! API. All stores are single-threaded (`&mut self`) and generic over
//! [`StorefrontApi`](crate::client::StorefrontApi).

mod cart;
mod catalog;
mod intent;
mod session;
mod wishlist;

pub use cart::*;
pub use catalog::*;
pub use intent::*;
pub use session::*;
pub use wishlist::*;

#[cfg(test)]
pub(crate) mod stub;

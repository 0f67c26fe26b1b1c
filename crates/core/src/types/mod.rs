//! Profile document types.
//!
//! All types serialize with camelCase field names to match the JSON
//! documents exchanged with storefront clients and stored in the profile
//! store.

pub mod preferences;
pub mod profile;
pub mod purchase;
pub mod wishlist;

pub use preferences::{BudgetRange, Preferences};
pub use profile::UserProfile;
pub use purchase::{PurchaseItem, PurchaseRecord};
pub use wishlist::WishlistEntry;

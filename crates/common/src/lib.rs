pub mod category;
pub mod discount;
pub mod error;
pub mod submission;

pub use category::{Category, UnknownCategory};
pub use discount::{CatalogFile, Discount, DiscountSummary};
pub use error::{Result, StoreError};
pub use submission::{Feedback, LoyalUser};

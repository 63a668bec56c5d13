use serde::{Deserialize, Serialize};

/// Customer feedback captured by the contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Loyalty programme signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyalUser {
    pub name: String,
    pub email: String,
    pub phone: String,
}

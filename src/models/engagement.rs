use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contact request captured from a public profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub message: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub message: Option<String>,
}

/// Visitor-submitted testimonial. Hidden from public reads until the owner
/// approves it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Testimonial {
    pub id: i64,
    pub profile_id: i64,
    pub author_name: String,
    pub quote: String,
    pub approved: bool,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewTestimonial {
    pub author_name: String,
    pub quote: String,
}

//! Reviews Domain
//!
//! Ratings (0 to 5) and comments on products. The author is always the
//! authenticated caller; only the author or an administrator may change a review.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ReviewError, ReviewResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateReview, MessageResponse, Review, ReviewFilter, ReviewResponse, ReviewsResponse,
    UpdateReview,
};
pub use mongodb::MongoReviewRepository;
pub use repository::{InMemoryReviewRepository, ReviewRepository};
pub use service::ReviewService;

// Core algorithm exports
pub mod advisor;
pub mod distance;
pub mod normalize;
pub mod ranking;

pub use advisor::{Advisor, AdvisorError, parse_listing_id};
pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box};
pub use normalize::{normalize, normalize_all, DropStats};
pub use ranking::Ranker;

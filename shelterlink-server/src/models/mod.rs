//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod assessment;
pub mod geo;
pub mod pagination;
pub mod text;
pub mod validation;

pub use assessment::{Answer, RiskLevel, ScoredAssessment, CRISIS_THRESHOLD};
pub use geo::{haversine_km, GeoFilter, GeoPoint, DEFAULT_RADIUS_KM};
pub use pagination::{Pagination, PaginationParams};
pub use text::{optional_text, Email, RequiredText, MAX_LONG_LEN, MAX_SHORT_LEN};
pub use validation::ValidationError;

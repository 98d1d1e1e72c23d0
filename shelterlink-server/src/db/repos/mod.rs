//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the shared [`Db`](crate::db::Db); no per-repo connection state
//! - Lookups by id return `DbError::NotFound` rather than `Option`
//! - Dependent writes (notifications, consent, answers) share the primary
//!   write's transaction
//! - Upserts use ON CONFLICT (no check-then-insert)

pub mod accessibility;
pub mod assessments;
pub mod certifications;
pub mod consent;
pub mod contact;
pub mod dog_resources;
pub mod dogs;
pub mod employment;
pub mod food_banks;
pub mod letters;
pub mod notifications;
pub mod organizations;
pub mod shelters;
pub mod users;

pub use accessibility::{AccessibilityRepo, AccessibilitySettings, FontSize, SettingsInput};
pub use assessments::{Assessment, AssessmentDetail, AssessmentRepo, Question, Submitted};
pub use certifications::{Certification, CertificationRepo, CertificationStatus, NewCertification};
pub use consent::{ConsentLog, ConsentRepo, NewConsent};
pub use contact::{ContactMessage, ContactRepo, NewContactMessage};
pub use dog_resources::{DogResource, DogResourceRepo, NewDogResource};
pub use dogs::{Dog, DogInput, DogRepo};
pub use employment::{EmploymentRepo, NewOpportunity, Opportunity, OpportunityFilter};
pub use food_banks::{FoodBank, FoodBankFilter, FoodBankInput, FoodBankRepo};
pub use letters::{Letter, LetterRepo, LetterTemplate, NewLetter};
pub use notifications::{NewNotification, Notification, NotificationKind, NotificationRepo};
pub use organizations::{NewOrganization, Organization, OrganizationRepo};
pub use shelters::{Shelter, ShelterFilter, ShelterInput, ShelterRepo};
pub use users::{NewUser, User, UserRepo};

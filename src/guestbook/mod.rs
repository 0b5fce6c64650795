pub mod avatar;
pub mod cards;
pub mod form;
pub mod layout;
pub mod pagination;
pub mod rotation;
pub mod stars;
pub mod stats;
pub mod surface;
pub mod time;

pub use form::{FormError, SubmissionForm};
pub use rotation::{AutoAdvance, Carousel, Focus};
pub use stats::FeedbackStats;
pub use surface::{LiveSurface, SurfacePhase, SurfaceView};

//! Page interaction state machines for TileShade.
//!
//! Every flow is an explicit session-scoped state machine: the host feeds it
//! view geometry, clicks, or media events, and it returns a list of
//! [`Effect`] commands describing the style mutations, deferred actions, and
//! navigations to apply. Nothing in this crate touches a display; it only
//! decides.
//!
//! ```text
//!   scroll/click/media event ──▶ flow state machine ──▶ Vec<Effect> ──▶ host
//! ```
//!
//! Flows are independent of each other and follow a "fail silently, fail
//! locally" policy: media operations that the host reports as failed are
//! logged and never retried.

mod hero;
mod ops;
mod quiz;
mod scenes;
mod scroll;
mod sections;

pub use hero::{HeroFlow, MediaOp, SlideCarousel};
pub use ops::{Display, Effect, StyleOp, Transform};
pub use quiz::{account_likelihoods, AccountLikelihood, QuizAnswers, ACCOUNT_TYPES};
pub use scenes::{IntroScene, StatsScene};
pub use scroll::{HolderRect, ScrollEffects, Viewport};
pub use sections::{section_destination, RowLayout};

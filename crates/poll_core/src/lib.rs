//! Render poll core: pure job-polling state machine and page model.
mod effect;
mod job;
mod markup;
mod msg;
mod page;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{JobKey, JobKind, JobStatus, StatusReport, Tick};
pub use markup::{escape_attr, escape_text};
pub use msg::Msg;
pub use page::{ElementContent, JobElement};
pub use state::{Phase, PollerOptions, PollerState};
pub use update::update;
pub use view_model::{PollerViewModel, SessionView};

//! The studio: upload, generate, poll, and review in one place.

mod poller;
mod view;

pub use poller::{PollSupervisor, POLL_INTERVAL_MS};
pub use view::StudioView;

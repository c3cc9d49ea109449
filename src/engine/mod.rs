mod exec;
pub mod jobs;
pub mod path;
mod pipes;
mod redirect;
mod state;

pub use exec::execute_job;
pub use jobs::reap_background;
pub use state::{PendingBuiltin, Shell, ShellMode};

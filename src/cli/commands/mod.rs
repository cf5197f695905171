mod config;
mod plan;
mod push;

pub use config::ConfigCommand;
pub use plan::PlanArgs;
pub use push::{BatchArgs, PushArgs};

pub use config::handle_config;
pub use plan::handle_plan;
pub use push::handle_push;

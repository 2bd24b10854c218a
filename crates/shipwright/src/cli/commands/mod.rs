//! CLI commands

mod plan;
mod validate;

pub use plan::PlanCommand;
pub use validate::ValidateCommand;

//! CLI domain: parse, route and output only.
//! No domain orchestration; the route table dispatches to the repository.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, PoolCommands, TenantCommands, VolumeCommands};
pub use route::{read_tenant_file, RunContext};

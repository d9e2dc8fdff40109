//! CLI domain: parse, route, and output only.
//! No domain orchestration; single route table dispatches to the operations API.

mod output;
mod parse;
mod route;

pub use output::{format_records_json, format_records_table, format_success, map_error};
pub use parse::{
    Cli, Commands, DefineCommands, DeleteCommands, GetCommands, InstallCommands,
    ProfileCommands, RefreshCommands,
};
pub use route::{ConnectionOverrides, RunContext};

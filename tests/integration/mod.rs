//! Integration tests for the Hack The Planet shell

mod path_properties;
mod remote_sessions;
mod scenarios;
mod shell_commands;

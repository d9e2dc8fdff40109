//! Integration tests for the cicsctl CMCI client

mod command_pipeline;
mod profile_cli;
mod test_utils;

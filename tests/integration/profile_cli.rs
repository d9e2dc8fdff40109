//! Profile CLI tests: stored profiles round-tripped through the command
//! surface, with XDG directories isolated per test.

use super::test_utils::{with_xdg_env, RecordingDispatcher};
use cicsctl::cli::{Cli, ConnectionOverrides, RunContext};
use cicsctl::client::Protocol;
use cicsctl::error::CmciError;
use cicsctl::profile::{CmciProfile, ProfileRegistry};
use clap::Parser;
use std::sync::Arc;
use tempfile::TempDir;

fn run_command(
    dispatcher: Arc<RecordingDispatcher>,
    args: &[&str],
) -> Result<String, CmciError> {
    let mut full_args = vec!["cicsctl"];
    full_args.extend_from_slice(args);
    let cli = Cli::try_parse_from(full_args).expect("CLI args should parse");
    let mut registry = ProfileRegistry::new();
    registry.load_from_xdg()?;
    let mut context = RunContext::with_dispatcher(
        ConnectionOverrides::from_cli(&cli),
        registry,
        dispatcher,
    )?;
    context.execute(&cli.command)
}

fn stored_profile() -> CmciProfile {
    CmciProfile {
        host: "cics.example.com".to_string(),
        port: 1490,
        user: "OPERATOR".to_string(),
        password: "secret".to_string(),
        protocol: Protocol::Https,
        reject_unauthorized: true,
        region_name: Some("RGN1".to_string()),
        cics_plex: None,
    }
}

#[test]
fn test_profile_create_list_show_remove_round_trip() {
    let dir = TempDir::new().unwrap();
    with_xdg_env(&dir, || {
        let dispatcher = Arc::new(RecordingDispatcher::ok());
        let output = run_command(
            Arc::clone(&dispatcher),
            &[
                "profile",
                "create",
                "dev",
                "--non-interactive",
                "--host",
                "cics.example.com",
                "--user",
                "OPERATOR",
                "--password",
                "secret",
                "--region-name",
                "RGN1",
            ],
        )
        .unwrap();
        assert!(output.contains("Profile created: dev"));
        assert!(output.contains("dev.toml"));

        let listed = run_command(Arc::clone(&dispatcher), &["profile", "list"]).unwrap();
        assert!(listed.contains("dev"));
        assert!(listed.contains("cics.example.com"));

        let shown = run_command(Arc::clone(&dispatcher), &["profile", "show", "dev"]).unwrap();
        assert!(shown.contains("host: cics.example.com"));
        assert!(shown.contains("password: ********"));
        assert!(!shown.contains("secret"));

        let removed = run_command(
            Arc::clone(&dispatcher),
            &["profile", "remove", "dev", "--force"],
        )
        .unwrap();
        assert!(removed.contains("Removed profile: dev"));

        let listed = run_command(Arc::clone(&dispatcher), &["profile", "list"]).unwrap();
        assert_eq!(listed, "No profiles found.");
    });
}

#[test]
fn test_profile_create_non_interactive_requires_host() {
    let dir = TempDir::new().unwrap();
    with_xdg_env(&dir, || {
        let dispatcher = Arc::new(RecordingDispatcher::ok());
        let err = run_command(
            Arc::clone(&dispatcher),
            &["profile", "create", "dev", "--non-interactive"],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Host is required"));
    });
}

#[test]
fn test_named_profile_supplies_connection_and_region() {
    let dir = TempDir::new().unwrap();
    with_xdg_env(&dir, || {
        let mut registry = ProfileRegistry::new();
        registry.save_profile("test", &stored_profile()).unwrap();

        let dispatcher = Arc::new(RecordingDispatcher::ok());
        let output = run_command(
            Arc::clone(&dispatcher),
            &["define", "program", "PGM1", "GRP1", "--profile", "test"],
        )
        .unwrap();
        assert!(output.contains("success"));

        let calls = dispatcher.calls();
        assert_eq!(
            calls[0].path,
            "/CICSSystemManagement/CICSDefinitionProgram/RGN1"
        );
        assert_eq!(calls[0].base_url, "https://cics.example.com:1490");
    });
}

#[test]
fn test_default_profile_is_picked_up_without_flag() {
    let dir = TempDir::new().unwrap();
    with_xdg_env(&dir, || {
        let mut registry = ProfileRegistry::new();
        registry.save_profile("default", &stored_profile()).unwrap();

        let dispatcher = Arc::new(RecordingDispatcher::ok());
        run_command(
            Arc::clone(&dispatcher),
            &["refresh", "program", "PGM1"],
        )
        .unwrap();

        assert_eq!(
            dispatcher.calls()[0].path,
            "/CICSSystemManagement/CICSProgram/RGN1"
        );
    });
}

#[test]
fn test_flag_overrides_win_over_profile_values() {
    let dir = TempDir::new().unwrap();
    with_xdg_env(&dir, || {
        let mut registry = ProfileRegistry::new();
        registry.save_profile("test", &stored_profile()).unwrap();

        let dispatcher = Arc::new(RecordingDispatcher::ok());
        run_command(
            Arc::clone(&dispatcher),
            &[
                "define",
                "program",
                "PGM1",
                "GRP1",
                "--profile",
                "test",
                "--region-name",
                "RGN2",
            ],
        )
        .unwrap();

        assert_eq!(
            dispatcher.calls()[0].path,
            "/CICSSystemManagement/CICSDefinitionProgram/RGN2"
        );
    });
}

#[test]
fn test_unknown_profile_is_an_error() {
    let dir = TempDir::new().unwrap();
    with_xdg_env(&dir, || {
        let dispatcher = Arc::new(RecordingDispatcher::ok());
        let err = run_command(
            Arc::clone(&dispatcher),
            &["refresh", "program", "PGM1", "--profile", "missing"],
        )
        .unwrap_err();
        assert!(matches!(err, CmciError::Profile(_)));
        assert!(dispatcher.calls().is_empty());
    });
}

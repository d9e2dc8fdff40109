//! End-to-end command pipeline tests: parsed CLI commands through the route
//! table to the dispatcher, with the HTTP round trip mocked out.

use super::test_utils::RecordingDispatcher;
use cicsctl::cli::{Cli, ConnectionOverrides, RunContext};
use cicsctl::error::CmciError;
use cicsctl::profile::ProfileRegistry;
use clap::Parser;
use std::sync::Arc;

fn run_command(
    dispatcher: Arc<RecordingDispatcher>,
    args: &[&str],
) -> Result<String, CmciError> {
    let mut full_args = vec!["cicsctl"];
    full_args.extend_from_slice(args);
    let cli = Cli::try_parse_from(full_args).expect("CLI args should parse");
    let mut context = RunContext::with_dispatcher(
        ConnectionOverrides::from_cli(&cli),
        ProfileRegistry::new(),
        dispatcher,
    )
    .expect("run context should build");
    context.execute(&cli.command)
}

const CONNECTION: &[&str] = &[
    "--host",
    "cics.example.com",
    "--port",
    "1490",
    "--user",
    "OPERATOR",
    "--password",
    "secret",
    "--region-name",
    "RGN1",
];

fn with_connection<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut full = args.to_vec();
    full.extend_from_slice(CONNECTION);
    full
}

#[test]
fn test_define_program_posts_create_envelope() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    let output = run_command(
        Arc::clone(&dispatcher),
        &with_connection(&["define", "program", "PGM1", "GRP1"]),
    )
    .unwrap();
    assert!(output.contains("success"));

    let calls = dispatcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(
        calls[0].path,
        "/CICSSystemManagement/CICSDefinitionProgram/RGN1"
    );
    let body = calls[0].body.as_deref().unwrap();
    assert!(body.contains("name=\"PGM1\""));
    assert!(body.contains("csdgroup=\"GRP1\""));
}

#[test]
fn test_pipeline_urimap_renders_expected_envelope() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    run_command(
        Arc::clone(&dispatcher),
        &with_connection(&[
            "define",
            "urimap-pipeline",
            "DFN1234",
            "GRP1",
            "--urimap-path",
            "a/b.html",
            "--urimap-host",
            "www.example.com",
            "--pipeline",
            "FAKEPIPE",
        ]),
    )
    .unwrap();

    let calls = dispatcher.calls();
    assert_eq!(
        calls[0].path,
        "/CICSSystemManagement/CICSDefinitionURIMap/RGN1"
    );
    assert_eq!(
        calls[0].body.as_deref().unwrap(),
        "<request><create><parameter name=\"CSD\"></parameter>\
         <attributes name=\"DFN1234\" csdgroup=\"GRP1\" path=\"a/b.html\" \
         host=\"www.example.com\" pipeline=\"FAKEPIPE\"></attributes></create></request>"
    );
}

#[test]
fn test_cics_plex_routes_through_plex_segment() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    let mut args = with_connection(&["define", "program", "PGM1", "GRP1"]);
    args.extend_from_slice(&["--cics-plex", "PLEXA"]);
    run_command(Arc::clone(&dispatcher), &args).unwrap();

    assert_eq!(
        dispatcher.calls()[0].path,
        "/CICSSystemManagement/CICSDefinitionProgram/PLEXA/RGN1"
    );
}

#[test]
fn test_delete_transaction_sends_criteria_without_body() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    let output = run_command(
        Arc::clone(&dispatcher),
        &with_connection(&["delete", "transaction", "TRN1", "GRP1"]),
    )
    .unwrap();
    assert!(output.contains("success"));

    let calls = dispatcher.calls();
    assert_eq!(calls[0].method, "DELETE");
    assert_eq!(
        calls[0].path,
        "/CICSSystemManagement/CICSDefinitionTransaction/RGN1"
    );
    assert!(calls[0].body.is_none());
    assert_eq!(
        calls[0].query,
        vec![
            ("CRITERIA".to_string(), "NAME=TRN1".to_string()),
            ("PARAMETER".to_string(), "CSDGROUP(GRP1)".to_string()),
        ]
    );
}

#[test]
fn test_install_urimap_puts_csdinstall() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    run_command(
        Arc::clone(&dispatcher),
        &with_connection(&["install", "urimap", "MAP1", "GRP1"]),
    )
    .unwrap();

    let calls = dispatcher.calls();
    assert_eq!(calls[0].method, "PUT");
    assert_eq!(
        calls[0].body.as_deref().unwrap(),
        "<request><action name=\"CSDINSTALL\"></action></request>"
    );
}

#[test]
fn test_refresh_program_puts_newcopy() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    let output = run_command(
        Arc::clone(&dispatcher),
        &with_connection(&["refresh", "program", "PGM1"]),
    )
    .unwrap();
    assert!(output.contains("success"));

    let calls = dispatcher.calls();
    assert_eq!(calls[0].method, "PUT");
    assert_eq!(calls[0].path, "/CICSSystemManagement/CICSProgram/RGN1");
    assert_eq!(
        calls[0].query,
        vec![("CRITERIA".to_string(), "PROGRAM=PGM1".to_string())]
    );
    assert_eq!(
        calls[0].body.as_deref().unwrap(),
        "<request><action name=\"NEWCOPY\"></action></request>"
    );
}

#[test]
fn test_get_resource_json_output() {
    let response = r#"<response>
        <resultsummary api_response1="1024" api_response1_alt="OK" recordcount="2"/>
        <records>
            <cicsprogram program="PGM1" status="ENABLED"/>
            <cicsprogram program="PGM2" status="DISABLED"/>
        </records>
    </response>"#;
    let dispatcher = Arc::new(RecordingDispatcher::with_response(response));
    let output = run_command(
        Arc::clone(&dispatcher),
        &with_connection(&["get", "resource", "program", "--format", "json"]),
    )
    .unwrap();

    let records: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["program"], "PGM1");

    let calls = dispatcher.calls();
    assert_eq!(calls[0].method, "GET");
    assert_eq!(calls[0].path, "/CICSSystemManagement/CICSProgram/RGN1");
}

#[test]
fn test_get_resource_forwards_filter_expressions() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    run_command(
        Arc::clone(&dispatcher),
        &with_connection(&[
            "get",
            "resource",
            "urimap",
            "--criteria",
            "NAME=MAP*",
            "--parameter",
            "CSDGROUP(GRP1)",
        ]),
    )
    .unwrap();

    assert_eq!(
        dispatcher.calls()[0].query,
        vec![
            ("CRITERIA".to_string(), "NAME=MAP*".to_string()),
            ("PARAMETER".to_string(), "CSDGROUP(GRP1)".to_string()),
        ]
    );
}

#[test]
fn test_rejected_result_summary_fails_the_command() {
    let response = r#"<response><resultsummary api_response1="1027" api_response1_alt="NODATA" recordcount="0"/></response>"#;
    let dispatcher = Arc::new(RecordingDispatcher::with_response(response));
    let err = run_command(
        Arc::clone(&dispatcher),
        &with_connection(&["get", "resource", "program"]),
    )
    .unwrap_err();

    assert!(matches!(err, CmciError::Rejected { code: 1027, .. }));
}

#[test]
fn test_missing_host_fails_before_dispatch() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    let err = run_command(
        Arc::clone(&dispatcher),
        &[
            "define",
            "program",
            "PGM1",
            "GRP1",
            "--user",
            "OPERATOR",
            "--password",
            "secret",
            "--region-name",
            "RGN1",
        ],
    )
    .unwrap_err();

    assert!(err.to_string().contains("host"));
    assert!(dispatcher.calls().is_empty());
}

#[test]
fn test_missing_region_is_a_validation_error() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    let err = run_command(
        Arc::clone(&dispatcher),
        &[
            "define",
            "program",
            "PGM1",
            "GRP1",
            "--host",
            "cics.example.com",
            "--user",
            "OPERATOR",
            "--password",
            "secret",
        ],
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "CICS program region name is required");
    assert!(dispatcher.calls().is_empty());
}

#[test]
fn test_connection_parms_never_reach_attributes() {
    let dispatcher = Arc::new(RecordingDispatcher::ok());
    run_command(
        Arc::clone(&dispatcher),
        &with_connection(&["define", "program", "PGM1", "GRP1"]),
    )
    .unwrap();

    let body = dispatcher.calls()[0].body.clone().unwrap();
    assert!(!body.contains("cics.example.com"));
    assert!(!body.contains("OPERATOR"));
    assert!(!body.contains("secret"));
    assert!(!body.contains("RGN1"));
}

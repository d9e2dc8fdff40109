//! CMCI resource kinds and path resolution.
//!
//! CMCI addresses every resource through a URL of the form
//! `/CICSSystemManagement/{resourceType}/[{cicsplex}/]{regionName}`. This module
//! owns the resource-type segments and the path resolver; it knows nothing about
//! request bodies or transports.

use serde::{Deserialize, Serialize};

/// Root URL segment for all CMCI requests.
pub const CICS_SYSTEM_MANAGEMENT: &str = "CICSSystemManagement";

/// CMCI result summary code for a successful request.
pub const CMCI_OK: u32 = 1024;

/// A CMCI resource type.
///
/// Definition kinds address the CSD (create/delete definitions); installed
/// kinds address live resources in a running region (query, NEWCOPY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    ProgramDefinition,
    TransactionDefinition,
    UriMapDefinition,
    WebServiceDefinition,
    PipelineDefinition,
    Program,
    LocalTransaction,
    UriMap,
    WebService,
    Pipeline,
}

impl ResourceKind {
    /// CMCI URL segment for this resource type.
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::ProgramDefinition => "CICSDefinitionProgram",
            ResourceKind::TransactionDefinition => "CICSDefinitionTransaction",
            ResourceKind::UriMapDefinition => "CICSDefinitionURIMap",
            ResourceKind::WebServiceDefinition => "CICSDefinitionWebService",
            ResourceKind::PipelineDefinition => "CICSDefinitionPipeline",
            ResourceKind::Program => "CICSProgram",
            ResourceKind::LocalTransaction => "CICSLocalTransaction",
            ResourceKind::UriMap => "CICSURIMap",
            ResourceKind::WebService => "CICSWebService",
            ResourceKind::Pipeline => "CICSPipeline",
        }
    }

    /// Human-readable name used in messages ("program", "urimap", ...).
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::ProgramDefinition | ResourceKind::Program => "program",
            ResourceKind::TransactionDefinition | ResourceKind::LocalTransaction => "transaction",
            ResourceKind::UriMapDefinition | ResourceKind::UriMap => "urimap",
            ResourceKind::WebServiceDefinition | ResourceKind::WebService => "web service",
            ResourceKind::PipelineDefinition | ResourceKind::Pipeline => "pipeline",
        }
    }

    /// The record element name CMCI uses for this type in response XML.
    pub fn record_tag(&self) -> String {
        self.segment().to_lowercase()
    }

    /// Resolve a kind from a CLI argument such as `CICSProgram` or `program`.
    pub fn parse_query_kind(s: &str) -> Option<ResourceKind> {
        match s.to_lowercase().as_str() {
            "cicsprogram" | "program" => Some(ResourceKind::Program),
            "cicslocaltransaction" | "transaction" => Some(ResourceKind::LocalTransaction),
            "cicsurimap" | "urimap" => Some(ResourceKind::UriMap),
            "cicswebservice" | "webservice" => Some(ResourceKind::WebService),
            "cicspipeline" | "pipeline" => Some(ResourceKind::Pipeline),
            "cicsdefinitionprogram" => Some(ResourceKind::ProgramDefinition),
            "cicsdefinitiontransaction" => Some(ResourceKind::TransactionDefinition),
            "cicsdefinitionurimap" => Some(ResourceKind::UriMapDefinition),
            "cicsdefinitionwebservice" => Some(ResourceKind::WebServiceDefinition),
            "cicsdefinitionpipeline" => Some(ResourceKind::PipelineDefinition),
            _ => None,
        }
    }
}

/// Compute the CMCI resource path for a kind, region, and optional CICSplex.
///
/// The CICSplex segment appears (with its trailing `/`) only when a plex name
/// was supplied; an absent plex never produces an empty segment. Region
/// non-blankness is enforced upstream by the validator.
pub fn resource_path(kind: ResourceKind, region: &str, cics_plex: Option<&str>) -> String {
    let plex_segment = match cics_plex {
        Some(plex) if !plex.trim().is_empty() => format!("{}/", plex),
        _ => String::new(),
    };
    format!(
        "/{}/{}/{}{}",
        CICS_SYSTEM_MANAGEMENT,
        kind.segment(),
        plex_segment,
        region
    )
}

/// Build the `CRITERIA` query expression selecting a resource by name,
/// e.g. `NAME=PGM1` for definitions or `PROGRAM=PGM1` for installed programs.
pub fn name_criteria(kind: ResourceKind, name: &str) -> (String, String) {
    let field = match kind {
        ResourceKind::Program => "PROGRAM",
        ResourceKind::LocalTransaction => "TRANID",
        _ => "NAME",
    };
    ("CRITERIA".to_string(), format!("{}={}", field, name))
}

/// Build the `PARAMETER` query expression scoping a request to a CSD group,
/// e.g. `CSDGROUP(GRP1)`.
pub fn csdgroup_parameter(csd_group: &str) -> (String, String) {
    ("PARAMETER".to_string(), format!("CSDGROUP({})", csd_group))
}

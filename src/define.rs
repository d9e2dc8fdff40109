//! Resource definition parameters: validation and request building.
//!
//! `DefinitionParms` is a discriminated union over resource kind, so a URIMap
//! can never carry both a program handler and a pipeline handler, and fields
//! irrelevant to a kind are unrepresentable. One generic validator and one
//! generic builder walk a per-kind field table; the table fixes both the
//! validation order (first missing field wins) and the attribute order in the
//! request envelope.

use crate::error::CmciError;
use crate::request::RequestEnvelope;
use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};

/// Handler side of a URIMap definition: a server map routes to a program, a
/// pipeline map routes to a web service pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UriMapHandler {
    Server {
        program_name: String,
        /// Required for server maps.
        scheme: String,
    },
    Pipeline {
        pipeline_name: String,
        /// Optional for pipeline maps.
        scheme: Option<String>,
        transaction_name: Option<String>,
        webservice_name: Option<String>,
    },
}

/// Typed parameters for one resource definition, one variant per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefinitionParms {
    Program {
        name: String,
        csd_group: String,
        region_name: String,
        description: Option<String>,
    },
    Transaction {
        name: String,
        program_name: String,
        csd_group: String,
        region_name: String,
        description: Option<String>,
    },
    UriMap {
        name: String,
        csd_group: String,
        path: String,
        host: String,
        region_name: String,
        handler: UriMapHandler,
        tcpip_service: Option<String>,
        description: Option<String>,
    },
    WebService {
        name: String,
        csd_group: String,
        pipeline_name: String,
        wsbind: String,
        region_name: String,
        validation: bool,
        description: Option<String>,
    },
    Pipeline {
        name: String,
        csd_group: String,
        config_file: String,
        region_name: String,
        description: Option<String>,
    },
}

/// One row of a per-kind field table. `key` is the lower-cased CMCI attribute
/// name; rows without a key (region name) are validated but never emitted.
struct FieldSpec {
    label: &'static str,
    key: Option<&'static str>,
    value: Option<String>,
    required: bool,
}

impl FieldSpec {
    fn required(label: &'static str, key: Option<&'static str>, value: &str) -> Self {
        FieldSpec {
            label,
            key,
            value: Some(value.to_string()),
            required: true,
        }
    }

    fn optional(label: &'static str, key: &'static str, value: &Option<String>) -> Self {
        FieldSpec {
            label,
            key: Some(key),
            value: value.clone(),
            required: false,
        }
    }
}

impl DefinitionParms {
    /// Definition resource kind for this variant.
    pub fn kind(&self) -> ResourceKind {
        match self {
            DefinitionParms::Program { .. } => ResourceKind::ProgramDefinition,
            DefinitionParms::Transaction { .. } => ResourceKind::TransactionDefinition,
            DefinitionParms::UriMap { .. } => ResourceKind::UriMapDefinition,
            DefinitionParms::WebService { .. } => ResourceKind::WebServiceDefinition,
            DefinitionParms::Pipeline { .. } => ResourceKind::PipelineDefinition,
        }
    }

    /// Resource name (the definition being created).
    pub fn name(&self) -> &str {
        match self {
            DefinitionParms::Program { name, .. }
            | DefinitionParms::Transaction { name, .. }
            | DefinitionParms::UriMap { name, .. }
            | DefinitionParms::WebService { name, .. }
            | DefinitionParms::Pipeline { name, .. } => name,
        }
    }

    /// Target CSD group.
    pub fn csd_group(&self) -> &str {
        match self {
            DefinitionParms::Program { csd_group, .. }
            | DefinitionParms::Transaction { csd_group, .. }
            | DefinitionParms::UriMap { csd_group, .. }
            | DefinitionParms::WebService { csd_group, .. }
            | DefinitionParms::Pipeline { csd_group, .. } => csd_group,
        }
    }

    /// Target region name (routed into the resource path, never an attribute).
    pub fn region_name(&self) -> &str {
        match self {
            DefinitionParms::Program { region_name, .. }
            | DefinitionParms::Transaction { region_name, .. }
            | DefinitionParms::UriMap { region_name, .. }
            | DefinitionParms::WebService { region_name, .. }
            | DefinitionParms::Pipeline { region_name, .. } => region_name,
        }
    }

    /// Confirm every required field is defined and non-blank.
    ///
    /// Checks run in table order and stop at the first violation; the error
    /// names the resource kind and the offending field. Must pass before a
    /// request envelope is built.
    pub fn validate(&self) -> Result<(), CmciError> {
        let resource = self.kind().display_name();
        for field in self.field_table() {
            if field.required {
                let blank = field
                    .value
                    .as_deref()
                    .map(|v| v.trim().is_empty())
                    .unwrap_or(true);
                if blank {
                    return Err(CmciError::MissingParameter {
                        resource,
                        field: field.label,
                    });
                }
            }
        }
        Ok(())
    }

    /// Map validated parameters into a request envelope.
    ///
    /// Pure transformation: attributes contain exactly the mapped fields that
    /// are present, in table order, and nothing else. Absent optional fields
    /// are omitted rather than emitted empty. Identical input yields
    /// byte-identical output.
    pub fn build_envelope(&self) -> RequestEnvelope {
        let attributes = self
            .field_table()
            .into_iter()
            .filter_map(|field| {
                let key = field.key?;
                let value = field.value?;
                if value.trim().is_empty() {
                    return None;
                }
                Some((key, value))
            })
            .collect();
        RequestEnvelope::create(attributes)
    }

    /// Per-kind field table: validation order and attribute order in one place.
    fn field_table(&self) -> Vec<FieldSpec> {
        match self {
            DefinitionParms::Program {
                name,
                csd_group,
                region_name,
                description,
            } => vec![
                FieldSpec::required("name", Some("name"), name),
                FieldSpec::required("CSD group", Some("csdgroup"), csd_group),
                FieldSpec::optional("description", "description", description),
                FieldSpec::required("region name", None, region_name),
            ],
            DefinitionParms::Transaction {
                name,
                program_name,
                csd_group,
                region_name,
                description,
            } => vec![
                FieldSpec::required("name", Some("name"), name),
                FieldSpec::required("program name", Some("program"), program_name),
                FieldSpec::required("CSD group", Some("csdgroup"), csd_group),
                FieldSpec::optional("description", "description", description),
                FieldSpec::required("region name", None, region_name),
            ],
            DefinitionParms::UriMap {
                name,
                csd_group,
                path,
                host,
                region_name,
                handler,
                tcpip_service,
                description,
            } => {
                let mut table = vec![
                    FieldSpec::required("name", Some("name"), name),
                    FieldSpec::required("CSD group", Some("csdgroup"), csd_group),
                    FieldSpec::required("path", Some("path"), path),
                    FieldSpec::required("host", Some("host"), host),
                ];
                match handler {
                    UriMapHandler::Server {
                        program_name,
                        scheme,
                    } => {
                        table.push(FieldSpec::required(
                            "program name",
                            Some("program"),
                            program_name,
                        ));
                        table.push(FieldSpec::required("scheme", Some("scheme"), scheme));
                    }
                    UriMapHandler::Pipeline {
                        pipeline_name,
                        scheme,
                        transaction_name,
                        webservice_name,
                    } => {
                        table.push(FieldSpec::required(
                            "pipeline name",
                            Some("pipeline"),
                            pipeline_name,
                        ));
                        table.push(FieldSpec::optional("scheme", "scheme", scheme));
                        table.push(FieldSpec::optional(
                            "transaction name",
                            "transaction",
                            transaction_name,
                        ));
                        table.push(FieldSpec::optional(
                            "web service name",
                            "webservice",
                            webservice_name,
                        ));
                    }
                }
                table.push(FieldSpec::optional(
                    "TCP/IP service",
                    "tcpipservice",
                    tcpip_service,
                ));
                table.push(FieldSpec::optional("description", "description", description));
                table.push(FieldSpec::required("region name", None, region_name));
                table
            }
            DefinitionParms::WebService {
                name,
                csd_group,
                pipeline_name,
                wsbind,
                region_name,
                validation,
                description,
            } => vec![
                FieldSpec::required("name", Some("name"), name),
                FieldSpec::required("CSD group", Some("csdgroup"), csd_group),
                FieldSpec::required("pipeline name", Some("pipeline"), pipeline_name),
                FieldSpec::required("wsbind file", Some("wsbind"), wsbind),
                FieldSpec::optional("description", "description", description),
                FieldSpec::required(
                    "validation",
                    Some("validation"),
                    if *validation { "yes" } else { "no" },
                ),
                FieldSpec::required("region name", None, region_name),
            ],
            DefinitionParms::Pipeline {
                name,
                csd_group,
                config_file,
                region_name,
                description,
            } => vec![
                FieldSpec::required("name", Some("name"), name),
                FieldSpec::required("CSD group", Some("csdgroup"), csd_group),
                FieldSpec::required("configuration file", Some("configfile"), config_file),
                FieldSpec::optional("description", "description", description),
                FieldSpec::required("region name", None, region_name),
            ],
        }
    }
}

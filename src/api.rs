//! Operation facade: validate, build, resolve, dispatch.
//!
//! Each operation is one linear pipeline ending in a single HTTP round trip.
//! Nothing is shared between calls — every invocation constructs its own
//! envelope and path — so concurrent operations are safe by construction.
//! Failures are never retried here.

use crate::client::{CmciDispatcher, CmciSession};
use crate::define::DefinitionParms;
use crate::error::CmciError;
use crate::request::{RequestEnvelope, ACTION_CSDINSTALL, ACTION_NEWCOPY};
use crate::resource::{csdgroup_parameter, name_criteria, resource_path, ResourceKind};
use crate::response::CmciResponse;
use tracing::{debug, info};

fn require(
    resource: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), CmciError> {
    if value.trim().is_empty() {
        return Err(CmciError::MissingParameter { resource, field });
    }
    Ok(())
}

/// Create a resource definition in the CSD.
///
/// Validates the parameters, builds the create envelope, resolves the
/// resource path, and POSTs. A validation failure means no request is sent.
pub async fn define_resource(
    dispatcher: &dyn CmciDispatcher,
    session: &CmciSession,
    parms: &DefinitionParms,
    cics_plex: Option<&str>,
) -> Result<CmciResponse, CmciError> {
    parms.validate()?;
    let envelope = parms.build_envelope();
    let path = resource_path(parms.kind(), parms.region_name(), cics_plex);
    info!(
        "Defining {} {} in group {} ({})",
        parms.kind().display_name(),
        parms.name(),
        parms.csd_group(),
        path
    );
    dispatcher.post(session, &path, &[], &envelope).await
}

/// Delete a resource definition from the CSD.
///
/// CMCI addresses the definition through `CRITERIA`/`PARAMETER` query
/// expressions; no request body is sent.
pub async fn delete_resource(
    dispatcher: &dyn CmciDispatcher,
    session: &CmciSession,
    kind: ResourceKind,
    name: &str,
    csd_group: &str,
    region_name: &str,
    cics_plex: Option<&str>,
) -> Result<CmciResponse, CmciError> {
    let resource = kind.display_name();
    require(resource, "name", name)?;
    require(resource, "CSD group", csd_group)?;
    require(resource, "region name", region_name)?;

    let path = resource_path(kind, region_name, cics_plex);
    let query = vec![name_criteria(kind, name), csdgroup_parameter(csd_group)];
    info!("Deleting {} {} from group {}", resource, name, csd_group);
    dispatcher.delete(session, &path, &query).await
}

/// Install a CSD definition into the target region (`CSDINSTALL` action).
pub async fn install_resource(
    dispatcher: &dyn CmciDispatcher,
    session: &CmciSession,
    kind: ResourceKind,
    name: &str,
    csd_group: &str,
    region_name: &str,
    cics_plex: Option<&str>,
) -> Result<CmciResponse, CmciError> {
    let resource = kind.display_name();
    require(resource, "name", name)?;
    require(resource, "CSD group", csd_group)?;
    require(resource, "region name", region_name)?;

    let path = resource_path(kind, region_name, cics_plex);
    let query = vec![name_criteria(kind, name), csdgroup_parameter(csd_group)];
    let envelope = RequestEnvelope::action(ACTION_CSDINSTALL);
    info!("Installing {} {} from group {}", resource, name, csd_group);
    dispatcher.put(session, &path, &query, &envelope).await
}

/// Phase in a new copy of an installed program (`NEWCOPY` action).
pub async fn refresh_program(
    dispatcher: &dyn CmciDispatcher,
    session: &CmciSession,
    name: &str,
    region_name: &str,
    cics_plex: Option<&str>,
) -> Result<CmciResponse, CmciError> {
    require("program", "name", name)?;
    require("program", "region name", region_name)?;

    let kind = ResourceKind::Program;
    let path = resource_path(kind, region_name, cics_plex);
    let query = vec![name_criteria(kind, name)];
    let envelope = RequestEnvelope::action(ACTION_NEWCOPY);
    info!("Refreshing program {}", name);
    dispatcher.put(session, &path, &query, &envelope).await
}

/// Query resources of a kind, optionally filtered by raw CMCI `CRITERIA`
/// and `PARAMETER` expressions.
pub async fn get_resources(
    dispatcher: &dyn CmciDispatcher,
    session: &CmciSession,
    kind: ResourceKind,
    region_name: &str,
    cics_plex: Option<&str>,
    criteria: Option<&str>,
    parameter: Option<&str>,
) -> Result<CmciResponse, CmciError> {
    require(kind.display_name(), "region name", region_name)?;

    let path = resource_path(kind, region_name, cics_plex);
    let mut query = Vec::new();
    if let Some(criteria) = criteria {
        query.push(("CRITERIA".to_string(), criteria.to_string()));
    }
    if let Some(parameter) = parameter {
        query.push(("PARAMETER".to_string(), parameter.to_string()));
    }
    debug!("Querying {} in {}", kind.segment(), region_name);
    dispatcher.get(session, &path, &query).await
}

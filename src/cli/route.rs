//! CLI route: single route table and run context. Dispatches to the
//! operations API and profile registry.

use crate::api;
use crate::cli::parse::{
    Cli, Commands, DefineCommands, DeleteCommands, GetCommands, InstallCommands,
    ProfileCommands, RefreshCommands,
};
use crate::client::{CmciDispatcher, CmciRestClient, CmciSession, Protocol};
use crate::define::{DefinitionParms, UriMapHandler};
use crate::error::CmciError;
use crate::profile::{CmciProfile, ProfileRegistry};
use crate::resource::ResourceKind;
use std::sync::Arc;

/// Connection parameters taken from the command line. Each field overrides
/// the corresponding profile value when set.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub profile: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub protocol: Option<String>,
    pub reject_unauthorized: Option<bool>,
    pub region_name: Option<String>,
    pub cics_plex: Option<String>,
}

impl ConnectionOverrides {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            profile: cli.profile.clone(),
            host: cli.host.clone(),
            port: cli.port,
            user: cli.user.clone(),
            password: cli.password.clone(),
            protocol: cli.protocol.clone(),
            reject_unauthorized: cli.reject_unauthorized,
            region_name: cli.region_name.clone(),
            cics_plex: cli.cics_plex.clone(),
        }
    }
}

/// Runtime context for CLI execution: profile registry, transport, and the
/// async runtime the dispatcher runs on.
pub struct RunContext {
    registry: ProfileRegistry,
    dispatcher: Arc<dyn CmciDispatcher>,
    runtime: tokio::runtime::Runtime,
    overrides: ConnectionOverrides,
}

impl RunContext {
    /// Create a run context with the REST dispatcher and stored profiles.
    pub fn new(overrides: ConnectionOverrides) -> Result<Self, CmciError> {
        let mut registry = ProfileRegistry::new();
        registry.load_from_xdg()?;
        Self::with_dispatcher(overrides, registry, Arc::new(CmciRestClient::new()))
    }

    /// Create a run context with a specific registry and dispatcher.
    pub fn with_dispatcher(
        overrides: ConnectionOverrides,
        registry: ProfileRegistry,
        dispatcher: Arc<dyn CmciDispatcher>,
    ) -> Result<Self, CmciError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CmciError::Config(format!("Failed to create async runtime: {}", e)))?;
        Ok(Self {
            registry,
            dispatcher,
            runtime,
            overrides,
        })
    }

    fn base_profile(&self) -> Result<Option<&CmciProfile>, CmciError> {
        match self.overrides.profile.as_deref() {
            Some(name) => self.registry.get_or_error(name).map(Some),
            None => Ok(self.registry.get("default")),
        }
    }

    /// Resolve the session: the selected profile's session is the base, flag
    /// overrides win field by field.
    fn resolve_session(&self) -> Result<CmciSession, CmciError> {
        let base = self.base_profile()?.map(CmciProfile::session);

        let host = self
            .overrides
            .host
            .clone()
            .or_else(|| base.as_ref().map(|s| s.host.clone()))
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| {
                CmciError::Config(
                    "CMCI host is required. Provide --host or a connection profile".to_string(),
                )
            })?;
        let user = self
            .overrides
            .user
            .clone()
            .or_else(|| base.as_ref().map(|s| s.user.clone()))
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                CmciError::Config(
                    "CMCI user is required. Provide --user or a connection profile".to_string(),
                )
            })?;
        let password = self
            .overrides
            .password
            .clone()
            .or_else(|| base.as_ref().map(|s| s.password.clone()))
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                CmciError::Config(
                    "CMCI password is required. Provide --password or a connection profile"
                        .to_string(),
                )
            })?;

        let protocol = match self.overrides.protocol.as_deref() {
            Some(p) => Protocol::parse(p)?,
            None => base.as_ref().map(|s| s.protocol).unwrap_or(Protocol::Https),
        };
        let port = self
            .overrides
            .port
            .or_else(|| base.as_ref().map(|s| s.port))
            .unwrap_or(1490);
        let reject_unauthorized = self
            .overrides
            .reject_unauthorized
            .or_else(|| base.as_ref().map(|s| s.reject_unauthorized))
            .unwrap_or(true);

        Ok(CmciSession {
            host,
            port,
            user,
            password,
            protocol,
            reject_unauthorized,
        })
    }

    /// Target region: flag override, then profile default. Empty when neither
    /// is set so the validator reports the missing field.
    fn resolve_region(&self) -> Result<String, CmciError> {
        let profile = self.base_profile()?;
        Ok(self
            .overrides
            .region_name
            .clone()
            .or_else(|| profile.and_then(|p| p.region_name.clone()))
            .unwrap_or_default())
    }

    fn resolve_plex(&self) -> Result<Option<String>, CmciError> {
        let profile = self.base_profile()?;
        Ok(self
            .overrides
            .cics_plex
            .clone()
            .or_else(|| profile.and_then(|p| p.cics_plex.clone()))
            .filter(|p| !p.trim().is_empty()))
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&mut self, command: &Commands) -> Result<String, CmciError> {
        match command {
            Commands::Define { command } => self.handle_define(command),
            Commands::Delete { command } => self.handle_delete(command),
            Commands::Install { command } => self.handle_install(command),
            Commands::Refresh { command } => self.handle_refresh(command),
            Commands::Get { command } => self.handle_get(command),
            Commands::Profile { command } => self.handle_profile(command),
        }
    }

    fn handle_define(&self, command: &DefineCommands) -> Result<String, CmciError> {
        let region_name = self.resolve_region()?;
        let parms = build_definition_parms(command, region_name);
        let session = self.resolve_session()?;
        let cics_plex = self.resolve_plex()?;

        self.runtime.block_on(api::define_resource(
            self.dispatcher.as_ref(),
            &session,
            &parms,
            cics_plex.as_deref(),
        ))?;

        Ok(super::format_success(&format!(
            "CICS {} {} defined successfully in CSD group {}",
            parms.kind().display_name(),
            parms.name(),
            parms.csd_group()
        )))
    }

    fn handle_delete(&self, command: &DeleteCommands) -> Result<String, CmciError> {
        let (kind, name, csd_group) = match command {
            DeleteCommands::Program { name, csd_group } => {
                (ResourceKind::ProgramDefinition, name, csd_group)
            }
            DeleteCommands::Transaction { name, csd_group } => {
                (ResourceKind::TransactionDefinition, name, csd_group)
            }
            DeleteCommands::Urimap { name, csd_group } => {
                (ResourceKind::UriMapDefinition, name, csd_group)
            }
            DeleteCommands::Webservice { name, csd_group } => {
                (ResourceKind::WebServiceDefinition, name, csd_group)
            }
            DeleteCommands::Pipeline { name, csd_group } => {
                (ResourceKind::PipelineDefinition, name, csd_group)
            }
        };
        let session = self.resolve_session()?;
        let region_name = self.resolve_region()?;
        let cics_plex = self.resolve_plex()?;

        self.runtime.block_on(api::delete_resource(
            self.dispatcher.as_ref(),
            &session,
            kind,
            name,
            csd_group,
            &region_name,
            cics_plex.as_deref(),
        ))?;

        Ok(super::format_success(&format!(
            "CICS {} {} deleted successfully from CSD group {}",
            kind.display_name(),
            name,
            csd_group
        )))
    }

    fn handle_install(&self, command: &InstallCommands) -> Result<String, CmciError> {
        let (kind, name, csd_group) = match command {
            InstallCommands::Program { name, csd_group } => {
                (ResourceKind::ProgramDefinition, name, csd_group)
            }
            InstallCommands::Transaction { name, csd_group } => {
                (ResourceKind::TransactionDefinition, name, csd_group)
            }
            InstallCommands::Urimap { name, csd_group } => {
                (ResourceKind::UriMapDefinition, name, csd_group)
            }
            InstallCommands::Webservice { name, csd_group } => {
                (ResourceKind::WebServiceDefinition, name, csd_group)
            }
            InstallCommands::Pipeline { name, csd_group } => {
                (ResourceKind::PipelineDefinition, name, csd_group)
            }
        };
        let session = self.resolve_session()?;
        let region_name = self.resolve_region()?;
        let cics_plex = self.resolve_plex()?;

        self.runtime.block_on(api::install_resource(
            self.dispatcher.as_ref(),
            &session,
            kind,
            name,
            csd_group,
            &region_name,
            cics_plex.as_deref(),
        ))?;

        Ok(super::format_success(&format!(
            "CICS {} {} installed successfully from CSD group {}",
            kind.display_name(),
            name,
            csd_group
        )))
    }

    fn handle_refresh(&self, command: &RefreshCommands) -> Result<String, CmciError> {
        match command {
            RefreshCommands::Program { name } => {
                let session = self.resolve_session()?;
                let region_name = self.resolve_region()?;
                let cics_plex = self.resolve_plex()?;

                self.runtime.block_on(api::refresh_program(
                    self.dispatcher.as_ref(),
                    &session,
                    name,
                    &region_name,
                    cics_plex.as_deref(),
                ))?;

                Ok(super::format_success(&format!(
                    "New copy of program {} requested successfully",
                    name
                )))
            }
        }
    }

    fn handle_get(&self, command: &GetCommands) -> Result<String, CmciError> {
        match command {
            GetCommands::Resource {
                resource,
                criteria,
                parameter,
                format,
            } => {
                let kind = ResourceKind::parse_query_kind(resource).ok_or_else(|| {
                    CmciError::Config(format!(
                        "Unknown resource kind: '{}' (expected program, transaction, urimap, webservice, or pipeline)",
                        resource
                    ))
                })?;
                let session = self.resolve_session()?;
                let region_name = self.resolve_region()?;
                let cics_plex = self.resolve_plex()?;

                let response = self.runtime.block_on(api::get_resources(
                    self.dispatcher.as_ref(),
                    &session,
                    kind,
                    &region_name,
                    cics_plex.as_deref(),
                    criteria.as_deref(),
                    parameter.as_deref(),
                ))?;

                let records = response.records(kind);
                match format.as_str() {
                    "json" => super::format_records_json(&records),
                    "table" => Ok(super::format_records_table(&records)),
                    other => Err(CmciError::Config(format!(
                        "Invalid format: '{}'. Must be 'table' or 'json'.",
                        other
                    ))),
                }
            }
        }
    }

    fn handle_profile(&mut self, command: &ProfileCommands) -> Result<String, CmciError> {
        match command {
            ProfileCommands::Create {
                name,
                non_interactive,
            } => self.handle_profile_create(name, *non_interactive),
            ProfileCommands::List { format } => self.handle_profile_list(format),
            ProfileCommands::Show { name } => self.handle_profile_show(name),
            ProfileCommands::Remove { name, force } => {
                self.handle_profile_remove(name, *force)
            }
        }
    }

    fn handle_profile_create(
        &mut self,
        name: &str,
        non_interactive: bool,
    ) -> Result<String, CmciError> {
        let profile = if non_interactive {
            self.profile_from_flags()?
        } else {
            self.create_profile_interactive()?
        };

        self.registry.save_profile(name, &profile)?;
        let path = self.registry.profile_path(name)?;
        Ok(format!(
            "Profile created: {}\nConfiguration file: {}",
            name,
            path.display()
        ))
    }

    fn profile_from_flags(&self) -> Result<CmciProfile, CmciError> {
        let host = self.overrides.host.clone().ok_or_else(|| {
            CmciError::Config("Host is required in non-interactive mode. Use --host".to_string())
        })?;
        let user = self.overrides.user.clone().ok_or_else(|| {
            CmciError::Config("User is required in non-interactive mode. Use --user".to_string())
        })?;
        let password = self.overrides.password.clone().ok_or_else(|| {
            CmciError::Config(
                "Password is required in non-interactive mode. Use --password".to_string(),
            )
        })?;
        let protocol = match self.overrides.protocol.as_deref() {
            Some(p) => Protocol::parse(p)?,
            None => Protocol::Https,
        };

        Ok(CmciProfile {
            host,
            port: self.overrides.port.unwrap_or(1490),
            user,
            password,
            protocol,
            reject_unauthorized: self.overrides.reject_unauthorized.unwrap_or(true),
            region_name: self.overrides.region_name.clone(),
            cics_plex: self.overrides.cics_plex.clone(),
        })
    }

    fn create_profile_interactive(&self) -> Result<CmciProfile, CmciError> {
        use dialoguer::{Input, Password, Select};

        let input_error =
            |e: dialoguer::Error| CmciError::Config(format!("Failed to get user input: {}", e));

        let mut host_input = Input::new().with_prompt("CMCI host");
        if let Some(ref host) = self.overrides.host {
            host_input = host_input.default(host.clone());
        }
        let host: String = host_input.interact_text().map_err(input_error)?;

        let port: u16 = Input::new()
            .with_prompt("CMCI port")
            .default(self.overrides.port.unwrap_or(1490))
            .interact_text()
            .map_err(input_error)?;

        let mut user_input = Input::new().with_prompt("User ID");
        if let Some(ref user) = self.overrides.user {
            user_input = user_input.default(user.clone());
        }
        let user: String = user_input.interact_text().map_err(input_error)?;

        let password: String = Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(input_error)?;

        let protocol_selection = Select::new()
            .with_prompt("Protocol")
            .items(&["https", "http"])
            .default(0)
            .interact()
            .map_err(input_error)?;
        let protocol = match protocol_selection {
            0 => Protocol::Https,
            1 => Protocol::Http,
            _ => unreachable!(),
        };

        let region_name: String = Input::new()
            .with_prompt("Default region name (optional, press Enter to skip)")
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        let cics_plex: String = Input::new()
            .with_prompt("CICSplex (optional, press Enter to skip)")
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        Ok(CmciProfile {
            host,
            port,
            user,
            password,
            protocol,
            reject_unauthorized: self.overrides.reject_unauthorized.unwrap_or(true),
            region_name: if region_name.is_empty() {
                None
            } else {
                Some(region_name)
            },
            cics_plex: if cics_plex.is_empty() {
                None
            } else {
                Some(cics_plex)
            },
        })
    }

    fn handle_profile_list(&self, format: &str) -> Result<String, CmciError> {
        let names = self.registry.list_names();
        if names.is_empty() {
            return Ok("No profiles found.".to_string());
        }

        if format == "json" {
            let entries: Vec<serde_json::Value> = names
                .iter()
                .filter_map(|name| self.registry.get(name).map(|p| (name, p)))
                .map(|(name, p)| {
                    serde_json::json!({
                        "name": name,
                        "host": p.host,
                        "port": p.port,
                        "protocol": p.protocol.as_str(),
                        "region_name": p.region_name,
                        "cics_plex": p.cics_plex,
                    })
                })
                .collect();
            return serde_json::to_string_pretty(&entries)
                .map_err(|e| CmciError::Config(format!("Failed to serialize profiles: {}", e)));
        }

        use comfy_table::Table;
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Name", "Host", "Port", "Protocol", "Region", "Plex"]);
        for name in &names {
            if let Some(profile) = self.registry.get(name) {
                table.add_row(vec![
                    name.clone(),
                    profile.host.clone(),
                    profile.port.to_string(),
                    profile.protocol.as_str().to_string(),
                    profile.region_name.clone().unwrap_or_default(),
                    profile.cics_plex.clone().unwrap_or_default(),
                ]);
            }
        }
        Ok(table.to_string())
    }

    fn handle_profile_show(&self, name: &str) -> Result<String, CmciError> {
        let profile = self.registry.get_or_error(name)?;
        let path = self.registry.profile_path(name)?;
        let mut output = format!(
            "Profile: {}\nConfiguration file: {}\n  host: {}\n  port: {}\n  user: {}\n  password: ********\n  protocol: {}\n  reject_unauthorized: {}",
            name,
            path.display(),
            profile.host,
            profile.port,
            profile.user,
            profile.protocol.as_str(),
            profile.reject_unauthorized
        );
        if let Some(ref region) = profile.region_name {
            output.push_str(&format!("\n  region_name: {}", region));
        }
        if let Some(ref plex) = profile.cics_plex {
            output.push_str(&format!("\n  cics_plex: {}", plex));
        }
        Ok(output)
    }

    fn handle_profile_remove(&mut self, name: &str, force: bool) -> Result<String, CmciError> {
        self.registry.get_or_error(name)?;

        if !force {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Remove profile '{}'?", name))
                .interact()
                .map_err(|e| CmciError::Config(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Removal cancelled".to_string());
            }
        }

        self.registry.delete_profile(name)?;
        Ok(format!("Removed profile: {}", name))
    }
}

fn build_definition_parms(command: &DefineCommands, region_name: String) -> DefinitionParms {
    match command {
        DefineCommands::Program {
            name,
            csd_group,
            description,
        } => DefinitionParms::Program {
            name: name.clone(),
            csd_group: csd_group.clone(),
            region_name,
            description: description.clone(),
        },
        DefineCommands::Transaction {
            name,
            csd_group,
            program,
            description,
        } => DefinitionParms::Transaction {
            name: name.clone(),
            program_name: program.clone(),
            csd_group: csd_group.clone(),
            region_name,
            description: description.clone(),
        },
        DefineCommands::UrimapServer {
            name,
            csd_group,
            urimap_path,
            urimap_host,
            program,
            scheme,
            tcpip_service,
            description,
        } => DefinitionParms::UriMap {
            name: name.clone(),
            csd_group: csd_group.clone(),
            path: urimap_path.clone(),
            host: urimap_host.clone(),
            region_name,
            handler: UriMapHandler::Server {
                program_name: program.clone(),
                scheme: scheme.clone(),
            },
            tcpip_service: tcpip_service.clone(),
            description: description.clone(),
        },
        DefineCommands::UrimapPipeline {
            name,
            csd_group,
            urimap_path,
            urimap_host,
            pipeline,
            scheme,
            transaction,
            webservice,
            tcpip_service,
            description,
        } => DefinitionParms::UriMap {
            name: name.clone(),
            csd_group: csd_group.clone(),
            path: urimap_path.clone(),
            host: urimap_host.clone(),
            region_name,
            handler: UriMapHandler::Pipeline {
                pipeline_name: pipeline.clone(),
                scheme: scheme.clone(),
                transaction_name: transaction.clone(),
                webservice_name: webservice.clone(),
            },
            tcpip_service: tcpip_service.clone(),
            description: description.clone(),
        },
        DefineCommands::Webservice {
            name,
            csd_group,
            pipeline,
            wsbind,
            validation,
            description,
        } => DefinitionParms::WebService {
            name: name.clone(),
            csd_group: csd_group.clone(),
            pipeline_name: pipeline.clone(),
            wsbind: wsbind.clone(),
            region_name,
            validation: *validation,
            description: description.clone(),
        },
        DefineCommands::Pipeline {
            name,
            csd_group,
            config_file,
            description,
        } => DefinitionParms::Pipeline {
            name: name.clone(),
            csd_group: csd_group.clone(),
            config_file: config_file.clone(),
            region_name,
            description: description.clone(),
        },
    }
}

//! CLI parse: clap types for cicsctl. No behavior; definitions only.

use clap::{Parser, Subcommand};

/// cicsctl - manage CICS resources over the CMCI REST API
#[derive(Debug, Parser)]
#[command(name = "cicsctl")]
#[command(about = "Define, query, and manage CICS resources over the CMCI REST API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Connection profile name (defaults to 'default' when present)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// CMCI host name (overrides profile)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// CMCI port (overrides profile)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// User ID for basic authentication (overrides profile)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Password for basic authentication (overrides profile)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Transport protocol: http or https (overrides profile)
    #[arg(long, global = true)]
    pub protocol: Option<String>,

    /// Reject invalid TLS certificates (set false for self-signed test regions)
    #[arg(long, global = true)]
    pub reject_unauthorized: Option<bool>,

    /// Target CICS region name (overrides profile default)
    #[arg(long, global = true)]
    pub region_name: Option<String>,

    /// CICSplex to route requests through (for managed regions)
    #[arg(long, global = true)]
    pub cics_plex: Option<String>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create resource definitions in the CSD
    Define {
        #[command(subcommand)]
        command: DefineCommands,
    },
    /// Delete resource definitions from the CSD
    Delete {
        #[command(subcommand)]
        command: DeleteCommands,
    },
    /// Install CSD definitions into the target region
    Install {
        #[command(subcommand)]
        command: InstallCommands,
    },
    /// Refresh installed resources
    Refresh {
        #[command(subcommand)]
        command: RefreshCommands,
    },
    /// Query resources in the target region
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },
    /// Manage connection profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum DefineCommands {
    /// Define a program
    Program {
        /// Program name (up to 8 characters)
        name: String,
        /// CSD group for the definition
        csd_group: String,
        /// Description recorded on the definition
        #[arg(long)]
        description: Option<String>,
    },
    /// Define a transaction
    Transaction {
        /// Transaction name (up to 4 characters)
        name: String,
        /// CSD group for the definition
        csd_group: String,
        /// Program the transaction invokes
        #[arg(long)]
        program: String,
        /// Description recorded on the definition
        #[arg(long)]
        description: Option<String>,
    },
    /// Define a URIMap that maps requests to a program
    UrimapServer {
        /// URIMap name (up to 8 characters)
        name: String,
        /// CSD group for the definition
        csd_group: String,
        /// URI path the map matches
        #[arg(long)]
        urimap_path: String,
        /// Host the map matches
        #[arg(long)]
        urimap_host: String,
        /// Application program that services matching requests
        #[arg(long)]
        program: String,
        /// URI scheme (http or https)
        #[arg(long, default_value = "http", value_parser = ["http", "https"])]
        scheme: String,
        /// TCPIPSERVICE the map applies to
        #[arg(long)]
        tcpip_service: Option<String>,
        /// Description recorded on the definition
        #[arg(long)]
        description: Option<String>,
    },
    /// Define a URIMap that routes requests into a pipeline
    UrimapPipeline {
        /// URIMap name (up to 8 characters)
        name: String,
        /// CSD group for the definition
        csd_group: String,
        /// URI path the map matches
        #[arg(long)]
        urimap_path: String,
        /// Host the map matches
        #[arg(long)]
        urimap_host: String,
        /// Pipeline that services matching requests
        #[arg(long)]
        pipeline: String,
        /// URI scheme (http or https)
        #[arg(long, value_parser = ["http", "https"])]
        scheme: Option<String>,
        /// Transaction under which the pipeline runs
        #[arg(long)]
        transaction: Option<String>,
        /// Web service the pipeline targets
        #[arg(long)]
        webservice: Option<String>,
        /// TCPIPSERVICE the map applies to
        #[arg(long)]
        tcpip_service: Option<String>,
        /// Description recorded on the definition
        #[arg(long)]
        description: Option<String>,
    },
    /// Define a web service
    Webservice {
        /// Web service name (up to 8 characters)
        name: String,
        /// CSD group for the definition
        csd_group: String,
        /// Pipeline the web service uses
        #[arg(long)]
        pipeline: String,
        /// zFS path to the web service binding file
        #[arg(long)]
        wsbind: String,
        /// Enable full SOAP message validation
        #[arg(long)]
        validation: bool,
        /// Description recorded on the definition
        #[arg(long)]
        description: Option<String>,
    },
    /// Define a pipeline
    Pipeline {
        /// Pipeline name (up to 8 characters)
        name: String,
        /// CSD group for the definition
        csd_group: String,
        /// zFS path to the pipeline configuration file
        #[arg(long)]
        config_file: String,
        /// Description recorded on the definition
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeleteCommands {
    /// Delete a program definition
    Program {
        /// Program name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Delete a transaction definition
    Transaction {
        /// Transaction name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Delete a URIMap definition
    Urimap {
        /// URIMap name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Delete a web service definition
    Webservice {
        /// Web service name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Delete a pipeline definition
    Pipeline {
        /// Pipeline name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum InstallCommands {
    /// Install a program definition
    Program {
        /// Program name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Install a transaction definition
    Transaction {
        /// Transaction name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Install a URIMap definition
    Urimap {
        /// URIMap name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Install a web service definition
    Webservice {
        /// Web service name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
    /// Install a pipeline definition
    Pipeline {
        /// Pipeline name
        name: String,
        /// CSD group holding the definition
        csd_group: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RefreshCommands {
    /// Phase in a new copy of an installed program
    Program {
        /// Program name
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum GetCommands {
    /// List resources of a kind in the target region
    Resource {
        /// Resource kind (program, transaction, urimap, webservice, pipeline)
        resource: String,
        /// Raw CMCI CRITERIA filter expression (e.g. 'PROGRAM=PGM*')
        #[arg(long)]
        criteria: Option<String>,
        /// Raw CMCI PARAMETER expression (e.g. 'CSDGROUP(GRP1)')
        #[arg(long)]
        parameter: Option<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Create a connection profile
    Create {
        /// Profile name
        name: String,
        /// Use non-interactive mode (use flags)
        #[arg(long)]
        non_interactive: bool,
    },
    /// List stored profiles
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show profile details (password is masked)
    Show {
        /// Profile name
        name: String,
    },
    /// Remove a stored profile
    Remove {
        /// Profile name
        name: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

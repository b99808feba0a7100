//! OpenAPI CRUD CLI
//!
//! Command-line interface for inspecting resource schemas, resolving
//! resource URLs and calling the described API.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use openapi_crud::{
    derive_data_source_view, derive_resource_view, load_json, load_json_auto, resolve_identifier,
    resolve_resource_url, resolve_status, ApiKeyAuthenticator, Client, Operation,
    ProviderConfiguration, ReqwestTransport, ResourceDescriptor, SchemaDefinition, StaticBackend,
};

#[derive(Parser)]
#[command(name = "openapi-crud")]
#[command(about = "Inspect resource schemas and call OpenAPI described resources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the view derived from a schema definition
    View {
        /// Schema definition: file path or URL (http:// or https://)
        definition: String,

        /// Derive the read-only data-source view instead of the resource view
        #[arg(long)]
        data_source: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the identifier property and status path of a schema definition
    Identify {
        /// Schema definition: file path or URL (http:// or https://)
        definition: String,
    },

    /// Print the URL of a resource collection or instance
    Url {
        /// Resource descriptor: file path or URL (http:// or https://)
        resource: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Region of a multi-region backend (default region if omitted)
        #[arg(long)]
        region: Option<String>,
    },

    /// Call an operation of a resource and print the response body
    Call {
        /// Operation to perform
        #[arg(value_enum)]
        operation: Verb,

        /// Resource descriptor: file path or URL (http:// or https://)
        resource: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Provider configuration (header values, region)
        #[arg(long)]
        provider: Option<String>,

        /// API keys keyed by security scheme name
        #[arg(long)]
        auth: Option<String>,

        /// Request body for create and update
        #[arg(long)]
        payload: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(clap::Args)]
struct TargetArgs {
    /// Backend configuration (schemes, host, basePath, regions)
    #[arg(long)]
    backend: String,

    /// Parent resource IDs, in path order
    #[arg(long = "parent-id")]
    parent_ids: Vec<String>,

    /// Instance ID
    #[arg(long)]
    id: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Verb {
    Get,
    List,
    Create,
    Update,
    Delete,
}

impl From<Verb> for Operation {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Operation::Read,
            Verb::List => Operation::List,
            Verb::Create => Operation::Create,
            Verb::Update => Operation::Update,
            Verb::Delete => Operation::Delete,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::View {
            definition,
            data_source,
            pretty,
        } => run_view(&definition, data_source, pretty),

        Commands::Identify { definition } => run_identify(&definition),

        Commands::Url {
            resource,
            target,
            region,
        } => run_url(&resource, &target, region.as_deref()),

        Commands::Call {
            operation,
            resource,
            target,
            provider,
            auth,
            payload,
            pretty,
        } => run_call(CallArgs {
            operation: operation.into(),
            resource,
            target,
            provider,
            auth,
            payload,
            pretty,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_view(source: &str, data_source: bool, pretty: bool) -> Result<(), u8> {
    let definition: SchemaDefinition = load(source)?;

    let view = if data_source {
        derive_data_source_view(&definition)
    } else {
        derive_resource_view(&definition)
    }
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    print_json(&view, pretty)
}

#[derive(Serialize)]
struct Identification<'a> {
    identifier: &'a str,
    status: Option<Vec<String>>,
}

fn run_identify(source: &str) -> Result<(), u8> {
    let definition: SchemaDefinition = load(source)?;

    let identifier = resolve_identifier(&definition).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let status = match resolve_status(&definition) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    print_json(&Identification { identifier, status }, false)
}

fn run_url(source: &str, target: &TargetArgs, region: Option<&str>) -> Result<(), u8> {
    let resource: ResourceDescriptor = load(source)?;
    let backend: StaticBackend = load(&target.backend)?;

    let url = resolve_resource_url(
        &resource,
        &backend,
        region,
        &target.parent_ids,
        target.id.as_deref(),
    )
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", url);
    Ok(())
}

struct CallArgs {
    operation: Operation,
    resource: String,
    target: TargetArgs,
    provider: Option<String>,
    auth: Option<String>,
    payload: Option<PathBuf>,
    pretty: bool,
}

fn run_call(args: CallArgs) -> Result<(), u8> {
    let CallArgs {
        operation,
        resource,
        target,
        provider,
        auth,
        payload,
        pretty,
    } = args;

    let resource: ResourceDescriptor = load(&resource)?;
    let backend: StaticBackend = load(&target.backend)?;
    let provider: ProviderConfiguration = match provider {
        Some(source) => load(&source)?,
        None => ProviderConfiguration::default(),
    };
    let authenticator: ApiKeyAuthenticator = match auth {
        Some(source) => load(&source)?,
        None => ApiKeyAuthenticator::new(),
    };
    let payload: Option<Value> = match payload {
        Some(path) => Some(load_json(&path).map_err(|e| {
            eprintln!("Error loading payload: {}", e);
            e.exit_code() as u8
        })?),
        None => None,
    };

    let transport = ReqwestTransport::new().map_err(|e| {
        eprintln!("Error: {}", e);
        3u8
    })?;
    let client = Client::new(&backend, &transport)
        .with_authenticator(&authenticator)
        .with_provider(provider);

    let response = client
        .call(
            operation,
            &resource,
            &target.parent_ids,
            target.id.as_deref(),
            payload.as_ref(),
        )
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    match response.payload {
        Some(body) => print_json(&body, pretty),
        None => Ok(()),
    }
}

fn load<T: serde::de::DeserializeOwned>(source: &str) -> Result<T, u8> {
    load_json_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), u8> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    println!("{}", output);
    Ok(())
}

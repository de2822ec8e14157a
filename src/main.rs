use clap::{Parser, Subcommand};
use dataplat_client::db::SessionStorage;
use dataplat_client::types::{
    ConnectionCreate, ConnectionTest, ConnectionUpdate, DbType, LoginRequest, Pagination,
    TableQuery,
};
use dataplat_client::{ApiClient, Config, DataplatError, Session};
use mimalloc::MiMalloc;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "dataplat")]
#[command(about = "Command-line client for the data platform backend")]
struct Cli {
    /// Backend base URL (overrides BACKEND_URL / DATAPLAT_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<url::Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the access token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "DATAPLAT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the authenticated user
    Whoami,
    /// Forget the stored access token
    Logout,
    /// Manage data connections
    #[command(subcommand)]
    Connections(ConnectionsCommand),
    /// Browse registered metadata tables
    #[command(subcommand)]
    Metadata(MetadataCommand),
}

#[derive(clap::Args)]
struct ConnectionArgs {
    #[arg(long)]
    db_type: DbType,
    #[arg(long)]
    host: String,
    /// Defaults to the engine's standard port
    #[arg(long)]
    port: Option<u16>,
    #[arg(long, default_value = "")]
    database: String,
    #[arg(long)]
    username: String,
    #[arg(long, env = "DATAPLAT_DB_PASSWORD", hide_env_values = true)]
    db_password: String,
}

#[derive(Subcommand)]
enum ConnectionsCommand {
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    Get {
        id: Uuid,
    },
    Test {
        #[command(flatten)]
        args: ConnectionArgs,
    },
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        args: ConnectionArgs,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        database: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Leave unset to keep the stored password
        #[arg(long)]
        db_password: Option<String>,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum MetadataCommand {
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    Get {
        id: Uuid,
    },
    Query {
        table_name: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(url) = cli.backend_url {
        cfg.backend_url = url;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        backend_url = %cfg.backend_url,
        timeout_ms = cfg.request_timeout_ms,
        session_db = %cfg.session_db,
        loglevel = %cfg.loglevel
    );

    let storage = SessionStorage::connect(&cfg.session_db).await?;
    let session = Session::open(storage).await?;
    let client = ApiClient::with_tracing(&cfg, session)?;

    run(&client, cli.command).await?;
    Ok(())
}

async fn run(client: &ApiClient, command: Command) -> Result<(), DataplatError> {
    match command {
        Command::Login { username, password } => {
            let token = client
                .auth()
                .login(&LoginRequest::new(username, password))
                .await?;
            println!("logged in ({} token stored)", token.token_type);
        }
        Command::Whoami => print_json(&client.auth().current_user().await?)?,
        Command::Logout => {
            client.auth().logout().await;
            println!("logged out");
        }
        Command::Connections(cmd) => run_connections(client, cmd).await?,
        Command::Metadata(cmd) => run_metadata(client, cmd).await?,
    }
    Ok(())
}

async fn run_connections(client: &ApiClient, cmd: ConnectionsCommand) -> Result<(), DataplatError> {
    let api = client.connections();
    match cmd {
        ConnectionsCommand::List { skip, limit } => {
            print_json(&api.list(Pagination::new(skip, limit)).await?)?
        }
        ConnectionsCommand::Get { id } => print_json(&api.get(id).await?)?,
        ConnectionsCommand::Test { args } => {
            let test = ConnectionTest {
                db_type: args.db_type,
                host: args.host,
                port: args.port.unwrap_or_else(|| args.db_type.default_port()),
                database: Some(args.database).filter(|d| !d.is_empty()),
                username: args.username,
                password: args.db_password,
            };
            let result = api.test(&test).await?;
            println!("{}", result.summary());
        }
        ConnectionsCommand::Create { name, args } => {
            let create = ConnectionCreate {
                name,
                db_type: args.db_type,
                host: args.host,
                port: args.port.unwrap_or_else(|| args.db_type.default_port()),
                database: args.database,
                username: args.username,
                password: args.db_password,
            };
            print_json(&api.create(&create).await?)?
        }
        ConnectionsCommand::Update {
            id,
            name,
            host,
            port,
            database,
            username,
            db_password,
        } => {
            let update = ConnectionUpdate {
                name,
                db_type: None,
                host,
                port,
                database,
                username,
                password: db_password,
            };
            print_json(&api.update(id, &update).await?)?
        }
        ConnectionsCommand::Delete { id } => {
            api.delete(id).await?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

async fn run_metadata(client: &ApiClient, cmd: MetadataCommand) -> Result<(), DataplatError> {
    let api = client.metadata();
    match cmd {
        MetadataCommand::List { skip, limit } => {
            print_json(&api.list_tables(Pagination::new(skip, limit)).await?)?
        }
        MetadataCommand::Get { id } => print_json(&api.get_table(id).await?)?,
        MetadataCommand::Query {
            table_name,
            page,
            page_size,
        } => {
            let query = TableQuery::default().page(page, page_size);
            print_json(&api.query_table(&table_name, &query).await?)?
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), DataplatError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

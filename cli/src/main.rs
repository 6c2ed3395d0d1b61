use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use carsales::api;
use carsales::client::ClientError;
use carsales::config::{ClientConfig, ClientVariant, ConfigError, normalize_base_url};
use carsales::notify::Notifier;
use carsales::pipeline::transport::BuildError;
use carsales::routes::{Navigation, RouteError};
use carsales::{ApiError, DealerClient};
use clap::{Args, Parser, Subcommand};
use envelope::{CarQuery, CarStatus, CustomerQuery, OrderCreateRequest, OrderQuery, OrderStatus};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Already shown to the user by the notifier.
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("login required to open {0}; run `carsales login` first")]
    LoginRequired(String),
    #[error("missing password; pass --password or set CARSALES_PASSWORD")]
    MissingPassword,
    #[error("invalid {field}: {value}")]
    InvalidArg { field: &'static str, value: String },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for CliError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Api(e) => Self::Api(e),
            ClientError::Route(e) => Self::Route(e),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "carsales", about = "Car dealership client")]
struct Cli {
    /// Presentation client to behave as: desktop or mobile.
    #[arg(long, env = "CARSALES_CLIENT")]
    client: Option<String>,

    #[arg(long, env = "CARSALES_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "CARSALES_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CARSALES_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    /// Show the current profile.
    Whoami {
        /// Reload the profile from the backend first.
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Navigate to a route path and print where the guard lets you land.
    Open { path: String },
    Cars(CarsCommand),
    Customers(CustomersCommand),
    Orders(OrdersCommand),
    Dashboard,
    Salespersons,
    Stats(StatsCommand),
}

#[derive(Args, Debug)]
struct CarsCommand {
    #[command(subcommand)]
    command: CarsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CarsSubcommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        brand: Option<String>,
        /// 0 in stock, 1 locked, 2 sold.
        #[arg(long)]
        status: Option<i64>,
    },
    Get {
        id: i64,
    },
    Delete {
        id: i64,
    },
    /// Download the inventory spreadsheet.
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        brand: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CustomersCommand {
    #[command(subcommand)]
    command: CustomersSubcommand,
}

#[derive(Subcommand, Debug)]
enum CustomersSubcommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Get {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrdersSubcommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// 1 completed, 2 cancelled.
        #[arg(long)]
        status: Option<i64>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        customer_id: i64,
        #[arg(long)]
        car_id: i64,
        #[arg(long)]
        original_price: f64,
        #[arg(long, default_value_t = 0.0)]
        discount: f64,
        /// `YYYY-MM-DD`.
        #[arg(long)]
        order_date: String,
        #[arg(long)]
        remark: Option<String>,
    },
}

#[derive(Args, Debug)]
struct StatsCommand {
    #[command(subcommand)]
    command: StatsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StatsSubcommand {
    Sales {
        #[arg(long)]
        brand: Option<String>,
    },
    Trend {
        /// `YYYY-MM`.
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 10)]
    size: u32,
}

// =============================================================================
// PAGES
// =============================================================================

/// Screens the commands load, mapped onto each variant's route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Dashboard,
    Cars,
    CarDetail(i64),
    Customers,
    CustomerDetail(i64),
    Orders,
    OrderDetail(i64),
    OrderCreate,
    Profile,
}

impl Page {
    fn path(self, variant: ClientVariant) -> String {
        match (variant, self) {
            (ClientVariant::Desktop, Self::Dashboard | Self::Profile) => "/dashboard".to_owned(),
            (ClientVariant::Desktop, Self::Cars | Self::CarDetail(_)) => "/cars".to_owned(),
            (ClientVariant::Desktop, Self::Customers | Self::CustomerDetail(_)) => "/customers".to_owned(),
            (ClientVariant::Desktop, Self::Orders | Self::OrderDetail(_)) => "/orders".to_owned(),
            (ClientVariant::Desktop, Self::OrderCreate) => "/orders/create".to_owned(),
            (ClientVariant::Mobile, Self::Dashboard) => "/home".to_owned(),
            (ClientVariant::Mobile, Self::Cars) => "/car/list".to_owned(),
            (ClientVariant::Mobile, Self::CarDetail(id)) => format!("/car/detail/{id}"),
            (ClientVariant::Mobile, Self::Customers) => "/customer/list".to_owned(),
            (ClientVariant::Mobile, Self::CustomerDetail(id)) => format!("/customer/detail/{id}"),
            (ClientVariant::Mobile, Self::Orders) => "/order/list".to_owned(),
            (ClientVariant::Mobile, Self::OrderDetail(id)) => format!("/order/detail/{id}"),
            (ClientVariant::Mobile, Self::OrderCreate) => "/order/create".to_owned(),
            (ClientVariant::Mobile, Self::Profile) => "/profile".to_owned(),
        }
    }
}

/// Enter `page` through the guard. Only a page that was actually entered
/// gets loaded, so a redirect to login stops the command here.
fn enter(client: &DealerClient, page: Page) -> Result<Navigation, CliError> {
    let path = page.path(client.variant());
    let nav = client.navigate(&path)?;
    if nav.was_redirected() && client.router().table().is_login(&nav.location.path) {
        return Err(CliError::LoginRequired(path));
    }
    Ok(nav)
}

// =============================================================================
// NOTIFIER
// =============================================================================

/// Prints failures to stderr the way each presentation client shows them.
struct StderrNotifier {
    variant: ClientVariant,
}

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        eprintln!("{}", render_notification(self.variant, message));
    }
}

fn render_notification(variant: ClientVariant, message: &str) -> String {
    match variant {
        ClientVariant::Desktop => format!("[message] error: {message}"),
        ClientVariant::Mobile => format!("[toast] {message}"),
    }
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // The notifier has already reported it.
        Err(CliError::Api(e)) => {
            tracing::debug!(code = e.error_code(), error = %e, "command failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(raw) = &cli.client {
        config.variant = ClientVariant::parse(raw)?;
    }
    if let Some(raw) = &cli.base_url {
        config.base_url = normalize_base_url(raw)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file.clone_from(path);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let notifier = Arc::new(StderrNotifier { variant: config.variant });
    let client = DealerClient::from_config(&config, notifier)?;

    match cli.command {
        Command::Login { username, password } => {
            let password = password.ok_or(CliError::MissingPassword)?;
            let nav = client.login(&username, &password).await?;
            let name = client.session().user_info().map(|u| u.display_name().to_owned()).unwrap_or(username);
            println!("logged in as {name}; now at {}", nav.location.path);
            Ok(())
        }
        Command::Logout => {
            let nav = client.logout().await?;
            println!("logged out; now at {}", nav.location.path);
            Ok(())
        }
        Command::Whoami { refresh } => {
            enter(&client, Page::Profile)?;
            let user = if refresh { Some(client.refresh_profile().await?) } else { client.session().user_info() };
            match user {
                Some(user) => print_json(&user),
                None => {
                    println!("authenticated, profile not loaded; run `carsales whoami --refresh`");
                    Ok(())
                }
            }
        }
        Command::Open { path } => {
            let nav = client.navigate(&path)?;
            print_json(&serde_json::json!({
                "requested": nav.requested,
                "path": nav.location.path,
                "route": nav.location.name,
                "params": nav.location.params,
                "redirectedFrom": nav.redirected_from,
            }))
        }
        Command::Cars(cars) => run_cars(&client, cars).await,
        Command::Customers(customers) => run_customers(&client, customers).await,
        Command::Orders(orders) => run_orders(&client, orders).await,
        Command::Dashboard => {
            enter(&client, Page::Dashboard)?;
            print_json(&api::statistics::dashboard(client.pipeline()).await?)
        }
        Command::Salespersons => {
            enter(&client, Page::Orders)?;
            print_json(&api::auth::salespersons(client.pipeline()).await?)
        }
        Command::Stats(stats) => {
            enter(&client, Page::Dashboard)?;
            match stats.command {
                StatsSubcommand::Sales { brand } => {
                    print_json(&api::statistics::sales(client.pipeline(), brand.as_deref()).await?)
                }
                StatsSubcommand::Trend { start, end } => print_json(
                    &api::statistics::trend(client.pipeline(), start.as_deref(), end.as_deref()).await?,
                ),
            }
        }
    }
}

async fn run_cars(client: &DealerClient, cars: CarsCommand) -> Result<(), CliError> {
    let pipeline = client.pipeline();
    match cars.command {
        CarsSubcommand::List { page, brand, status } => {
            enter(client, Page::Cars)?;
            let status = status.map(parse_car_status).transpose()?;
            let query = CarQuery { page_num: page.page, page_size: page.size, brand, status, ..CarQuery::default() };
            print_json(&api::cars::list(pipeline, &query).await?)
        }
        CarsSubcommand::Get { id } => {
            enter(client, Page::CarDetail(id))?;
            print_json(&api::cars::get(pipeline, id).await?)
        }
        CarsSubcommand::Delete { id } => {
            enter(client, Page::Cars)?;
            api::cars::delete(pipeline, id).await?;
            println!("deleted car {id}");
            Ok(())
        }
        CarsSubcommand::Export { output, brand } => {
            enter(client, Page::Cars)?;
            let query = CarQuery { brand, ..CarQuery::default() };
            let raw = api::cars::export(pipeline, &query).await?;
            let path = output.or_else(|| raw.filename.clone().map(PathBuf::from)).unwrap_or_else(|| "cars.xlsx".into());
            std::fs::write(&path, &raw.bytes).map_err(|source| CliError::Write { path: path.clone(), source })?;
            println!("wrote {} bytes to {}", raw.bytes.len(), path.display());
            Ok(())
        }
    }
}

async fn run_customers(client: &DealerClient, customers: CustomersCommand) -> Result<(), CliError> {
    let pipeline = client.pipeline();
    match customers.command {
        CustomersSubcommand::List { page, name, phone } => {
            enter(client, Page::Customers)?;
            let query = CustomerQuery { page_num: page.page, page_size: page.size, name, phone };
            print_json(&api::customers::list(pipeline, &query).await?)
        }
        CustomersSubcommand::Get { id } => {
            enter(client, Page::CustomerDetail(id))?;
            print_json(&api::customers::get(pipeline, id).await?)
        }
    }
}

async fn run_orders(client: &DealerClient, orders: OrdersCommand) -> Result<(), CliError> {
    let pipeline = client.pipeline();
    match orders.command {
        OrdersSubcommand::List { page, status, start_date, end_date } => {
            enter(client, Page::Orders)?;
            let status = status.map(parse_order_status).transpose()?;
            let query = OrderQuery {
                page_num: page.page,
                page_size: page.size,
                start_date,
                end_date,
                status,
                ..OrderQuery::default()
            };
            print_json(&api::orders::list(pipeline, &query).await?)
        }
        OrdersSubcommand::Get { id } => {
            enter(client, Page::OrderDetail(id))?;
            print_json(&api::orders::get(pipeline, id).await?)
        }
        OrdersSubcommand::Create { customer_id, car_id, original_price, discount, order_date, remark } => {
            enter(client, Page::OrderCreate)?;
            let request = OrderCreateRequest {
                customer_id,
                car_id,
                original_price,
                discount_amount: discount,
                actual_price: original_price - discount,
                order_date,
                remark,
            };
            print_json(&api::orders::create(pipeline, &request).await?)
        }
    }
}

fn parse_car_status(raw: i64) -> Result<CarStatus, CliError> {
    CarStatus::try_from(raw).map_err(|_| CliError::InvalidArg { field: "car status", value: raw.to_string() })
}

fn parse_order_status(raw: i64) -> Result<OrderStatus, CliError> {
    OrderStatus::try_from(raw).map_err(|_| CliError::InvalidArg { field: "order status", value: raw.to_string() })
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

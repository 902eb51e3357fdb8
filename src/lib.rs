use std::io::Read;
use std::sync::Arc;

use structopt::StructOpt;
use url::Url;

pub mod flickr;
pub mod models;
pub mod telemetry;
pub mod web;

use flickr::FlickrClient;
use models::Aggregator;

#[derive(Clone)]
pub struct State {
    pub tera: Arc<tera::Tera>,
    pub aggregator: Arc<Aggregator>,
    pub cache_busting_string: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    TemplateParseError(tera::Error),
    TelemetryInitError(anyhow::Error),
    StaticDirError(std::io::Error),
    ListenError(std::io::Error),
}

impl From<Error> for u8 {
    fn from(error: Error) -> u8 {
        match error {
            Error::TemplateParseError(_) => 3,
            Error::TelemetryInitError(_) => 4,
            Error::StaticDirError(_) => 5,
            Error::ListenError(_) => 6,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TemplateParseError(err) => {
                write!(f, "Template parsing error: {}", err)
            },
            Error::TelemetryInitError(err) => {
                write!(f, "Failed to init telemetry: {}", err)
            },
            Error::StaticDirError(err) => {
                write!(f, "Failed to serve static directory: {}", err)
            },
            Error::ListenError(err) => {
                write!(f, "Failed to start server: {}", err)
            },
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct FlickrArgs {
    /// Flickr API key.
    #[structopt(long, env = "FLICKR_APP_ID", hide_env_values = true)]
    pub flickr_app_id: String,
    /// Flickr API secret. Requests are signed when set.
    #[structopt(long, default_value = "", env = "FLICKR_API_SECRET", hide_env_values = true)]
    pub flickr_api_secret: String,

    /// Flickr REST endpoint.
    #[structopt(
        long,
        parse(try_from_str = Url::parse),
        default_value = "https://api.flickr.com/services/rest/",
        env = "LEGYPTE_FLICKR_ENDPOINT"
    )]
    pub flickr_endpoint: Url,

    /// Photoset shown for the "default" owner.
    #[structopt(
        long,
        default_value = "72157634011366503",
        env = "LEGYPTE_DEFAULT_PHOTOSET_ID"
    )]
    pub default_photoset_id: String,
}

impl FlickrArgs {
    pub fn aggregator(&self) -> Aggregator {
        let client = FlickrClient::new(
            self.flickr_endpoint.clone(),
            &self.flickr_app_id,
            &self.flickr_api_secret,
        );
        Aggregator::new(client, &self.default_photoset_id)
    }
}

#[derive(Debug, StructOpt)]
pub struct Args {
    /// Host address to bind to.
    #[structopt(long, default_value = "localhost", env = "LEGYPTE_BIND_ADDRESS")]
    address: String,
    /// Port to bind to.
    #[structopt(long, default_value = "8166", env = "LEGYPTE_BIND_PORT")]
    port: u16,

    #[structopt(flatten)]
    flickr: FlickrArgs,

    /// Path to Tera templates directory
    #[structopt(
        long,
        parse(from_os_str),
        default_value = "./templates",
        env = "LEGYPTE_TEMPLATE_PATH"
    )]
    template_path: std::path::PathBuf,

    /// Path to the static assets directory
    #[structopt(
        long,
        parse(from_os_str),
        default_value = "./static",
        env = "LEGYPTE_STATIC_PATH"
    )]
    static_path: std::path::PathBuf,
}

/// Loads every template under `template_path` along with the optional `cache-buster` file next to
/// them.
pub fn load_templates(
    template_path: &std::path::Path,
) -> Result<(tera::Tera, Option<String>), Error> {
    let tera = tera::Tera::new(&template_path.join("**/*").to_string_lossy())
        .map_err(Error::TemplateParseError)?;

    let cache_busting_string = match std::fs::File::open(template_path.join("cache-buster")) {
        Ok(mut file) => {
            let mut data = String::new();
            match file.read_to_string(&mut data) {
                Ok(_) => data.split_whitespace().next().map(|s| s.to_string()),
                Err(err) => {
                    tracing::warn!("couldn't read cache busting string from file: {}", err);
                    None
                },
            }
        },
        Err(_) => None,
    };

    Ok((tera, cache_busting_string))
}

pub async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::from_args();

    telemetry::init().map_err(Error::TelemetryInitError)?;

    let (tera, cache_busting_string) = load_templates(&args.template_path)?;

    let state = State {
        tera: Arc::new(tera),
        aggregator: Arc::new(args.flickr.aggregator()),
        cache_busting_string,
    };
    let mut app = tide::with_state(state);

    web::mount(&mut app);
    app.at("/static")
        .serve_dir(&args.static_path)
        .map_err(Error::StaticDirError)?;

    let address: &str = args.address.as_ref();
    tracing::info!("listening on {}:{}", address, args.port);
    app.listen((address, args.port))
        .await
        .map_err(Error::ListenError)?;

    Ok(())
}

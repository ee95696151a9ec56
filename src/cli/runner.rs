//! CLI runner - executes commands

use crate::api::{
    launch_details, launch_list_engine, login, toggle_booking, BookingOutcome, LaunchDetailsState,
};
use crate::auth::{MemoryTokenStore, TokenStore};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::graphql::GraphQlClient;
use crate::pagination::{ListFooter, LoadStatus};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let tokens = self.token_store();
        let client = Arc::new(GraphQlClient::from_config(&config, tokens.clone())?);
        debug!(endpoint = %client.endpoint(), "Client ready");

        match &self.cli.command {
            Commands::Launches { max_pages } => {
                self.launches(client, max_pages.or(config.page_limit)).await
            }
            Commands::Details { id } => self.details(&client, id).await,
            Commands::Login { email } => self.login(&client, &*tokens, email).await,
            Commands::Book { id } => self.toggle(&client, &*tokens, id, false).await,
            Commands::Cancel { id } => self.toggle(&client, &*tokens, id, true).await,
        }
    }

    /// Load the config file, if any, and apply flag overrides
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(ref url) = self.cli.server_url {
            config.server_url.clone_from(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Token store seeded from `--token`
    fn token_store(&self) -> Arc<dyn TokenStore> {
        match &self.cli.token {
            Some(token) => Arc::new(MemoryTokenStore::with_token(token.as_str())),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Page through launches, printing each page as it arrives
    async fn launches(&self, client: Arc<GraphQlClient>, max_pages: Option<usize>) -> Result<()> {
        let engine = launch_list_engine(client)?;
        let mut printed = 0;

        loop {
            let state = match engine.load_more().await {
                LoadStatus::Loaded(state) => state,
                LoadStatus::InFlight | LoadStatus::Exhausted => break,
            };

            for launch in &state.items[printed..] {
                self.output(launch);
            }
            printed = state.items.len();

            match state.footer() {
                ListFooter::Loading => {}
                ListFooter::End => break,
                ListFooter::Retry(message) => {
                    return Err(Error::pagination(format!(
                        "Failed to load launches after {printed} items: {message}"
                    )));
                }
            }

            if max_pages.is_some_and(|max| state.pages_loaded >= max) {
                info!("Stopping after {} pages", state.pages_loaded);
                break;
            }
        }

        info!("Listed {printed} launches");
        Ok(())
    }

    async fn details(&self, client: &GraphQlClient, id: &str) -> Result<()> {
        match launch_details(client, id).await {
            LaunchDetailsState::Success(data) => match data.launch {
                Some(launch) => {
                    self.output(&launch);
                    Ok(())
                }
                None => Err(Error::Other(format!("Launch {id} not found"))),
            },
            LaunchDetailsState::BackendError(errors) => {
                let message = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(Error::graphql("LaunchDetails", message))
            }
            LaunchDetailsState::ProtocolError(message) => Err(Error::Other(message)),
            LaunchDetailsState::Loading => Err(Error::Other("launch details not loaded".into())),
        }
    }

    async fn login(&self, client: &GraphQlClient, tokens: &dyn TokenStore, email: &str) -> Result<()> {
        let token = login(client, tokens, email).await?;
        self.output(&json!({ "token": token }));
        Ok(())
    }

    async fn toggle(
        &self,
        client: &GraphQlClient,
        tokens: &dyn TokenStore,
        id: &str,
        is_booked: bool,
    ) -> Result<()> {
        match toggle_booking(client, tokens, id, is_booked).await {
            BookingOutcome::LoginRequired => Err(Error::LoginRequired),
            BookingOutcome::Failed(message) => Err(Error::Other(format!(
                "Failed to book/cancel trip {id}: {message}"
            ))),
            outcome => {
                self.output(&json!({ "launch": id, "result": outcome }));
                Ok(())
            }
        }
    }

    /// Print one record in the selected format
    fn output<T: Serialize + ?Sized>(&self, value: &T) {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        };
        println!("{}", rendered.unwrap_or_default());
    }
}

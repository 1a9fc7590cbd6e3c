//! Headless storefront client: signs in if configured, loads the first
//! catalog page through the feed and logs what it saw.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use storefront_client::config::ClientSettings;
use storefront_client::domain::ports::{
    AuthService, NullRenderSink, RequestExecutor, TracingNotifier,
};
use storefront_client::domain::{
    ApiAuthService, ApiCatalogService, CatalogFeed, ListPhase, OperationError, ServiceGateway,
    SessionStore,
};
use storefront_client::outbound::fixture::FixtureStorefront;
use storefront_client::outbound::http::HttpRequestExecutor;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ClientSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    if settings.fixture {
        info!("serving requests from the in-memory storefront");
        run(Arc::new(FixtureStorefront::default()), &settings).await
    } else {
        let base_url = settings.base_url().wrap_err("invalid base url")?;
        let timeout = settings.request_timeout().wrap_err("invalid request timeout")?;
        info!(%base_url, "serving requests over HTTP");
        let executor =
            HttpRequestExecutor::new(base_url, timeout).wrap_err("failed to build HTTP client")?;
        run(Arc::new(executor), &settings).await
    }
}

async fn run<E>(executor: Arc<E>, settings: &ClientSettings) -> Result<()>
where
    E: RequestExecutor + 'static,
{
    let session = SessionStore::new();
    let gateway = ServiceGateway::new(executor, session);
    let auth = ApiAuthService::new(gateway.clone());
    let catalog = Arc::new(ApiCatalogService::new(gateway));

    if let Some(credentials) = settings.credentials().wrap_err("invalid credentials")? {
        match auth.authenticate(&credentials).await {
            Ok(_) => match auth.get_profile().await {
                Ok(profile) => info!(name = %profile.display_name(), "profile loaded"),
                Err(err) => warn!(error = %err, "profile unavailable"),
            },
            Err(err) => warn!(error = %err, "start-up sign-in failed"),
        }
    }

    let sizes = settings.page_sizes().wrap_err("invalid page sizes")?;
    let (feed, task) = CatalogFeed::spawn(catalog, NullRenderSink, Arc::new(TracingNotifier), sizes);
    feed.activate()?;
    let snapshot = feed
        .wait_until(|snapshot| match snapshot.status.phase {
            ListPhase::Exhausted | ListPhase::Errored => true,
            ListPhase::Idle => snapshot.status.len > 0,
            ListPhase::LoadingFirstPage | ListPhase::LoadingNextPage => false,
        })
        .await?;
    match snapshot.status.phase {
        ListPhase::Errored => warn!(
            error = snapshot
                .last_error
                .as_ref()
                .map_or("unknown", OperationError::message),
            "first catalog page failed"
        ),
        phase => info!(
            ?phase,
            items = snapshot.status.len,
            has_more = snapshot.status.has_more,
            "first catalog page loaded"
        ),
    }

    drop(feed);
    task.await.wrap_err("catalog feed task failed")?;
    Ok(())
}

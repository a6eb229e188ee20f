use std::{
    future::IntoFuture,
    io::{self, Write},
    process,
    sync::Arc,
};

use serde_json::Value;
use tintero::{
    application::{
        chrome::ChromeService,
        content::ContentService,
        documents::DocumentService,
        error::AppError,
        feed::FeedService,
        render::ArticleRenderer,
        repos::DocumentStore,
    },
    config::{self, RenderArgs},
    domain::blocks::Block,
    infra::{
        content_api::build_content_api,
        db::{DisabledDocumentStore, PostgresRepositories},
        error::InfraError,
        http::{self, ApiState, HttpState, RouterState},
        telemetry,
    },
};
use tokio::sync::watch;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let documents = init_document_store(&settings).await?;
    let router_state = build_router_state(&settings, documents)?;
    serve_http(&settings, router_state).await
}

async fn run_render(settings: config::Settings, args: RenderArgs) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let document: Value = serde_json::from_str(&raw).map_err(|err| {
        AppError::validation(format!("{} is not valid JSON: {err}", args.file.display()))
    })?;
    let blocks = Block::list_from_document(&document).ok_or_else(|| {
        AppError::validation("expected an array of blocks or an object with `results`/`content`")
    })?;

    let rendered = ArticleRenderer::from_settings(&settings.render).render(&blocks);
    info!(
        blocks = rendered.block_count,
        truncated = rendered.truncated,
        unsupported = ?rendered.unsupported_kinds,
        "Rendered block file"
    );

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered.html).map_err(|err| AppError::from(InfraError::from(err)))?;
    Ok(())
}

async fn init_document_store(
    settings: &config::Settings,
) -> Result<Arc<dyn DocumentStore>, AppError> {
    let Some(database_url) = settings.database.url.as_deref() else {
        warn!("database url is not configured; document routes will answer 503");
        return Ok(Arc::new(DisabledDocumentStore));
    };

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_router_state(
    settings: &config::Settings,
    documents: Arc<dyn DocumentStore>,
) -> Result<RouterState, AppError> {
    if settings.content_api.base_url.is_none() {
        warn!("content api base url is not configured; content routes will answer 503");
    }
    let content_api = build_content_api(&settings.content_api).map_err(AppError::from)?;

    let content = Arc::new(ContentService::new(content_api));
    let documents = Arc::new(DocumentService::new(documents));
    let renderer = Arc::new(ArticleRenderer::from_settings(&settings.render));
    let feed = Arc::new(FeedService::new(
        content.as_ref().clone(),
        renderer,
        settings.site.clone(),
    ));
    let chrome = Arc::new(ChromeService::new(settings.site.clone()));

    Ok(RouterState {
        http: HttpState {
            feed,
            content: content.clone(),
            documents: documents.clone(),
            chrome,
        },
        api: ApiState { content, documents },
    })
}

async fn serve_http(settings: &config::Settings, router_state: RouterState) -> Result<(), AppError> {
    let router = http::build_app(router_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(addr = %settings.server.addr, "Listening");

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = stop_tx.send(true);
        })
        .into_future();

    let grace = settings.server.graceful_shutdown;
    let deadline = async move {
        if stop_rx.wait_for(|stopped| *stopped).await.is_err() {
            // Sender dropped without a signal: the server already exited.
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        () = deadline => {
            warn!(
                grace_seconds = grace.as_secs(),
                "Graceful shutdown window elapsed with requests still in flight"
            );
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}

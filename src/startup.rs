use axum::routing::{any, get};
use axum::{middleware, serve::Serve, Router};
use secrecy::ExposeSecret;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::Key;
use tower_sessions::service::PrivateCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_redis_store::{
    fred::{
        interfaces::ClientLike,
        prelude::{Config, Pool},
    },
    RedisStore,
};
use url::Url;

use crate::configuration::Settings;
use crate::headers::set_standard_headers;
use crate::routes::{health_check, log_out};

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let key = Key::derive_from(
            configuration
                .application
                .hmac_secret
                .expose_secret()
                .as_bytes(),
        );

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );

        let listener = TcpListener::bind(address).await?;
        let port = listener.local_addr()?.port();

        let state = AppState {
            trusted_redirect_base: TrustedRedirectBase(
                configuration.application.trusted_redirect_base.clone(),
            ),
        };
        let logout_paths = &configuration.application.logout_paths;

        let server = match &configuration.redis_uri {
            Some(redis_uri) => {
                let redis_config = Config::from_url(redis_uri.expose_secret().as_str())?;
                let redis_pool = Pool::new(redis_config, None, None, None, 6)?;

                // Connect to Redis with a timeout
                let connect_future = async {
                    let _handles = redis_pool.connect();
                    redis_pool.wait_for_connect().await
                };
                tokio::time::timeout(std::time::Duration::from_secs(5), connect_future)
                    .await
                    .map_err(|_| anyhow::anyhow!("Redis connection timeout"))??;

                let session_layer = session_layer(RedisStore::new(redis_pool), key);
                run(listener, state, logout_paths, session_layer)?
            }
            None => {
                let session_layer = session_layer(MemoryStore::default(), key);
                run(listener, state, logout_paths, session_layer)?
            }
        };

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

/// The configured base URI that external redirect targets must match.
#[derive(Clone, Debug)]
pub struct TrustedRedirectBase(pub Url);

#[derive(Clone)]
pub struct AppState {
    pub trusted_redirect_base: TrustedRedirectBase,
}

impl axum::extract::FromRef<AppState> for TrustedRedirectBase {
    fn from_ref(state: &AppState) -> Self {
        state.trusted_redirect_base.clone()
    }
}

fn session_layer<Store: SessionStore>(
    store: Store,
    key: Key,
) -> SessionManagerLayer<Store, PrivateCookie> {
    SessionManagerLayer::new(store)
        .with_private(key)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(60 * 60 * 24 * 30)))
}

fn build_router<Store: SessionStore + Clone>(
    logout_paths: &[String],
    session_layer: SessionManagerLayer<Store, PrivateCookie>,
) -> Router<AppState> {
    let mut router = Router::<AppState>::new().route("/health_check", get(health_check));

    // The endpoint answers under every configured path; the method gate lives
    // in the handler so non-POST requests get an explicit 405.
    for path in logout_paths {
        router = router.route(path, any(log_out));
    }

    router
        .layer(session_layer)
        .layer(middleware::from_fn(set_standard_headers))
        .layer(TraceLayer::new_for_http())
}

fn run<Store: SessionStore + Clone>(
    listener: TcpListener,
    state: AppState,
    logout_paths: &[String],
    session_layer: SessionManagerLayer<Store, PrivateCookie>,
) -> Result<axum::serve::Serve<TcpListener, Router, Router>, anyhow::Error> {
    let app: Router = build_router(logout_paths, session_layer).with_state::<()>(state);
    let server = axum::serve(listener, app);

    Ok(server)
}

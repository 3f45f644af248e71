use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use litaria_server::db;
use litaria_server::handlers;
use litaria_server::jobs;
use litaria_server::middleware::AuthMiddleware;
use litaria_server::services::{AccountService, CategoryService, PostService};
use litaria_server::uploads::ImageUploader;
use litaria_server::Config;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting litaria-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool and apply migrations
    let db_pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Migration failed: {}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Database ready, migrations applied");

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let account_service = web::Data::new(AccountService::new(
        db_pool.clone(),
        config.auth.clone(),
    ));
    let post_service = web::Data::new(PostService::new(db_pool.clone()));
    let category_service = web::Data::new(CategoryService::new(db_pool.clone()));
    let uploader = web::Data::new(Arc::new(ImageUploader::new(config.uploads.clone())));
    let pool_data = web::Data::new(db_pool.clone());

    // Server-side scheduled publishing, independent of any client activity
    tokio::spawn(jobs::start_scheduled_publisher(
        db_pool.clone(),
        config.sweeper.interval_secs,
    ));

    let server_config = config.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let jwt_secret = server_config.auth.jwt_secret.clone();
        let auth = move || AuthMiddleware::new(jwt_secret.clone());

        App::new()
            .app_data(pool_data.clone())
            .app_data(account_service.clone())
            .app_data(post_service.clone())
            .app_data(category_service.clone())
            .app_data(uploader.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(
                web::scope("/api/v1")
                    // Health check endpoints
                    .route("/health", web::get().to(handlers::health_summary))
                    .route("/health/ready", web::get().to(handlers::readiness_summary))
                    .route("/health/live", web::get().to(handlers::liveness_check))
                    // Accounts
                    .route("/auth/register", web::post().to(handlers::register))
                    .route("/auth/login", web::post().to(handlers::login))
                    // Posts. Literal paths are registered before /posts/{id}
                    // so "search" and friends are never captured as an id.
                    .route("/posts/search", web::get().to(handlers::search_posts))
                    .route("/posts/lead", web::get().to(handlers::get_lead))
                    .service(
                        web::resource("/posts/publish-scheduled")
                            .route(web::get().to(handlers::scheduled_status))
                            .route(web::post().to(handlers::publish_scheduled)),
                    )
                    .service(
                        web::resource("/posts")
                            .route(web::get().to(handlers::list_posts))
                            .route(web::post().to(handlers::create_post).wrap(auth())),
                    )
                    .service(
                        web::resource("/posts/{id}/set-lead")
                            .route(web::post().to(handlers::set_lead).wrap(auth()))
                            .route(web::delete().to(handlers::clear_lead).wrap(auth())),
                    )
                    .service(
                        web::resource("/posts/{id}")
                            .route(web::get().to(handlers::get_post))
                            .route(web::put().to(handlers::update_post).wrap(auth()))
                            .route(web::delete().to(handlers::delete_post).wrap(auth())),
                    )
                    // Categories and subcategories
                    .service(
                        web::resource("/categories")
                            .route(web::get().to(handlers::list_categories))
                            .route(web::post().to(handlers::create_category).wrap(auth())),
                    )
                    .service(
                        web::resource("/categories/{id}/subcategories")
                            .route(web::get().to(handlers::list_subcategories))
                            .route(web::post().to(handlers::create_subcategory).wrap(auth())),
                    )
                    .service(
                        web::resource("/categories/{id}")
                            .route(web::get().to(handlers::get_category))
                            .route(web::put().to(handlers::rename_category).wrap(auth()))
                            .route(web::delete().to(handlers::delete_category).wrap(auth())),
                    )
                    .service(
                        web::resource("/subcategories/{id}")
                            .route(web::put().to(handlers::rename_subcategory).wrap(auth()))
                            .route(web::delete().to(handlers::delete_subcategory).wrap(auth())),
                    )
                    // Uploads
                    .route("/upload", web::post().to(handlers::upload_image).wrap(auth())),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}

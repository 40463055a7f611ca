use actix_web::{web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

mod clients;
mod data;
mod enrichment;
mod errors;
mod queries;
mod routes;
mod schema;
mod utilities;

use clients::{ReferenceClient, TranslationClient};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");


#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let url = dotenv::var("DATABASE_URL").expect("DATABASE_URL must be set");

    // bring the schema up to date before accepting requests
    let mut conn = PgConnection::establish(&url).expect("Cannot connect to database");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("could not run migrations");
    drop(conn);

    let mgr = ConnectionManager::<PgConnection>::new(url);
    let pool = r2d2::Pool::builder()
        .build(mgr)
        .expect("could not build connection pool");

    let reference = web::Data::new(ReferenceClient::new(
        dotenv::var("DND_API_URL").unwrap_or_else(|_| "https://www.dnd5eapi.co".into()),
    ));
    let translator = web::Data::new(TranslationClient::new(
        dotenv::var("DEEPL_API_URL").unwrap_or_else(|_| "https://api-free.deepl.com".into()),
        dotenv::var("DEEPL_API_KEY").ok(),
    ));

    let bind = dotenv::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".into());
    tracing::info!("listening on {}", bind);

    let pool = web::Data::new(pool);
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(reference.clone())
            .app_data(translator.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}

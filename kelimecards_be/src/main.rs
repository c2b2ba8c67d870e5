use crate::{
    config::Config,
    db::create_tables_in_database,
    lookup::{OpenAiLookup, TranslationLookup},
    storage::DbSettingsStore,
};
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::{
    io::{Error, ErrorKind},
    str::FromStr,
    sync::Arc,
};

extern crate dotenv;

mod config;
mod db;
mod error;
mod lookup;
mod models;
mod review;
mod routes;
mod storage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| {
        log::error!("Invalid configuration: {err}");
        Error::new(ErrorKind::InvalidInput, err)
    })?;
    let Config {
        host,
        port,
        db_url,
        openai,
        static_dir,
    } = config;

    //Creates the sqlite file on first start
    let connect_options = SqliteConnectOptions::from_str(&db_url)
        .map_err(|err| {
            log::error!("Invalid DB_URL {db_url}: {err}");
            Error::new(ErrorKind::InvalidInput, "DB_URL is not a valid sqlite url.")
        })?
        .create_if_missing(true);

    let pool = match SqlitePool::connect_with(connect_options).await {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Error creating the db pool: {}", err);
            return Err(Error::other("db pool could not be created."));
        }
    };

    create_tables_in_database(&pool).await.map_err(|err| {
        log::error!("Error creating tables: {err}");
        Error::other("database tables could not be created.")
    })?;

    if openai.api_key.is_none() {
        log::warn!("OPENAI_API_KEY is not set, word search will fail");
    }
    let lookup: Arc<dyn TranslationLookup> = match OpenAiLookup::new(openai) {
        Ok(lookup) => Arc::new(lookup),
        Err(err) => {
            log::error!("Error creating the translation client: {err}");
            return Err(Error::other("translation client could not be created."));
        }
    };
    let settings = web::Data::new(DbSettingsStore::new(pool.clone()));
    let lookup = web::Data::from(lookup);

    log::info!("starting HTTP server at http://{host}:{port}");
    HttpServer::new(move || {
        let app = App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::ThinData(pool.clone()))
            .app_data(settings.clone())
            .app_data(lookup.clone())
            .configure(routes::configure);
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

use actix::prelude::*;
use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath, TrailingSlash};
use actix_web::{web::Data, App, HttpServer};
use anyhow::Context as AnyhowContext;
use std::env;
use tyre_catalog::{control, loader, Settings};
use tyre_types::catalog::service::CatalogService;

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    if let Err(env::VarError::NotPresent) = env::var("RUST_LOG") {
        env::set_var("RUST_LOG", "INFO");
    }
    pretty_env_logger::formatted_timed_builder()
        .parse_default_env()
        .init();

    match std::fs::File::open(".env") {
        Ok(_) => envmnt::load_file(".env")?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::File::create(".env")?;
            envmnt::load_file(".env")?;
        }
        Err(err) => {
            return Err(anyhow::anyhow!("Unable to open .env file: {err}"));
        }
    }

    let settings = Settings::from_env();
    log::info!(
        "Catalog source: {}, page size: {}",
        settings.catalog_source,
        settings.page_size
    );
    let source = loader::source_from_str(&settings.catalog_source)?;
    let catalog_service = CatalogService::new(source).start();

    let bind = (settings.bind_addr.clone(), settings.port);
    let settings = Data::new(settings);
    log::info!("Listening on {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .wrap(Compress::default())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .app_data(Data::new(catalog_service.clone()))
            .app_data(settings.clone())
            .service(actix_files::Files::new("/static", "static"))
            .service(control::catalog::index)
            .service(control::product::view)
            .service(control::site_api::list_products)
            .service(control::site_api::get_product)
            .service(control::site_api::facets)
            .service(control::site_api::health)
            .default_service(actix_web::web::route().to(control::not_found))
    })
    .bind(bind.clone())
    .with_context(|| {
        format!(
            "Failed to bind server to {}:{}. Is the port already in use?",
            bind.0, bind.1
        )
    })?
    .run()
    .await?;
    Ok(())
}

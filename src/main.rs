use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use pulsepoint_server::{database, models::report::Report, routes};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_uri: String =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| String::from("mongodb://localhost:27017"));
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(5555);

    log::info!("Connecting to database...");
    let db = database::connect(&db_uri)
        .await
        .expect("Failed to connect to database");

    Report::ensure_indexes(&db)
        .await
        .expect("Failed to create report indexes");

    let db = web::Data::new(db);

    log::info!("Server running on port: {port}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(db.clone())
            .service(routes::index)
            .service(routes::report::get_reports)
            .service(routes::report::create_report)
            .service(routes::report::get_report)
            .service(routes::report::update_report_status)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

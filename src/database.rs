use mongodb::{Client, Database};

pub const DATABASE_NAME: &str = "pulsepoint";

/// Builds the store handle once at startup; handlers receive it through
/// `web::Data`. A database name embedded in the URI wins over the default.
pub async fn connect(uri: &str) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(uri).await?;

    Ok(client
        .default_database()
        .unwrap_or_else(|| client.database(DATABASE_NAME)))
}

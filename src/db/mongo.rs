use log::{info, warn};
use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::time::Duration;

pub async fn create_mongo_client(uri: &str, database: &str) -> Result<Client, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some("journeygo-api".to_string());
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client.database(database).run_command(doc! {"ping": 1}).await {
        Ok(_) => info!("Connected to MongoDB database {}", database),
        Err(e) => {
            warn!("Connected to MongoDB but ping failed: {}", e);
            warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Ok(client)
}

use std::collections::HashMap;

use databreakers::{ClientConfig, EntitiesBatch, ListOptions, RecommendationOptions};

pub fn main() -> databreakers::Result<()> {
    // Configure env_logger to see the client's request logs.
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("databreakers")).init();

    let account_id = std::env::var("DATABREAKERS_ACCOUNT_ID")
        .expect("DATABREAKERS_ACCOUNT_ID env variable should contain account id");
    let secret_key = std::env::var("DATABREAKERS_SECRET_KEY")
        .expect("DATABREAKERS_SECRET_KEY env variable should contain secret key");
    let client = ClientConfig::from_credentials(account_id, secret_key).to_client()?;

    // Insert two users in a single request.
    let mut batch = EntitiesBatch::new();
    batch
        .add_entity("john", HashMap::from([("name".to_owned(), "John".into())]))?
        .add_entity("jane", HashMap::from([("name".to_owned(), "Jane".into())]))?;
    client.users().insert_or_update_entities(&batch)?;

    let users = client
        .users()
        .get_entities(ListOptions::new().limit(10).offset(0))?;
    println!("Users: {:?}", users);

    let recommendations = client.recommendations().get_recommendations_for_user(
        "john",
        5,
        &RecommendationOptions::new(),
    )?;
    println!("Recommendations: {:?}", recommendations);

    Ok(())
}

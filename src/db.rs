use surrealdb::{
    engine::any::{self, Any},
    opt::auth::Root,
    Surreal,
};

use crate::{config::DbConfig, Result};

/// Indexes the services rely on. Tables stay schemaless.
const SCHEMA: &str = "
    DEFINE INDEX IF NOT EXISTS user_username_unique ON TABLE user COLUMNS username UNIQUE;
    DEFINE INDEX IF NOT EXISTS user_email_unique ON TABLE user COLUMNS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS user_stage_name ON TABLE user COLUMNS stage_name;
    DEFINE INDEX IF NOT EXISTS song_release_date ON TABLE song COLUMNS release_date;
    DEFINE INDEX IF NOT EXISTS song_artist ON TABLE song COLUMNS artist;
    DEFINE INDEX IF NOT EXISTS song_genre ON TABLE song COLUMNS genre;
    DEFINE INDEX IF NOT EXISTS artist_request_user ON TABLE artist_request COLUMNS user, status;
";

pub async fn connect(config: &DbConfig) -> Result<Surreal<Any>> {
    tracing::info!("Connecting to database at: {}", config.url);

    let db = any::connect(&config.url).await?;
    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;
    db.signin(Root {
        username: &config.username,
        password: &config.password,
    })
    .await?;

    apply_schema(&db).await?;

    tracing::info!("Database connected successfully!");

    Ok(db)
}

pub async fn apply_schema(db: &Surreal<Any>) -> Result<()> {
    db.query(SCHEMA).await?.check()?;
    Ok(())
}

#[cfg(test)]
pub async fn test_db() -> Surreal<Any> {
    let db = any::connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    apply_schema(&db).await.unwrap();
    db
}

use std::{env, net::SocketAddr, path::PathBuf};

use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db: DbConfig,
    pub bind_addr: SocketAddr,
    /// Root directory of the local object storage backend.
    pub upload_dir: PathBuf,
    /// Base URL clients use to reach `/uploads`.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let db = DbConfig {
            url: env::var("DB_URL")?,
            namespace: env::var("DB_NS")?,
            database: env::var("DB_NAME")?,
            username: env::var("DB_USER")?,
            password: env::var("DB_PASSWORD")?,
        };

        let host = env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let bind_addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| Error::EnvVarError(format!("Invalid bind address {host}:{port}")))?;

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let max_upload_mb: usize = env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        Ok(Self {
            db,
            bind_addr,
            upload_dir,
            public_base_url,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

//! Out-of-band admin provisioning: `create-admin <email> <password>`.
//! Admins are never created through the HTTP surface.

use anyhow::Context;
use catalog_api::auth::{repo::Admin, services::hash_password};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "catalog_api=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let (email, password) = match (args.next(), args.next()) {
        (Some(e), Some(p)) => (e.trim().to_lowercase(), p),
        _ => {
            eprintln!("usage: create-admin <email> <password>");
            std::process::exit(2);
        }
    };

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("connect to database")?;

    if Admin::find_by_email(&pool, &email).await?.is_some() {
        anyhow::bail!("admin with email {} already exists", email);
    }

    let hash = hash_password(&password)?;
    let admin = Admin::create(&pool, &email, &hash)
        .await
        .context("insert admin")?;

    println!("Admin created: {} ({})", admin.email, admin.id);
    Ok(())
}

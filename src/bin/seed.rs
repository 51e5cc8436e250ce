use repair_desk::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    models::Role,
    services::auth_service::upsert_user,
    state::AppState,
};

/// Create or reset a staff account: `seed <username> <password> [admin|user]`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let mut args = std::env::args().skip(1);
    let (username, password) = match (args.next(), args.next()) {
        (Some(username), Some(password)) => (username, password),
        _ => anyhow::bail!("usage: seed <username> <password> [admin|user]"),
    };
    let role = match args.next() {
        Some(role) => role.parse::<Role>()?,
        None => Role::User,
    };

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let state = AppState::new(orm, config);
    let user = upsert_user(&state, &username, &password, role).await?;

    println!("Ensured user {} (role={}), id {}", user.username, user.role, user.id);
    Ok(())
}

use coffee_shop::application::queries::QueryRunner;
use coffee_shop::application::seed::SeedRunner;
use coffee_shop::domain::errors::DomainError;
use coffee_shop::infrastructure::store::DieselOrderStore;
use coffee_shop::{create_pool, run_migrations};
use dotenvy::dotenv;
use std::env;

fn main() -> Result<(), DomainError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    SeedRunner::new(DieselOrderStore::new(pool.clone())).run()?;
    QueryRunner::new(DieselOrderStore::new(pool)).report()?;

    Ok(())
}

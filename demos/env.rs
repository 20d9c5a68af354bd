use dragon_env::{bind_env, extract, Class, TypeExpr};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(dead_code)]
struct AppConfig {
    app_name: String,
    app_debug: bool,
    database_hosts: Vec<String>,
    database_port: u16,
}

fn main() -> Result<(), dragon_env::Error> {
    // Reads the process environment, falling back to ./.env
    let config = bind_env(
        Class::new("AppConfig")
            .field("APP_NAME", TypeExpr::STR)
            .field_with_default("APP_DEBUG", TypeExpr::BOOL, false)
            .field("DATABASE_HOSTS", "List[str]")
            .field_with_default("DATABASE_PORT", TypeExpr::INT, 5432),
    )?;

    println!("{}", config.instantiate(&[])?);

    let typed: AppConfig = extract(config.as_ref())?;
    println!("App: {} (debug={})", typed.app_name, typed.app_debug);
    println!("Database: {:?}:{}", typed.database_hosts, typed.database_port);

    Ok(())
}

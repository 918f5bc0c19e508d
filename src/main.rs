use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use kindbox_dialog::{build_router, Bot, BotConfig, DispatchPool};
use kindbox_domain::{DomainRepository, DomainStubs};
use kindbox_persistence::Database;

mod console;

/// Consola interactiva del bot.
///
/// Cada línea de stdin es un mensaje entrante con la forma
/// `@<actor_id> <texto>`; sin prefijo se usa el actor 1. Las respuestas se
/// imprimen con su teclado. `Ctrl-D` termina tras procesar lo pendiente.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BotConfig::from_env()?;
    let db = Database::open(&config.database_url)?;
    let domain = db.domain_repo();
    if domain.list_municipalities()?.is_empty() {
        let names: Vec<&str> = if config.municipalities.is_empty() {
            DomainStubs::SAMPLE_MUNICIPALITIES.to_vec()
        } else {
            config.municipalities.iter().map(String::as_str).collect()
        };
        let created = DomainStubs::seed_municipalities(&domain, &names)?;
        log::info!("{} localidades iniciales creadas", created);
    }

    let bot = Bot::new(Arc::new(db.state_store()),
                       Arc::new(domain),
                       Arc::new(console::ConsoleTransport),
                       config.clone());
    let router = Arc::new(build_router(bot)?);
    let pool = DispatchPool::spawn(router, config.workers);

    println!("== kindbox ==");
    println!("Escribe '@<actor_id> <texto>' (o solo el texto para el actor {}).", console::DEFAULT_ACTOR);
    println!("Cualquier mensaje inicia el registro.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(event) = console::parse_line(&line) {
            pool.submit(event)?;
        }
    }

    pool.shutdown().await?;
    Ok(())
}

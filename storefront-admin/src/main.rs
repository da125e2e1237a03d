mod cli;
mod commands;
mod console;
mod shell;
#[cfg(test)]
mod test_support;

use std::io;

use anyhow::Context;
use clap::Parser;
use storefront_core::{
    AutoApprove, ClientConfig, HttpResourceClient, ListView, NewProduct, Product, Prompt,
    UpiConfig,
};
use tracing_subscriber::EnvFilter;

use cli::{Cli, CollectionArg, Commands, ProductCommand, UpiCommand};
use console::Console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref()).context("loading client config")?;
    if let Some(url) = cli.api_url.clone() {
        config.base_url = url;
    }

    let mut out = io::stdout();

    match cli.command {
        Commands::Products(command) => {
            let client = HttpResourceClient::<Product>::new(&config)?;
            match command {
                ProductCommand::List => {
                    commands::list(&mut ListView::<Product, _>::new(client), &mut out).await?
                }
                ProductCommand::Show { id } => {
                    commands::show::<Product, _, _>(&client, &id, &mut out).await?
                }
                ProductCommand::Edit { id, field, value } => {
                    let mut view = ListView::<Product, _>::new(client);
                    let mut prompt = confirmations(cli.yes);
                    let outcome =
                        commands::edit(&mut view, &id, field, &value, prompt.as_mut(), &mut out).await?;
                    commands::ensure_settled(outcome)?;
                }
                ProductCommand::Delete { id } => {
                    let mut view = ListView::<Product, _>::new(client);
                    let mut prompt = confirmations(cli.yes);
                    let outcome = commands::delete(&mut view, &id, prompt.as_mut(), &mut out).await?;
                    commands::ensure_settled(outcome)?;
                }
                ProductCommand::Add(args) => {
                    commands::add_product(&client, NewProduct::from(args), &mut out).await?;
                }
            }
        }
        Commands::Upi(command) => {
            let client = HttpResourceClient::<UpiConfig>::new(&config)?;
            match command {
                UpiCommand::List => {
                    commands::list(&mut ListView::<UpiConfig, _>::new(client), &mut out).await?
                }
                UpiCommand::Show { id } => {
                    commands::show::<UpiConfig, _, _>(&client, &id, &mut out).await?
                }
                UpiCommand::Edit { id, field, value } => {
                    let mut view = ListView::<UpiConfig, _>::new(client);
                    let mut prompt = confirmations(cli.yes);
                    let outcome =
                        commands::edit(&mut view, &id, field, &value, prompt.as_mut(), &mut out).await?;
                    commands::ensure_settled(outcome)?;
                }
            }
        }
        Commands::PaymentOptions => {
            let client = HttpResourceClient::<UpiConfig>::new(&config)?;
            commands::payment_options(&client, &mut out).await?;
        }
        Commands::Shell { collection } => {
            let mut console = Console::stdin();
            match collection {
                CollectionArg::Products => {
                    let mut view: ListView<Product, _> =
                        ListView::new(HttpResourceClient::<Product>::new(&config)?);
                    shell::run(&mut view, &mut console, cli.yes, &mut out).await?;
                }
                CollectionArg::Upi => {
                    let mut view: ListView<UpiConfig, _> =
                        ListView::new(HttpResourceClient::<UpiConfig>::new(&config)?);
                    shell::run(&mut view, &mut console, cli.yes, &mut out).await?;
                }
            }
        }
    }

    Ok(())
}

fn confirmations(yes: bool) -> Box<dyn Prompt> {
    if yes {
        Box::new(AutoApprove)
    } else {
        Box::new(Console::stdin())
    }
}

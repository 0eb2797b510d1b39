use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rentalhub::cli::{Cli, Commands, ConfigAction};
use rentalhub::commands::{
    ListOptions, cmd_add, cmd_config_path, cmd_config_show, cmd_edit, cmd_ls, cmd_rm, cmd_status,
    cmd_summary, cmd_views,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Views { json } => cmd_views(json),
        Commands::Ls {
            view,
            search,
            category,
            status,
            from,
            to,
            min_price,
            max_price,
            sort,
            page,
            json,
        } => {
            let options = ListOptions {
                search,
                category,
                status,
                from,
                to,
                min_price,
                max_price,
                sort,
                page,
                json,
            };
            cmd_ls(&view, options).await
        }
        Commands::Add { view, set, json } => cmd_add(&view, &set, json).await,
        Commands::Edit {
            view,
            id,
            set,
            json,
        } => cmd_edit(&view, &id, &set, json).await,
        Commands::Status {
            view,
            id,
            status,
            json,
        } => cmd_status(&view, &id, &status, json).await,
        Commands::Rm { view, id, json } => cmd_rm(&view, &id, json).await,
        Commands::Summary { view, json } => cmd_summary(&view, json).await,
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Path => cmd_config_path(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

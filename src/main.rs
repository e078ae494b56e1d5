use clap::Parser;
use gemails::core::ConfigProvider;
use gemails::utils::{logger, validation::Validate};
use gemails::{
    CliConfig, ConsoleReporter, GemailsError, GitHubClient, HarvestEngine, LocalStorage,
    RunOptions, Settings, WhoisClient,
};

fn exit_with(e: &GemailsError) -> ! {
    tracing::error!("{} (Category: {:?})", e, e.category());
    eprintln!("Error: {}", e.user_friendly_message());
    eprintln!("Hint: {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Ok(rendered) = serde_json::to_string(&cli) {
        tracing::debug!("CLI config: {}", rendered);
    }

    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }
    tracing::debug!("Settings: {:?}", settings);

    let host = match GitHubClient::new(
        settings.api_base_url(),
        settings.token(),
        settings.http_timeout(),
    ) {
        Ok(host) => host,
        Err(e) => exit_with(&e),
    };
    let whois = WhoisClient::new(settings.whois_server(), settings.whois_timeout());
    let reporter = if cli.no_color {
        ConsoleReporter::without_colors()
    } else {
        ConsoleReporter::new()
    };

    let engine = HarvestEngine::new(host, whois, LocalStorage::default(), settings)
        .with_reporter(reporter)
        .with_options(RunOptions {
            show_emails: cli.show_emails,
            check_expiry: !cli.skip_expiry,
        });

    if let Err(e) = engine.run().await {
        exit_with(&e);
    }
}

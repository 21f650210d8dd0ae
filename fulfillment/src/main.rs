use challenge_client::{ChallengeClient, ChallengeOptions, ClientConfig, TestData};
use fulfillment::core::{AppResult, ConfigError, RunConfig};
use fulfillment::{init_logger, KitchenService};
use shared::{Action, ActionType};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json_format = std::env::var("LOG_JSON")
        .unwrap_or_else(|_| "false".to_string())
        .parse()
        .unwrap_or(false);
    init_logger(&log_level, json_format).expect("Failed to initialize logger");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match RunConfig::parse(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            eprintln!("{}", RunConfig::usage());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Run failed");
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

async fn run(mut config: RunConfig) -> AppResult<()> {
    tracing::info!("Starting kitchen fulfillment system");

    let client = config
        .auth_token
        .as_deref()
        .map(|token| ChallengeClient::new(ClientConfig::new(token)));

    // Resolve the problem: replay a saved test case or fetch a fresh one.
    let (test_id, orders) = if let Some(path) = config.load_test.clone() {
        tracing::info!(path = %path.display(), "Loading test data");
        let data = TestData::load(&path)?;
        config.rate_micros = data.rate_micros;
        config.min_pickup_micros = data.min_pickup_micros;
        config.max_pickup_micros = data.max_pickup_micros;
        config.seed = data.seed;
        tracing::info!(test_id = %data.test_id, orders = data.orders.len(), "Loaded test case");
        (data.test_id, data.orders)
    } else {
        let client = client.as_ref().ok_or(ConfigError::MissingToken)?;
        let problem = client.fetch_new_problem(config.seed).await?;
        if let Some(path) = &config.save_test {
            TestData::from_problem(
                &problem,
                config.rate_micros,
                config.min_pickup_micros,
                config.max_pickup_micros,
                config.seed,
            )
            .save(path)?;
        }
        (problem.test_id, problem.orders)
    };

    tracing::info!(
        rate = config.rate_micros,
        pickup_min = config.min_pickup_micros,
        pickup_max = config.max_pickup_micros,
        seed = ?config.seed,
        "Configuration"
    );

    // Run the kitchen timeline.
    let service = KitchenService::new();
    service.run(&orders, &config.options()).await?;

    for (area, count) in service.storage().area_counts().await {
        tracing::info!(area = %area, count, "Final storage fill");
    }
    let actions = service.ledger().await;
    log_summary(&actions);

    // Submit (or skip) and report.
    let result = if config.skip_submission {
        tracing::info!(
            actions = actions.len(),
            "Skipping submission to challenge server (--skip-submission flag set)"
        );
        "skipped (not submitted)".to_string()
    } else {
        let client = client.as_ref().ok_or(ConfigError::MissingToken)?;
        let options = ChallengeOptions {
            rate: config.rate_micros,
            min: config.min_pickup_micros,
            max: config.max_pickup_micros,
        };
        client.submit_solution(&test_id, options, &actions).await?
    };

    println!("RESULT: {}", result);

    // Annotate the replayed file; failures here only warn.
    if let Some(path) = &config.load_test {
        if let Err(e) = TestData::update_result(path, &result) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to update test result");
        }
    }

    Ok(())
}

fn log_summary(actions: &[Action]) {
    let count = |t: ActionType| actions.iter().filter(|a| a.action == t).count();
    tracing::info!(
        total = actions.len(),
        place = count(ActionType::Place),
        moves = count(ActionType::Move),
        pickup = count(ActionType::Pickup),
        discard = count(ActionType::Discard),
        "Action summary"
    );
}

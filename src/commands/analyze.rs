//! The end-to-end analysis pipeline behind `finlens analyze`.

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::AnalyzeArgs;
use crate::client::{generate_with_policy, GeminiClient, GenerateRequest, RetryPolicy};
use crate::config::{self, Overrides};
use crate::encoder;
use crate::history::{default_db_path, AnalysisHistory};
use crate::progress::Spinner;
use crate::prompt;
use crate::render;
use crate::report;

pub async fn handle(args: AnalyzeArgs, quiet: bool) -> anyhow::Result<()> {
    let file = config::load_config_file()?;
    let overrides = Overrides {
        model: args.model.clone(),
        fallback_model: args.fallback_model.clone(),
        temperature: args.temperature,
        disable_search: args.no_search,
        api_key: args.api_key.clone(),
    };
    let config = config::resolve(file, &overrides);
    let api_key = config::resolve_api_key(&config)?;

    info!(
        "Analyzing {} file(s) with model '{}' (fallback '{}')",
        args.files.len(),
        config.model,
        config.fallback_model
    );

    let parts = encoder::encode_files(&args.files, config.inline_limit_bytes)
        .await
        .context("failed to encode input files")?;

    let request = GenerateRequest::new(
        prompt::build_analysis_prompt(),
        parts,
        config.temperature,
        config.enable_search,
    );
    let policy = RetryPolicy::from_config(&config);
    let client = GeminiClient::new(api_key)?;

    let spinner = Spinner::start("Analyzing documents...", quiet);
    let result = generate_with_policy(&client, &policy, &request).await;
    spinner.finish();
    let outcome = result?;

    let analysis = report::decode_report(&outcome.text)?;
    let warnings = report::validate_report(&analysis);
    for warning in &warnings {
        warn!("Validation warning: {}: {}", warning.field, warning.message);
    }

    if !args.no_history {
        // History is best-effort; an unwritable database must not discard a
        // completed analysis. The recorded model is the one that actually
        // answered, which after a quota fallback is not the primary.
        let to_store = analysis.clone();
        let model = outcome.model.clone();
        let stored = tokio::task::spawn_blocking(move || {
            let store = AnalysisHistory::new(&default_db_path()?)?;
            store.record(&to_store, &model)
        })
        .await
        .context("history task failed")?;
        if let Err(e) = stored {
            warn!("Failed to record analysis in history: {}", e);
        }
    }

    if args.raw {
        println!("{}", render::render_raw(&analysis)?);
    } else {
        print!("{}", render::render_report(&analysis, &warnings));
    }
    Ok(())
}

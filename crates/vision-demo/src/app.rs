//! Command execution

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::controller::ViewController;
use crate::models::PredictStatus;
use crate::preview::PreviewStore;
use crate::render;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use vision_client::{fetch_sample, HttpGateway, ImageUpload, InferenceApi};
use vision_core::samples::{find_sample, SAMPLE_IMAGES};

/// Run the parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(&cli)?;

    match cli.command {
        Commands::Samples => {
            for sample in SAMPLE_IMAGES {
                println!("{:<12} {:<28} {}", sample.id, sample.src, sample.label);
            }
            Ok(())
        }

        Commands::Docs => {
            match config.api_config()?.docs_url() {
                Some(url) => println!("{url}"),
                None => println!("API docs unavailable: no API URL configured (set VISION_API_URL)"),
            }
            Ok(())
        }

        Commands::Health => {
            let gateway = Arc::new(HttpGateway::new(config.api_config()?)?);
            let mut controller = ViewController::new(gateway, PreviewStore::new());
            spawn_ctrl_c_handler(&controller);

            controller.run_health_check().await;

            let mut out = String::new();
            render::render_status(&mut out, controller.state());
            print!("{out}");
            Ok(())
        }

        Commands::Classify {
            image,
            sample,
            top_k,
            mode,
            raw,
            samples_url,
        } => {
            let api_config = config.api_config()?;
            let docs_url = api_config.docs_url();
            let gateway = Arc::new(HttpGateway::new(api_config)?);

            let upload = match (image, sample) {
                (Some(path), _) => load_image(path).await?,
                (None, Some(id)) => {
                    let sample = find_sample(&id)
                        .with_context(|| format!("unknown sample '{id}' (see `samples`)"))?;
                    let base = samples_url.unwrap_or_else(|| config.samples_base_url.clone());
                    fetch_sample(gateway.http_client(), &base, sample).await?
                }
                (None, None) => anyhow::bail!("an image path or --sample is required"),
            };

            let api: Arc<dyn InferenceApi> = gateway.clone();
            let mut controller = ViewController::new(api, PreviewStore::new())
                .with_preferences(config.default_top_k, config.default_mode)?;
            spawn_ctrl_c_handler(&controller);

            if let Some(top_k) = top_k {
                controller.set_top_k(top_k)?;
            }
            if let Some(mode) = mode {
                controller.set_mode(mode);
            }
            controller.set_show_raw(raw);
            controller.select_image(upload);

            let health_ticket = controller.begin_health_check();
            let predict_ticket = controller
                .begin_classify()
                .context("no image selected")?;
            info!(
                "Classifying {} with top-k {}",
                predict_ticket.image().file_name,
                predict_ticket.top_k()
            );

            // Health never gates the prediction; both run together
            let (health, prediction) = tokio::join!(
                gateway.check_health(health_ticket.cancel_token()),
                gateway.predict(
                    predict_ticket.image(),
                    predict_ticket.top_k(),
                    predict_ticket.cancel_token()
                ),
            );
            controller.complete_health_check(health_ticket, health);
            if !controller.complete_classify(predict_ticket, prediction) {
                warn!("Classification cancelled");
            }

            print!(
                "{}",
                render::render(controller.state(), controller.results(), docs_url.as_deref())
            );

            let failed = controller.state().status == PredictStatus::Error;
            controller.teardown();
            if failed {
                anyhow::bail!("classification failed");
            }
            Ok(())
        }
    }
}

async fn load_image(path: PathBuf) -> anyhow::Result<ImageUpload> {
    ImageUpload::from_path(&path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))
}

/// Cancel the controller's requests on Ctrl+C
fn spawn_ctrl_c_handler(controller: &ViewController) {
    let shutdown = controller.shutdown_token();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    warn!("Interrupt received, cancelling in-flight requests");
                    shutdown.cancel();
                }
            }
            _ = shutdown.cancelled() => {}
        }
    });
}

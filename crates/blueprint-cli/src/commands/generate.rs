use std::sync::Arc;

use anyhow::Context;
use blueprint_core::{FileInput, InputMode, InputPanel, Preview, Session, UserInput};
use blueprint_generate::GeminiGenerator;

use crate::cli::GenerateArgs;
use crate::{opener, output};

/// Run the input through the normalizer the same way the interactive panel
/// would: pick the mode, then stage the raw value.
fn stage_input(args: &GenerateArgs) -> anyhow::Result<Option<UserInput>> {
    let mut panel = InputPanel::new();

    if let Some(path) = &args.file {
        panel.switch_mode(InputMode::File);
        let file = FileInput::from_path(path)?;
        let input = panel.select_file(Some(file));
        match panel.preview() {
            Some(Preview::Document { name, size_kb }) => {
                tracing::info!(%name, size_kb, "staged document");
            }
            Some(Preview::Image { data_url }) => {
                tracing::info!(encoded_len = data_url.len(), "staged image");
            }
            None => {}
        }
        return Ok(input);
    }

    if let Some(url) = &args.url {
        panel.switch_mode(InputMode::Url);
        return Ok(panel.set_url(url));
    }

    if let Some(text) = &args.text {
        panel.switch_mode(InputMode::Text);
        return Ok(panel.set_text(text));
    }

    Ok(None)
}

pub async fn handle(args: &GenerateArgs) -> anyhow::Result<()> {
    let input = stage_input(args)?.context("the data source is empty")?;

    let settings = blueprint_core::read_settings()?.with_env_key();
    let generator = Arc::new(GeminiGenerator::new(&settings));
    let session = Session::new(generator).with_deploy_delay(settings.deploy_delay());

    session.set_input(Some(input));
    eprintln!("Analyzing your data with {}...", settings.model);
    session.generate().await;

    let snapshot = session.snapshot();
    if let Some(error) = snapshot.error {
        anyhow::bail!(error);
    }
    let bundle = snapshot
        .bundle
        .context("generation finished without a result")?;

    for path in output::write_bundle(&args.out, &bundle)? {
        println!("wrote {}", path.display());
    }
    println!("{} endpoints generated", bundle.api_endpoints.len());

    if !args.deploy {
        return Ok(());
    }

    eprintln!("Deploying (simulated, nothing is provisioned)...");
    let url = session
        .deploy()
        .await
        .context("nothing to deploy")?;
    println!("deployed to mock endpoint {url}");

    let html = session
        .explorer_document()
        .context("deployment finished without an explorer page")?;
    let path = args.out.join(output::EXPLORER_FILE);
    output::write_explorer(&path, &html)?;
    println!("wrote {}", path.display());

    if args.open {
        opener::open_in_browser(&path)?;
    }
    Ok(())
}

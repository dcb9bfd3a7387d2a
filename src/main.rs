use anyhow::{bail, Context};
use clap::Parser;
use std::path::Path;

mod bundle;
mod cli;
mod config;
mod errors;
mod export;
mod generate;
mod history;
mod log;
mod prompt;
mod provider;
mod safety;
mod templates;
mod ux;
mod wire;
mod wizard;

use bundle::GeneratedBundle;
use history::History;
use wizard::WizardSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init(args.debug);

    let mut cfg = config::Config::resolve(args.config.as_deref())?;
    cfg.apply_args(&args);
    tracing::debug!(?cfg, "configuration resolved");

    let history = match History::open(&cfg.history_file()) {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!(error = %e, "history unavailable, keeping this session in memory");
            History::in_memory()?
        }
    };

    if args.clear_history {
        let removed = history.clear()?;
        println!("Removed {removed} tools from history.");
        return Ok(());
    }

    if let Some(limit) = args.history {
        ux::show_history(&history.recent(limit)?);
        return Ok(());
    }

    let dispatcher = generate::Dispatcher::from_config(&cfg);
    tracing::info!(generator = dispatcher.provider_name(), online = dispatcher.is_online(), "ready");

    let interactive = args.prompt.is_none();
    let mut session = WizardSession::new(cfg.max_prompt_chars);

    loop {
        // ===== STEP 0: DESCRIBE =====
        ux::show_steps(session.step());
        match &args.prompt {
            Some(p) => {
                if let Err(e) = session.submit_prompt(p) {
                    bail!("{e}");
                }
            }
            None => loop {
                let Some(text) = ux::ask("Describe the accessible tool you need:") else {
                    return Ok(());
                };
                match session.submit_prompt(&text) {
                    Ok(()) => break,
                    Err(e) => ux::show_retryable("description", &e),
                }
            },
        }

        // ===== STEP 1: TEMPLATE =====
        ux::show_steps(session.step());
        let kind = match args.template {
            Some(k) => k,
            None if interactive => {
                ux::show_templates();
                ux::parse_template_choice(&ux::ask("Template [1-4, Enter for custom]:").unwrap_or_default())
            }
            None => bundle::TemplateKind::default(),
        };
        session.choose_template(kind)?;

        // ===== STEP 2: BUILDING =====
        ux::show_steps(session.step());
        let built = ux::building(args.fast || !interactive, session.run_generation(&dispatcher))
            .await
            .map(|_| ());
        if let Err(e) = built {
            bail!("{e}");
        }

        // ===== STEP 3: DEPLOY =====
        ux::show_steps(session.step());
        let Some(bundle) = session.bundle() else {
            bail!("no bundle after generation");
        };
        ux::show_bundle(bundle, session.prompt());
        if let Err(e) = history.record(bundle) {
            tracing::warn!(error = %e, "could not record history");
        }

        deploy(bundle, &cfg, &args, interactive)?;

        if !interactive || !ux::confirm("Start over with a new tool?") {
            break;
        }
        session.start_over();
    }

    Ok(())
}

/// Export failures are retryable: interactively the user may try again, in
/// one-shot mode the process exits non-zero with the bundle untouched.
fn deploy(bundle: &GeneratedBundle, cfg: &config::Config, args: &cli::Args, interactive: bool) -> anyhow::Result<()> {
    let out = Path::new(&cfg.out_dir);

    loop {
        match export::archive(bundle, out) {
            Ok(sum) => {
                ux::show_archive(&sum);
                break;
            }
            Err(e) => {
                ux::show_retryable("download", &e);
                if !(interactive && ux::confirm("Retry the download?")) {
                    return Err(e).context("writing archive");
                }
            }
        }
    }

    if args.unpack {
        let dir = out.join(bundle.slug());
        let sum = export::write_files(bundle, &dir).context("unpacking files")?;
        ux::show_unpacked(&sum);
    }

    if args.instructions || (interactive && ux::confirm("Show deployment instructions?")) {
        println!("\n{}", export::deployment_instructions(bundle));
    }

    let want_preview = args.preview || (interactive && !args.yes && ux::confirm("Open a preview in your browser?"));
    if want_preview {
        match export::preview(bundle, None, !args.no_open) {
            Ok(entry) => println!("Preview: {}", entry.display()),
            Err(e) => ux::show_retryable("preview", &e),
        }
    }
    Ok(())
}

use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod apply;
mod archive;
mod cli;
mod config;
mod errors;
mod generate;
mod log;
mod parse;
mod prompt;
mod provider;
mod safety;
mod session;
mod tree;
mod ux;
mod wire;

use session::Session;

fn init_tracing(debug: bool) {
    let default = if debug { "rolegen=debug" } else { "rolegen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.debug);

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    cfg.apply_args(&args);
    tracing::debug!(?cfg, "configuration");

    let description = match &args.description {
        Some(d) => d.clone(),
        None => ux::read_description().context("reading description from stdin")?,
    };

    let prov = match provider::make_provider(cfg.provider, cfg.api_base.clone()) {
        Ok(prov) => prov,
        Err(e) => {
            let err = errors::GenError::transport(&e);
            tracing::error!(kind = err.label(), provider = ?cfg.provider, "provider setup failed");
            ux::print_error(&err);
            std::process::exit(1);
        }
    };

    let mut session = Session::new();
    let description = session.begin(&description)?;

    let mut generator = generate::Generator::new(prov, cfg.model());
    if cfg.save_artifacts {
        generator = generator.with_journal(log::Journal::new(&cfg.artifacts_dir));
    }

    let pb = ux::spinner("Generating your Ansible role... this might take a moment.");
    let outcome = generator.generate(&description).await;
    pb.finish_and_clear();
    session.settle(outcome);

    if let Some(path) = &args.select {
        if !session.select(path) {
            tracing::warn!(%path, "selected file is not part of the generated role");
        }
    }

    if let Some(err) = session.error() {
        tracing::error!(kind = err.label(), "generation failed");
        ux::print_error(err);
        std::process::exit(1);
    }
    let Some(files) = session.files() else {
        return Err(anyhow!("generation did not settle: {:?}", session.state()));
    };

    let root = match tree::build(files) {
        Ok(root) => root,
        Err(err) => {
            ux::print_error(&err);
            std::process::exit(1);
        }
    };
    ux::print_generation_dashboard(files, &root);
    ux::print_tree(&root, session.selected().map(|f| f.path.as_str()));
    if let Some(file) = session.selected() {
        ux::print_file(file);
    }

    if !args.no_archive {
        let name = archive::archive_name(files, &cfg.fallback_archive_name);
        let out_dir = Path::new(&cfg.out_dir);
        let dest = out_dir.join(&name);
        if args.dry_run {
            println!("(dry run) would write {}", dest.display());
        } else if dest.exists() && !args.yes && !ux::confirm(&format!("{} exists. Overwrite?", dest.display())) {
            println!("Skipped archive.");
        } else {
            match archive::export(files).await {
                Ok(blob) => {
                    let saved = archive::save(out_dir, &name, &blob)?;
                    ux::print_archive_saved(&saved, blob.len());
                }
                Err(err) => {
                    tracing::error!(error = ?err, "archive export failed");
                    ux::print_error(&err);
                    std::process::exit(1);
                }
            }
        }
    }

    if let Some(dir) = &args.extract {
        let dir = Path::new(dir);
        let clobber = apply::existing(dir, files);
        let proceed = args.dry_run
            || clobber.is_empty()
            || args.yes
            || ux::confirm(&format!("{} file(s) under {} will be replaced. Continue?", clobber.len(), dir.display()));
        if proceed {
            let summary = apply::write_files(dir, files, args.dry_run)?;
            ux::print_write_dashboard(dir, &summary, args.dry_run);
        } else {
            println!("Skipped extract.");
        }
    }

    Ok(())
}

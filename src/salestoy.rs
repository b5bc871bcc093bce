use std::{io::Write, path::PathBuf};

use anyhow::Context;
use log::*;

use crate::{
    auth::Authenticator,
    config::Config,
    export,
    loader::{DatasetLoader, SalesReader},
    report,
    session::Session,
};

/// The main application
pub struct SalesToyApp {}

impl SalesToyApp {
    /// Runs one request: log in if asked to, load the data, apply the
    /// selection from `config`, print the dashboard to `out` and export if requested
    pub fn run<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
        if let Some(user) = &config.user {
            let password = config.password.as_deref().unwrap_or_default();
            Self::login(&config.credentials(), user, password)?;
        } else if !config.credentials.is_empty() {
            anyhow::bail!("this dashboard requires a login, pass --user and --password");
        }

        let loader = DatasetLoader::with_reader(&config.data, config.reader());
        Self::serve(&loader, config, out)
    }

    /// Answers one request against whatever dataset `loader` currently holds
    pub fn serve<R: SalesReader, W: Write>(
        loader: &DatasetLoader<R>,
        config: &Config,
        out: &mut W,
    ) -> anyhow::Result<()> {
        let dataset = loader
            .load()
            .with_context(|| format!("Failed to load {}", loader.path().display()))?;

        let mut session = Session::new(dataset);
        let selection = config.selection(session.dataset());
        session.set_selection(selection);

        let records = session.filtered_records();
        let aggregates = session.aggregates();
        report::render(out, &aggregates, &records, config.rows)?;

        if let Some(target) = &config.export {
            let path = target.clone().unwrap_or_else(|| {
                PathBuf::from(export::export_file_name(chrono::Local::now().date_naive()))
            });
            export::write_csv_file(&path, session.dataset().headers(), &records)
                .with_context(|| format!("Failed to export to {}", path.display()))?;
            writeln!(out, "Exported {} rows to {}", records.len(), path.display())?;
        }

        Ok(())
    }

    pub fn login(auth: &impl Authenticator, user: &str, password: &str) -> anyhow::Result<()> {
        if auth.authenticate(user, password) {
            info!("User {} logged in", user);
            Ok(())
        } else {
            warn!("Rejected login for {}", user);
            Err(anyhow::anyhow!("Invalid username or password"))
        }
    }
}

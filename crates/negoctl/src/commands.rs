//! Command handlers for negoctl.

use anyhow::{bail, Context as _, Result};
use nego_common::config::discover_config_path;
use nego_common::ui::{print_info, print_kv, print_ok, print_section};
use nego_common::{
    find_task_by_query, normalize, summarize, BackendClient, CanonicalResults, Initiator,
    NegoConfig, NegotiationRequest,
};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::display;
use crate::json_types::{DetailJson, ResultsJson};
use crate::source::ResultSource;

/// Resolved settings and the backend client every handler shares
pub struct Context {
    pub config: NegoConfig,
    pub config_path: Option<PathBuf>,
    pub client: BackendClient,
}

impl Context {
    /// `--backend` beats `$NEGOCTL_BACKEND_URL`, which `NegoConfig::load`
    /// has already applied over the file.
    pub fn new(
        mut config: NegoConfig,
        config_path: Option<PathBuf>,
        backend: Option<String>,
    ) -> Result<Self> {
        if let Some(url) = backend.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            config.backend.url = url;
        }
        let client = BackendClient::from_config(&config)?;
        debug!(backend = client.base_url(), "context ready");
        Ok(Self {
            config,
            config_path,
            client,
        })
    }
}

pub async fn create_satellites(ctx: &Context, count: Option<u32>, coalitions: bool) -> Result<()> {
    let count = count.unwrap_or(ctx.config.negotiation.num_satellites);
    let satellites = ctx.client.create_satellites(count).await?;
    info!(count = satellites.len(), "satellites created");

    print!("{}", display::render_satellites(&satellites));
    if coalitions {
        println!();
        print!("{}", display::render_coalition_tables(&satellites));
    }
    Ok(())
}

pub async fn create_tasks(ctx: &Context, count: Option<u32>) -> Result<()> {
    let count = count.unwrap_or(ctx.config.negotiation.num_tasks);
    let tasks = ctx.client.create_tasks(count).await?;
    info!(count = tasks.len(), "tasks created");

    print!("{}", display::render_tasks(&tasks));
    Ok(())
}

pub async fn negotiate(
    ctx: &Context,
    satellites: Option<u32>,
    tasks: Option<u32>,
    negotiator: Option<String>,
    initiator: Option<String>,
    json: bool,
) -> Result<()> {
    let defaults = &ctx.config.negotiation;
    let request = NegotiationRequest {
        num_satellites: satellites.unwrap_or(defaults.num_satellites),
        num_tasks: tasks.unwrap_or(defaults.num_tasks),
        negotiator_version: negotiator.unwrap_or_else(|| defaults.negotiator_version.clone()),
        initiator: Initiator::from_arg(initiator.as_deref()),
    };
    info!(
        satellites = request.num_satellites,
        tasks = request.num_tasks,
        negotiator = %request.negotiator_version,
        initiator = request.initiator.as_wire(),
        "starting negotiation"
    );

    let payload = ctx.client.start_negotiation(&request).await?;
    let canonical = normalize(&payload).context("negotiation response")?;
    show_results(&canonical, json)
}

pub async fn results(ctx: &Context, file: Option<PathBuf>, json: bool) -> Result<()> {
    let source = ResultSource::new(&ctx.client, file);
    let payload = source.fetch().await?;
    let canonical = normalize(&payload)
        .with_context(|| format!("results from {}", source.describe()))?;
    show_results(&canonical, json)
}

pub async fn detail(ctx: &Context, task_id: &str, file: Option<PathBuf>, json: bool) -> Result<()> {
    let source = ResultSource::new(&ctx.client, file);
    let payload = source.fetch().await?;
    let canonical = normalize(&payload)
        .with_context(|| format!("results from {}", source.describe()))?;
    let outcome = find_task_by_query(&canonical, task_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&DetailJson::from_outcome(outcome))?);
    } else {
        print!("{}", display::render_detail(outcome));
    }
    Ok(())
}

pub async fn save(ctx: &Context, filename: &str) -> Result<()> {
    let message = ctx.client.save_data(filename).await?;
    if message.is_empty() {
        print_ok(&format!("Saved as {}", filename));
    } else {
        print_ok(&message);
    }
    Ok(())
}

pub async fn load(ctx: &Context, filename: &str) -> Result<()> {
    let loaded = ctx.client.load_data(filename).await?;
    if !loaded.message.is_empty() {
        print_ok(&loaded.message);
    }

    print!("{}", display::render_satellites(&loaded.satellites));
    println!();
    print!("{}", display::render_tasks(&loaded.tasks));
    Ok(())
}

pub fn config_show(ctx: &Context) -> Result<()> {
    let path = ctx.config_path.clone().or_else(discover_config_path);
    let kw = 12;

    print_section("config", "effective settings");
    print_kv(
        "file",
        &path.map(|p| p.display().to_string()).unwrap_or_else(|| "(none)".to_string()),
        kw,
    );
    print_kv("backend", &ctx.config.backend.url, kw);
    print_kv("timeout", &format!("{}s", ctx.config.backend.effective_timeout_secs()), kw);
    print_kv("negotiator", &ctx.config.negotiation.negotiator_version, kw);
    print_kv("satellites", &ctx.config.negotiation.num_satellites.to_string(), kw);
    print_kv("tasks", &ctx.config.negotiation.num_tasks.to_string(), kw);
    print_kv("log level", &ctx.config.log.level, kw);
    Ok(())
}

pub fn config_init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let Some(path) = config_path.or_else(discover_config_path) else {
        bail!("no config location: set $NEGOCTL_CONFIG or pass --config");
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    NegoConfig::default().save(&path)?;
    print_ok(&format!("Wrote {}", path.display()));
    Ok(())
}

fn show_results(canonical: &CanonicalResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&ResultsJson::from_canonical(canonical))?);
        return Ok(());
    }

    print!("{}", display::render_results(canonical));
    if canonical.is_empty() {
        return Ok(());
    }

    println!();
    print!("{}", display::render_summary(&summarize(canonical)));

    if let Some(performance) = display::render_performance(canonical) {
        println!();
        print!("{}", performance);
    }

    if canonical.groups.len() > 1 {
        print_info(&format!("{} initiators negotiated in this run", canonical.groups.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_flag_overrides_config() {
        let config = NegoConfig::default();
        let ctx = Context::new(config, None, Some("http://nego:9000/".to_string())).unwrap();
        assert_eq!(ctx.client.base_url(), "http://nego:9000");
        assert_eq!(ctx.config.backend.url, "http://nego:9000/");
    }

    #[test]
    fn test_blank_backend_flag_is_ignored() {
        let mut config = NegoConfig::default();
        config.backend.url = "http://config:8000".to_string();
        let ctx = Context::new(config, None, Some("  ".to_string())).unwrap();
        assert_eq!(ctx.client.base_url(), "http://config:8000");
    }

    #[test]
    fn test_config_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("negoctl").join("config.toml");

        config_init(Some(path.clone()), false).unwrap();
        assert!(path.exists());
        assert!(config_init(Some(path.clone()), false).is_err());
        config_init(Some(path.clone()), true).unwrap();

        let loaded = NegoConfig::load_from(&path).unwrap();
        assert_eq!(loaded, NegoConfig::default());
    }

    #[tokio::test]
    async fn test_detail_from_file_missing_task_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let payload = r#"{"negotiation_results": [{"task_id": 1, "negotiations": []}]}"#;
        std::fs::write(&path, payload).unwrap();

        let ctx = Context::new(NegoConfig::default(), None, None).unwrap();
        let err = detail(&ctx, "2", Some(path), false).await.unwrap_err();
        assert_eq!(crate::errors::exit_code_for(&err), crate::errors::EXIT_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_results_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"message": "ok"}"#).unwrap();

        let ctx = Context::new(NegoConfig::default(), None, None).unwrap();
        let err = results(&ctx, Some(path), true).await.unwrap_err();
        assert_eq!(crate::errors::exit_code_for(&err), crate::errors::EXIT_MALFORMED_PAYLOAD);
    }
}

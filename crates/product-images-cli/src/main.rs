mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use product_images::{FanOut, Pipeline, PipelineConfig};
use product_images_http::{HttpCatalog, HttpCatalogConfig, HttpImageFetcher};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "product-images")]
#[command(about = "Download catalog images for every product in a list")]
struct Cli {
    /// File with one product identifier per line
    input: PathBuf,
    /// Directory the per-product image folders are created in
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Catalog URL template; `{identifier}` is replaced by each product
    #[arg(long)]
    catalog_url: Option<String>,
    /// Maximum concurrent image downloads per product (default: unbounded)
    #[arg(long)]
    concurrency: Option<usize>,
    /// Config file (defaults to ~/.config/product-images/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Config file values, overridden by whatever was given on the command line.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config(),
    };

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(url) = &cli.catalog_url {
        config.catalog_url = url.clone();
    }
    if cli.concurrency.is_some() {
        config.concurrency = cli.concurrency;
    }

    Ok(config)
}

fn build_pipeline(config: &AppConfig) -> Pipeline {
    let client = reqwest::Client::new();

    let catalog = HttpCatalog::with_client(
        HttpCatalogConfig {
            url_template: config.catalog_url.clone(),
            user_agent: config.user_agent.clone(),
        },
        client.clone(),
    );
    let fetcher = HttpImageFetcher::with_client(client, config.user_agent.clone());

    Pipeline::new(
        Arc::new(catalog),
        Arc::new(fetcher),
        PipelineConfig {
            output_dir: config.output_dir.clone(),
            fan_out: FanOut::from_limit(config.concurrency),
        },
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = resolve_config(&cli)?;
    let pipeline = build_pipeline(&config);

    let summary = pipeline
        .run(&cli.input)
        .await
        .with_context(|| format!("import from {} failed", cli.input.display()))?;

    println!(
        "Downloaded images for {} products into {}.",
        summary.products,
        config.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["product-images"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "output_dir = \"from-file\"\nconcurrency = 4\nuser_agent = \"file-agent\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "product-images",
            "products.txt",
            "--config",
            path.to_str().unwrap(),
            "--output-dir",
            "from-flag",
            "--catalog-url",
            "http://catalog.local/{identifier}",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(cli.input, PathBuf::from("products.txt"));
        assert_eq!(config.output_dir, PathBuf::from("from-flag"));
        assert_eq!(config.catalog_url, "http://catalog.local/{identifier}");
        assert_eq!(config.concurrency, Some(4));
        assert_eq!(config.user_agent.as_deref(), Some("file-agent"));
    }

    #[test]
    fn concurrency_flag_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "concurrency = 4\n").unwrap();

        let cli = Cli::try_parse_from([
            "product-images",
            "products.txt",
            "--config",
            path.to_str().unwrap(),
            "--concurrency",
            "1",
        ])
        .unwrap();

        assert_eq!(resolve_config(&cli).unwrap().concurrency, Some(1));
    }

    #[test]
    fn unreadable_explicit_config_is_error() {
        let cli = Cli::try_parse_from([
            "product-images",
            "products.txt",
            "--config",
            "/nonexistent/product-images.toml",
        ])
        .unwrap();

        assert!(resolve_config(&cli).is_err());
    }
}

use anyhow::Result;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use paginator::config::Config;
use paginator::layout::{single_page_view, PageGeometry, Paginator};
use paginator::models::mock::generate_mock_data;
use paginator::render::metric::{MetricRenderer, MetricTemplate};
use paginator::PaginationError;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting paginator preview v{}", env!("CARGO_PKG_VERSION"));

    let geometry = PageGeometry::from(config.page_standard);
    let template = MetricTemplate::classic(config.preview_font);
    info!(
        "Page {:?} {}x{}px, template '{}' ({:?})",
        config.page_standard, geometry.width_px, geometry.height_px, template.name, template.font
    );

    let model = generate_mock_data(config.preview_mock_size);
    let mut renderer = MetricRenderer::new(template);
    let paginator = Paginator::new(config.pagination.clone(), geometry);

    let summary = match paginator.paginate(&mut renderer, &model).await {
        Ok(doc) => {
            let pages: Vec<_> = doc
                .pages
                .iter()
                .zip(&doc.fills)
                .map(|(page, fill)| {
                    json!({
                        "page": page.page_number,
                        "continued": page.continued_sections,
                        "skills": page.view.skills.len(),
                        "experience": page.view.experience.len(),
                        "projects": page.view.projects.len(),
                        "education": page.view.education.len(),
                        "languages": page.view.languages.len(),
                        "achievements": page.view.achievements.len(),
                        "certifications": page.view.certifications.len(),
                        "used_px": fill.used_px,
                        "available_px": fill.available_px,
                        "fill_ratio": fill.fill_ratio,
                        "verdict": fill.verdict,
                    })
                })
                .collect();
            json!({
                "run_id": doc.run_id,
                "mock_size": config.preview_mock_size,
                "total_pages": doc.total_pages,
                "iterations": doc.iterations,
                "pages": pages,
            })
        }
        Err(err @ PaginationError::NonConvergence { .. }) => {
            warn!("{err}; falling back to a single page");
            let view = single_page_view(&model);
            json!({
                "mock_size": config.preview_mock_size,
                "total_pages": view.total_pages(),
                "fallback": true,
            })
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

//! The `export` subcommand.

use crate::forecast::load_forecast;
use wfc_core::{config::ServiceConfig, PredictionService};
use wfc_export::{compose, forecast_surfaces, Document, DEFAULT_TITLE};

/// Fetch the forecast for `date` and compose its charts into a document.
pub async fn build_document<S: PredictionService + Clone>(
    service: S,
    config: &ServiceConfig,
    date: &str,
) -> anyhow::Result<Document> {
    let set = load_forecast(service, config, date, None).await?;
    let title = format!("{} for {}", DEFAULT_TITLE, set.anchor);
    Ok(compose(&title, &forecast_surfaces(&set)).await?)
}

pub async fn run_export<S: PredictionService + Clone>(
    service: S,
    config: &ServiceConfig,
    date: &str,
    out: &str,
) -> anyhow::Result<()> {
    let document = build_document(service, config, date).await?;
    document.write_to(out)?;
    println!("Exported {} pages to {}", document.len(), out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfc_core::testing::StaticService;

    #[tokio::test]
    async fn test_document_pages() {
        let doc = build_document(StaticService::new(), &ServiceConfig::default(), "2024-05-15")
            .await
            .unwrap();
        assert_eq!(doc.title, "Weather Forecast for 2024-05-15");
        assert_eq!(doc.len(), 3);
        assert!(doc.pages.iter().all(|p| p.image.svg.contains("<svg")));
    }
}

use cassview_core::catalog::SessionCatalog;
use tokio_util::sync::CancellationToken;

use crate::events::UiEvent;

/// Re-queries every agent on a private copy of the catalog.
///
/// The reducer publishes the result; the copy's cache is discarded.
pub async fn catalog_refresh(
    mut catalog: SessionCatalog,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    catalog.invalidate();
    let refresh = catalog.refresh_all();
    let snapshot = match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!("catalog refresh canceled");
                return UiEvent::CatalogRefreshCanceled;
            }
            snapshot = refresh => snapshot,
        },
        None => refresh.await,
    };
    UiEvent::CatalogLoaded { snapshot }
}

pub async fn reindex(catalog: SessionCatalog) -> UiEvent {
    tracing::info!("re-index started");
    UiEvent::ReindexFinished {
        result: catalog.reindex().await,
    }
}

pub async fn stats_load(catalog: SessionCatalog) -> UiEvent {
    UiEvent::StatsLoaded {
        stats: catalog.stats().await,
    }
}

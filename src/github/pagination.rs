//! Bounded page walking for listing endpoints.

use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

/// Fetch pages `1..=max_pages` until one comes back empty.
///
/// A failed page ends the walk and whatever was gathered so far is
/// returned; nothing is retried. Reaching `max_pages` also ends the walk.
pub async fn collect_pages<T, E, F, Fut>(max_pages: u32, mut fetch_page: F) -> Vec<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
    E: Display,
{
    let mut items = Vec::new();

    for page in 1..=max_pages {
        match fetch_page(page).await {
            Ok(batch) if batch.is_empty() => {
                debug!("Page {} is empty, listing complete", page);
                return items;
            }
            Ok(batch) => {
                debug!("Page {} returned {} items", page, batch.len());
                items.extend(batch);
            }
            Err(e) => {
                warn!("Listing stopped at page {}: {}", page, e);
                println!("❌ Error fetching repositories: {}", e);
                return items;
            }
        }
    }

    warn!(
        "Stopped listing after {} pages without reaching an empty page",
        max_pages
    );
    items
}

//! Live map page.

use super::{PageContent, PageContext};

/// Renders the live map container; tiles and markers are drawn client-side.
pub fn page(_context: &PageContext) -> PageContent {
    PageContent {
        title: "Map".to_string(),
        body: r#"<section id="map" data-page="map">
  <h1>Map</h1>
  <div class="page-body" id="map-canvas" data-source="/api/positions"></div>
</section>"#
            .to_string(),
    }
}

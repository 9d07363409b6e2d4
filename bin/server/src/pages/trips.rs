//! Trips page: the console landing view.

use super::{PageContent, PageContext};

/// Renders the trips overview. The trip table itself comes from the
/// reporting layer; the gateway only mounts its container.
pub fn page(_context: &PageContext) -> PageContent {
    PageContent {
        title: "Trips".to_string(),
        body: r#"<section id="trips" data-page="trips">
  <h1>Trips</h1>
  <div class="page-body" data-source="/api/trips"></div>
</section>"#
            .to_string(),
    }
}

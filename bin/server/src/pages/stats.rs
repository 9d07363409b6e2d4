//! Statistics page.

use super::{PageContent, PageContext};

pub fn page(_context: &PageContext) -> PageContent {
    PageContent {
        title: "Stats".to_string(),
        body: r#"<section id="stats" data-page="stats">
  <h1>Stats</h1>
  <div class="page-body" data-source="/api/stats"></div>
</section>"#
            .to_string(),
    }
}

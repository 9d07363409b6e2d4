//! Driver document validation page. Admin-restricted.

use super::{PageContent, PageContext};

pub fn page(_context: &PageContext) -> PageContent {
    PageContent {
        title: "Driver documents".to_string(),
        body: r#"<section id="driver-documents" data-page="driver-documents">
  <h1>Driver documents</h1>
  <div class="page-body" data-source="/api/drivers/documents"></div>
</section>"#
            .to_string(),
    }
}

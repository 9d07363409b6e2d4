//! Administration page. Admin-restricted.

use super::{PageContent, PageContext, escape_html};

/// Renders the administration view for the signed-in operator.
pub fn page(context: &PageContext) -> PageContent {
    let operator = context
        .identity
        .as_ref()
        .map(|identity| escape_html(identity.label()))
        .unwrap_or_else(|| "operator".to_string());

    PageContent {
        title: "Administration".to_string(),
        body: format!(
            r#"<section id="admin" data-page="admin">
  <h1>Administration</h1>
  <p class="operator">Signed in as {operator}</p>
  <div class="page-body" data-source="/api/admin"></div>
</section>"#
        ),
    }
}

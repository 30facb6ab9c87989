//! Merging of the canonical schema with authored view and application documents.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::codegen::types::{
    ApplicationVisibility, ApplicationsDocument, MergedDocument, ViewsDocument,
};
use crate::schema::CanonicalSchema;

/// Combine entities, views and application visibility into one document.
///
/// Both optional documents may be absent; the corresponding section is then
/// empty. Views naming an application that the applications document does not
/// declare are not added anywhere for that application.
pub fn merge(
    schema: CanonicalSchema,
    views: Option<ViewsDocument>,
    applications: Option<ApplicationsDocument>,
) -> MergedDocument {
    let views = views.map(|doc| doc.views).unwrap_or_default();
    let mut applications = applications.map(|doc| doc.applications).unwrap_or_default();

    // Case-insensitive application lookup, first declaration wins
    let mut index: IndexMap<String, usize> = IndexMap::new();
    for (position, app) in applications.iter().enumerate() {
        index.entry(app.name.to_lowercase()).or_insert(position);
    }

    for view in &views {
        for app_name in &view.applications {
            match index.get(&app_name.to_lowercase()) {
                Some(&position) => add_view(&mut applications[position], &view.name),
                None => debug!(
                    "View {} references unknown application {}; ignored",
                    view.name, app_name
                ),
            }
        }
    }

    info!(
        "Merged {} entities, {} views, {} applications",
        schema.entities.len(),
        views.len(),
        applications.len()
    );

    MergedDocument {
        entities: schema.entities,
        views,
        applications,
    }
}

/// Set-union insert; a name already present in any casing is a no-op
fn add_view(app: &mut ApplicationVisibility, view_name: &str) {
    if !app.views.iter().any(|v| v.eq_ignore_ascii_case(view_name)) {
        app.views.push(view_name.to_string());
    }
}

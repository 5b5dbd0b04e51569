//! Template rendering with Tera

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Layout first so the views can extend it
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("views/home.html", include_str!("../templates/views/home.html")),
            ("views/proxy.html", include_str!("../templates/views/proxy.html")),
            ("views/about.html", include_str!("../templates/views/about.html")),
            ("views/news.html", include_str!("../templates/views/news.html")),
            (
                "partials/settings.html",
                include_str!("../templates/partials/settings.html"),
            ),
            ("launch.html", include_str!("../templates/launch.html")),
            ("stats.html", include_str!("../templates/stats.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &impl Serialize) -> Result<String> {
        let ctx = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &ctx)?)
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}

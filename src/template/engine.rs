use handlebars::Handlebars;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

use super::types::ChangeContext;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Render error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    #[error("Template '{0}' not found")]
    TemplateNotFound(String),
}

const DEFAULT_TITLE: &str =
    "Update API specs ({{update_count}} changed{{#if failures}}, {{failure_count}} failed{{/if}})";

const DEFAULT_BODY: &str = r#"## API spec updates ({{date}})

| API | Previous | Current | API version | Change | Path |
|-----|----------|---------|-------------|--------|------|
{{#each updates}}
| {{name}} | {{old_version}} | {{new_version}} | {{api_version}} | {{update_type}} | `{{local_path}}` |
{{/each}}
{{#if failures}}

### Failed entries

{{#each failures}}
- `{{entry}}` ({{kind}}): {{reason}}
{{/each}}
{{/if}}
"#;

/// Renders change request titles and bodies.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    body_template: String,
}

impl TemplateEngine {
    /// Engine with the built-in title and body templates
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Output is markdown, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        Self {
            handlebars,
            body_template: DEFAULT_BODY.to_string(),
        }
    }

    /// Replace the body template with the contents of a file
    pub async fn load_body_template(&mut self, template_path: &Path) -> Result<(), TemplateError> {
        if !template_path.exists() {
            return Err(TemplateError::TemplateNotFound(
                template_path.display().to_string(),
            ));
        }

        self.body_template = fs::read_to_string(template_path).await?;
        Ok(())
    }

    pub fn render_title(&self, context: &ChangeContext) -> Result<String, TemplateError> {
        let title = self.handlebars.render_template(DEFAULT_TITLE, context)?;
        Ok(title.trim().to_string())
    }

    pub fn render_body(&self, context: &ChangeContext) -> Result<String, TemplateError> {
        self.handlebars
            .render_template(&self.body_template, context)
            .map_err(TemplateError::from)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::Arc;

use crate::{
    error::{ApiError, INVALID_ROUTE_ERROR},
    model::templates::{EmailTemplate, EmailTemplateType},
    pagination::PageWindow,
    service::templates::EmailTemplatesService,
};

const TEMPLATES_PATH_SEGMENT: &str = "email-templates";

/// Routes the template list page navigates to. The caller pushes the path
/// onto whatever history mechanism it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatesRoute {
    TemplateTypeList,
    AddTemplate { template_type_id: String },
}

impl TemplatesRoute {
    pub fn path(&self) -> String {
        match self {
            Self::TemplateTypeList => format!("/{}", TEMPLATES_PATH_SEGMENT),
            Self::AddTemplate { template_type_id } => format!(
                "/{}/{}/add-template",
                TEMPLATES_PATH_SEGMENT,
                urlencoding::encode(template_type_id)
            ),
        }
    }
}

/// Extracts the template-type id from a console path such as
/// `/email-templates/accountconfirmation`.
pub fn template_type_id_from_path(path: &str) -> Option<String> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    segments
        .by_ref()
        .find(|segment| *segment == TEMPLATES_PATH_SEGMENT)?;
    let id = segments.next()?;
    urlencoding::decode(id)
        .map(|decoded| decoded.into_owned())
        .ok()
}

/// Controller for the email template locale list.
///
/// Fetches the template type once on load; paging is pure slice arithmetic
/// over the stored list and never re-fetches.
pub struct EmailTemplateListPage {
    service: Arc<dyn EmailTemplatesService>,
    template_type: Option<EmailTemplateType>,
    window: PageWindow,
}

impl EmailTemplateListPage {
    pub fn new(service: Arc<dyn EmailTemplatesService>) -> Self {
        Self {
            service,
            template_type: None,
            window: PageWindow::default(),
        }
    }

    /// Derive the template-type id from the current path and load its
    /// templates.
    pub async fn load_from_path(&mut self, path: &str) -> Result<(), ApiError> {
        let template_type_id =
            template_type_id_from_path(path).ok_or_else(|| ApiError::Route {
                code: INVALID_ROUTE_ERROR,
                path: path.to_string(),
            })?;
        self.load(&template_type_id).await
    }

    pub async fn load(&mut self, template_type_id: &str) -> Result<(), ApiError> {
        let template_type = self.service.get_template_type(template_type_id).await?;
        self.template_type = Some(template_type);
        self.window = PageWindow::new(self.window.limit());
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.template_type
            .as_ref()
            .map(|tt| tt.display_name.as_str())
            .unwrap_or("")
    }

    pub fn total(&self) -> usize {
        self.template_type
            .as_ref()
            .map(|tt| tt.templates.len())
            .unwrap_or(0)
    }

    /// The slice of templates visible on the current page.
    pub fn visible(&self) -> &[EmailTemplate] {
        match &self.template_type {
            Some(tt) => self.window.slice(&tt.templates),
            None => &[],
        }
    }

    pub fn page(&self) -> usize {
        self.window.page()
    }

    pub fn total_pages(&self) -> usize {
        self.window.total_pages(self.total())
    }

    pub fn set_page(&mut self, page: usize) {
        self.window.set_page(page);
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.window.set_limit(size);
    }

    pub fn back_route(&self) -> TemplatesRoute {
        TemplatesRoute::TemplateTypeList
    }

    pub fn add_template_route(&self) -> Option<TemplatesRoute> {
        self.template_type
            .as_ref()
            .map(|tt| TemplatesRoute::AddTemplate {
                template_type_id: tt.id.clone(),
            })
    }
}

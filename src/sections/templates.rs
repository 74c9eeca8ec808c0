use serde::Serialize;
use serde_json::Value;

use crate::{error::ensure_non_empty, Api, Restriction, Result, TemplateConfiguration};

use super::body_restriction;

const INSERT_OR_UPDATE_TEMPLATE_URL: &str = "/{accountId}/template";
const GET_TEMPLATES_URL: &str = "/{accountId}/templates";
const TEMPLATE_URL: &str = "/{accountId}/templates/{templateId}";

const TEMPLATE_ID_PARAMETER: &str = "templateId";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateContent<'a> {
    template_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    booster: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diversity: Option<f64>,
}

/// Recommendation templates stored on the server.
pub struct TemplatesSection<'c> {
    api: &'c Api<'c>,
}

impl<'c> TemplatesSection<'c> {
    pub(crate) fn new(api: &'c Api<'c>) -> Self {
        Self { api }
    }

    /// Store `configuration` under `template_id`. Unset knobs are not sent.
    pub fn insert_or_update_template(
        &self,
        template_id: &str,
        configuration: &TemplateConfiguration,
    ) -> Result<Option<Value>> {
        ensure_non_empty(template_id, "template id")?;
        let restriction = body_restriction(&TemplateContent {
            template_id,
            filter: configuration.get_filter(),
            booster: configuration.get_booster(),
            user_weight: configuration.get_user_weight(),
            item_weight: configuration.get_item_weight(),
            diversity: configuration.get_diversity(),
        })?;
        self.api
            .perform_post(INSERT_OR_UPDATE_TEMPLATE_URL, Some(restriction))
    }

    /// List stored templates.
    pub fn get_templates(&self) -> Result<Option<Value>> {
        self.api.perform_get(GET_TEMPLATES_URL, None)
    }

    /// Fetch one stored template.
    pub fn get_template(&self, template_id: &str) -> Result<Option<Value>> {
        let restriction = id_restriction(template_id)?;
        self.api.perform_get(TEMPLATE_URL, Some(restriction))
    }

    /// Delete a stored template.
    pub fn delete_template(&self, template_id: &str) -> Result<Option<Value>> {
        let restriction = id_restriction(template_id)?;
        self.api.perform_delete(TEMPLATE_URL, Some(restriction))
    }
}

fn id_restriction(template_id: &str) -> Result<Restriction> {
    ensure_non_empty(template_id, "template id")?;
    Ok(Restriction::new().with_parameter(TEMPLATE_ID_PARAMETER, template_id))
}

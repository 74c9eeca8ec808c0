use serde::Serialize;
use serde_json::Value;

use crate::{
    batch::{RecommendationRequestRecord, RecommendationsBatch},
    error::ensure_non_empty,
    Api, Error, RecommendationContentBuilder, RecommendationEntitiesBatch, RecommendationOptions,
    RecommendationTarget, Restriction, Result,
};

use super::body_restriction;

const GET_RECOMMENDATIONS_URL: &str = "/{accountId}/model/{modelId}/recommend";
const GET_BATCH_RECOMMENDATIONS_URL: &str = "/{accountId}/model/{modelId}/recommend/batch";

const MODEL_ID_PARAMETER: &str = "modelId";

/// How the server interprets `importance` of the requests in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceType {
    /// Requests with higher importance are served first.
    #[default]
    Priority,
    /// Importance is a relative weight of the request.
    Weight,
}

/// Whether the requests in a batch see each other's results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchEvaluation {
    /// Items recommended by an earlier request are not repeated by later ones.
    #[default]
    Sequential,
    /// Requests are evaluated independently.
    Parallel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchContent<'a> {
    requests: &'a [RecommendationRequestRecord],
    importance_type: ImportanceType,
    evaluation: BatchEvaluation,
}

/// Recommendations computed by a model, `default` unless [`with_model`](Self::with_model) says
/// otherwise.
pub struct RecommendationsSection<'c> {
    api: &'c Api<'c>,
    model_id: String,
}

impl<'c> RecommendationsSection<'c> {
    /// Model used unless another one is chosen.
    pub const DEFAULT_MODEL_ID: &'static str = "default";

    pub(crate) fn new(api: &'c Api<'c>) -> Self {
        Self {
            api,
            model_id: Self::DEFAULT_MODEL_ID.to_owned(),
        }
    }

    /// Ask another model.
    pub fn with_model(self, model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..self
        }
    }

    /// Model the requests are sent to.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Recommend `count` items for the given users and/or items.
    ///
    /// Either side may be absent, a single id, or a batch of weighted entities. The arguments are
    /// validated before any request is sent.
    pub fn get_recommendations(
        &self,
        users: Option<&RecommendationTarget>,
        items: Option<&RecommendationTarget>,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<Option<Value>> {
        let content = RecommendationContentBuilder::construct(users, items, count, options)?;
        let restriction = match content {
            Value::Object(content) => Restriction::from_content(content),
            _ => return Err(Error::invalid_argument("recommendation request must be an object")),
        };
        self.post(GET_RECOMMENDATIONS_URL, restriction)
    }

    /// Recommend for a single user.
    pub fn get_recommendations_for_user(
        &self,
        user_id: &str,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<Option<Value>> {
        let users = RecommendationTarget::from(user_id);
        self.get_recommendations(Some(&users), None, count, options)
    }

    /// Recommend for weighted users.
    pub fn get_recommendations_for_users(
        &self,
        users: RecommendationEntitiesBatch,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<Option<Value>> {
        let users = RecommendationTarget::from(users);
        self.get_recommendations(Some(&users), None, count, options)
    }

    /// Recommend for a single item.
    pub fn get_recommendations_for_item(
        &self,
        item_id: &str,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<Option<Value>> {
        let items = RecommendationTarget::from(item_id);
        self.get_recommendations(None, Some(&items), count, options)
    }

    /// Recommend for weighted items.
    pub fn get_recommendations_for_items(
        &self,
        items: RecommendationEntitiesBatch,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<Option<Value>> {
        let items = RecommendationTarget::from(items);
        self.get_recommendations(None, Some(&items), count, options)
    }

    /// Recommend for nobody in particular, e.g. most popular items.
    pub fn get_general_recommendations(
        &self,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<Option<Value>> {
        self.get_recommendations(None, None, count, options)
    }

    /// Evaluate all requests of `batch` in a single call.
    pub fn get_batch_recommendations(
        &self,
        batch: &RecommendationsBatch,
        importance_type: ImportanceType,
        evaluation: BatchEvaluation,
    ) -> Result<Option<Value>> {
        if batch.is_empty() {
            return Err(Error::invalid_argument("recommendations batch can't be empty"));
        }
        let restriction = body_restriction(&BatchContent {
            requests: batch.recommendations(),
            importance_type,
            evaluation,
        })?;
        self.post(GET_BATCH_RECOMMENDATIONS_URL, restriction)
    }

    fn post(&self, url: &str, restriction: Restriction) -> Result<Option<Value>> {
        ensure_non_empty(&self.model_id, "model id")?;
        let restriction = restriction.with_parameter(MODEL_ID_PARAMETER, &self.model_id);
        self.api.perform_post(url, Some(restriction))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BatchEvaluation, ImportanceType};

    #[test]
    fn batch_modes_render_wire_names() {
        assert_eq!(
            serde_json::to_value(ImportanceType::Weight).unwrap(),
            json!("weight")
        );
        assert_eq!(
            serde_json::to_value(BatchEvaluation::default()).unwrap(),
            json!("sequential")
        );
        assert_eq!(ImportanceType::default(), ImportanceType::Priority);
    }
}

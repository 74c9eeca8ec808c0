use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Scoring knobs stored in a server-side template.
///
/// All fields start unset. Setters validate their input and can be chained:
///
/// ```
/// # use databreakers::TemplateConfiguration;
/// # fn main() -> databreakers::Result<()> {
/// let mut configuration = TemplateConfiguration::new();
/// configuration.filter("price > 10").user_weight(0.4)?.diversity(0.8)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateConfiguration {
    pub(crate) filter: Option<String>,
    pub(crate) booster: Option<String>,
    pub(crate) user_weight: Option<f64>,
    pub(crate) item_weight: Option<f64>,
    pub(crate) diversity: Option<f64>,
}

impl TemplateConfiguration {
    /// Configuration with every knob unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression restricting which items may be recommended.
    pub fn filter(&mut self, filter: impl Into<String>) -> &mut Self {
        self.filter = Some(filter.into());
        self
    }

    /// Expression boosting the score of some items.
    pub fn booster(&mut self, booster: impl Into<String>) -> &mut Self {
        self.booster = Some(booster.into());
        self
    }

    /// Weight of the user side. Must be finite.
    pub fn user_weight(&mut self, user_weight: f64) -> Result<&mut Self> {
        self.user_weight = Some(finite(user_weight, "user weight")?);
        Ok(self)
    }

    /// Weight of the item side. Must be finite.
    pub fn item_weight(&mut self, item_weight: f64) -> Result<&mut Self> {
        self.item_weight = Some(finite(item_weight, "item weight")?);
        Ok(self)
    }

    /// Set diversity. Must not be negative.
    pub fn diversity(&mut self, diversity: f64) -> Result<&mut Self> {
        let diversity = finite(diversity, "diversity")?;
        if diversity < 0.0 {
            return Err(Error::invalid_argument("diversity can't be negative"));
        }
        self.diversity = Some(diversity);
        Ok(self)
    }

    /// Filter expression, if set.
    pub fn get_filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Booster expression, if set.
    pub fn get_booster(&self) -> Option<&str> {
        self.booster.as_deref()
    }

    /// User weight, if set.
    pub fn get_user_weight(&self) -> Option<f64> {
        self.user_weight
    }

    /// Item weight, if set.
    pub fn get_item_weight(&self) -> Option<f64> {
        self.item_weight
    }

    /// Diversity, if set.
    pub fn get_diversity(&self) -> Option<f64> {
        self.diversity
    }
}

/// Limit on how many results may share a value of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeLimit {
    /// Attribute whose values are limited.
    pub attribute_id: String,
    /// Results per attribute value within one request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_in_request: Option<u32>,
    /// Length of the time window in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    /// Results per attribute value within the time window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_in_time: Option<u32>,
}

/// Diversity computed over attribute categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoriesDiversity {
    /// Restrict diversification to these categories. All categories when `None`.
    pub categories: Option<Vec<String>>,
}

/// Diversity computed over entity similarity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityDiversity {
    /// Restrict diversification to these similarity types. All types when `None`.
    pub similarity_types: Option<Vec<String>>,
}

/// Template knobs that can be sent inline with a recommendation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationTemplateConfiguration {
    pub(crate) base: TemplateConfiguration,
    pub(crate) attribute_limits: Vec<AttributeLimit>,
    pub(crate) details: bool,
    pub(crate) recommendation_feedback: Option<bool>,
    pub(crate) category_blacklist: Option<bool>,
    pub(crate) diversity_decay: Option<f64>,
    pub(crate) categories_diversity: Option<CategoriesDiversity>,
    pub(crate) similarity_diversity: Option<SimilarityDiversity>,
}

impl RecommendationTemplateConfiguration {
    /// Configuration with every knob unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from knobs shared with stored templates.
    pub fn from_template(base: TemplateConfiguration) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Knobs shared with stored templates.
    pub fn template(&self) -> &TemplateConfiguration {
        &self.base
    }

    /// Mutable access to the shared knobs.
    pub fn template_mut(&mut self) -> &mut TemplateConfiguration {
        &mut self.base
    }

    /// See [`TemplateConfiguration::filter`].
    pub fn filter(&mut self, filter: impl Into<String>) -> &mut Self {
        self.base.filter(filter);
        self
    }

    /// See [`TemplateConfiguration::booster`].
    pub fn booster(&mut self, booster: impl Into<String>) -> &mut Self {
        self.base.booster(booster);
        self
    }

    /// See [`TemplateConfiguration::user_weight`].
    pub fn user_weight(&mut self, user_weight: f64) -> Result<&mut Self> {
        self.base.user_weight(user_weight)?;
        Ok(self)
    }

    /// See [`TemplateConfiguration::item_weight`].
    pub fn item_weight(&mut self, item_weight: f64) -> Result<&mut Self> {
        self.base.item_weight(item_weight)?;
        Ok(self)
    }

    /// See [`TemplateConfiguration::diversity`].
    pub fn diversity(&mut self, diversity: f64) -> Result<&mut Self> {
        self.base.diversity(diversity)?;
        Ok(self)
    }

    /// Allow at most `limit_in_request` results per value of `attribute_id`.
    pub fn add_attribute_limit_in_request(
        &mut self,
        attribute_id: impl Into<String>,
        limit_in_request: u32,
    ) -> Result<&mut Self> {
        self.add_attribute_limit(attribute_id.into(), Some(limit_in_request), None)
    }

    /// Allow at most `limit_in_time` results per value of `attribute_id` within `time` seconds.
    pub fn add_attribute_limit_in_time(
        &mut self,
        attribute_id: impl Into<String>,
        time: u32,
        limit_in_time: u32,
    ) -> Result<&mut Self> {
        self.add_attribute_limit(attribute_id.into(), None, Some((time, limit_in_time)))
    }

    /// Combine [`add_attribute_limit_in_request`](Self::add_attribute_limit_in_request) and
    /// [`add_attribute_limit_in_time`](Self::add_attribute_limit_in_time) for one attribute.
    pub fn add_attribute_limit_in_request_and_time(
        &mut self,
        attribute_id: impl Into<String>,
        limit_in_request: u32,
        time: u32,
        limit_in_time: u32,
    ) -> Result<&mut Self> {
        self.add_attribute_limit(
            attribute_id.into(),
            Some(limit_in_request),
            Some((time, limit_in_time)),
        )
    }

    fn add_attribute_limit(
        &mut self,
        attribute_id: String,
        limit_in_request: Option<u32>,
        limit_in_time: Option<(u32, u32)>,
    ) -> Result<&mut Self> {
        if attribute_id.is_empty() {
            return Err(Error::invalid_argument("attribute id can't be empty"));
        }
        if limit_in_request == Some(0) {
            return Err(Error::invalid_argument(
                "limit in request must be bigger than 0",
            ));
        }
        if let Some((time, limit)) = limit_in_time {
            if time == 0 {
                return Err(Error::invalid_argument("time must be bigger than 0"));
            }
            if limit == 0 {
                return Err(Error::invalid_argument("limit in time must be bigger than 0"));
            }
        }
        self.attribute_limits.push(AttributeLimit {
            attribute_id,
            limit_in_request,
            time: limit_in_time.map(|(time, _)| time),
            limit_in_time: limit_in_time.map(|(_, limit)| limit),
        });
        Ok(self)
    }

    /// Ask the server to explain each recommendation.
    pub fn details(&mut self, enabled: bool) -> &mut Self {
        self.details = enabled;
        self
    }

    /// Let the server learn from the returned recommendations.
    pub fn recommendation_feedback(&mut self, enabled: bool) -> &mut Self {
        self.recommendation_feedback = Some(enabled);
        self
    }

    /// Exclude blacklisted categories.
    pub fn category_blacklist(&mut self, enabled: bool) -> &mut Self {
        self.category_blacklist = Some(enabled);
        self
    }

    /// Set how fast diversity decays along the result list. Must lie in `[0, 1]`.
    pub fn diversity_decay(&mut self, diversity_decay: f64) -> Result<&mut Self> {
        if !(0.0..=1.0).contains(&diversity_decay) {
            return Err(Error::invalid_argument(
                "diversity decay must be a number in interval <0,1>",
            ));
        }
        self.diversity_decay = Some(diversity_decay);
        Ok(self)
    }

    /// Diversify results by attribute categories.
    pub fn enable_diversity_by_categories(&mut self, categories: Option<Vec<String>>) -> &mut Self {
        self.categories_diversity = Some(CategoriesDiversity { categories });
        self
    }

    /// Stop diversifying by categories.
    pub fn disable_diversity_by_categories(&mut self) -> &mut Self {
        self.categories_diversity = None;
        self
    }

    /// Diversify results by similarity.
    pub fn enable_diversity_by_similarity(
        &mut self,
        similarity_types: Option<Vec<String>>,
    ) -> &mut Self {
        self.similarity_diversity = Some(SimilarityDiversity { similarity_types });
        self
    }

    /// Stop diversifying by similarity.
    pub fn disable_diversity_by_similarity(&mut self) -> &mut Self {
        self.similarity_diversity = None;
        self
    }

    /// Limits in insertion order.
    pub fn attribute_limits(&self) -> &[AttributeLimit] {
        &self.attribute_limits
    }

    /// Whether explanations were requested.
    pub fn are_details_enabled(&self) -> bool {
        self.details
    }
}

fn finite(value: f64, name: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid_argument(format!("{name} must be a finite number")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::Error;

    use super::{RecommendationTemplateConfiguration, TemplateConfiguration};

    #[test]
    fn rejects_negative_diversity() {
        let mut configuration = TemplateConfiguration::new();

        assert!(matches!(
            configuration.diversity(-0.1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(configuration.diversity(0.0).is_ok());
        assert_eq!(configuration.get_diversity(), Some(0.0));
    }

    #[test]
    fn rejects_non_finite_weights() {
        let mut configuration = TemplateConfiguration::new();

        assert!(configuration.user_weight(f64::NAN).is_err());
        assert!(configuration.item_weight(f64::INFINITY).is_err());
        assert!(configuration.user_weight(-3.5).is_ok());
    }

    #[test]
    fn diversity_decay_bounds_are_inclusive() {
        let mut configuration = RecommendationTemplateConfiguration::new();

        assert!(configuration.diversity_decay(0.0).is_ok());
        assert!(configuration.diversity_decay(1.0).is_ok());
        assert!(configuration.diversity_decay(1.01).is_err());
        assert!(configuration.diversity_decay(-0.01).is_err());
        assert!(configuration.diversity_decay(f64::NAN).is_err());
    }

    #[test]
    fn attribute_limits_keep_call_order() {
        let mut configuration = RecommendationTemplateConfiguration::new();
        configuration
            .add_attribute_limit_in_request("brand", 2)
            .unwrap()
            .add_attribute_limit_in_time("category", 3600, 5)
            .unwrap()
            .add_attribute_limit_in_request_and_time("author", 1, 60, 2)
            .unwrap();

        assert_eq!(
            serde_json::to_value(configuration.attribute_limits()).unwrap(),
            json!([
                {"attributeId": "brand", "limitInRequest": 2},
                {"attributeId": "category", "time": 3600, "limitInTime": 5},
                {"attributeId": "author", "limitInRequest": 1, "time": 60, "limitInTime": 2},
            ])
        );
    }

    #[test]
    fn rejects_invalid_attribute_limits() {
        let mut configuration = RecommendationTemplateConfiguration::new();

        assert!(configuration.add_attribute_limit_in_request("", 1).is_err());
        assert!(configuration.add_attribute_limit_in_request("brand", 0).is_err());
        assert!(configuration.add_attribute_limit_in_time("brand", 0, 1).is_err());
        assert!(configuration.add_attribute_limit_in_time("brand", 1, 0).is_err());
        assert!(configuration.attribute_limits().is_empty());
    }
}

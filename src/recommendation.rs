//! Body of a recommendation request.
//!
//! [`RecommendationContentBuilder::construct`] normalizes the ways of saying "whom to recommend
//! for" (nobody, a single id, a weighted batch) and merges the template id with an inline
//! [`RecommendationTemplateConfiguration`]. It performs no I/O, and the output depends only on
//! which inputs were supplied.
use derive_more::From;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    batch::RecommendationEntitiesBatch,
    template_configuration::{AttributeLimit, RecommendationTemplateConfiguration},
    Error, Result,
};

/// Users or items a recommendation is computed for.
#[derive(Debug, Clone, PartialEq, From)]
pub enum RecommendationTarget {
    /// A single user or item id.
    Id(String),
    /// Weighted entities, optionally with a primary one.
    Batch(RecommendationEntitiesBatch),
}

impl From<&str> for RecommendationTarget {
    fn from(value: &str) -> Self {
        Self::Id(value.to_owned())
    }
}

/// Optional inputs of a recommendation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationOptions {
    pub(crate) template_id: Option<String>,
    pub(crate) configuration: Option<RecommendationTemplateConfiguration>,
    pub(crate) offset: Option<u32>,
    pub(crate) search_query: Option<String>,
}

impl RecommendationOptions {
    /// No template and no paging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a template stored on the server.
    pub fn template_id(&mut self, template_id: impl Into<String>) -> &mut Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Send template knobs inline. Combined with [`template_id`](Self::template_id) the inline
    /// values override the stored template.
    pub fn configuration(&mut self, configuration: RecommendationTemplateConfiguration) -> &mut Self {
        self.configuration = Some(configuration);
        self
    }

    /// Skip the first `offset` recommendations.
    pub fn offset(&mut self, offset: u32) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Restrict results to those matching `search_query`. Must not be empty.
    pub fn search_query(&mut self, search_query: impl Into<String>) -> &mut Self {
        self.search_query = Some(search_query.into());
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationContent<'a> {
    count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    users: Option<Vec<Map<String, Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<Map<String, Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<TemplateContent<'a>>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distinct: Option<&'a [AttributeLimit]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<bool>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendation_feedback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_blacklist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diversity_decay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diversity_types: Option<Vec<DiversityType<'a>>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum DiversityType<'a> {
    Categories {
        #[serde(rename = "diversityCategories", skip_serializing_if = "Option::is_none")]
        diversity_categories: Option<&'a [String]>,
    },
    Similarity {
        #[serde(rename = "similarityTypes", skip_serializing_if = "Option::is_none")]
        similarity_types: Option<&'a [String]>,
    },
}

/// Which side of the request a batch describes; decides the renamed keys.
#[derive(Debug, Clone, Copy)]
enum Side {
    Users,
    Items,
}

impl Side {
    fn id_key(self) -> &'static str {
        match self {
            Side::Users => "userId",
            Side::Items => "itemId",
        }
    }

    fn weight_key(self) -> &'static str {
        match self {
            Side::Users => "userWeight",
            Side::Items => "itemWeight",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Side::Users => "user id",
            Side::Items => "item id",
        }
    }
}

/// Builds recommendation request bodies.
pub struct RecommendationContentBuilder;

impl RecommendationContentBuilder {
    /// Build the JSON body of a recommendation request.
    ///
    /// `count` must be positive and a single id or search query, when given, must not be empty.
    pub fn construct(
        users: Option<&RecommendationTarget>,
        items: Option<&RecommendationTarget>,
        count: u32,
        options: &RecommendationOptions,
    ) -> Result<Value> {
        if count == 0 {
            return Err(Error::invalid_argument("count must be bigger than 0"));
        }
        if options.search_query.as_deref() == Some("") {
            return Err(Error::invalid_argument("search query can't be empty"));
        }

        let (user_id, users) = Self::target(users, Side::Users)?;
        let (item_id, items) = Self::target(items, Side::Items)?;

        let content = RecommendationContent {
            count,
            offset: options.offset,
            user_id,
            item_id,
            users,
            items,
            search_query: options.search_query.as_deref(),
            template: Self::template(
                options.template_id.as_deref(),
                options.configuration.as_ref(),
            ),
        };

        serde_json::to_value(content).map_err(|err| {
            Error::invalid_argument(format!("unable to serialize recommendation request: {err}"))
        })
    }

    fn target(
        target: Option<&RecommendationTarget>,
        side: Side,
    ) -> Result<(Option<&str>, Option<Vec<Map<String, Value>>>)> {
        match target {
            None => Ok((None, None)),
            Some(RecommendationTarget::Id(id)) => {
                if id.is_empty() {
                    return Err(Error::invalid_argument(format!(
                        "{} can't be empty",
                        side.name()
                    )));
                }
                Ok((Some(id), None))
            }
            Some(RecommendationTarget::Batch(batch)) => Ok((
                batch.primary_entity_id(),
                Some(Self::entities(batch, side)),
            )),
        }
    }

    fn entities(batch: &RecommendationEntitiesBatch, side: Side) -> Vec<Map<String, Value>> {
        batch
            .entities()
            .iter()
            .map(|entity| {
                let mut record = Map::new();
                record.insert(side.id_key().to_owned(), entity.entity_id.clone().into());
                if let Some(weight) = entity.entity_weight {
                    record.insert(side.weight_key().to_owned(), weight.into());
                }
                if let Some(interactions) = &entity.interactions {
                    let weights = interactions
                        .iter()
                        .map(|(name, weight)| (name.clone(), Value::from(*weight)))
                        .collect();
                    record.insert("interactions".to_owned(), Value::Object(weights));
                }
                record
            })
            .collect()
    }

    fn template<'a>(
        template_id: Option<&'a str>,
        configuration: Option<&'a RecommendationTemplateConfiguration>,
    ) -> Option<TemplateContent<'a>> {
        let Some(configuration) = configuration else {
            return template_id.map(|template_id| TemplateContent {
                template_id: Some(template_id),
                ..TemplateContent::default()
            });
        };

        let base = configuration.template();
        Some(TemplateContent {
            template_id,
            distinct: Some(configuration.attribute_limits()),
            details: Some(configuration.are_details_enabled()),
            filter: base.get_filter(),
            booster: base.get_booster(),
            user_weight: base.get_user_weight(),
            item_weight: base.get_item_weight(),
            diversity: base.get_diversity(),
            recommendation_feedback: configuration.recommendation_feedback,
            category_blacklist: configuration.category_blacklist,
            diversity_decay: configuration.diversity_decay,
            diversity_types: Self::diversity_types(configuration),
        })
    }

    fn diversity_types(
        configuration: &RecommendationTemplateConfiguration,
    ) -> Option<Vec<DiversityType<'_>>> {
        let mut types = Vec::new();
        if let Some(categories) = &configuration.categories_diversity {
            types.push(DiversityType::Categories {
                diversity_categories: categories.categories.as_deref(),
            });
        }
        if let Some(similarity) = &configuration.similarity_diversity {
            types.push(DiversityType::Similarity {
                similarity_types: similarity.similarity_types.as_deref(),
            });
        }
        (!types.is_empty()).then_some(types)
    }
}

use crate::{
    sections::{
        AbTestsSection, AttributesSection, EntitySection, InteractionTypesSection,
        InteractionsSection, RecommendationsSection, TemplatesSection, UsersSection, ITEMS,
    },
    transport::Transport,
    Api, Configuration,
};

/// A client for the DataBreakers API.
///
/// In order to create a client instance, first create [`ClientConfig`](crate::ClientConfig).
/// Operations are grouped into sections, one per resource family.
///
/// # Examples
/// ```
/// # use databreakers::ClientConfig;
/// # fn main() -> databreakers::Result<()> {
/// let client = ClientConfig::from_credentials("account-id", "secret-key").to_client()?;
/// let users = client.users();
/// # Ok(())
/// # }
/// ```
pub struct Client<'a> {
    api: Api<'a>,
}

impl<'a> Client<'a> {
    pub(crate) fn new(
        configuration: Configuration,
        transport: Box<dyn Transport + Send + Sync + 'a>,
    ) -> Self {
        Client {
            api: Api::new(configuration, transport),
        }
    }

    /// Underlying request layer, for endpoints not covered by the sections.
    pub fn api(&self) -> &Api<'a> {
        &self.api
    }

    /// Connection settings in use.
    pub fn configuration(&self) -> &Configuration {
        self.api.configuration()
    }

    /// Send subsequent requests to another host.
    pub fn change_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.api.change_host(host);
        self
    }

    /// Use another API version prefix for subsequent requests.
    pub fn change_slug(&mut self, slug: impl Into<String>) -> &mut Self {
        self.api.change_slug(slug);
        self
    }

    /// Attribute definitions of users, items and interactions.
    pub fn attributes(&self) -> AttributesSection<'_> {
        AttributesSection::new(&self.api)
    }

    /// Users, including copying and merging.
    pub fn users(&self) -> UsersSection<'_> {
        UsersSection::new(&self.api)
    }

    /// Items.
    pub fn items(&self) -> EntitySection<'_> {
        EntitySection::new(&self.api, ITEMS)
    }

    /// Interactions between users and items.
    pub fn interactions(&self) -> InteractionsSection<'_> {
        InteractionsSection::new(&self.api)
    }

    /// Interaction type definitions.
    pub fn interaction_types(&self) -> InteractionTypesSection<'_> {
        InteractionTypesSection::new(&self.api)
    }

    /// Recommendation templates.
    pub fn templates(&self) -> TemplatesSection<'_> {
        TemplatesSection::new(&self.api)
    }

    /// Recommendations of the `default` model. Use
    /// [`RecommendationsSection::with_model`] to ask another one.
    pub fn recommendations(&self) -> RecommendationsSection<'_> {
        RecommendationsSection::new(&self.api)
    }

    /// A/B test groups of users.
    pub fn ab_tests(&self) -> AbTestsSection<'_> {
        AbTestsSection::new(&self.api)
    }
}

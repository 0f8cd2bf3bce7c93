use cardsmith_core::config::HttpConfig;
use cardsmith_core::error::AppError;
use cardsmith_core::models::{CardRecord, GuildUpgrade, GuildUpgradeOption, PublishResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use tracing::debug;

/// Mutation for creating a guild upgrade.
///
/// All fields travel as variables; the derived `allowsTagsMax` is computed
/// by [`GuildUpgrade::allows_tags_max`] and never taken from the input.
const CREATE_GUILD_UPGRADE_MUTATION: &str = "\
mutation CreateGuildUpgrade($name: String!, $isUnique: Boolean, $allowsTags: [String], $allowsTagsMax: Float, $description: String, $options: [GuildUpgradeOptionInputType], $cost: Float!, $isExclusiveToCampaigns: Boolean) {
    createGuildUpgrade(
        data: {name: $name, isUnique: $isUnique, allowsTags: $allowsTags, allowsTagsMax: $allowsTagsMax, description: $description, options: $options, cost: $cost, isExclusiveToCampaigns: $isExclusiveToCampaigns}
    ) {
        id
        name
    }
}";

/// GraphQL request envelope: `{"query": ..., "variables": ...}`.
#[derive(Serialize)]
struct GraphqlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

/// Variables for the guild-upgrade mutation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpgradeVariables<'a> {
    name: &'a str,
    is_unique: bool,
    allows_tags: &'a [String],
    allows_tags_max: f64,
    description: &'a str,
    options: &'a [GuildUpgradeOption],
    cost: f64,
    is_exclusive_to_campaigns: bool,
}

/// HTTP client for publishing card-game content to a GraphQL backend.
///
/// Both operations are at-most-once: a single POST per record, no retry.
/// Card mutations are non-idempotent on the backend, so an automatic retry
/// could create duplicates.
///
/// # Examples
///
/// ```no_run
/// use cardsmith_client::GraphqlClient;
/// use cardsmith_core::config::HttpConfig;
/// use cardsmith_core::models::CardRecord;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GraphqlClient::new("http://localhost:4000/graphql", HttpConfig::default())?;
/// let card = CardRecord::new("wild", "No description available");
/// let result = client
///     .publish_card(&card, Path::new("Wild_unit_resized_400_50.png"))
///     .await?;
/// println!("Published with status {}", result.status);
/// # Ok(())
/// # }
/// ```
pub struct GraphqlClient {
    client: Client,
    endpoint: Url,
    timeout_secs: u64,
    card_mutation: String,
}

impl GraphqlClient {
    /// Creates a client for the given GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the endpoint is malformed and
    /// `AppError::Network` if the HTTP client cannot be built.
    pub fn new(endpoint: &str, http: HttpConfig) -> Result<Self, AppError> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| AppError::InvalidUrl(endpoint.to_string()))?;

        let timeout_secs = http.timeout_secs();
        let client = Client::builder()
            .user_agent("Cardsmith/0.1 (content-pipeline)")
            .timeout(http.timeout)
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        // Fixed card fields ride inline in the mutation document, the same
        // shape the backend's card form submits.
        let card_mutation = format!(
            "mutation CreateCard($faction: String, $file: File!, $description: String) {{ \
             createCard( data: {{name: \"{name}\", description: $description, faction: $faction, \
             cost: {cost}, image: $file, frequency: {frequency}, favoritedCount: {favorited}, \
             comments: []}} ) {{ id }} }}",
            name = CardRecord::NAME,
            cost = CardRecord::COST,
            frequency = CardRecord::FREQUENCY,
            favorited = CardRecord::FAVORITED_COUNT,
        );

        Ok(Self {
            client,
            endpoint,
            timeout_secs,
            card_mutation,
        })
    }

    /// Publishes one card as a GraphQL multipart upload.
    ///
    /// The form follows the GraphQL multipart-request convention:
    /// an `operations` field holding the mutation with `variables.file`
    /// nulled, a `map` field binding part `"0"` to that variable, and the
    /// image bytes as part `"0"`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Publish` for a non-2xx response or a 2xx response
    /// carrying GraphQL errors, `AppError::Network`/`AppError::Timeout` for
    /// transport failures, and `AppError::Io` if the image cannot be read.
    pub async fn publish_card(
        &self,
        card: &CardRecord,
        image_path: &Path,
    ) -> Result<PublishResult, AppError> {
        let bytes = tokio::fs::read(image_path).await?;
        let filename = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("card.png")
            .to_string();

        let operations = serde_json::to_string(&GraphqlRequest {
            query: &self.card_mutation,
            variables: json!({
                "faction": card.faction,
                "file": null,
                "description": card.description,
            }),
        })?;

        debug!(faction = %card.faction, file = %filename, "Publishing card");

        let form = Form::new()
            .text("operations", operations)
            .text("map", r#"{"0":["variables.file"]}"#)
            .part("0", Part::bytes(bytes).file_name(filename));

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.check_response(response).await
    }

    /// Publishes one guild upgrade as a plain JSON GraphQL mutation.
    ///
    /// Variables carry the record's fields plus the derived
    /// `allowsTagsMax`; option sub-records are forwarded verbatim,
    /// including fields this tool does not model.
    pub async fn publish_guild_upgrade(
        &self,
        upgrade: &GuildUpgrade,
    ) -> Result<PublishResult, AppError> {
        let request = GraphqlRequest {
            query: CREATE_GUILD_UPGRADE_MUTATION,
            variables: UpgradeVariables {
                name: &upgrade.name,
                is_unique: upgrade.is_unique,
                allows_tags: &upgrade.allows_tags,
                allows_tags_max: upgrade.allows_tags_max(),
                description: &upgrade.description,
                options: &upgrade.options,
                cost: upgrade.cost,
                is_exclusive_to_campaigns: upgrade.is_exclusive_to_campaigns,
            },
        };

        debug!(name = %upgrade.name, "Publishing guild upgrade");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.check_response(response).await
    }

    /// Maps a reqwest transport failure onto the error taxonomy.
    fn transport_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::Network(format!("Connection failed: {}", e))
        } else {
            AppError::Network(e.to_string())
        }
    }

    /// Turns an HTTP response into a publish result.
    ///
    /// Non-2xx fails with the status and body verbatim. A 2xx body is
    /// additionally inspected for a non-empty GraphQL `errors` array -
    /// backends report mutation failures inside HTTP 200, and treating
    /// those as success would silently drop records. A 2xx body that is
    /// not JSON passes through as success; the inspection is best-effort,
    /// not schema validation.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<PublishResult, AppError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::Publish {
                status: status.as_u16(),
                body,
            });
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            let has_errors = value
                .get("errors")
                .and_then(|e| e.as_array())
                .is_some_and(|errors| !errors.is_empty());
            if has_errors {
                return Err(AppError::Publish {
                    status: status.as_u16(),
                    body,
                });
            }
        }

        Ok(PublishResult {
            status: status.as_u16(),
            body,
        })
    }
}

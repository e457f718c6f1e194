//! End-to-end crawl: fetch both documents → extract → merge into [`AriaData`].
//!
//! The role-mapping and definitions pipelines run concurrently and share
//! nothing. Inside the definitions pipeline, states, properties, and values are
//! extracted one after another from a single parsed tree.

use scraper::Html;
use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;

use ariacrawl_crawler::{
    CachedFetcher, IndexDescriptions, extract_property_sections, extract_roles, extract_values,
};
use ariacrawl_shared::{
    AriaCrawlError, AriaData, PropertyKind, PropertyOrState, Result, Role, SourcesConfig, Value,
};

/// The two documents a crawl reads.
#[derive(Debug, Clone)]
pub struct CrawlSources {
    /// HTML-ARIA: role table.
    pub role_mapping: Url,
    /// WAI-ARIA: state/property sections, index, and value list.
    pub definitions: Url,
}

impl CrawlSources {
    /// Resolve source URLs from the `[sources]` config section.
    pub fn from_config(sources: &SourcesConfig) -> Result<Self> {
        let (role_mapping, definitions) = sources.urls()?;
        Ok(Self {
            role_mapping,
            definitions,
        })
    }
}

/// Everything extracted from the definitions document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    pub states: Vec<PropertyOrState>,
    pub properties: Vec<PropertyOrState>,
    pub values: Vec<Value>,
}

/// Parse the role-mapping document and extract its roles.
pub fn extract_role_mapping(html: &str) -> Result<Vec<Role>> {
    let doc = Html::parse_document(html);
    extract_roles(&doc)
}

/// Parse the definitions document once and run every extractor over it.
pub fn extract_definitions(html: &str) -> Result<Definitions> {
    let doc = Html::parse_document(html);
    let index = IndexDescriptions::from_document(&doc)?;

    Ok(Definitions {
        states: extract_property_sections(&doc, PropertyKind::State, &index)?,
        properties: extract_property_sections(&doc, PropertyKind::Property, &index)?,
        values: extract_values(&doc)?,
    })
}

/// Merge both pipelines' output. No cross-collection checks are made.
fn merge(roles: Vec<Role>, definitions: Definitions) -> AriaData {
    AriaData {
        roles,
        states: definitions.states,
        properties: definitions.properties,
        values: definitions.values,
    }
}

/// Run extraction over already-fetched document text.
pub fn assemble(role_mapping_html: &str, definitions_html: &str) -> Result<AriaData> {
    Ok(merge(
        extract_role_mapping(role_mapping_html)?,
        extract_definitions(definitions_html)?,
    ))
}

/// Fetch both documents concurrently and extract everything.
///
/// The first failure from either side aborts the crawl; no partial result is
/// returned.
#[instrument(skip_all, fields(
    role_mapping = %sources.role_mapping,
    definitions = %sources.definitions
))]
pub async fn crawl_aria(fetcher: &CachedFetcher, sources: &CrawlSources) -> Result<AriaData> {
    info!(cache_mode = ?fetcher.cache_mode(), "starting crawl");

    let (roles, definitions) = tokio::try_join!(
        crawl_role_mapping(fetcher, &sources.role_mapping),
        crawl_definitions(fetcher, &sources.definitions),
    )?;

    let data = merge(roles, definitions);
    info!(
        roles = data.roles.len(),
        states = data.states.len(),
        properties = data.properties.len(),
        values = data.values.len(),
        "crawl completed"
    );
    Ok(data)
}

async fn crawl_role_mapping(fetcher: &CachedFetcher, url: &Url) -> Result<Vec<Role>> {
    let body = fetcher.fetch(url).await?;
    debug!(%url, bytes = body.len(), "extracting role mapping");
    extract_role_mapping(&body)
}

async fn crawl_definitions(fetcher: &CachedFetcher, url: &Url) -> Result<Definitions> {
    let body = fetcher.fetch(url).await?;
    debug!(%url, bytes = body.len(), "extracting definitions");
    extract_definitions(&body)
}

/// Encode crawl output as JSON indented by four spaces.
pub fn to_pretty_json(data: &AriaData) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| {
        AriaCrawlError::Serialize(serde_json::Error::io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })
}

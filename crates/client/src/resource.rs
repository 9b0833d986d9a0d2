//! Resource accessor: typed get / search per entity type

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use kelvin_domain::codec;
use kelvin_domain::{Entity, Identity, KelvinError, Result, SearchQuery, Status};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::record::Record;
use crate::session::{RequestOptions, Session};

/// Gateway to the objects of entity type `E`
pub struct Resource<E: Entity> {
    session: Arc<Session>,
    language: Option<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Resource<E> {
    fn clone(&self) -> Self {
        Self { session: Arc::clone(&self.session), language: self.language.clone(), _entity: PhantomData }
    }
}

impl<E: Entity> fmt::Debug for Resource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("entity", &E::SPEC.display_name)
            .field("language", &self.language)
            .finish()
    }
}

impl<E: Entity> Resource<E> {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session, language: None, _entity: PhantomData }
    }

    /// Send `Accept-Language: {language}` instead of the session default.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn collection_url(&self) -> String {
        self.session.urls().collection(E::SPEC.resource)
    }

    /// Object URL for `identity`, which must name exactly the identity
    /// fields of `E`.
    pub fn object_url(&self, identity: &Identity) -> Result<String> {
        let path = E::SPEC.identity_path(identity)?;
        Ok(self.session.urls().object(E::SPEC.resource, &path))
    }

    /// Fetch one object by its identity fields.
    #[instrument(skip(self), fields(entity = E::SPEC.display_name, %identity))]
    pub async fn get(&self, identity: &Identity) -> Result<Record<E>> {
        let url = self.object_url(identity)?;
        match self.get_from_url(&url).await {
            Err(KelvinError::NoObject { reason, status, .. }) => Err(KelvinError::NoObject {
                message: format!(
                    "{} not found at URL {url:?} using attributes {identity}.",
                    E::SPEC.display_name
                ),
                reason,
                status,
                url: Some(url),
            }),
            other => other,
        }
    }

    /// Fetch one object from a known URL.
    pub async fn get_from_url(&self, url: &str) -> Result<Record<E>> {
        let response = self.session.get(url, &self.options()).await?;
        Record::from_response(Arc::clone(&self.session), self.language.clone(), response)
    }

    /// Search the collection.
    ///
    /// Validation happens before any request is sent. Objects are decoded
    /// one at a time while iterating the result.
    #[instrument(skip(self), fields(entity = E::SPEC.display_name))]
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResults<E>> {
        let params = E::SPEC.search_params(&query)?;
        let url = self.collection_url();
        let response = self.session.get(&url, &self.options().params(params)).await?;
        let items = codec::decode_list::<E>(response)?;
        debug!(count = items.len(), "search returned");
        Ok(SearchResults {
            items: items.into_iter(),
            session: Arc::clone(&self.session),
            language: self.language.clone(),
            _entity: PhantomData,
        })
    }

    pub(crate) fn options(&self) -> RequestOptions {
        RequestOptions::new().maybe_language(self.language.as_deref())
    }
}

impl Resource<Status> {
    /// Fetch the service status.
    pub async fn fetch(&self) -> Result<Record<Status>> {
        self.get(&Identity::new()).await
    }
}

/// Lazily decoded search result
pub struct SearchResults<E: Entity> {
    items: std::vec::IntoIter<Value>,
    session: Arc<Session>,
    language: Option<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> SearchResults<E> {
    /// Objects not yet decoded.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// Decode everything, failing on the first undecodable object.
    pub fn into_vec(self) -> Result<Vec<Record<E>>> {
        self.collect()
    }
}

impl<E: Entity> Iterator for SearchResults<E> {
    type Item = Result<Record<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.items.next()?;
        Some(Record::from_response(Arc::clone(&self.session), self.language.clone(), raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<E: Entity> fmt::Debug for SearchResults<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResults")
            .field("entity", &E::SPEC.display_name)
            .field("remaining", &self.items.len())
            .finish()
    }
}

//! Domain object lifecycle
//!
//! A [`Record`] wraps an entity value with the server-assigned `dn` and
//! `url`, the owning session and the bookkeeping needed for save, reload and
//! delete. Field access goes through `Deref` to the entity.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use kelvin_domain::codec::{self, Decoded};
use kelvin_domain::{Entity, Identity, KelvinError, Operation, Result};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::resource::Resource;
use crate::session::{RequestOptions, Session};

/// Entity bound to a session
pub struct Record<E: Entity> {
    data: E,
    dn: Option<String>,
    url: Option<String>,
    session: Arc<Session>,
    language: Option<String>,
    fresh: bool,
    deleted: bool,
    synced_identity: Identity,
}

impl<E: Entity> Record<E> {
    /// New, not yet persisted object.
    pub fn new(session: Arc<Session>, data: E) -> Self {
        let synced_identity = data.identity();
        Self {
            data,
            dn: None,
            url: None,
            session,
            language: None,
            fresh: true,
            deleted: false,
            synced_identity,
        }
    }

    pub(crate) fn from_response(
        session: Arc<Session>,
        language: Option<String>,
        response: Value,
    ) -> Result<Self> {
        let Decoded { entity, dn, url } = codec::decode::<E>(response)?;
        let synced_identity = entity.identity();
        Ok(Self {
            data: entity,
            dn,
            url,
            session,
            language,
            fresh: true,
            deleted: false,
            synced_identity,
        })
    }

    /// Send `Accept-Language: {language}` on this object's requests.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn dn(&self) -> Option<&str> {
        self.dn.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether the local state was loaded from the server and not saved since.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Identity values at the last load or save.
    pub fn synced_identity(&self) -> &Identity {
        &self.synced_identity
    }

    pub fn into_inner(self) -> E {
        self.data
    }

    /// Create the object on the server, or modify it when it has a URL.
    ///
    /// All fields are replaced by the server's response.
    #[instrument(skip(self), fields(entity = E::SPEC.display_name, url = self.url.as_deref()))]
    pub async fn save(&mut self) -> Result<&mut Self> {
        if self.deleted {
            return Err(KelvinError::State(format!("{self} has been deleted.")));
        }
        let operation = if self.url.is_some() { Operation::Modify } else { Operation::Create };
        E::SPEC.ensure(operation)?;
        let identity = self.data.identity();
        if identity.has_empty_value() {
            return Err(KelvinError::Assertion(format!(
                "{} requires non-empty value(s) for: {}.",
                E::SPEC.display_name,
                E::SPEC.identity.join(", ")
            )));
        }
        if !self.fresh {
            debug!("saving stale object {self}");
        }

        let body = Value::Object(codec::encode(&self.data, self.session.urls())?);
        let options = self.options();
        let response = match self.url.as_deref() {
            Some(url) => self.session.put(url, &body, &options).await?,
            None => {
                let collection = self.session.urls().collection(E::SPEC.resource);
                self.session.post(&collection, &body, &options).await?
            }
        };
        self.apply(response)?;
        self.fresh = false;
        Ok(self)
    }

    /// Replace local state with the server's, addressed by the identity
    /// values of the last sync.
    #[instrument(skip(self), fields(entity = E::SPEC.display_name))]
    pub async fn reload(&mut self) -> Result<&mut Self> {
        if self.deleted {
            warn!("reloading deleted object {self}");
        }
        let mut resource = Resource::<E>::new(Arc::clone(&self.session));
        if let Some(language) = &self.language {
            resource = resource.with_language(language.clone());
        }
        let loaded = resource.get(&self.synced_identity).await?;
        self.data = loaded.data;
        self.dn = loaded.dn;
        self.url = loaded.url;
        self.synced_identity = loaded.synced_identity;
        self.fresh = true;
        Ok(self)
    }

    /// Delete the object on the server. Deleting twice is a no-op.
    #[instrument(skip(self), fields(entity = E::SPEC.display_name, url = self.url.as_deref()))]
    pub async fn delete(&mut self) -> Result<()> {
        if self.deleted {
            warn!("{self} has already been deleted");
            return Ok(());
        }
        E::SPEC.ensure(Operation::Delete)?;
        let Some(url) = self.url.clone() else {
            return Err(KelvinError::State(format!(
                "{self} has no URL; it has not been saved yet."
            )));
        };
        self.session.delete(&url, &self.options()).await?;
        self.deleted = true;
        Ok(())
    }

    fn apply(&mut self, response: Value) -> Result<()> {
        let Decoded { entity, dn, url } = codec::decode::<E>(response)?;
        self.synced_identity = entity.identity();
        self.data = entity;
        self.dn = dn;
        self.url = url;
        Ok(())
    }

    fn options(&self) -> RequestOptions {
        RequestOptions::new().maybe_language(self.language.as_deref())
    }
}

impl<E: Entity> Deref for Record<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.data
    }
}

impl<E: Entity> DerefMut for Record<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.data
    }
}

impl<E: Entity> fmt::Display for Record<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = std::any::type_name::<E>();
        let short = type_name.rsplit("::").next().unwrap_or(type_name);
        write!(f, "{short}(")?;
        for (field, value) in self.data.identity().iter() {
            write!(f, "{field}='{value}', ")?;
        }
        match &self.dn {
            Some(dn) => write!(f, "dn='{dn}')"),
            None => f.write_str("dn=None)"),
        }
    }
}

impl<E: Entity> fmt::Debug for Record<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("data", &self.data)
            .field("dn", &self.dn)
            .field("url", &self.url)
            .field("fresh", &self.fresh)
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}

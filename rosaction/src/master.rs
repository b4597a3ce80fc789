//! Client for the ROS master XML-RPC API.
//!
//! Covers the read side of the registry that `rosgraph` exposes to
//! command line tools: topic types, the pub/sub/service state and node
//! lookups. Calls go straight over XML-RPC, so nothing is registered
//! with the master and no node has to be initialized first.

use std::env;

use serde::de::DeserializeOwned;
use serde_xmlrpc::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Master location used when `ROS_MASTER_URI` is not set.
pub const DEFAULT_MASTER_URI: &str = "http://localhost:11311";

/// Environment variable naming the master location.
pub const MASTER_URI_ENV: &str = "ROS_MASTER_URI";

const SUCCESS_CODE: i32 = 1;

/// One `(topic, message type)` registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicType {
    pub name: String,
    pub msg_type: String,
}

/// Topic or service name with the nodes currently attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicData {
    pub name: String,
    pub connections: Vec<String>,
}

/// Publishers, subscribers and services as reported by `getSystemState`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemState {
    pub publishers: Vec<TopicData>,
    pub subscribers: Vec<TopicData>,
    pub services: Vec<TopicData>,
}

/// Blocking client for the master API.
#[derive(Debug, Clone)]
pub struct MasterClient {
    caller_id: String,
    uri: Url,
}

impl MasterClient {
    /// Connects to the master named by `ROS_MASTER_URI`, falling back to
    /// [`DEFAULT_MASTER_URI`].
    pub fn new(caller_id: &str) -> Result<Self, Error> {
        let uri = env::var(MASTER_URI_ENV).unwrap_or_else(|_| DEFAULT_MASTER_URI.to_owned());
        Self::with_uri(caller_id, &uri)
    }

    /// Connects to an explicit master URI.
    pub fn with_uri(caller_id: &str, uri: &str) -> Result<Self, Error> {
        let uri = Url::parse(uri).map_err(|source| Error::InvalidMasterUri {
            uri: uri.to_owned(),
            source,
        })?;
        Ok(Self {
            caller_id: caller_id.to_owned(),
            uri,
        })
    }

    pub fn caller_id(&self) -> &str {
        &self.caller_id
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// `getUri`: the URI the master believes it is reachable at.
    pub fn get_uri(&self) -> Result<String, Error> {
        self.call("getUri", vec![self.caller_id.as_str().into()])
    }

    /// `getTopicTypes`: every known `(topic, message type)` pair.
    pub fn get_topic_types(&self) -> Result<Vec<TopicType>, Error> {
        let pairs: Vec<(String, String)> =
            self.call("getTopicTypes", vec![self.caller_id.as_str().into()])?;
        Ok(into_topic_types(pairs))
    }

    /// `getPublishedTopics` under `subgraph`, the empty string meaning
    /// the whole graph.
    pub fn get_published_topics(&self, subgraph: &str) -> Result<Vec<TopicType>, Error> {
        let pairs: Vec<(String, String)> = self.call(
            "getPublishedTopics",
            vec![self.caller_id.as_str().into(), subgraph.into()],
        )?;
        Ok(into_topic_types(pairs))
    }

    /// `getSystemState`: publishers, subscribers and services.
    pub fn get_system_state(&self) -> Result<SystemState, Error> {
        type Entries = Vec<(String, Vec<String>)>;
        let (publishers, subscribers, services): (Entries, Entries, Entries) =
            self.call("getSystemState", vec![self.caller_id.as_str().into()])?;
        Ok(SystemState {
            publishers: into_topic_data(publishers),
            subscribers: into_topic_data(subscribers),
            services: into_topic_data(services),
        })
    }

    /// `lookupNode`: XML-RPC URI of a running node.
    pub fn lookup_node(&self, node_name: &str) -> Result<String, Error> {
        self.call(
            "lookupNode",
            vec![self.caller_id.as_str().into(), node_name.into()],
        )
    }

    /// `lookupService`: TCPROS URI of a service provider.
    pub fn lookup_service(&self, service_name: &str) -> Result<String, Error> {
        self.call(
            "lookupService",
            vec![self.caller_id.as_str().into(), service_name.into()],
        )
    }

    fn call<T>(&self, method: &'static str, params: Vec<Value>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        debug!("calling {method} on {}", self.uri);
        let body = serde_xmlrpc::request_to_string(method, params)?;
        let response = ureq::post(self.uri.as_str())
            .set("Content-Type", "text/xml")
            .send_string(&body)
            .map_err(|e| self.connection_error(e))?
            .into_string()
            .map_err(|e| self.connection_error(e))?;
        // Every master call answers with a (code, statusMessage, value)
        // triple; only code 1 carries a usable value.
        let (code, message, value): (i32, String, T) = serde_xmlrpc::response_from_str(&response)?;
        if code != SUCCESS_CODE {
            return Err(Error::MasterApi {
                call: method,
                code,
                message,
            });
        }
        Ok(value)
    }

    fn connection_error<E: std::fmt::Display>(&self, e: E) -> Error {
        Error::MasterConnection {
            uri: self.uri.to_string(),
            message: e.to_string(),
        }
    }
}

fn into_topic_types(pairs: Vec<(String, String)>) -> Vec<TopicType> {
    pairs
        .into_iter()
        .map(|(name, msg_type)| TopicType { name, msg_type })
        .collect()
}

fn into_topic_data(entries: Vec<(String, Vec<String>)>) -> Vec<TopicData> {
    entries
        .into_iter()
        .map(|(name, connections)| TopicData { name, connections })
        .collect()
}

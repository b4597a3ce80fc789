//! Action discovery against a running master.
//!
//! An action server occupies five topics under its namespace. Discovery
//! leans on the two the server always subscribes to: a namespace with
//! both a `goal` and a `cancel` subscription is treated as an action.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    error::Error,
    master::{MasterClient, TopicType},
};

/// Topic names an action named `action` occupies.
///
/// Plain string formatting; nothing is resolved against the master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTopics {
    pub goal: String,
    pub cancel: String,
    pub status: String,
    pub feedback: String,
    pub result: String,
}

impl ActionTopics {
    pub fn new(action: &str) -> Self {
        Self {
            goal: format!("{action}/goal"),
            cancel: format!("{action}/cancel"),
            status: format!("{action}/status"),
            feedback: format!("{action}/feedback"),
            result: format!("{action}/result"),
        }
    }
}

/// Names of the actions currently registered with the master, sorted.
pub fn action_list(master: &MasterClient) -> Result<Vec<String>, Error> {
    let state = master.get_system_state()?;
    let actions =
        actions_from_subscriptions(state.subscribers.iter().map(|topic| topic.name.as_str()));
    debug!("{} actions registered with {}", actions.len(), master.uri());
    Ok(actions)
}

/// Picks the action namespaces out of a set of subscribed topics.
///
/// A topic `{ns}/goal` counts when `{ns}/cancel` is subscribed as well.
pub fn actions_from_subscriptions<S: AsRef<str>>(
    subscriptions: impl IntoIterator<Item = S>,
) -> Vec<String> {
    let subscriptions: Vec<S> = subscriptions.into_iter().collect();
    let topics: BTreeSet<&str> = subscriptions.iter().map(|topic| topic.as_ref()).collect();
    let mut actions: Vec<String> = topics
        .iter()
        .filter_map(|topic| topic.strip_suffix("/goal"))
        .filter(|action| topics.contains(format!("{action}/cancel").as_str()))
        .map(str::to_owned)
        .collect();
    // The set iterates in full topic name order; distinct namespaces can
    // still compare differently once the suffix is gone.
    actions.sort();
    actions
}

/// Resolves the goal topic of `action` to its registered message type.
///
/// `Ok(None)` when the master knows no such topic.
pub fn goal_type(master: &MasterClient, action: &str) -> Result<Option<TopicType>, Error> {
    resolve_topic(master, ActionTopics::new(action).goal)
}

/// Resolves the feedback topic of `action` to its registered message type.
pub fn feedback_type(master: &MasterClient, action: &str) -> Result<Option<TopicType>, Error> {
    resolve_topic(master, ActionTopics::new(action).feedback)
}

/// Resolves the result topic of `action` to its registered message type.
pub fn result_type(master: &MasterClient, action: &str) -> Result<Option<TopicType>, Error> {
    resolve_topic(master, ActionTopics::new(action).result)
}

/// Resolves the goal topic of `action` and checks it against `T`.
///
/// `Ok(Some(topic))` means the registered type string equals
/// `T::msg_type()`. A topic registered under a different type is a
/// [`Error::TypeMismatch`].
pub fn checked_goal_topic<T: rosrust::Message>(
    master: &MasterClient,
    action: &str,
) -> Result<Option<String>, Error> {
    check_type(T::msg_type(), goal_type(master, action)?)
}

/// Resolves the feedback topic of `action` and checks it against `T`.
pub fn checked_feedback_topic<T: rosrust::Message>(
    master: &MasterClient,
    action: &str,
) -> Result<Option<String>, Error> {
    check_type(T::msg_type(), feedback_type(master, action)?)
}

/// Resolves the result topic of `action` and checks it against `T`.
pub fn checked_result_topic<T: rosrust::Message>(
    master: &MasterClient,
    action: &str,
) -> Result<Option<String>, Error> {
    check_type(T::msg_type(), result_type(master, action)?)
}

fn resolve_topic(master: &MasterClient, topic: String) -> Result<Option<TopicType>, Error> {
    Ok(master
        .get_topic_types()?
        .into_iter()
        .find(|registered| registered.name == topic))
}

fn check_type(expected: String, resolved: Option<TopicType>) -> Result<Option<String>, Error> {
    match resolved {
        None => Ok(None),
        Some(registered) if registered.msg_type == expected => Ok(Some(registered.name)),
        Some(registered) => Err(Error::TypeMismatch {
            topic: registered.name,
            registered: registered.msg_type,
            expected,
        }),
    }
}

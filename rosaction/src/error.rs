use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("rosaction: Failed to reach master at {}: {}", .uri, .message)]
    MasterConnection { uri: String, message: String },
    #[error("rosaction: Master call {} failed with code {}: {}", .call, .code, .message)]
    MasterApi {
        call: &'static str,
        code: i32,
        message: String,
    },
    #[error("rosaction: xmlrpc: {}", .0)]
    XmlRpc(#[from] serde_xmlrpc::Error),
    #[error("rosaction: Invalid master URI {:?}: {}", .uri, .source)]
    InvalidMasterUri {
        uri: String,
        source: url::ParseError,
    },
    #[error("rosaction: Topic {} is registered as {} but {} was expected", .topic, .registered, .expected)]
    TypeMismatch {
        topic: String,
        registered: String,
        expected: String,
    },
    #[error("rosaction: No action registered at {}", .0)]
    ActionNotRegistered(String),
    #[error("rosaction: Goal YAML must be a mapping, got {}", .0)]
    GoalYamlNotAMapping(String),
    #[error("rosaction: Goal YAML names unknown field {:?}", .0)]
    UnknownGoalField(String),
    #[error("rosaction: yaml: {}", .0)]
    Yaml(#[from] serde_yaml::Error),
    #[error("rosaction: ActionServerTimeout on {}", .0)]
    ActionServerTimeout(String),
    #[error("rosaction: ActionResultTimeout")]
    ActionResultTimeout,
    #[error("rosaction: ActionResultNotSuccess {}", .0)]
    ActionResultNotSuccess(String),
    #[error("rosaction: ActionResultPreempted {}", .0)]
    ActionResultPreempted(String),
    #[error("rosaction: ActionGoalSendingFailure")]
    ActionGoalSendingFailure,
    #[error("rosaction: ActionCancelSendingFailure")]
    ActionCancelSendingFailure,
    #[error("rosaction: rosrust: {}", .0)]
    Ros(String),
}
